//! What a script can observe about the transaction spending it.

use tessera_types::{ChainHead, Timestamp};

use crate::{Tag, VmError};

/// Per-input view of the spending transaction.
///
/// Implemented by the transaction layer; the VM never sees the transaction
/// itself, only the hash it is asked to verify signatures against.
pub trait ExecutionContext {
    /// The hash a signature with the given tag must commit to.
    ///
    /// Fails when the tag's scope does not fit the transaction, e.g. it
    /// selects an output index that does not exist.
    fn signing_hash(&self, tag: &Tag) -> Result<[u8; 32], VmError>;

    /// The chain head the transaction is evaluated against.
    fn chain_head(&self) -> ChainHead;

    /// Block height and timestamp at which the spent output was created.
    fn spent_output_origin(&self) -> (u64, Timestamp);
}
