//! Unspent output lookup.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::StoreError;
use tessera_types::{AssetType, LockScriptHash, ShardId, Timestamp, Tracker};

/// Key of an output: the tracker of the transaction that created it and its
/// position in that transaction's outputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OutPointKey {
    pub tracker: Tracker,
    pub index: u32,
}

impl OutPointKey {
    pub fn new(tracker: Tracker, index: u32) -> Self {
        Self { tracker, index }
    }
}

impl fmt::Display for OutPointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tracker, self.index)
    }
}

/// Everything the ledger remembers about an unspent output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtxoRecord {
    pub asset_type: AssetType,
    pub shard_id: ShardId,
    pub quantity: u64,
    pub lock_script_hash: LockScriptHash,
    pub parameters: Vec<Vec<u8>>,
    /// Height of the block that created the output.
    pub creation_height: u64,
    /// Timestamp of the block that created the output.
    pub creation_time: Timestamp,
}

/// Read access to the unspent output set.
///
/// Implementations must present one consistent version of the set for the
/// lifetime of the borrow; spent outputs are reported as not found.
pub trait UtxoLookup {
    fn get_utxo(&self, key: &OutPointKey) -> Result<UtxoRecord, StoreError>;

    fn contains_utxo(&self, key: &OutPointKey) -> bool {
        self.get_utxo(key).is_ok()
    }
}

impl<T: UtxoLookup + ?Sized> UtxoLookup for Arc<T> {
    fn get_utxo(&self, key: &OutPointKey) -> Result<UtxoRecord, StoreError> {
        (**self).get_utxo(key)
    }

    fn contains_utxo(&self, key: &OutPointKey) -> bool {
        (**self).contains_utxo(key)
    }
}
