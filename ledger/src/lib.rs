//! UTXO ledger.
//!
//! Holds the current unspent output set as an immutable, versioned snapshot.
//! Blocks are validated against the snapshot taken at their start, in
//! parallel, and applied in order: the first transaction to consume an output
//! wins and later conflicting ones are recorded as failed.

pub mod error;
pub mod ledger;
pub mod utxo_set;

pub use error::LedgerError;
pub use ledger::{BlockOutcome, Ledger, Receipt, Snapshot};
pub use utxo_set::UtxoSet;
