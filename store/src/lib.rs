//! Storage contracts for the Tessera ledger.
//!
//! The validation core reads state only through these traits. The ledger
//! crate provides the in-memory versioned implementation; tests use the
//! nullable stores.

pub mod asset;
pub mod error;
pub mod utxo;
pub mod verdict;

pub use asset::{AssetScheme, AssetSchemeLookup};
pub use error::StoreError;
pub use utxo::{OutPointKey, UtxoLookup, UtxoRecord};
pub use verdict::{Verdict, VerdictLookup};
