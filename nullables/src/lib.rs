//! Nullable infrastructure for deterministic testing.
//!
//! Inspired by the "A-frame architecture" pattern from RsNano.
//! The collaborators of the validation core (chain head, UTXO storage, key
//! material) get test-friendly implementations here that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod chain;
pub mod keys;
pub mod store;

pub use chain::NullChain;
pub use keys::NullKeys;
pub use store::NullUtxoStore;
