//! Fundamental types for the Tessera asset ledger.
//!
//! This crate defines the identifiers and primitives shared by every other
//! crate in the workspace: trackers, asset types, lock script hashes, keys,
//! network identifiers, timestamps, timelocks and the chain head.

pub mod error;
pub mod hash;
pub mod keys;
pub mod network;
pub mod time;
pub mod timelock;

pub use error::TypesError;
pub use hash::{AssetType, LockScriptHash, Tracker};
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use network::NetworkId;
pub use time::{ChainHead, Timestamp};
pub use timelock::{Requirement, Timelock};

/// Identifies the shard an asset scheme lives on.
pub type ShardId = u16;
