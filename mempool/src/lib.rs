//! Admission control for pending transactions.
//!
//! A transaction arriving at the node is either rejected (fee below the local
//! floor, malformed, expired, conflicting) or queued. Transactions whose
//! input timelocks are all satisfied by the current chain head sit in the
//! **current** queue and are handed to block assembly; the rest wait in the
//! **future** queue and are promoted as the head advances. A transaction
//! whose expiration passes while it is pending is dropped for good.

pub mod config;
pub mod error;
pub mod pool;
pub mod readiness;

pub use config::MempoolConfig;
pub use error::MempoolError;
pub use pool::{HeadUpdate, Queue, TransactionPool};
pub use readiness::{readiness, Readiness};
