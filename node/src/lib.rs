//! Tessera node: wires admission control and the ledger together.
//!
//! The node:
//! - Accepts transactions (typed or encoded) into the mempool
//! - Assembles blocks from the current queue
//! - Applies blocks to the UTXO ledger and records verdicts
//! - Moves the mempool forward as the chain head advances
//!
//! The crate is a library; it installs no tracing subscriber on its own.
//! An embedding process calls [`NodeConfig::init_logging`] (or
//! [`init_logging`] directly) once at startup.

pub mod config;
pub mod error;
pub mod logging;
pub mod node;

pub use config::NodeConfig;
pub use error::NodeError;
pub use logging::{init_logging, LogFormat};
pub use node::Node;
