//! Script VM for the Tessera ledger.
//!
//! Each spent input is authorized by running its unlock script, followed by
//! the output's parameters, followed by its lock script, on a small stack
//! machine. The run succeeds only if it ends with exactly one truthy item.
//!
//! Signature-checking opcodes ask an [`ExecutionContext`] for the hash to
//! verify against, scoped by a [`Tag`] that the unlock script supplies.

pub mod config;
pub mod context;
pub mod error;
pub mod executor;
pub mod instruction;
pub mod standard;
pub mod tag;

pub use config::VmConfig;
pub use context::ExecutionContext;
pub use error::VmError;
pub use executor::{execute, ScriptResult};
pub use instruction::{decode, encode, Instruction};
pub use tag::{InputScope, OutputScope, Tag};
