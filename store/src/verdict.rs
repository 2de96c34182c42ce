//! Per-transaction outcome recorded at inclusion.

use serde::{Deserialize, Serialize};

use tessera_types::Tracker;

/// What the chain says about a transaction.
///
/// A transaction that was included but failed validation stays failed: its
/// fee is consumed and it is never retried.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub included: bool,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    /// Block that included the transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_height: Option<u64>,
}

impl Verdict {
    pub fn succeeded(block_height: u64) -> Self {
        Self {
            included: true,
            success: true,
            error_kind: None,
            block_height: Some(block_height),
        }
    }

    pub fn failed(block_height: u64, error_kind: impl Into<String>) -> Self {
        Self {
            included: true,
            success: false,
            error_kind: Some(error_kind.into()),
            block_height: Some(block_height),
        }
    }

    /// The answer for a transaction the chain has never included.
    pub fn not_included() -> Self {
        Self {
            included: false,
            success: false,
            error_kind: None,
            block_height: None,
        }
    }
}

pub trait VerdictLookup {
    fn get_verdict(&self, tracker: &Tracker) -> Option<Verdict>;
}
