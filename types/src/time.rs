//! Timestamps and the chain head.
//!
//! Timestamps are Unix epoch seconds (UTC). The chain head is advanced only by
//! block production; everything in the validation core treats it as input.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero).
    pub const EPOCH: Self = Self(0);

    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    /// Current system time. Falls back to the epoch if the clock is before it.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// This timestamp shifted forward by `secs`, saturating at `u64::MAX`.
    pub fn saturating_add(self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// The latest block known to this node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChainHead {
    /// Block number of the head.
    pub height: u64,
    /// Timestamp recorded in the head block.
    pub timestamp: Timestamp,
}

impl ChainHead {
    pub fn new(height: u64, timestamp: Timestamp) -> Self {
        Self { height, timestamp }
    }

    /// The head after one more block sealed at `timestamp`.
    pub fn next(&self, timestamp: Timestamp) -> Self {
        Self {
            height: self.height + 1,
            timestamp,
        }
    }
}

impl fmt::Display for ChainHead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}@{}", self.height, self.timestamp)
    }
}
