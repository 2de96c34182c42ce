//! Nullable chain head: a head that only moves when told to.

use std::cell::Cell;
use tessera_types::{ChainHead, Timestamp};

/// A deterministic chain head for testing.
pub struct NullChain {
    height: Cell<u64>,
    timestamp: Cell<u64>,
}

impl NullChain {
    pub fn new(height: u64, timestamp_secs: u64) -> Self {
        Self {
            height: Cell::new(height),
            timestamp: Cell::new(timestamp_secs),
        }
    }

    pub fn head(&self) -> ChainHead {
        ChainHead::new(self.height.get(), Timestamp::new(self.timestamp.get()))
    }

    /// Produce one block `secs` after the current one.
    pub fn advance(&self, secs: u64) -> ChainHead {
        self.height.set(self.height.get() + 1);
        self.timestamp.set(self.timestamp.get() + secs);
        self.head()
    }

    /// Jump straight to a given head.
    pub fn set(&self, height: u64, timestamp_secs: u64) {
        self.height.set(height);
        self.timestamp.set(timestamp_secs);
    }
}

impl Default for NullChain {
    fn default() -> Self {
        Self::new(0, 0)
    }
}
