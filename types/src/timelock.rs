//! Per-input timelocks.
//!
//! A timelock is either absolute (`Block`, `Time`) or relative to the point at
//! which the spent output was created (`BlockAge`, `TimeAge`).

use serde::{Deserialize, Serialize};

use crate::{ChainHead, Timestamp};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timelock {
    /// Ready once the chain height reaches the given block number.
    Block(u64),
    /// Ready once the chain has advanced this many blocks past the output's creation.
    BlockAge(u64),
    /// Ready once the head timestamp reaches the given Unix time.
    Time(u64),
    /// Ready once this many seconds have passed since the output's creation.
    TimeAge(u64),
}

/// What a timelock demands of the chain head, after resolving relative locks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Requirement {
    Height(u64),
    Time(Timestamp),
}

impl Timelock {
    /// Numeric kind used by the `CHKTIMELOCK` opcode.
    pub fn from_kind(kind: u64, value: u64) -> Option<Self> {
        match kind {
            1 => Some(Self::Block(value)),
            2 => Some(Self::BlockAge(value)),
            3 => Some(Self::Time(value)),
            4 => Some(Self::TimeAge(value)),
            _ => None,
        }
    }

    pub fn kind(&self) -> u64 {
        match self {
            Self::Block(_) => 1,
            Self::BlockAge(_) => 2,
            Self::Time(_) => 3,
            Self::TimeAge(_) => 4,
        }
    }

    pub fn value(&self) -> u64 {
        match *self {
            Self::Block(v) | Self::BlockAge(v) | Self::Time(v) | Self::TimeAge(v) => v,
        }
    }

    /// Resolve the lock against the creation point of the output it guards.
    pub fn requirement(&self, created_height: u64, created_at: Timestamp) -> Requirement {
        match *self {
            Self::Block(h) => Requirement::Height(h),
            Self::BlockAge(a) => Requirement::Height(created_height.saturating_add(a)),
            Self::Time(t) => Requirement::Time(Timestamp::new(t)),
            Self::TimeAge(a) => Requirement::Time(created_at.saturating_add(a)),
        }
    }

    pub fn is_satisfied(&self, head: &ChainHead, created_height: u64, created_at: Timestamp) -> bool {
        match self.requirement(created_height, created_at) {
            Requirement::Height(h) => head.height >= h,
            Requirement::Time(t) => head.timestamp >= t,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn head(height: u64, ts: u64) -> ChainHead {
        ChainHead::new(height, Timestamp::new(ts))
    }

    #[test]
    fn block_lock() {
        let lock = Timelock::Block(3);
        assert!(!lock.is_satisfied(&head(2, 0), 0, Timestamp::EPOCH));
        assert!(lock.is_satisfied(&head(3, 0), 0, Timestamp::EPOCH));
    }

    #[test]
    fn block_age_is_relative_to_creation() {
        let lock = Timelock::BlockAge(5);
        assert!(!lock.is_satisfied(&head(14, 0), 10, Timestamp::EPOCH));
        assert!(lock.is_satisfied(&head(15, 0), 10, Timestamp::EPOCH));
    }

    #[test]
    fn time_locks() {
        assert!(!Timelock::Time(100).is_satisfied(&head(0, 99), 0, Timestamp::EPOCH));
        assert!(Timelock::Time(100).is_satisfied(&head(0, 100), 0, Timestamp::EPOCH));
        let age = Timelock::TimeAge(60);
        assert!(!age.is_satisfied(&head(0, 1059), 0, Timestamp::new(1000)));
        assert!(age.is_satisfied(&head(0, 1060), 0, Timestamp::new(1000)));
    }

    #[test]
    fn kind_roundtrip() {
        for lock in [
            Timelock::Block(1),
            Timelock::BlockAge(2),
            Timelock::Time(3),
            Timelock::TimeAge(4),
        ] {
            assert_eq!(Timelock::from_kind(lock.kind(), lock.value()), Some(lock));
        }
        assert_eq!(Timelock::from_kind(0, 1), None);
    }
}
