//! 32-byte identifiers: transaction trackers, asset types and lock script hashes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypesError;

macro_rules! hash_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
        pub struct $name([u8; 32]);

        impl $name {
            pub const ZERO: Self = Self([0u8; 32]);

            pub fn new(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0 == [0u8; 32]
            }
        }

        impl TryFrom<&[u8]> for $name {
            type Error = TypesError;

            fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
                let arr: [u8; 32] = bytes.try_into().map_err(|_| TypesError::InvalidLength {
                    what: stringify!($name),
                    expected: 32,
                    actual: bytes.len(),
                })?;
                Ok(Self(arr))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({}\u{2026})", stringify!($name), hex::encode(&self.0[..4]))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", hex::encode(self.0))
            }
        }
    };
}

hash_type!(
    /// Identifies a transaction independently of its unlock scripts.
    ///
    /// Outputs created by a transaction are addressed as `(tracker, index)`.
    Tracker
);

hash_type!(
    /// Identifies an asset scheme. One per `(shard, mint transaction)`.
    AssetType
);

hash_type!(
    /// Commitment to a lock script: the Blake2b-256 hash of its bytes.
    LockScriptHash
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_from_rejects_wrong_length() {
        let err = Tracker::try_from(&[1u8; 31][..]).unwrap_err();
        assert_eq!(
            err,
            TypesError::InvalidLength {
                what: "Tracker",
                expected: 32,
                actual: 31
            }
        );
    }

    #[test]
    fn display_is_full_hex() {
        let t = AssetType::new([0xab; 32]);
        assert_eq!(t.to_string(), "ab".repeat(32));
    }

    #[test]
    fn debug_is_abbreviated() {
        let t = LockScriptHash::new([0x01; 32]);
        assert_eq!(format!("{:?}", t), "LockScriptHash(01010101\u{2026})");
    }
}
