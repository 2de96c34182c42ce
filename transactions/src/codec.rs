//! Canonical binary encoding of transactions.
//!
//! Fixed-width little-endian integers, length-prefixed sequences and a `u32`
//! variant tag in front of every enum value. The bytes are hashed into
//! trackers and signing hashes, so this layout must never change.

use bincode::Options;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::TransferError;

/// Largest encoded transaction accepted by [`decode`].
pub const MAX_ENCODED_LEN: u64 = 1 << 20;

pub fn encode<T: Serialize>(value: &T) -> Vec<u8> {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .serialize(value)
        .expect("transaction types have only fixed-length fields and sized sequences")
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, TransferError> {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .with_limit(MAX_ENCODED_LEN)
        .reject_trailing_bytes()
        .deserialize(bytes)
        .map_err(|e| TransferError::Decode(e.to_string()))
}
