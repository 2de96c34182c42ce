//! Cryptographic primitives for the Tessera ledger.
//!
//! - **Ed25519** for signing and signature verification
//! - **Blake2b-256** for trackers, asset types, lock script hashes and signing hashes
//! - **SHA-256** for the script VM's `SHA256` opcode

pub mod hash;
pub mod keys;
pub mod sign;

pub use hash::{blake2b_256, blake2b_256_multi, lock_script_hash, sha256};
pub use keys::{generate_keypair, keypair_from_private, keypair_from_seed, public_from_private};
pub use sign::{sign_message, verify_signature};
