//! Builders for the common lock/unlock script pairs.

use tessera_types::{PublicKey, Signature};

use crate::instruction::{encode, Instruction};
use crate::Tag;

/// A lock anyone can spend. Useful for tests and for burn-only outputs.
pub fn free_lock() -> Vec<u8> {
    encode(&[Instruction::Push(1)])
}

/// Pay to public key: `PUSHB <pk> CHKSIG`.
pub fn p2pk_lock(key: &PublicKey) -> Vec<u8> {
    encode(&[Instruction::PushB(key.0.to_vec()), Instruction::ChkSig])
}

pub fn p2pk_unlock(tag: &Tag, signature: &Signature) -> Vec<u8> {
    encode(&[
        Instruction::PushB(tag.encode()),
        Instruction::PushB(signature.0.to_vec()),
    ])
}

/// `threshold`-of-`keys.len()` multisig. Signatures must be supplied in the
/// same order as `keys`.
///
/// # Panics
///
/// Panics if more than 255 keys are given; the key count is pushed as a
/// single byte.
pub fn multisig_lock(threshold: u8, keys: &[PublicKey]) -> Vec<u8> {
    let Ok(count) = u8::try_from(keys.len()) else {
        panic!("multisig over {} keys has no encoding, at most 255", keys.len());
    };
    let mut program = vec![Instruction::Push(threshold)];
    program.extend(keys.iter().map(|k| Instruction::PushB(k.0.to_vec())));
    program.push(Instruction::Push(count));
    program.push(Instruction::ChkMultiSig);
    encode(&program)
}

pub fn multisig_unlock(tag: &Tag, signatures: &[Signature]) -> Vec<u8> {
    let mut program = vec![Instruction::PushB(tag.encode())];
    program.extend(signatures.iter().map(|s| Instruction::PushB(s.0.to_vec())));
    encode(&program)
}

/// Spendable by revealing the Blake2b-256 preimage of `hash`.
pub fn hashlock(hash: &[u8; 32]) -> Vec<u8> {
    encode(&[
        Instruction::Blake256,
        Instruction::PushB(hash.to_vec()),
        Instruction::Eq,
    ])
}

pub fn hashlock_unlock(preimage: &[u8]) -> Vec<u8> {
    encode(&[Instruction::PushB(preimage.to_vec())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::decode;

    #[test]
    fn multisig_lock_pushes_key_count() {
        let keys = vec![PublicKey([3; 32]); 255];
        let program = decode(&multisig_lock(1, &keys)).unwrap();
        assert_eq!(program[program.len() - 2], Instruction::Push(255));
        assert_eq!(program.last(), Some(&Instruction::ChkMultiSig));
    }

    #[test]
    #[should_panic(expected = "multisig over 256 keys")]
    fn multisig_lock_rejects_more_than_255_keys() {
        let keys = vec![PublicKey([3; 32]); 256];
        let _ = multisig_lock(1, &keys);
    }
}
