//! Signature-checking opcodes against a context with a fixed signing hash.

use tessera_crypto::{blake2b_256, keypair_from_seed, sign_message};
use tessera_types::{ChainHead, KeyPair, Signature, Timestamp};
use tessera_vm::standard::{
    hashlock, hashlock_unlock, multisig_lock, multisig_unlock, p2pk_lock, p2pk_unlock,
};
use tessera_vm::{execute, ExecutionContext, ScriptResult, Tag, VmConfig, VmError};

/// Hash depends on the tag so a signature made under one tag fails under another.
struct TagHashContext;

impl ExecutionContext for TagHashContext {
    fn signing_hash(&self, tag: &Tag) -> Result<[u8; 32], VmError> {
        if tag.covers_output(99) && tag != &Tag::all() {
            return Err(VmError::InvalidTag("output 99 does not exist".into()));
        }
        Ok(blake2b_256(&[b"tx".as_slice(), &tag.encode()].concat()))
    }

    fn chain_head(&self) -> ChainHead {
        ChainHead::new(1, Timestamp::new(100))
    }

    fn spent_output_origin(&self) -> (u64, Timestamp) {
        (0, Timestamp::EPOCH)
    }
}

fn keys() -> Vec<KeyPair> {
    (1..=3u8).map(|i| keypair_from_seed(&[i; 32])).collect()
}

fn sign(kp: &KeyPair, tag: &Tag) -> Signature {
    let hash = TagHashContext.signing_hash(tag).unwrap();
    sign_message(&hash, &kp.private)
}

fn run(unlock: &[u8], lock: &[u8]) -> ScriptResult {
    execute(unlock, &[], lock, &TagHashContext, &VmConfig::default())
}

#[test]
fn two_of_three_in_key_order_unlocks() {
    let keys = keys();
    let publics: Vec<_> = keys.iter().map(|k| k.public.clone()).collect();
    let lock = multisig_lock(2, &publics);
    let tag = Tag::all();

    for (a, b) in [(0, 1), (0, 2), (1, 2)] {
        let unlock = multisig_unlock(&tag, &[sign(&keys[a], &tag), sign(&keys[b], &tag)]);
        assert!(run(&unlock, &lock).is_unlocked(), "keys {a},{b} should unlock");
    }
}

#[test]
fn two_of_three_out_of_order_fails() {
    let keys = keys();
    let publics: Vec<_> = keys.iter().map(|k| k.public.clone()).collect();
    let lock = multisig_lock(2, &publics);
    let tag = Tag::all();

    // Key 2 then key 1: both signatures valid, order wrong.
    let unlock = multisig_unlock(&tag, &[sign(&keys[1], &tag), sign(&keys[0], &tag)]);
    assert_eq!(run(&unlock, &lock), ScriptResult::Fail(VmError::FalseResult));
}

#[test]
fn same_key_twice_fails() {
    let keys = keys();
    let publics: Vec<_> = keys.iter().map(|k| k.public.clone()).collect();
    let lock = multisig_lock(2, &publics);
    let tag = Tag::all();
    let sig = sign(&keys[0], &tag);

    let unlock = multisig_unlock(&tag, &[sig.clone(), sig]);
    assert_eq!(run(&unlock, &lock), ScriptResult::Fail(VmError::FalseResult));
}

#[test]
fn unknown_key_fails() {
    let keys = keys();
    let publics: Vec<_> = keys.iter().map(|k| k.public.clone()).collect();
    let lock = multisig_lock(2, &publics);
    let tag = Tag::all();
    let stranger = keypair_from_seed(&[9; 32]);

    let unlock = multisig_unlock(&tag, &[sign(&keys[0], &tag), sign(&stranger, &tag)]);
    assert_eq!(run(&unlock, &lock), ScriptResult::Fail(VmError::FalseResult));
}

#[test]
fn too_few_or_too_many_signatures_fail() {
    let keys = keys();
    let publics: Vec<_> = keys.iter().map(|k| k.public.clone()).collect();
    let lock = multisig_lock(2, &publics);
    let tag = Tag::all();

    // One signature: the tag blob is consumed as the second "signature".
    let unlock = multisig_unlock(&tag, &[sign(&keys[0], &tag)]);
    assert!(!run(&unlock, &lock).is_unlocked());

    // Three signatures: one extra item remains below the result.
    let sigs: Vec<_> = keys.iter().map(|k| sign(k, &tag)).collect();
    let unlock = multisig_unlock(&tag, &sigs);
    assert!(!run(&unlock, &lock).is_unlocked());
}

#[test]
fn signature_under_other_tag_fails() {
    let kp = keypair_from_seed(&[1; 32]);
    let lock = p2pk_lock(&kp.public);
    let signed_tag = Tag::single_input_with_outputs([0]);
    let sig = sign(&kp, &signed_tag);

    assert!(run(&p2pk_unlock(&signed_tag, &sig), &lock).is_unlocked());
    let unlock = p2pk_unlock(&Tag::all(), &sig);
    assert_eq!(run(&unlock, &lock), ScriptResult::Fail(VmError::FalseResult));
}

#[test]
fn tag_rejected_by_context_fails_input() {
    let kp = keypair_from_seed(&[1; 32]);
    let tag = Tag::single_input_with_outputs([99]);
    let unlock = p2pk_unlock(&tag, &Signature([0; 64]));
    assert!(matches!(
        run(&unlock, &p2pk_lock(&kp.public)),
        ScriptResult::Fail(VmError::InvalidTag(_))
    ));
}

#[test]
fn hashlock_requires_preimage() {
    let lock = hashlock(&blake2b_256(b"open sesame"));
    assert!(run(&hashlock_unlock(b"open sesame"), &lock).is_unlocked());
    assert!(!run(&hashlock_unlock(b"open barley"), &lock).is_unlocked());
}
