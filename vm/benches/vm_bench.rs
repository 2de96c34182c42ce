use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tessera_crypto::{blake2b_256, keypair_from_seed, sign_message};
use tessera_types::{ChainHead, Timestamp};
use tessera_vm::standard::{multisig_lock, multisig_unlock};
use tessera_vm::{execute, ExecutionContext, Tag, VmConfig, VmError};

struct Fixed;

impl ExecutionContext for Fixed {
    fn signing_hash(&self, tag: &Tag) -> Result<[u8; 32], VmError> {
        Ok(blake2b_256(&tag.encode()))
    }

    fn chain_head(&self) -> ChainHead {
        ChainHead::default()
    }

    fn spent_output_origin(&self) -> (u64, Timestamp) {
        (0, Timestamp::EPOCH)
    }
}

fn bench_multisig(c: &mut Criterion) {
    let keys: Vec<_> = (1..=3u8).map(|i| keypair_from_seed(&[i; 32])).collect();
    let publics: Vec<_> = keys.iter().map(|k| k.public.clone()).collect();
    let tag = Tag::all();
    let hash = Fixed.signing_hash(&tag).unwrap();
    let sigs = vec![
        sign_message(&hash, &keys[0].private),
        sign_message(&hash, &keys[2].private),
    ];
    let lock = multisig_lock(2, &publics);
    let unlock = multisig_unlock(&tag, &sigs);
    let config = VmConfig::default();

    c.bench_function("chkmultisig_2_of_3", |b| {
        b.iter(|| execute(black_box(&unlock), &[], black_box(&lock), &Fixed, &config))
    });
}

criterion_group!(benches, bench_multisig);
criterion_main!(benches);
