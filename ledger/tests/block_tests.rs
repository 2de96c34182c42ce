//! Block application, verdicts and snapshot isolation.

use tessera_crypto::lock_script_hash;
use tessera_ledger::{Ledger, LedgerError};
use tessera_store::{UtxoLookup, VerdictLookup};
use tessera_transactions::{
    AssetOutPoint, AssetTransferInput, AssetTransferOutput, InputRef, MintAsset, Transaction, TransferAsset,
    TransferError,
};
use tessera_types::{AssetType, ChainHead, NetworkId, Timelock, Timestamp, Tracker};
use tessera_vm::standard::{free_lock, hashlock, hashlock_unlock};
use tessera_vm::VmConfig;

fn ledger() -> Ledger {
    Ledger::new(NetworkId::Dev, VmConfig::default(), 512, ChainHead::new(0, Timestamp::new(1_000)))
}

fn mint(metadata: &str, supply: u64) -> MintAsset {
    MintAsset {
        network_id: NetworkId::Dev,
        shard_id: 0,
        metadata: metadata.into(),
        lock_script_hash: lock_script_hash(&free_lock()),
        parameters: vec![],
        supply,
        fee: 10,
        seq: 0,
    }
}

fn minted(mint: &MintAsset) -> AssetOutPoint {
    AssetOutPoint {
        tracker: mint.tracker(),
        index: 0,
        asset_type: mint.asset_type(),
        shard_id: mint.shard_id,
        quantity: mint.supply,
    }
}

/// Spend `prev_out` (free lock) into one output, tagged with `seq` so
/// otherwise identical transfers get distinct trackers.
fn send(prev_out: AssetOutPoint, seq: u64) -> TransferAsset {
    TransferAsset {
        network_id: NetworkId::Dev,
        burns: vec![],
        outputs: vec![AssetTransferOutput {
            lock_script_hash: lock_script_hash(&free_lock()),
            parameters: vec![],
            asset_type: prev_out.asset_type,
            shard_id: prev_out.shard_id,
            quantity: prev_out.quantity,
        }],
        inputs: vec![AssetTransferInput {
            prev_out,
            timelock: None,
            lock_script: free_lock(),
            unlock_script: vec![],
        }],
        orders: vec![],
        fee: 10,
        seq,
        expiration: None,
    }
}

fn output_of(tx: &TransferAsset, index: u32) -> AssetOutPoint {
    let output = &tx.outputs[index as usize];
    AssetOutPoint {
        tracker: tx.tracker(),
        index,
        asset_type: output.asset_type,
        shard_id: output.shard_id,
        quantity: output.quantity,
    }
}

#[test]
fn mint_then_transfer_across_blocks() {
    let ledger = ledger();
    let gold = mint("gold", 10_000);
    let outcome = ledger.apply_block(Timestamp::new(1_010), &[gold.clone().into()]).unwrap();
    assert_eq!(outcome.head, ChainHead::new(1, Timestamp::new(1_010)));
    assert_eq!(outcome.succeeded(), 1);

    let tx = send(minted(&gold), 0);
    let outcome = ledger.apply_block(Timestamp::new(1_020), &[tx.clone().into()]).unwrap();
    assert_eq!(outcome.failed(), 0);

    let snapshot = ledger.snapshot();
    assert!(!snapshot.contains_utxo(&minted(&gold).key()));
    let created = snapshot.get_utxo(&output_of(&tx, 0).key()).unwrap();
    assert_eq!(created.creation_height, 2);
    assert_eq!(created.creation_time, Timestamp::new(1_020));

    let verdict = ledger.get_verdict(&tx.tracker()).unwrap();
    assert!(verdict.included && verdict.success);
    assert_eq!(verdict.block_height, Some(2));
}

#[test]
fn first_spend_in_block_wins() {
    let ledger = ledger();
    let gold = mint("gold", 100);
    ledger.apply_block(Timestamp::new(1_010), &[gold.clone().into()]).unwrap();

    let first = send(minted(&gold), 1);
    let second = send(minted(&gold), 2);
    let outcome = ledger
        .apply_block(Timestamp::new(1_020), &[first.clone().into(), second.clone().into()])
        .unwrap();
    assert!(outcome.receipts[0].is_success());
    assert_eq!(
        outcome.receipts[1].error,
        Some(TransferError::DoubleSpendInBlock(minted(&gold).key()))
    );

    let verdict = ledger.get_verdict(&second.tracker()).unwrap();
    assert!(verdict.included && !verdict.success);
    assert_eq!(verdict.error_kind.as_deref(), Some("DoubleSpendInBlock"));
    assert!(ledger.snapshot().contains_utxo(&output_of(&first, 0).key()));
}

#[test]
fn outputs_are_not_spendable_in_their_own_block() {
    let ledger = ledger();
    let gold = mint("gold", 100);
    ledger.apply_block(Timestamp::new(1_010), &[gold.clone().into()]).unwrap();

    let parent = send(minted(&gold), 0);
    let child = send(output_of(&parent, 0), 0);
    let outcome = ledger
        .apply_block(Timestamp::new(1_020), &[parent.clone().into(), child.clone().into()])
        .unwrap();
    assert!(outcome.receipts[0].is_success());
    assert_eq!(outcome.receipts[1].error.as_ref().map(TransferError::kind), Some("UtxoNotFound"));

    // A fresh copy of the child in the next block succeeds.
    let retry = send(output_of(&parent, 0), 1);
    let outcome = ledger.apply_block(Timestamp::new(1_030), &[retry.into()]).unwrap();
    assert_eq!(outcome.failed(), 0);
}

#[test]
fn included_transaction_is_never_reapplied() {
    let ledger = ledger();
    let gold = mint("gold", 100);
    ledger.apply_block(Timestamp::new(1_010), &[gold.clone().into()]).unwrap();

    let outcome = ledger.apply_block(Timestamp::new(1_020), &[gold.clone().into()]).unwrap();
    assert_eq!(outcome.receipts[0].error, Some(TransferError::AlreadyIncluded));
    let verdict = ledger.get_verdict(&gold.tracker()).unwrap();
    assert!(verdict.success);
    assert_eq!(verdict.block_height, Some(1));
}

#[test]
fn failed_script_is_recorded_without_state_change() {
    let ledger = ledger();
    let secret = tessera_crypto::blake2b_256(b"opening words");
    let locked = MintAsset {
        lock_script_hash: lock_script_hash(&hashlock(&secret)),
        ..mint("vault", 50)
    };
    ledger.apply_block(Timestamp::new(1_010), &[locked.clone().into()]).unwrap();
    let before = ledger.snapshot().utxos.digest();

    let mut wrong = send(minted(&locked), 0);
    wrong.inputs[0].lock_script = hashlock(&secret);
    wrong.inputs[0].unlock_script = hashlock_unlock(b"wrong words");
    let outcome = ledger.apply_block(Timestamp::new(1_020), &[wrong.clone().into()]).unwrap();
    assert_eq!(outcome.failed(), 1);
    assert_eq!(ledger.snapshot().utxos.digest(), before);
    let verdict = ledger.get_verdict(&wrong.tracker()).unwrap();
    assert_eq!(verdict.error_kind.as_deref(), Some("ScriptUnlockFailed"));

    let mut right = wrong;
    right.seq = 1;
    right.inputs[0].unlock_script = hashlock_unlock(b"opening words");
    let outcome = ledger.apply_block(Timestamp::new(1_030), &[right.into()]).unwrap();
    assert_eq!(outcome.failed(), 0);
}

#[test]
fn unripe_timelock_fails_in_block() {
    let ledger = ledger();
    let gold = mint("gold", 100);
    ledger.apply_block(Timestamp::new(1_010), &[gold.clone().into()]).unwrap();
    let before = ledger.snapshot().utxos.digest();

    let mut early = send(minted(&gold), 0);
    early.inputs[0].timelock = Some(Timelock::Block(1_000));
    let outcome = ledger.apply_block(Timestamp::new(5_000), &[early.clone().into()]).unwrap();
    assert_eq!(
        outcome.receipts[0].error,
        Some(TransferError::Timelocked {
            input: InputRef::Input(0),
            timelock: Timelock::Block(1_000),
        })
    );
    assert_eq!(ledger.snapshot().utxos.digest(), before);
    assert_eq!(ledger.get_verdict(&early.tracker()).unwrap().error_kind.as_deref(), Some("Timelocked"));

    // Created at height 1: BlockAge(2) holds from height 3, the next block.
    let mut aged = send(minted(&gold), 1);
    aged.inputs[0].timelock = Some(Timelock::BlockAge(2));
    let outcome = ledger.apply_block(Timestamp::new(5_010), &[aged.into()]).unwrap();
    assert_eq!(outcome.head.height, 3);
    assert_eq!(outcome.failed(), 0);
}

#[test]
fn timelocked_burn_fails_in_block() {
    let ledger = ledger();
    let gold = mint("gold", 100);
    ledger.apply_block(Timestamp::new(1_010), &[gold.clone().into()]).unwrap();

    let mut burn = send(minted(&gold), 0);
    let mut spent = burn.inputs.remove(0);
    spent.timelock = Some(Timelock::Time(9_999));
    burn.burns.push(spent);
    burn.outputs.clear();
    let outcome = ledger.apply_block(Timestamp::new(1_020), &[burn.into()]).unwrap();
    assert_eq!(
        outcome.receipts[0].error,
        Some(TransferError::Timelocked {
            input: InputRef::Burn(0),
            timelock: Timelock::Time(9_999),
        })
    );
    assert!(ledger.snapshot().contains_utxo(&minted(&gold).key()));
}

#[test]
fn expired_transaction_fails_in_block() {
    let ledger = ledger();
    let gold = mint("gold", 100);
    ledger.apply_block(Timestamp::new(1_010), &[gold.clone().into()]).unwrap();

    let mut late = send(minted(&gold), 0);
    late.expiration = Some(Timestamp::new(1_011));
    let outcome = ledger.apply_block(Timestamp::new(1_012), &[late.clone().into()]).unwrap();
    assert_eq!(
        outcome.receipts[0].error,
        Some(TransferError::Expired {
            expiration: Timestamp::new(1_011),
            now: Timestamp::new(1_012),
        })
    );
    assert!(ledger.snapshot().contains_utxo(&minted(&gold).key()));

    // Expiring exactly at the block time is still in time.
    let mut on_time = send(minted(&gold), 1);
    on_time.expiration = Some(Timestamp::new(1_020));
    let outcome = ledger.apply_block(Timestamp::new(1_020), &[on_time.into()]).unwrap();
    assert_eq!(outcome.failed(), 0);
}

#[test]
fn foreign_network_transaction_fails() {
    let ledger = ledger();
    let foreign = MintAsset {
        network_id: NetworkId::Live,
        ..mint("gold", 100)
    };
    let outcome = ledger.apply_block(Timestamp::new(1_010), &[foreign.into()]).unwrap();
    assert_eq!(outcome.receipts[0].error.as_ref().map(TransferError::kind), Some("InvalidNetworkId"));
}

#[test]
fn snapshots_are_isolated_from_later_blocks() {
    let ledger = ledger();
    let gold = mint("gold", 100);
    let before = ledger.snapshot();
    ledger.apply_block(Timestamp::new(1_010), &[gold.clone().into()]).unwrap();

    assert!(!before.contains_utxo(&minted(&gold).key()));
    assert!(ledger.snapshot().contains_utxo(&minted(&gold).key()));
    assert_eq!(before.head.height, 0);
}

#[test]
fn block_level_rules() {
    let ledger = ledger();
    assert!(matches!(
        ledger.apply_block(Timestamp::new(999), &[]),
        Err(LedgerError::TimestampRegression { .. })
    ));

    let small = Ledger::new(NetworkId::Dev, VmConfig::default(), 1, ChainHead::default());
    let txs: Vec<Transaction> = vec![mint("a", 1).into(), mint("b", 1).into()];
    assert!(matches!(
        small.apply_block(Timestamp::new(1), &txs),
        Err(LedgerError::TooManyTransactions { count: 2, max: 1 })
    ));
    assert_eq!(small.head(), ChainHead::default());
}

#[test]
fn independent_ledgers_agree() {
    let gold = mint("gold", 100);
    let silver = mint("silver", 100);
    let blocks: Vec<Vec<Transaction>> = vec![
        vec![gold.clone().into(), silver.clone().into()],
        vec![send(minted(&gold), 0).into(), send(minted(&gold), 1).into(), send(minted(&silver), 0).into()],
    ];

    let digests: Vec<[u8; 32]> = (0..2)
        .map(|_| {
            let ledger = ledger();
            let mut digest = [0u8; 32];
            for (i, block) in blocks.iter().enumerate() {
                digest = ledger
                    .apply_block(Timestamp::new(1_010 + i as u64), block)
                    .unwrap()
                    .state_digest;
            }
            digest
        })
        .collect();
    assert_eq!(digests[0], digests[1]);
}

#[test]
fn unknown_transaction_has_no_verdict() {
    let ledger = ledger();
    let never = send(
        AssetOutPoint {
            tracker: Tracker::new([7; 32]),
            index: 0,
            asset_type: AssetType::new([1; 32]),
            shard_id: 0,
            quantity: 1,
        },
        0,
    );
    assert!(ledger.get_verdict(&never.tracker()).is_none());
}
