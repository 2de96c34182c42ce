//! Stateful validation of transactions against one snapshot of the UTXO set.
//!
//! Checks run in a fixed order and the first failure wins, so every node
//! records the same error kind for the same transaction.

use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use crate::error::TransferError;
use crate::input::AssetTransferInput;
use crate::mint::MintAsset;
use crate::order::OrderOnTransfer;
use crate::output::AssetTransferOutput;
use crate::signing::{InputRef, TransferContext};
use crate::transfer::TransferAsset;
use crate::Transaction;
use tessera_crypto::lock_script_hash;
use tessera_store::{AssetScheme, AssetSchemeLookup, OutPointKey, UtxoLookup, UtxoRecord};
use tessera_types::{AssetType, ChainHead, LockScriptHash, ShardId, Tracker};
use tessera_vm::{execute, ScriptResult, VmConfig};

/// The state change of one valid transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UtxoDelta {
    pub tracker: Tracker,
    pub consumed: Vec<OutPointKey>,
    pub created: Vec<(OutPointKey, UtxoRecord)>,
    pub asset_scheme: Option<(AssetType, AssetScheme)>,
}

/// Validate `tx` for inclusion in the block whose head is `head`.
///
/// Outputs are created at `head`. Nothing is mutated; applying the returned
/// delta is up to the caller.
pub fn validate<S>(tx: &Transaction, state: &S, head: &ChainHead, config: &VmConfig) -> Result<UtxoDelta, TransferError>
where
    S: UtxoLookup + AssetSchemeLookup + ?Sized,
{
    match tx {
        Transaction::MintAsset(mint) => validate_mint(mint, state, head),
        Transaction::TransferAsset(transfer) => validate_transfer(transfer, state, head, config),
    }
}

pub fn validate_mint<S>(mint: &MintAsset, schemes: &S, head: &ChainHead) -> Result<UtxoDelta, TransferError>
where
    S: AssetSchemeLookup + ?Sized,
{
    if mint.supply == 0 {
        return Err(TransferError::InvalidMintSupply);
    }
    let asset_type = mint.asset_type();
    if schemes.asset_scheme_exists(&asset_type) {
        return Err(TransferError::AssetSchemeDuplicated(asset_type));
    }
    let tracker = mint.tracker();
    let record = UtxoRecord {
        asset_type,
        shard_id: mint.shard_id,
        quantity: mint.supply,
        lock_script_hash: mint.lock_script_hash,
        parameters: mint.parameters.clone(),
        creation_height: head.height,
        creation_time: head.timestamp,
    };
    let scheme = AssetScheme {
        shard_id: mint.shard_id,
        metadata: mint.metadata.clone(),
        supply: mint.supply,
        mint_tracker: tracker,
    };
    Ok(UtxoDelta {
        tracker,
        consumed: Vec::new(),
        created: vec![(OutPointKey::new(tracker, 0), record)],
        asset_scheme: Some((asset_type, scheme)),
    })
}

/// A spent input paired with the UTXO it resolved to.
struct Spent<'a> {
    at: InputRef,
    input: &'a AssetTransferInput,
    record: UtxoRecord,
}

pub fn validate_transfer<L>(tx: &TransferAsset, utxos: &L, head: &ChainHead, config: &VmConfig) -> Result<UtxoDelta, TransferError>
where
    L: UtxoLookup + ?Sized,
{
    tx.check_not_empty()?;
    tx.check_duplicate_prev_outs()?;
    check_expiration(tx, head)?;
    let spent = resolve(tx, utxos)?;
    check_timelocks(&spent, head)?;
    tx.check_output_quantities()?;
    check_conservation(tx)?;
    let fills = check_orders(tx, utxos, head)?;
    check_order_outputs(tx, &fills)?;
    unlock(tx, &spent, head, config)?;
    Ok(delta(tx, &spent, head))
}

fn resolve<'a, L>(tx: &'a TransferAsset, utxos: &L) -> Result<Vec<Spent<'a>>, TransferError>
where
    L: UtxoLookup + ?Sized,
{
    tx.spent()
        .map(|(at, input)| {
            let key = input.prev_out.key();
            let record = utxos
                .get_utxo(&key)
                .map_err(|_| TransferError::UtxoNotFound(key))?;
            if record.asset_type != input.prev_out.asset_type || record.shard_id != input.prev_out.shard_id {
                return Err(TransferError::AssetTypeMismatch {
                    key,
                    declared: input.prev_out.asset_type,
                    actual: record.asset_type,
                });
            }
            if record.quantity != input.prev_out.quantity {
                return Err(TransferError::QuantityMismatch {
                    key,
                    declared: input.prev_out.quantity,
                    actual: record.quantity,
                });
            }
            Ok(Spent { at, input, record })
        })
        .collect()
}

fn check_expiration(tx: &TransferAsset, head: &ChainHead) -> Result<(), TransferError> {
    match tx.expiration {
        Some(expiration) if head.timestamp > expiration => Err(TransferError::Expired {
            expiration,
            now: head.timestamp,
        }),
        _ => Ok(()),
    }
}

/// Every input and burn timelock must hold at `head`, relative locks counted
/// from the creation point of the output being spent.
fn check_timelocks(spent: &[Spent<'_>], head: &ChainHead) -> Result<(), TransferError> {
    for s in spent {
        if let Some(timelock) = s.input.timelock {
            if !timelock.is_satisfied(head, s.record.creation_height, s.record.creation_time) {
                return Err(TransferError::Timelocked { input: s.at, timelock });
            }
        }
    }
    Ok(())
}

/// Inputs and outputs must balance per asset type. Burns leave the ledger
/// and count on neither side.
fn check_conservation(tx: &TransferAsset) -> Result<(), TransferError> {
    let mut totals: BTreeMap<(AssetType, ShardId), (u128, u128)> = BTreeMap::new();
    for input in &tx.inputs {
        let prev = &input.prev_out;
        totals.entry((prev.asset_type, prev.shard_id)).or_default().0 += u128::from(prev.quantity);
    }
    for output in &tx.outputs {
        totals.entry((output.asset_type, output.shard_id)).or_default().1 += u128::from(output.quantity);
    }
    for ((asset_type, _), (input, output)) in totals {
        if input != output {
            return Err(TransferError::InconsistentInOut {
                asset_type,
                input,
                output,
            });
        }
    }
    Ok(())
}

/// What one order fill owes, computed while checking the order.
struct Fill {
    to_paid: u64,
    from_leftover: u64,
    fee_paid: u64,
    fee_leftover: u64,
}

fn check_orders<L>(tx: &TransferAsset, utxos: &L, head: &ChainHead) -> Result<Vec<Fill>, TransferError>
where
    L: UtxoLookup + ?Sized,
{
    let mut claimed_inputs = HashSet::new();
    let mut fills = Vec::with_capacity(tx.orders.len());
    for (index, order_tx) in tx.orders.iter().enumerate() {
        fills.push(check_order(tx, index, order_tx, utxos, head, &mut claimed_inputs)?);
    }
    Ok(fills)
}

fn check_order<L>(
    tx: &TransferAsset,
    index: usize,
    order_tx: &OrderOnTransfer,
    utxos: &L,
    head: &ChainHead,
    claimed_inputs: &mut HashSet<usize>,
) -> Result<Fill, TransferError>
where
    L: UtxoLookup + ?Sized,
{
    let order = &order_tx.order;
    order.check_quantities().map_err(|e| e.at(index))?;
    order.check_asset_types().map_err(|e| e.at(index))?;

    if order.is_expired_at(head.timestamp) {
        return Err(TransferError::OrderExpired {
            order: index,
            expiration: order.expiration,
            now: head.timestamp,
        });
    }

    for origin in &order.origin_outputs {
        let key = origin.key();
        let record = utxos.get_utxo(&key).map_err(|_| TransferError::UtxoNotFound(key))?;
        if record.lock_script_hash != order.lock_script_hash_from {
            return Err(TransferError::InvalidOrderLockScriptHash(index));
        }
        if record.parameters != order.parameters_from {
            return Err(TransferError::InvalidOrderParameters(index));
        }
    }

    let invalid_origin = |reason: String| TransferError::InvalidOriginOutputs { order: index, reason };
    if order_tx.input_indices.len() != order.origin_outputs.len() {
        return Err(invalid_origin(format!(
            "{} input indices for {} origin outputs",
            order_tx.input_indices.len(),
            order.origin_outputs.len()
        )));
    }
    let fee_type = order.fee.as_ref().map(|fee| fee.asset_type);
    let (mut from_in, mut fee_in) = (0u128, 0u128);
    for (&i, origin) in order_tx.input_indices.iter().zip(&order.origin_outputs) {
        let input = tx
            .inputs
            .get(i)
            .ok_or_else(|| invalid_origin(format!("input {i} out of range")))?;
        if &input.prev_out != origin {
            return Err(invalid_origin(format!("input {i} does not spend origin output {}", origin.key())));
        }
        if !claimed_inputs.insert(i) {
            return Err(invalid_origin(format!("input {i} is claimed twice")));
        }
        if origin.asset_type == order.asset_type_from {
            from_in += u128::from(origin.quantity);
        } else if Some(origin.asset_type) == fee_type {
            fee_in += u128::from(origin.quantity);
        } else {
            return Err(invalid_origin(format!("input {i} holds neither the offered nor the fee asset")));
        }
    }

    let spent = order_tx.spent_quantity;
    let invalid_spent = |reason: String| TransferError::InvalidSpentQuantity { order: index, reason };
    if u128::from(spent) > from_in {
        return Err(invalid_spent(format!("spends {spent} but origin inputs hold {from_in}")));
    }
    let to_paid = order.to_quantity_for(spent).map_err(|e| e.at(index))?;
    let fee_paid = order.fee_quantity_for(spent).map_err(|e| e.at(index))?;
    if u128::from(fee_paid) > fee_in {
        return Err(invalid_spent(format!("owes {fee_paid} in fees but origin inputs hold {fee_in}")));
    }

    // Both sums are bounded by the conserved output totals, which fit in u64.
    Ok(Fill {
        to_paid,
        from_leftover: (from_in - u128::from(spent)) as u64,
        fee_paid,
        fee_leftover: (fee_in - u128::from(fee_paid)) as u64,
    })
}

/// An output reduced to what an order cares about.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Payment<'a> {
    asset_type: AssetType,
    shard_id: ShardId,
    quantity: u64,
    lock_script_hash: &'a LockScriptHash,
    parameters: &'a [Vec<u8>],
}

impl<'a> From<&'a AssetTransferOutput> for Payment<'a> {
    fn from(output: &'a AssetTransferOutput) -> Self {
        Self {
            asset_type: output.asset_type,
            shard_id: output.shard_id,
            quantity: output.quantity,
            lock_script_hash: &output.lock_script_hash,
            parameters: &output.parameters,
        }
    }
}

fn required_payments<'a>(order_tx: &'a OrderOnTransfer, fill: &Fill) -> Vec<Payment<'a>> {
    let order = &order_tx.order;
    let maker = move |asset_type: AssetType, shard_id: ShardId, quantity: u64| Payment {
        asset_type,
        shard_id,
        quantity,
        lock_script_hash: &order.lock_script_hash_from,
        parameters: &order.parameters_from,
    };

    let mut required = vec![maker(order.asset_type_to, order.shard_id_to, fill.to_paid)];
    if fill.from_leftover > 0 {
        required.push(maker(order.asset_type_from, order.shard_id_from, fill.from_leftover));
    }
    if let Some(fee) = &order.fee {
        required.push(Payment {
            asset_type: fee.asset_type,
            shard_id: fee.shard_id,
            quantity: fill.fee_paid,
            lock_script_hash: &fee.lock_script_hash,
            parameters: &fee.parameters,
        });
        if fill.fee_leftover > 0 {
            required.push(maker(fee.asset_type, fee.shard_id, fill.fee_leftover));
        }
    }
    required
}

/// The outputs an order claims must be exactly the payments it owes.
fn check_order_outputs(tx: &TransferAsset, fills: &[Fill]) -> Result<(), TransferError> {
    let mut claimed_outputs = HashSet::new();
    for (index, (order_tx, fill)) in tx.orders.iter().zip(fills).enumerate() {
        let inconsistent = |reason: String| TransferError::InconsistentInOutWithOrders { order: index, reason };

        let mut claimed = Vec::with_capacity(order_tx.output_indices.len());
        for &i in &order_tx.output_indices {
            let output = tx
                .outputs
                .get(i)
                .ok_or_else(|| inconsistent(format!("output {i} out of range")))?;
            if !claimed_outputs.insert(i) {
                return Err(inconsistent(format!("output {i} is claimed twice")));
            }
            claimed.push(Payment::from(output));
        }

        let mut required = required_payments(order_tx, fill);
        claimed.sort();
        required.sort();
        if claimed != required {
            return Err(inconsistent(format!(
                "claims {} outputs that do not match the {} payments owed",
                claimed.len(),
                required.len()
            )));
        }
    }
    Ok(())
}

fn unlock(tx: &TransferAsset, spent: &[Spent<'_>], head: &ChainHead, config: &VmConfig) -> Result<(), TransferError> {
    for Spent { at, input, record } in spent {
        if lock_script_hash(&input.lock_script) != record.lock_script_hash {
            return Err(TransferError::LockScriptHashMismatch(*at));
        }
        let context = TransferContext::new(tx, *at, *head, (record.creation_height, record.creation_time));
        if let ScriptResult::Fail(reason) = execute(&input.unlock_script, &record.parameters, &input.lock_script, &context, config) {
            debug!(input = %at, error = %reason, "script failed to unlock");
            return Err(TransferError::ScriptUnlockFailed { input: *at, reason });
        }
    }
    Ok(())
}

fn delta(tx: &TransferAsset, spent: &[Spent<'_>], head: &ChainHead) -> UtxoDelta {
    let tracker = tx.tracker();
    let created = tx
        .outputs
        .iter()
        .enumerate()
        .map(|(i, output)| {
            let record = UtxoRecord {
                asset_type: output.asset_type,
                shard_id: output.shard_id,
                quantity: output.quantity,
                lock_script_hash: output.lock_script_hash,
                parameters: output.parameters.clone(),
                creation_height: head.height,
                creation_time: head.timestamp,
            };
            (OutPointKey::new(tracker, i as u32), record)
        })
        .collect();
    UtxoDelta {
        tracker,
        consumed: spent.iter().map(|s| s.input.prev_out.key()).collect(),
        created,
        asset_scheme: None,
    }
}
