//! Standing exchange offers and their partial fills.
//!
//! An [`Order`] is a maker's offer to give `asset_quantity_from` units of one
//! asset for `asset_quantity_to` units of another at a fixed ratio, optionally
//! paying a fee leg in a third asset. Filling part of an order never mutates
//! it: [`Order::consume`] returns the remainder as a new value.

use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::TransferError;
use crate::outpoint::AssetOutPoint;
use tessera_crypto::blake2b_256;
use tessera_types::{AssetType, LockScriptHash, ShardId, Timestamp};

/// The fee leg of an order, paid out of the maker's origin outputs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFee {
    pub asset_type: AssetType,
    pub shard_id: ShardId,
    pub quantity: u64,
    /// Recipient commitment of the fee.
    pub lock_script_hash: LockScriptHash,
    pub parameters: Vec<Vec<u8>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub asset_type_from: AssetType,
    pub shard_id_from: ShardId,
    pub asset_quantity_from: u64,
    pub asset_type_to: AssetType,
    pub shard_id_to: ShardId,
    pub asset_quantity_to: u64,
    pub fee: Option<OrderFee>,
    pub expiration: Timestamp,
    pub origin_outputs: Vec<AssetOutPoint>,
    /// Maker commitment: locks the origin outputs and receives the proceeds
    /// and any leftovers.
    pub lock_script_hash_from: LockScriptHash,
    pub parameters_from: Vec<Vec<u8>>,
}

/// Order-level failures, independent of where the order sits in a transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OrderError {
    AssetQuantities,
    AssetTypes,
    SpentQuantity(String),
}

impl OrderError {
    /// Attach the position of the order within its transaction.
    pub fn at(self, order: usize) -> TransferError {
        match self {
            Self::AssetQuantities => TransferError::InvalidOrderAssetQuantities(order),
            Self::AssetTypes => TransferError::InvalidOrderAssetTypes(order),
            Self::SpentQuantity(reason) => TransferError::InvalidSpentQuantity { order, reason },
        }
    }
}

impl Order {
    pub fn hash(&self) -> [u8; 32] {
        blake2b_256(&codec::encode(self))
    }

    pub fn fee_quantity(&self) -> u64 {
        self.fee.as_ref().map_or(0, |fee| fee.quantity)
    }

    pub fn is_exhausted(&self) -> bool {
        self.asset_quantity_from == 0
    }

    pub fn check_quantities(&self) -> Result<(), OrderError> {
        if self.asset_quantity_from == 0 || self.asset_quantity_to == 0 {
            return Err(OrderError::AssetQuantities);
        }
        if matches!(&self.fee, Some(fee) if fee.quantity == 0) {
            return Err(OrderError::AssetQuantities);
        }
        Ok(())
    }

    /// The three legs must name three distinct asset types.
    pub fn check_asset_types(&self) -> Result<(), OrderError> {
        if self.asset_type_from == self.asset_type_to {
            return Err(OrderError::AssetTypes);
        }
        if let Some(fee) = &self.fee {
            if fee.asset_type == self.asset_type_from || fee.asset_type == self.asset_type_to {
                return Err(OrderError::AssetTypes);
            }
        }
        Ok(())
    }

    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expiration < now
    }

    /// Units of the "to" asset owed to the maker for `spent` units of "from".
    pub fn to_quantity_for(&self, spent: u64) -> Result<u64, OrderError> {
        self.scale(spent, self.asset_quantity_to, "to")
    }

    /// Units of the fee asset owed to the fee recipient for `spent` units.
    pub fn fee_quantity_for(&self, spent: u64) -> Result<u64, OrderError> {
        self.scale(spent, self.fee_quantity(), "fee")
    }

    /// `spent * quantity / asset_quantity_from`, refusing any remainder.
    fn scale(&self, spent: u64, quantity: u64, leg: &str) -> Result<u64, OrderError> {
        if spent == 0 || spent > self.asset_quantity_from {
            return Err(OrderError::SpentQuantity(format!(
                "{spent} is outside 1..={}",
                self.asset_quantity_from
            )));
        }
        let numerator = u128::from(spent) * u128::from(quantity);
        let denominator = u128::from(self.asset_quantity_from);
        if numerator % denominator != 0 {
            return Err(OrderError::SpentQuantity(format!(
                "{spent} * {quantity} is not a multiple of {denominator} on the {leg} leg"
            )));
        }
        // spent <= from, so the quotient never exceeds `quantity`.
        Ok((numerator / denominator) as u64)
    }

    /// The order left after `spent` units of the "from" asset are filled.
    ///
    /// Quantities shrink at the order's ratio; origin outputs are carried over
    /// unchanged and are recomputed by `TransferAsset::order_remainder` once
    /// the filling transaction is known.
    pub fn consume(&self, spent: u64) -> Result<Order, OrderError> {
        let to_paid = self.to_quantity_for(spent)?;
        let fee_paid = self.fee_quantity_for(spent)?;
        Ok(Order {
            asset_quantity_from: self.asset_quantity_from - spent,
            asset_quantity_to: self.asset_quantity_to - to_paid,
            fee: self.fee.as_ref().map(|fee| OrderFee {
                quantity: fee.quantity - fee_paid,
                ..fee.clone()
            }),
            ..self.clone()
        })
    }

    pub fn with_origin_outputs(&self, origin_outputs: Vec<AssetOutPoint>) -> Order {
        Order {
            origin_outputs,
            ..self.clone()
        }
    }
}

/// Binds an order to the inputs and outputs of one transaction that fill it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderOnTransfer {
    pub order: Order,
    pub spent_quantity: u64,
    /// Positions in `inputs`, in the same order as `order.origin_outputs`.
    pub input_indices: Vec<usize>,
    /// Positions in `outputs` claimed by this order.
    pub output_indices: Vec<usize>,
}
