//! Multi-asset transfers.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::codec;
use crate::error::TransferError;
use crate::input::AssetTransferInput;
use crate::order::{Order, OrderOnTransfer};
use crate::outpoint::AssetOutPoint;
use crate::output::AssetTransferOutput;
use crate::signing::{self, InputRef};
use crate::TransactionRef;
use tessera_crypto::blake2b_256;
use tessera_store::OutPointKey;
use tessera_types::{NetworkId, Timestamp, Tracker};
use tessera_vm::{Tag, VmError};

/// Spends inputs, destroys burns and creates outputs, optionally filling
/// maker orders on the way.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferAsset {
    pub network_id: NetworkId,
    pub burns: Vec<AssetTransferInput>,
    pub inputs: Vec<AssetTransferInput>,
    pub outputs: Vec<AssetTransferOutput>,
    pub orders: Vec<OrderOnTransfer>,
    pub fee: u64,
    pub seq: u64,
    /// Head timestamp after which the transfer can no longer be included.
    pub expiration: Option<Timestamp>,
}

impl TransferAsset {
    /// Identity of the transfer. Unlock scripts are excluded, so adding
    /// signatures never changes it.
    pub fn tracker(&self) -> Tracker {
        let unsigned = self.without_unlock_scripts();
        Tracker::new(blake2b_256(&codec::encode(&TransactionRef::TransferAsset(&unsigned))))
    }

    pub fn without_unlock_scripts(&self) -> Self {
        Self {
            burns: self.burns.iter().map(AssetTransferInput::without_unlock_script).collect(),
            inputs: self.inputs.iter().map(AssetTransferInput::without_unlock_script).collect(),
            ..self.clone()
        }
    }

    /// Every spent output, inputs first, then burns.
    pub fn spent(&self) -> impl Iterator<Item = (InputRef, &AssetTransferInput)> {
        let inputs = self.inputs.iter().enumerate().map(|(i, input)| (InputRef::Input(i), input));
        let burns = self.burns.iter().enumerate().map(|(i, burn)| (InputRef::Burn(i), burn));
        inputs.chain(burns)
    }

    pub fn prev_out_keys(&self) -> impl Iterator<Item = OutPointKey> + '_ {
        self.spent().map(|(_, input)| input.prev_out.key())
    }

    pub fn signing_hash(&self, tag: &Tag, current: InputRef) -> Result<[u8; 32], VmError> {
        signing::signing_hash(self, tag, current)
    }

    pub fn check_network(&self, expected: NetworkId) -> Result<(), TransferError> {
        if self.network_id != expected {
            return Err(TransferError::InvalidNetworkId {
                expected,
                actual: self.network_id,
            });
        }
        Ok(())
    }

    pub fn check_not_empty(&self) -> Result<(), TransferError> {
        if self.inputs.is_empty() && self.burns.is_empty() {
            return Err(TransferError::EmptyTransaction);
        }
        Ok(())
    }

    pub fn check_duplicate_prev_outs(&self) -> Result<(), TransferError> {
        let mut seen = HashSet::new();
        for key in self.prev_out_keys() {
            if !seen.insert(key) {
                return Err(TransferError::DuplicatePrevOut(key));
            }
        }
        Ok(())
    }

    pub fn check_output_quantities(&self) -> Result<(), TransferError> {
        match self.outputs.iter().position(|o| o.quantity == 0) {
            Some(index) => Err(TransferError::ZeroQuantity(index)),
            None => Ok(()),
        }
    }

    /// Checks that need no chain state. Run on admission and again, in
    /// order, by the validator.
    pub fn verify_basic(&self, network_id: NetworkId) -> Result<(), TransferError> {
        self.check_network(network_id)?;
        self.check_not_empty()?;
        self.check_duplicate_prev_outs()?;
        self.check_output_quantities()?;
        for (i, order_tx) in self.orders.iter().enumerate() {
            order_tx.order.check_quantities().map_err(|e| e.at(i))?;
            order_tx.order.check_asset_types().map_err(|e| e.at(i))?;
        }
        Ok(())
    }

    /// The order left after this transfer fills `self.orders[index]`.
    ///
    /// Its origin outputs are the maker-owned "from" and fee outputs this
    /// transfer creates, so the remainder can be filled by a later transfer
    /// that spends them.
    pub fn order_remainder(&self, index: usize) -> Result<Order, TransferError> {
        let order_tx = self.orders.get(index).ok_or_else(|| TransferError::InconsistentInOutWithOrders {
            order: index,
            reason: format!("transaction has {} orders", self.orders.len()),
        })?;
        let order = &order_tx.order;
        let remainder = order.consume(order_tx.spent_quantity).map_err(|e| e.at(index))?;

        let tracker = self.tracker();
        let fee_type = order.fee.as_ref().map(|fee| fee.asset_type);
        let origins = order_tx
            .output_indices
            .iter()
            .filter_map(|&i| self.outputs.get(i).map(|output| (i, output)))
            .filter(|(_, output)| output.is_locked_by(&order.lock_script_hash_from, &order.parameters_from))
            .filter(|(_, output)| output.asset_type == order.asset_type_from || Some(output.asset_type) == fee_type)
            .map(|(i, output)| AssetOutPoint {
                tracker,
                index: i as u32,
                asset_type: output.asset_type,
                shard_id: output.shard_id,
                quantity: output.quantity,
            })
            .collect();
        Ok(remainder.with_origin_outputs(origins))
    }
}
