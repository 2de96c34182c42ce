//! Tag-scoped signing hashes.
//!
//! A signature commits to a masked view of the transaction. Unlock scripts
//! are always blanked; inputs and outputs outside the tag's scope are left
//! out entirely, so appending them later leaves the hash unchanged. Covered
//! elements are recorded with their positions, so moving a signed element
//! changes the hash as well.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::codec;
use crate::input::AssetTransferInput;
use crate::order::OrderOnTransfer;
use crate::output::AssetTransferOutput;
use crate::transfer::TransferAsset;
use tessera_crypto::blake2b_256_multi;
use tessera_types::{ChainHead, NetworkId, Timestamp};
use tessera_vm::{ExecutionContext, InputScope, OutputScope, Tag, VmError};

const SIGNING_DOMAIN: &[u8] = b"tessera/transfer-signing/v1";

/// Position of a spent output within a transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputRef {
    Input(usize),
    Burn(usize),
}

impl fmt::Display for InputRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(i) => write!(f, "input {i}"),
            Self::Burn(i) => write!(f, "burn {i}"),
        }
    }
}

/// The part of a transfer a tag commits to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SigningView {
    pub network_id: NetworkId,
    pub burns: Vec<(usize, AssetTransferInput)>,
    pub inputs: Vec<(usize, AssetTransferInput)>,
    pub outputs: Vec<(usize, AssetTransferOutput)>,
    /// Orders constrain outputs, so they are covered only with all outputs.
    pub orders: Vec<OrderOnTransfer>,
    pub fee: u64,
    pub seq: u64,
    pub expiration: Option<Timestamp>,
}

fn masked(list: &[AssetTransferInput]) -> Vec<(usize, AssetTransferInput)> {
    list.iter()
        .map(AssetTransferInput::without_unlock_script)
        .enumerate()
        .collect()
}

fn single(list: &[AssetTransferInput], index: usize, current: InputRef) -> Result<Vec<(usize, AssetTransferInput)>, VmError> {
    let input = list
        .get(index)
        .ok_or_else(|| VmError::InvalidTag(format!("{current} does not exist")))?;
    Ok(vec![(index, input.without_unlock_script())])
}

impl SigningView {
    pub fn new(tx: &TransferAsset, tag: &Tag, current: InputRef) -> Result<Self, VmError> {
        let (inputs, burns) = match (tag.inputs, current) {
            (InputScope::All, _) => (masked(&tx.inputs), masked(&tx.burns)),
            (InputScope::Single, InputRef::Input(i)) => (single(&tx.inputs, i, current)?, Vec::new()),
            (InputScope::Single, InputRef::Burn(i)) => (Vec::new(), single(&tx.burns, i, current)?),
        };

        let (outputs, orders) = match &tag.outputs {
            OutputScope::All => (
                tx.outputs.iter().cloned().enumerate().collect(),
                tx.orders.clone(),
            ),
            OutputScope::Only(indices) => {
                let mut outputs = Vec::with_capacity(indices.len());
                for &index in indices {
                    let output = tx.outputs.get(index).ok_or_else(|| {
                        VmError::InvalidTag(format!(
                            "output {index} out of range, transaction has {}",
                            tx.outputs.len()
                        ))
                    })?;
                    outputs.push((index, output.clone()));
                }
                (outputs, Vec::new())
            }
        };

        Ok(Self {
            network_id: tx.network_id,
            burns,
            inputs,
            outputs,
            orders,
            fee: tx.fee,
            seq: tx.seq,
            expiration: tx.expiration,
        })
    }
}

/// The 32-byte message a signature over `tag` must sign when unlocking
/// `current`.
pub fn signing_hash(tx: &TransferAsset, tag: &Tag, current: InputRef) -> Result<[u8; 32], VmError> {
    let view = SigningView::new(tx, tag, current)?;
    Ok(blake2b_256_multi(&[
        SIGNING_DOMAIN,
        &codec::encode(&view),
        &tag.encode(),
    ]))
}

/// What the VM sees while unlocking one input of a transfer.
pub struct TransferContext<'a> {
    tx: &'a TransferAsset,
    current: InputRef,
    head: ChainHead,
    origin: (u64, Timestamp),
}

impl<'a> TransferContext<'a> {
    pub fn new(tx: &'a TransferAsset, current: InputRef, head: ChainHead, origin: (u64, Timestamp)) -> Self {
        Self {
            tx,
            current,
            head,
            origin,
        }
    }
}

impl ExecutionContext for TransferContext<'_> {
    fn signing_hash(&self, tag: &Tag) -> Result<[u8; 32], VmError> {
        signing_hash(self.tx, tag, self.current)
    }

    fn chain_head(&self) -> ChainHead {
        self.head
    }

    fn spent_output_origin(&self) -> (u64, Timestamp) {
        self.origin
    }
}
