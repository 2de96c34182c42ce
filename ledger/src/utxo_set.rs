//! The unspent output set and asset schemes at one chain head.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use tessera_crypto::blake2b_256;
use tessera_store::{AssetScheme, AssetSchemeLookup, OutPointKey, StoreError, UtxoLookup, UtxoRecord};
use tessera_transactions::{codec, TransferError, UtxoDelta};
use tessera_types::AssetType;

/// Ordered maps keep iteration, and therefore [`UtxoSet::digest`], identical
/// on every node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtxoSet {
    utxos: BTreeMap<OutPointKey, UtxoRecord>,
    schemes: BTreeMap<AssetType, AssetScheme>,
}

impl UtxoSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.utxos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utxos.is_empty()
    }

    pub fn scheme_count(&self) -> usize {
        self.schemes.len()
    }

    /// Apply one transaction's delta, all or nothing.
    ///
    /// A consumed output that is already gone was spent by an earlier
    /// transaction of the same block.
    pub fn apply(&mut self, delta: &UtxoDelta) -> Result<(), TransferError> {
        if let Some(key) = delta.consumed.iter().find(|key| !self.utxos.contains_key(key)) {
            return Err(TransferError::DoubleSpendInBlock(*key));
        }
        if let Some((asset_type, _)) = &delta.asset_scheme {
            if self.schemes.contains_key(asset_type) {
                return Err(TransferError::AssetSchemeDuplicated(*asset_type));
            }
        }

        for key in &delta.consumed {
            self.utxos.remove(key);
        }
        for (key, record) in &delta.created {
            self.utxos.insert(*key, record.clone());
        }
        if let Some((asset_type, scheme)) = &delta.asset_scheme {
            self.schemes.insert(*asset_type, scheme.clone());
        }
        Ok(())
    }

    /// Blake2b-256 of the canonical encoding of the whole set.
    pub fn digest(&self) -> [u8; 32] {
        blake2b_256(&codec::encode(self))
    }
}

impl UtxoLookup for UtxoSet {
    fn get_utxo(&self, key: &OutPointKey) -> Result<UtxoRecord, StoreError> {
        self.utxos
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::UtxoNotFound(key.to_string()))
    }

    fn contains_utxo(&self, key: &OutPointKey) -> bool {
        self.utxos.contains_key(key)
    }
}

impl AssetSchemeLookup for UtxoSet {
    fn get_asset_scheme(&self, asset_type: &AssetType) -> Result<AssetScheme, StoreError> {
        self.schemes
            .get(asset_type)
            .cloned()
            .ok_or_else(|| StoreError::AssetSchemeNotFound(asset_type.to_string()))
    }

    fn asset_scheme_exists(&self, asset_type: &AssetType) -> bool {
        self.schemes.contains_key(asset_type)
    }
}
