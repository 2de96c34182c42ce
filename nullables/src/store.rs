//! Nullable store: thread-safe in-memory UTXO and asset scheme storage.

use std::collections::HashMap;
use std::sync::Mutex;

use tessera_store::{AssetScheme, AssetSchemeLookup, OutPointKey, StoreError, UtxoLookup, UtxoRecord};
use tessera_types::AssetType;

/// An in-memory UTXO set for testing.
pub struct NullUtxoStore {
    utxos: Mutex<HashMap<OutPointKey, UtxoRecord>>,
    schemes: Mutex<HashMap<AssetType, AssetScheme>>,
}

impl NullUtxoStore {
    pub fn new() -> Self {
        Self {
            utxos: Mutex::new(HashMap::new()),
            schemes: Mutex::new(HashMap::new()),
        }
    }

    pub fn insert(&self, key: OutPointKey, record: UtxoRecord) {
        self.utxos.lock().unwrap().insert(key, record);
    }

    pub fn remove(&self, key: &OutPointKey) -> Option<UtxoRecord> {
        self.utxos.lock().unwrap().remove(key)
    }

    pub fn insert_scheme(&self, asset_type: AssetType, scheme: AssetScheme) {
        self.schemes.lock().unwrap().insert(asset_type, scheme);
    }

    pub fn len(&self) -> usize {
        self.utxos.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for NullUtxoStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UtxoLookup for NullUtxoStore {
    fn get_utxo(&self, key: &OutPointKey) -> Result<UtxoRecord, StoreError> {
        self.utxos
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::UtxoNotFound(key.to_string()))
    }
}

impl AssetSchemeLookup for NullUtxoStore {
    fn get_asset_scheme(&self, asset_type: &AssetType) -> Result<AssetScheme, StoreError> {
        self.schemes
            .lock()
            .unwrap()
            .get(asset_type)
            .cloned()
            .ok_or_else(|| StoreError::AssetSchemeNotFound(asset_type.to_string()))
    }
}
