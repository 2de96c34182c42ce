//! Pointers to previous outputs, as carried by inputs and orders.

use serde::{Deserialize, Serialize};

use tessera_store::OutPointKey;
use tessera_types::{AssetType, ShardId, Tracker};

/// A previous output together with the asset type and quantity the spender
/// claims it holds. The claim is checked against the UTXO set.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetOutPoint {
    pub tracker: Tracker,
    pub index: u32,
    pub asset_type: AssetType,
    pub shard_id: ShardId,
    pub quantity: u64,
}

impl AssetOutPoint {
    pub fn key(&self) -> OutPointKey {
        OutPointKey::new(self.tracker, self.index)
    }
}
