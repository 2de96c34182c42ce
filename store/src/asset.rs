//! Asset scheme records created by mints.

use serde::{Deserialize, Serialize};

use crate::StoreError;
use tessera_types::{AssetType, ShardId, Tracker};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetScheme {
    pub shard_id: ShardId,
    pub metadata: String,
    pub supply: u64,
    /// The mint transaction that created the scheme.
    pub mint_tracker: Tracker,
}

pub trait AssetSchemeLookup {
    fn get_asset_scheme(&self, asset_type: &AssetType) -> Result<AssetScheme, StoreError>;

    fn asset_scheme_exists(&self, asset_type: &AssetType) -> bool {
        self.get_asset_scheme(asset_type).is_ok()
    }
}
