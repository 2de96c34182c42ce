//! Asset issuance.

use serde::{Deserialize, Serialize};

use crate::codec;
use crate::TransactionRef;
use tessera_crypto::{blake2b_256, blake2b_256_multi};
use tessera_types::{AssetType, LockScriptHash, NetworkId, ShardId, Tracker};

const ASSET_TYPE_DOMAIN: &[u8] = b"tessera/asset-type";

/// Creates a new asset scheme and its entire supply as a single output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintAsset {
    pub network_id: NetworkId,
    pub shard_id: ShardId,
    pub metadata: String,
    pub lock_script_hash: LockScriptHash,
    pub parameters: Vec<Vec<u8>>,
    pub supply: u64,
    pub fee: u64,
    pub seq: u64,
}

impl MintAsset {
    pub fn tracker(&self) -> Tracker {
        Tracker::new(blake2b_256(&codec::encode(&TransactionRef::MintAsset(self))))
    }

    /// The asset type this mint creates. Derived from the tracker, so two
    /// distinct mints never collide.
    pub fn asset_type(&self) -> AssetType {
        AssetType::new(blake2b_256_multi(&[
            ASSET_TYPE_DOMAIN,
            &self.shard_id.to_be_bytes(),
            self.tracker().as_bytes(),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mint(metadata: &str) -> MintAsset {
        MintAsset {
            network_id: NetworkId::Dev,
            shard_id: 0,
            metadata: metadata.into(),
            lock_script_hash: LockScriptHash::new([1; 32]),
            parameters: vec![],
            supply: 10_000,
            fee: 10,
            seq: 0,
        }
    }

    #[test]
    fn asset_type_depends_on_content() {
        assert_eq!(mint("gold").asset_type(), mint("gold").asset_type());
        assert_ne!(mint("gold").asset_type(), mint("silver").asset_type());
    }

    #[test]
    fn asset_type_depends_on_shard() {
        let a = mint("gold");
        let b = MintAsset { shard_id: 1, ..a.clone() };
        assert_ne!(a.asset_type(), b.asset_type());
    }
}
