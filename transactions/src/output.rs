//! Transfer outputs.

use serde::{Deserialize, Serialize};

use tessera_types::{AssetType, LockScriptHash, ShardId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetTransferOutput {
    pub lock_script_hash: LockScriptHash,
    pub parameters: Vec<Vec<u8>>,
    pub asset_type: AssetType,
    pub shard_id: ShardId,
    pub quantity: u64,
}

impl AssetTransferOutput {
    /// Whether this output is locked by the given commitment.
    pub fn is_locked_by(&self, lock_script_hash: &LockScriptHash, parameters: &[Vec<u8>]) -> bool {
        &self.lock_script_hash == lock_script_hash && self.parameters == parameters
    }
}
