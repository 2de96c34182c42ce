//! Transfer inputs.

use serde::{Deserialize, Serialize};

use crate::outpoint::AssetOutPoint;
use tessera_types::Timelock;

/// Spends one previous output. Also used for burns, which consume an output
/// without producing anything.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetTransferInput {
    pub prev_out: AssetOutPoint,
    pub timelock: Option<Timelock>,
    pub lock_script: Vec<u8>,
    pub unlock_script: Vec<u8>,
}

impl AssetTransferInput {
    /// The same input with its witness removed. Trackers and signing hashes
    /// are computed over this form.
    pub fn without_unlock_script(&self) -> Self {
        Self {
            unlock_script: Vec::new(),
            ..self.clone()
        }
    }
}
