//! Tessera asset transactions and their validation.
//!
//! Transaction types:
//! - **MintAsset**: creates an asset scheme and its whole supply as one output
//! - **TransferAsset**: spends and burns outputs, creates new ones, and may
//!   fill maker orders at a fixed exchange ratio
//!
//! Validation is a pure function of a transaction, one snapshot of the UTXO
//! set and the chain head ([`validation::validate`]). Each spent output is
//! authorized by running its lock script on the script VM against a
//! tag-scoped signing hash ([`signing`]).

pub mod codec;
pub mod error;
pub mod input;
pub mod mint;
pub mod order;
pub mod outpoint;
pub mod output;
pub mod signing;
pub mod transfer;
pub mod validation;

pub use error::TransferError;
pub use input::AssetTransferInput;
pub use mint::MintAsset;
pub use order::{Order, OrderError, OrderFee, OrderOnTransfer};
pub use outpoint::AssetOutPoint;
pub use output::AssetTransferOutput;
pub use signing::{signing_hash, InputRef, SigningView, TransferContext};
pub use transfer::TransferAsset;
pub use validation::{validate, validate_mint, validate_transfer, UtxoDelta};

use serde::{Deserialize, Serialize};

use tessera_crypto::blake2b_256;
use tessera_store::OutPointKey;
use tessera_types::{NetworkId, Timestamp, Tracker};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transaction {
    MintAsset(MintAsset),
    TransferAsset(TransferAsset),
}

/// Borrowed twin of [`Transaction`] with an identical encoding.
#[derive(Serialize)]
pub(crate) enum TransactionRef<'a> {
    MintAsset(&'a MintAsset),
    TransferAsset(&'a TransferAsset),
}

impl Transaction {
    pub fn tracker(&self) -> Tracker {
        match self {
            Self::MintAsset(tx) => tx.tracker(),
            Self::TransferAsset(tx) => tx.tracker(),
        }
    }

    /// Hash of the full encoding, unlock scripts included.
    pub fn hash(&self) -> [u8; 32] {
        blake2b_256(&self.encode())
    }

    pub fn encode(&self) -> Vec<u8> {
        codec::encode(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, TransferError> {
        codec::decode(bytes)
    }

    pub fn network_id(&self) -> NetworkId {
        match self {
            Self::MintAsset(tx) => tx.network_id,
            Self::TransferAsset(tx) => tx.network_id,
        }
    }

    pub fn fee(&self) -> u64 {
        match self {
            Self::MintAsset(tx) => tx.fee,
            Self::TransferAsset(tx) => tx.fee,
        }
    }

    pub fn seq(&self) -> u64 {
        match self {
            Self::MintAsset(tx) => tx.seq,
            Self::TransferAsset(tx) => tx.seq,
        }
    }

    pub fn expiration(&self) -> Option<Timestamp> {
        match self {
            Self::MintAsset(_) => None,
            Self::TransferAsset(tx) => tx.expiration,
        }
    }

    /// Every spent input, regular inputs first, then burns. Both may carry
    /// timelocks.
    pub fn spent_inputs(&self) -> impl Iterator<Item = &AssetTransferInput> {
        let (inputs, burns): (&[AssetTransferInput], &[AssetTransferInput]) = match self {
            Self::MintAsset(_) => (&[], &[]),
            Self::TransferAsset(tx) => (&tx.inputs, &tx.burns),
        };
        inputs.iter().chain(burns)
    }

    /// Every previous output this transaction consumes.
    pub fn prev_out_keys(&self) -> Vec<OutPointKey> {
        match self {
            Self::MintAsset(_) => Vec::new(),
            Self::TransferAsset(tx) => tx.prev_out_keys().collect(),
        }
    }

    pub fn check_network(&self, expected: NetworkId) -> Result<(), TransferError> {
        let actual = self.network_id();
        if actual != expected {
            return Err(TransferError::InvalidNetworkId { expected, actual });
        }
        Ok(())
    }

    /// Stateless checks, run before a transaction enters the pool.
    pub fn verify_basic(&self, network_id: NetworkId) -> Result<(), TransferError> {
        match self {
            Self::MintAsset(tx) => {
                self.check_network(network_id)?;
                if tx.supply == 0 {
                    return Err(TransferError::InvalidMintSupply);
                }
                Ok(())
            }
            Self::TransferAsset(tx) => tx.verify_basic(network_id),
        }
    }
}

impl From<MintAsset> for Transaction {
    fn from(tx: MintAsset) -> Self {
        Self::MintAsset(tx)
    }
}

impl From<TransferAsset> for Transaction {
    fn from(tx: TransferAsset) -> Self {
        Self::TransferAsset(tx)
    }
}
