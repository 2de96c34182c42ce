use thiserror::Error;

use crate::signing::InputRef;
use tessera_store::OutPointKey;
use tessera_types::{AssetType, NetworkId, Timelock, Timestamp};
use tessera_vm::VmError;

/// Why a transaction is invalid. Every variant is terminal for the
/// transaction that raised it and never affects any other transaction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("previous output {0} is spent twice")]
    DuplicatePrevOut(OutPointKey),

    #[error("previous output {0} not found or already spent")]
    UtxoNotFound(OutPointKey),

    #[error("previous output {key} declares asset type {declared} but holds {actual}")]
    AssetTypeMismatch {
        key: OutPointKey,
        declared: AssetType,
        actual: AssetType,
    },

    #[error("previous output {key} declares quantity {declared} but holds {actual}")]
    QuantityMismatch {
        key: OutPointKey,
        declared: u64,
        actual: u64,
    },

    #[error("transaction expired at {expiration}, block is at {now}")]
    Expired { expiration: Timestamp, now: Timestamp },

    #[error("{input} is timelocked until {timelock:?}")]
    Timelocked { input: InputRef, timelock: Timelock },

    #[error("asset {asset_type}: inputs total {input}, outputs total {output}")]
    InconsistentInOut {
        asset_type: AssetType,
        input: u128,
        output: u128,
    },

    #[error("output {0} has zero quantity")]
    ZeroQuantity(usize),

    #[error("order {0} has invalid asset quantities")]
    InvalidOrderAssetQuantities(usize),

    #[error("order {0} exchanges an asset type with itself")]
    InvalidOrderAssetTypes(usize),

    #[error("order {order} expired at {expiration}, head is at {now}")]
    OrderExpired {
        order: usize,
        expiration: Timestamp,
        now: Timestamp,
    },

    #[error("order {0}: origin output is not locked by the maker's lock script")]
    InvalidOrderLockScriptHash(usize),

    #[error("order {0}: origin output parameters differ from the maker's")]
    InvalidOrderParameters(usize),

    #[error("order {order}: invalid origin outputs: {reason}")]
    InvalidOriginOutputs { order: usize, reason: String },

    #[error("order {order}: invalid spent quantity: {reason}")]
    InvalidSpentQuantity { order: usize, reason: String },

    #[error("order {order}: outputs do not match the order: {reason}")]
    InconsistentInOutWithOrders { order: usize, reason: String },

    #[error("{0}: lock script does not match the output's lock script hash")]
    LockScriptHashMismatch(InputRef),

    #[error("{input} failed to unlock: {reason}")]
    ScriptUnlockFailed { input: InputRef, reason: VmError },

    #[error("transaction is for network {actual:?}, node runs {expected:?}")]
    InvalidNetworkId { expected: NetworkId, actual: NetworkId },

    #[error("transaction spends nothing")]
    EmptyTransaction,

    #[error("asset scheme {0} already exists")]
    AssetSchemeDuplicated(AssetType),

    #[error("mint supply must be positive")]
    InvalidMintSupply,

    #[error("previous output {0} was already consumed earlier in this block")]
    DoubleSpendInBlock(OutPointKey),

    #[error("transaction was already included")]
    AlreadyIncluded,

    #[error("malformed transaction encoding: {0}")]
    Decode(String),
}

impl TransferError {
    /// Stable name recorded in verdicts. Identical on every node.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DuplicatePrevOut(_) => "DuplicatePrevOut",
            Self::UtxoNotFound(_) => "UtxoNotFound",
            Self::AssetTypeMismatch { .. } => "AssetTypeMismatch",
            Self::QuantityMismatch { .. } => "QuantityMismatch",
            Self::Expired { .. } => "Expired",
            Self::Timelocked { .. } => "Timelocked",
            Self::InconsistentInOut { .. } => "InconsistentInOut",
            Self::ZeroQuantity(_) => "ZeroQuantity",
            Self::InvalidOrderAssetQuantities(_) => "InvalidOrderAssetQuantities",
            Self::InvalidOrderAssetTypes(_) => "InvalidOrderAssetTypes",
            Self::OrderExpired { .. } => "OrderExpired",
            Self::InvalidOrderLockScriptHash(_) => "InvalidOrderLockScriptHash",
            Self::InvalidOrderParameters(_) => "InvalidOrderParameters",
            Self::InvalidOriginOutputs { .. } => "InvalidOriginOutputs",
            Self::InvalidSpentQuantity { .. } => "InvalidSpentQuantity",
            Self::InconsistentInOutWithOrders { .. } => "InconsistentInOutWithOrders",
            Self::LockScriptHashMismatch(_) => "LockScriptHashMismatch",
            Self::ScriptUnlockFailed { .. } => "ScriptUnlockFailed",
            Self::InvalidNetworkId { .. } => "InvalidNetworkId",
            Self::EmptyTransaction => "EmptyTransaction",
            Self::AssetSchemeDuplicated(_) => "AssetSchemeDuplicated",
            Self::InvalidMintSupply => "InvalidMintSupply",
            Self::DoubleSpendInBlock(_) => "DoubleSpendInBlock",
            Self::AlreadyIncluded => "AlreadyIncluded",
            Self::Decode(_) => "Decode",
        }
    }
}
