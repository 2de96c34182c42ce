use thiserror::Error;

use tessera_store::OutPointKey;
use tessera_transactions::TransferError;
use tessera_types::{Timestamp, Tracker};

/// Why a transaction was not admitted. None of these reach chain state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MempoolError {
    #[error("fee {fee} is below the minimum of {minimum}")]
    FeeTooLow { fee: u64, minimum: u64 },

    #[error("transaction {0} is already pending")]
    AlreadyPending(Tracker),

    #[error("input {0} is already spent by a pending transaction")]
    ConflictingInput(OutPointKey),

    #[error("input {0} is not in the current UTXO set")]
    UnknownInput(OutPointKey),

    #[error("transaction expired at {expiration}, head is at {now}")]
    Expired { expiration: Timestamp, now: Timestamp },

    #[error("pool is full ({max} transactions)")]
    PoolFull { max: usize },

    #[error(transparent)]
    Invalid(#[from] TransferError),
}
