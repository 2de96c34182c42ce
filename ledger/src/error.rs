use thiserror::Error;

use tessera_types::Timestamp;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("invalid block: timestamp {block} is before head timestamp {head}")]
    TimestampRegression { head: Timestamp, block: Timestamp },

    #[error("invalid block: {count} transactions exceeds the limit of {max}")]
    TooManyTransactions { count: usize, max: usize },
}
