use thiserror::Error;

use tessera_types::Tracker;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("ledger error: {0}")]
    Ledger(#[from] tessera_ledger::LedgerError),

    #[error("transaction not admitted: {0}")]
    Admission(#[from] tessera_mempool::MempoolError),

    #[error("transaction {0} was already included")]
    AlreadyIncluded(Tracker),

    #[error("malformed transaction: {0}")]
    Decode(#[from] tessera_transactions::TransferError),

    #[error("config error: {0}")]
    Config(String),

    #[error("logging error: {0}")]
    Logging(String),
}
