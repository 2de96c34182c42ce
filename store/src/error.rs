use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("output not found or already spent: {0}")]
    UtxoNotFound(String),

    #[error("asset scheme not found: {0}")]
    AssetSchemeNotFound(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}
