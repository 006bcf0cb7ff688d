use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// No account is connected on the chain client.
    #[error("no wallet connected")]
    WalletUnavailable,

    #[error("ledger not initialized")]
    NotInitialized,

    #[error("content store I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("metadata encoding: {0}")]
    Json(#[from] serde_json::Error),

    /// The chain refused the mint, e.g. a paused contract.
    #[error("chain rejected transaction: {0}")]
    Rejected(String),
}
