use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReputexError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Network mismatch: {0}")]
    NetworkMismatch(String),

    #[error("Unknown network: {0}")]
    UnknownNetwork(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Explorer error: {0}")]
    ExplorerError(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Solana error: {0}")]
    SolanaError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unsupported: {0}")]
    Unsupported(String),
}
