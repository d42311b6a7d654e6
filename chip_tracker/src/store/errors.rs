//! Session store error types.

use thiserror::Error;

/// Session store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Key contains characters the store can't map to a location
    #[error("Invalid key: {0:?}")]
    InvalidKey(String),

    /// Stored entry is unreadable
    #[error("Corrupt entry for key {key:?}: {reason}")]
    Corrupt { key: String, reason: String },

    /// Expiry timestamp can't be represented
    #[error("TTL out of range: {0}")]
    InvalidTtl(chrono::Duration),

    /// Store can't be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
