//! Storage error types.

use thiserror::Error;

/// Chunk store operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    /// A stored fragment row cannot be turned into a valid chunk record.
    #[error("corrupt chunk {id}: {reason}")]
    Corrupt { id: String, reason: String },
}

/// Result type for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;
