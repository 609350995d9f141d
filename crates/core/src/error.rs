//! Error types for the core domain.

use thiserror::Error;

/// Core domain error type.
///
/// Every variant is a validation failure raised before any store is contacted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid checksum: {0}")]
    InvalidChecksum(String),

    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
