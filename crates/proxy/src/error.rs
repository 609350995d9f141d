//! Proxy error types.

use shardfs_core::{FileId, Md5Checksum, Sha1Digest};
use shardfs_metadata::MetadataError;
use shardfs_storage::StorageError;
use std::fmt;
use thiserror::Error;

/// Reconstructed content disagrees with its metadata, or fragments are inconsistent.
///
/// Never downgraded: content that fails any of these checks is discarded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    #[error("file {file}: fragment {n} stored more than once (shards {shards:?})")]
    DuplicateSequence {
        file: FileId,
        n: u32,
        shards: Vec<usize>,
    },

    #[error("file {file}: fragment {expected} missing (next found: {found:?})")]
    MissingSequence {
        file: FileId,
        expected: u32,
        found: Option<u32>,
    },

    /// A shard holds a fragment row that cannot be decoded.
    #[error("file {file}: fragment {chunk} on shard {shard} is corrupt: {reason}")]
    CorruptFragment {
        file: FileId,
        shard: usize,
        chunk: String,
        reason: String,
    },

    #[error("file {file}: reconstructed {actual} bytes, record says {expected}")]
    LengthMismatch {
        file: FileId,
        expected: u64,
        actual: u64,
    },

    #[error("file {file}: MD5 mismatch, expected {expected}, got {actual}")]
    ChecksumMismatch {
        file: FileId,
        expected: Md5Checksum,
        actual: Md5Checksum,
    },

    #[error("file {file}: content SHA-1 {actual} does not match key {key}")]
    KeyMismatch {
        file: FileId,
        key: String,
        actual: Sha1Digest,
    },
}

/// Outcome of one shard's part in a delete broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardDeletion {
    pub shard: usize,
    /// Shard label, as reported by the store.
    pub store: String,
    /// Fragments removed, or the error message.
    pub result: Result<u64, String>,
}

/// Per-shard results of a delete broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteReport {
    pub file: FileId,
    pub shards: Vec<ShardDeletion>,
}

impl DeleteReport {
    /// True when every shard in the broadcast succeeded.
    pub fn is_complete(&self) -> bool {
        self.shards.iter().all(|s| s.result.is_ok())
    }

    /// Total fragments removed across the successful shards.
    pub fn fragments_removed(&self) -> u64 {
        self.shards.iter().filter_map(|s| s.result.as_ref().ok()).sum()
    }

    pub fn succeeded_shards(&self) -> Vec<usize> {
        self.shards
            .iter()
            .filter(|s| s.result.is_ok())
            .map(|s| s.shard)
            .collect()
    }

    /// Shards to pass back to `Deleter::delete_on_shards` on retry.
    pub fn failed_shards(&self) -> Vec<usize> {
        self.shards
            .iter()
            .filter(|s| s.result.is_err())
            .map(|s| s.shard)
            .collect()
    }
}

impl fmt::Display for DeleteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let failed = self.failed_shards();
        write!(
            f,
            "delete of file {} incomplete: {} of {} shards failed",
            self.file,
            failed.len(),
            self.shards.len()
        )?;
        for shard in self.shards.iter().filter(|s| s.result.is_err()) {
            if let Err(message) = &shard.result {
                write!(f, "; shard {} ({}): {}", shard.shard, shard.store, message)?;
            }
        }
        Ok(())
    }
}

/// Proxy operation errors.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("invalid request: {0}")]
    Validation(#[from] shardfs_core::Error),

    #[error("integrity check failed: {0}")]
    Integrity(#[from] IntegrityError),

    #[error("metadata store error: {0}")]
    Metadata(#[from] MetadataError),

    #[error("chunk shard {shard} unavailable: {source}")]
    Storage {
        shard: usize,
        #[source]
        source: StorageError,
    },

    #[error("{0}")]
    PartialDelete(DeleteReport),

    /// Every shard dropped its fragments but the file record could not be removed.
    #[error("fragments of file {} removed, record delete failed: {source}", .report.file)]
    RecordDelete {
        report: DeleteReport,
        #[source]
        source: MetadataError,
    },

    #[error("operation not supported: {0}")]
    Unsupported(&'static str),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ProxyError {
    /// Whether retrying the same operation later may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProxyError::Storage {
                source: StorageError::Corrupt { .. },
                ..
            } => false,
            ProxyError::Storage { .. } | ProxyError::PartialDelete(_) => true,
            ProxyError::Metadata(MetadataError::Database(_) | MetadataError::Io(_))
            | ProxyError::RecordDelete {
                source: MetadataError::Database(_) | MetadataError::Io(_),
                ..
            } => true,
            _ => false,
        }
    }
}

/// Result type for proxy operations.
pub type ProxyResult<T> = std::result::Result<T, ProxyError>;
