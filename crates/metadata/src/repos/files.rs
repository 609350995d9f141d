//! File record repository.

use crate::error::MetadataResult;
use async_trait::async_trait;
use shardfs_core::{FileId, FileQuery, FileRecord};

/// Repository for file record operations.
///
/// File records are created by an external ingestion path; this repository
/// only looks them up and removes them.
#[async_trait]
pub trait FileRepo: Send + Sync {
    /// Find the first file record matching the query.
    ///
    /// Returns `Ok(None)` when nothing matches.
    async fn find_one(&self, query: &FileQuery) -> MetadataResult<Option<FileRecord>>;

    /// Delete a file record by id. Returns whether a record was removed.
    async fn delete_file(&self, id: &FileId) -> MetadataResult<bool>;

    /// Approximate number of file records.
    async fn estimated_count(&self) -> MetadataResult<u64>;
}
