//! Storage trait definitions.

use crate::error::StorageResult;
use async_trait::async_trait;
use shardfs_core::{ChunkRecord, FileId};

/// One chunk shard: a database holding fragments of many files.
///
/// A file's fragments may be spread over any number of shards, so callers
/// broadcast every lookup and delete to all of them.
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Return every fragment in this shard that belongs to `files_id`.
    ///
    /// Order is not significant; callers sort by sequence number.
    async fn find_chunks(&self, files_id: &FileId) -> StorageResult<Vec<ChunkRecord>>;

    /// Remove every fragment in this shard that belongs to `files_id`.
    ///
    /// Returns the number of fragments removed. Zero is not an error.
    async fn delete_chunks(&self, files_id: &FileId) -> StorageResult<u64>;

    /// Approximate number of fragments held by this shard.
    async fn estimated_count(&self) -> StorageResult<u64>;

    /// Check database connectivity.
    async fn health_check(&self) -> StorageResult<()>;

    /// Close the underlying connection pool.
    async fn close(&self);

    /// Short backend identifier (e.g. "sqlite").
    fn backend_name(&self) -> &'static str;

    /// Human-readable location for logs and delete reports. Never holds credentials.
    fn label(&self) -> &str;
}
