//! The sharded proxy: one metadata store plus an ordered set of chunk shards.

use crate::deleter::{DeleteOutcome, Deleter};
use crate::error::{IntegrityError, ProxyError, ProxyResult};
use crate::reader::FileReader;
use crate::reconstructor::Reconstructor;
use bytes::Bytes;
use futures::future::join_all;
use shardfs_core::config::AppConfig;
use shardfs_core::{FileId, FileQuery, Sha1Digest};
use shardfs_metadata::MetadataStore;
use shardfs_storage::ChunkStore;
use std::sync::Arc;

/// Store handles shared by every request.
///
/// Built once at startup. Every read and delete is broadcast to all shards,
/// so each costs one query per shard.
#[derive(Clone)]
pub struct ShardedProxy {
    metadata: Arc<dyn MetadataStore>,
    shards: Arc<[Arc<dyn ChunkStore>]>,
}

impl ShardedProxy {
    pub fn new(metadata: Arc<dyn MetadataStore>, shards: Vec<Arc<dyn ChunkStore>>) -> Self {
        Self {
            metadata,
            shards: shards.into(),
        }
    }

    /// Open the metadata store and every configured shard.
    pub async fn connect(config: &AppConfig) -> ProxyResult<Self> {
        config.validate().map_err(ProxyError::Config)?;

        tracing::info!(
            metadata = %config.metadata.describe(),
            shards = config.shards.len(),
            "Connecting stores"
        );
        let metadata = shardfs_metadata::from_config(&config.metadata).await?;

        let mut shards = Vec::with_capacity(config.shards.len());
        for (shard, shard_config) in config.shards.iter().enumerate() {
            let store = shardfs_storage::from_config(shard_config)
                .await
                .map_err(|source| ProxyError::Storage { shard, source })?;
            tracing::info!(shard, store = store.label(), "Chunk shard ready");
            shards.push(store);
        }

        Ok(Self::new(metadata, shards))
    }

    pub fn metadata(&self) -> &dyn MetadataStore {
        self.metadata.as_ref()
    }

    pub fn shards(&self) -> &[Arc<dyn ChunkStore>] {
        &self.shards
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Locate a file by name or checksum. `None` when no record matches.
    pub async fn find_one(&self, query: &FileQuery) -> ProxyResult<Option<FileReader<'_>>> {
        let record = self.metadata.find_one(query).await?;
        Ok(record.map(|record| FileReader::new(self, record)))
    }

    /// Fetch verified content stored under the SHA-1 key `key`.
    ///
    /// The file is looked up by name; the reconstructed content must hash to
    /// the key or nothing is returned.
    pub async fn retrieve(&self, key: &str) -> ProxyResult<Option<Bytes>> {
        let query = FileQuery::by_name(key)?;
        let Some(record) = self.metadata.find_one(&query).await? else {
            tracing::debug!(key, "no file record for key");
            return Ok(None);
        };

        let content = Reconstructor::new(&self.shards).read(&record).await?;

        let digest = Sha1Digest::compute(&content);
        if !digest.matches_key(key) {
            let err = IntegrityError::KeyMismatch {
                file: record.id.clone(),
                key: key.to_string(),
                actual: digest,
            };
            tracing::error!(error = %err, "content does not match retrieval key");
            return Err(err.into());
        }

        Ok(Some(content))
    }

    /// Delete a file from every shard and then from the metadata store.
    pub async fn delete(&self, query: &FileQuery) -> ProxyResult<DeleteOutcome> {
        self.deleter().delete(query).await
    }

    pub fn deleter(&self) -> Deleter<'_> {
        Deleter::new(self.metadata.as_ref(), &self.shards)
    }

    /// Storing new files is not supported.
    pub async fn put(&self, _data: Bytes) -> ProxyResult<FileId> {
        Err(ProxyError::Unsupported("put"))
    }

    /// Approximate number of fragments across all shards.
    pub async fn count_chunks(&self) -> ProxyResult<u64> {
        let counts = join_all(self.shards.iter().map(|s| s.estimated_count())).await;
        let mut total = 0u64;
        for (shard, count) in counts.into_iter().enumerate() {
            total += count.map_err(|source| ProxyError::Storage { shard, source })?;
        }
        Ok(total)
    }

    /// Approximate number of file records.
    pub async fn count_files(&self) -> ProxyResult<u64> {
        Ok(self.metadata.estimated_count().await?)
    }

    /// Check the metadata store and every shard.
    pub async fn health_check(&self) -> ProxyResult<()> {
        self.metadata.health_check().await?;
        let checks = join_all(self.shards.iter().map(|s| s.health_check())).await;
        for (shard, check) in checks.into_iter().enumerate() {
            check.map_err(|source| ProxyError::Storage { shard, source })?;
        }
        Ok(())
    }

    /// Close every connection pool.
    pub async fn close(&self) {
        self.metadata.close().await;
        join_all(self.shards.iter().map(|s| s.close())).await;
        tracing::info!("Stores closed");
    }
}
