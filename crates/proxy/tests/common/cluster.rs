use super::fixtures::{file_record, split_fixed};
use super::mocks::{MemoryChunkStore, MemoryMetadataStore};
use bytes::Bytes;
use shardfs_core::{ChunkRecord, FileRecord};
use shardfs_metadata::MetadataStore;
use shardfs_proxy::ShardedProxy;
use shardfs_storage::ChunkStore;
use std::sync::Arc;
use tokio::time::Duration;

/// A proxy over in-memory stores, with direct handles on each store.
#[allow(dead_code)]
pub struct Cluster {
    pub metadata: Arc<MemoryMetadataStore>,
    pub shards: Vec<Arc<MemoryChunkStore>>,
    pub proxy: ShardedProxy,
}

#[allow(dead_code)]
impl Cluster {
    pub fn new(shard_count: usize) -> Self {
        Self::with_delays(&vec![0; shard_count])
    }

    /// One shard per entry, each answering after the given number of milliseconds.
    pub fn with_delays(delays_ms: &[u64]) -> Self {
        let metadata = MemoryMetadataStore::new();
        let shards: Vec<Arc<MemoryChunkStore>> = delays_ms
            .iter()
            .enumerate()
            .map(|(i, &ms)| {
                MemoryChunkStore::with_delay(format!("memory:shard-{i}"), Duration::from_millis(ms))
            })
            .collect();

        let proxy = ShardedProxy::new(
            metadata.clone() as Arc<dyn MetadataStore>,
            shards
                .iter()
                .map(|s| s.clone() as Arc<dyn ChunkStore>)
                .collect(),
        );

        Self {
            metadata,
            shards,
            proxy,
        }
    }

    /// Place fragments round-robin across the shards.
    pub fn distribute(&self, chunks: Vec<ChunkRecord>) {
        for (i, chunk) in chunks.into_iter().enumerate() {
            self.shards[i % self.shards.len()].insert(chunk);
        }
    }

    /// Store `data` under its SHA-1 key, split into fixed-size fragments.
    pub fn store(&self, id: &str, data: &Bytes, chunk_size: usize) -> FileRecord {
        let key = super::fixtures::sha1_key(data);
        let record = file_record(id, Some(&key), data, chunk_size as u64);
        self.distribute(split_fixed(&record.id, data, chunk_size));
        self.metadata.insert(record.clone());
        record
    }

    pub fn total_chunks(&self) -> usize {
        self.shards.iter().map(|s| s.len()).sum()
    }
}
