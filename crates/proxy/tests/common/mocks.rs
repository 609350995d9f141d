use async_trait::async_trait;
use shardfs_core::{ChunkRecord, FileId, FileQuery, FileRecord};
use shardfs_metadata::{FileRepo, MetadataError, MetadataResult, MetadataStore};
use shardfs_storage::{ChunkStore, StorageError, StorageResult};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::time::Duration;

/// In-memory chunk shard with injectable latency and failures.
#[allow(dead_code)]
pub struct MemoryChunkStore {
    label: String,
    chunks: Mutex<Vec<ChunkRecord>>,
    delay: Duration,
    pub fail_reads: AtomicBool,
    pub fail_deletes: AtomicBool,
    pub find_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
}

#[allow(dead_code)]
impl MemoryChunkStore {
    pub fn new(label: impl Into<String>) -> Arc<Self> {
        Self::with_delay(label, Duration::ZERO)
    }

    pub fn with_delay(label: impl Into<String>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            label: label.into(),
            chunks: Mutex::new(Vec::new()),
            delay,
            fail_reads: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
            find_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
        })
    }

    pub fn insert(&self, chunk: ChunkRecord) {
        self.chunks.lock().unwrap().push(chunk);
    }

    pub fn len(&self) -> usize {
        self.chunks.lock().unwrap().len()
    }

    pub fn count_for(&self, files_id: &FileId) -> usize {
        self.chunks
            .lock()
            .unwrap()
            .iter()
            .filter(|c| &c.files_id == files_id)
            .count()
    }

    fn unavailable() -> StorageError {
        StorageError::Database(sqlx::Error::PoolTimedOut)
    }
}

#[async_trait]
impl ChunkStore for MemoryChunkStore {
    async fn find_chunks(&self, files_id: &FileId) -> StorageResult<Vec<ChunkRecord>> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        Ok(self
            .chunks
            .lock()
            .unwrap()
            .iter()
            .filter(|c| &c.files_id == files_id)
            .cloned()
            .collect())
    }

    async fn delete_chunks(&self, files_id: &FileId) -> StorageResult<u64> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        let mut chunks = self.chunks.lock().unwrap();
        let before = chunks.len();
        chunks.retain(|c| &c.files_id != files_id);
        Ok((before - chunks.len()) as u64)
    }

    async fn estimated_count(&self) -> StorageResult<u64> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        Ok(self.len() as u64)
    }

    async fn health_check(&self) -> StorageResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        Ok(())
    }

    async fn close(&self) {}

    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn label(&self) -> &str {
        &self.label
    }
}

/// In-memory metadata store.
#[allow(dead_code)]
#[derive(Default)]
pub struct MemoryMetadataStore {
    files: Mutex<Vec<FileRecord>>,
    pub fail: AtomicBool,
    /// Fail only `delete_file`, leaving lookups working.
    pub fail_deletes: AtomicBool,
    pub find_calls: AtomicUsize,
}

#[allow(dead_code)]
impl MemoryMetadataStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn insert(&self, record: FileRecord) {
        self.files.lock().unwrap().push(record);
    }

    pub fn len(&self) -> usize {
        self.files.lock().unwrap().len()
    }

    pub fn contains(&self, id: &FileId) -> bool {
        self.files.lock().unwrap().iter().any(|f| &f.id == id)
    }

    fn check(&self) -> MetadataResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(MetadataError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl FileRepo for MemoryMetadataStore {
    async fn find_one(&self, query: &FileQuery) -> MetadataResult<Option<FileRecord>> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let files = self.files.lock().unwrap();
        Ok(files
            .iter()
            .filter(|f| match query {
                FileQuery::ByName(name) => f.filename.as_deref() == Some(name.as_str()),
                FileQuery::ByChecksum(md5) => &f.md5 == md5,
            })
            .min_by_key(|f| (f.upload_date, f.id.clone()))
            .cloned())
    }

    async fn delete_file(&self, id: &FileId) -> MetadataResult<bool> {
        self.check()?;
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(MetadataError::Database(sqlx::Error::PoolTimedOut));
        }
        let mut files = self.files.lock().unwrap();
        let before = files.len();
        files.retain(|f| &f.id != id);
        Ok(files.len() < before)
    }

    async fn estimated_count(&self) -> MetadataResult<u64> {
        self.check()?;
        Ok(self.len() as u64)
    }
}

#[async_trait]
impl MetadataStore for MemoryMetadataStore {
    async fn migrate(&self) -> MetadataResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> MetadataResult<()> {
        self.check()
    }

    async fn close(&self) {}
}
