//! Server test utilities.

use bytes::Bytes;
use shardfs_core::config::AppConfig;
use shardfs_core::{FileId, FileRecord, Md5Checksum};
use shardfs_metadata::{MetadataStore, SqliteStore};
use shardfs_proxy::ShardedProxy;
use shardfs_server::{AppState, create_router};
use shardfs_storage::{ChunkStore, SqliteChunkStore};
use std::sync::Arc;
use tempfile::TempDir;
use time::OffsetDateTime;

/// A test server over SQLite stores in a temporary directory.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    pub metadata: Arc<SqliteStore>,
    pub shards: Vec<Arc<SqliteChunkStore>>,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a new test server with two shards.
    pub async fn new() -> Self {
        Self::with_config(2, |_| {}).await
    }

    /// Create a test server with custom config modifications.
    pub async fn with_config<F>(shard_count: usize, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let mut config = AppConfig::for_testing(temp_dir.path(), shard_count);
        modifier(&mut config);

        let metadata = Arc::new(
            SqliteStore::new(temp_dir.path().join("metadata.db"), None)
                .await
                .expect("Failed to create metadata store"),
        );

        let mut shards = Vec::with_capacity(shard_count);
        for i in 0..shard_count {
            shards.push(Arc::new(
                SqliteChunkStore::new(temp_dir.path().join(format!("shard-{i}.db")), None)
                    .await
                    .expect("Failed to create chunk shard"),
            ));
        }

        let proxy = ShardedProxy::new(
            metadata.clone() as Arc<dyn MetadataStore>,
            shards
                .iter()
                .map(|s| s.clone() as Arc<dyn ChunkStore>)
                .collect(),
        );

        shardfs_server::metrics::register_metrics();
        let state = AppState::new(config, proxy);
        let router = create_router(state.clone());

        Self {
            router,
            state,
            metadata,
            shards,
            _temp_dir: temp_dir,
        }
    }

    /// Insert a file record named `filename` and spread its fragments round-robin.
    pub async fn seed_file(
        &self,
        id: &str,
        filename: &str,
        data: &Bytes,
        chunk_size: usize,
    ) -> FileRecord {
        let record = FileRecord {
            id: FileId::new(id),
            filename: Some(filename.to_string()),
            md5: Md5Checksum::compute(data),
            length: data.len() as u64,
            chunk_size: chunk_size as u64,
            upload_date: OffsetDateTime::now_utc(),
        };
        self.insert_record(&record).await;

        for (n, piece) in data.chunks(chunk_size).enumerate() {
            let shard = &self.shards[n % self.shards.len()];
            self.insert_chunk(shard, &format!("{id}-{n}"), id, n as i64, piece)
                .await;
        }
        record
    }

    pub async fn insert_record(&self, record: &FileRecord) {
        sqlx::query(
            "INSERT INTO files (id, filename, md5, length, chunk_size, upload_date) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(record.id.as_str())
        .bind(record.filename.as_deref())
        .bind(record.md5.to_hex())
        .bind(record.length as i64)
        .bind(record.chunk_size as i64)
        .bind(record.upload_date)
        .execute(self.metadata.pool())
        .await
        .expect("Failed to insert file record");
    }

    pub async fn insert_chunk(
        &self,
        shard: &SqliteChunkStore,
        id: &str,
        files_id: &str,
        n: i64,
        data: &[u8],
    ) {
        sqlx::query("INSERT INTO chunks (id, files_id, n, data) VALUES (?, ?, ?, ?)")
            .bind(id)
            .bind(files_id)
            .bind(n)
            .bind(data)
            .execute(shard.pool())
            .await
            .expect("Failed to insert chunk");
    }
}
