//! SQLite chunk shard backend.

use crate::error::StorageResult;
use crate::models::ChunkRow;
use crate::traits::ChunkStore;
use async_trait::async_trait;
use shardfs_core::{ChunkRecord, FileId};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::instrument;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS chunks (
    id TEXT PRIMARY KEY,
    files_id TEXT NOT NULL,
    n INTEGER NOT NULL,
    data BLOB NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_chunks_files_id ON chunks(files_id);
"#;

const DEFAULT_BUSY_TIMEOUT_SECS: u64 = 5;

/// SQLite-backed chunk shard.
pub struct SqliteChunkStore {
    pool: Pool<Sqlite>,
    label: String,
}

impl SqliteChunkStore {
    /// Open (or create) a SQLite shard database.
    ///
    /// `query_timeout_secs` bounds how long a query waits on a locked database.
    pub async fn new(
        path: impl AsRef<Path>,
        query_timeout_secs: Option<u64>,
    ) -> StorageResult<Self> {
        let path = path.as_ref();
        let busy_timeout =
            Duration::from_secs(query_timeout_secs.unwrap_or(DEFAULT_BUSY_TIMEOUT_SECS));

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .busy_timeout(busy_timeout);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(opts)
            .await?;

        sqlx::query(SCHEMA_SQL).execute(&pool).await?;

        let label = format!("sqlite:{}", path.display());
        tracing::info!(
            shard = %label,
            busy_timeout_secs = busy_timeout.as_secs(),
            "SQLite chunk shard opened"
        );

        Ok(Self { pool, label })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl ChunkStore for SqliteChunkStore {
    #[instrument(skip(self), fields(backend = "sqlite", shard = %self.label))]
    async fn find_chunks(&self, files_id: &FileId) -> StorageResult<Vec<ChunkRecord>> {
        let rows = sqlx::query_as::<_, ChunkRow>(
            "SELECT id, files_id, n, data FROM chunks WHERE files_id = ? ORDER BY n",
        )
        .bind(files_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ChunkRecord::try_from).collect()
    }

    #[instrument(skip(self), fields(backend = "sqlite", shard = %self.label))]
    async fn delete_chunks(&self, files_id: &FileId) -> StorageResult<u64> {
        let result = sqlx::query("DELETE FROM chunks WHERE files_id = ?")
            .bind(files_id.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn estimated_count(&self) -> StorageResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chunks")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn health_check(&self) -> StorageResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    fn label(&self) -> &str {
        &self.label
    }
}
