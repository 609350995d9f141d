//! Metadata store trait and the SQLite implementation.

use crate::error::MetadataResult;
use crate::models::FileRow;
use crate::repos::FileRepo;
use async_trait::async_trait;
use shardfs_core::{FileId, FileQuery, FileRecord};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Combined metadata store trait.
#[async_trait]
pub trait MetadataStore: FileRepo + Send + Sync {
    /// Run database migrations.
    async fn migrate(&self) -> MetadataResult<()>;

    /// Check database connectivity and health.
    async fn health_check(&self) -> MetadataResult<()>;

    /// Close the underlying connection pool.
    async fn close(&self);
}

const DEFAULT_BUSY_TIMEOUT_SECS: u64 = 5;

/// SQLite-based metadata store.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Open (or create) a SQLite metadata store.
    ///
    /// `query_timeout_secs` bounds how long a query waits on a locked database.
    pub async fn new(
        path: impl AsRef<Path>,
        query_timeout_secs: Option<u64>,
    ) -> MetadataResult<Self> {
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
            // Prevent transient "database is locked" errors under concurrent access.
            .busy_timeout(busy_timeout);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;

        tracing::info!(
            path = %path.display(),
            busy_timeout_secs = busy_timeout.as_secs(),
            "SQLite metadata store opened"
        );

        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl MetadataStore for SqliteStore {
    async fn migrate(&self) -> MetadataResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    async fn health_check(&self) -> MetadataResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl FileRepo for SqliteStore {
    async fn find_one(&self, query: &FileQuery) -> MetadataResult<Option<FileRecord>> {
        let row = match query {
            FileQuery::ByName(name) => {
                sqlx::query_as::<_, FileRow>(
                    "SELECT * FROM files WHERE filename = ? ORDER BY upload_date, id LIMIT 1",
                )
                .bind(name)
                .fetch_optional(&self.pool)
                .await?
            }
            FileQuery::ByChecksum(md5) => {
                sqlx::query_as::<_, FileRow>(
                    "SELECT * FROM files WHERE md5 = ? ORDER BY upload_date, id LIMIT 1",
                )
                .bind(md5.to_hex())
                .fetch_optional(&self.pool)
                .await?
            }
        };
        row.map(FileRecord::try_from).transpose()
    }

    async fn delete_file(&self, id: &FileId) -> MetadataResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn estimated_count(&self) -> MetadataResult<u64> {
        // SQLite keeps no row estimate; an exact count is cheap enough here.
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM files")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS files (
    id TEXT PRIMARY KEY,
    filename TEXT,
    md5 TEXT NOT NULL,
    length INTEGER NOT NULL,
    chunk_size INTEGER NOT NULL,
    upload_date TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_files_filename ON files(filename);
CREATE INDEX IF NOT EXISTS idx_files_md5 ON files(md5);
"#;
