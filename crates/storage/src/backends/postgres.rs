//! PostgreSQL chunk shard backend.

use crate::error::StorageResult;
use crate::models::ChunkRow;
use crate::traits::ChunkStore;
use async_trait::async_trait;
use shardfs_core::config::PgSslMode;
use shardfs_core::sql::schema_statements;
use shardfs_core::{ChunkRecord, FileId};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode as SqlxPgSslMode};
use sqlx::{Pool, Postgres};
use std::str::FromStr;
use tracing::instrument;

const POSTGRES_SCHEMA: &str = include_str!("postgres_schema.sql");

/// PostgreSQL-backed chunk shard.
pub struct PostgresChunkStore {
    pool: Pool<Postgres>,
    label: String,
}

impl PostgresChunkStore {
    /// Connect to a shard using a connection URL.
    pub async fn from_url(
        url: &str,
        max_connections: u32,
        statement_timeout_ms: Option<u64>,
    ) -> StorageResult<Self> {
        let opts = PgConnectOptions::from_str(url)?;
        let label = format!(
            "postgres:{}:{}/{}",
            opts.get_host(),
            opts.get_port(),
            opts.get_database().unwrap_or("<default>")
        );
        Self::connect(opts, label, max_connections, statement_timeout_ms).await
    }

    /// Connect to a shard using individual connection parameters.
    #[allow(clippy::too_many_arguments)]
    pub async fn from_params(
        host: &str,
        port: u16,
        username: Option<&str>,
        password: Option<&str>,
        database: &str,
        ssl_mode: Option<PgSslMode>,
        max_connections: u32,
        statement_timeout_ms: Option<u64>,
    ) -> StorageResult<Self> {
        let mut opts = PgConnectOptions::new()
            .host(host)
            .port(port)
            .database(database);

        if let Some(user) = username {
            opts = opts.username(user);
        }

        if let Some(pass) = password {
            opts = opts.password(pass);
        }

        if let Some(mode) = ssl_mode {
            let sqlx_mode = match mode {
                PgSslMode::Disable => SqlxPgSslMode::Disable,
                PgSslMode::Prefer => SqlxPgSslMode::Prefer,
                PgSslMode::Require => SqlxPgSslMode::Require,
            };
            opts = opts.ssl_mode(sqlx_mode);
        }

        let label = format!("postgres:{host}:{port}/{database}");
        Self::connect(opts, label, max_connections, statement_timeout_ms).await
    }

    async fn connect(
        mut opts: PgConnectOptions,
        label: String,
        max_connections: u32,
        statement_timeout_ms: Option<u64>,
    ) -> StorageResult<Self> {
        if let Some(timeout_ms) = statement_timeout_ms {
            opts = opts.options([("statement_timeout", format!("{}ms", timeout_ms))]);
        }

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(opts)
            .await?;

        for statement in schema_statements(POSTGRES_SCHEMA) {
            sqlx::query(statement).execute(&pool).await?;
        }

        tracing::info!(
            shard = %label,
            statement_timeout_ms = ?statement_timeout_ms,
            "PostgreSQL chunk shard connected"
        );

        Ok(Self { pool, label })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }
}

#[async_trait]
impl ChunkStore for PostgresChunkStore {
    #[instrument(skip(self), fields(backend = "postgres", shard = %self.label))]
    async fn find_chunks(&self, files_id: &FileId) -> StorageResult<Vec<ChunkRecord>> {
        let rows = sqlx::query_as::<_, ChunkRow>(
            "SELECT id, files_id, n, data FROM chunks WHERE files_id = $1 ORDER BY n",
        )
        .bind(files_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ChunkRecord::try_from).collect()
    }

    #[instrument(skip(self), fields(backend = "postgres", shard = %self.label))]
    async fn delete_chunks(&self, files_id: &FileId) -> StorageResult<u64> {
        let result = sqlx::query("DELETE FROM chunks WHERE files_id = $1")
            .bind(files_id.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn estimated_count(&self) -> StorageResult<u64> {
        // reltuples is -1 until the table has been vacuumed or analyzed.
        let estimate: Option<i64> = sqlx::query_scalar(
            "SELECT reltuples::BIGINT FROM pg_class WHERE oid = to_regclass('chunks')",
        )
        .fetch_optional(&self.pool)
        .await?;

        match estimate {
            Some(n) if n >= 0 => Ok(n as u64),
            _ => {
                let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chunks")
                    .fetch_one(&self.pool)
                    .await?;
                Ok(count.max(0) as u64)
            }
        }
    }

    async fn health_check(&self) -> StorageResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    fn label(&self) -> &str {
        &self.label
    }
}
