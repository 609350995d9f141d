//! PostgreSQL-based metadata store implementation.

use crate::error::MetadataResult;
use crate::models::FileRow;
use crate::repos::FileRepo;
use crate::store::MetadataStore;
use async_trait::async_trait;
use shardfs_core::config::PgSslMode;
use shardfs_core::sql::schema_statements;
use shardfs_core::{FileId, FileQuery, FileRecord};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode as SqlxPgSslMode};
use sqlx::{Pool, Postgres};
use std::str::FromStr;

/// PostgreSQL schema (embedded).
const POSTGRES_SCHEMA: &str = include_str!("postgres_schema.sql");

/// PostgreSQL-based metadata store.
pub struct PostgresStore {
    pool: Pool<Postgres>,
}

impl PostgresStore {
    /// Create a new PostgreSQL store from a connection URL.
    pub async fn from_url(
        url: &str,
        max_connections: u32,
        statement_timeout_ms: Option<u64>,
    ) -> MetadataResult<Self> {
        let opts = PgConnectOptions::from_str(url)?;
        Self::connect(opts, max_connections, statement_timeout_ms).await
    }

    /// Create a new PostgreSQL store from individual connection parameters.
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
    ) -> MetadataResult<Self> {
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

        // Log connection info without password
        tracing::info!(
            host = host,
            port = port,
            database = database,
            username = username.unwrap_or("<none>"),
            ssl_mode = ?ssl_mode,
            "Connecting metadata store to PostgreSQL"
        );

        Self::connect(opts, max_connections, statement_timeout_ms).await
    }

    async fn connect(
        mut opts: PgConnectOptions,
        max_connections: u32,
        statement_timeout_ms: Option<u64>,
    ) -> MetadataResult<Self> {
        if let Some(timeout_ms) = statement_timeout_ms {
            opts = opts.options([("statement_timeout", format!("{}ms", timeout_ms))]);
            tracing::info!("PostgreSQL statement_timeout set to {}ms", timeout_ms);
        }

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;

        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }
}

#[async_trait]
impl MetadataStore for PostgresStore {
    async fn migrate(&self) -> MetadataResult<()> {
        // PostgreSQL doesn't allow multiple statements in a single prepared statement.
        for statement in schema_statements(POSTGRES_SCHEMA) {
            sqlx::query(statement).execute(&self.pool).await?;
        }
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
impl FileRepo for PostgresStore {
    async fn find_one(&self, query: &FileQuery) -> MetadataResult<Option<FileRecord>> {
        let row = match query {
            FileQuery::ByName(name) => {
                sqlx::query_as::<_, FileRow>(
                    "SELECT * FROM files WHERE filename = $1 ORDER BY upload_date, id LIMIT 1",
                )
                .bind(name)
                .fetch_optional(&self.pool)
                .await?
            }
            FileQuery::ByChecksum(md5) => {
                sqlx::query_as::<_, FileRow>(
                    "SELECT * FROM files WHERE md5 = $1 ORDER BY upload_date, id LIMIT 1",
                )
                .bind(md5.to_hex())
                .fetch_optional(&self.pool)
                .await?
            }
        };
        row.map(FileRecord::try_from).transpose()
    }

    async fn delete_file(&self, id: &FileId) -> MetadataResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn estimated_count(&self) -> MetadataResult<u64> {
        // reltuples is -1 until the table has been vacuumed or analyzed.
        let estimate: Option<i64> = sqlx::query_scalar(
            "SELECT reltuples::BIGINT FROM pg_class WHERE oid = to_regclass('files')",
        )
        .fetch_optional(&self.pool)
        .await?;

        match estimate {
            Some(n) if n >= 0 => Ok(n as u64),
            _ => {
                let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM files")
                    .fetch_one(&self.pool)
                    .await?;
                Ok(count.max(0) as u64)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_skip_comments() {
        let statements = schema_statements(POSTGRES_SCHEMA);
        assert!(!statements.is_empty());
        assert!(statements[0].contains("CREATE TABLE IF NOT EXISTS files"));
        assert!(statements.iter().all(|s| !s.ends_with(';')));
    }
}
