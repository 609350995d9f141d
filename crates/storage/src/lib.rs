//! Chunk shard storage for shardfs.
//!
//! This crate provides:
//! - The `ChunkStore` trait every shard implements
//! - Backends: SQLite and PostgreSQL, one database per shard
//!
//! The `(files_id, n)` pair is not unique in any backend. Duplicate sequence
//! numbers are surfaced to readers, which treat them as corruption.

pub mod backends;
pub mod error;
pub mod models;
pub mod traits;

pub use backends::{postgres::PostgresChunkStore, sqlite::SqliteChunkStore};
pub use error::{StorageError, StorageResult};
pub use traits::ChunkStore;

use shardfs_core::config::StoreConfig;
use std::sync::Arc;

/// Open a chunk shard from configuration.
pub async fn from_config(config: &StoreConfig) -> StorageResult<Arc<dyn ChunkStore>> {
    config.validate().map_err(StorageError::Config)?;

    match config {
        StoreConfig::Sqlite {
            path,
            query_timeout_secs,
        } => {
            let store = SqliteChunkStore::new(path, *query_timeout_secs).await?;
            Ok(Arc::new(store))
        }
        StoreConfig::Postgres {
            url,
            host,
            port,
            username,
            password,
            database,
            ssl_mode,
            max_connections,
            statement_timeout_ms,
        } => {
            let store = if let Some(url) = url {
                PostgresChunkStore::from_url(url, *max_connections, *statement_timeout_ms).await?
            } else if let (Some(host), Some(database)) = (host.as_ref(), database.as_ref()) {
                PostgresChunkStore::from_params(
                    host,
                    port.unwrap_or(5432),
                    username.as_deref(),
                    password.as_deref(),
                    database,
                    *ssl_mode,
                    *max_connections,
                    *statement_timeout_ms,
                )
                .await?
            } else {
                return Err(StorageError::Config(
                    "postgres config requires either 'url' or 'host' + 'database'".to_string(),
                ));
            };
            Ok(Arc::new(store))
        }
    }
}
