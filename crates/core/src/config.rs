//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:4321").
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Enable the /metrics endpoint for Prometheus scraping (default: true).
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
}

fn default_bind() -> String {
    "0.0.0.0:4321".to_string()
}

fn default_metrics_enabled() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            metrics_enabled: default_metrics_enabled(),
        }
    }
}

/// PostgreSQL SSL mode configuration.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PgSslMode {
    /// Disable SSL/TLS entirely.
    Disable,
    /// Prefer SSL/TLS but allow unencrypted connections (default).
    #[default]
    Prefer,
    /// Require SSL/TLS for all connections.
    Require,
}

/// Connection settings for one store: the metadata store or a single chunk shard.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreConfig {
    /// SQLite database file (testing and single-host deployments).
    Sqlite {
        /// Database file path.
        path: PathBuf,
        /// Seconds a query waits on a locked database before failing (default: 5).
        /// SQLite cannot cancel a query that is already running.
        #[serde(default)]
        query_timeout_secs: Option<u64>,
    },
    /// PostgreSQL database.
    Postgres {
        /// Connection URL. Takes precedence over the individual fields.
        url: Option<String>,
        /// Database host.
        host: Option<String>,
        /// Database port (default: 5432).
        #[serde(default = "default_pg_port")]
        port: Option<u16>,
        /// Database username.
        username: Option<String>,
        /// Database password.
        /// WARNING: Prefer SHARDFS_* env vars over storing in config.
        password: Option<String>,
        /// Database name.
        database: Option<String>,
        /// SSL mode for connections.
        ssl_mode: Option<PgSslMode>,
        /// Maximum connections in the pool.
        #[serde(default = "default_max_connections")]
        max_connections: u32,
        /// Statement timeout in milliseconds. PostgreSQL cancels queries past it.
        #[serde(default)]
        statement_timeout_ms: Option<u64>,
    },
}

fn default_max_connections() -> u32 {
    10
}

fn default_pg_port() -> Option<u16> {
    Some(5432)
}

impl StoreConfig {
    /// Validate store configuration invariants.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            StoreConfig::Sqlite { .. } => Ok(()),
            StoreConfig::Postgres {
                url,
                host,
                database,
                max_connections,
                ..
            } => {
                if *max_connections == 0 {
                    return Err("postgres max_connections must be at least 1".to_string());
                }
                match (url.as_ref(), host.as_ref(), database.as_ref()) {
                    (Some(_), _, _) => Ok(()),
                    (None, Some(_), Some(_)) => Ok(()),
                    (None, None, _) => Err(
                        "postgres config requires either 'url' or 'host' + 'database'".to_string(),
                    ),
                    (None, Some(_), None) => Err(
                        "postgres config requires 'database' when using individual fields"
                            .to_string(),
                    ),
                }
            }
        }
    }

    /// Short human-readable description for logs. Never includes credentials.
    pub fn describe(&self) -> String {
        match self {
            StoreConfig::Sqlite { path, .. } => format!("sqlite:{}", path.display()),
            StoreConfig::Postgres {
                url: Some(_), ..
            } => "postgres:<url>".to_string(),
            StoreConfig::Postgres {
                host,
                port,
                database,
                ..
            } => format!(
                "postgres:{}:{}/{}",
                host.as_deref().unwrap_or("<none>"),
                port.unwrap_or(5432),
                database.as_deref().unwrap_or("<none>")
            ),
        }
    }
}

/// Complete application configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Metadata store holding file records.
    pub metadata: StoreConfig,
    /// Chunk shards, in order. Every read and delete is broadcast to all of them.
    pub shards: Vec<StoreConfig>,
}

impl AppConfig {
    /// Validate the whole configuration.
    pub fn validate(&self) -> Result<(), String> {
        self.metadata
            .validate()
            .map_err(|e| format!("metadata: {e}"))?;
        if self.shards.is_empty() {
            return Err("at least one chunk shard must be configured".to_string());
        }
        for (i, shard) in self.shards.iter().enumerate() {
            shard.validate().map_err(|e| format!("shards[{i}]: {e}"))?;
        }
        Ok(())
    }

    /// Create a test configuration backed by SQLite files under `dir`.
    ///
    /// **For testing only.**
    pub fn for_testing(dir: &std::path::Path, shard_count: usize) -> Self {
        Self {
            server: ServerConfig::default(),
            metadata: StoreConfig::Sqlite {
                path: dir.join("metadata.db"),
                query_timeout_secs: None,
            },
            shards: (0..shard_count)
                .map(|i| StoreConfig::Sqlite {
                    path: dir.join(format!("shard-{i}.db")),
                    query_timeout_secs: None,
                })
                .collect(),
        }
    }
}
