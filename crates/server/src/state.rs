//! Application state shared across handlers.

use shardfs_core::config::AppConfig;
use shardfs_proxy::ShardedProxy;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Metadata store and chunk shards.
    pub proxy: ShardedProxy,
}

impl AppState {
    pub fn new(config: AppConfig, proxy: ShardedProxy) -> Self {
        if config.shards.len() != proxy.shard_count() {
            tracing::warn!(
                configured = config.shards.len(),
                connected = proxy.shard_count(),
                "Shard count differs from configuration"
            );
        }

        Self {
            config: Arc::new(config),
            proxy,
        }
    }
}
