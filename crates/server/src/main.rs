//! shardfs server binary.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use shardfs_core::FileQuery;
use shardfs_core::config::AppConfig;
use shardfs_proxy::{DeleteOutcome, ProxyError, ShardedProxy};
use shardfs_server::{AppState, create_router};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// shardfs - scatter-gather file proxy over sharded chunk stores
#[derive(Parser, Debug)]
#[command(name = "shardfsd")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "SHARDFS_CONFIG",
        default_value = "config/shardfs.toml"
    )]
    config: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Print file and fragment counts
    Count,
    /// Delete one file from every shard and the metadata store
    Delete {
        /// Exact file name
        #[arg(long)]
        name: Option<String>,
        /// MD5 checksum, 32 hex chars
        #[arg(long)]
        md5: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("shardfs v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args.config)?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;

    let proxy = ShardedProxy::connect(&config)
        .await
        .context("failed to connect stores")?;

    let result = match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, proxy.clone()).await,
        Command::Count => count(&proxy).await,
        Command::Delete { name, md5 } => delete(&proxy, name.as_deref(), md5.as_deref()).await,
    };

    proxy.close().await;
    result
}

/// Load configuration from the TOML file (optional) and `SHARDFS_` env vars.
fn load_config(path: &str) -> Result<AppConfig> {
    let config_path = std::path::Path::new(path);
    let mut figment = Figment::new();
    let has_config_file = config_path.exists();

    if has_config_file {
        tracing::info!(config_path = %path, "Loading configuration from file");
        figment = figment.merge(Toml::file(path));
    } else {
        tracing::debug!("No config file found at {}", path);
    }

    // SHARDFS_CONFIG only names the file.
    let has_env_config =
        std::env::vars().any(|(key, _)| key.starts_with("SHARDFS_") && key != "SHARDFS_CONFIG");

    if !has_config_file && !has_env_config {
        anyhow::bail!(
            "No configuration provided.\n\n\
             Provide configuration via one of:\n  \
             1. Config file: shardfsd --config /path/to/shardfs.toml\n  \
             2. Environment variables: SHARDFS_METADATA__TYPE=sqlite \
             SHARDFS_METADATA__PATH=/var/lib/shardfs/metadata.db shardfsd\n\n\
             See config/shardfs.example.toml for example configuration.\n\
             Set SHARDFS_CONFIG env var to specify a default config file path."
        );
    }

    figment
        .merge(Env::prefixed("SHARDFS_").split("__"))
        .extract()
        .context("failed to load configuration")
}

async fn serve(config: AppConfig, proxy: ShardedProxy) -> Result<()> {
    shardfs_server::metrics::register_metrics();
    tracing::info!("Prometheus metrics registered");

    // Refuse to start while any store is unreachable.
    proxy
        .health_check()
        .await
        .context("store health check failed")?;
    tracing::info!(shards = proxy.shard_count(), "All stores reachable");

    let addr: SocketAddr = config.server.bind.parse().context("invalid bind address")?;
    let app = create_router(AppState::new(config, proxy));

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

async fn count(proxy: &ShardedProxy) -> Result<()> {
    let files = proxy
        .count_files()
        .await
        .context("failed to count files")?;
    let chunks = proxy
        .count_chunks()
        .await
        .context("failed to count chunks")?;

    println!("files:  {files}");
    println!("chunks: {chunks} (across {} shards)", proxy.shard_count());
    Ok(())
}

async fn delete(proxy: &ShardedProxy, name: Option<&str>, md5: Option<&str>) -> Result<()> {
    let query = FileQuery::from_filter(name, md5).context("invalid delete filter")?;

    match proxy.delete(&query).await {
        Ok(DeleteOutcome::NotFound) => {
            println!("no file matches {query}");
            Ok(())
        }
        Ok(DeleteOutcome::Deleted(report)) => {
            println!(
                "deleted file {} ({} fragments over {} shards)",
                report.file,
                report.fragments_removed(),
                report.shards.len()
            );
            Ok(())
        }
        Err(ProxyError::PartialDelete(report)) => {
            for shard in &report.shards {
                match &shard.result {
                    Ok(n) => println!("shard {} ({}): removed {n}", shard.shard, shard.store),
                    Err(e) => println!("shard {} ({}): FAILED: {e}", shard.shard, shard.store),
                }
            }
            anyhow::bail!("{report}; file record kept, rerun to retry")
        }
        Err(ProxyError::RecordDelete { report, source }) => {
            println!(
                "removed {} fragments of file {} from all {} shards",
                report.fragments_removed(),
                report.file,
                report.shards.len()
            );
            anyhow::bail!("file record not removed: {source}; rerun to retry")
        }
        Err(e) => Err(e).context("delete failed"),
    }
}
