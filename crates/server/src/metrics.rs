//! Prometheus metrics for the shardfs server.
//!
//! Exposes retrieval outcomes, bytes served, integrity failures, shard errors
//! and reconstruction latency.
//!
//! The `/metrics` endpoint is unauthenticated. Metrics carry no file names or
//! keys, only aggregate counts and shard indexes.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{
    self, Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry,
    TextEncoder,
};
use shardfs_proxy::{IntegrityError, ProxyError};
use std::sync::{LazyLock, Once};

/// Global Prometheus registry for all metrics.
pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

pub static RETRIEVALS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "shardfs_retrievals_total",
            "Total retrieval requests by outcome",
        ),
        &["outcome"],
    )
    .expect("metric creation failed")
});

pub static BYTES_SERVED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "shardfs_bytes_served_total",
        "Total bytes of verified content returned",
    )
    .expect("metric creation failed")
});

pub static INTEGRITY_FAILURES: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "shardfs_integrity_failures_total",
            "Total reconstructions rejected by verification, by kind",
        ),
        &["kind"],
    )
    .expect("metric creation failed")
});

pub static SHARD_ERRORS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "shardfs_shard_errors_total",
            "Total chunk shard failures by shard index",
        ),
        &["shard"],
    )
    .expect("metric creation failed")
});

pub static RECONSTRUCT_DURATION: LazyLock<Histogram> = LazyLock::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "shardfs_reconstruct_duration_seconds",
            "Time taken to locate, gather and verify a file",
        )
        .buckets(vec![
            0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
    )
    .expect("metric creation failed")
});

/// Guard to ensure metrics are only registered once.
static REGISTER_ONCE: Once = Once::new();

/// Register all metrics with the global registry.
///
/// Idempotent, so tests may build several routers.
pub fn register_metrics() {
    REGISTER_ONCE.call_once(|| {
        REGISTRY
            .register(Box::new(RETRIEVALS.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(BYTES_SERVED.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(INTEGRITY_FAILURES.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(SHARD_ERRORS.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(RECONSTRUCT_DURATION.clone()))
            .expect("metric registration failed");
    });
}

/// GET /metrics - Prometheus metrics endpoint.
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = Vec::new();
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            format!("Failed to encode metrics: {e}").into_bytes(),
        ),
    }
}

pub fn record_retrieval(outcome: &str) {
    RETRIEVALS.with_label_values(&[outcome]).inc();
}

/// Count a failed proxy operation against the matching metric.
pub fn record_proxy_error(error: &ProxyError) {
    match error {
        ProxyError::Integrity(e) => {
            INTEGRITY_FAILURES
                .with_label_values(&[integrity_kind(e)])
                .inc();
        }
        ProxyError::Storage { shard, .. } => {
            SHARD_ERRORS
                .with_label_values(&[shard.to_string().as_str()])
                .inc();
        }
        _ => {}
    }
}

fn integrity_kind(error: &IntegrityError) -> &'static str {
    match error {
        IntegrityError::DuplicateSequence { .. } => "duplicate_sequence",
        IntegrityError::CorruptFragment { .. } => "corrupt_fragment",
        IntegrityError::MissingSequence { .. } => "missing_sequence",
        IntegrityError::LengthMismatch { .. } => "length_mismatch",
        IntegrityError::ChecksumMismatch { .. } => "checksum_mismatch",
        IntegrityError::KeyMismatch { .. } => "key_mismatch",
    }
}
