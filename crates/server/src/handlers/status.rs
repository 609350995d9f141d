//! Health and statistics endpoints.

use crate::error::ApiResult;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /v1/health
///
/// Healthy only when the metadata store and every shard answer.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    state.proxy.health_check().await?;

    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    }))
}

/// Store statistics. Counts are estimates on PostgreSQL backends.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub files: u64,
    pub chunks: u64,
    pub shards: usize,
}

/// GET /v1/stats
pub async fn get_stats(State(state): State<AppState>) -> ApiResult<Json<StatsResponse>> {
    let (files, chunks) = tokio::try_join!(state.proxy.count_files(), state.proxy.count_chunks())?;

    Ok(Json(StatsResponse {
        files,
        chunks,
        shards: state.proxy.shard_count(),
    }))
}
