//! Content retrieval and the unsupported write endpoints.

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;
use axum::body::{Body, Bytes};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};

/// GET /get/{key} and GET /get/sha1/{key}
///
/// Returns the content whose SHA-1 is `key`, after it has been reassembled
/// from every shard and verified.
pub async fn get_file(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Response> {
    let timer = metrics::RECONSTRUCT_DURATION.start_timer();
    let result = state.proxy.retrieve(&key).await;
    timer.observe_duration();

    match result {
        Ok(Some(content)) => {
            metrics::record_retrieval("ok");
            metrics::BYTES_SERVED.inc_by(content.len() as u64);
            tracing::debug!(key = %key, bytes = content.len(), "serving file");
            Ok((
                StatusCode::OK,
                [
                    (CONTENT_TYPE, "application/octet-stream".to_string()),
                    (CONTENT_LENGTH, content.len().to_string()),
                ],
                Body::from(content),
            )
                .into_response())
        }
        Ok(None) => {
            metrics::record_retrieval("not_found");
            Err(ApiError::NotFound)
        }
        Err(e) => {
            metrics::record_retrieval("error");
            metrics::record_proxy_error(&e);
            tracing::error!(key = %key, error = %e, "retrieval failed");
            Err(e.into())
        }
    }
}

/// POST /put
pub async fn put_file(State(state): State<AppState>, body: Bytes) -> ApiResult<Response> {
    let id = state.proxy.put(body).await?;
    Ok((StatusCode::CREATED, id.to_string()).into_response())
}

/// PUT /put/{key}
pub async fn put_file_with_key(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Bytes,
) -> ApiResult<Response> {
    tracing::debug!(key = %key, bytes = body.len(), "write requested");
    let id = state.proxy.put(body).await?;
    Ok((StatusCode::CREATED, id.to_string()).into_response())
}
