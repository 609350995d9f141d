//! API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use shardfs_metadata::MetadataError;
use shardfs_proxy::ProxyError;

/// API error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No file matches. Rendered with an empty body.
    #[error("not found")]
    NotFound,

    #[error(transparent)]
    Proxy(#[from] ProxyError),
}

impl ApiError {
    /// Get the error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Proxy(e) => match e {
                ProxyError::Validation(_) => "bad_request",
                ProxyError::Integrity(_) => "integrity_error",
                ProxyError::Metadata(MetadataError::Corrupt { .. }) => "corrupt_metadata",
                ProxyError::Metadata(_) => "metadata_unavailable",
                ProxyError::Storage { .. } => "store_unavailable",
                ProxyError::PartialDelete(_) => "partial_delete",
                ProxyError::RecordDelete { .. } => "metadata_unavailable",
                ProxyError::Unsupported(_) => "unsupported",
                ProxyError::Config(_) => "internal_error",
            },
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Proxy(e) => match e {
                ProxyError::Validation(_) => StatusCode::BAD_REQUEST,
                ProxyError::Unsupported(_) => StatusCode::NOT_IMPLEMENTED,
                e if e.is_retryable() => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if matches!(self, Self::NotFound) {
            return status.into_response();
        }
        let body = ErrorResponse {
            code: self.code().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
