//! HTTP retrieval server for shardfs.
//!
//! This crate provides the HTTP surface over the sharded proxy:
//! - Content retrieval by SHA-1 key
//! - Health and store statistics endpoints
//! - Prometheus metrics

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
