//! Route configuration.

use crate::handlers;
use crate::metrics::metrics_handler;
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post, put};
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/get/{key}", get(handlers::get_file))
        .route("/get/sha1/{key}", get(handlers::get_file))
        .route("/put", post(handlers::put_file))
        .route("/put/{key}", put(handlers::put_file_with_key))
        .route("/v1/health", get(handlers::health_check))
        .route("/v1/stats", get(handlers::get_stats));

    // Must stay network-restricted to the Prometheus scrapers.
    if state.config.server.metrics_enabled {
        router = router.route("/metrics", get(metrics_handler));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
