//! Route definitions.

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers::{self, AppState};

/// Create the router: the form at `/` and a liveness probe.
pub fn create_router(app_state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handlers::index).post(handlers::analyze))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
