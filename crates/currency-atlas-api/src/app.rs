//! Router assembly shared by the binary and the integration tests.

use std::path::Path;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::routes;
use crate::state::AppState;

/// Builds the full application router.
///
/// Uploaded blobs in `upload_dir` are served under `/files`.
// TODO: Replace CorsLayer::permissive() with restricted origins for production.
pub fn build_router(state: AppState, upload_dir: &Path, max_upload_bytes: usize) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api", routes::api_router(max_upload_bytes))
        .nest_service("/files", ServeDir::new(upload_dir))
        .method_not_allowed_fallback(routes::method_not_allowed)
        .fallback(routes::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
