//! Route modules, one per surface of the registry.

pub mod auth;
pub mod events;
pub mod health;
pub mod projection;
pub mod upload;

use axum::Router;
use axum::extract::OriginalUri;
use axum::http::{Method, StatusCode};
use axum::response::Response;
use currency_atlas_core::error::DomainError;

use crate::error::ErrorBody;
use crate::state::AppState;

/// Every route nested under `/api`.
pub fn api_router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .merge(events::router())
        .merge(upload::router(max_upload_bytes))
        .merge(projection::router())
        .merge(auth::router())
        .method_not_allowed_fallback(method_not_allowed)
}

/// Answers a known path requested with a method it does not serve.
pub(crate) async fn method_not_allowed(method: Method, OriginalUri(uri): OriginalUri) -> Response {
    ErrorBody::response(
        StatusCode::METHOD_NOT_ALLOWED,
        "method_not_allowed",
        format!("{method} is not supported on {}", uri.path()),
    )
}

/// Answers a path no route matches.
pub(crate) async fn not_found(OriginalUri(uri): OriginalUri) -> Response {
    ErrorBody::response(
        StatusCode::NOT_FOUND,
        "not_found",
        format!("no route for {}", uri.path()),
    )
}

/// Parses an optional `year` query parameter. A blank value counts as absent.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the value is not an integer.
pub(crate) fn parse_year(raw: Option<&str>) -> Result<Option<i32>, DomainError> {
    match raw.map(str::trim).filter(|y| !y.is_empty()) {
        None => Ok(None),
        Some(y) => y
            .parse()
            .map(Some)
            .map_err(|_| DomainError::Validation(format!("year must be an integer, got {y:?}"))),
    }
}
