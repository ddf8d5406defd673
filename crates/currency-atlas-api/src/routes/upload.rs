//! Attachment upload endpoint.

use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, QueryRejection};
use axum::extract::{DefaultBodyLimit, Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use currency_atlas_core::error::DomainError;

use crate::auth::Actor;
use crate::error::{ApiError, ErrorBody};
use crate::state::AppState;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Query string of `POST /api/upload`.
#[derive(Debug, Default, Deserialize)]
pub struct UploadQuery {
    /// Client-side filename; sanitized before use.
    pub filename: Option<String>,
}

/// Response of a successful upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Where the stored blob can be fetched.
    pub url: String,
}

fn body_rejection(rejection: &BytesRejection) -> Response {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!("upload body over the size limit");
        return ErrorBody::response(
            StatusCode::PAYLOAD_TOO_LARGE,
            "payload_too_large",
            rejection.body_text(),
        );
    }
    ApiError::from(DomainError::Validation(rejection.body_text())).into_response()
}

/// POST /api/upload
#[tracing::instrument(skip_all)]
async fn upload(
    State(state): State<AppState>,
    Actor(actor): Actor,
    query: Result<Query<UploadQuery>, QueryRejection>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<UploadResponse>, Response> {
    let Query(query) = query
        .map_err(|e| ApiError::from(DomainError::Validation(e.body_text())).into_response())?;
    let body = body.map_err(|e| body_rejection(&e))?;
    tracing::debug!(len = body.len(), "received upload body");
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(DEFAULT_CONTENT_TYPE);
    let url = state
        .registry
        .upload(
            actor.as_deref(),
            query.filename.as_deref().unwrap_or_default(),
            content_type,
            body.to_vec(),
        )
        .await
        .map_err(|e| ApiError::from(e).into_response())?;
    Ok(Json(UploadResponse { url }))
}

/// Returns the router for uploads, capping bodies at `max_upload_bytes`.
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new().route(
        "/upload",
        post(upload).layer(DefaultBodyLimit::max(max_upload_bytes)),
    )
}
