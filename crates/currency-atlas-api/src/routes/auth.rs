//! Admin login and logout.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use currency_atlas_core::error::DomainError;

use crate::auth::BearerToken;
use crate::error::ApiError;
use crate::state::AppState;

/// Body of `POST /api/auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Admin email.
    pub email: String,
    /// Admin password.
    pub password: String,
}

/// Response of a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Bearer token for write endpoints.
    pub token: String,
    /// The signed-in email.
    pub email: String,
}

/// Response of a successful logout.
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    /// Always `true`.
    pub ok: bool,
}

/// POST /api/auth/login
async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) =
        body.map_err(|e| DomainError::Validation(format!("malformed login body: {e}")))?;
    if !state.credentials.verify(&request.email, &request.password) {
        warn!("rejected admin login");
        return Err(DomainError::Unauthorized("invalid email or password".into()).into());
    }
    let email = state.credentials.email().to_owned();
    let token = state.sessions.issue(&email);
    info!(%email, "admin signed in");
    Ok(Json(LoginResponse { token, email }))
}

/// POST /api/auth/logout
async fn logout(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<LogoutResponse>, ApiError> {
    match token {
        Some(token) if state.sessions.revoke(&token) => Ok(Json(LogoutResponse { ok: true })),
        _ => Err(DomainError::Unauthorized("no active session".into()).into()),
    }
}

/// Returns the router for the auth endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}
