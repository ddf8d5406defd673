//! Query and write endpoints for reform events.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use currency_atlas_core::error::DomainError;
use currency_atlas_core::event::ReformEvent;
use currency_atlas_registry::domain::commands::{Attachment, SubmitEvent};

use crate::auth::Actor;
use crate::error::ApiError;
use crate::routes::parse_year;
use crate::state::AppState;

/// Query string of `GET /api/get-events`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsQuery {
    /// Signed year; absent lists every event.
    pub year: Option<String>,
    /// Narrows the result to one country.
    pub country_code: Option<String>,
}

/// Body of `POST /api/save-event`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveEventRequest {
    /// Country code.
    pub country_code: Option<String>,
    /// A JSON integer or an integer string.
    pub year: Option<Value>,
    /// Reform category name.
    #[serde(rename = "type")]
    pub reform_type: Option<String>,
    /// Headline.
    pub title: Option<String>,
    /// Description.
    pub desc: Option<String>,
    /// URL of an attachment uploaded earlier; absent keeps the stored one.
    pub file_url: Option<String>,
}

impl SaveEventRequest {
    fn into_command(self, actor: Option<String>) -> SubmitEvent {
        let year = match &self.year {
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };
        SubmitEvent {
            correlation_id: Uuid::new_v4(),
            actor,
            country_code: self.country_code,
            year,
            reform_type: self.reform_type,
            title: self.title,
            desc: self.desc,
            attachment: self.file_url.map(Attachment::Url),
        }
    }
}

/// Response of a successful save.
#[derive(Debug, Serialize)]
pub struct SaveEventResponse {
    /// Always `true`.
    pub ok: bool,
    /// The event as stored.
    pub event: ReformEvent,
}

/// GET /api/get-events
#[tracing::instrument(skip(state))]
async fn get_events(
    State(state): State<AppState>,
    query: Result<Query<EventsQuery>, QueryRejection>,
) -> Result<Json<Vec<ReformEvent>>, ApiError> {
    let Query(query) = query.map_err(|e| DomainError::Validation(e.body_text()))?;
    let country_code = query
        .country_code
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());
    let events = match (parse_year(query.year.as_deref())?, country_code) {
        (Some(year), country_code) => state.registry.query(year, country_code).await?,
        (None, None) => state.registry.query_all().await?,
        (None, Some(_)) => {
            return Err(DomainError::Validation(
                "year is required when countryCode is given".into(),
            )
            .into());
        }
    };
    Ok(Json(events))
}

/// POST /api/save-event
#[tracing::instrument(skip(state, body))]
async fn save_event(
    State(state): State<AppState>,
    Actor(actor): Actor,
    body: Result<Json<SaveEventRequest>, JsonRejection>,
) -> Result<Json<SaveEventResponse>, ApiError> {
    let Json(request) =
        body.map_err(|e| DomainError::Validation(format!("malformed event body: {e}")))?;
    let event = state.registry.submit(request.into_command(actor)).await?;
    Ok(Json(SaveEventResponse { ok: true, event }))
}

/// Returns the router for the event endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/get-events", get(get_events))
        .route("/save-event", post(save_event))
}
