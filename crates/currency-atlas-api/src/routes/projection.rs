//! Color projection and palette endpoints for the map renderer.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use currency_atlas_core::error::DomainError;
use currency_atlas_registry::domain::palette::PaletteEntry;
use currency_atlas_registry::domain::projection::ColorMap;

use crate::error::ApiError;
use crate::routes::parse_year;
use crate::state::AppState;

/// Query string of `GET /api/colors`.
#[derive(Debug, Default, Deserialize)]
pub struct ColorsQuery {
    /// Signed year to project.
    pub year: Option<String>,
}

/// The palette as shown in the editor's type picker.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteResponse {
    /// Fill for countries without an event.
    pub default_color: String,
    /// Every category in display order with its color.
    pub types: Vec<PaletteEntry>,
}

/// GET /api/colors
#[tracing::instrument(skip(state))]
async fn colors(
    State(state): State<AppState>,
    query: Result<Query<ColorsQuery>, QueryRejection>,
) -> Result<Json<ColorMap>, ApiError> {
    let Query(query) = query.map_err(|e| DomainError::Validation(e.body_text()))?;
    let year = parse_year(query.year.as_deref())?
        .ok_or_else(|| DomainError::Validation("year is required".into()))?;
    Ok(Json(state.registry.colors(year).await?))
}

/// GET /api/palette
async fn palette(State(state): State<AppState>) -> Json<PaletteResponse> {
    let palette = state.registry.palette();
    Json(PaletteResponse {
        default_color: palette.default_color().to_owned(),
        types: palette.entries(),
    })
}

/// Returns the router for the projection endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/colors", get(colors))
        .route("/palette", get(palette))
}
