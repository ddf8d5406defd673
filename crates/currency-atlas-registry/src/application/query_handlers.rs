//! Query handlers for the event registry.
//!
//! Reads are public and never fail because of a single corrupt record; the
//! store reports those as skipped and they are simply absent from results.

use currency_atlas_core::error::DomainError;
use currency_atlas_core::event::{EventKey, ReformEvent};
use currency_atlas_core::store::EventStore;
use tracing::debug;

use crate::domain::palette::Palette;
use crate::domain::projection::ColorMap;
use crate::domain::validation::normalize_country_code;

/// Returns the events of `year`, or at most the one event of `country_code`
/// in `year` when a country is given. A blank country code counts as absent.
///
/// # Errors
///
/// Returns `DomainError::Storage` if the store cannot be read.
pub async fn query_events(
    year: i32,
    country_code: Option<&str>,
    store: &dyn EventStore,
) -> Result<Vec<ReformEvent>, DomainError> {
    let country_code = country_code
        .map(normalize_country_code)
        .filter(|c| !c.is_empty());

    if let Some(country_code) = country_code {
        let key = EventKey::new(country_code, year);
        return Ok(store.get(&key).await?.into_iter().collect());
    }

    let scan = store.list_by_year(year).await?;
    debug!(
        year,
        found = scan.events.len(),
        skipped = scan.skipped.len(),
        "listed events for year"
    );
    Ok(scan.events)
}

/// Returns every stored event.
///
/// # Errors
///
/// Returns `DomainError::Storage` if the store cannot be read.
pub async fn query_all_events(store: &dyn EventStore) -> Result<Vec<ReformEvent>, DomainError> {
    Ok(store.list_all().await?.events)
}

/// Builds the color map for `year`.
///
/// # Errors
///
/// Returns `DomainError::Storage` if the store cannot be read.
pub async fn project_colors(
    year: i32,
    palette: &Palette,
    store: &dyn EventStore,
) -> Result<ColorMap, DomainError> {
    let events = query_events(year, None, store).await?;
    Ok(ColorMap::for_year(year, &events, palette))
}
