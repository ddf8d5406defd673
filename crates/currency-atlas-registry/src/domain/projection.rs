//! Country color projection for one year of events.

use std::collections::BTreeMap;

use currency_atlas_core::event::{ReformEvent, display_year};
use serde::Serialize;

use crate::domain::palette::Palette;

/// Maps each event's country to the palette color of its type.
///
/// Types missing from the palette, including unrecognized ones left by older
/// records, get the default color. If two events share
/// a country code, the later one in `events` wins. The output is ordered by
/// country code, so equal inputs give equal outputs.
#[must_use]
pub fn project(events: &[ReformEvent], palette: &Palette) -> BTreeMap<String, String> {
    events
        .iter()
        .map(|event| {
            (
                event.country_code.clone(),
                palette.color_for(event.reform_type.as_str()).to_owned(),
            )
        })
        .collect()
}

/// Color projection for one year, ready for the map renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorMap {
    /// The year the colors describe.
    pub year: i32,
    /// Display form of `year`, e.g. `300 BCE`.
    pub year_label: String,
    /// Fill for countries absent from `colors`.
    pub default_color: String,
    /// Country code to fill color.
    pub colors: BTreeMap<String, String>,
}

impl ColorMap {
    /// Projects `events` for `year`.
    #[must_use]
    pub fn for_year(year: i32, events: &[ReformEvent], palette: &Palette) -> Self {
        Self {
            year,
            year_label: display_year(year),
            default_color: palette.default_color().to_owned(),
            colors: project(events, palette),
        }
    }
}
