//! Sample events.

use currency_atlas_core::event::{ReformEvent, ReformType};

/// An event with the given key and type and placeholder text fields.
#[must_use]
pub fn sample_event(country_code: &str, year: i32, reform_type: ReformType) -> ReformEvent {
    ReformEvent {
        country_code: country_code.to_owned(),
        year,
        reform_type: reform_type.into(),
        title: format!("{reform_type} in {country_code}"),
        desc: String::new(),
        file_url: String::new(),
        saved_by: None,
        timestamp: None,
    }
}
