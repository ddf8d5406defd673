//! Input validation for submissions.

use currency_atlas_core::error::DomainError;
use currency_atlas_core::event::{EventKey, ReformType};

use crate::domain::commands::SubmitEvent;

/// The validated, normalized core of a `SubmitEvent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSubmission {
    /// Where the event will be stored.
    pub key: EventKey,
    /// Reform category.
    pub reform_type: ReformType,
    /// Headline, possibly empty.
    pub title: String,
    /// Description, possibly empty.
    pub desc: String,
}

/// Normalizes a country code: trimmed and upper-cased.
#[must_use]
pub fn normalize_country_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

/// Checks the required fields of `command`, collecting every failure.
///
/// # Errors
///
/// Returns `DomainError::Validation` naming each missing or invalid field:
/// an empty `countryCode`, a `year` that is absent or outside the `i32`
/// range, or a `type` outside the fixed set of reform categories.
pub fn validate(command: &SubmitEvent) -> Result<ValidSubmission, DomainError> {
    let mut invalid = Vec::new();

    let country_code = command
        .country_code
        .as_deref()
        .map(normalize_country_code)
        .filter(|c| !c.is_empty());
    if country_code.is_none() {
        invalid.push("countryCode");
    }

    let year = command.year.and_then(|y| i32::try_from(y).ok());
    if year.is_none() {
        invalid.push("year");
    }

    let reform_type = command
        .reform_type
        .as_deref()
        .and_then(|t| t.trim().parse::<ReformType>().ok());
    if reform_type.is_none() {
        invalid.push("type");
    }

    match (country_code, year, reform_type) {
        (Some(country_code), Some(year), Some(reform_type)) => Ok(ValidSubmission {
            key: EventKey::new(country_code, year),
            reform_type,
            title: command.title.clone().unwrap_or_default(),
            desc: command.desc.clone().unwrap_or_default(),
        }),
        _ => Err(DomainError::invalid_fields(&invalid)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(country_code: Option<&str>, year: Option<i64>, reform_type: Option<&str>) -> SubmitEvent {
        SubmitEvent {
            country_code: country_code.map(str::to_owned),
            year,
            reform_type: reform_type.map(str::to_owned),
            ..SubmitEvent::default()
        }
    }

    #[test]
    fn test_validate_normalizes_country_code_and_defaults_text() {
        let valid = validate(&command(Some(" fra "), Some(1960), Some("Redenomination"))).unwrap();

        assert_eq!(valid.key, EventKey::new("FRA", 1960));
        assert_eq!(valid.reform_type, ReformType::Redenomination);
        assert_eq!(valid.title, "");
        assert_eq!(valid.desc, "");
    }

    #[test]
    fn test_validate_accepts_bce_year() {
        let valid = validate(&command(Some("EGY"), Some(-300), Some("Other"))).unwrap();

        assert_eq!(valid.key.year, -300);
    }

    #[test]
    fn test_validate_names_every_missing_field() {
        let err = validate(&command(None, None, None)).unwrap_err();

        match err {
            DomainError::Validation(message) => {
                assert_eq!(message, "missing or invalid field(s): countryCode, year, type");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_blank_country_code() {
        let err = validate(&command(Some("   "), Some(1960), Some("Other"))).unwrap_err();

        assert!(err.to_string().ends_with("countryCode"));
    }

    #[test]
    fn test_validate_rejects_unknown_type() {
        let err = validate(&command(Some("FRA"), Some(1960), Some("Hyperinflation"))).unwrap_err();

        assert!(err.to_string().ends_with(": type"));
    }

    #[test]
    fn test_validate_rejects_year_outside_i32() {
        let err = validate(&command(Some("FRA"), Some(i64::from(i32::MAX) + 1), Some("Other")))
            .unwrap_err();

        assert!(err.to_string().ends_with(": year"));
    }
}
