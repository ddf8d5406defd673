//! Event store abstraction and the record decoder shared by its backends.
//!
//! Backends hold raw JSON per record. Every read goes through
//! [`decode_record`] or [`decode_value`], which turns each raw record into a
//! [`RecordOutcome`]. A record that cannot be decoded is reported as
//! [`RecordOutcome::Skipped`] and the scan carries on; one corrupt record never
//! fails a whole query.

use async_trait::async_trait;
use tracing::warn;

use crate::error::DomainError;
use crate::event::{EventKey, ReformEvent};

/// A stored record that could not be turned into a `ReformEvent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// The storage key of the record (field key or array position).
    pub key: String,
    /// Why decoding failed.
    pub reason: String,
}

/// Decoding result for a single raw record.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    /// The record decoded into a valid event.
    Valid(ReformEvent),
    /// The record is corrupt and was left out.
    Skipped(SkippedRecord),
}

/// Aggregated result of reading many records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanOutcome {
    /// Events that decoded cleanly, in backend order.
    pub events: Vec<ReformEvent>,
    /// Records that were skipped.
    pub skipped: Vec<SkippedRecord>,
}

impl ScanOutcome {
    /// Keeps only the events for `year`. Skipped records are retained since
    /// their year is unknown.
    #[must_use]
    pub fn for_year(self, year: i32) -> Self {
        Self {
            events: self.events.into_iter().filter(|e| e.year == year).collect(),
            skipped: self.skipped,
        }
    }

    /// Emits one warning per skipped record.
    pub fn log_skipped(&self) {
        for record in &self.skipped {
            warn!(key = %record.key, reason = %record.reason, "skipping corrupt event record");
        }
    }
}

impl FromIterator<RecordOutcome> for ScanOutcome {
    fn from_iter<I: IntoIterator<Item = RecordOutcome>>(iter: I) -> Self {
        let mut scan = Self::default();
        for outcome in iter {
            match outcome {
                RecordOutcome::Valid(event) => scan.events.push(event),
                RecordOutcome::Skipped(record) => scan.skipped.push(record),
            }
        }
        scan
    }
}

/// Decodes a keyed record: `field` is the `<countryCode>:<year>` field key,
/// `raw` the JSON text stored under it.
///
/// The payload must agree with the field key, otherwise the record is skipped.
#[must_use]
pub fn decode_record(field: &str, raw: &str) -> RecordOutcome {
    let skipped = |reason: String| {
        RecordOutcome::Skipped(SkippedRecord {
            key: field.to_owned(),
            reason,
        })
    };

    let key: EventKey = match field.parse() {
        Ok(key) => key,
        Err(e) => return skipped(e.to_string()),
    };
    let event: ReformEvent = match serde_json::from_str(raw) {
        Ok(event) => event,
        Err(e) => return skipped(format!("invalid event JSON: {e}")),
    };
    if event.key() != key {
        return skipped(format!("payload belongs to {}", event.key()));
    }
    validated(field, event)
}

/// Decodes an element of an array-shaped store. `position` labels the record
/// in skip reports.
#[must_use]
pub fn decode_value(position: &str, value: serde_json::Value) -> RecordOutcome {
    match serde_json::from_value::<ReformEvent>(value) {
        Ok(event) => validated(position, event),
        Err(e) => RecordOutcome::Skipped(SkippedRecord {
            key: position.to_owned(),
            reason: format!("invalid event JSON: {e}"),
        }),
    }
}

fn validated(key: &str, event: ReformEvent) -> RecordOutcome {
    if event.country_code.trim().is_empty() {
        return RecordOutcome::Skipped(SkippedRecord {
            key: key.to_owned(),
            reason: "empty countryCode".to_owned(),
        });
    }
    RecordOutcome::Valid(event)
}

/// Persistence contract for reform events, keyed by `(countryCode, year)`.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Inserts the event, replacing any event with the same key.
    async fn upsert(&self, event: &ReformEvent) -> Result<(), DomainError>;

    /// Returns every stored event.
    async fn list_all(&self) -> Result<ScanOutcome, DomainError>;

    /// Returns the events whose year equals `year`. Backends without a year
    /// index use this linear filter over `list_all`.
    async fn list_by_year(&self, year: i32) -> Result<ScanOutcome, DomainError> {
        Ok(self.list_all().await?.for_year(year))
    }

    /// Returns the event stored under `key`. A corrupt record reads as absent.
    async fn get(&self, key: &EventKey) -> Result<Option<ReformEvent>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ReformType;

    fn event(country_code: &str, year: i32) -> ReformEvent {
        ReformEvent {
            country_code: country_code.to_owned(),
            year,
            reform_type: ReformType::Other.into(),
            title: String::new(),
            desc: String::new(),
            file_url: String::new(),
            saved_by: None,
            timestamp: None,
        }
    }

    #[test]
    fn test_decode_record_accepts_matching_payload() {
        let raw = serde_json::to_string(&event("FRA", 1960)).unwrap();

        let outcome = decode_record("FRA:1960", &raw);

        assert_eq!(outcome, RecordOutcome::Valid(event("FRA", 1960)));
    }

    #[test]
    fn test_decode_record_skips_invalid_json() {
        let outcome = decode_record("FRA:1960", "{not json");

        match outcome {
            RecordOutcome::Skipped(record) => {
                assert_eq!(record.key, "FRA:1960");
                assert!(record.reason.starts_with("invalid event JSON"));
            }
            RecordOutcome::Valid(e) => panic!("expected skip, got {e:?}"),
        }
    }

    #[test]
    fn test_decode_record_skips_payload_under_wrong_key() {
        let raw = serde_json::to_string(&event("DEU", 1948)).unwrap();

        let outcome = decode_record("FRA:1960", &raw);

        assert!(matches!(outcome, RecordOutcome::Skipped(_)));
    }

    #[test]
    fn test_decode_record_keeps_record_with_unrecognized_type() {
        let raw = r#"{"countryCode":"GBR","year":1960,"type":"Hyperinflation"}"#;

        let outcome = decode_record("GBR:1960", raw);

        match outcome {
            RecordOutcome::Valid(event) => assert_eq!(event.reform_type.as_str(), "Hyperinflation"),
            RecordOutcome::Skipped(record) => panic!("expected valid, got {record:?}"),
        }
    }

    #[test]
    fn test_decode_value_skips_empty_country_code() {
        let value = serde_json::json!({ "countryCode": " ", "year": 1, "type": "Other" });

        let outcome = decode_value("[0]", value);

        assert!(matches!(outcome, RecordOutcome::Skipped(r) if r.reason == "empty countryCode"));
    }

    #[test]
    fn test_scan_outcome_collects_and_filters_by_year() {
        let scan: ScanOutcome = vec![
            RecordOutcome::Valid(event("FRA", 1960)),
            RecordOutcome::Skipped(SkippedRecord {
                key: "XXX:1960".to_owned(),
                reason: "bad".to_owned(),
            }),
            RecordOutcome::Valid(event("DEU", 1948)),
        ]
        .into_iter()
        .collect();

        let scan = scan.for_year(1960);

        assert_eq!(scan.events, vec![event("FRA", 1960)]);
        assert_eq!(scan.skipped.len(), 1);
    }
}
