//! In-process keyed-hash implementation of the `EventStore` trait.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::{debug, warn};

use currency_atlas_core::error::DomainError;
use currency_atlas_core::event::{EventKey, ReformEvent};
use currency_atlas_core::store::{EventStore, RecordOutcome, ScanOutcome, decode_record};

/// Keyed hash held in memory: field key `<countryCode>:<year>` to the
/// JSON-serialized event. Records are decoded on every read, exactly like the
/// remote keyed backend.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    records: RwLock<BTreeMap<String, String>>,
}

impl InMemoryEventStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `raw` verbatim under `field`, bypassing serialization. Used to
    /// seed legacy or corrupt records.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Storage` if the lock is poisoned.
    pub fn insert_raw(&self, field: &str, raw: &str) -> Result<(), DomainError> {
        self.records
            .write()
            .map_err(poisoned)?
            .insert(field.to_owned(), raw.to_owned());
        Ok(())
    }

    /// Number of raw records, including corrupt ones.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Storage` if the lock is poisoned.
    pub fn len(&self) -> Result<usize, DomainError> {
        Ok(self.records.read().map_err(poisoned)?.len())
    }

    /// Whether the store holds no records at all.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Storage` if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, DomainError> {
        Ok(self.len()? == 0)
    }

    fn scan<F>(&self, mut wanted: F) -> Result<ScanOutcome, DomainError>
    where
        F: FnMut(&str) -> bool,
    {
        let records = self.records.read().map_err(poisoned)?;
        let scan: ScanOutcome = records
            .iter()
            .filter(|(field, _)| wanted(field))
            .map(|(field, raw)| decode_record(field, raw))
            .collect();
        scan.log_skipped();
        Ok(scan)
    }
}

fn poisoned<T>(_: T) -> DomainError {
    DomainError::Storage("event store lock poisoned".into())
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn upsert(&self, event: &ReformEvent) -> Result<(), DomainError> {
        let field = event.key().to_string();
        let raw = serde_json::to_string(event)
            .map_err(|e| DomainError::Storage(format!("event serialization failed: {e}")))?;
        let replaced = self
            .records
            .write()
            .map_err(poisoned)?
            .insert(field.clone(), raw)
            .is_some();
        debug!(%field, replaced, "upserted event");
        Ok(())
    }

    async fn list_all(&self) -> Result<ScanOutcome, DomainError> {
        self.scan(|_| true)
    }

    async fn list_by_year(&self, year: i32) -> Result<ScanOutcome, DomainError> {
        // Malformed field keys are let through so the decoder reports them.
        self.scan(|field| {
            field
                .parse::<EventKey>()
                .map_or(true, |key| key.year == year)
        })
    }

    async fn get(&self, key: &EventKey) -> Result<Option<ReformEvent>, DomainError> {
        let field = key.to_string();
        let records = self.records.read().map_err(poisoned)?;
        let Some(raw) = records.get(&field) else {
            return Ok(None);
        };
        match decode_record(&field, raw) {
            RecordOutcome::Valid(event) => Ok(Some(event)),
            RecordOutcome::Skipped(record) => {
                warn!(key = %record.key, reason = %record.reason, "ignoring corrupt event record");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use currency_atlas_core::event::ReformType;

    fn event(country_code: &str, year: i32, reform_type: ReformType) -> ReformEvent {
        ReformEvent {
            country_code: country_code.to_owned(),
            year,
            reform_type: reform_type.into(),
            title: format!("{country_code} {year}"),
            desc: String::new(),
            file_url: String::new(),
            saved_by: Some("admin@example.com".to_owned()),
            timestamp: None,
        }
    }

    #[tokio::test]
    async fn test_get_returns_none_for_missing_key() {
        let store = InMemoryEventStore::new();

        let found = store.get(&EventKey::new("FRA", 1960)).await.unwrap();

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_upsert_replaces_event_with_same_key() {
        // Arrange
        let store = InMemoryEventStore::new();
        store
            .upsert(&event("FRA", 1960, ReformType::Redenomination))
            .await
            .unwrap();

        // Act
        store
            .upsert(&event("FRA", 1960, ReformType::Devaluation))
            .await
            .unwrap();

        // Assert
        assert_eq!(store.len().unwrap(), 1);
        let found = store.get(&EventKey::new("FRA", 1960)).await.unwrap().unwrap();
        assert_eq!(found.reform_type, ReformType::Devaluation);
    }

    #[tokio::test]
    async fn test_list_by_year_returns_exactly_that_year() {
        // Arrange
        let store = InMemoryEventStore::new();
        for (cc, year) in [("FRA", 1960), ("DEU", 1948), ("ITA", 1960), ("EGY", -1960)] {
            store.upsert(&event(cc, year, ReformType::Other)).await.unwrap();
        }

        // Act
        let scan = store.list_by_year(1960).await.unwrap();

        // Assert
        let mut codes: Vec<_> = scan.events.iter().map(|e| e.country_code.as_str()).collect();
        codes.sort_unstable();
        assert_eq!(codes, vec!["FRA", "ITA"]);
        assert!(scan.skipped.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_record_is_skipped_not_fatal() {
        // Arrange
        let store = InMemoryEventStore::new();
        store.upsert(&event("FRA", 1960, ReformType::Other)).await.unwrap();
        store.insert_raw("GBR:1960", "{\"countryCode\":").unwrap();

        // Act
        let scan = store.list_by_year(1960).await.unwrap();

        // Assert
        assert_eq!(scan.events.len(), 1);
        assert_eq!(scan.events[0].country_code, "FRA");
        assert_eq!(scan.skipped.len(), 1);
        assert_eq!(scan.skipped[0].key, "GBR:1960");
    }

    #[tokio::test]
    async fn test_record_with_unrecognized_type_is_still_listed() {
        let store = InMemoryEventStore::new();
        store
            .insert_raw("GBR:1960", r#"{"countryCode":"GBR","year":1960,"type":"Hyperinflation"}"#)
            .unwrap();

        let scan = store.list_by_year(1960).await.unwrap();

        assert!(scan.skipped.is_empty());
        assert_eq!(scan.events.len(), 1);
        assert_eq!(scan.events[0].reform_type.as_str(), "Hyperinflation");
    }

    #[tokio::test]
    async fn test_get_treats_corrupt_record_as_absent() {
        let store = InMemoryEventStore::new();
        store.insert_raw("GBR:1971", "not json").unwrap();

        let found = store.get(&EventKey::new("GBR", 1971)).await.unwrap();

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_list_all_reports_malformed_field_keys() {
        let store = InMemoryEventStore::new();
        store.insert_raw("no-year-here", "{}").unwrap();

        let scan = store.list_all().await.unwrap();

        assert!(scan.events.is_empty());
        assert_eq!(scan.skipped[0].key, "no-year-here");
    }
}
