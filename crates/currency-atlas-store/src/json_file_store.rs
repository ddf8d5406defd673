//! JSON file implementation of the `EventStore` trait.
//!
//! The whole store is one JSON array of event objects. Reads decode each
//! element on its own so a single bad element is skipped rather than failing
//! the read. Writes rewrite the file through a sibling temp file and a rename.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use currency_atlas_core::error::DomainError;
use currency_atlas_core::event::{EventKey, ReformEvent};
use currency_atlas_core::store::{EventStore, RecordOutcome, ScanOutcome, decode_value};

/// File-backed event store holding a single JSON array.
#[derive(Debug)]
pub struct JsonFileEventStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileEventStore {
    /// Creates a store backed by the file at `path`. The file is created on
    /// the first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// The backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_array(&self) -> Result<Vec<Value>, DomainError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(DomainError::Storage(format!(
                    "failed to read {}: {e}",
                    self.path.display()
                )));
            }
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&bytes).map_err(|e| {
            DomainError::Storage(format!(
                "{} is not a JSON array of events: {e}",
                self.path.display()
            ))
        })
    }

    async fn write_array(&self, values: &[Value]) -> Result<(), DomainError> {
        let storage = |e: std::io::Error| {
            DomainError::Storage(format!("failed to write {}: {e}", self.path.display()))
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(storage)?;
        }
        let bytes = serde_json::to_vec_pretty(values)
            .map_err(|e| DomainError::Storage(format!("event serialization failed: {e}")))?;

        let mut tmp_name = self.path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);
        tokio::fs::write(&tmp_path, bytes).await.map_err(storage)?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(storage)
    }

    fn label(&self, index: usize) -> String {
        format!("{}[{index}]", self.path.display())
    }

    /// Decodes every element. Duplicate keys left behind by older writers
    /// collapse to the last occurrence, kept at the first one's position.
    fn decode_all(&self, values: Vec<Value>) -> ScanOutcome {
        let mut scan = ScanOutcome::default();
        let mut positions: HashMap<EventKey, usize> = HashMap::new();
        for (index, value) in values.into_iter().enumerate() {
            match decode_value(&self.label(index), value) {
                RecordOutcome::Valid(event) => match positions.get(&event.key()) {
                    Some(&at) => scan.events[at] = event,
                    None => {
                        positions.insert(event.key(), scan.events.len());
                        scan.events.push(event);
                    }
                },
                RecordOutcome::Skipped(record) => scan.skipped.push(record),
            }
        }
        scan.log_skipped();
        scan
    }
}

fn key_of(value: &Value) -> Option<EventKey> {
    serde_json::from_value::<ReformEvent>(value.clone())
        .ok()
        .map(|event| event.key())
}

#[async_trait]
impl EventStore for JsonFileEventStore {
    #[instrument(skip(self, event), fields(key = %event.key()))]
    async fn upsert(&self, event: &ReformEvent) -> Result<(), DomainError> {
        let _guard = self.write_lock.lock().await;

        let mut values = self.read_array().await?;
        let key = event.key();
        let encoded = serde_json::to_value(event)
            .map_err(|e| DomainError::Storage(format!("event serialization failed: {e}")))?;

        let mut replaced = false;
        let mut kept = Vec::with_capacity(values.len() + 1);
        for value in values.drain(..) {
            if key_of(&value).as_ref() == Some(&key) {
                if !replaced {
                    kept.push(encoded.clone());
                    replaced = true;
                }
            } else {
                kept.push(value);
            }
        }
        if !replaced {
            kept.push(encoded);
        }

        self.write_array(&kept).await?;
        debug!(replaced, total = kept.len(), "upserted event");
        Ok(())
    }

    async fn list_all(&self) -> Result<ScanOutcome, DomainError> {
        let values = self.read_array().await?;
        Ok(self.decode_all(values))
    }

    async fn get(&self, key: &EventKey) -> Result<Option<ReformEvent>, DomainError> {
        let scan = self.list_all().await?;
        Ok(scan.events.into_iter().find(|e| &e.key() == key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use currency_atlas_core::event::ReformType;
    use tempfile::TempDir;

    fn event(country_code: &str, year: i32, reform_type: ReformType) -> ReformEvent {
        ReformEvent {
            country_code: country_code.to_owned(),
            year,
            reform_type: reform_type.into(),
            title: String::new(),
            desc: String::new(),
            file_url: String::new(),
            saved_by: None,
            timestamp: None,
        }
    }

    fn store_in(dir: &TempDir) -> JsonFileEventStore {
        JsonFileEventStore::new(dir.path().join("events.json"))
    }

    #[tokio::test]
    async fn test_missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let scan = store.list_all().await.unwrap();

        assert!(scan.events.is_empty());
        assert!(scan.skipped.is_empty());
    }

    #[tokio::test]
    async fn test_upsert_writes_single_json_array() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        // Act
        store
            .upsert(&event("FRA", 1960, ReformType::Redenomination))
            .await
            .unwrap();
        store
            .upsert(&event("FRA", 1960, ReformType::Devaluation))
            .await
            .unwrap();

        // Assert
        let raw = std::fs::read_to_string(store.path()).unwrap();
        let json: Value = serde_json::from_str(&raw).unwrap();
        let array = json.as_array().unwrap();
        assert_eq!(array.len(), 1);
        assert_eq!(array[0]["type"], "Devaluation");
    }

    #[tokio::test]
    async fn test_upsert_keeps_position_and_appends_new_keys() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.upsert(&event("FRA", 1960, ReformType::Other)).await.unwrap();
        store.upsert(&event("DEU", 1948, ReformType::Other)).await.unwrap();

        store
            .upsert(&event("FRA", 1960, ReformType::Revaluation))
            .await
            .unwrap();

        let scan = store.list_all().await.unwrap();
        let codes: Vec<_> = scan.events.iter().map(|e| e.country_code.as_str()).collect();
        assert_eq!(codes, vec!["FRA", "DEU"]);
        assert_eq!(scan.events[0].reform_type, ReformType::Revaluation);
    }

    #[tokio::test]
    async fn test_corrupt_element_is_skipped_and_preserved() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let seeded = serde_json::json!([
            { "countryCode": "FRA", "year": 1960, "type": "Redenomination" },
            { "countryCode": "GBR", "year": "sixties", "type": "Devaluation" },
            { "countryCode": "ITA", "year": 1960, "type": "Other" },
        ]);
        std::fs::write(store.path(), seeded.to_string()).unwrap();

        // Act
        let scan = store.list_by_year(1960).await.unwrap();
        store.upsert(&event("DEU", 1948, ReformType::Other)).await.unwrap();

        // Assert
        assert_eq!(scan.events.len(), 2);
        assert_eq!(scan.skipped.len(), 1);
        assert!(scan.skipped[0].key.ends_with("[1]"));
        let raw: Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw.as_array().unwrap().len(), 4);
        assert_eq!(raw[1]["year"], "sixties");
    }

    #[tokio::test]
    async fn test_legacy_duplicates_collapse_to_last_write() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let seeded = serde_json::json!([
            { "countryCode": "FRA", "year": 1960, "type": "Redenomination" },
            { "countryCode": "DEU", "year": 1960, "type": "Other" },
            { "countryCode": "FRA", "year": 1960, "type": "Devaluation" },
        ]);
        std::fs::write(store.path(), seeded.to_string()).unwrap();

        // Act
        let found = store.get(&EventKey::new("FRA", 1960)).await.unwrap().unwrap();
        store.upsert(&event("FRA", 1960, ReformType::Other)).await.unwrap();

        // Assert
        assert_eq!(found.reform_type, ReformType::Devaluation);
        let raw: Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_non_array_file_is_a_storage_error_and_left_untouched() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "{\"oops\": true}").unwrap();

        let read = store.list_all().await;
        let write = store.upsert(&event("FRA", 1960, ReformType::Other)).await;

        assert!(matches!(read, Err(DomainError::Storage(_))));
        assert!(matches!(write, Err(DomainError::Storage(_))));
        assert_eq!(
            std::fs::read_to_string(store.path()).unwrap(),
            "{\"oops\": true}"
        );
    }

    #[tokio::test]
    async fn test_concurrent_upserts_for_different_keys_are_not_lost() {
        let dir = TempDir::new().unwrap();
        let store = std::sync::Arc::new(store_in(&dir));

        let mut handles = Vec::new();
        for year in 1900..1920 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.upsert(&event("FRA", year, ReformType::Other)).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.list_all().await.unwrap().events.len(), 20);
    }
}
