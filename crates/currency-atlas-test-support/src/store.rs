//! Test stores — mock `EventStore` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use currency_atlas_core::error::DomainError;
use currency_atlas_core::event::{EventKey, ReformEvent};
use currency_atlas_core::store::{EventStore, ScanOutcome};

/// An event store that serves a fixed set of events on every read and records
/// every `upsert` without applying it.
#[derive(Debug, Default)]
pub struct RecordingEventStore {
    existing: Vec<ReformEvent>,
    upserted: Mutex<Vec<ReformEvent>>,
}

impl RecordingEventStore {
    /// Creates a store whose reads always see `existing`.
    #[must_use]
    pub fn new(existing: Vec<ReformEvent>) -> Self {
        Self {
            existing,
            upserted: Mutex::new(Vec::new()),
        }
    }

    /// Returns a snapshot of every event passed to `upsert`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn upserted(&self) -> Vec<ReformEvent> {
        self.upserted.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventStore for RecordingEventStore {
    async fn upsert(&self, event: &ReformEvent) -> Result<(), DomainError> {
        self.upserted.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn list_all(&self) -> Result<ScanOutcome, DomainError> {
        Ok(ScanOutcome {
            events: self.existing.clone(),
            skipped: Vec::new(),
        })
    }

    async fn get(&self, key: &EventKey) -> Result<Option<ReformEvent>, DomainError> {
        Ok(self.existing.iter().find(|e| &e.key() == key).cloned())
    }
}

/// An event store that always returns a storage error. Useful for testing
/// error-handling paths.
#[derive(Debug)]
pub struct FailingEventStore;

#[async_trait]
impl EventStore for FailingEventStore {
    async fn upsert(&self, _event: &ReformEvent) -> Result<(), DomainError> {
        Err(DomainError::Storage("connection refused".into()))
    }

    async fn list_all(&self) -> Result<ScanOutcome, DomainError> {
        Err(DomainError::Storage("connection refused".into()))
    }

    async fn get(&self, _key: &EventKey) -> Result<Option<ReformEvent>, DomainError> {
        Err(DomainError::Storage("connection refused".into()))
    }
}
