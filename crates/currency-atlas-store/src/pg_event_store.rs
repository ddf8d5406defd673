//! `PostgreSQL` keyed-hash implementation of the `EventStore` trait.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{instrument, warn};

use currency_atlas_core::error::DomainError;
use currency_atlas_core::event::{EventKey, ReformEvent};
use currency_atlas_core::store::{EventStore, RecordOutcome, ScanOutcome, decode_record};

use crate::schema::EVENTS_COLLECTION;

/// PostgreSQL-backed event store. Each event is one row of the
/// `registry_hash` table: collection `currency_events`, field
/// `<countryCode>:<year>`, value the JSON-serialized event.
#[derive(Debug, Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    /// Creates a new `PgEventStore`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[allow(clippy::needless_pass_by_value)]
fn storage(e: sqlx::Error) -> DomainError {
    DomainError::Storage(format!("database error: {e}"))
}

fn decode_rows(rows: &[(String, String)]) -> ScanOutcome {
    let scan: ScanOutcome = rows
        .iter()
        .map(|(field, value)| decode_record(field, value))
        .collect();
    scan.log_skipped();
    scan
}

#[async_trait]
impl EventStore for PgEventStore {
    #[instrument(skip(self, event), fields(key = %event.key()))]
    async fn upsert(&self, event: &ReformEvent) -> Result<(), DomainError> {
        let value = serde_json::to_string(event)
            .map_err(|e| DomainError::Storage(format!("event serialization failed: {e}")))?;

        sqlx::query(
            r"
            INSERT INTO registry_hash (collection, field, value)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, field)
            DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
            ",
        )
        .bind(EVENTS_COLLECTION)
        .bind(event.key().to_string())
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(storage)?;

        Ok(())
    }

    async fn list_all(&self) -> Result<ScanOutcome, DomainError> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT field, value FROM registry_hash WHERE collection = $1 ORDER BY field",
        )
        .bind(EVENTS_COLLECTION)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        Ok(decode_rows(&rows))
    }

    async fn list_by_year(&self, year: i32) -> Result<ScanOutcome, DomainError> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            r"
            SELECT field, value FROM registry_hash
            WHERE collection = $1 AND field LIKE '%:' || $2
            ORDER BY field
            ",
        )
        .bind(EVENTS_COLLECTION)
        .bind(year.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        Ok(decode_rows(&rows).for_year(year))
    }

    async fn get(&self, key: &EventKey) -> Result<Option<ReformEvent>, DomainError> {
        let field = key.to_string();
        let value: Option<(String,)> = sqlx::query_as(
            "SELECT value FROM registry_hash WHERE collection = $1 AND field = $2",
        )
        .bind(EVENTS_COLLECTION)
        .bind(&field)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        let Some((raw,)) = value else {
            return Ok(None);
        };
        match decode_record(&field, &raw) {
            RecordOutcome::Valid(event) => Ok(Some(event)),
            RecordOutcome::Skipped(record) => {
                warn!(key = %record.key, reason = %record.reason, "ignoring corrupt event record");
                Ok(None)
            }
        }
    }
}
