//! Keyed-hash database schema. The table itself is created by `migrations/`.

/// Collection key under which every reform event is stored.
pub const EVENTS_COLLECTION: &str = "currency_events";
