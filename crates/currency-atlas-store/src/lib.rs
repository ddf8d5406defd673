//! Currency Atlas Store — `EventStore` backends.
//!
//! Three interchangeable backends: an in-process keyed hash, a single JSON
//! array file, and a PostgreSQL keyed hash. Also home to the filesystem
//! `BlobUploader`.

pub mod json_file_store;
pub mod local_blob_uploader;
pub mod memory_store;
pub mod pg_event_store;
pub mod schema;

pub use json_file_store::JsonFileEventStore;
pub use local_blob_uploader::LocalBlobUploader;
pub use memory_store::InMemoryEventStore;
pub use pg_event_store::PgEventStore;
