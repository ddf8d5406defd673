//! Shared test doubles and utilities for the Currency Atlas registry.

mod auth;
mod clock;
mod event;
mod store;
mod upload;

pub use auth::{DenyAllAuthenticator, FailingAuthenticator, SingleUserAuthenticator};
pub use clock::{FixedClock, fixed_now};
pub use event::sample_event;
pub use store::{FailingEventStore, RecordingEventStore};
pub use upload::{FailingBlobUploader, RecordingBlobUploader, UploadCall};
