//! Currency Atlas — event registry.
//!
//! Validates and authorizes submissions, resolves attachments, stamps audit
//! fields and persists events through an injected `EventStore`. Also derives
//! the per-year country color map consumed by the map renderer.

pub mod application;
pub mod domain;

pub use application::service::RegistryService;
