//! Currency Atlas Core — shared domain types and collaborator traits.
//!
//! This crate defines the reform event record, its composite key, the error
//! taxonomy, and the traits the registry consumes (`EventStore`,
//! `Authenticator`, `BlobUploader`, `Clock`). It contains no infrastructure code.

pub mod auth;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod store;
pub mod upload;
