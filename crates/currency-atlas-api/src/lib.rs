//! Currency Atlas API — HTTP surface of the event registry.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;
