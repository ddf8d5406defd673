//! Shared application state.

use std::sync::Arc;

use currency_atlas_registry::RegistryService;

use crate::auth::{AdminCredentials, SessionRegistry};

/// Application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Registry operations.
    pub registry: RegistryService,
    /// Active login sessions.
    pub sessions: Arc<SessionRegistry>,
    /// The admin login checked by `/api/auth/login`.
    pub credentials: Arc<AdminCredentials>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        registry: RegistryService,
        credentials: AdminCredentials,
        sessions: SessionRegistry,
    ) -> Self {
        Self {
            registry,
            sessions: Arc::new(sessions),
            credentials: Arc::new(credentials),
        }
    }
}
