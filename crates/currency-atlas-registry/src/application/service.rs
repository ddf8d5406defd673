//! The registry service: owned collaborators wired to the handlers.

use std::fmt;
use std::sync::Arc;

use currency_atlas_core::auth::Authenticator;
use currency_atlas_core::clock::Clock;
use currency_atlas_core::error::DomainError;
use currency_atlas_core::event::ReformEvent;
use currency_atlas_core::store::EventStore;
use currency_atlas_core::upload::BlobUploader;

use crate::application::{command_handlers, query_handlers};
use crate::domain::commands::SubmitEvent;
use crate::domain::palette::Palette;
use crate::domain::projection::ColorMap;

/// Entry point for every registry operation. Cheap to clone; all
/// collaborators are shared behind `Arc`.
#[derive(Clone)]
pub struct RegistryService {
    clock: Arc<dyn Clock>,
    authenticator: Arc<dyn Authenticator>,
    uploader: Arc<dyn BlobUploader>,
    store: Arc<dyn EventStore>,
    palette: Arc<Palette>,
}

impl fmt::Debug for RegistryService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryService")
            .field("palette", &self.palette)
            .finish_non_exhaustive()
    }
}

impl RegistryService {
    /// Creates a service from its collaborators.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        authenticator: Arc<dyn Authenticator>,
        uploader: Arc<dyn BlobUploader>,
        store: Arc<dyn EventStore>,
        palette: Palette,
    ) -> Self {
        Self {
            clock,
            authenticator,
            uploader,
            store,
            palette: Arc::new(palette),
        }
    }

    /// Validates, authorizes and persists a submission.
    ///
    /// # Errors
    ///
    /// See [`command_handlers::handle_submit_event`].
    pub async fn submit(&self, command: SubmitEvent) -> Result<ReformEvent, DomainError> {
        command_handlers::handle_submit_event(
            command,
            self.clock.as_ref(),
            self.authenticator.as_ref(),
            self.uploader.as_ref(),
            self.store.as_ref(),
        )
        .await
    }

    /// Stores an attachment on its own and returns its URL. The caller must
    /// be the admin.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Unauthorized` for a non-admin caller,
    /// `DomainError::Validation` for an empty body and
    /// `DomainError::Upload` if the uploader fails.
    pub async fn upload(
        &self,
        actor: Option<&str>,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, DomainError> {
        command_handlers::handle_upload(
            actor,
            filename,
            content_type,
            bytes,
            self.authenticator.as_ref(),
            self.uploader.as_ref(),
        )
        .await
    }

    /// Events of `year`, or the single event of `country_code` in `year`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Storage` if the store cannot be read.
    pub async fn query(
        &self,
        year: i32,
        country_code: Option<&str>,
    ) -> Result<Vec<ReformEvent>, DomainError> {
        query_handlers::query_events(year, country_code, self.store.as_ref()).await
    }

    /// Every stored event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Storage` if the store cannot be read.
    pub async fn query_all(&self) -> Result<Vec<ReformEvent>, DomainError> {
        query_handlers::query_all_events(self.store.as_ref()).await
    }

    /// Country colors for `year`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Storage` if the store cannot be read.
    pub async fn colors(&self, year: i32) -> Result<ColorMap, DomainError> {
        query_handlers::project_colors(year, &self.palette, self.store.as_ref()).await
    }

    /// The palette used for projections.
    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }
}
