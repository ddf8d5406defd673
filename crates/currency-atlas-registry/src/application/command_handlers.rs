//! Command handlers for the event registry.
//!
//! `handle_submit_event` runs the write path in a fixed order: validate,
//! authorize, resolve the attachment, stamp audit fields, upsert. Nothing is
//! written unless every earlier step succeeded.

use currency_atlas_core::auth::Authenticator;
use currency_atlas_core::clock::Clock;
use currency_atlas_core::command::Command;
use currency_atlas_core::error::DomainError;
use currency_atlas_core::event::{EventKey, ReformEvent};
use currency_atlas_core::store::EventStore;
use currency_atlas_core::upload::BlobUploader;
use tracing::{debug, info};

use crate::domain::commands::{Attachment, SubmitEvent};
use crate::domain::validation::validate;

/// Handles the `SubmitEvent` command and returns the event as persisted.
///
/// # Errors
///
/// Returns `DomainError::Validation` for missing or invalid fields,
/// `DomainError::Unauthorized` if the actor is absent or not the admin,
/// `DomainError::Upload` if the attachment cannot be stored and
/// `DomainError::Storage` if the store fails. In every error case the store
/// is left untouched.
pub async fn handle_submit_event(
    command: SubmitEvent,
    clock: &dyn Clock,
    authenticator: &dyn Authenticator,
    uploader: &dyn BlobUploader,
    store: &dyn EventStore,
) -> Result<ReformEvent, DomainError> {
    let submission = validate(&command)?;
    let command_type = command.command_type();
    let correlation_id = command.correlation_id();

    let actor = authorize(command.actor.as_deref(), authenticator).await?;

    let file_url = resolve_attachment(command.attachment, &submission.key, uploader, store).await?;

    let event = ReformEvent {
        country_code: submission.key.country_code,
        year: submission.key.year,
        reform_type: submission.reform_type.into(),
        title: submission.title,
        desc: submission.desc,
        file_url,
        saved_by: Some(actor),
        timestamp: Some(clock.now()),
    };

    store.upsert(&event).await?;

    info!(
        %correlation_id,
        command_type,
        key = %event.key(),
        reform_type = %event.reform_type,
        "event saved"
    );

    Ok(event)
}

/// Handles a standalone attachment upload and returns the blob URL, which
/// the client later sends back as the event's `fileUrl`.
///
/// # Errors
///
/// Returns `DomainError::Unauthorized` if the actor is absent or not the
/// admin, `DomainError::Validation` for an empty body and
/// `DomainError::Upload` if the uploader fails.
pub async fn handle_upload(
    actor: Option<&str>,
    filename: &str,
    content_type: &str,
    bytes: Vec<u8>,
    authenticator: &dyn Authenticator,
    uploader: &dyn BlobUploader,
) -> Result<String, DomainError> {
    let actor = authorize(actor, authenticator).await?;
    if bytes.is_empty() {
        return Err(DomainError::Validation("attachment body is empty".into()));
    }

    let size = bytes.len();
    let url = uploader.put(filename, content_type, bytes).await?;
    info!(%actor, filename, size, %url, "attachment uploaded");
    Ok(url)
}

async fn authorize(
    actor: Option<&str>,
    authenticator: &dyn Authenticator,
) -> Result<String, DomainError> {
    let actor = actor
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .ok_or_else(|| DomainError::Unauthorized("sign in as the admin to save events".into()))?;

    if authenticator.is_admin(actor).await? {
        Ok(actor.to_owned())
    } else {
        Err(DomainError::Unauthorized(format!("{actor} is not the admin")))
    }
}

/// Picks the `fileUrl` to store: a fresh upload, a URL the client already
/// holds, or whatever the existing event for `key` carries.
async fn resolve_attachment(
    attachment: Option<Attachment>,
    key: &EventKey,
    uploader: &dyn BlobUploader,
    store: &dyn EventStore,
) -> Result<String, DomainError> {
    match attachment {
        Some(Attachment::Upload {
            filename,
            content_type,
            bytes,
        }) => {
            let url = uploader.put(&filename, &content_type, bytes).await?;
            debug!(%key, %url, "attachment uploaded");
            Ok(url)
        }
        Some(Attachment::Url(url)) if !url.trim().is_empty() => Ok(url.trim().to_owned()),
        _ => Ok(store
            .get(key)
            .await?
            .map(|existing| existing.file_url)
            .unwrap_or_default()),
    }
}
