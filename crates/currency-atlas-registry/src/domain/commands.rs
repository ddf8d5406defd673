//! Commands for the event registry.

use currency_atlas_core::command::Command;
use uuid::Uuid;

/// A new file to store, or a URL to an already stored one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attachment {
    /// Raw bytes handed to the blob uploader.
    Upload {
        /// Original filename.
        filename: String,
        /// MIME type reported by the client.
        content_type: String,
        /// File contents.
        bytes: Vec<u8>,
    },
    /// URL returned by an earlier upload.
    Url(String),
}

/// Command to create or replace the event for a `(countryCode, year)` pair.
///
/// Fields arrive as the client sent them; nothing is trusted until
/// validation has run.
#[derive(Debug, Clone, Default)]
pub struct SubmitEvent {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Identity of the caller, `None` when not signed in.
    pub actor: Option<String>,
    /// Country code.
    pub country_code: Option<String>,
    /// Signed year.
    pub year: Option<i64>,
    /// Reform category name.
    pub reform_type: Option<String>,
    /// Headline; absent means empty.
    pub title: Option<String>,
    /// Description; absent means empty.
    pub desc: Option<String>,
    /// New attachment; absent keeps the stored one.
    pub attachment: Option<Attachment>,
}

impl Command for SubmitEvent {
    fn command_type(&self) -> &'static str {
        "registry.submit_event"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
