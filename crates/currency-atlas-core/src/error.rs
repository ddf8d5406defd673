//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Missing or invalid input. Raised before any mutation.
    #[error("validation error: {0}")]
    Validation(String),

    /// The caller is not the admin identity.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The attachment could not be stored by the blob uploader.
    #[error("upload error: {0}")]
    Upload(String),

    /// A persistence backend failed to read or write.
    #[error("storage error: {0}")]
    Storage(String),
}

impl DomainError {
    /// Builds a `Validation` error naming every offending field.
    #[must_use]
    pub fn invalid_fields(fields: &[&str]) -> Self {
        Self::Validation(format!("missing or invalid field(s): {}", fields.join(", ")))
    }

    /// Whether retrying the same request later may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Upload(_) | Self::Storage(_))
    }
}
