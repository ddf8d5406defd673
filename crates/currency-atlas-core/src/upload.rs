//! Attachment upload abstraction.

use async_trait::async_trait;

use crate::error::DomainError;

/// Stores attachment bytes somewhere durable and hands back a URL for them.
#[async_trait]
pub trait BlobUploader: Send + Sync {
    /// Stores `bytes` under a name derived from `filename` and returns the
    /// public URL of the stored blob.
    ///
    /// Failures are reported as `DomainError::Upload`.
    async fn put(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, DomainError>;
}
