//! Test uploaders — mock `BlobUploader` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use currency_atlas_core::error::DomainError;
use currency_atlas_core::upload::BlobUploader;

/// One recorded `put` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCall {
    /// Filename passed by the caller.
    pub filename: String,
    /// Content type passed by the caller.
    pub content_type: String,
    /// Number of bytes uploaded.
    pub len: usize,
}

/// An uploader that records every call and answers with
/// `https://blobs.test/<filename>`.
#[derive(Debug, Default)]
pub struct RecordingBlobUploader {
    calls: Mutex<Vec<UploadCall>>,
}

impl RecordingBlobUploader {
    /// Creates an uploader with no recorded calls.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all recorded calls.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn calls(&self) -> Vec<UploadCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlobUploader for RecordingBlobUploader {
    async fn put(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, DomainError> {
        self.calls.lock().unwrap().push(UploadCall {
            filename: filename.to_owned(),
            content_type: content_type.to_owned(),
            len: bytes.len(),
        });
        Ok(format!("https://blobs.test/{filename}"))
    }
}

/// An uploader that always fails. Useful for testing that nothing is written
/// when the attachment cannot be stored.
#[derive(Debug)]
pub struct FailingBlobUploader;

#[async_trait]
impl BlobUploader for FailingBlobUploader {
    async fn put(
        &self,
        _filename: &str,
        _content_type: &str,
        _bytes: Vec<u8>,
    ) -> Result<String, DomainError> {
        Err(DomainError::Upload("quota exceeded".into()))
    }
}
