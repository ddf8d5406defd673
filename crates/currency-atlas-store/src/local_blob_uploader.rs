//! Filesystem implementation of the `BlobUploader` trait.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, instrument};
use uuid::Uuid;

use currency_atlas_core::error::DomainError;
use currency_atlas_core::upload::BlobUploader;

/// Name used when the client sends no usable filename.
pub const FALLBACK_FILENAME: &str = "upload.bin";

/// Writes each blob to `<root>/<uuid-v7>-<sanitized filename>` and answers
/// with `<base_url>/files/<same name>`. The API serves `root` at `/files`.
#[derive(Debug, Clone)]
pub struct LocalBlobUploader {
    root: PathBuf,
    base_url: String,
}

impl LocalBlobUploader {
    /// Creates an uploader writing under `root` and building URLs from
    /// `base_url` (trailing slashes ignored).
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, base_url: &str) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Directory blobs are written to.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Reduces a client filename to its last path segment, with anything outside
/// `[A-Za-z0-9._-]` replaced by `_`.
#[must_use]
pub fn sanitize_filename(filename: &str) -> String {
    let last = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    let cleaned: String = last
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        FALLBACK_FILENAME.to_owned()
    } else {
        cleaned.to_owned()
    }
}

#[async_trait]
impl BlobUploader for LocalBlobUploader {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn put(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, DomainError> {
        let upload = |e: std::io::Error| DomainError::Upload(format!("failed to store blob: {e}"));

        let name = format!("{}-{}", Uuid::now_v7(), sanitize_filename(filename));
        tokio::fs::create_dir_all(&self.root).await.map_err(upload)?;
        tokio::fs::write(self.root.join(&name), bytes)
            .await
            .map_err(upload)?;

        debug!(%name, "blob stored");
        Ok(format!("{}/files/{name}", self.base_url))
    }
}
