//! Blob store trait definition.

use crate::BlobResult;
use soundboard_core::{AudioContentType, BlobKey};
use std::path::Path;

/// Trait for pluggable blob storage backends.
///
/// A blob store holds the raw audio bytes of each sound under its
/// [`BlobKey`]. Metadata lives elsewhere; the store knows nothing about
/// sound names.
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    /// Upload `data` under `key`, replacing any existing blob.
    ///
    /// # Arguments
    ///
    /// * `key` - Storage key
    /// * `data` - Raw audio bytes
    /// * `content_type` - MIME type recorded with the object
    async fn put(&self, key: &BlobKey, data: Vec<u8>, content_type: AudioContentType)
    -> BlobResult<()>;

    /// Download the blob under `key` into `destination`.
    ///
    /// The destination file is created or truncated. On error its contents are
    /// unspecified; callers download into a temporary path.
    async fn get_to_file(&self, key: &BlobKey, destination: &Path) -> BlobResult<()>;

    /// Delete the blob under `key`.
    async fn delete(&self, key: &BlobKey) -> BlobResult<()>;
}
