//! Filesystem-based blob storage implementation.
//!
//! Mirrors the layout of an object store bucket on local disk, which makes it
//! a drop-in backend for development and tests.

use crate::{BlobResult, BlobStore};
use soundboard_core::{AudioContentType, BlobKey};
use soundboard_error::{BlobError, BlobOperation, LocalStoreError, LocalStoreErrorKind};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Filesystem blob store.
///
/// Stores each blob at `{base_path}/{prefix}/{key}`:
///
/// ```text
/// /var/soundboard/blobs/
/// └── soundboard/
///     ├── rf.mp3
///     └── airhorn.wav
/// ```
///
/// Writes go to a uniquely named temp file first and are renamed into place,
/// so readers never observe a half-written blob.
#[derive(Debug, Clone)]
pub struct FileSystemBlobStore {
    root: PathBuf,
}

impl FileSystemBlobStore {
    /// Create a new filesystem blob store.
    ///
    /// Creates `{base_path}/{prefix}` if it doesn't exist. An empty prefix
    /// stores blobs directly under `base_path`.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    #[tracing::instrument(skip(base_path))]
    pub fn new(base_path: impl Into<PathBuf>, prefix: &str) -> Result<Self, LocalStoreError> {
        let base_path = base_path.into();
        let prefix = prefix.trim_matches('/');
        let root = if prefix.is_empty() {
            base_path
        } else {
            base_path.join(prefix)
        };

        std::fs::create_dir_all(&root).map_err(|e| {
            LocalStoreError::new(LocalStoreErrorKind::DirectoryCreation(format!(
                "{}: {}",
                root.display(),
                e
            )))
        })?;

        tracing::info!(path = %root.display(), "Created filesystem blob store");
        Ok(Self { root })
    }

    /// Directory holding the blobs.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the filesystem path for a key.
    fn path_for(&self, key: &BlobKey) -> PathBuf {
        self.root.join(key.as_str())
    }
}

#[async_trait::async_trait]
impl BlobStore for FileSystemBlobStore {
    #[tracing::instrument(skip(self, data), fields(key = %key, size = data.len(), content_type = %content_type))]
    async fn put(
        &self,
        key: &BlobKey,
        data: Vec<u8>,
        content_type: AudioContentType,
    ) -> BlobResult<()> {
        let path = self.path_for(key);
        let temp_path = self.root.join(format!(".{}.tmp", Uuid::new_v4()));

        tokio::fs::write(&temp_path, &data).await.map_err(|e| {
            BlobError::failed(
                BlobOperation::Upload,
                key.as_str(),
                format!("write {}: {}", temp_path.display(), e),
            )
        })?;

        if let Err(e) = tokio::fs::rename(&temp_path, &path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(BlobError::failed(
                BlobOperation::Upload,
                key.as_str(),
                format!("rename {} to {}: {}", temp_path.display(), path.display(), e),
            ));
        }

        tracing::info!(path = %path.display(), "Stored blob");
        Ok(())
    }

    #[tracing::instrument(skip(self, destination), fields(key = %key, destination = %destination.display()))]
    async fn get_to_file(&self, key: &BlobKey, destination: &Path) -> BlobResult<()> {
        let path = self.path_for(key);

        let size = tokio::fs::copy(&path, destination).await.map_err(|e| {
            let reason = if e.kind() == std::io::ErrorKind::NotFound {
                "blob not found".to_string()
            } else {
                format!("copy {}: {}", path.display(), e)
            };
            BlobError::failed(BlobOperation::Fetch, key.as_str(), reason)
        })?;

        tracing::debug!(size, "Fetched blob");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(key = %key))]
    async fn delete(&self, key: &BlobKey) -> BlobResult<()> {
        let path = self.path_for(key);

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Deleted blob");
                Ok(())
            }
            // Object stores treat deleting a missing key as success
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Blob already absent");
                Ok(())
            }
            Err(e) => Err(BlobError::failed(
                BlobOperation::Delete,
                key.as_str(),
                format!("delete {}: {}", path.display(), e),
            )),
        }
    }
}
