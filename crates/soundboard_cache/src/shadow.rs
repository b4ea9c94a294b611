//! Local shadow copies of blobs.

use soundboard_core::BlobKey;
use soundboard_error::{LocalStoreError, LocalStoreErrorKind};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Directory holding one local file per materialized blob, at `{dir}/sounds/{key}`.
#[derive(Debug, Clone)]
pub struct ShadowDirectory {
    root: PathBuf,
}

impl ShadowDirectory {
    /// Shadow directory inside the cache directory `dir`.
    pub fn new(dir: &Path) -> Self {
        Self {
            root: dir.join("sounds"),
        }
    }

    /// Location of the shadow directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the directory if it doesn't exist.
    pub fn ensure(&self) -> Result<(), LocalStoreError> {
        std::fs::create_dir_all(&self.root).map_err(|e| {
            LocalStoreError::new(LocalStoreErrorKind::DirectoryCreation(format!(
                "{}: {}",
                self.root.display(),
                e
            )))
        })
    }

    /// Deterministic shadow path for a key.
    pub fn path_for(&self, key: &BlobKey) -> PathBuf {
        self.root.join(key.as_str())
    }

    /// Unique download path, renamed onto [`Self::path_for`] on success.
    ///
    /// The name does not embed the key, so it stays short for every valid key.
    pub fn temp_path(&self) -> PathBuf {
        self.root.join(format!(".{}.part", Uuid::new_v4()))
    }

    /// Whether the shadow for `key` is present.
    pub async fn exists(&self, key: &BlobKey) -> Result<bool, LocalStoreError> {
        let path = self.path_for(key);
        tokio::fs::try_exists(&path).await.map_err(|e| {
            LocalStoreError::new(LocalStoreErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })
    }

    /// Move a completed download into place.
    pub async fn commit(&self, temp: &Path, key: &BlobKey) -> Result<PathBuf, LocalStoreError> {
        let path = self.path_for(key);
        if let Err(e) = tokio::fs::rename(temp, &path).await {
            self.discard(temp).await;
            return Err(LocalStoreError::new(LocalStoreErrorKind::FileWrite(format!(
                "{}: {}",
                path.display(),
                e
            ))));
        }
        Ok(path)
    }

    /// Best-effort removal of an abandoned download.
    pub async fn discard(&self, temp: &Path) {
        match tokio::fs::remove_file(temp).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %temp.display(), error = %e, "Failed to remove partial download"),
        }
    }

    /// Remove the shadow for `key`. Returns whether a file was removed.
    pub async fn remove(&self, key: &BlobKey) -> Result<bool, LocalStoreError> {
        let path = self.path_for(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(LocalStoreError::new(LocalStoreErrorKind::FileRemove(
                format!("{}: {}", path.display(), e),
            ))),
        }
    }
}
