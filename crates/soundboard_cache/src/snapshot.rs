//! The on-disk metadata snapshot.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use soundboard_core::SoundEntry;
use soundboard_error::{LocalStoreError, LocalStoreErrorKind};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

/// File name of the snapshot inside the cache directory.
pub const SNAPSHOT_FILE_NAME: &str = "sounds_cache.json";

/// A point-in-time copy of the metadata service's sound list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct MetadataSnapshot {
    captured_at: DateTime<Utc>,
    sounds: Vec<SoundEntry>,
}

impl MetadataSnapshot {
    /// Capture `sounds` as of now.
    pub fn new(sounds: Vec<SoundEntry>) -> Self {
        Self::captured(Utc::now(), sounds)
    }

    /// Capture `sounds` as of an explicit time.
    pub fn captured(captured_at: DateTime<Utc>, sounds: Vec<SoundEntry>) -> Self {
        Self {
            captured_at,
            sounds,
        }
    }

    /// Whether the snapshot may be served at `now`.
    ///
    /// Fresh means `0 <= now - captured_at < freshness`. A snapshot stamped in
    /// the future is never fresh.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::{TimeDelta, Utc};
    /// use soundboard_cache::MetadataSnapshot;
    /// use std::time::Duration;
    ///
    /// let now = Utc::now();
    /// let snapshot = MetadataSnapshot::captured(now - TimeDelta::seconds(10), vec![]);
    /// assert!(snapshot.is_fresh(now, Duration::from_secs(300)));
    /// assert!(!snapshot.is_fresh(now, Duration::from_secs(10)));
    /// ```
    pub fn is_fresh(&self, now: DateTime<Utc>, freshness: Duration) -> bool {
        match now.signed_duration_since(self.captured_at).to_std() {
            Ok(age) => age < freshness,
            Err(_) => false,
        }
    }

    /// Take the sound list.
    pub fn into_sounds(self) -> Vec<SoundEntry> {
        self.sounds
    }
}

/// The snapshot file at `{dir}/sounds_cache.json`.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    /// Snapshot file inside `dir`.
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(SNAPSHOT_FILE_NAME),
        }
    }

    /// Location of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot.
    ///
    /// A missing file is `None`. So is a file that cannot be read or decoded;
    /// that case is logged because it should never happen with atomic writes.
    pub async fn load(&self) -> Option<MetadataSnapshot> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No snapshot on disk");
                return None;
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Unreadable snapshot ignored");
                return None;
            }
        };

        serde_json::from_slice(&bytes)
            .inspect_err(|e| {
                warn!(path = %self.path.display(), error = %e, "Corrupt snapshot ignored");
            })
            .ok()
    }

    /// Write the snapshot, replacing any previous one atomically.
    pub async fn store(&self, snapshot: &MetadataSnapshot) -> Result<(), LocalStoreError> {
        let json = serde_json::to_vec(snapshot).map_err(|e| {
            LocalStoreError::new(LocalStoreErrorKind::Serialization(e.to_string()))
        })?;

        let temp = self
            .path
            .with_file_name(format!(".{}.{}.tmp", SNAPSHOT_FILE_NAME, Uuid::new_v4()));

        if let Err(e) = tokio::fs::write(&temp, &json).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(LocalStoreError::new(LocalStoreErrorKind::FileWrite(format!(
                "{}: {}",
                temp.display(),
                e
            ))));
        }

        if let Err(e) = tokio::fs::rename(&temp, &self.path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(LocalStoreError::new(LocalStoreErrorKind::FileWrite(format!(
                "{}: {}",
                self.path.display(),
                e
            ))));
        }

        debug!(
            path = %self.path.display(),
            count = snapshot.sounds.len(),
            "Wrote snapshot"
        );
        Ok(())
    }

    /// Delete the snapshot. A missing file is not an error.
    pub async fn invalidate(&self) -> Result<(), LocalStoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "Snapshot invalidated");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LocalStoreError::new(LocalStoreErrorKind::FileRemove(
                format!("{}: {}", self.path.display(), e),
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use soundboard_core::{BlobKey, SoundName};

    fn sounds() -> Vec<SoundEntry> {
        vec![SoundEntry::new(
            SoundName::new("Red Flags").unwrap(),
            BlobKey::new("rf.mp3").unwrap(),
        )]
    }

    #[test]
    fn test_future_snapshot_is_stale() {
        let now = Utc::now();
        let snapshot = MetadataSnapshot::captured(now + TimeDelta::seconds(5), sounds());
        assert!(!snapshot.is_fresh(now, Duration::from_secs(300)));
    }

    #[test]
    fn test_freshness_bound_is_exclusive() {
        let now = Utc::now();
        let snapshot = MetadataSnapshot::captured(now - TimeDelta::seconds(300), sounds());
        assert!(!snapshot.is_fresh(now, Duration::from_secs(300)));
        assert!(snapshot.is_fresh(now, Duration::from_secs(301)));
    }

    #[test]
    fn test_zero_freshness_is_never_fresh() {
        let now = Utc::now();
        let snapshot = MetadataSnapshot::captured(now, sounds());
        assert!(!snapshot.is_fresh(now, Duration::ZERO));
    }

    #[tokio::test]
    async fn test_store_load_invalidate() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = SnapshotFile::new(dir.path());
        assert!(file.load().await.is_none());

        let snapshot = MetadataSnapshot::new(sounds());
        file.store(&snapshot).await.unwrap();
        assert_eq!(file.load().await, Some(snapshot));

        file.invalidate().await.unwrap();
        assert!(file.load().await.is_none());
        file.invalidate().await.unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_absent() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = SnapshotFile::new(dir.path());
        std::fs::write(file.path(), b"{\"captured_at\": 12").unwrap();
        assert!(file.load().await.is_none());
    }
}
