//! The sound cache.

use crate::{MetadataSnapshot, ShadowDirectory, SnapshotFile, SoundCacheConfig};
use chrono::Utc;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use soundboard_core::{AudioContentType, BlobKey, SoundEntry, SoundName};
use soundboard_database::MetadataService;
use soundboard_error::{
    LocalStoreError, LocalStoreErrorKind, SoundError, SoundErrorKind, SoundboardResult,
};
use soundboard_storage::BlobStore;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Most suggestions [`SoundCache::autocomplete`] returns (the chat platform's choice limit).
pub const AUTOCOMPLETE_LIMIT: usize = 25;

type FetchFuture = Shared<BoxFuture<'static, SoundboardResult<PathBuf>>>;
type InFlight = Arc<Mutex<HashMap<BlobKey, FetchFuture>>>;

/// Read-through, write-invalidate cache in front of the metadata service and
/// the blob store.
///
/// The sound list is served from an on-disk snapshot while it is younger than
/// the freshness window. Audio bytes are copied into a local shadow directory
/// the first time they are needed; concurrent requests for the same cold blob
/// share one download.
///
/// Construct once and share behind an [`Arc`].
///
/// # Example
///
/// ```rust,no_run
/// use soundboard_cache::{SoundCache, SoundCacheConfig};
/// use soundboard_database::{D1Config, D1MetadataService};
/// use soundboard_storage::FileSystemBlobStore;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let metadata = D1MetadataService::new(
///     &D1Config::builder()
///         .account_id("account")
///         .database_id("database")
///         .api_token("token")
///         .build()?,
/// )?;
/// let blobs = FileSystemBlobStore::new("/var/soundboard/blobs", "soundboard")?;
/// let cache = SoundCache::new(SoundCacheConfig::default(), Arc::new(metadata), Arc::new(blobs))?;
///
/// if let Some(entry) = cache.find_sound("Red Flags").await? {
///     let path = cache.materialize_blob(entry.blob_key()).await?;
///     println!("play {}", path.display());
/// }
/// # Ok(())
/// # }
/// ```
pub struct SoundCache {
    config: SoundCacheConfig,
    metadata: Arc<dyn MetadataService>,
    blobs: Arc<dyn BlobStore>,
    snapshot: SnapshotFile,
    shadows: ShadowDirectory,
    in_flight: InFlight,
}

impl std::fmt::Debug for SoundCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoundCache")
            .field("config", &self.config)
            .field("in_flight", &self.in_flight.lock().len())
            .finish_non_exhaustive()
    }
}

impl SoundCache {
    /// Create the cache, making its directories if needed.
    ///
    /// # Errors
    ///
    /// Returns error if the cache or shadow directory cannot be created.
    pub fn new(
        config: SoundCacheConfig,
        metadata: Arc<dyn MetadataService>,
        blobs: Arc<dyn BlobStore>,
    ) -> Result<Self, LocalStoreError> {
        let snapshot = SnapshotFile::new(config.dir());
        let shadows = ShadowDirectory::new(config.dir());
        shadows.ensure()?;

        info!(
            dir = %config.dir().display(),
            freshness_secs = config.freshness_secs(),
            "Created sound cache"
        );
        Ok(Self {
            config,
            metadata,
            blobs,
            snapshot,
            shadows,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Cache configuration.
    pub fn config(&self) -> &SoundCacheConfig {
        &self.config
    }

    /// Location of the snapshot file.
    pub fn snapshot_path(&self) -> &Path {
        self.snapshot.path()
    }

    /// Location a blob is shadowed at, whether or not it has been fetched.
    pub fn shadow_path(&self, key: &BlobKey) -> PathBuf {
        self.shadows.path_for(key)
    }

    /// Every known sound.
    ///
    /// Served from the snapshot while it is fresh. Otherwise the metadata
    /// service is queried and the result, even an empty one, becomes the new
    /// snapshot. A failed query writes nothing.
    #[instrument(skip(self))]
    pub async fn list_sounds(&self) -> SoundboardResult<Vec<SoundEntry>> {
        if let Some(snapshot) = self.snapshot.load().await {
            if snapshot.is_fresh(Utc::now(), self.config.freshness()) {
                debug!(count = snapshot.sounds().len(), "Serving sounds from snapshot");
                return Ok(snapshot.into_sounds());
            }
            debug!(captured_at = %snapshot.captured_at(), "Snapshot is stale");
        }

        let sounds = self.metadata.list_sounds().await?;
        let snapshot = MetadataSnapshot::new(sounds);
        self.snapshot.store(&snapshot).await?;
        info!(count = snapshot.sounds().len(), "Refreshed sound snapshot");
        Ok(snapshot.into_sounds())
    }

    /// Every known sound, failing with `NoSoundsConfigured` when there are none.
    #[instrument(skip(self))]
    pub async fn require_sounds(&self) -> SoundboardResult<Vec<SoundEntry>> {
        let sounds = self.list_sounds().await?;
        if sounds.is_empty() {
            return Err(SoundError::new(SoundErrorKind::NoSoundsConfigured).into());
        }
        Ok(sounds)
    }

    /// Look up a sound by exact, case-sensitive name.
    ///
    /// A name that is not a valid [`SoundName`] cannot exist, so it is `None`
    /// without consulting the service.
    #[instrument(skip(self))]
    pub async fn find_sound(&self, name: &str) -> SoundboardResult<Option<SoundEntry>> {
        let Ok(name) = SoundName::new(name) else {
            debug!("Invalid sound name cannot match");
            return Ok(None);
        };
        self.find_by_name(&name).await
    }

    async fn find_by_name(&self, name: &SoundName) -> SoundboardResult<Option<SoundEntry>> {
        Ok(self
            .list_sounds()
            .await?
            .into_iter()
            .find(|entry| entry.name() == name))
    }

    /// Local path holding the bytes of `key`, downloading them if needed.
    ///
    /// Concurrent calls for the same cold key share a single download. The
    /// download runs on its own task and completes even if every caller stops
    /// waiting. A failed download leaves nothing at the shadow path.
    #[instrument(skip(self), fields(key = %key))]
    pub async fn materialize_blob(&self, key: &BlobKey) -> SoundboardResult<PathBuf> {
        if self.shadows.exists(key).await? {
            debug!("Shadow hit");
            return Ok(self.shadows.path_for(key));
        }

        let fetch = {
            let mut in_flight = self.in_flight.lock();
            match in_flight.get(key) {
                Some(existing) => {
                    debug!("Joining in-flight fetch");
                    existing.clone()
                }
                None => {
                    let task = tokio::spawn(fetch_blob(
                        Arc::clone(&self.blobs),
                        self.shadows.clone(),
                        key.clone(),
                        Arc::clone(&self.in_flight),
                    ));
                    let joined: BoxFuture<'static, SoundboardResult<PathBuf>> = async move {
                        match task.await {
                            Ok(result) => result,
                            Err(e) => Err(LocalStoreError::new(
                                LocalStoreErrorKind::TaskFailed(e.to_string()),
                            )
                            .into()),
                        }
                    }
                    .boxed();
                    let shared = joined.shared();
                    in_flight.insert(key.clone(), shared.clone());
                    shared
                }
            }
        };

        fetch.await
    }

    /// Local path of the named sound's audio, downloading it if needed.
    #[instrument(skip(self))]
    pub async fn fetch_sound(&self, name: &str) -> SoundboardResult<PathBuf> {
        let entry = self
            .find_sound(name)
            .await?
            .ok_or_else(|| SoundError::new(SoundErrorKind::NotFound(name.to_string())))?;
        self.materialize_blob(entry.blob_key()).await
    }

    /// Add a sound: upload its bytes, then record it, then invalidate.
    ///
    /// Input is validated before any remote call. The name and the key derived
    /// from `filename` must both be unused. If the metadata insert fails the
    /// uploaded blob is left in place.
    #[instrument(skip(self, data), fields(size = data.len()))]
    pub async fn add_sound(
        &self,
        name: &str,
        data: Vec<u8>,
        content_type: &str,
        filename: &str,
    ) -> SoundboardResult<SoundEntry> {
        let name = SoundName::new(name)?;
        let content_type: AudioContentType = content_type.parse()?;
        let blob_key = BlobKey::from_filename(filename)?;

        let sounds = self.list_sounds().await?;
        if sounds.iter().any(|entry| entry.name() == &name) {
            return Err(SoundError::new(SoundErrorKind::DuplicateName(name.into())).into());
        }
        if sounds.iter().any(|entry| entry.blob_key() == &blob_key) {
            return Err(SoundError::new(SoundErrorKind::DuplicateBlobKey(blob_key.into())).into());
        }

        self.blobs.put(&blob_key, data, content_type).await?;
        let entry = SoundEntry::new(name, blob_key);
        self.metadata.insert_sound(&entry).await?;
        self.invalidate().await?;

        info!(name = %entry.name(), blob_key = %entry.blob_key(), "Added sound");
        Ok(entry)
    }

    /// Delete a sound: its blob, then its row, then its shadow, then invalidate.
    ///
    /// A name that is not a valid [`SoundName`] is `NotFound` without any
    /// remote call. Each stage aborts the rest on failure; the error names the
    /// stage.
    #[instrument(skip(self))]
    pub async fn delete_sound(&self, name: &str) -> SoundboardResult<()> {
        let Ok(name) = SoundName::new(name) else {
            return Err(SoundError::new(SoundErrorKind::NotFound(name.to_string())).into());
        };
        let entry = self
            .find_by_name(&name)
            .await?
            .ok_or_else(|| SoundError::new(SoundErrorKind::NotFound(name.to_string())))?;

        self.blobs.delete(entry.blob_key()).await?;
        self.metadata.delete_sound(&name).await?;
        let removed = self.shadows.remove(entry.blob_key()).await?;
        self.invalidate().await?;

        info!(blob_key = %entry.blob_key(), shadow_removed = removed, "Deleted sound");
        Ok(())
    }

    /// Up to [`AUTOCOMPLETE_LIMIT`] names containing `partial`, ignoring case, in list order.
    #[instrument(skip(self))]
    pub async fn autocomplete(&self, partial: &str) -> SoundboardResult<Vec<SoundName>> {
        Ok(self
            .list_sounds()
            .await?
            .into_iter()
            .filter(|entry| entry.name().matches_partial(partial))
            .take(AUTOCOMPLETE_LIMIT)
            .map(|entry| entry.name().clone())
            .collect())
    }

    /// Drop the snapshot so the next read queries the metadata service.
    #[instrument(skip(self))]
    pub async fn invalidate(&self) -> SoundboardResult<()> {
        self.snapshot.invalidate().await?;
        Ok(())
    }
}

/// Unregisters an in-flight fetch when the fetch task ends, including by panic.
struct InFlightEntry {
    key: BlobKey,
    in_flight: InFlight,
}

impl Drop for InFlightEntry {
    fn drop(&mut self) {
        self.in_flight.lock().remove(&self.key);
    }
}

/// Download one blob into its shadow, then unregister the in-flight entry.
async fn fetch_blob(
    blobs: Arc<dyn BlobStore>,
    shadows: ShadowDirectory,
    key: BlobKey,
    in_flight: InFlight,
) -> SoundboardResult<PathBuf> {
    let _entry = InFlightEntry {
        key: key.clone(),
        in_flight,
    };
    download(blobs.as_ref(), &shadows, &key).await
}

async fn download(
    blobs: &dyn BlobStore,
    shadows: &ShadowDirectory,
    key: &BlobKey,
) -> SoundboardResult<PathBuf> {
    // A fetch that finished just before this one was registered
    if shadows.exists(key).await? {
        return Ok(shadows.path_for(key));
    }

    let temp = shadows.temp_path();
    if let Err(e) = blobs.get_to_file(key, &temp).await {
        shadows.discard(&temp).await;
        return Err(e.into());
    }
    let path = shadows.commit(&temp, key).await?;

    info!(key = %key, path = %path.display(), "Materialized blob");
    Ok(path)
}
