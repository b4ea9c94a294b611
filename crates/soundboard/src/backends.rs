//! Construct the configured services and the cache on top of them.

use crate::config::{BlobBackend, BlobConfig, MetadataBackend, MetadataConfig, SoundboardConfig};
use soundboard_cache::SoundCache;
use soundboard_database::{D1MetadataService, MetadataService};
use soundboard_error::{ConfigError, SoundboardResult};
use soundboard_storage::{BlobStore, FileSystemBlobStore};
use std::sync::Arc;
use tracing::{info, instrument};

/// Build the metadata service selected by `metadata.backend`.
///
/// # Errors
///
/// Returns error if the backend's settings table is missing, the backend is
/// not compiled in, or (Postgres) migrations fail.
#[instrument(skip(config), fields(backend = ?config.backend()))]
pub async fn build_metadata(config: &MetadataConfig) -> SoundboardResult<Arc<dyn MetadataService>> {
    match config.backend() {
        MetadataBackend::D1 => {
            let d1 = config.d1().as_ref().ok_or_else(|| {
                ConfigError::new("metadata.backend is \"d1\" but [metadata.d1] is not configured")
            })?;
            info!("Using D1 metadata service");
            Ok(Arc::new(D1MetadataService::new(d1)?))
        }
        MetadataBackend::Postgres => build_postgres(config).await,
    }
}

#[cfg(feature = "postgres")]
async fn build_postgres(config: &MetadataConfig) -> SoundboardResult<Arc<dyn MetadataService>> {
    use soundboard_database::{PostgresMetadataService, create_pool};

    let postgres = config.postgres().as_ref().ok_or_else(|| {
        ConfigError::new("metadata.backend is \"postgres\" but [metadata.postgres] is not configured")
    })?;
    let service = PostgresMetadataService::new(create_pool(postgres));
    if *postgres.run_migrations() {
        service.run_migrations().await?;
    }
    info!("Using Postgres metadata service");
    Ok(Arc::new(service))
}

#[cfg(not(feature = "postgres"))]
async fn build_postgres(_config: &MetadataConfig) -> SoundboardResult<Arc<dyn MetadataService>> {
    Err(ConfigError::new("metadata.backend is \"postgres\" but this build lacks the postgres feature").into())
}

/// Build the blob store selected by `blobs.backend`.
///
/// # Errors
///
/// Returns error if the backend's settings table is missing, the backend is
/// not compiled in, or the filesystem directory cannot be created.
#[instrument(skip(config), fields(backend = ?config.backend()))]
pub fn build_blob_store(config: &BlobConfig) -> SoundboardResult<Arc<dyn BlobStore>> {
    match config.backend() {
        BlobBackend::S3 => build_s3(config),
        BlobBackend::Filesystem => {
            let fs = config.filesystem();
            info!(path = %fs.path().display(), "Using filesystem blob store");
            Ok(Arc::new(FileSystemBlobStore::new(fs.path().clone(), fs.prefix())?))
        }
    }
}

#[cfg(feature = "s3")]
fn build_s3(config: &BlobConfig) -> SoundboardResult<Arc<dyn BlobStore>> {
    let s3 = config.s3().as_ref().ok_or_else(|| {
        ConfigError::new("blobs.backend is \"s3\" but [blobs.s3] is not configured")
    })?;
    info!(bucket = %s3.bucket(), "Using S3 blob store");
    Ok(Arc::new(soundboard_storage::S3BlobStore::new(s3)))
}

#[cfg(not(feature = "s3"))]
fn build_s3(_config: &BlobConfig) -> SoundboardResult<Arc<dyn BlobStore>> {
    Err(ConfigError::new("blobs.backend is \"s3\" but this build lacks the s3 feature").into())
}

/// Build the sound cache with the configured backends.
pub async fn build_cache(config: &SoundboardConfig) -> SoundboardResult<SoundCache> {
    let metadata = build_metadata(config.metadata()).await?;
    let blobs = build_blob_store(config.blobs())?;
    Ok(SoundCache::new(config.cache().clone(), metadata, blobs)?)
}
