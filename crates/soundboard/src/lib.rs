//! Soundboard metadata cache.
//!
//! A read-through cache in front of a sound metadata service (Cloudflare D1 or
//! Postgres) and an S3-compatible blob store. Command handlers list, look up,
//! add, delete and play sounds through one shared [`SoundCache`].
//!
//! # Example
//!
//! ```no_run
//! use soundboard::{SoundboardConfig, build_cache};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SoundboardConfig::load(None)?;
//! let cache = build_cache(&config).await?;
//!
//! for name in cache.autocomplete("horn").await? {
//!     println!("{name}");
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod backends;
mod config;

pub use backends::{build_blob_store, build_cache, build_metadata};
pub use config::{
    BlobBackend, BlobConfig, FileSystemBlobConfig, MetadataBackend, MetadataConfig,
    SoundboardConfig,
};

pub use soundboard_cache::{
    AUTOCOMPLETE_LIMIT, MetadataSnapshot, SoundCache, SoundCacheConfig, SoundCacheConfigBuilder,
};
pub use soundboard_core::{
    AudioContentType, BlobKey, LogFormat, MAX_NAME_LEN, SoundEntry, SoundName, init_telemetry,
};
pub use soundboard_database::{D1Config, D1ConfigBuilder, D1MetadataService, MetadataService};
#[cfg(feature = "postgres")]
pub use soundboard_database::{PostgresConfig, PostgresConfigBuilder, PostgresMetadataService};
pub use soundboard_error::{
    BlobError, BlobErrorKind, BlobOperation, ConfigError, ErrorCategory, LocalStoreError,
    LocalStoreErrorKind, MetadataError, MetadataErrorKind, MetadataOperation, SoundError,
    SoundErrorKind, SoundboardError, SoundboardErrorKind, SoundboardResult,
};
pub use soundboard_storage::{BlobStore, FileSystemBlobStore};
#[cfg(feature = "s3")]
pub use soundboard_storage::{S3BlobStore, S3BlobStoreConfig, S3BlobStoreConfigBuilder};
