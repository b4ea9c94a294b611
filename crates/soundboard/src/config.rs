//! Layered configuration for the soundboard.
//!
//! Sources, later overriding earlier:
//! 1. Bundled defaults (include_str! from soundboard.toml)
//! 2. `~/.config/soundboard/soundboard.toml`
//! 3. `./soundboard.toml`
//! 4. An explicit file (`--config`)
//! 5. `SOUNDBOARD__*` environment variables, `__` separating nested keys

use config::{Config, Environment, File, FileFormat};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use soundboard_cache::SoundCacheConfig;
use soundboard_database::D1Config;
#[cfg(feature = "postgres")]
use soundboard_database::PostgresConfig;
use soundboard_error::{ConfigError, SoundboardResult};
#[cfg(feature = "s3")]
use soundboard_storage::S3BlobStoreConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../soundboard.toml");

/// Which metadata service to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataBackend {
    /// Cloudflare D1 over HTTP
    #[default]
    D1,
    /// Postgres via diesel
    Postgres,
}

/// Metadata service settings.
#[derive(Debug, Clone, Serialize, Deserialize, Getters)]
pub struct MetadataConfig {
    /// Selected backend
    #[serde(default)]
    backend: MetadataBackend,
    /// Settings for the D1 backend
    #[serde(default)]
    d1: Option<D1Config>,
    /// Settings for the Postgres backend
    #[cfg(feature = "postgres")]
    #[serde(default)]
    postgres: Option<PostgresConfig>,
}

/// Which blob store to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlobBackend {
    /// S3-compatible object storage
    #[default]
    S3,
    /// Local directory
    Filesystem,
}

fn default_blob_path() -> PathBuf {
    PathBuf::from("blobs")
}

fn default_blob_prefix() -> String {
    "soundboard".to_string()
}

/// Settings for the filesystem blob store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct FileSystemBlobConfig {
    /// Base directory
    #[serde(default = "default_blob_path")]
    path: PathBuf,
    /// Subdirectory holding the blobs
    #[serde(default = "default_blob_prefix")]
    prefix: String,
}

impl Default for FileSystemBlobConfig {
    fn default() -> Self {
        Self {
            path: default_blob_path(),
            prefix: default_blob_prefix(),
        }
    }
}

/// Blob store settings.
#[derive(Debug, Clone, Serialize, Deserialize, Getters)]
pub struct BlobConfig {
    /// Selected backend
    #[serde(default)]
    backend: BlobBackend,
    /// Settings for the S3 backend
    #[cfg(feature = "s3")]
    #[serde(default)]
    s3: Option<S3BlobStoreConfig>,
    /// Settings for the filesystem backend
    #[serde(default)]
    filesystem: FileSystemBlobConfig,
}

/// Complete soundboard configuration.
///
/// # Example
///
/// ```no_run
/// use soundboard::SoundboardConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = SoundboardConfig::load(None)?;
/// println!("cache in {}", config.cache().dir().display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Getters)]
pub struct SoundboardConfig {
    /// Snapshot and shadow settings
    #[serde(default)]
    cache: SoundCacheConfig,
    /// Metadata service settings
    metadata: MetadataConfig,
    /// Blob store settings
    blobs: BlobConfig,
}

impl SoundboardConfig {
    /// Environment source for `SOUNDBOARD__SECTION__KEY` variables.
    pub fn environment() -> Environment {
        Environment::with_prefix("SOUNDBOARD")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    /// Load configuration from every source, reading the process environment.
    ///
    /// # Errors
    ///
    /// Returns error if a file cannot be parsed, an explicit file is missing,
    /// or the merged result does not deserialize.
    #[instrument]
    pub fn load(explicit: Option<&Path>) -> SoundboardResult<Self> {
        Self::load_with_environment(explicit, Self::environment())
    }

    /// Load configuration with a caller-supplied environment source.
    #[instrument(skip(environment))]
    pub fn load_with_environment(
        explicit: Option<&Path>,
        environment: Environment,
    ) -> SoundboardResult<Self> {
        debug!("Loading configuration: env > explicit > current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/soundboard/soundboard.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("soundboard").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder
            .add_source(environment)
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)).into())
    }

    /// Load configuration from a single file, without defaults or environment.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> SoundboardResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                ))
            })?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)).into())
    }
}
