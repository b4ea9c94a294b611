//! Cache configuration.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the sound cache.
///
/// # Example
///
/// ```
/// use soundboard_cache::SoundCacheConfig;
///
/// let config = SoundCacheConfig::default().with_freshness_secs(60);
/// assert_eq!(*config.freshness_secs(), 60);
/// assert_eq!(config.dir().to_str(), Some("cache"));
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
#[builder(setter(into))]
pub struct SoundCacheConfig {
    /// Directory holding the snapshot file and the shadow directory
    #[serde(default = "default_dir")]
    #[builder(default = "default_dir()")]
    dir: PathBuf,

    /// How long a snapshot is served without a live query (seconds)
    #[serde(default = "default_freshness_secs")]
    #[builder(default = "default_freshness_secs()")]
    freshness_secs: u64,
}

fn default_dir() -> PathBuf {
    PathBuf::from("cache")
}

fn default_freshness_secs() -> u64 {
    300 // 5 minutes
}

impl Default for SoundCacheConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            freshness_secs: default_freshness_secs(),
        }
    }
}

impl SoundCacheConfig {
    /// Start building a config.
    pub fn builder() -> SoundCacheConfigBuilder {
        SoundCacheConfigBuilder::default()
    }

    /// Freshness window as a duration.
    pub fn freshness(&self) -> Duration {
        Duration::from_secs(self.freshness_secs)
    }
}
