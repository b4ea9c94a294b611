//! Sound metadata cache for the soundboard.
//!
//! [`SoundCache`] sits between command handlers and the two remote services:
//!
//! - the metadata service, fronted by a JSON snapshot at
//!   `{dir}/sounds_cache.json` that is trusted for five minutes by default
//! - the blob store, shadowed into `{dir}/sounds/{blob_key}` on first use
//!
//! Adds upload the blob before inserting the row; deletes remove the blob,
//! the row and the shadow in that order. Both invalidate the snapshot.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cache;
mod config;
mod shadow;
mod snapshot;

pub use cache::{AUTOCOMPLETE_LIMIT, SoundCache};
pub use config::{SoundCacheConfig, SoundCacheConfigBuilder};
pub use shadow::ShadowDirectory;
pub use snapshot::{MetadataSnapshot, SNAPSHOT_FILE_NAME, SnapshotFile};
