//! Metadata service trait definition.

use crate::MetadataResult;
use soundboard_core::{SoundEntry, SoundName};

/// Authoritative source of which sounds exist.
///
/// Implementations talk to a remote relational store. They perform no caching
/// and no retries; every call is one round trip.
#[async_trait::async_trait]
pub trait MetadataService: Send + Sync {
    /// Read every sound row.
    async fn list_sounds(&self) -> MetadataResult<Vec<SoundEntry>>;

    /// Insert one sound row.
    async fn insert_sound(&self, entry: &SoundEntry) -> MetadataResult<()>;

    /// Delete the sound row with this name.
    async fn delete_sound(&self, name: &SoundName) -> MetadataResult<()>;
}
