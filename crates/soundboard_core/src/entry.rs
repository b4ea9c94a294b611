//! The sound record shared by the metadata service, the snapshot, and callers.

use crate::{BlobKey, SoundName};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// One playable sound.
///
/// # Examples
///
/// ```
/// use soundboard_core::{BlobKey, SoundEntry, SoundName};
///
/// let entry = SoundEntry::new(
///     SoundName::new("Red Flags").unwrap(),
///     BlobKey::new("rf.mp3").unwrap(),
/// );
/// assert_eq!(entry.blob_key().as_str(), "rf.mp3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct SoundEntry {
    name: SoundName,
    blob_key: BlobKey,
}

impl SoundEntry {
    /// Pair a name with the key of its audio bytes.
    pub fn new(name: SoundName, blob_key: BlobKey) -> Self {
        Self { name, blob_key }
    }
}
