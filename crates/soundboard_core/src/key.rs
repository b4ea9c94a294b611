//! Blob keys derived from uploaded filenames.

use serde::{Deserialize, Serialize};
use soundboard_error::{SoundError, SoundErrorKind};

/// Longest accepted blob key, in bytes (common filesystem name limit).
const MAX_KEY_LEN: usize = 255;

/// Storage key of a sound's audio bytes.
///
/// A key is the bare filename of the uploaded file. It doubles as the local
/// shadow filename, so it never contains path separators and is never `.` or
/// `..`.
///
/// # Examples
///
/// ```
/// use soundboard_core::BlobKey;
///
/// let key = BlobKey::from_filename("uploads/rf.mp3").unwrap();
/// assert_eq!(key.as_str(), "rf.mp3");
/// assert!(BlobKey::from_filename("..").is_err());
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(try_from = "String", into = "String")]
pub struct BlobKey(String);

impl BlobKey {
    /// Validate an existing key.
    #[track_caller]
    pub fn new(key: impl Into<String>) -> Result<Self, SoundError> {
        let key = key.into();
        let valid = !key.is_empty()
            && key.len() <= MAX_KEY_LEN
            && key != "."
            && key != ".."
            && !key.contains(['/', '\\', '\0']);
        if valid {
            Ok(Self(key))
        } else {
            Err(SoundError::new(SoundErrorKind::InvalidFilename(key)))
        }
    }

    /// Derive a key from an uploaded file's name, keeping only the last path component.
    #[track_caller]
    pub fn from_filename(filename: &str) -> Result<Self, SoundError> {
        let base = filename
            .rsplit(|c| c == '/' || c == '\\')
            .next()
            .unwrap_or(filename);
        if base.is_empty() {
            return Err(SoundError::new(SoundErrorKind::InvalidFilename(
                filename.to_string(),
            )));
        }
        Self::new(base)
    }

    /// Borrow the key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BlobKey {
    type Error = SoundError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BlobKey> for String {
    fn from(key: BlobKey) -> Self {
        key.0
    }
}

impl AsRef<str> for BlobKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
