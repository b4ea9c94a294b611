//! Top-level error wrapper types.

use crate::{BlobError, ConfigError, LocalStoreError, MetadataError, SoundError, SoundErrorKind};

/// Every error the soundboard can produce.
///
/// # Examples
///
/// ```
/// use soundboard_error::{SoundboardError, ConfigError};
///
/// let err: SoundboardError = ConfigError::new("missing bucket").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, Clone, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum SoundboardErrorKind {
    /// Metadata service error
    #[from(MetadataError)]
    Metadata(MetadataError),
    /// Blob store error
    #[from(BlobError)]
    Blob(BlobError),
    /// Validation failure or negative lookup
    #[from(SoundError)]
    Sound(SoundError),
    /// Snapshot or shadow file error
    #[from(LocalStoreError)]
    LocalStore(LocalStoreError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

/// How a caller should present an error to an end user.
///
/// The four categories map to categorically different messages: "nothing to
/// show", "couldn't check", "that one doesn't exist", and "you can't do that".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ErrorCategory {
    /// The soundboard has no sounds
    #[display("empty")]
    Empty,
    /// A backing service or the local cache failed
    #[display("unavailable")]
    Unavailable,
    /// The requested sound does not exist
    #[display("not found")]
    NotFound,
    /// The request was refused before doing any work
    #[display("rejected")]
    Rejected,
}

/// Soundboard error with kind discrimination.
///
/// # Examples
///
/// ```
/// use soundboard_error::{SoundboardResult, SoundError, SoundErrorKind};
///
/// fn add() -> SoundboardResult<()> {
///     Err(SoundError::new(SoundErrorKind::InvalidName("###".to_string())))?
/// }
///
/// match add() {
///     Ok(_) => println!("Added"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Soundboard Error: {}", _0)]
pub struct SoundboardError(Box<SoundboardErrorKind>);

impl SoundboardError {
    /// Create a new error from a kind.
    pub fn new(kind: SoundboardErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &SoundboardErrorKind {
        &self.0
    }

    /// Get the soundboard domain kind, if this is a domain error.
    pub fn sound_kind(&self) -> Option<&SoundErrorKind> {
        match self.kind() {
            SoundboardErrorKind::Sound(err) => Some(&err.kind),
            _ => None,
        }
    }

    /// Classify this error for user-facing messaging.
    pub fn category(&self) -> ErrorCategory {
        match self.kind() {
            SoundboardErrorKind::Sound(err) => match err.kind {
                SoundErrorKind::NoSoundsConfigured => ErrorCategory::Empty,
                SoundErrorKind::NotFound(_) => ErrorCategory::NotFound,
                SoundErrorKind::DuplicateName(_)
                | SoundErrorKind::DuplicateBlobKey(_)
                | SoundErrorKind::InvalidName(_)
                | SoundErrorKind::InvalidContentType(_)
                | SoundErrorKind::InvalidFilename(_) => ErrorCategory::Rejected,
            },
            SoundboardErrorKind::Metadata(_)
            | SoundboardErrorKind::Blob(_)
            | SoundboardErrorKind::LocalStore(_)
            | SoundboardErrorKind::Config(_) => ErrorCategory::Unavailable,
        }
    }
}

// Generic From implementation for any type that converts to SoundboardErrorKind
impl<T> From<T> for SoundboardError
where
    T: Into<SoundboardErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for soundboard operations.
pub type SoundboardResult<T> = std::result::Result<T, SoundboardError>;
