//! Soundboard domain errors: validation failures and negative lookups.

/// Kinds of soundboard domain errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum SoundErrorKind {
    /// The metadata service answered with zero sounds
    #[display("No sounds available")]
    NoSoundsConfigured,
    /// A sound with this name already exists
    #[display("A sound named '{}' already exists", _0)]
    DuplicateName(String),
    /// Another sound already uses this blob key
    #[display("A sound file named '{}' already exists", _0)]
    DuplicateBlobKey(String),
    /// No sound with this name exists
    #[display("Sound '{}' not found", _0)]
    NotFound(String),
    /// Name is empty, too long, or uses characters outside the allowed set
    #[display("Invalid sound name '{}': use 1-64 letters, digits, spaces, _, - or '", _0)]
    InvalidName(String),
    /// Content type is not an accepted audio MIME type
    #[display("Unsupported content type '{}': only audio files are allowed", _0)]
    InvalidContentType(String),
    /// Filename cannot be used as a blob key
    #[display("Invalid sound filename '{}'", _0)]
    InvalidFilename(String),
}

/// Soundboard domain error with location tracking.
///
/// # Examples
///
/// ```
/// use soundboard_error::{SoundError, SoundErrorKind};
///
/// let err = SoundError::new(SoundErrorKind::DuplicateName("Red Flags".to_string()));
/// assert!(format!("{}", err).contains("already exists"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Sound Error: {} at line {} in {}", kind, line, file)]
pub struct SoundError {
    /// The kind of error that occurred
    pub kind: SoundErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl SoundError {
    /// Create a new soundboard error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SoundErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
