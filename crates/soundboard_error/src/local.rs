//! Local filesystem error types (snapshot file and blob shadows).

/// Kinds of local storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum LocalStoreErrorKind {
    /// Failed to create a cache directory
    #[display("Failed to create directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to read a file
    #[display("Failed to read file: {}", _0)]
    FileRead(String),
    /// Failed to write a file
    #[display("Failed to write file: {}", _0)]
    FileWrite(String),
    /// Failed to remove a file
    #[display("Failed to remove file: {}", _0)]
    FileRemove(String),
    /// Failed to encode or decode the snapshot
    #[display("Serialization error: {}", _0)]
    Serialization(String),
    /// A background fetch task panicked or was aborted
    #[display("Background task failed: {}", _0)]
    TaskFailed(String),
}

/// Local storage error with location tracking.
///
/// # Examples
///
/// ```
/// use soundboard_error::{LocalStoreError, LocalStoreErrorKind};
///
/// let err = LocalStoreError::new(LocalStoreErrorKind::FileWrite("cache/sounds_cache.json".to_string()));
/// assert!(format!("{}", err).contains("Failed to write"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Local Storage Error: {} at line {} in {}", kind, line, file)]
pub struct LocalStoreError {
    /// The kind of error that occurred
    pub kind: LocalStoreErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl LocalStoreError {
    /// Create a new local storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: LocalStoreErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
