//! Blob store error types.

/// Blob store call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum BlobOperation {
    /// Downloading a blob to a local file
    #[display("fetch")]
    Fetch,
    /// Uploading a blob
    #[display("upload")]
    Upload,
    /// Deleting a blob
    #[display("delete")]
    Delete,
}

/// Kinds of blob store errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum BlobErrorKind {
    /// The blob service could not be reached at all
    #[display("Blob service unreachable during {operation}: {reason}")]
    Unreachable {
        /// Call that was attempted
        operation: BlobOperation,
        /// Transport failure description
        reason: String,
    },
    /// Downloading the blob failed
    #[display("Could not fetch blob '{key}': {reason}")]
    FetchFailed {
        /// Blob key
        key: String,
        /// Failure description
        reason: String,
    },
    /// Uploading the blob failed
    #[display("Could not upload blob '{key}': {reason}")]
    UploadFailed {
        /// Blob key
        key: String,
        /// Failure description
        reason: String,
    },
    /// Deleting the blob failed
    #[display("Could not delete blob '{key}': {reason}")]
    DeleteFailed {
        /// Blob key
        key: String,
        /// Failure description
        reason: String,
    },
}

impl BlobErrorKind {
    /// The blob call this error came from.
    pub fn operation(&self) -> BlobOperation {
        match self {
            BlobErrorKind::Unreachable { operation, .. } => *operation,
            BlobErrorKind::FetchFailed { .. } => BlobOperation::Fetch,
            BlobErrorKind::UploadFailed { .. } => BlobOperation::Upload,
            BlobErrorKind::DeleteFailed { .. } => BlobOperation::Delete,
        }
    }
}

/// Blob store error with location tracking.
///
/// # Examples
///
/// ```
/// use soundboard_error::{BlobError, BlobErrorKind, BlobOperation};
///
/// let err = BlobError::new(BlobErrorKind::UploadFailed {
///     key: "rf.mp3".to_string(),
///     reason: "403 Forbidden".to_string(),
/// });
/// assert_eq!(err.kind.operation(), BlobOperation::Upload);
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Blob Error: {} at line {} in {}", kind, line, file)]
pub struct BlobError {
    /// The kind of error that occurred
    pub kind: BlobErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl BlobError {
    /// Create a new blob error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: BlobErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Build the operation-specific failure kind for `key`.
    #[track_caller]
    pub fn failed(operation: BlobOperation, key: impl Into<String>, reason: impl Into<String>) -> Self {
        let key = key.into();
        let reason = reason.into();
        let kind = match operation {
            BlobOperation::Fetch => BlobErrorKind::FetchFailed { key, reason },
            BlobOperation::Upload => BlobErrorKind::UploadFailed { key, reason },
            BlobOperation::Delete => BlobErrorKind::DeleteFailed { key, reason },
        };
        Self::new(kind)
    }

    /// Shorthand for an unreachable-service error.
    #[track_caller]
    pub fn unreachable(operation: BlobOperation, reason: impl Into<String>) -> Self {
        Self::new(BlobErrorKind::Unreachable {
            operation,
            reason: reason.into(),
        })
    }
}
