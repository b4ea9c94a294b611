//! Metadata service error types.

/// Metadata service call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum MetadataOperation {
    /// Reading every sound row
    #[display("list")]
    List,
    /// Inserting one sound row
    #[display("insert")]
    Insert,
    /// Deleting one sound row by name
    #[display("delete")]
    Delete,
    /// Applying schema migrations
    #[display("migrate")]
    Migrate,
}

/// Kinds of metadata service errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum MetadataErrorKind {
    /// Connection or authentication failure; the query never ran
    #[display("Metadata service unreachable during {operation}: {reason}")]
    Unreachable {
        /// Call that was attempted
        operation: MetadataOperation,
        /// Transport or auth failure description
        reason: String,
    },
    /// The service answered but the query failed or the response was malformed
    #[display("Metadata {operation} query failed: {reason}")]
    QueryFailed {
        /// Call that was attempted
        operation: MetadataOperation,
        /// Server-reported or decoding failure
        reason: String,
    },
}

impl MetadataErrorKind {
    /// The metadata call this error came from.
    pub fn operation(&self) -> MetadataOperation {
        match self {
            MetadataErrorKind::Unreachable { operation, .. }
            | MetadataErrorKind::QueryFailed { operation, .. } => *operation,
        }
    }
}

/// Metadata service error with location tracking.
///
/// # Examples
///
/// ```
/// use soundboard_error::{MetadataError, MetadataErrorKind, MetadataOperation};
///
/// let err = MetadataError::new(MetadataErrorKind::Unreachable {
///     operation: MetadataOperation::List,
///     reason: "connection refused".to_string(),
/// });
/// assert!(format!("{}", err).contains("unreachable during list"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Metadata Error: {} at line {} in {}", kind, line, file)]
pub struct MetadataError {
    /// The kind of error that occurred
    pub kind: MetadataErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl MetadataError {
    /// Create a new metadata error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: MetadataErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for an unreachable-service error.
    #[track_caller]
    pub fn unreachable(operation: MetadataOperation, reason: impl Into<String>) -> Self {
        Self::new(MetadataErrorKind::Unreachable {
            operation,
            reason: reason.into(),
        })
    }

    /// Shorthand for a failed-query error.
    #[track_caller]
    pub fn query_failed(operation: MetadataOperation, reason: impl Into<String>) -> Self {
        Self::new(MetadataErrorKind::QueryFailed {
            operation,
            reason: reason.into(),
        })
    }
}
