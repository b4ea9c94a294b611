//! Error types for the soundboard workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! Every error type is `Clone` so that a single failed blob fetch can be
//! handed to every caller that was waiting on it.
//!
//! # Examples
//!
//! ```
//! use soundboard_error::{ErrorCategory, SoundError, SoundErrorKind, SoundboardResult};
//!
//! fn lookup() -> SoundboardResult<()> {
//!     Err(SoundError::new(SoundErrorKind::NotFound("Red Flags".to_string())))?
//! }
//!
//! let err = lookup().unwrap_err();
//! assert_eq!(err.category(), ErrorCategory::NotFound);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod blob;
mod config;
mod error;
mod local;
mod metadata;
mod sound;

pub use blob::{BlobError, BlobErrorKind, BlobOperation};
pub use config::ConfigError;
pub use error::{ErrorCategory, SoundboardError, SoundboardErrorKind, SoundboardResult};
pub use local::{LocalStoreError, LocalStoreErrorKind};
pub use metadata::{MetadataError, MetadataErrorKind, MetadataOperation};
pub use sound::{SoundError, SoundErrorKind};
