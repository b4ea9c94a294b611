//! Blob storage for soundboard audio.
//!
//! This crate provides pluggable storage backends for the raw audio bytes of
//! each sound. Metadata (which sounds exist) is kept by the metadata service;
//! this crate only moves bytes.
//!
//! # Backends
//!
//! - [`FileSystemBlobStore`]: blobs under a local directory, atomic writes
//! - `S3BlobStore` (feature `s3`): any S3-compatible service, e.g. Cloudflare R2
//!
//! # Example
//!
//! ```rust
//! use soundboard_core::{AudioContentType, BlobKey};
//! use soundboard_storage::{BlobStore, FileSystemBlobStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FileSystemBlobStore::new("/tmp/soundboard-blobs", "soundboard")?;
//! let key = BlobKey::new("rf.mp3")?;
//!
//! store.put(&key, b"ID3...".to_vec(), AudioContentType::Mpeg).await?;
//! store.get_to_file(&key, std::path::Path::new("/tmp/rf.mp3")).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod filesystem;
#[cfg(feature = "s3")]
mod s3;
mod storage;

pub use filesystem::FileSystemBlobStore;
#[cfg(feature = "s3")]
pub use s3::{S3BlobStore, S3BlobStoreConfig, S3BlobStoreConfigBuilder};
pub use soundboard_error::{BlobError, BlobErrorKind, BlobOperation};
pub use storage::BlobStore;

/// Result type for blob store operations.
pub type BlobResult<T> = Result<T, BlobError>;
