//! Core data types for the soundboard.
//!
//! Every value that crosses a service boundary is validated on construction:
//! a [`SoundName`] is always 1-64 allowed characters, a [`BlobKey`] is always a
//! bare filename, and an [`AudioContentType`] is always one of the accepted
//! audio MIME types.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod content_type;
mod entry;
mod key;
mod name;
mod telemetry;

pub use content_type::AudioContentType;
pub use entry::SoundEntry;
pub use key::BlobKey;
pub use name::{MAX_NAME_LEN, SoundName};
pub use telemetry::{LogFormat, init_telemetry};
