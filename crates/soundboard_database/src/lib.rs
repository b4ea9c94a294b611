//! Sound metadata services.
//!
//! The [`MetadataService`] trait is the authoritative record of which sounds
//! exist. Two backends are provided:
//!
//! - [`D1MetadataService`] talks to a Cloudflare D1 database over its HTTP
//!   query API.
//! - `PostgresMetadataService` (feature `postgres`) uses diesel with an r2d2
//!   pool and an embedded migration for the `sounds` table.
//!
//! # Example
//!
//! ```rust,no_run
//! use soundboard_database::{D1Config, D1MetadataService, MetadataService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = D1Config::builder()
//!     .account_id("account")
//!     .database_id("database")
//!     .api_token("token")
//!     .build()?;
//! let service = D1MetadataService::new(&config)?;
//! let sounds = service.list_sounds().await?;
//! println!("{} sounds", sounds.len());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod d1;
mod row;
mod service;

#[cfg(feature = "postgres")]
mod postgres;
#[cfg(feature = "postgres")]
#[allow(missing_docs)]
pub mod schema;

pub use d1::{D1Config, D1ConfigBuilder, D1MetadataService};
pub use row::{SoundRow, rows_to_entries};
pub use service::MetadataService;

#[cfg(feature = "postgres")]
pub use postgres::{PgPool, PostgresConfig, PostgresConfigBuilder, PostgresMetadataService, create_pool};

pub use soundboard_error::{MetadataError, MetadataErrorKind, MetadataOperation};

/// Result type for metadata service calls.
pub type MetadataResult<T> = Result<T, MetadataError>;
