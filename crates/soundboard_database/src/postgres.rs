//! PostgreSQL metadata backend.

use crate::schema::sounds;
use crate::{MetadataResult, MetadataService, SoundRow, rows_to_entries};
use derive_builder::Builder;
use derive_getters::Getters;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use serde::{Deserialize, Serialize};
use soundboard_core::{SoundEntry, SoundName};
use soundboard_error::{MetadataError, MetadataOperation};
use tracing::{debug, instrument};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Connection pool used by the Postgres backend.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

fn default_max_connections() -> u32 {
    4
}

fn default_run_migrations() -> bool {
    true
}

/// Connection settings for a Postgres database.
#[derive(Clone, Serialize, Deserialize, Getters, Builder)]
#[builder(setter(into))]
pub struct PostgresConfig {
    /// `postgres://` connection URL
    database_url: String,
    /// Pool size
    #[serde(default = "default_max_connections")]
    #[builder(default = "default_max_connections()")]
    max_connections: u32,
    /// Apply embedded migrations at startup
    #[serde(default = "default_run_migrations")]
    #[builder(default = "default_run_migrations()")]
    run_migrations: bool,
}

impl std::fmt::Debug for PostgresConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresConfig")
            .field("database_url", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .field("run_migrations", &self.run_migrations)
            .finish()
    }
}

impl PostgresConfig {
    /// Start building a config.
    pub fn builder() -> PostgresConfigBuilder {
        PostgresConfigBuilder::default()
    }
}

/// Create a lazily connecting pool; connection failures surface at first use.
pub fn create_pool(config: &PostgresConfig) -> PgPool {
    let manager = ConnectionManager::<PgConnection>::new(config.database_url());
    Pool::builder()
        .max_size(*config.max_connections())
        .build_unchecked(manager)
}

fn map_diesel_error(operation: MetadataOperation, err: DieselError) -> MetadataError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            MetadataError::unreachable(operation, info.message().to_string())
        }
        other => MetadataError::query_failed(operation, other.to_string()),
    }
}

/// Metadata service backed by a Postgres `sounds` table.
#[derive(Clone)]
pub struct PostgresMetadataService {
    pool: PgPool,
}

impl PostgresMetadataService {
    /// Create a service over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run a blocking diesel call on the blocking thread pool.
    async fn with_connection<T, F>(&self, operation: MetadataOperation, f: F) -> MetadataResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> MetadataResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|e| MetadataError::unreachable(operation, e.to_string()))?;
            f(&mut *conn)
        })
        .await
        .map_err(|e| MetadataError::query_failed(operation, format!("task failed: {e}")))?
    }

    /// Apply any pending embedded migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> MetadataResult<()> {
        let operation = MetadataOperation::Migrate;
        self.with_connection(operation, move |conn| {
            let applied = conn
                .run_pending_migrations(MIGRATIONS)
                .map_err(|e| MetadataError::query_failed(operation, e.to_string()))?;
            debug!(count = applied.len(), "Applied migrations");
            Ok(())
        })
        .await
    }
}

#[async_trait::async_trait]
impl MetadataService for PostgresMetadataService {
    #[instrument(skip(self))]
    async fn list_sounds(&self) -> MetadataResult<Vec<SoundEntry>> {
        let operation = MetadataOperation::List;
        let rows = self
            .with_connection(operation, move |conn| {
                sounds::table
                    .select(SoundRow::as_select())
                    .order(sounds::name.asc())
                    .load(conn)
                    .map_err(|e| map_diesel_error(operation, e))
            })
            .await?;
        debug!(count = rows.len(), "Listed sound rows from Postgres");
        Ok(rows_to_entries(rows))
    }

    #[instrument(skip(self), fields(name = %entry.name(), blob_key = %entry.blob_key()))]
    async fn insert_sound(&self, entry: &SoundEntry) -> MetadataResult<()> {
        let operation = MetadataOperation::Insert;
        let row = SoundRow::from(entry);
        self.with_connection(operation, move |conn| {
            diesel::insert_into(sounds::table)
                .values((sounds::name.eq(&row.name), sounds::file_name.eq(&row.file_name)))
                .execute(conn)
                .map(|_| ())
                .map_err(|e| map_diesel_error(operation, e))
        })
        .await
    }

    #[instrument(skip(self), fields(name = %name))]
    async fn delete_sound(&self, name: &SoundName) -> MetadataResult<()> {
        let operation = MetadataOperation::Delete;
        let name = name.to_string();
        let deleted = self
            .with_connection(operation, move |conn| {
                diesel::delete(sounds::table.filter(sounds::name.eq(&name)))
                    .execute(conn)
                    .map_err(|e| map_diesel_error(operation, e))
            })
            .await?;
        debug!(deleted, "Deleted sound rows from Postgres");
        Ok(())
    }
}
