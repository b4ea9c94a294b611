//! Cloudflare D1 metadata backend.
//!
//! D1 exposes a single HTTP endpoint per database that runs one SQL statement
//! with positional parameters and answers with the standard Cloudflare
//! envelope:
//!
//! ```json
//! {"success": true, "errors": [], "result": [{"success": true, "results": [...]}]}
//! ```

use crate::{MetadataResult, MetadataService, SoundRow, rows_to_entries};
use derive_builder::Builder;
use derive_getters::Getters;
use regex::Regex;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use soundboard_core::{SoundEntry, SoundName};
use soundboard_error::{ConfigError, MetadataError, MetadataOperation};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, error, instrument};

const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

static IDENTIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$")
        .unwrap_or_else(|e| panic!("identifier pattern is a constant: {e}"))
});

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_table() -> String {
    "sounds".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Connection settings for a D1 database.
#[derive(Clone, Serialize, Deserialize, Getters, Builder)]
#[builder(setter(into))]
pub struct D1Config {
    /// Cloudflare account ID
    account_id: String,
    /// D1 database ID
    database_id: String,
    /// API token with D1 edit permission
    api_token: String,
    /// API root, overridable for testing
    #[serde(default = "default_base_url")]
    #[builder(default = "default_base_url()")]
    base_url: String,
    /// Table holding `(name, file_name)` rows
    #[serde(default = "default_table")]
    #[builder(default = "default_table()")]
    table: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    #[builder(default = "default_timeout_secs()")]
    timeout_secs: u64,
}

impl std::fmt::Debug for D1Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("D1Config")
            .field("account_id", &self.account_id)
            .field("database_id", &self.database_id)
            .field("api_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("table", &self.table)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl D1Config {
    /// Start building a config.
    pub fn builder() -> D1ConfigBuilder {
        D1ConfigBuilder::default()
    }
}

#[derive(Debug, Serialize)]
struct D1Query<'a> {
    sql: &'a str,
    params: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
struct D1Message {
    #[serde(default)]
    code: Option<i64>,
    message: String,
}

impl std::fmt::Display for D1Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} ({})", self.message, code),
            None => write!(f, "{}", self.message),
        }
    }
}

#[derive(Debug, Deserialize)]
struct D1QueryResult<R> {
    results: Option<Vec<R>>,
    #[serde(default = "default_true")]
    success: bool,
}

#[derive(Debug, Deserialize)]
struct D1Envelope<R> {
    success: bool,
    errors: Option<Vec<D1Message>>,
    result: Option<Vec<D1QueryResult<R>>>,
}

fn default_true() -> bool {
    true
}

fn join_messages(messages: &[D1Message]) -> String {
    if messages.is_empty() {
        return "no error detail".to_string();
    }
    messages
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Decode a D1 response body into the rows of its first statement.
fn decode_envelope<R: DeserializeOwned>(
    operation: MetadataOperation,
    body: &str,
) -> MetadataResult<Vec<R>> {
    let envelope: D1Envelope<R> = serde_json::from_str(body).map_err(|e| {
        MetadataError::query_failed(operation, format!("malformed response: {e}"))
    })?;

    if !envelope.success {
        let errors = envelope.errors.unwrap_or_default();
        return Err(MetadataError::query_failed(
            operation,
            join_messages(&errors),
        ));
    }

    let statement = envelope
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| {
            MetadataError::query_failed(operation, "malformed response: no statement result")
        })?;

    if !statement.success {
        return Err(MetadataError::query_failed(
            operation,
            "statement reported failure",
        ));
    }

    Ok(statement.results.unwrap_or_default())
}

/// Metadata service backed by a Cloudflare D1 database.
#[derive(Debug, Clone)]
pub struct D1MetadataService {
    client: Client,
    endpoint: String,
    api_token: String,
    list_sql: String,
    insert_sql: String,
    delete_sql: String,
}

impl D1MetadataService {
    /// Build a client for the configured database.
    ///
    /// # Errors
    ///
    /// Fails if the table name is not a plain SQL identifier or the HTTP
    /// client cannot be built.
    pub fn new(config: &D1Config) -> Result<Self, ConfigError> {
        let table = config.table();
        if !IDENTIFIER_RE.is_match(table) {
            return Err(ConfigError::new(format!(
                "D1 table name must be a plain SQL identifier, got {table:?}"
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(*config.timeout_secs()))
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build HTTP client: {e}")))?;

        let endpoint = format!(
            "{}/accounts/{}/d1/database/{}/query",
            config.base_url().trim_end_matches('/'),
            config.account_id(),
            config.database_id()
        );
        debug!(endpoint = %endpoint, table = %table, "Creating D1 metadata service");

        Ok(Self {
            client,
            endpoint,
            api_token: config.api_token().clone(),
            list_sql: format!(r#"SELECT name, file_name FROM "{table}";"#),
            insert_sql: format!(r#"INSERT INTO "{table}" (name, file_name) VALUES (?1, ?2);"#),
            delete_sql: format!(r#"DELETE FROM "{table}" WHERE name = ?1;"#),
        })
    }

    /// Run one statement and return the rows of its result.
    async fn execute<R: DeserializeOwned>(
        &self,
        operation: MetadataOperation,
        sql: &str,
        params: Vec<&str>,
    ) -> MetadataResult<Vec<R>> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_token)
            .json(&D1Query { sql, params })
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to reach D1");
                MetadataError::unreachable(operation, format!("request failed: {e}"))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!(error = ?e, "Failed to read D1 response");
            MetadataError::unreachable(operation, format!("failed to read response: {e}"))
        })?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            error!(status = %status, "D1 rejected credentials");
            return Err(MetadataError::unreachable(
                operation,
                format!("authentication failed with status {status}"),
            ));
        }

        if !status.is_success() {
            error!(status = %status, body = %body, "D1 returned error");
            let detail = serde_json::from_str::<D1Envelope<serde_json::Value>>(&body)
                .ok()
                .and_then(|envelope| envelope.errors)
                .map(|errors| join_messages(&errors))
                .unwrap_or(body);
            return Err(MetadataError::query_failed(
                operation,
                format!("status {status}: {detail}"),
            ));
        }

        decode_envelope(operation, &body)
    }
}

#[async_trait::async_trait]
impl MetadataService for D1MetadataService {
    #[instrument(skip(self))]
    async fn list_sounds(&self) -> MetadataResult<Vec<SoundEntry>> {
        let rows: Vec<SoundRow> = self
            .execute(MetadataOperation::List, &self.list_sql, Vec::new())
            .await?;
        debug!(count = rows.len(), "Listed sound rows from D1");
        Ok(rows_to_entries(rows))
    }

    #[instrument(skip(self), fields(name = %entry.name(), blob_key = %entry.blob_key()))]
    async fn insert_sound(&self, entry: &SoundEntry) -> MetadataResult<()> {
        self.execute::<serde_json::Value>(
            MetadataOperation::Insert,
            &self.insert_sql,
            vec![entry.name().as_str(), entry.blob_key().as_str()],
        )
        .await?;
        debug!("Inserted sound row into D1");
        Ok(())
    }

    #[instrument(skip(self), fields(name = %name))]
    async fn delete_sound(&self, name: &SoundName) -> MetadataResult<()> {
        self.execute::<serde_json::Value>(
            MetadataOperation::Delete,
            &self.delete_sql,
            vec![name.as_str()],
        )
        .await?;
        debug!("Deleted sound row from D1");
        Ok(())
    }
}
