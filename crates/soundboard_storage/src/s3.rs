//! S3-compatible blob storage backend using the AWS SDK.
//!
//! Works against AWS S3 and S3-compatible services such as Cloudflare R2 and
//! MinIO by pointing `endpoint` at the service.

use crate::{BlobResult, BlobStore};
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use soundboard_core::{AudioContentType, BlobKey};
use soundboard_error::{BlobError, BlobOperation};
use std::path::Path;
use tracing::instrument;

fn default_region() -> String {
    "auto".to_string()
}

fn default_prefix() -> String {
    "soundboard".to_string()
}

/// Connection settings for an S3-compatible bucket.
#[derive(Clone, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct S3BlobStoreConfig {
    /// Bucket holding the blobs
    bucket: String,
    /// Endpoint URL; `None` uses AWS S3 for `region`
    #[serde(default)]
    #[builder(default)]
    endpoint: Option<String>,
    /// Signing region ("auto" for Cloudflare R2)
    #[serde(default = "default_region")]
    #[builder(default = "default_region()")]
    region: String,
    /// Key prefix inside the bucket
    #[serde(default = "default_prefix")]
    #[builder(default = "default_prefix()")]
    prefix: String,
    /// Access key id
    access_key_id: String,
    /// Secret access key
    secret_access_key: String,
    /// Use `endpoint/bucket/key` URLs instead of virtual-hosted style
    #[serde(default)]
    #[builder(default)]
    force_path_style: bool,
}

impl std::fmt::Debug for S3BlobStoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3BlobStoreConfig")
            .field("bucket", &self.bucket)
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("prefix", &self.prefix)
            .field("force_path_style", &self.force_path_style)
            .finish_non_exhaustive()
    }
}

/// S3-compatible blob store.
pub struct S3BlobStore {
    client: Client,
    bucket: String,
    prefix: String,
}

impl std::fmt::Debug for S3BlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3BlobStore")
            .field("bucket", &self.bucket)
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl S3BlobStore {
    /// Create a new S3 blob store.
    ///
    /// No request is made until the first operation.
    #[instrument(skip(config), fields(bucket = %config.bucket, region = %config.region))]
    pub fn new(config: &S3BlobStoreConfig) -> Self {
        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None, // session token
            None, // expiration
            "soundboard-config",
        );

        let mut builder = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials);

        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }
        if config.force_path_style {
            builder = builder.force_path_style(true);
        }

        tracing::info!(endpoint = ?config.endpoint, "Created S3 blob store");

        Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
            prefix: config.prefix.trim_matches('/').to_string(),
        }
    }

    /// Full object key for a blob key (applies prefix if configured).
    fn object_key(&self, key: &BlobKey) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}/{}", self.prefix, key)
        }
    }

    /// Whether an SDK error is a 404 from the service.
    fn is_not_found<E>(err: &SdkError<E>) -> bool {
        matches!(err, SdkError::ServiceError(service) if service.raw().status().as_u16() == 404)
    }

    /// Convert an AWS SDK error to a blob error for `operation`.
    ///
    /// Transport failures, timeouts, and rejected credentials mean the service
    /// could not be used at all; everything else is a failure of the operation.
    fn map_sdk_error<E>(err: SdkError<E>, operation: BlobOperation, key: &BlobKey) -> BlobError
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let reason = DisplayErrorContext(&err).to_string();
        match &err {
            SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => {
                BlobError::unreachable(operation, reason)
            }
            SdkError::ServiceError(service)
                if matches!(service.raw().status().as_u16(), 401 | 403) =>
            {
                BlobError::unreachable(operation, reason)
            }
            _ if Self::is_not_found(&err) => {
                BlobError::failed(operation, key.as_str(), "blob not found")
            }
            _ => BlobError::failed(operation, key.as_str(), reason),
        }
    }
}

#[async_trait::async_trait]
impl BlobStore for S3BlobStore {
    #[instrument(skip(self, data), fields(backend = "s3", key = %key, size = data.len()))]
    async fn put(
        &self,
        key: &BlobKey,
        data: Vec<u8>,
        content_type: AudioContentType,
    ) -> BlobResult<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(self.object_key(key))
            .content_type(content_type.as_str())
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| Self::map_sdk_error(e, BlobOperation::Upload, key))?;

        tracing::info!("Uploaded blob");
        Ok(())
    }

    #[instrument(skip(self, destination), fields(backend = "s3", key = %key))]
    async fn get_to_file(&self, key: &BlobKey, destination: &Path) -> BlobResult<()> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(self.object_key(key))
            .send()
            .await
            .map_err(|e| Self::map_sdk_error(e, BlobOperation::Fetch, key))?;

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| BlobError::failed(BlobOperation::Fetch, key.as_str(), e.to_string()))?
            .into_bytes();

        tokio::fs::write(destination, &bytes).await.map_err(|e| {
            BlobError::failed(
                BlobOperation::Fetch,
                key.as_str(),
                format!("write {}: {}", destination.display(), e),
            )
        })?;

        tracing::debug!(size = bytes.len(), "Fetched blob");
        Ok(())
    }

    #[instrument(skip(self), fields(backend = "s3", key = %key))]
    async fn delete(&self, key: &BlobKey) -> BlobResult<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(self.object_key(key))
            .send()
            .await
            .map_err(|e| Self::map_sdk_error(e, BlobOperation::Delete, key))?;

        tracing::info!("Deleted blob");
        Ok(())
    }
}
