use super::ObjectStore;
use crate::config::StorageConfig;
use crate::errors::{AppError, AppResult};
use crate::models::StoredObjectMetadata;
use async_trait::async_trait;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::region::Region;
use s3::Bucket;
use std::path::Path;
use tracing::{debug, warn};

const NOT_FOUND: u16 = 404;

/// HEAD on the bucket root is a HeadBucket request.
const BUCKET_ROOT: &str = "/";

/// Object store backed by an S3 (or S3-compatible) bucket.
///
/// Credentials come from the standard AWS chain: `AWS_ACCESS_KEY_ID` /
/// `AWS_SECRET_ACCESS_KEY`, the shared profile file, or instance metadata.
pub struct S3Store {
    bucket: Box<Bucket>,
}

impl S3Store {
    pub fn new(bucket_name: &str, config: &StorageConfig) -> AppResult<Self> {
        let credentials = Credentials::default().map_err(|e| {
            AppError::ConfigError(format!("Failed to load storage credentials: {e}"))
        })?;
        Self::with_credentials(bucket_name, config, credentials)
    }

    /// Builds the store with explicit credentials instead of the AWS chain.
    pub fn with_credentials(
        bucket_name: &str,
        config: &StorageConfig,
        credentials: Credentials,
    ) -> AppResult<Self> {
        let region = match &config.endpoint {
            Some(endpoint) => Region::Custom {
                region: config.region.clone(),
                endpoint: endpoint.clone(),
            },
            None => config.region.parse::<Region>().map_err(|e| {
                AppError::ConfigError(format!("Invalid region '{}': {e}", config.region))
            })?,
        };

        let mut bucket = Bucket::new(bucket_name, region, credentials)?;
        if config.path_style {
            bucket = bucket.with_path_style();
        }

        Ok(Self { bucket })
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    fn bucket_name(&self) -> &str {
        &self.bucket.name
    }

    async fn bucket_exists(&self) -> AppResult<bool> {
        match self.bucket.head_object(BUCKET_ROOT).await {
            Ok((_, status)) if (200..300).contains(&status) => Ok(true),
            Ok((_, NOT_FOUND)) | Err(S3Error::HttpFailWithBody(NOT_FOUND, _)) => {
                debug!(bucket = %self.bucket.name, "Bucket not found");
                Ok(false)
            }
            Err(S3Error::HttpFailWithBody(_, ref body)) if body.contains("NoSuchBucket") => {
                debug!(bucket = %self.bucket.name, "Bucket not found");
                Ok(false)
            }
            Ok((_, status)) | Err(S3Error::HttpFailWithBody(status, _)) => {
                Err(AppError::StorageError(format!(
                    "HTTP {status}: HEAD bucket {}",
                    self.bucket.name
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn stat(&self, key: &str) -> AppResult<Option<StoredObjectMetadata>> {
        match self.bucket.head_object(key).await {
            Ok((_, NOT_FOUND)) | Err(S3Error::HttpFailWithBody(NOT_FOUND, _)) => {
                debug!(key = key, "Object not found in bucket");
                Ok(None)
            }
            Ok((head, status)) if (200..300).contains(&status) => {
                let content_length = stored_length(head.content_length, key)?;
                Ok(Some(StoredObjectMetadata { content_length }))
            }
            Ok((_, status)) => Err(AppError::StorageError(format!(
                "HTTP {status}: HEAD {key} in bucket {}",
                self.bucket.name
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn put_file(&self, key: &str, path: &Path) -> AppResult<u64> {
        let mut file = tokio::fs::File::open(path).await.map_err(|e| {
            AppError::IoError(format!("Failed to open {}: {e}", path.display()))
        })?;
        let size = file.metadata().await?.len();

        self.bucket.put_object_stream(&mut file, key).await?;
        Ok(size)
    }
}

/// A stored object without a usable length cannot be compared, so it is an
/// error rather than size 0.
fn stored_length(content_length: Option<i64>, key: &str) -> AppResult<u64> {
    match content_length.map(u64::try_from) {
        Some(Ok(len)) => Ok(len),
        Some(Err(_)) | None => {
            warn!(key = key, "Stored object has no usable Content-Length");
            Err(AppError::StorageError(format!(
                "HEAD {key} returned no usable Content-Length"
            )))
        }
    }
}
