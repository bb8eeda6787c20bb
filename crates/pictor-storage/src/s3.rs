use std::time::Duration;

use async_trait::async_trait;
use http::Method;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::signer::Signer;
use object_store::Error as ObjectStoreError;
use object_store::{ObjectStoreExt, Result as ObjectResult};

use crate::traits::{expires_at_for, Grant, ObjectStorage, StorageError, StorageResult};

/// S3 presigning backend
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO, "https://nyc3.digitaloceanspaces.com" for DigitalOcean Spaces)
    pub fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
    ) -> StorageResult<Self> {
        // Build AmazonS3 object store from environment and explicit settings.
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region)
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage { store, bucket })
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn mint_write_grant(
        &self,
        storage_key: &str,
        content_type: &str,
        ttl: Duration,
    ) -> StorageResult<Grant> {
        let start = std::time::Instant::now();
        let location = Path::from(storage_key.to_string());

        let url_result: ObjectResult<_> = self.store.signed_url(Method::PUT, &location, ttl).await;

        let url = url_result
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %storage_key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 write grant presign failed"
                );
                StorageError::PresignFailed(e.to_string())
            })?
            .to_string();

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            content_type = %content_type,
            ttl_secs = ttl.as_secs(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 write grant minted"
        );

        Ok(Grant {
            url,
            expires_at: expires_at_for(ttl),
        })
    }

    async fn mint_read_grant(&self, storage_key: &str, ttl: Duration) -> StorageResult<Grant> {
        let location = Path::from(storage_key.to_string());

        let url_result: ObjectResult<_> = self.store.signed_url(Method::GET, &location, ttl).await;

        let url = url_result
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %storage_key,
                    "S3 read grant presign failed"
                );
                StorageError::PresignFailed(e.to_string())
            })?
            .to_string();

        Ok(Grant {
            url,
            expires_at: expires_at_for(ttl),
        })
    }

    async fn delete_object(&self, storage_key: &str) -> StorageResult<()> {
        let start = std::time::Instant::now();
        let location = Path::from(storage_key.to_string());

        let result: ObjectResult<_> = self.store.delete(&location).await;

        result.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(storage_key.to_string()),
            other => {
                tracing::error!(
                    error = %other,
                    bucket = %self.bucket,
                    key = %storage_key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 delete failed"
                );
                StorageError::DeleteFailed(other.to_string())
            }
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(())
    }
}
