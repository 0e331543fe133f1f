use super::storage_repository::StorageRepository;
use crate::infrastructure::config::StorageConfig;
use async_trait::async_trait;
use aws_sdk_s3::{
    config::{retry::RetryConfig, BehaviorVersion, Credentials, Region},
    primitives::ByteStream,
    Client as S3Client,
};
use std::sync::Arc;

/// S3-compatible implementation of the storage repository
pub struct S3StorageRepository {
    s3_client: Arc<S3Client>,
    endpoint: String,
    bucket: String,
}

impl S3StorageRepository {
    pub fn new(s3_client: Arc<S3Client>, endpoint: String, bucket: String) -> Self {
        Self {
            s3_client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            bucket,
        }
    }

    /// Build a client for the configured endpoint with static credentials.
    ///
    /// SDK retries are disabled: a failed upload falls back to inline delivery
    /// instead of being repeated.
    pub async fn from_config(storage: &StorageConfig) -> Self {
        let credentials = Credentials::new(
            storage.access_key_id.clone(),
            storage.secret_access_key.clone(),
            None,
            None,
            "r2-static",
        );

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(storage.region.clone()))
            .endpoint_url(storage.endpoint.clone())
            .credentials_provider(credentials)
            .retry_config(RetryConfig::disabled())
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();

        tracing::info!(
            endpoint = %storage.endpoint,
            bucket = %storage.bucket,
            region = %storage.region,
            "S3 client configured"
        );

        Self::new(
            Arc::new(S3Client::from_conf(s3_config)),
            storage.endpoint.clone(),
            storage.bucket.clone(),
        )
    }

    pub fn object_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.endpoint, self.bucket, key)
    }
}

#[async_trait]
impl StorageRepository for S3StorageRepository {
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<String, String> {
        let size = body.len();
        let start_time = std::time::Instant::now();

        self.s3_client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = ?e,
                    error_display = %e,
                    bucket = %self.bucket,
                    key = key,
                    "S3 put_object failed"
                );
                format!("S3 error: {}", e)
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = key,
            size_bytes = size,
            latency_ms = start_time.elapsed().as_millis(),
            "Object uploaded"
        );

        Ok(self.object_url(key))
    }
}
