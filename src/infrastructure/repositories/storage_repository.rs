use async_trait::async_trait;

/// Object storage for finished audio.
/// Abstracts the bucket provider (Cloudflare R2, AWS S3, MinIO, ...)
#[async_trait]
pub trait StorageRepository: Send + Sync {
    /// Store `body` under `key`
    ///
    /// Returns the object's URL on the storage endpoint
    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str)
        -> Result<String, String>;
}
