//! Object storage adapter

pub mod s3;

pub use s3::S3Storage;

use async_trait::async_trait;
use std::time::Duration;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Longest lifetime a presigned URL may have
pub const MAX_URL_LIFETIME: Duration = Duration::from_secs(7 * 24 * 3600);

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("invalid object path: {0}")]
    InvalidPath(String),
    #[error("object storage request failed: {0}")]
    Backend(BoxError),
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store a publicly readable object, returning its public URL
    async fn upload(
        &self,
        path: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError>;

    async fn delete(&self, path: &str) -> Result<(), StorageError>;

    /// Time-limited download URL (capped at [`MAX_URL_LIFETIME`])
    async fn download_url(&self, path: &str, expires_in: Duration)
    -> Result<String, StorageError>;
}
