//! Storage abstraction trait
//!
//! Every backend implements [`Storage`]; the upload pipeline and the URL signer only
//! ever see `Arc<dyn Storage>`.

use crate::{StorageBackend, StorageReference};
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Presign failed: {0}")]
    PresignFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[async_trait]
pub trait Storage: Send + Sync {
    /// Bucket recorded in the references this backend hands out.
    fn bucket(&self) -> &str;

    /// Stream a local file to `key`, tagged with `content_type`.
    async fn upload_file(
        &self,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> StorageResult<StorageReference>;

    /// Generate a time-limited GET URL for a stored object.
    ///
    /// The reference may name a bucket other than [`Storage::bucket`] when it was
    /// written under an earlier configuration.
    async fn presigned_get_url(
        &self,
        reference: &StorageReference,
        expires_in: Duration,
    ) -> StorageResult<String>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
