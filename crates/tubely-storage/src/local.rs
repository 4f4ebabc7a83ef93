use crate::traits::{Storage, StorageError, StorageResult};
use crate::{StorageBackend, StorageReference};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

/// Local filesystem storage, served over HTTP from `base_url`.
///
/// "Signing" a reference just produces the public URL of the file; expiry is not
/// enforced. Intended for development only.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
    bucket: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance, creating the root directory if needed.
    ///
    /// # Arguments
    /// * `base_path` - Root directory for stored assets (e.g., "./assets")
    /// * `base_url` - Base URL the root is served under (e.g., "http://localhost:8091/assets")
    /// * `bucket` - Name recorded in storage references
    pub async fn new(
        base_path: impl Into<PathBuf>,
        base_url: String,
        bucket: String,
    ) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
            bucket,
        })
    }

    /// Map a key to a path under the root, rejecting anything that could escape it.
    fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') || key.contains('\\') {
            return Err(StorageError::InvalidKey(format!(
                "Storage key contains invalid characters: {:?}",
                key
            )));
        }
        Ok(self.base_path.join(key))
    }

    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }
}

#[async_trait]
impl Storage for LocalStorage {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn upload_file(
        &self,
        key: &str,
        path: &Path,
        _content_type: &str,
    ) -> StorageResult<StorageReference> {
        let start = std::time::Instant::now();
        let destination = self.key_to_path(key)?;

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).await?;
        }

        let size = fs::copy(path, &destination).await.map_err(|e| {
            tracing::error!(
                error = %e,
                key = %key,
                path = %destination.display(),
                "Local upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        tracing::info!(
            key = %key,
            path = %destination.display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local upload successful"
        );

        Ok(StorageReference::new(self.bucket.clone(), key))
    }

    async fn presigned_get_url(
        &self,
        reference: &StorageReference,
        _expires_in: Duration,
    ) -> StorageResult<String> {
        if reference.bucket != self.bucket {
            return Err(StorageError::InvalidKey(format!(
                "Reference names bucket {:?}, local storage serves {:?}",
                reference.bucket, self.bucket
            )));
        }
        self.key_to_path(&reference.key)?;
        Ok(self.generate_url(&reference.key))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
