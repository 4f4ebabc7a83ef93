//! Video upload pipeline
//!
//! The handler owns the HTTP concerns (auth, ownership, multipart parsing). Everything
//! from "the upload is on local disk" to "the object is in storage" lives here:
//! optimize → classify → derive key → upload.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use axum::extract::multipart::Field;
use axum::http::StatusCode;
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;
use tubely_core::{AppError, StorageReference};
use tubely_processing::{MediaProbe, StreamOptimizer};
use tubely_storage::{compose_key, generate_asset_name, Storage};

const TEMP_FILE_PREFIX: &str = "tubely-upload-";

/// Characters allowed in a media type token besides ASCII alphanumerics.
const TOKEN_SPECIALS: &[char] = &[
    '!', '#', '$', '%', '&', '\'', '*', '+', '-', '.', '^', '_', '`', '|', '~',
];

fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || TOKEN_SPECIALS.contains(&c))
}

/// Parse a `Content-Type` value down to its lowercased `type/subtype`.
///
/// Parameters are validated for shape and then dropped. Returns `None` for anything
/// that is not a media type.
pub fn parse_media_type(value: &str) -> Option<String> {
    let mut parts = value.split(';');
    let essence = parts.next()?.trim().to_ascii_lowercase();

    let (kind, subtype) = essence.split_once('/')?;
    if !is_token(kind) || !is_token(subtype) {
        return None;
    }

    for param in parts {
        let param = param.trim();
        if param.is_empty() {
            continue;
        }
        let (name, _) = param.split_once('=')?;
        if !is_token(name.trim()) {
            return None;
        }
    }

    Some(essence)
}

/// Stream a multipart field into a new temp file under `temp_dir`.
///
/// The returned guard deletes the file when dropped, so an early return anywhere
/// after this point cleans up.
pub async fn buffer_field_to_temp(
    mut field: Field<'_>,
    temp_dir: &Path,
) -> Result<TempPath, AppError> {
    let temp = tempfile::Builder::new()
        .prefix(TEMP_FILE_PREFIX)
        .suffix(".mp4")
        .tempfile_in(temp_dir)
        .map_err(|e| AppError::internal("Couldn't create file on server", e))?;
    let (file, path) = temp.into_parts();
    let mut file = tokio::fs::File::from_std(file);

    let mut size_bytes: u64 = 0;
    loop {
        let chunk = match field.chunk().await {
            Ok(Some(chunk)) => chunk,
            Ok(None) => break,
            Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                return Err(AppError::PayloadTooLarge(
                    "Video exceeds the upload size limit".to_string(),
                ));
            }
            Err(e) => {
                tracing::debug!(error = %e.body_text(), "Multipart stream failed");
                return Err(AppError::BadRequest("Unable to read video data".to_string()));
            }
        };
        size_bytes += chunk.len() as u64;
        file.write_all(&chunk)
            .await
            .map_err(|e| AppError::internal("Couldn't write file to disk", e))?;
    }

    file.flush()
        .await
        .map_err(|e| AppError::internal("Couldn't write file to disk", e))?;

    tracing::debug!(path = %path.display(), size_bytes, "Buffered upload to disk");
    Ok(path)
}

/// Turns a buffered upload into a stored object.
pub struct VideoUploadService {
    storage: Arc<dyn Storage>,
    probe: Arc<dyn MediaProbe>,
    optimizer: Arc<dyn StreamOptimizer>,
    temp_dir: PathBuf,
}

impl VideoUploadService {
    pub fn new(
        storage: Arc<dyn Storage>,
        probe: Arc<dyn MediaProbe>,
        optimizer: Arc<dyn StreamOptimizer>,
        temp_dir: PathBuf,
    ) -> Self {
        Self {
            storage,
            probe,
            optimizer,
            temp_dir,
        }
    }

    /// Directory new uploads are buffered into.
    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    /// Optimize, classify and upload the file at `raw`.
    ///
    /// `raw` is left for the caller to remove; the optimized copy is removed here on
    /// every path. The object is uploaded but not yet referenced by any record.
    pub async fn store(
        &self,
        raw: &Path,
        content_type: &str,
    ) -> Result<StorageReference, AppError> {
        let started = Instant::now();

        let processed = self
            .optimizer
            .optimize_for_streaming(raw)
            .await
            .map_err(|e| AppError::internal("Couldn't process video for fast start", e))?;
        let processed = TempPath::from_path(processed);

        let aspect_ratio = self
            .probe
            .classify_aspect_ratio(&processed)
            .await
            .map_err(|e| AppError::internal("Couldn't determine video aspect ratio", e))?;

        let name = generate_asset_name(content_type)
            .map_err(|e| AppError::internal("Couldn't create asset path", e))?;
        let key = compose_key(aspect_ratio, &name);

        let reference = self
            .storage
            .upload_file(&key, &processed, content_type)
            .await
            .map_err(|e| AppError::internal("Couldn't upload file to storage", e))?;

        tracing::info!(
            bucket = %reference.bucket,
            key = %reference.key,
            aspect_ratio = %aspect_ratio,
            duration_ms = started.elapsed().as_millis() as u64,
            "Stored uploaded video"
        );

        Ok(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_media_type_plain() {
        assert_eq!(parse_media_type("video/mp4").as_deref(), Some("video/mp4"));
    }

    #[test]
    fn test_parse_media_type_normalizes() {
        assert_eq!(
            parse_media_type(" Video/MP4 ; codecs=\"avc1\"").as_deref(),
            Some("video/mp4")
        );
    }

    #[test]
    fn test_parse_media_type_rejects_garbage() {
        assert_eq!(parse_media_type(""), None);
        assert_eq!(parse_media_type("video"), None);
        assert_eq!(parse_media_type("video/"), None);
        assert_eq!(parse_media_type("/mp4"), None);
        assert_eq!(parse_media_type("video/mp4/extra"), None);
        assert_eq!(parse_media_type("video/mp4; codecs"), None);
    }

    #[test]
    fn test_parse_media_type_keeps_other_types() {
        assert_eq!(
            parse_media_type("video/quicktime").as_deref(),
            Some("video/quicktime")
        );
    }
}
