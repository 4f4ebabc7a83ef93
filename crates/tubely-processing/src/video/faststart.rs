use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use super::command::{run, validate_path};
use crate::error::ProcessingError;
use crate::traits::StreamOptimizer;

const PROCESSING_SUFFIX: &str = ".processing";

/// Sibling path the optimized copy is written to: `<original>.processing`.
pub fn processing_path(path: &Path) -> PathBuf {
    let mut processed: OsString = path.as_os_str().to_owned();
    processed.push(PROCESSING_SUFFIX);
    PathBuf::from(processed)
}

/// [`StreamOptimizer`] that remuxes with `ffmpeg -movflags faststart` (stream copy,
/// no re-encoding) so the `moov` atom sits at the head of the file.
#[derive(Debug, Clone)]
pub struct FfmpegOptimizer {
    ffmpeg_path: String,
}

impl FfmpegOptimizer {
    pub fn new(ffmpeg_path: impl Into<String>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }

    async fn remux(&self, input: &Path, output: &Path) -> Result<(), ProcessingError> {
        let mut command = Command::new(&self.ffmpeg_path);
        command
            .arg("-y")
            .arg("-i")
            .arg(input)
            .args(["-c", "copy", "-movflags", "faststart", "-f", "mp4"])
            .arg(output);
        run("ffmpeg", command).await?;

        let metadata =
            tokio::fs::metadata(output)
                .await
                .map_err(|source| ProcessingError::OutputMissing {
                    path: output.display().to_string(),
                    source,
                })?;
        if metadata.len() == 0 {
            return Err(ProcessingError::EmptyOutput(output.display().to_string()));
        }
        Ok(())
    }
}

impl Default for FfmpegOptimizer {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

#[async_trait]
impl StreamOptimizer for FfmpegOptimizer {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "faststart"
    ))]
    async fn optimize_for_streaming(&self, path: &Path) -> Result<PathBuf, ProcessingError> {
        let start = std::time::Instant::now();
        validate_path(path)?;
        let output = processing_path(path);

        if let Err(e) = self.remux(path, &output).await {
            // ffmpeg may leave a partial file behind; the caller only owns a successful output.
            if let Err(remove_err) = tokio::fs::remove_file(&output).await {
                if remove_err.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(
                        error = %remove_err,
                        path = %output.display(),
                        "Failed to remove partial ffmpeg output"
                    );
                }
            }
            return Err(e);
        }

        tracing::debug!(
            output = %output.display(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "ffmpeg faststart complete"
        );

        Ok(output)
    }
}
