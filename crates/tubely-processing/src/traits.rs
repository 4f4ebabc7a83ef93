use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tubely_core::AspectRatio;

use crate::error::ProcessingError;

/// Inspects a media file and buckets it by display aspect ratio.
#[async_trait]
pub trait MediaProbe: Send + Sync {
    async fn classify_aspect_ratio(&self, path: &Path) -> Result<AspectRatio, ProcessingError>;
}

/// Rewrites a video so it can start playing before it is fully downloaded.
#[async_trait]
pub trait StreamOptimizer: Send + Sync {
    /// Returns the path of the rewritten copy. The input is left in place and the
    /// caller owns cleanup of both files.
    async fn optimize_for_streaming(&self, path: &Path) -> Result<PathBuf, ProcessingError>;
}
