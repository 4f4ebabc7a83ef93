//! Rewrites persisted storage references into short-lived GET URLs.

use std::time::Duration;

use tubely_core::{AppError, Video};
use tubely_storage::Storage;

/// Replace `video_url` with a presigned URL valid for `ttl`.
///
/// Records without a reference pass through untouched. A reference that is not
/// `bucket,key` is reported as data corruption.
pub async fn sign_video(
    storage: &dyn Storage,
    mut video: Video,
    ttl: Duration,
) -> Result<Video, AppError> {
    let Some(reference) = video.storage_reference()? else {
        return Ok(video);
    };

    let url = storage
        .presigned_get_url(&reference, ttl)
        .await
        .map_err(|e| AppError::Storage(e.to_string()))?;

    video.video_url = Some(url);
    Ok(video)
}

pub async fn sign_videos(
    storage: &dyn Storage,
    videos: Vec<Video>,
    ttl: Duration,
) -> Result<Vec<Video>, AppError> {
    let mut signed = Vec::with_capacity(videos.len());
    for video in videos {
        signed.push(sign_video(storage, video, ttl).await?);
    }
    Ok(signed)
}
