use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tubely_core::{AppError, Video};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::constants::PRESIGNED_URL_TTL;
use crate::error::{ErrorResponse, HttpAppError};
use crate::services::{sign_video, sign_videos};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/videos/{video_id}",
    tag = "videos",
    params(
        ("video_id" = Uuid, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Video found", body = Video),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %user_id, video_id = %video_id, operation = "get_video"))]
pub async fn get_video(
    AuthUser(user_id): AuthUser,
    Path(video_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Video>, HttpAppError> {
    let video_id =
        Uuid::parse_str(&video_id).map_err(|_| AppError::BadRequest("Invalid ID".to_string()))?;

    let video = state
        .videos
        .get_video(video_id)
        .await
        .map_err(|e| AppError::internal("Couldn't get video", e))?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    if !video.is_owned_by(user_id) {
        return Err(
            AppError::Unauthorized("You don't have access to this resource".to_string()).into(),
        );
    }

    let video = sign_video(state.storage.as_ref(), video, PRESIGNED_URL_TTL).await?;
    Ok(Json(video))
}

#[utoipa::path(
    get,
    path = "/api/videos",
    tag = "videos",
    responses(
        (status = 200, description = "The caller's videos, newest first", body = [Video]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %user_id, operation = "list_videos"))]
pub async fn list_videos(
    AuthUser(user_id): AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Video>>, HttpAppError> {
    let videos = state
        .videos
        .list_videos_for_user(user_id)
        .await
        .map_err(|e| AppError::internal("Couldn't retrieve videos", e))?;

    let videos = sign_videos(state.storage.as_ref(), videos, PRESIGNED_URL_TTL).await?;
    Ok(Json(videos))
}
