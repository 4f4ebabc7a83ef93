use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tubely_core::{AppError, CreateVideoParams, Video};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateVideoRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 5000))]
    pub description: String,
}

#[utoipa::path(
    post,
    path = "/api/videos",
    tag = "videos",
    request_body = CreateVideoRequest,
    responses(
        (status = 201, description = "Video record created", body = Video),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %user_id, operation = "create_video"))]
pub async fn create_video(
    AuthUser(user_id): AuthUser,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateVideoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Video>), HttpAppError> {
    let Json(request) = payload
        .map_err(|e| AppError::InvalidInput(format!("Invalid request body: {}", e.body_text())))?;
    request.validate().map_err(AppError::from)?;

    let video = state
        .videos
        .create_video(CreateVideoParams {
            user_id,
            title: request.title,
            description: request.description,
        })
        .await
        .map_err(|e| AppError::internal("Couldn't create video", e))?;

    tracing::info!(video_id = %video.id, "Created video record");
    Ok((StatusCode::CREATED, Json(video)))
}
