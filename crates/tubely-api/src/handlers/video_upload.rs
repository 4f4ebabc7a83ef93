use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use std::sync::Arc;
use tubely_core::{AppError, Video};
use uuid::Uuid;

use crate::auth::authenticate;
use crate::constants::{ACCEPTED_VIDEO_MEDIA_TYPE, PRESIGNED_URL_TTL, VIDEO_FORM_FIELD};
use crate::error::{ErrorResponse, HttpAppError};
use crate::services::{buffer_field_to_temp, parse_media_type, sign_video};
use crate::state::AppState;

fn form_error() -> AppError {
    AppError::BadRequest("Unable to parse form file".to_string())
}

#[utoipa::path(
    post,
    path = "/api/videos/{video_id}/upload",
    tag = "videos",
    params(
        ("video_id" = Uuid, Path, description = "Video ID")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Video uploaded; video_url is a presigned URL", body = Video),
        (status = 400, description = "Invalid ID or upload", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token, or not the owner", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(video_id = %video_id, operation = "upload_video"))]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Video>, HttpAppError> {
    let video_id =
        Uuid::parse_str(&video_id).map_err(|_| AppError::BadRequest("Invalid ID".to_string()))?;

    let user_id = authenticate(&headers, state.config.jwt_secret())?;

    // A missing record is reported like a failed lookup.
    let mut video = state
        .videos
        .get_video(video_id)
        .await
        .and_then(|video| {
            video.ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))
        })
        .map_err(|e| AppError::internal("Couldn't get requested video", e))?;

    if !video.is_owned_by(user_id) {
        return Err(
            AppError::Unauthorized("You don't have access to this resource".to_string()).into(),
        );
    }

    let mut multipart = multipart.map_err(|e| {
        tracing::debug!(error = %e, "Rejected multipart body");
        form_error()
    })?;

    let mut upload = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                return Err(AppError::PayloadTooLarge(
                    "Video exceeds the upload size limit".to_string(),
                )
                .into());
            }
            Err(e) => {
                tracing::debug!(error = %e.body_text(), "Malformed multipart body");
                return Err(form_error().into());
            }
        };

        if field.name() != Some(VIDEO_FORM_FIELD) {
            continue;
        }

        let media_type = field
            .content_type()
            .and_then(parse_media_type)
            .ok_or_else(|| AppError::BadRequest("Unable to parse media type".to_string()))?;
        if media_type != ACCEPTED_VIDEO_MEDIA_TYPE {
            return Err(AppError::BadRequest("Wrong Content-Type".to_string()).into());
        }

        let raw = buffer_field_to_temp(field, state.upload.temp_dir()).await?;
        upload = Some((raw, media_type));
        break;
    }
    let (raw, media_type) = upload.ok_or_else(form_error)?;

    let reference = state.upload.store(&raw, &media_type).await?;
    drop(raw);

    video.set_storage_reference(&reference);
    let video = state
        .videos
        .update_video(&video)
        .await
        .map_err(|e| {
            tracing::error!(
                bucket = %reference.bucket,
                key = %reference.key,
                "Uploaded object is not referenced by any video"
            );
            AppError::internal("Couldn't update video", e)
        })?;

    let video = sign_video(state.storage.as_ref(), video, PRESIGNED_URL_TTL)
        .await
        .map_err(|e| AppError::internal("Couldn't sign video", e))?;

    Ok(Json(video))
}
