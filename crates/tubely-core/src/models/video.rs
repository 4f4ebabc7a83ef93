use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::storage::StorageReference;
use crate::error::AppError;

/// A video record as stored in the `videos` table.
///
/// `video_url` holds the persisted storage reference (`<bucket>,<key>`) while the
/// record is at rest, and a presigned URL once it has been signed for a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Video {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub user_id: Uuid,
}

impl Video {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Parse the persisted storage reference, if the video has one.
    pub fn storage_reference(&self) -> Result<Option<StorageReference>, AppError> {
        self.video_url
            .as_deref()
            .map(str::parse::<StorageReference>)
            .transpose()
    }

    /// Point the record at a newly uploaded object.
    pub fn set_storage_reference(&mut self, reference: &StorageReference) {
        self.video_url = Some(reference.to_string());
        self.updated_at = Utc::now();
    }
}

/// Parameters for inserting a new video record.
#[derive(Debug, Clone)]
pub struct CreateVideoParams {
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
}
