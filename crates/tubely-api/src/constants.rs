//! API-wide constants.

use std::time::Duration;

/// Prefix for all JSON API routes.
pub const API_PREFIX: &str = "/api";

/// Mount point for locally stored assets.
pub const ASSETS_PREFIX: &str = "/assets";

/// Largest accepted video upload request body (1 GiB).
pub const VIDEO_UPLOAD_LIMIT: usize = 1 << 30;

/// Multipart field carrying the video file.
pub const VIDEO_FORM_FIELD: &str = "video";

/// The only container accepted for upload.
pub const ACCEPTED_VIDEO_MEDIA_TYPE: &str = "video/mp4";

/// Lifetime of presigned GET URLs in responses.
pub const PRESIGNED_URL_TTL: Duration = Duration::from_secs(5 * 60);

/// Issuer claim on access tokens.
pub const TOKEN_ISSUER: &str = "tubely-access";
