//! Request-independent business logic used by the handlers.

pub mod signing;
pub mod upload;

pub use signing::{sign_video, sign_videos};
pub use upload::{buffer_field_to_temp, parse_media_type, VideoUploadService};
