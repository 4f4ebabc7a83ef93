//! Data models shared by the API, database and storage layers.

mod aspect_ratio;
mod storage;
mod video;

pub use aspect_ratio::AspectRatio;
pub use storage::StorageReference;
pub use video::{CreateVideoParams, Video};
