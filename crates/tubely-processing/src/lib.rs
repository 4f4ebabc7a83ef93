//! Tubely Processing Library
//!
//! Media inspection and rewriting for uploaded videos. The upload pipeline depends
//! only on the [`MediaProbe`] and [`StreamOptimizer`] traits; the ffmpeg-backed
//! implementations live in [`video`].

pub mod error;
pub mod traits;
#[cfg(feature = "video")]
pub mod video;

pub use error::ProcessingError;
pub use traits::{MediaProbe, StreamOptimizer};
#[cfg(feature = "video")]
pub use video::{classify_display_aspect_ratio, FfmpegOptimizer, FfprobeProbe};
