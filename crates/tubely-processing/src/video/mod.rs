//! ffmpeg-backed video inspection and fast-start rewriting.

mod command;
mod faststart;
mod probe;

pub use faststart::{processing_path, FfmpegOptimizer};
pub use probe::{classify_display_aspect_ratio, FfprobeProbe, ProbeOutput, ProbeStream};
