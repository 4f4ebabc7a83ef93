use std::process::ExitStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("Invalid media path {path}: {reason}")]
    InvalidPath { path: String, reason: &'static str },

    #[error("Failed to execute {tool}: {source}")]
    Spawn {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        tool: &'static str,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Could not parse ffprobe output: {0}")]
    InvalidOutput(#[from] serde_json::Error),

    #[error("No video streams found")]
    NoStreams,

    #[error("Could not stat processed file {path}: {source}")]
    OutputMissing {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Processed file is empty: {0}")]
    EmptyOutput(String),
}
