use std::path::Path;
use std::process::{Output, Stdio};
use tokio::process::Command;

use crate::error::ProcessingError;

/// Reject paths ffmpeg tools would misread. Arguments are passed without a shell, so
/// the concern is option injection (`-...`) and line breaks, not metacharacters.
pub(super) fn validate_path(path: &Path) -> Result<(), ProcessingError> {
    let path_str = path.to_string_lossy();
    let invalid = |reason| ProcessingError::InvalidPath {
        path: path_str.to_string(),
        reason,
    };

    if path_str.is_empty() {
        return Err(invalid("path is empty"));
    }
    if path_str.starts_with('-') {
        return Err(invalid("path would be parsed as an option"));
    }
    if path_str.chars().any(|c| c == '\n' || c == '\r' || c == '\0') {
        return Err(invalid("path contains control characters"));
    }
    Ok(())
}

/// Run a tool to completion, capturing stdout and stderr.
///
/// The child is killed if the returned future is dropped, e.g. when the client
/// disconnects mid-upload.
pub(super) async fn run(
    tool: &'static str,
    mut command: Command,
) -> Result<Output, ProcessingError> {
    let output = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|source| ProcessingError::Spawn { tool, source })?;

    if !output.status.success() {
        return Err(ProcessingError::ToolFailed {
            tool,
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(output)
}
