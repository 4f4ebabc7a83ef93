use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use tokio::process::Command;
use tubely_core::AspectRatio;

use super::command::{run, validate_path};
use crate::error::ProcessingError;
use crate::traits::MediaProbe;

/// The subset of `ffprobe -print_format json -show_streams` output we read.
#[derive(Debug, Deserialize)]
pub struct ProbeOutput {
    #[serde(default)]
    pub streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
pub struct ProbeStream {
    pub codec_type: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub display_aspect_ratio: Option<String>,
}

impl ProbeOutput {
    /// Classify by the first stream only; an empty stream list is an error.
    pub fn aspect_ratio(&self) -> Result<AspectRatio, ProcessingError> {
        let first = self.streams.first().ok_or(ProcessingError::NoStreams)?;
        Ok(classify_display_aspect_ratio(
            first.display_aspect_ratio.as_deref(),
        ))
    }
}

/// Exact string match on ffprobe's `display_aspect_ratio`. Equivalent ratios written
/// differently (e.g. `32:18`) are not normalized and fall into `Other`.
pub fn classify_display_aspect_ratio(ratio: Option<&str>) -> AspectRatio {
    match ratio {
        Some("16:9") => AspectRatio::Landscape,
        Some("9:16") => AspectRatio::Portrait,
        _ => AspectRatio::Other,
    }
}

/// [`MediaProbe`] backed by the `ffprobe` binary.
#[derive(Debug, Clone)]
pub struct FfprobeProbe {
    ffprobe_path: String,
}

impl FfprobeProbe {
    pub fn new(ffprobe_path: impl Into<String>) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
        }
    }
}

impl Default for FfprobeProbe {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

#[async_trait]
impl MediaProbe for FfprobeProbe {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    async fn classify_aspect_ratio(&self, path: &Path) -> Result<AspectRatio, ProcessingError> {
        let start = std::time::Instant::now();
        validate_path(path)?;

        let mut command = Command::new(&self.ffprobe_path);
        command
            .args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(path);

        let output = run("ffprobe", command).await?;
        let probe: ProbeOutput = serde_json::from_slice(&output.stdout)?;
        let aspect_ratio = probe.aspect_ratio()?;

        let first = probe.streams.first();
        tracing::debug!(
            aspect_ratio = %aspect_ratio,
            stream_count = probe.streams.len(),
            codec_type = first.and_then(|s| s.codec_type.as_deref()),
            width = first.and_then(|s| s.width),
            height = first.and_then(|s| s.height),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "ffprobe classified video"
        );

        Ok(aspect_ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ProbeOutput {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_classify_display_aspect_ratio() {
        assert_eq!(
            classify_display_aspect_ratio(Some("16:9")),
            AspectRatio::Landscape
        );
        assert_eq!(
            classify_display_aspect_ratio(Some("9:16")),
            AspectRatio::Portrait
        );
        assert_eq!(classify_display_aspect_ratio(Some("4:3")), AspectRatio::Other);
        assert_eq!(
            classify_display_aspect_ratio(Some("32:18")),
            AspectRatio::Other
        );
        assert_eq!(classify_display_aspect_ratio(None), AspectRatio::Other);
    }

    #[test]
    fn test_only_first_stream_is_consulted() {
        let probe = parse(
            r#"{"streams":[
                {"index":0,"codec_type":"audio"},
                {"index":1,"codec_type":"video","width":1920,"height":1080,"display_aspect_ratio":"16:9"}
            ]}"#,
        );
        assert_eq!(probe.aspect_ratio().unwrap(), AspectRatio::Other);
    }

    #[test]
    fn test_zero_streams_is_an_error() {
        assert!(matches!(
            parse(r#"{"streams":[]}"#).aspect_ratio(),
            Err(ProcessingError::NoStreams)
        ));
        assert!(matches!(
            parse("{}").aspect_ratio(),
            Err(ProcessingError::NoStreams)
        ));
    }

    #[test]
    fn test_first_stream_fields_are_parsed() {
        let probe = parse(
            r#"{"streams":[{"index":0,"codec_type":"video","width":1080,"height":1920,
                "display_aspect_ratio":"9:16"}]}"#,
        );
        let first = &probe.streams[0];
        assert_eq!(first.codec_type.as_deref(), Some("video"));
        assert_eq!(first.width, Some(1080));
        assert_eq!(first.height, Some(1920));
        assert_eq!(probe.aspect_ratio().unwrap(), AspectRatio::Portrait);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let probe = parse(
            r#"{"streams":[{"index":0,"codec_name":"h264","profile":"High",
                "display_aspect_ratio":"9:16","disposition":{"default":1}}]}"#,
        );
        assert_eq!(probe.aspect_ratio().unwrap(), AspectRatio::Portrait);
    }

    #[cfg(unix)]
    mod with_fake_ffprobe {
        use super::super::*;
        use crate::video::test_support::fake_tool;
        use tempfile::TempDir;

        async fn classify(body: &str) -> Result<AspectRatio, ProcessingError> {
            let dir = TempDir::new().unwrap();
            let tool = fake_tool(dir.path(), "ffprobe", body);
            let input = dir.path().join("input.mp4");
            std::fs::write(&input, b"mp4").unwrap();
            FfprobeProbe::new(tool.to_string_lossy())
                .classify_aspect_ratio(&input)
                .await
        }

        #[tokio::test]
        async fn test_landscape() {
            let result = classify(
                r#"echo '{"streams":[{"index":0,"display_aspect_ratio":"16:9"}]}'"#,
            )
            .await;
            assert_eq!(result.unwrap(), AspectRatio::Landscape);
        }

        #[tokio::test]
        async fn test_non_zero_exit_includes_stderr() {
            let err = classify("echo 'moov atom not found' >&2; exit 1")
                .await
                .unwrap_err();
            match err {
                ProcessingError::ToolFailed { tool, stderr, .. } => {
                    assert_eq!(tool, "ffprobe");
                    assert_eq!(stderr, "moov atom not found");
                }
                other => panic!("expected ToolFailed, got {:?}", other),
            }
        }

        #[tokio::test]
        async fn test_unparsable_output() {
            let err = classify("echo 'not json'").await.unwrap_err();
            assert!(matches!(err, ProcessingError::InvalidOutput(_)));
        }

        #[tokio::test]
        async fn test_no_streams() {
            let err = classify(r#"echo '{"streams":[]}'"#).await.unwrap_err();
            assert!(matches!(err, ProcessingError::NoStreams));
        }
    }
}
