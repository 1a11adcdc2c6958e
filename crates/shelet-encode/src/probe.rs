//! Source video probing via ffprobe.

use std::path::Path;
use std::process::Command;

use serde::{Deserialize, Serialize};

use shelet_core::{SheletError, SheletResult};

/// What the planner needs to know about a source clip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceInfo {
    pub width: u32,
    pub height: u32,
    /// Duration in seconds.
    pub duration: f64,
    pub has_audio: bool,
}

/// FFprobe JSON output format.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
    width: Option<u32>,
    height: Option<u32>,
}

/// Probe a source file with one blocking ffprobe invocation.
pub fn probe_source(path: &Path) -> SheletResult<SourceInfo> {
    if !path.exists() {
        return Err(SheletError::asset("source video not found", path));
    }

    let ffprobe = which::which("ffprobe")
        .map_err(|_| SheletError::Encode("ffprobe not found in PATH".to_string()))?;

    let output = Command::new(ffprobe)
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()?;

    if !output.status.success() {
        return Err(SheletError::Encode(format!(
            "ffprobe failed with status {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr)
        )));
    }

    let probe: FfprobeOutput = serde_json::from_slice(&output.stdout)?;

    let video = probe
        .streams
        .iter()
        .find(|s| s.codec_type == "video")
        .ok_or_else(|| SheletError::Encode("no video stream in source".to_string()))?;

    let width = video.width.unwrap_or(0);
    let height = video.height.unwrap_or(0);
    if width == 0 || height == 0 {
        return Err(SheletError::Encode(
            "source video reports zero dimensions".to_string(),
        ));
    }

    let duration = probe
        .format
        .duration
        .as_deref()
        .and_then(|d| d.parse::<f64>().ok())
        .unwrap_or(0.0);

    let has_audio = probe.streams.iter().any(|s| s.codec_type == "audio");

    let info = SourceInfo {
        width,
        height,
        duration,
        has_audio,
    };
    tracing::debug!(?info, source = %path.display(), "probed source");
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_missing_file_is_asset_error() {
        let result = probe_source(Path::new("/nonexistent/clip.mp4"));
        assert!(matches!(result, Err(SheletError::Asset { .. })));
    }

    #[test]
    fn test_ffprobe_json_parses() {
        let json = r#"{
            "streams": [
                {"codec_type": "video", "width": 1920, "height": 1080},
                {"codec_type": "audio"}
            ],
            "format": {"duration": "12.48"}
        }"#;
        let parsed: FfprobeOutput = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.streams.len(), 2);
        assert_eq!(parsed.streams[0].width, Some(1920));
        assert_eq!(parsed.format.duration.as_deref(), Some("12.48"));
    }
}
