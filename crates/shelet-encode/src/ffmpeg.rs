//! The external transcoding engine invocation.
//!
//! One blocking ffmpeg call per render: two inputs (source video, overlay
//! artifact), the serialized filter graph, and explicit codec parameters.
//! No retries and no internal timeout — cancellation is the caller's
//! responsibility.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use shelet_core::{EngineConfig, SheletError, SheletResult};

use crate::graph::{build_graph, AUDIO_OUT, VIDEO_OUT};
use crate::layout::LayoutPlan;
use crate::probe::SourceInfo;

/// Runs the assembled filter graph through ffmpeg.
pub struct Transcoder<'a> {
    cfg: &'a EngineConfig,
}

impl<'a> Transcoder<'a> {
    pub fn new(cfg: &'a EngineConfig) -> Self {
        Self { cfg }
    }

    /// Check if ffmpeg is available on the system.
    pub fn is_available() -> bool {
        which::which("ffmpeg").is_ok()
    }

    /// Deterministic output path: `final_<input-basename>` in the output dir.
    pub fn output_path_for(&self, source: &Path) -> PathBuf {
        let base = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "clip.mp4".to_string());
        self.cfg.encoder.output_dir.join(format!("final_{}", base))
    }

    /// Build the graph for `plan` and submit the render.
    pub fn run(
        &self,
        source: &Path,
        overlay: &Path,
        plan: &LayoutPlan,
        info: &SourceInfo,
    ) -> SheletResult<PathBuf> {
        let ffmpeg = which::which("ffmpeg").map_err(|_| {
            SheletError::Encode(
                "ffmpeg not found in PATH. Install FFmpeg: https://ffmpeg.org/download.html"
                    .to_string(),
            )
        })?;

        let graph = build_graph(plan, self.cfg, info.has_audio)?;
        let expression = graph.serialize();

        std::fs::create_dir_all(&self.cfg.encoder.output_dir)?;
        let output_path = self.output_path_for(source);

        let mut cmd = Command::new(ffmpeg);
        cmd.arg("-i")
            .arg(source)
            .arg("-i")
            .arg(overlay)
            .arg("-filter_complex")
            .arg(&expression)
            .arg("-map")
            .arg(format!("[{}]", VIDEO_OUT));
        if info.has_audio {
            cmd.arg("-map").arg(format!("[{}]", AUDIO_OUT));
            cmd.args(["-c:a", "aac"]);
        }
        cmd.args(["-c:v", "libx264"])
            .arg("-preset")
            .arg(&self.cfg.encoder.preset)
            .arg("-b:v")
            .arg(&self.cfg.encoder.video_bitrate)
            .arg("-pix_fmt")
            .arg(&self.cfg.encoder.pixel_format)
            .args(["-movflags", "+faststart"])
            .args(["-map_metadata", "-1"])
            .arg("-y")
            .arg(&output_path);

        tracing::info!(
            source = %source.display(),
            output = %output_path.display(),
            mode = %plan.mode,
            "submitting render to ffmpeg"
        );
        tracing::debug!(filter_complex = %expression);

        let output = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| SheletError::Encode(format!("failed to start ffmpeg: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SheletError::Encode(format!(
                "ffmpeg failed with status {}: {}",
                output.status, stderr
            )));
        }

        tracing::info!(output = %output_path.display(), "render complete");
        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_availability_check_does_not_panic() {
        let _ = Transcoder::is_available();
    }

    #[test]
    fn test_output_path_derivation() {
        let cfg = EngineConfig::default();
        let t = Transcoder::new(&cfg);
        let out = t.output_path_for(Path::new("/downloads/clip abc.mp4"));
        assert_eq!(out, PathBuf::from("output/final_clip abc.mp4"));
    }
}
