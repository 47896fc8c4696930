//! Video temporal sampling: decode frames at fixed intervals, OCR each.
//!
//! ffprobe reports the video's shape; ffmpeg extracts single frames as
//! PNG to stdout. Both run as subprocesses with configured binary paths.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};

use crate::ocr::{last_stderr_line, ImageOcr};
use crate::EngineConfig;
use mediadex_core::FrameSampler;

pub struct VideoSampler {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
    ocr: ImageOcr,
}

impl VideoSampler {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            ffmpeg: config.ffmpeg.clone(),
            ffprobe: config.ffprobe.clone(),
            ocr: ImageOcr::new(config),
        }
    }

    /// Whether both configured ffmpeg binaries can be invoked.
    pub fn is_available(&self) -> bool {
        let runs = |bin: &Path| {
            Command::new(bin)
                .arg("-version")
                .output()
                .map(|o| o.status.success())
                .unwrap_or(false)
        };
        runs(&self.ffmpeg) && runs(&self.ffprobe)
    }

    // Fetch the frame nearest `second` as PNG bytes.
    fn grab_frame(&self, path: &Path, second: u64) -> Result<Vec<u8>> {
        let output = Command::new(&self.ffmpeg)
            .args(["-v", "error", "-ss"])
            .arg(second.to_string())
            .arg("-i")
            .arg(path)
            .args(["-frames:v", "1", "-f", "image2pipe", "-vcodec", "png", "-"])
            .output()
            .with_context(|| format!("cannot run {}", self.ffmpeg.display()))?;
        if !output.status.success() {
            bail!("ffmpeg failed: {}", last_stderr_line(&output.stderr));
        }
        if output.stdout.is_empty() {
            bail!("no frame decoded at {}s", second);
        }
        Ok(output.stdout)
    }
}

impl FrameSampler for VideoSampler {
    /// Duration in whole seconds, derived as frame count / frame rate.
    ///
    /// 0 when the frame rate is unreadable or zero, which yields a single
    /// sample at 0. When the stream reports no frame count (common for
    /// MKV) the container duration is used instead.
    fn probe_duration(&self, path: &Path) -> Result<u64> {
        let output = Command::new(&self.ffprobe)
            .args([
                "-v",
                "error",
                "-select_streams",
                "v:0",
                "-show_entries",
                "stream=r_frame_rate,nb_frames",
                "-show_entries",
                "format=duration",
                "-of",
                "json",
            ])
            .arg(path)
            .output()
            .with_context(|| format!("cannot run {}", self.ffprobe.display()))?;
        if !output.status.success() {
            bail!("ffprobe failed: {}", last_stderr_line(&output.stderr));
        }
        let data: serde_json::Value =
            serde_json::from_slice(&output.stdout).context("cannot parse ffprobe output")?;
        let stream = data
            .get("streams")
            .and_then(|s| s.get(0))
            .context("no video stream")?;

        let fps = stream
            .get("r_frame_rate")
            .and_then(|v| v.as_str())
            .and_then(parse_fps_fraction)
            .unwrap_or(0.0);
        let frames = stream
            .get("nb_frames")
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse::<u64>().ok());
        let container = data
            .get("format")
            .and_then(|f| f.get("duration"))
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse::<f64>().ok());

        let duration = if fps <= 0.0 {
            0.0
        } else {
            match frames {
                Some(n) => n as f64 / fps,
                None => container.unwrap_or(0.0),
            }
        };
        log::debug!(
            "{}: fps {:.3}, duration {:.1}s",
            path.display(),
            fps,
            duration
        );
        Ok(duration.max(0.0) as u64)
    }

    fn ocr_frame(&self, path: &Path, second: u64) -> Result<String> {
        let png = self.grab_frame(path, second)?;
        // ffmpeg can exit zero with truncated output near end of stream;
        // a frame that fails to decode is an error for this timestamp only.
        image::load_from_memory(&png)
            .with_context(|| format!("frame at {}s did not decode", second))?;
        self.ocr.ocr_bytes(&png)
    }
}

/// Parse an ffprobe rate fraction like `30000/1001`.
fn parse_fps_fraction(raw: &str) -> Option<f64> {
    match raw.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.parse().ok()?;
            let den: f64 = den.parse().ok()?;
            if den == 0.0 {
                None
            } else {
                Some(num / den)
            }
        }
        None => raw.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_fractions_parse() {
        assert_eq!(parse_fps_fraction("25/1"), Some(25.0));
        let ntsc = parse_fps_fraction("30000/1001").unwrap();
        assert!((ntsc - 29.97).abs() < 0.01);
        assert_eq!(parse_fps_fraction("0/0"), None);
        assert_eq!(parse_fps_fraction("24"), Some(24.0));
        assert_eq!(parse_fps_fraction("garbage"), None);
    }

    #[test]
    fn sample_grid_covers_duration_inclusively() {
        let sampler = VideoSampler::new(&EngineConfig::default());
        assert_eq!(sampler.sample_seconds(12, 5), vec![0, 5, 10]);
        assert_eq!(sampler.sample_seconds(10, 5), vec![0, 5, 10]);
        assert_eq!(sampler.sample_seconds(0, 5), vec![0]);
        // A zero interval cannot loop forever.
        assert_eq!(sampler.sample_seconds(2, 0), vec![0, 1, 2]);
    }
}
