//! Tesseract OCR behind a subprocess boundary.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};

use crate::EngineConfig;

/// OCR capability for whole images and in-memory frames.
///
/// Invokes the configured tesseract binary; the engine itself is an
/// external black box with a text-in/text-out contract.
#[derive(Debug, Clone)]
pub struct ImageOcr {
    tesseract: PathBuf,
    lang: String,
    tessdata: Option<PathBuf>,
}

impl ImageOcr {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            tesseract: config.tesseract.clone(),
            lang: config.lang.clone(),
            tessdata: config.tessdata.clone(),
        }
    }

    /// Whether the configured tesseract binary can be invoked.
    pub fn is_available(&self) -> bool {
        Command::new(&self.tesseract)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.tesseract);
        if let Some(dir) = &self.tessdata {
            cmd.arg("--tessdata-dir").arg(dir);
        }
        cmd
    }

    /// OCR an image file on disk.
    pub fn ocr_file(&self, path: &Path) -> Result<String> {
        let output = self
            .command()
            .arg(path)
            .arg("stdout")
            .args(["-l", &self.lang])
            .output()
            .with_context(|| format!("cannot run {}", self.tesseract.display()))?;
        if !output.status.success() {
            bail!("tesseract failed: {}", last_stderr_line(&output.stderr));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// OCR an encoded image held in memory (a decoded video frame).
    pub fn ocr_bytes(&self, image: &[u8]) -> Result<String> {
        let mut child = self
            .command()
            .arg("stdin")
            .arg("stdout")
            .args(["-l", &self.lang])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("cannot run {}", self.tesseract.display()))?;
        child
            .stdin
            .take()
            .context("tesseract stdin unavailable")?
            .write_all(image)
            .context("cannot stream image to tesseract")?;
        let output = child
            .wait_with_output()
            .context("tesseract did not finish")?;
        if !output.status.success() {
            bail!("tesseract failed: {}", last_stderr_line(&output.stderr));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

// Engines print their real complaint last.
pub(crate) fn last_stderr_line(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    text.lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("unknown error")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_stderr_line_picks_final_nonempty() {
        let stderr = b"warning: something\nError: real cause\n\n";
        assert_eq!(last_stderr_line(stderr), "Error: real cause");
        assert_eq!(last_stderr_line(b""), "unknown error");
    }

    #[test]
    fn missing_binary_reports_unavailable() {
        let config = EngineConfig {
            tesseract: "definitely-not-a-real-binary".into(),
            ..EngineConfig::default()
        };
        assert!(!ImageOcr::new(&config).is_available());
    }
}
