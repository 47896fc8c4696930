//! Configuration file handling for Mediadex.
//!
//! Loads settings from `mediadex.config.toml` with the following search order:
//! 1. Current directory
//! 2. ~/.config/mediadex/mediadex.config.toml (Linux/macOS)
//! 3. ~/.mediadex/mediadex.config.toml

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MediadexConfig {
    pub ocr: OcrConfig,
    pub video: VideoConfig,
    pub tools: ToolsConfig,
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Tesseract language code.
    pub lang: String,
    /// Optional tessdata directory handed to the engine.
    pub tessdata: Option<PathBuf>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            lang: "eng".into(),
            tessdata: None,
        }
    }
}

/// Video sampling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Seconds between sampled video frames.
    pub interval: u32,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self { interval: 5 }
    }
}

/// External engine binaries. Bare names resolve through PATH; the
/// resolved values are handed to the capability constructors rather than
/// read from the process environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub tesseract: PathBuf,
    pub pdftoppm: PathBuf,
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            tesseract: "tesseract".into(),
            pdftoppm: "pdftoppm".into(),
            ffmpeg: "ffmpeg".into(),
            ffprobe: "ffprobe".into(),
        }
    }
}

impl MediadexConfig {
    /// Config file name.
    pub const FILENAME: &'static str = "mediadex.config.toml";

    /// Load configuration from file, searching standard locations.
    /// Returns default config if no file found.
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::find_config_file() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: MediadexConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Find config file in standard locations.
    pub fn find_config_file() -> Option<PathBuf> {
        // 1. Current directory
        let current = PathBuf::from(Self::FILENAME);
        if current.exists() {
            return Some(current);
        }

        // 2. Config directory (~/.config/mediadex/ on Linux/macOS)
        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join("mediadex").join(Self::FILENAME);
            if path.exists() {
                return Some(path);
            }
        }

        // 3. Home directory fallback
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".mediadex").join(Self::FILENAME);
            if path.exists() {
                return Some(path);
            }
        }

        None
    }

    /// Generate a default config file with comments.
    pub fn generate_default_config() -> String {
        r#"# Mediadex Configuration
# Place this file at:
#   - ./mediadex.config.toml (current directory)
#   - ~/.config/mediadex/mediadex.config.toml (Linux/macOS)
#   - ~/.mediadex/mediadex.config.toml

[ocr]
# Tesseract language code
lang = "eng"

# Uncomment to point the engine at a specific tessdata directory
# tessdata = "/usr/share/tesseract-ocr/5/tessdata"

[video]
# Seconds between sampled video frames
interval = 5

[tools]
# External engine binaries; bare names resolve through PATH
tesseract = "tesseract"
pdftoppm = "pdftoppm"
ffmpeg = "ffmpeg"
ffprobe = "ffprobe"
"#
        .to_string()
    }
}
