//! Extraction capabilities for Mediadex.
//
// One capability per file-type tag, each with the signature
// `(absolute path) -> text or failure`. External engines (tesseract,
// pdftoppm, ffmpeg/ffprobe) run as subprocesses with explicitly
// configured binary paths; nothing here mutates the process environment.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use mediadex_core::TextExtractor;
use store::FileType;

mod epub;
mod office;
mod ocr;
mod pdf;
mod text;
mod video;

pub use ocr::ImageOcr;
pub use video::VideoSampler;

/// Advisory text recorded for legacy `.doc` files. A deliberate scope
/// limit: the unit is recorded as successful and never retried.
pub const DOC_PLACEHOLDER: &str = "[WARN] .doc not natively supported, please convert to .docx";
/// Advisory text recorded for `.azw`/`.azw3`/`.mobi` files.
pub const AZW_PLACEHOLDER: &str =
    "[WARN] AZW/MOBI not natively supported, please convert to epub/txt";

/// Locations and settings of the external engines, resolved by the caller
/// and handed in as plain configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub tesseract: PathBuf,
    pub pdftoppm: PathBuf,
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
    /// Tesseract language code.
    pub lang: String,
    /// Optional tessdata directory.
    pub tessdata: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tesseract: "tesseract".into(),
            pdftoppm: "pdftoppm".into(),
            ffmpeg: "ffmpeg".into(),
            ffprobe: "ffprobe".into(),
            lang: "eng".into(),
            tessdata: None,
        }
    }
}

/// The full set of per-type capabilities behind one closed dispatch.
pub struct ExtractorSet {
    ocr: ImageOcr,
    pdftoppm: PathBuf,
}

impl ExtractorSet {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            ocr: ImageOcr::new(config),
            pdftoppm: config.pdftoppm.clone(),
        }
    }
}

impl TextExtractor for ExtractorSet {
    /// Route one file to the capability matching its tag.
    ///
    /// The match is exhaustive, one arm per tag, so an unroutable tag
    /// cannot slip through silently. Failures propagate to the
    /// extraction-unit boundary in the pipeline.
    fn extract_text(&self, kind: FileType, path: &Path) -> Result<String> {
        match kind {
            FileType::Image => self.ocr.ocr_file(path),
            FileType::Pdf => pdf::extract(&self.pdftoppm, &self.ocr, path),
            FileType::Docx => office::extract_docx(path),
            FileType::Xlsx | FileType::Xls => office::extract_sheets(path),
            FileType::Rtf | FileType::Txt | FileType::Md => text::extract(path),
            FileType::Epub => epub::extract(path),
            FileType::Doc => Ok(DOC_PLACEHOLDER.to_string()),
            FileType::Azw => Ok(AZW_PLACEHOLDER.to_string()),
            // Videos are sampled frame by frame by the VideoSampler; one
            // reaching this dispatch is a routing bug.
            FileType::Video => bail!("video files are sampled per frame, not extracted whole"),
        }
    }
}
