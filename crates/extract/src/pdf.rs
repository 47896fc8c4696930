//! PDF text extraction: rasterize pages, then OCR each page image.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};

use crate::ocr::{last_stderr_line, ImageOcr};

/// Rasterization density handed to pdftoppm.
const RENDER_DPI: &str = "200";

/// Rasterize every page of `path` into a temp directory and OCR the
/// pages in page order, newline-separated.
pub fn extract(pdftoppm: &Path, ocr: &ImageOcr, path: &Path) -> Result<String> {
    let dir = tempfile::tempdir().context("cannot create temp dir for pdf pages")?;
    let prefix = dir.path().join("page");
    let output = Command::new(pdftoppm)
        .args(["-png", "-r", RENDER_DPI])
        .arg(path)
        .arg(&prefix)
        .output()
        .with_context(|| format!("cannot run {}", pdftoppm.display()))?;
    if !output.status.success() {
        bail!("pdftoppm failed: {}", last_stderr_line(&output.stderr));
    }

    let mut pages: Vec<(u32, PathBuf)> = Vec::new();
    for entry in std::fs::read_dir(dir.path()).context("cannot list rendered pages")? {
        let page_path = entry.context("cannot list rendered pages")?.path();
        if let Some(number) = page_number(&page_path) {
            pages.push((number, page_path));
        }
    }
    pages.sort_by_key(|(n, _)| *n);
    if pages.is_empty() {
        bail!("pdftoppm produced no pages");
    }

    let mut text = String::new();
    for (_, page_path) in &pages {
        text.push_str(&ocr.ocr_file(page_path)?);
        text.push('\n');
    }
    Ok(text.trim().to_string())
}

// pdftoppm names pages `<prefix>-<n>.png`, zero-padding n as needed, so
// ordering must be numeric, not lexicographic.
fn page_number(path: &Path) -> Option<u32> {
    let stem = path.file_stem()?.to_str()?;
    stem.rsplit('-').next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_numbers_parse_with_and_without_padding() {
        assert_eq!(page_number(Path::new("/t/page-1.png")), Some(1));
        assert_eq!(page_number(Path::new("/t/page-07.png")), Some(7));
        assert_eq!(page_number(Path::new("/t/page-12.png")), Some(12));
        assert_eq!(page_number(Path::new("/t/page.png")), None);
    }
}
