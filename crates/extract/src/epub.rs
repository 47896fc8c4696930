//! EPUB extraction: text of every document item in the archive.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

/// Column width handed to the HTML renderer.
const RENDER_WIDTH: usize = 120;

/// Concatenate the text of every HTML/XHTML item in archive order,
/// markup stripped.
pub fn extract(path: &Path) -> Result<String> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let mut archive = zip::ZipArchive::new(file).context("not an epub archive")?;
    let mut out = String::new();
    for i in 0..archive.len() {
        let mut item = archive.by_index(i).context("cannot read epub item")?;
        if !is_document(item.name()) {
            continue;
        }
        let mut html = Vec::new();
        item.read_to_end(&mut html).context("cannot read epub item")?;
        let rendered = html2text::from_read(html.as_slice(), RENDER_WIDTH)
            .context("cannot render epub item")?;
        out.push_str(&rendered);
        out.push('\n');
    }
    Ok(out.trim().to_string())
}

// Document-type items are the HTML/XHTML payloads of the book; styles,
// images, and packaging metadata are skipped.
fn is_document(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.ends_with(".xhtml") || lower.ends_with(".html") || lower.ends_with(".htm")
}
