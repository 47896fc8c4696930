//! Plain-text family extraction (txt, md, rtf).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Best-effort text decode: invalid byte sequences are tolerated and
/// replaced rather than failing the unit, the result trimmed.
pub fn extract(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).trim().to_string())
}
