//! Recursive file discovery.

use anyhow::{Context, Result};
use std::path::Path;
use store::{FileType, INDEX_FILE, LOG_FILE};
use walkdir::WalkDir;

/// A discovered file: classified tag plus path relative to the scan root.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedFile {
    pub kind: FileType,
    pub rel: String,
}

/// Recursively enumerate recognized files under `root`.
///
/// Covers all regular files in the root and every subdirectory, relative
/// paths sorted lexicographically by their string form. Directories and
/// files with unrecognized extensions are skipped silently; enumeration
/// errors (unreadable root, permission failure mid-walk) are fatal for
/// the scan and propagate. The pipeline's own artifacts at the root are
/// excluded so a run never indexes its own outputs.
pub fn scan(root: &Path) -> Result<Vec<ScannedFile>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.with_context(|| format!("cannot scan {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(kind) = FileType::from_path(entry.path()) else {
            continue;
        };
        let rel = entry
            .path()
            .strip_prefix(root)
            .context("entry outside scan root")?
            .to_string_lossy()
            .into_owned();
        if rel == INDEX_FILE || rel == LOG_FILE {
            continue;
        }
        files.push(ScannedFile { kind, rel });
    }
    files.sort_by(|a, b| a.rel.cmp(&b.rel));
    Ok(files)
}
