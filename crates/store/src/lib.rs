//! Durable index storage for Mediadex.
//!
//! The persisted `index.json` is the system's only durable state and the
//! contract the companion search UI reads: a pretty-printed JSON array of
//! entries, UTF-8 with non-ASCII preserved, append-only across runs.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;

pub mod runlog;
pub use runlog::RunLog;

/// File name of the persisted index, relative to the indexed root.
pub const INDEX_FILE: &str = "index.json";
/// File name of the run log, relative to the indexed root.
pub const LOG_FILE: &str = "ocr_log.txt";

/// File-type tag assigned by extension lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Image,
    Video,
    Pdf,
    Docx,
    Doc,
    Xlsx,
    Xls,
    Rtf,
    Txt,
    Md,
    Epub,
    Azw,
}

impl FileType {
    pub const ALL: [FileType; 12] = [
        FileType::Image,
        FileType::Video,
        FileType::Pdf,
        FileType::Docx,
        FileType::Doc,
        FileType::Xlsx,
        FileType::Xls,
        FileType::Rtf,
        FileType::Txt,
        FileType::Md,
        FileType::Epub,
        FileType::Azw,
    ];

    /// Extensions mapped to this tag (lowercase, without the dot).
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            FileType::Image => &["png", "jpg", "jpeg", "bmp", "tif", "tiff"],
            FileType::Video => &["mp4", "avi", "mov", "mkv", "wmv", "m4v", "flv"],
            FileType::Pdf => &["pdf"],
            FileType::Docx => &["docx"],
            FileType::Doc => &["doc"],
            FileType::Xlsx => &["xlsx"],
            FileType::Xls => &["xls"],
            FileType::Rtf => &["rtf"],
            FileType::Txt => &["txt"],
            FileType::Md => &["md"],
            FileType::Epub => &["epub"],
            FileType::Azw => &["azw", "azw3", "mobi"],
        }
    }

    /// Classify a file by its extension, case-insensitive.
    /// Returns `None` for unrecognized extensions; such files are excluded
    /// from processing entirely.
    pub fn from_path(path: &Path) -> Option<FileType> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        FileType::ALL
            .iter()
            .copied()
            .find(|t| t.extensions().contains(&ext.as_str()))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileType::Image => "image",
            FileType::Video => "video",
            FileType::Pdf => "pdf",
            FileType::Docx => "docx",
            FileType::Doc => "doc",
            FileType::Xlsx => "xlsx",
            FileType::Xls => "xls",
            FileType::Rtf => "rtf",
            FileType::Txt => "txt",
            FileType::Md => "md",
            FileType::Epub => "epub",
            FileType::Azw => "azw",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a sampled video frame: `<relative path>|<second>`.
pub fn frame_key(filename: &str, second: u64) -> String {
    format!("{}|{}", filename, second)
}

/// One processed unit of content: a whole file, or one sampled video frame.
///
/// Entries are created once, never mutated, and persist for the life of the
/// index file. `text` is always present; an empty string is valid and
/// distinct from "not yet processed".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    #[serde(rename = "type")]
    pub kind: FileType,
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_id: Option<String>,
    pub text: String,
}

impl IndexEntry {
    /// Entry for a whole file.
    pub fn file(kind: FileType, filename: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind,
            filename: filename.into(),
            second: None,
            frame_id: None,
            text: text.into(),
        }
    }

    /// Entry for one sampled video frame.
    pub fn frame(filename: impl Into<String>, second: u64, text: impl Into<String>) -> Self {
        let filename = filename.into();
        let frame_id = frame_key(&filename, second);
        Self {
            kind: FileType::Video,
            filename,
            second: Some(second),
            frame_id: Some(frame_id),
            text: text.into(),
        }
    }

    /// The identity key deciding whether this unit has been processed.
    pub fn key(&self) -> UnitKey {
        match (&self.frame_id, self.kind) {
            (Some(id), FileType::Video) => UnitKey::Frame(id.clone()),
            _ => UnitKey::File(self.kind, self.filename.clone()),
        }
    }
}

/// Identity of a unit, used for resume/dedup membership checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UnitKey {
    /// `(type, relative path)` for non-video units.
    File(FileType, String),
    /// `frame_id` for video frames.
    Frame(String),
}

/// The durable record of all previously processed units.
///
/// Loaded once at run start, grown in memory during the run, serialized
/// once at run end. The membership set is built once at load time so
/// `is_done` stays O(1) at scale.
#[derive(Debug, Default)]
pub struct IndexStore {
    entries: Vec<IndexEntry>,
    done: HashSet<UnitKey>,
}

impl IndexStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the persisted index, or start empty when no file exists.
    ///
    /// A present-but-malformed file is an error: silently discarding prior
    /// work would be worse than failing loudly.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path)
            .with_context(|| format!("cannot read index file {}", path.display()))?;
        let entries: Vec<IndexEntry> = serde_json::from_str(&data)
            .with_context(|| format!("malformed index file {}", path.display()))?;
        let done = entries.iter().map(IndexEntry::key).collect();
        Ok(Self { entries, done })
    }

    /// Whether a unit with this identity key has already been processed.
    pub fn is_done(&self, key: &UnitKey) -> bool {
        self.done.contains(key)
    }

    /// Append one entry to the sequence and the membership set.
    ///
    /// Callers must check `is_done` before producing the unit; the store
    /// never deduplicates retroactively.
    pub fn append(&mut self, entry: IndexEntry) {
        self.done.insert(entry.key());
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of non-video entries.
    pub fn file_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.kind != FileType::Video)
            .count()
    }

    /// Number of video frame entries.
    pub fn frame_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.kind == FileType::Video)
            .count()
    }

    /// Serialize the full sequence and atomically replace the index file.
    ///
    /// The JSON is written to a temporary file in the same directory and
    /// renamed over the target, so a crash mid-save never corrupts the
    /// previously persisted index.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.entries)
            .context("cannot serialize index entries")?;
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("cannot create temp file in {}", dir.display()))?;
        tmp.write_all(json.as_bytes())
            .context("cannot write index contents")?;
        tmp.persist(path)
            .map_err(|e| e.error)
            .with_context(|| format!("cannot replace index file {}", path.display()))?;
        Ok(())
    }
}
