//! Append-only run log.

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Human-readable record of each unit's outcome, one line per unit:
/// `[OK] <unit>` or `[ERR] <unit>: <message>`.
///
/// Opened in append mode so history accumulates across runs. No rotation
/// and no size bound; the workload is offline batch use.
pub struct RunLog {
    file: File,
}

impl RunLog {
    /// Open (or create) the log file at `path` in append mode.
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("cannot open run log {}", path.display()))?;
        Ok(Self { file })
    }

    /// Record a successfully processed unit.
    pub fn ok(&mut self, unit: &str) -> Result<()> {
        self.write_line(&format!("[OK] {}", unit))
    }

    /// Record a failed unit with a human-readable cause.
    pub fn err(&mut self, unit: &str, message: &str) -> Result<()> {
        self.write_line(&format!("[ERR] {}: {}", unit, message))
    }

    // Each line is written and flushed as a unit so log lines stay whole.
    fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.file, "{}", line).context("cannot write log line")?;
        self.file.flush().context("cannot flush run log")?;
        Ok(())
    }
}
