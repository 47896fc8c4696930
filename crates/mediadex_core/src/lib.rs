//! Indexing pipeline and orchestration for Mediadex.
//
// High-level API for walking a folder tree, routing each file to the
// matching extraction capability, and persisting the merged index.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use rayon::prelude::*;

pub use store::{
    frame_key, FileType, IndexEntry, IndexStore, RunLog, UnitKey, INDEX_FILE, LOG_FILE,
};

pub mod config;
pub mod scan;

pub use config::MediadexConfig;
pub use scan::{scan, ScannedFile};

/// Units extracted in parallel per batch before the sequential merge.
const BATCH: usize = 16;

/// Options for configuring the indexer.
#[derive(Debug, Clone)]
pub struct IndexOptions {
    /// Directory to index; the index and log live at its top level.
    pub root: PathBuf,
    /// Seconds between sampled video frames.
    pub frame_interval: u32,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::new(),
            frame_interval: 5,
        }
    }
}

/// Extracts text for one non-video unit.
pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, kind: FileType, path: &Path) -> Result<String>;
}

/// Samples text out of a video, one frame at a time.
pub trait FrameSampler: Send + Sync {
    /// Duration of the video in whole seconds. An error means the video
    /// cannot be opened at all.
    fn probe_duration(&self, path: &Path) -> Result<u64>;

    /// Decode the frame nearest `second` and OCR it.
    fn ocr_frame(&self, path: &Path, second: u64) -> Result<String>;

    /// Sample timestamps for a video of `duration` whole seconds:
    /// `0, interval, 2*interval, ..` up to and including `duration`.
    fn sample_seconds(&self, duration: u64, interval: u32) -> Vec<u64> {
        (0..=duration).step_by(interval.max(1) as usize).collect()
    }
}

/// Events emitted during indexing for progress reporting.
#[derive(Debug)]
pub enum IndexEvent {
    /// Prior entries found at load time: (files, video frames).
    Resumed(usize, usize),
    /// One unit finished; the label matches its run-log line.
    UnitOk(String),
    /// One unit failed: label plus human-readable cause.
    UnitErr(String, String),
    Done,
}

/// Summary of an indexing run.
#[derive(Debug)]
pub struct RunSummary {
    pub new_entries: usize,
    pub total_entries: usize,
    pub unit_errors: usize,
    /// True when the run was cancelled; appended entries are still saved.
    pub interrupted: bool,
    pub index_path: PathBuf,
    pub log_path: PathBuf,
}

/// A unit that still needs processing this run.
enum Pending {
    File { kind: FileType, rel: String },
    Video { rel: String },
}

/// Outcome of one unit's extraction phase, merged sequentially.
enum UnitResult {
    File {
        kind: FileType,
        rel: String,
        outcome: Result<String, String>,
    },
    Video {
        rel: String,
        frames: Vec<(u64, Result<String, String>)>,
    },
    VideoUnreadable {
        rel: String,
        error: String,
    },
    Cancelled,
}

/// Main orchestrator for the indexing pipeline.
///
/// Pending units are extracted in order-preserving parallel batches with
/// Rayon; each batch's outcomes are then merged on a single thread, which
/// owns all store appends and log writes. The final save runs even after
/// cancellation so appended entries keep their resume guarantee.
pub struct Pipeline<E: TextExtractor, V: FrameSampler> {
    options: IndexOptions,
    extractor: Arc<E>,
    sampler: Arc<V>,
}

impl<E: TextExtractor, V: FrameSampler> Pipeline<E, V> {
    pub fn new(options: IndexOptions, extractor: E, sampler: V) -> Self {
        Self {
            options,
            extractor: Arc::new(extractor),
            sampler: Arc::new(sampler),
        }
    }

    /// Run the indexing pipeline (no progress reporting).
    pub fn run(
        &self,
        store: &mut IndexStore,
        log: &mut RunLog,
        cancel: &AtomicBool,
    ) -> Result<RunSummary> {
        self.run_with_progress(store, log, cancel, |_| ())
    }

    /// Run the indexing pipeline, reporting progress via callback.
    pub fn run_with_progress<F>(
        &self,
        store: &mut IndexStore,
        log: &mut RunLog,
        cancel: &AtomicBool,
        mut cb: F,
    ) -> Result<RunSummary>
    where
        F: FnMut(IndexEvent),
    {
        let root = &self.options.root;
        if !store.is_empty() {
            cb(IndexEvent::Resumed(store.file_count(), store.frame_count()));
        }

        let files = scan::scan(root)?;
        log::info!(
            "scan found {} candidate files under {}",
            files.len(),
            root.display()
        );

        // Pending units in scan order. Fully indexed files drop out here;
        // videos stay, since per-frame resume happens inside the unit.
        let pending: Vec<Pending> = files
            .into_iter()
            .filter_map(|f| match f.kind {
                FileType::Video => Some(Pending::Video { rel: f.rel }),
                kind => {
                    let key = UnitKey::File(kind, f.rel.clone());
                    if store.is_done(&key) {
                        None
                    } else {
                        Some(Pending::File { kind, rel: f.rel })
                    }
                }
            })
            .collect();

        let mut new_entries = 0usize;
        let mut unit_errors = 0usize;
        let mut interrupted = false;

        for batch in pending.chunks(BATCH) {
            if cancel.load(Ordering::SeqCst) {
                interrupted = true;
                break;
            }

            let results: Vec<UnitResult> = {
                let snapshot: &IndexStore = store;
                batch
                    .par_iter()
                    .map(|unit| self.process_unit(unit, snapshot, cancel))
                    .collect()
            };

            for result in results {
                match result {
                    UnitResult::File { kind, rel, outcome } => match outcome {
                        Ok(text) => {
                            store.append(IndexEntry::file(kind, rel.clone(), text));
                            new_entries += 1;
                            log.ok(&rel)?;
                            cb(IndexEvent::UnitOk(rel));
                        }
                        Err(e) => {
                            unit_errors += 1;
                            log.err(&rel, &e)?;
                            cb(IndexEvent::UnitErr(rel, e));
                        }
                    },
                    UnitResult::Video { rel, frames } => {
                        for (second, outcome) in frames {
                            let label = format!("{} at {}s", rel, second);
                            match outcome {
                                Ok(text) => {
                                    store.append(IndexEntry::frame(rel.clone(), second, text));
                                    new_entries += 1;
                                    log.ok(&label)?;
                                    cb(IndexEvent::UnitOk(label));
                                }
                                Err(e) => {
                                    unit_errors += 1;
                                    log.err(&label, &e)?;
                                    cb(IndexEvent::UnitErr(label, e));
                                }
                            }
                        }
                    }
                    UnitResult::VideoUnreadable { rel, error } => {
                        unit_errors += 1;
                        log.err(&rel, &error)?;
                        cb(IndexEvent::UnitErr(rel, error));
                    }
                    UnitResult::Cancelled => interrupted = true,
                }
            }
        }

        // Save runs even when interrupted: whatever was appended keeps
        // its resume guarantee. The prior file is replaced atomically.
        let index_path = root.join(INDEX_FILE);
        store.save(&index_path)?;
        cb(IndexEvent::Done);

        Ok(RunSummary {
            new_entries,
            total_entries: store.len(),
            unit_errors,
            interrupted,
            index_path,
            log_path: root.join(LOG_FILE),
        })
    }

    // Extraction phase of one unit. Runs on a Rayon worker; only reads
    // the store, never writes it. A failure is carried as a string so a
    // bad unit never aborts its siblings.
    fn process_unit(&self, unit: &Pending, store: &IndexStore, cancel: &AtomicBool) -> UnitResult {
        if cancel.load(Ordering::SeqCst) {
            return UnitResult::Cancelled;
        }
        match unit {
            Pending::File { kind, rel } => {
                let abs = self.options.root.join(rel);
                let outcome = self
                    .extractor
                    .extract_text(*kind, &abs)
                    .map_err(|e| format!("{:#}", e));
                UnitResult::File {
                    kind: *kind,
                    rel: rel.clone(),
                    outcome,
                }
            }
            Pending::Video { rel } => {
                let abs = self.options.root.join(rel);
                let duration = match self.sampler.probe_duration(&abs) {
                    Ok(d) => d,
                    Err(e) => {
                        return UnitResult::VideoUnreadable {
                            rel: rel.clone(),
                            error: format!("cannot open video: {:#}", e),
                        }
                    }
                };
                let mut frames = Vec::new();
                for second in self
                    .sampler
                    .sample_seconds(duration, self.options.frame_interval)
                {
                    if cancel.load(Ordering::SeqCst) {
                        break;
                    }
                    if store.is_done(&UnitKey::Frame(frame_key(rel, second))) {
                        continue;
                    }
                    let outcome = self
                        .sampler
                        .ocr_frame(&abs, second)
                        .map_err(|e| format!("{:#}", e));
                    frames.push((second, outcome));
                }
                UnitResult::Video {
                    rel: rel.clone(),
                    frames,
                }
            }
        }
    }
}
