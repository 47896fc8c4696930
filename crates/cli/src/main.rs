//! CLI entrypoint for Mediadex.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use extract::{EngineConfig, ExtractorSet, VideoSampler};
use mediadex_core::{IndexEvent, IndexOptions, MediadexConfig, Pipeline, RunSummary};
use store::{FileType, IndexStore, RunLog, INDEX_FILE, LOG_FILE};

#[derive(Parser)]
#[command(name = "mediadex")]
#[command(about = "Mediadex: incremental text index over mixed-media folders", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index a directory
    Index {
        /// Folder to index; the index and log are written at its top level
        path: String,
        /// Tesseract language code (default: eng)
        #[arg(long)]
        lang: Option<String>,
        /// Seconds between sampled video frames (default: 5)
        #[arg(long)]
        interval: Option<u32>,
        /// Use a specific config file instead of the search path
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Show index status for a directory
    Status { path: String },
    /// Print the default configuration template
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Index {
            path,
            lang,
            interval,
            config,
        } => run_index(path, lang, interval, config).await,
        Commands::Status { path } => show_status(&path),
        Commands::Config => {
            print!("{}", MediadexConfig::generate_default_config());
            Ok(())
        }
    }
}

fn expand_root(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

async fn run_index(
    path: String,
    lang: Option<String>,
    interval: Option<u32>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let root = expand_root(&path);
    if !root.is_dir() {
        bail!("input root {} is not a readable directory", root.display());
    }

    let mut config = match &config_path {
        Some(p) => MediadexConfig::load_from(p)
            .with_context(|| format!("cannot load config {}", p.display()))?,
        None => MediadexConfig::load()?,
    };
    if let Some(lang) = lang {
        config.ocr.lang = lang;
    }
    if let Some(interval) = interval {
        config.video.interval = interval;
    }
    log::info!(
        "ocr language {}, frame interval {}s",
        config.ocr.lang,
        config.video.interval
    );

    let engines = EngineConfig {
        tesseract: config.tools.tesseract.clone(),
        pdftoppm: config.tools.pdftoppm.clone(),
        ffmpeg: config.tools.ffmpeg.clone(),
        ffprobe: config.tools.ffprobe.clone(),
        lang: config.ocr.lang.clone(),
        tessdata: config.ocr.tessdata.clone(),
    };
    let options = IndexOptions {
        root: root.clone(),
        frame_interval: config.video.interval,
    };

    // Ctrl-C asks the pipeline to stop between units; the index is still
    // saved so progress made this run survives.
    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("interrupt received, finishing current units and saving");
                cancel.store(true, Ordering::SeqCst);
            }
        });
    }

    let summary = tokio::task::spawn_blocking(move || -> Result<RunSummary> {
        let mut store = IndexStore::load(&root.join(INDEX_FILE))?;
        let mut log = RunLog::open(&root.join(LOG_FILE))?;
        let pipeline = Pipeline::new(
            options,
            ExtractorSet::new(&engines),
            VideoSampler::new(&engines),
        );
        pipeline.run_with_progress(&mut store, &mut log, &cancel, print_event)
    })
    .await
    .context("indexing task panicked")??;

    if summary.interrupted {
        println!("interrupted: partial progress saved");
    }
    println!(
        "done: {} new entries ({} errors), {} total",
        summary.new_entries, summary.unit_errors, summary.total_entries
    );
    println!("index: {}", summary.index_path.display());
    println!("log:   {}", summary.log_path.display());
    Ok(())
}

fn print_event(event: IndexEvent) {
    match event {
        IndexEvent::Resumed(files, frames) => println!(
            "resume: {} files, {} video frames already indexed",
            files, frames
        ),
        IndexEvent::UnitOk(unit) => println!("[OK] {}", unit),
        IndexEvent::UnitErr(unit, cause) => println!("[ERR] {}: {}", unit, cause),
        IndexEvent::Done => {}
    }
}

fn show_status(path: &str) -> Result<()> {
    let root = expand_root(path);
    let store = IndexStore::load(&root.join(INDEX_FILE))?;
    println!("entries: {}", store.len());
    for kind in FileType::ALL {
        let count = store.entries().iter().filter(|e| e.kind == kind).count();
        if count > 0 {
            println!("  {}: {}", kind, count);
        }
    }
    println!("log: {}", root.join(LOG_FILE).display());
    Ok(())
}
