//! Headless Dockyard shell.
//!
//! Replays a JSON script against the widget area, persisting layout to a
//! preferences file, and prints the resulting area state as JSON.

mod script;

use clap::Parser;
use dockyard_core::{FilePreferences, LayoutConfig, MemoryHost, PreferenceStore, WidgetArea};
use script::ScriptRunner;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use thiserror::Error;

/// Replay widget area scripts without a display
#[derive(Parser, Debug)]
#[command(name = "dockyard")]
#[command(version, about, long_about = None)]
struct Args {
    /// Preferences file (defaults to the user data directory)
    #[arg(long, value_name = "FILE")]
    prefs: Option<PathBuf>,

    /// Layout config overriding the built-in presets
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Width of the widget area
    #[arg(long, value_name = "N")]
    area_width: Option<i32>,

    /// Script to replay
    script: PathBuf,
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] dockyard_core::ConfigError),
    #[error(transparent)]
    Storage(#[from] dockyard_core::StorageError),
    #[error(transparent)]
    Script(#[from] script::ScriptError),
    #[error("Failed to write report: {0}")]
    Report(serde_json::Error),
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
}

fn run(args: Args) -> Result<String, AppError> {
    let config = match &args.config {
        Some(path) => LayoutConfig::load(path)?,
        None => LayoutConfig::default(),
    };

    let prefs = match args.prefs {
        Some(path) => FilePreferences::open(path)?,
        None => FilePreferences::default_location()?,
    };
    log::info!("Using preferences at {}", prefs.path().display());
    let prefs: Arc<dyn PreferenceStore> = Arc::new(prefs);

    let json = std::fs::read_to_string(&args.script).map_err(|source| AppError::Read {
        path: args.script.display().to_string(),
        source,
    })?;
    let commands = script::parse(&json)?;
    log::info!("Replaying {} commands", commands.len());

    let mut area = WidgetArea::new(MemoryHost::new(), prefs, config);
    if let Some(width) = args.area_width {
        area.set_area_width(width);
    }

    let mut runner = ScriptRunner::new(area);
    runner.run(commands);
    log::info!("Script finished with {} live widgets", runner.area().live_ids().len());

    serde_json::to_string_pretty(&runner.report()).map_err(AppError::Report)
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Starting Dockyard");

    match run(Args::parse()) {
        Ok(report) => {
            println!("{}", report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            eprintln!("dockyard: {}", e);
            ExitCode::FAILURE
        }
    }
}
