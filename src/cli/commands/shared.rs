//! Shared components for CLI commands
//!
//! Logging setup, configuration layering, progress bars, and the number
//! formatting used in summaries.

use crate::cli::args::Args;
use crate::config::VitiConfig;
use crate::error::Result;
use crate::models::{StoredRow, TableSchema};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::debug;

/// How a command finished; drives the process exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Complete,
    /// The command ran but at least one input file failed
    CompletedWithFailures,
}

impl RunOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Complete => 0,
            RunOutcome::CompletedWithFailures => 1,
        }
    }
}

/// Set up structured logging
pub fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("vitibrasil_processor={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .ok();
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load configuration (file -> env) and apply a command's database override
pub fn load_configuration(args: &Args, database: Option<&PathBuf>) -> Result<VitiConfig> {
    let mut config = VitiConfig::load(args.config_file.as_deref())?;
    if let Some(path) = database {
        config = config.with_database_path(path.clone());
    }
    config.validate()?;
    debug!("Loaded configuration: {:?}", config);
    Ok(config)
}

/// Create a progress bar with appropriate styling
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message(message.to_string());
    pb
}

/// Format a quantity with Portuguese magnitude suffixes
/// (`1234567.0` -> `"1.23 Milhões"`)
pub fn format_number(value: f64) -> String {
    const UNITS: &[&str] = &["", "Mil", "Milhões", "Bilhões"];
    let mut scaled = value;

    for unit in UNITS {
        if scaled.abs() < 1000.0 {
            return format!("{:.2} {}", scaled, unit).trim_end().to_string();
        }
        scaled /= 1000.0;
    }

    format!("{:.2} Trilhões", scaled)
}

/// Sum of a numeric column, `None` when the schema has no such column
pub fn column_total(schema: &TableSchema, rows: &[StoredRow], column: &str) -> Option<f64> {
    let index = schema.column_index(column)?;
    Some(
        rows.iter()
            .filter_map(|row| row.get(index).and_then(|cell| cell.as_f64()))
            .sum(),
    )
}
