//! Command-line argument definitions for the Vitibrasil processor

use crate::models::{DedupStrategy, Pipeline};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the Vitibrasil processor
///
/// Normalizes Vitibrasil wide-format trade and commercialization exports into
/// long-format tables and appends them incrementally to a SQLite database.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "vitibrasil-processor",
    version,
    about = "Normalize Vitibrasil wine statistics CSV exports into long-format tables",
    long_about = "Reshapes Vitibrasil export, import and commercialization CSV files (one column \
                  per year) into one row per entity and year, classifies each file's product \
                  subtype, drops empty rows, and appends only previously unseen rows to the \
                  destination table."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    ///
    /// TOML configuration file. If not specified, looks for
    /// <config_dir>/vitibrasil-processor/config.toml
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        global = true,
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Suppress output except errors"
    )]
    pub quiet: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Normalize CSV files and append new rows to the pipeline's table
    Ingest(IngestArgs),
    /// Write the most recent years of a stored table to Parquet or CSV
    Export(ExportArgs),
    /// Print the most recent year stored for a pipeline
    Latest(LatestArgs),
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Ingest(_) => "ingest",
            Commands::Export(_) => "export",
            Commands::Latest(_) => "latest",
        }
    }
}

#[derive(Debug, Clone, Parser)]
pub struct IngestArgs {
    /// Which family of files is being uploaded
    #[arg(short = 'p', long = "pipeline", value_enum)]
    pub pipeline: Pipeline,

    /// Input files, directories (searched for *.csv) or glob patterns
    ///
    /// File names matter: export/import subtypes are derived from the exact
    /// file name (e.g. ExpVinho.csv, ImpPassas.csv).
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<String>,

    /// SQLite database path (overrides configuration)
    #[arg(long = "db", value_name = "FILE")]
    pub database: Option<PathBuf>,

    /// How already stored rows are recognised
    #[arg(long = "dedup", value_enum)]
    pub dedup: Option<DedupStrategy>,

    /// Normalize and preview without writing to the database
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Abort the whole batch on the first failing file
    #[arg(long = "fail-fast")]
    pub fail_fast: bool,

    /// Persist without asking when some files failed
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,

    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,
}

#[derive(Debug, Clone, Parser)]
pub struct ExportArgs {
    #[arg(short = 'p', long = "pipeline", value_enum)]
    pub pipeline: Pipeline,

    /// Output file
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: PathBuf,

    #[arg(long = "db", value_name = "FILE")]
    pub database: Option<PathBuf>,

    /// Years before the latest stored one to include
    #[arg(long = "years", value_name = "N")]
    pub years: Option<i32>,

    #[arg(long = "format", value_enum, default_value = "parquet")]
    pub format: ExportFormat,
}

#[derive(Debug, Clone, Parser)]
pub struct LatestArgs {
    #[arg(short = 'p', long = "pipeline", value_enum)]
    pub pipeline: Pipeline,

    #[arg(long = "db", value_name = "FILE")]
    pub database: Option<PathBuf>,

    #[arg(long = "output-format", value_enum, default_value = "human")]
    pub output_format: OutputFormat,
}

/// Output format options for machine-readable results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Parquet,
    Csv,
}

impl Args {
    /// Get log level based on verbosity settings
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Whether to show progress bars
    pub fn show_progress(&self) -> bool {
        if self.quiet {
            return false;
        }
        match &self.command {
            Commands::Ingest(ingest) => ingest.output_format == OutputFormat::Human,
            _ => false,
        }
    }
}
