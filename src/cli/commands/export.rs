//! Read-side commands: dashboard export and latest stored year

use super::shared::RunOutcome;
use crate::cli::args::{ExportArgs, ExportFormat, LatestArgs, OutputFormat};
use crate::config::VitiConfig;
use crate::error::Result;
use crate::frame;
use crate::store::SqliteStore;
use crate::store::queries::{latest_year, recent_rows};
use colored::*;
use tracing::{info, warn};

pub fn run_export(args: &ExportArgs, config: &VitiConfig) -> Result<RunOutcome> {
    let schema = args.pipeline.schema();
    let years = args.years.unwrap_or(config.export.recent_years);
    let store = SqliteStore::open(&config.database.path)?;

    let rows = recent_rows(&store, schema, years)?;
    if rows.is_empty() {
        warn!("No rows stored in {}", schema.name);
    }

    let mut df = frame::rows_to_frame(schema, &rows)?;
    match args.format {
        ExportFormat::Parquet => {
            frame::write_parquet(&mut df, &args.output, config.export.compression)?
        }
        ExportFormat::Csv => frame::write_csv(&mut df, &args.output)?,
    }
    info!(
        "Exported {} rows of {} to {}",
        df.height(),
        schema.name,
        args.output.display()
    );

    println!(
        "{} {} rows from {} to {}",
        "Exported".bright_green().bold(),
        df.height(),
        schema.name.bright_cyan(),
        args.output.display()
    );
    Ok(RunOutcome::Complete)
}

pub fn run_latest(args: &LatestArgs, config: &VitiConfig) -> Result<RunOutcome> {
    let schema = args.pipeline.schema();
    let store = SqliteStore::open(&config.database.path)?;
    let latest = latest_year(&store, schema)?;

    match args.output_format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({ "table": schema.name, "latest_year": latest })
        ),
        OutputFormat::Human => match latest {
            Some(year) => println!("{}: {}", schema.name.bright_cyan(), year),
            None => println!("{}: {}", schema.name.bright_cyan(), "no data".yellow()),
        },
    }
    Ok(RunOutcome::Complete)
}
