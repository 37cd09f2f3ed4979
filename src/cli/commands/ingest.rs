//! Ingest command: normalize uploaded files and persist the new rows

use super::shared::{RunOutcome, column_total, create_progress_bar, format_number};
use crate::cli::args::{IngestArgs, OutputFormat};
use crate::cli::input;
use crate::config::VitiConfig;
use crate::constants::normalized_columns;
use crate::error::Result;
use crate::frame;
use crate::models::{
    FileReport, FileSource, FileStatus, PersistOutcome, Pipeline, StoredRow, TableRecord,
};
use crate::processor::{BatchProcessor, CommerceNormalizer, Normalizer, TradeNormalizer};
use crate::store::{PersistenceGate, SqliteStore};
use colored::*;
use serde::Serialize;
use std::io::IsTerminal;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Summary of one ingest run
#[derive(Debug, Serialize)]
pub struct IngestReport {
    pub pipeline: Pipeline,
    pub table: &'static str,
    pub dry_run: bool,
    pub files: Vec<FileReport>,
    pub records: usize,
    pub quantity_total: Option<f64>,
    pub value_total: Option<f64>,
    pub persist: Option<PersistOutcome>,
    pub processing_seconds: f64,
}

impl IngestReport {
    pub fn files_failed(&self) -> usize {
        self.files.iter().filter(|f| f.is_failed()).count()
    }

    pub fn outcome(&self) -> RunOutcome {
        if self.files_failed() > 0 {
            RunOutcome::CompletedWithFailures
        } else {
            RunOutcome::Complete
        }
    }
}

/// Ingest options after configuration layering
#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub dry_run: bool,
    pub assume_yes: bool,
    pub show_progress: bool,
    pub output_format: OutputFormat,
}

pub fn run_ingest(
    args: &IngestArgs,
    config: &VitiConfig,
    show_progress: bool,
) -> Result<RunOutcome> {
    let paths = input::resolve_inputs(&args.inputs)?;
    info!(
        "Ingesting {} files into the {} pipeline",
        paths.len(),
        args.pipeline
    );
    let sources = input::load_sources(&paths)?;

    let options = IngestOptions {
        dry_run: args.dry_run,
        assume_yes: args.yes,
        show_progress,
        output_format: args.output_format,
    };

    let report = ingest_sources(args.pipeline, &sources, config, &options)?;
    print_report(&report, args.output_format)?;

    Ok(report.outcome())
}

/// Normalize a batch for the given pipeline and pass it through the gate
pub fn ingest_sources(
    pipeline: Pipeline,
    sources: &[FileSource],
    config: &VitiConfig,
    options: &IngestOptions,
) -> Result<IngestReport> {
    match pipeline.trade_flow() {
        Some(flow) => ingest_with(pipeline, TradeNormalizer::new(flow), sources, config, options),
        None => ingest_with(pipeline, CommerceNormalizer, sources, config, options),
    }
}

fn ingest_with<N: Normalizer>(
    pipeline: Pipeline,
    normalizer: N,
    sources: &[FileSource],
    config: &VitiConfig,
    options: &IngestOptions,
) -> Result<IngestReport> {
    let start_time = Instant::now();

    let mut processor =
        BatchProcessor::new(normalizer).with_fail_fast(!config.ingest.continue_on_error);
    if options.show_progress {
        processor =
            processor.with_progress(create_progress_bar(sources.len() as u64, "Normalizing"));
    }

    let batch = processor.process(sources)?;
    let schema = processor.normalizer().schema();
    let rows: Vec<StoredRow> = batch.records.iter().map(TableRecord::to_row).collect();

    let persist = if options.dry_run {
        if options.output_format == OutputFormat::Human {
            let df = frame::rows_to_frame(schema, &rows)?;
            println!("{}", frame::preview(&df));
        }
        None
    } else if !confirm_partial_batch(batch.files_failed(), options)? {
        warn!("Persistence skipped by user");
        None
    } else {
        let mut store = SqliteStore::open(&config.database.path)?;
        let gate = PersistenceGate::new(config.ingest.dedup_strategy);
        Some(gate.persist(&mut store, schema, &batch.records)?)
    };

    Ok(IngestReport {
        pipeline,
        table: schema.name,
        dry_run: options.dry_run,
        records: batch.records.len(),
        quantity_total: column_total(schema, &rows, normalized_columns::QUANTITY),
        value_total: column_total(schema, &rows, normalized_columns::VALUE),
        files: batch.files,
        persist,
        processing_seconds: start_time.elapsed().as_secs_f64(),
    })
}

/// Ask before persisting a batch in which some files failed; only when a
/// person is at the terminal
fn confirm_partial_batch(failed: usize, options: &IngestOptions) -> Result<bool> {
    if failed == 0
        || options.assume_yes
        || options.output_format != OutputFormat::Human
        || !std::io::stdin().is_terminal()
    {
        return Ok(true);
    }
    input::prompt_confirmation(
        &format!(
            "{} file(s) failed. Persist the records from the remaining files?",
            failed
        ),
        true,
    )
}

fn print_report(report: &IngestReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => {
            print_human_report(report);
            Ok(())
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
            Ok(())
        }
    }
}

fn print_human_report(report: &IngestReport) {
    println!();
    println!(
        "{} {}",
        "Vitibrasil ingest:".bright_green().bold(),
        report.pipeline.to_string().bright_cyan()
    );
    println!("{}", "━".repeat(40));

    for file in &report.files {
        match &file.status {
            FileStatus::Processed { rows } => {
                println!("   {} {} ({} records)", "✓".green(), file.file_name, rows)
            }
            FileStatus::Failed { error } => {
                println!("   {} {}: {}", "✗".red(), file.file_name, error.red())
            }
        }
    }

    println!("   • Records normalized: {}", report.records);
    if let Some(total) = report.quantity_total {
        println!("   • Quantidade total: {}", format_number(total));
    }
    if let Some(total) = report.value_total {
        println!("   • Valor total: {}", format_number(total));
    }

    match &report.persist {
        Some(PersistOutcome::Appended { table, rows, skipped }) => println!(
            "   • {} {} new rows to {} ({} already stored)",
            "Appended".bright_green(),
            rows,
            table.bright_cyan(),
            skipped
        ),
        Some(PersistOutcome::AlreadyExists { table }) => println!(
            "   • {} all rows already exist in {}",
            "No new data:".yellow(),
            table.bright_cyan()
        ),
        None if report.dry_run => println!("   • Dry run, nothing written"),
        None => println!("   • Nothing written"),
    }

    println!(
        "   • Processing time: {}",
        indicatif::HumanDuration(Duration::from_secs_f64(report.processing_seconds))
    );

    if report.files_failed() > 0 {
        println!(
            "{}",
            format!("⚠️  {} file(s) failed", report.files_failed()).yellow()
        );
    }
    println!();
}
