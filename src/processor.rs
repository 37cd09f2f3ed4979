//! Normalization pipeline for Vitibrasil wide files.
//!
//! Turns each uploaded file into canonical long-format records:
//!
//! 1. [`wide`] - decode the semicolon-delimited file
//! 2. [`crate::header`] - classify every column before parsing any cell
//! 3. [`reshape`] - pivot year columns into rows
//! 4. [`disambiguate`] - route each value to `Quantidade` or `Valor`
//! 5. [`aggregate`] - merge the quantity and value rows of the same year
//! 6. [`classify`] - stamp the file's subtype
//! 7. [`filter`] - drop records without information
//!
//! Commercialization files take the structurally different path in
//! [`commerce`]. A batch of files is run sequentially by [`BatchProcessor`],
//! which isolates per-file failures and concatenates the results.

pub mod aggregate;
pub mod classify;
pub mod commerce;
pub mod disambiguate;
pub mod filter;
pub mod reshape;
pub mod wide;

#[cfg(test)]
mod tests;

use crate::error::Result;
use crate::header::TradeLayout;
use crate::models::{
    BatchOutcome, CommerceRecord, FileReport, FileSource, FileStatus, TableRecord, TableSchema,
    TradeFlow, TradeRecord,
};
use indicatif::ProgressBar;
use tracing::{debug, info, warn};

use self::wide::WideTable;

/// A per-file normalization strategy bound to one destination table
pub trait Normalizer {
    type Record: TableRecord + Clone;

    fn schema(&self) -> &'static TableSchema;

    fn normalize(&self, source: &FileSource) -> Result<Vec<Self::Record>>;
}

/// Export and import files: reshape, disambiguate, aggregate, classify, filter
#[derive(Debug, Clone, Copy)]
pub struct TradeNormalizer {
    flow: TradeFlow,
}

impl TradeNormalizer {
    pub fn new(flow: TradeFlow) -> Self {
        Self { flow }
    }

    pub fn flow(&self) -> TradeFlow {
        self.flow
    }
}

impl Normalizer for TradeNormalizer {
    type Record = TradeRecord;

    fn schema(&self) -> &'static TableSchema {
        self.flow.schema()
    }

    fn normalize(&self, source: &FileSource) -> Result<Vec<TradeRecord>> {
        let table = WideTable::parse(source)?;
        let layout = TradeLayout::analyze(&source.name, &table.headers)?;

        let long = reshape::melt(&table, layout.id_index, layout.country_index, &layout.years)?;
        let split = disambiguate::disambiguate_all(long);
        let yearly = aggregate::sum_by_year(split);

        let product_type = classify::classify(self.flow, &source.name);
        let records = filter::drop_empty_trade(classify::label(yearly, product_type));

        debug!(
            "Normalized {} as '{}': {} wide rows over {} years -> {} records",
            source.name,
            product_type,
            table.row_count(),
            layout.distinct_years(),
            records.len()
        );

        Ok(records)
    }
}

/// Commercialization files
#[derive(Debug, Clone, Copy, Default)]
pub struct CommerceNormalizer;

impl Normalizer for CommerceNormalizer {
    type Record = CommerceRecord;

    fn schema(&self) -> &'static TableSchema {
        &crate::constants::COMMERCE_TABLE
    }

    fn normalize(&self, source: &FileSource) -> Result<Vec<CommerceRecord>> {
        commerce::normalize_commerce(source)
    }
}

/// Runs a normalizer over a batch of files, one file at a time
pub struct BatchProcessor<N> {
    normalizer: N,
    fail_fast: bool,
    progress: Option<ProgressBar>,
}

impl<N: Normalizer> BatchProcessor<N> {
    pub fn new(normalizer: N) -> Self {
        Self {
            normalizer,
            fail_fast: false,
            progress: None,
        }
    }

    /// Abort the whole batch on the first failing file
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn normalizer(&self) -> &N {
        &self.normalizer
    }

    /// Normalize every file and concatenate the results in input order
    ///
    /// File-scoped failures (decoding, schema, bad cells) are recorded in the
    /// returned reports and the remaining files are still processed, unless
    /// fail-fast is enabled.
    pub fn process(&self, sources: &[FileSource]) -> Result<BatchOutcome<N::Record>> {
        let mut records = Vec::new();
        let mut files = Vec::with_capacity(sources.len());

        for source in sources {
            if let Some(pb) = &self.progress {
                pb.set_message(format!("Processing: {}", source.name));
            }

            match self.normalizer.normalize(source) {
                Ok(file_records) => {
                    info!("Processed {}: {} records", source.name, file_records.len());
                    files.push(FileReport {
                        file_name: source.name.clone(),
                        status: FileStatus::Processed {
                            rows: file_records.len(),
                        },
                    });
                    records.extend(file_records);
                }
                Err(e) if !self.fail_fast && e.is_file_scoped() => {
                    warn!("Failed to process {}: {}", source.name, e);
                    files.push(FileReport {
                        file_name: source.name.clone(),
                        status: FileStatus::Failed {
                            error: e.to_string(),
                        },
                    });
                }
                Err(e) => {
                    if let Some(pb) = &self.progress {
                        pb.abandon_with_message(format!("Failed: {}", source.name));
                    }
                    return Err(e);
                }
            }

            if let Some(pb) = &self.progress {
                pb.inc(1);
            }
        }

        if let Some(pb) = &self.progress {
            pb.finish_with_message("All files processed");
        }

        let outcome = BatchOutcome { records, files };
        info!(
            "Batch complete for {}: {} files processed, {} failed, {} records",
            self.normalizer.schema().name,
            outcome.files_processed(),
            outcome.files_failed(),
            outcome.records.len()
        );

        Ok(outcome)
    }
}
