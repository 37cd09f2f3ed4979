//! Incremental persistence gate.
//!
//! Reads what is already stored, keeps only the batch rows that are new, and
//! appends them in one write. A missing table counts as empty; an all-known
//! batch is reported as [`PersistOutcome::AlreadyExists`] rather than an error.

use super::TableStore;
use crate::error::Result;
use crate::models::{DedupStrategy, PersistOutcome, StoredRow, TableRecord, TableSchema};
use std::collections::HashSet;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default)]
pub struct PersistenceGate {
    strategy: DedupStrategy,
}

impl PersistenceGate {
    pub fn new(strategy: DedupStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> DedupStrategy {
        self.strategy
    }

    /// Column positions compared when deciding that a row is already stored
    fn identity_columns(&self, schema: &TableSchema) -> Vec<usize> {
        match self.strategy {
            DedupStrategy::ExactRow => (0..schema.columns.len()).collect(),
            DedupStrategy::NaturalKey => schema.key_indices(),
        }
    }

    /// Rows of the batch not present in `existing`, first occurrence wins
    pub fn new_rows(
        &self,
        schema: &TableSchema,
        existing: &[StoredRow],
        batch: Vec<StoredRow>,
    ) -> Vec<StoredRow> {
        let identity = self.identity_columns(schema);
        let mut seen: HashSet<StoredRow> =
            existing.iter().map(|r| r.project(&identity)).collect();

        batch
            .into_iter()
            .filter(|row| seen.insert(row.project(&identity)))
            .collect()
    }

    /// Append the new part of a batch to the schema's table
    ///
    /// Read failures other than an absent table abort before anything is
    /// written.
    pub fn persist<S, R>(
        &self,
        store: &mut S,
        schema: &TableSchema,
        records: &[R],
    ) -> Result<PersistOutcome>
    where
        S: TableStore + ?Sized,
        R: TableRecord,
    {
        let existing = match store.read(schema)? {
            Some(rows) => rows,
            None => {
                info!("Table {} not found, it will be created", schema.name);
                Vec::new()
            }
        };

        let batch: Vec<StoredRow> = records.iter().map(TableRecord::to_row).collect();
        let fresh = self.new_rows(schema, &existing, batch);
        debug!(
            "{}: {} stored rows, {} in batch, {} new ({:?})",
            schema.name,
            existing.len(),
            records.len(),
            fresh.len(),
            self.strategy
        );

        if fresh.is_empty() {
            info!("No new data for {}", schema.name);
            return Ok(PersistOutcome::AlreadyExists {
                table: schema.name.to_string(),
            });
        }

        let written = store.append(schema, &fresh, self.strategy)?;
        info!("Appended {} rows to {}", written, schema.name);

        Ok(PersistOutcome::Appended {
            table: schema.name.to_string(),
            rows: written,
            skipped: records.len() - written,
        })
    }
}
