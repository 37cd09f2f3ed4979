//! In-process table store.

use super::TableStore;
use crate::error::{Result, VitiError};
use crate::models::{DedupStrategy, StoredRow, TableSchema};
use std::collections::{HashMap, HashSet};

/// Tables held in memory, keyed by table name
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: HashMap<String, Vec<StoredRow>>,
    read_failure: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a table with existing rows
    pub fn with_table(mut self, table: &str, rows: Vec<StoredRow>) -> Self {
        self.tables.insert(table.to_string(), rows);
        self
    }

    /// Make every subsequent read fail with the given message
    pub fn with_read_failure(mut self, message: impl Into<String>) -> Self {
        self.read_failure = Some(message.into());
        self
    }

    pub fn rows(&self, table: &str) -> Option<&[StoredRow]> {
        self.tables.get(table).map(Vec::as_slice)
    }
}

impl TableStore for MemoryStore {
    fn read(&self, schema: &TableSchema) -> Result<Option<Vec<StoredRow>>> {
        if let Some(message) = &self.read_failure {
            return Err(VitiError::storage(schema.name, message));
        }
        Ok(self.tables.get(schema.name).cloned())
    }

    fn append(
        &mut self,
        schema: &TableSchema,
        rows: &[StoredRow],
        strategy: DedupStrategy,
    ) -> Result<usize> {
        let table = self.tables.entry(schema.name.to_string()).or_default();

        match strategy {
            DedupStrategy::ExactRow => {
                table.extend_from_slice(rows);
                Ok(rows.len())
            }
            DedupStrategy::NaturalKey => {
                let key = schema.key_indices();
                let mut stored: HashSet<StoredRow> =
                    table.iter().map(|r| r.project(&key)).collect();

                let before = table.len();
                for row in rows {
                    if stored.insert(row.project(&key)) {
                        table.push(row.clone());
                    }
                }
                Ok(table.len() - before)
            }
        }
    }
}
