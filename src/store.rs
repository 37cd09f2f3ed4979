//! Storage collaborator for normalized tables.
//!
//! The pipeline talks to storage only through [`TableStore`]: a synchronous
//! `read` that distinguishes an absent table from an empty one, and an
//! `append`. A store value is constructed once by the caller and passed into
//! each invocation; nothing here keeps a global connection.
//!
//! - [`SqliteStore`] - on-disk or in-memory SQLite database
//! - [`MemoryStore`] - in-process tables, used for previews and tests
//! - [`PersistenceGate`] - incremental, deduplicating append
//! - [`queries`] - read-side helpers for the dashboard export

pub mod gate;
pub mod memory;
pub mod queries;
pub mod sqlite;

#[cfg(test)]
mod tests;

use crate::error::Result;
use crate::models::{DedupStrategy, StoredRow, TableSchema};

pub use gate::PersistenceGate;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Synchronous table storage
pub trait TableStore {
    /// All rows of a table in schema column order, or `None` when the table
    /// does not exist yet. Any other failure is a storage error.
    fn read(&self, schema: &TableSchema) -> Result<Option<Vec<StoredRow>>>;

    /// Append rows, creating the table if needed, and return how many rows
    /// were actually written. The write is all-or-nothing.
    ///
    /// Under [`DedupStrategy::NaturalKey`] the store enforces uniqueness of
    /// the schema's key columns and silently ignores conflicting rows.
    fn append(
        &mut self,
        schema: &TableSchema,
        rows: &[StoredRow],
        strategy: DedupStrategy,
    ) -> Result<usize>;
}
