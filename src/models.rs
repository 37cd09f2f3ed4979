//! Core data structures and types for Vitibrasil processing.
//!
//! Defines pipeline kinds, product subtypes, normalized records, the flat
//! row representation shared with the storage layer, and batch reports.

use crate::constants::{COMMERCE_TABLE, EXPORT_SUBTYPES, EXPORT_TABLE, IMPORT_SUBTYPES, IMPORT_TABLE};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;

/// Source families handled by the processor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Pipeline {
    Export,
    Import,
    Commerce,
}

impl Pipeline {
    /// Destination table for this pipeline
    pub fn schema(&self) -> &'static TableSchema {
        match self {
            Pipeline::Export => &EXPORT_TABLE,
            Pipeline::Import => &IMPORT_TABLE,
            Pipeline::Commerce => &COMMERCE_TABLE,
        }
    }

    pub fn trade_flow(&self) -> Option<TradeFlow> {
        match self {
            Pipeline::Export => Some(TradeFlow::Export),
            Pipeline::Import => Some(TradeFlow::Import),
            Pipeline::Commerce => None,
        }
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Pipeline::Export => "export",
            Pipeline::Import => "import",
            Pipeline::Commerce => "commerce",
        };
        f.write_str(name)
    }
}

/// Direction of a trade file; decides which subtype table applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TradeFlow {
    Export,
    Import,
}

impl TradeFlow {
    pub fn subtype_table(&self) -> &'static [(&'static str, ProductType)] {
        match self {
            TradeFlow::Export => EXPORT_SUBTYPES,
            TradeFlow::Import => IMPORT_SUBTYPES,
        }
    }

    pub fn schema(&self) -> &'static TableSchema {
        match self {
            TradeFlow::Export => &EXPORT_TABLE,
            TradeFlow::Import => &IMPORT_TABLE,
        }
    }
}

/// Product subtype (`Tipo`) derived from the source file identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductType {
    TableWine,
    Sparkling,
    FreshGrapes,
    Raisins,
    GrapeJuice,
    Unknown,
}

impl ProductType {
    /// Label stored in the `Tipo` column
    pub fn label(&self) -> &'static str {
        match self {
            ProductType::TableWine => "Vinhos de mesa",
            ProductType::Sparkling => "Espumantes",
            ProductType::FreshGrapes => "Uvas frescas",
            ProductType::Raisins => "Uvas passas",
            ProductType::GrapeJuice => "Suco de uva",
            ProductType::Unknown => "Desconhecido",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How the persistence gate decides that a row is already stored
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum DedupStrategy {
    /// Every column must match an existing row exactly
    #[default]
    ExactRow,
    /// Only the table's natural key columns are compared; the store enforces
    /// uniqueness of that key
    NaturalKey,
}

impl std::str::FromStr for DedupStrategy {
    type Err = crate::error::VitiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact-row" | "exact" => Ok(DedupStrategy::ExactRow),
            "natural-key" | "key" => Ok(DedupStrategy::NaturalKey),
            other => Err(crate::error::VitiError::configuration(format!(
                "unknown dedup strategy '{}'",
                other
            ))),
        }
    }
}

/// One uploaded file: raw bytes plus the name that drives classification
#[derive(Debug, Clone)]
pub struct FileSource {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl FileSource {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, keeping only its final path component as name
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { name, bytes })
    }
}

/// Normalized export/import record (one row per Id x País x Ano)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeRecord {
    pub id: i64,
    pub country: String,
    pub year: i32,
    pub quantity: Option<f64>,
    pub value: Option<f64>,
    pub product_type: ProductType,
}

/// Normalized commercialization record (category-total rows only)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommerceRecord {
    pub id: i64,
    pub product: String,
    pub year: i32,
    pub quantity: Option<f64>,
}

// =============================================================================
// Flat rows shared with the storage layer
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Integer,
    Real,
    Text,
}

impl SqlType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SqlType::Integer => "INTEGER",
            SqlType::Real => "REAL",
            SqlType::Text => "TEXT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub sql_type: SqlType,
}

impl ColumnDef {
    pub const fn new(name: &'static str, sql_type: SqlType) -> Self {
        Self { name, sql_type }
    }
}

/// Layout of a destination table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [ColumnDef],
    pub key_columns: &'static [&'static str],
}

impl TableSchema {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    /// Positions of the natural key columns, in key order
    pub fn key_indices(&self) -> Vec<usize> {
        self.key_columns
            .iter()
            .filter_map(|name| self.column_index(name))
            .collect()
    }
}

/// A single stored value
///
/// Reals compare by bit pattern with `-0.0` folded into `0.0` and every NaN
/// folded into one, so rows can be hashed for exact-equality lookups.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Cell {
    fn real_bits(value: f64) -> u64 {
        if value == 0.0 {
            0
        } else if value.is_nan() {
            f64::NAN.to_bits()
        } else {
            value.to_bits()
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Cell::Integer(v) => Some(*v),
            Cell::Real(v) => Some(*v as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Integer(v) => Some(*v as f64),
            Cell::Real(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Cell::Null, Cell::Real)
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Cell::Null, Cell::Null) => true,
            (Cell::Integer(a), Cell::Integer(b)) => a == b,
            (Cell::Real(a), Cell::Real(b)) => Cell::real_bits(*a) == Cell::real_bits(*b),
            (Cell::Text(a), Cell::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Cell::Null => {}
            Cell::Integer(v) => v.hash(state),
            Cell::Real(v) => Cell::real_bits(*v).hash(state),
            Cell::Text(v) => v.hash(state),
        }
    }
}

/// A full table row in schema column order
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct StoredRow(pub Vec<Cell>);

impl StoredRow {
    pub fn get(&self, index: usize) -> Option<&Cell> {
        self.0.get(index)
    }

    /// Sub-row made of the given column positions
    pub fn project(&self, indices: &[usize]) -> StoredRow {
        StoredRow(
            indices
                .iter()
                .map(|&i| self.0.get(i).cloned().unwrap_or(Cell::Null))
                .collect(),
        )
    }
}

/// Records that can be written to a destination table
pub trait TableRecord {
    fn to_row(&self) -> StoredRow;
}

impl TableRecord for TradeRecord {
    fn to_row(&self) -> StoredRow {
        StoredRow(vec![
            Cell::Integer(self.id),
            Cell::Text(self.country.clone()),
            Cell::Integer(i64::from(self.year)),
            Cell::from(self.quantity),
            Cell::from(self.value),
            Cell::Text(self.product_type.label().to_string()),
        ])
    }
}

impl TableRecord for CommerceRecord {
    fn to_row(&self) -> StoredRow {
        StoredRow(vec![
            Cell::Integer(self.id),
            Cell::Text(self.product.clone()),
            Cell::Integer(i64::from(self.year)),
            Cell::from(self.quantity),
        ])
    }
}

// =============================================================================
// Reports
// =============================================================================

/// Outcome of normalizing one input file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Processed { rows: usize },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    pub file_name: String,
    #[serde(flatten)]
    pub status: FileStatus,
}

impl FileReport {
    pub fn is_failed(&self) -> bool {
        matches!(self.status, FileStatus::Failed { .. })
    }
}

/// Concatenated records of a batch plus one report per input file
#[derive(Debug, Clone)]
pub struct BatchOutcome<R> {
    pub records: Vec<R>,
    pub files: Vec<FileReport>,
}

impl<R> BatchOutcome<R> {
    pub fn files_processed(&self) -> usize {
        self.files.iter().filter(|f| !f.is_failed()).count()
    }

    pub fn files_failed(&self) -> usize {
        self.files.iter().filter(|f| f.is_failed()).count()
    }
}

/// Result of passing a batch through the persistence gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PersistOutcome {
    /// New rows were written
    Appended {
        table: String,
        rows: usize,
        skipped: usize,
    },
    /// Every row of the batch is already stored
    AlreadyExists { table: String },
}

impl PersistOutcome {
    pub fn rows_written(&self) -> usize {
        match self {
            PersistOutcome::Appended { rows, .. } => *rows,
            PersistOutcome::AlreadyExists { .. } => 0,
        }
    }
}
