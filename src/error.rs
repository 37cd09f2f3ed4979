//! Error handling for Vitibrasil ingestion operations.
//!
//! Provides error types with context for file decoding, schema
//! classification, cell parsing and storage failures.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VitiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("CSV decoding failed for file: {file} - {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },

    /// Input does not have the shape the pipeline needs (missing key columns,
    /// unrecognised year labels, repeated or unpaired year columns).
    #[error("Schema error in file {file}: {reason}")]
    Schema { file: String, reason: String },

    #[error("Invalid value in file {file}, row {row}, column '{column}': '{value}'")]
    InvalidValue {
        file: String,
        column: String,
        row: usize,
        value: String,
    },

    /// Any storage fault other than an absent table. The message is the
    /// underlying driver error, unmodified.
    #[error("Storage failure on table {table}: {message}")]
    Storage { table: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Input not found at path: {path}")]
    InputNotFound { path: PathBuf },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Directory traversal error: {0}")]
    Walk(#[from] walkdir::Error),
}

impl VitiError {
    pub fn schema(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Schema {
            file: file.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_value(
        file: impl Into<String>,
        column: impl Into<String>,
        row: usize,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            file: file.into(),
            column: column.into(),
            row,
            value: value.into(),
        }
    }

    pub fn storage(table: impl Into<String>, source: impl std::fmt::Display) -> Self {
        Self::Storage {
            table: table.into(),
            message: source.to_string(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Errors confined to a single input file; the rest of a batch can proceed.
    pub fn is_file_scoped(&self) -> bool {
        matches!(
            self,
            Self::Csv { .. } | Self::Schema { .. } | Self::InvalidValue { .. } | Self::Io(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, VitiError>;
