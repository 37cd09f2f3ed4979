//! Vitibrasil Processor Library
//!
//! Normalizes the wide-format CSV exports of the Vitibrasil wine statistics
//! database (one column per year) into long-format records and appends them
//! incrementally to a relational store.
//!
//! This library provides tools for:
//! - Classifying year columns into quantity and value variants before parsing
//! - Reshaping, aggregating and filtering export/import files
//! - Selecting category totals from commercialization files
//! - Classifying product subtypes from file names
//! - Appending only unseen rows through a persistence gate
//! - Exporting recent years of stored tables to Parquet or CSV

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod frame;
pub mod header;
pub mod models;
pub mod processor;
pub mod store;

pub use config::VitiConfig;
pub use error::{Result, VitiError};
pub use models::{
    CommerceRecord, DedupStrategy, FileSource, PersistOutcome, Pipeline, ProductType, TradeRecord,
};
pub use processor::{BatchProcessor, CommerceNormalizer, Normalizer, TradeNormalizer};
pub use store::{MemoryStore, PersistenceGate, SqliteStore, TableStore};
