//! Application constants for the Vitibrasil processor
//!
//! Table layouts, source column names, subtype lookup tables and default
//! values used throughout the pipeline.

use crate::models::{ColumnDef, ProductType, SqlType, TableSchema};

// =============================================================================
// Source Columns
// =============================================================================

/// Key columns of export/import wide files (`Id;País;1970;1970.1;...`)
pub mod trade_columns {
    pub const ID: &str = "Id";
    pub const COUNTRY: &str = "País";
}

/// Key columns of commercialization wide files (`id;control;Produto;1970;...`)
pub mod commerce_columns {
    pub const ID: &str = "id";
    pub const CONTROL: &str = "control";
    pub const PRODUCT: &str = "Produto";
}

/// Normalized column names shared by every destination table
pub mod normalized_columns {
    pub const YEAR: &str = "Ano";
    pub const QUANTITY: &str = "Quantidade";
    pub const VALUE: &str = "Valor";
    pub const SUBTYPE: &str = "Tipo";
}

/// Field delimiter of Vitibrasil exports
pub const CSV_DELIMITER: u8 = b';';

/// Suffix marking the value variant of a year column
pub const VALUE_YEAR_SUFFIX: &str = ".1";

/// Cell contents read as missing, as published exports and spreadsheet tools
/// write them
pub const MISSING_VALUE_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// =============================================================================
// Subtype Classification
// =============================================================================

/// Export file names and the subtype each one carries
pub const EXPORT_SUBTYPES: &[(&str, ProductType)] = &[
    ("ExpVinho.csv", ProductType::TableWine),
    ("ExpEspumantes.csv", ProductType::Sparkling),
    ("ExpUva.csv", ProductType::FreshGrapes),
    ("ExpSuco.csv", ProductType::GrapeJuice),
];

/// Import file names and the subtype each one carries
pub const IMPORT_SUBTYPES: &[(&str, ProductType)] = &[
    ("ImpVinhos.csv", ProductType::TableWine),
    ("ImpEspumantes.csv", ProductType::Sparkling),
    ("ImpFrescas.csv", ProductType::FreshGrapes),
    ("ImpPassas.csv", ProductType::Raisins),
    ("ImpSuco.csv", ProductType::GrapeJuice),
];

// =============================================================================
// Destination Tables
// =============================================================================

pub const EXPORT_TABLE_NAME: &str = "export_vinho";
pub const IMPORT_TABLE_NAME: &str = "import_vinho";
pub const COMMERCE_TABLE_NAME: &str = "comercio_vinho";

const TRADE_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new(trade_columns::ID, SqlType::Integer),
    ColumnDef::new(trade_columns::COUNTRY, SqlType::Text),
    ColumnDef::new(normalized_columns::YEAR, SqlType::Integer),
    ColumnDef::new(normalized_columns::QUANTITY, SqlType::Real),
    ColumnDef::new(normalized_columns::VALUE, SqlType::Real),
    ColumnDef::new(normalized_columns::SUBTYPE, SqlType::Text),
];

const TRADE_KEY: &[&str] = &[
    trade_columns::ID,
    trade_columns::COUNTRY,
    normalized_columns::YEAR,
    normalized_columns::SUBTYPE,
];

pub const EXPORT_TABLE: TableSchema = TableSchema {
    name: EXPORT_TABLE_NAME,
    columns: TRADE_COLUMNS,
    key_columns: TRADE_KEY,
};

pub const IMPORT_TABLE: TableSchema = TableSchema {
    name: IMPORT_TABLE_NAME,
    columns: TRADE_COLUMNS,
    key_columns: TRADE_KEY,
};

pub const COMMERCE_TABLE: TableSchema = TableSchema {
    name: COMMERCE_TABLE_NAME,
    columns: &[
        ColumnDef::new(commerce_columns::ID, SqlType::Integer),
        ColumnDef::new(commerce_columns::PRODUCT, SqlType::Text),
        ColumnDef::new(normalized_columns::YEAR, SqlType::Integer),
        ColumnDef::new(normalized_columns::QUANTITY, SqlType::Real),
    ],
    key_columns: &[
        commerce_columns::ID,
        commerce_columns::PRODUCT,
        normalized_columns::YEAR,
    ],
};

// =============================================================================
// Defaults
// =============================================================================

/// Application directory name under the platform data/config dirs
pub const APP_DIR_NAME: &str = "vitibrasil-processor";

/// Default SQLite database file name
pub const DEFAULT_DATABASE_FILE: &str = "vitibrasil.db";

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Default look-back window for dashboard exports
pub const DEFAULT_RECENT_YEARS: i32 = 15;

/// Rows shown when previewing a processed batch
pub const PREVIEW_ROWS: usize = 20;

/// Environment overrides
pub mod env {
    pub const DB_PATH: &str = "VITIBRASIL_DB_PATH";
    pub const DEDUP: &str = "VITIBRASIL_DEDUP";
}
