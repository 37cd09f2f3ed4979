//! Polars views over normalized rows.
//!
//! Used to preview a processed batch before it is persisted and to export
//! stored tables for the dashboard.

use crate::config::CompressionAlgorithm;
use crate::constants::{CSV_DELIMITER, PREVIEW_ROWS};
use crate::error::Result;
use crate::models::{Cell, SqlType, StoredRow, TableRecord, TableSchema};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Build a DataFrame with one typed column per schema column
pub fn rows_to_frame(schema: &TableSchema, rows: &[StoredRow]) -> Result<DataFrame> {
    let columns: Vec<Column> = schema
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let name: PlSmallStr = column.name.into();
            match column.sql_type {
                SqlType::Integer => {
                    let values: Vec<Option<i64>> =
                        rows.iter().map(|r| r.get(i).and_then(Cell::as_i64)).collect();
                    Column::new(name, values)
                }
                SqlType::Real => {
                    let values: Vec<Option<f64>> =
                        rows.iter().map(|r| r.get(i).and_then(Cell::as_f64)).collect();
                    Column::new(name, values)
                }
                SqlType::Text => {
                    let values: Vec<Option<&str>> =
                        rows.iter().map(|r| r.get(i).and_then(Cell::as_str)).collect();
                    Column::new(name, values)
                }
            }
        })
        .collect();

    Ok(DataFrame::new(columns)?)
}

pub fn records_to_frame<R: TableRecord>(schema: &TableSchema, records: &[R]) -> Result<DataFrame> {
    let rows: Vec<StoredRow> = records.iter().map(TableRecord::to_row).collect();
    rows_to_frame(schema, &rows)
}

/// First rows of a frame, for terminal display
pub fn preview(df: &DataFrame) -> DataFrame {
    df.head(Some(PREVIEW_ROWS))
}

pub fn write_parquet(
    df: &mut DataFrame,
    path: &Path,
    compression: CompressionAlgorithm,
) -> Result<()> {
    let file = File::create(path)?;
    ParquetWriter::new(file)
        .with_compression(compression.to_polars_compression())
        .finish(df)?;

    debug!("Wrote {} rows to {}", df.height(), path.display());
    Ok(())
}

/// Semicolon-delimited CSV, matching the layout of the source files
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(CSV_DELIMITER)
        .finish(df)?;

    debug!("Wrote {} rows to {}", df.height(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{COMMERCE_TABLE, EXPORT_TABLE};
    use crate::models::{CommerceRecord, ProductType, TradeRecord};
    use tempfile::TempDir;

    fn trade_records() -> Vec<TradeRecord> {
        vec![
            TradeRecord {
                id: 1,
                country: "Alemanha".to_string(),
                year: 2020,
                quantity: Some(10.0),
                value: Some(99.5),
                product_type: ProductType::TableWine,
            },
            TradeRecord {
                id: 2,
                country: "Angola".to_string(),
                year: 2020,
                quantity: None,
                value: Some(5.0),
                product_type: ProductType::TableWine,
            },
        ]
    }

    #[test]
    fn test_frame_columns_follow_schema() {
        let df = records_to_frame(&EXPORT_TABLE, &trade_records()).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(
            df.get_column_names_str(),
            vec!["Id", "País", "Ano", "Quantidade", "Valor", "Tipo"]
        );
        assert_eq!(df.column("Ano").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("Valor").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("Quantidade").unwrap().null_count(), 1);
    }

    #[test]
    fn test_empty_frame_keeps_columns() {
        let records: Vec<CommerceRecord> = Vec::new();
        let df = records_to_frame(&COMMERCE_TABLE, &records).unwrap();

        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 4);
    }

    #[test]
    fn test_write_csv_uses_semicolons() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.csv");
        let mut df = records_to_frame(&EXPORT_TABLE, &trade_records()).unwrap();

        write_csv(&mut df, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("Id;País;Ano;Quantidade;Valor;Tipo"));
        assert!(lines.next().unwrap().starts_with("1;Alemanha;2020;"));
    }

    #[test]
    fn test_write_parquet() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.parquet");
        let mut df = records_to_frame(&EXPORT_TABLE, &trade_records()).unwrap();

        write_parquet(&mut df, &path, CompressionAlgorithm::Zstd).unwrap();

        let file = File::open(&path).unwrap();
        let read = ParquetReader::new(file).finish().unwrap();
        assert_eq!(read.height(), 2);
        assert_eq!(read.width(), 6);
    }
}
