//! Wide-to-long reshaping.
//!
//! Pivots the year columns of a [`WideTable`] into one record per
//! (wide row x year column). Nothing is dropped or merged here: the output
//! always holds exactly `rows * year_columns` records, ordered column by
//! column.

use super::wide::WideTable;
use crate::constants::MISSING_VALUE_TOKENS;
use crate::error::{Result, VitiError};
use tracing::debug;

/// One reshaped cell: identifier, entity, the classified year column and the
/// raw numeric value
#[derive(Debug, Clone, PartialEq)]
pub struct LongRecord<C> {
    pub id: i64,
    pub entity: String,
    pub column: C,
    pub value: Option<f64>,
}

/// Melt the given year columns of `table`
///
/// `columns` pairs a header position with its classification. Identifier
/// and numeric cells are parsed here, after classification, so a bad cell is
/// reported with its row and column.
pub fn melt<C: Copy>(
    table: &WideTable,
    id_index: usize,
    entity_index: usize,
    columns: &[(usize, C)],
) -> Result<Vec<LongRecord<C>>> {
    let id_column = column_name(table, id_index);
    let keys = table
        .rows
        .iter()
        .enumerate()
        .map(|(row, cells)| {
            let id = parse_id(&table.file_name, id_column, row + 1, &cells[id_index])?;
            Ok((id, cells[entity_index].as_str()))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut records = Vec::with_capacity(keys.len() * columns.len());
    for &(index, column) in columns {
        let name = column_name(table, index);
        for (row, (id, entity)) in keys.iter().enumerate() {
            let value = parse_number(&table.file_name, name, row + 1, &table.rows[row][index])?;
            records.push(LongRecord {
                id: *id,
                entity: (*entity).to_string(),
                column,
                value,
            });
        }
    }

    debug!(
        "Reshaped {}: {} rows x {} year columns -> {} records",
        table.file_name,
        keys.len(),
        columns.len(),
        records.len()
    );

    Ok(records)
}

fn column_name(table: &WideTable, index: usize) -> &str {
    table.headers.get(index).map(String::as_str).unwrap_or("")
}

/// Parse a row identifier; identifiers must be integers
pub fn parse_id(file: &str, column: &str, row: usize, raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| VitiError::invalid_value(file, column, row, raw))
}

/// Parse a numeric cell; empty cells and missing-value markers are null.
/// Only finite numbers are accepted.
pub fn parse_number(file: &str, column: &str, row: usize, raw: &str) -> Result<Option<f64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || MISSING_VALUE_TOKENS.contains(&trimmed) {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(Some(number)),
        _ => Err(VitiError::invalid_value(file, column, row, raw)),
    }
}
