//! Read-side queries over stored tables.

use super::TableStore;
use crate::constants::normalized_columns;
use crate::error::{Result, VitiError};
use crate::models::{StoredRow, TableSchema};

fn year_index(schema: &TableSchema) -> Result<usize> {
    schema.column_index(normalized_columns::YEAR).ok_or_else(|| {
        VitiError::schema(
            schema.name,
            format!("table has no '{}' column", normalized_columns::YEAR),
        )
    })
}

fn row_year(row: &StoredRow, index: usize) -> Option<i64> {
    row.get(index).and_then(|cell| cell.as_i64())
}

/// Most recent `Ano` stored in the table; `None` when the table is absent or
/// empty
pub fn latest_year<S>(store: &S, schema: &TableSchema) -> Result<Option<i32>>
where
    S: TableStore + ?Sized,
{
    let index = year_index(schema)?;
    let rows = store.read(schema)?.unwrap_or_default();

    Ok(rows
        .iter()
        .filter_map(|row| row_year(row, index))
        .max()
        .and_then(|year| i32::try_from(year).ok()))
}

/// Rows with `Ano >= latest - years`, sorted by `Ano` ascending
pub fn recent_rows<S>(store: &S, schema: &TableSchema, years: i32) -> Result<Vec<StoredRow>>
where
    S: TableStore + ?Sized,
{
    let index = year_index(schema)?;
    let rows = store.read(schema)?.unwrap_or_default();

    let Some(latest) = rows.iter().filter_map(|row| row_year(row, index)).max() else {
        return Ok(Vec::new());
    };
    let cutoff = latest - i64::from(years);

    let mut recent: Vec<StoredRow> = rows
        .into_iter()
        .filter(|row| row_year(row, index).is_some_and(|year| year >= cutoff))
        .collect();
    recent.sort_by_key(|row| row_year(row, index));

    Ok(recent)
}
