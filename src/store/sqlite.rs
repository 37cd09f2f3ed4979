//! SQLite-backed table store.

use super::TableStore;
use crate::error::{Result, VitiError};
use crate::models::{Cell, DedupStrategy, SqlType, StoredRow, TableSchema};
use rusqlite::types::{ToSqlOutput, Value, ValueRef};
use rusqlite::{Connection, ToSql, params_from_iter};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Normalized tables stored in a SQLite database
pub struct SqliteStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open (or create) the database file, creating parent directories
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)
            .map_err(|e| VitiError::storage(path.display().to_string(), e))?;
        info!("Opened database {}", path.display());

        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| VitiError::storage(":memory:", e))?;
        Ok(Self { conn, path: None })
    }

    /// Database file, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Check if a table exists in the database
    pub fn table_exists(&self, table_name: &str) -> Result<bool> {
        table_exists(&self.conn, table_name).map_err(|e| VitiError::storage(table_name, e))
    }
}

impl TableStore for SqliteStore {
    fn read(&self, schema: &TableSchema) -> Result<Option<Vec<StoredRow>>> {
        if !self.table_exists(schema.name)? {
            debug!("Table {} does not exist yet", schema.name);
            return Ok(None);
        }

        let rows = select_all(&self.conn, schema).map_err(|e| {
            error!("Reading {} failed: {}", schema.name, e);
            VitiError::storage(schema.name, e)
        })?;
        debug!("Read {} rows from {}", rows.len(), schema.name);

        Ok(Some(rows))
    }

    fn append(
        &mut self,
        schema: &TableSchema,
        rows: &[StoredRow],
        strategy: DedupStrategy,
    ) -> Result<usize> {
        let written = write_rows(&mut self.conn, schema, rows, strategy).map_err(|e| {
            error!("Appending to {} failed: {}", schema.name, e);
            VitiError::storage(schema.name, e)
        })?;
        debug!(
            "Appended {} of {} rows to {}",
            written,
            rows.len(),
            schema.name
        );

        Ok(written)
    }
}

fn table_exists(conn: &Connection, table_name: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
        [table_name],
        |row| row.get::<_, i64>(0).map(|v| v > 0),
    )
}

fn select_all(conn: &Connection, schema: &TableSchema) -> rusqlite::Result<Vec<StoredRow>> {
    let columns = schema
        .columns
        .iter()
        .map(|c| quote_ident(c.name))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!("SELECT {} FROM {}", columns, quote_ident(schema.name));

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| {
            let mut cells = Vec::with_capacity(schema.columns.len());
            for (i, column) in schema.columns.iter().enumerate() {
                cells.push(read_cell(row.get_ref(i)?, column.sql_type));
            }
            Ok(StoredRow(cells))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

fn write_rows(
    conn: &mut Connection,
    schema: &TableSchema,
    rows: &[StoredRow],
    strategy: DedupStrategy,
) -> rusqlite::Result<usize> {
    let tx = conn.transaction()?;
    tx.execute_batch(&create_table_sql(schema))?;
    if strategy == DedupStrategy::NaturalKey {
        tx.execute_batch(&create_key_index_sql(schema))?;
    }

    let mut written = 0;
    {
        let mut stmt = tx.prepare(&insert_sql(schema, strategy))?;
        for row in rows {
            written += stmt.execute(params_from_iter(row.0.iter()))?;
        }
    }

    tx.commit()?;
    Ok(written)
}

fn create_table_sql(schema: &TableSchema) -> String {
    let columns = schema
        .columns
        .iter()
        .map(|c| format!("{} {}", quote_ident(c.name), c.sql_type.as_sql()))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quote_ident(schema.name),
        columns
    )
}

fn create_key_index_sql(schema: &TableSchema) -> String {
    let key = schema
        .key_columns
        .iter()
        .map(|c| quote_ident(c))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "CREATE UNIQUE INDEX IF NOT EXISTS {} ON {} ({})",
        quote_ident(&format!("{}_natural_key", schema.name)),
        quote_ident(schema.name),
        key
    )
}

fn insert_sql(schema: &TableSchema, strategy: DedupStrategy) -> String {
    let verb = match strategy {
        DedupStrategy::ExactRow => "INSERT",
        DedupStrategy::NaturalKey => "INSERT OR IGNORE",
    };
    let columns = schema
        .columns
        .iter()
        .map(|c| quote_ident(c.name))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=schema.columns.len())
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{} INTO {} ({}) VALUES ({})",
        verb,
        quote_ident(schema.name),
        columns,
        placeholders
    )
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Coerce a stored value to the declared column type so rows read back compare
/// equal to freshly normalized ones
fn read_cell(value: ValueRef<'_>, sql_type: SqlType) -> Cell {
    match (value, sql_type) {
        (ValueRef::Null, _) => Cell::Null,
        (ValueRef::Integer(v), SqlType::Real) => Cell::Real(v as f64),
        (ValueRef::Integer(v), SqlType::Text) => Cell::Text(v.to_string()),
        (ValueRef::Integer(v), SqlType::Integer) => Cell::Integer(v),
        (ValueRef::Real(v), SqlType::Integer) if v.fract() == 0.0 => Cell::Integer(v as i64),
        (ValueRef::Real(v), _) => Cell::Real(v),
        (ValueRef::Text(t), _) => text_cell(&String::from_utf8_lossy(t), sql_type),
        (ValueRef::Blob(t), _) => Cell::Text(String::from_utf8_lossy(t).into_owned()),
    }
}

/// Tables written by other tools may hold numbers in TEXT columns
fn text_cell(text: &str, sql_type: SqlType) -> Cell {
    let trimmed = text.trim();
    match sql_type {
        SqlType::Integer => match trimmed.parse::<i64>() {
            Ok(v) => Cell::Integer(v),
            Err(_) => match trimmed.parse::<f64>() {
                Ok(v) if v.is_finite() && v.fract() == 0.0 => Cell::Integer(v as i64),
                _ => Cell::Text(text.to_string()),
            },
        },
        SqlType::Real => match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Cell::Real(v),
            _ => Cell::Text(text.to_string()),
        },
        SqlType::Text => Cell::Text(text.to_string()),
    }
}

impl ToSql for Cell {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Cell::Null => ToSqlOutput::Owned(Value::Null),
            Cell::Integer(v) => ToSqlOutput::Owned(Value::Integer(*v)),
            Cell::Real(v) => ToSqlOutput::Owned(Value::Real(*v)),
            Cell::Text(v) => ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes())),
        })
    }
}
