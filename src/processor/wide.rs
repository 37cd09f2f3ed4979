//! Decoding of semicolon-delimited wide files into a header plus raw cells.

use crate::constants::CSV_DELIMITER;
use crate::error::{Result, VitiError};
use crate::models::FileSource;
use std::borrow::Cow;
use tracing::{debug, warn};

/// A wide file as read from disk: one header row and string cells
#[derive(Debug, Clone, PartialEq)]
pub struct WideTable {
    pub file_name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl WideTable {
    /// Parse an uploaded file. Rows shorter than the header are padded with
    /// empty cells and longer rows are cut to the header width.
    pub fn parse(source: &FileSource) -> Result<Self> {
        let decoded = decode(source);
        let text = decoded.strip_prefix('\u{feff}').unwrap_or(&*decoded);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(CSV_DELIMITER)
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut headers: Vec<String> = reader
            .headers()
            .map_err(|e| VitiError::Csv {
                file: source.name.clone(),
                source: e,
            })?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        // Trailing delimiters leave unnamed columns behind
        while headers.last().is_some_and(|h| h.is_empty()) {
            headers.pop();
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| VitiError::Csv {
                file: source.name.clone(),
                source: e,
            })?;
            if record.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        debug!(
            "Read {}: {} columns, {} rows",
            source.name,
            headers.len(),
            rows.len()
        );

        Ok(Self {
            file_name: source.name.clone(),
            headers,
            rows,
        })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

fn decode(source: &FileSource) -> Cow<'_, str> {
    match std::str::from_utf8(&source.bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            warn!(
                "{} is not valid UTF-8, replacing invalid sequences",
                source.name
            );
            String::from_utf8_lossy(&source.bytes)
        }
    }
}
