//! Commercialization pipeline.
//!
//! Commercialization files list products instead of countries and carry a
//! single quantity per year. Fully uppercase product names are category
//! totals; mixed-case rows are their sub-items and are discarded so that
//! summing by product does not double count.

use super::reshape::melt;
use super::wide::WideTable;
use super::filter::drop_zero_quantity;
use crate::error::Result;
use crate::header::CommerceLayout;
use crate::models::{CommerceRecord, FileSource, TableRecord};
use std::collections::HashSet;
use tracing::debug;

/// Uppercase test for product names: at least one cased character and no
/// lowercase ones. Digits, spaces and punctuation are ignored.
pub fn is_category_total(product: &str) -> bool {
    let mut has_cased = false;
    for c in product.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}

/// Drop exact duplicate rows, keeping the first occurrence
pub fn drop_duplicate_rows(records: Vec<CommerceRecord>) -> Vec<CommerceRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| seen.insert(r.to_row()))
        .collect()
}

/// Reshape, keep category totals, deduplicate and drop zero quantities
pub fn normalize_commerce(source: &FileSource) -> Result<Vec<CommerceRecord>> {
    let table = WideTable::parse(source)?;
    let layout = CommerceLayout::analyze(&source.name, &table.headers)?;

    let long = melt(&table, layout.id_index, layout.product_index, &layout.years)?;
    let melted = long.len();

    let totals: Vec<CommerceRecord> = long
        .into_iter()
        .filter(|r| is_category_total(&r.entity))
        .map(|r| CommerceRecord {
            id: r.id,
            product: r.entity,
            year: r.column,
            quantity: r.value,
        })
        .collect();
    let uppercase = totals.len();

    let records = drop_zero_quantity(drop_duplicate_rows(totals));

    debug!(
        "Commercialization {}: {} melted, {} category totals, {} kept",
        source.name,
        melted,
        uppercase,
        records.len()
    );

    Ok(records)
}
