//! Aggregation of half-populated trade records into one record per year.
//!
//! The quantity column and the value column of the same year arrive as two
//! separate records after reshaping. Grouping by (Id, País, Ano) and summing
//! each field with nulls counted as zero reunites them.

use super::disambiguate::SplitRecord;
use std::collections::BTreeMap;
use tracing::debug;

/// Sum `quantity` and `value` per (id, country, year)
///
/// Output is ordered by the group key and always carries both fields; a group
/// whose inputs were all null sums to zero.
pub fn sum_by_year(records: Vec<SplitRecord>) -> Vec<SplitRecord> {
    let input_len = records.len();
    let mut groups: BTreeMap<(i64, String, i32), (f64, f64)> = BTreeMap::new();

    for record in records {
        let totals = groups
            .entry((record.id, record.country, record.year))
            .or_insert((0.0, 0.0));
        totals.0 += record.quantity.unwrap_or(0.0);
        totals.1 += record.value.unwrap_or(0.0);
    }

    let aggregated: Vec<SplitRecord> = groups
        .into_iter()
        .map(|((id, country, year), (quantity, value))| SplitRecord {
            id,
            country,
            year,
            quantity: Some(quantity),
            value: Some(value),
        })
        .collect();

    debug!(
        "Aggregated {} split records into {} yearly records",
        input_len,
        aggregated.len()
    );

    aggregated
}
