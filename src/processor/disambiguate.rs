//! Value/quantity disambiguation of reshaped trade records.

use super::reshape::LongRecord;
use crate::header::YearColumn;

/// A reshaped trade record with its value routed to the matching field.
/// At most one of `quantity` and `value` is populated.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitRecord {
    pub id: i64,
    pub country: String,
    pub year: i32,
    pub quantity: Option<f64>,
    pub value: Option<f64>,
}

/// Route a record to `quantity` or `value` according to its year column.
/// Pure and order independent; the year is already stripped of any suffix.
pub fn disambiguate(record: LongRecord<YearColumn>) -> SplitRecord {
    let (quantity, value) = match record.column {
        YearColumn::Quantity(_) => (record.value, None),
        YearColumn::Value(_) => (None, record.value),
    };

    SplitRecord {
        id: record.id,
        country: record.entity,
        year: record.column.year(),
        quantity,
        value,
    }
}

pub fn disambiguate_all(records: Vec<LongRecord<YearColumn>>) -> Vec<SplitRecord> {
    records.into_iter().map(disambiguate).collect()
}
