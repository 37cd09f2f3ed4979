//! Zero-row filtering.
//!
//! Runs after aggregation: before it, every trade record is only half
//! populated and would look empty.

use crate::models::{CommerceRecord, TradeRecord};
use tracing::debug;

/// A trade record with both fields exactly zero carries no information.
/// Nulls are not zeros.
pub fn is_empty_trade(record: &TradeRecord) -> bool {
    record.quantity == Some(0.0) && record.value == Some(0.0)
}

pub fn drop_empty_trade(records: Vec<TradeRecord>) -> Vec<TradeRecord> {
    let before = records.len();
    let kept: Vec<TradeRecord> = records.into_iter().filter(|r| !is_empty_trade(r)).collect();
    debug!("Zero filter dropped {} of {} trade records", before - kept.len(), before);
    kept
}

pub fn drop_zero_quantity(records: Vec<CommerceRecord>) -> Vec<CommerceRecord> {
    let before = records.len();
    let kept: Vec<CommerceRecord> = records
        .into_iter()
        .filter(|r| r.quantity != Some(0.0))
        .collect();
    debug!(
        "Zero filter dropped {} of {} commercialization records",
        before - kept.len(),
        before
    );
    kept
}
