//! Capacity enforcement for the two memory tiers.
//!
//! Short-term memory is a FIFO window; long-term memory is ranked by
//! importance with a stable sort, so equal-importance records keep their
//! insertion order and the newest of a tied group is the first to go.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;

use super::MemoryRecord;

/// Drop the oldest entries until `records.len() <= cap`.
///
/// Returns how many entries were dropped.
pub fn evict_oldest<T>(records: &mut Vec<T>, cap: usize) -> usize {
    let excess = records.len().saturating_sub(cap);
    if excess > 0 {
        records.drain(..excess);
    }
    excess
}

/// Re-rank by importance (descending, stable) and truncate to `cap`.
///
/// Returns the evicted records, most important first.
pub fn retain_most_important(records: &mut Vec<MemoryRecord>, cap: usize) -> Vec<MemoryRecord> {
    records.sort_by_key(|r| Reverse(OrderedFloat(r.importance)));
    if records.len() > cap {
        records.split_off(cap)
    } else {
        Vec::new()
    }
}

/// Lowest importance currently held, if any.
#[must_use]
pub fn min_importance(records: &[MemoryRecord]) -> Option<f32> {
    records
        .iter()
        .map(|r| OrderedFloat(r.importance))
        .min()
        .map(OrderedFloat::into_inner)
}
