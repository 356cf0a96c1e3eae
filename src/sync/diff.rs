//! Date range, diff and latest-snapshot selection

use std::collections::BTreeSet;

use crate::types::{DateKey, SnapshotDescriptor};

/// Every calendar date from the earliest to the latest descriptor,
/// inclusive. Empty when there are no descriptors.
pub fn full_date_range(descriptors: &[SnapshotDescriptor]) -> Vec<DateKey> {
    let dates = descriptors.iter().map(|d| d.real_data_date);
    match (dates.clone().min(), dates.max()) {
        (Some(start), Some(end)) => DateKey::range_inclusive(start, end),
        _ => Vec::new(),
    }
}

/// Dates needing (re)processing: `(range \ persisted) ∪ {max(range)}`.
///
/// The newest date is always included so late upstream corrections are
/// picked up. Empty only when `range` is empty.
pub fn compute_diff(range: &[DateKey], persisted: &BTreeSet<DateKey>) -> BTreeSet<DateKey> {
    let mut diff: BTreeSet<DateKey> = range
        .iter()
        .filter(|date| !persisted.contains(*date))
        .copied()
        .collect();
    if let Some(&newest) = range.iter().max() {
        diff.insert(newest);
    }
    diff
}

/// Mark exactly one descriptor, the one with the greatest date, as latest.
pub fn mark_latest(descriptors: &mut [SnapshotDescriptor]) -> Option<DateKey> {
    mark_latest_from(descriptors, None)
}

/// Mark the newest descriptor dated at or after `floor` as latest.
///
/// Returns the marked date, `None` if nothing qualifies. Any previous marks
/// are cleared so at most one descriptor carries the flag.
pub fn mark_latest_from(
    descriptors: &mut [SnapshotDescriptor],
    floor: Option<DateKey>,
) -> Option<DateKey> {
    for d in descriptors.iter_mut() {
        d.is_latest = false;
    }

    let chosen = descriptors
        .iter_mut()
        .filter(|d| floor.map_or(true, |floor| d.real_data_date >= floor))
        .max_by_key(|d| d.real_data_date)?;
    chosen.is_latest = true;
    Some(chosen.real_data_date)
}
