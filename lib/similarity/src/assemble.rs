//! Result assembly: merge manual and automatic results, drop duplicates and
//! the current record, truncate.

use ahash::AHashSet;
use relata_core::{Identify, RecordId};

/// Automatic results whose identity is not already among the manual ones.
pub fn remove_duplicates<T: Identify>(manual: &[T], auto: Vec<T>) -> Vec<T> {
    let manual_ids: AHashSet<&RecordId> = manual.iter().map(|item| item.record_id()).collect();

    auto.into_iter()
        .filter(|item| !manual_ids.contains(item.record_id()))
        .collect()
}

pub fn exclude_current<T: Identify>(results: Vec<T>, current: &RecordId) -> Vec<T> {
    results
        .into_iter()
        .filter(|item| item.record_id() != current)
        .collect()
}

/// Manual results first, then the automatic results not already linked
/// manually; without `current`, each identity once, at most `limit` long.
pub fn assemble<T: Identify>(
    manual: Vec<T>,
    auto: Vec<T>,
    current: &RecordId,
    limit: usize,
) -> Vec<T> {
    let auto = remove_duplicates(&manual, auto);

    let mut merged = manual;
    merged.extend(auto);

    let mut seen: AHashSet<RecordId> = AHashSet::with_capacity(merged.len());
    let mut results: Vec<T> = exclude_current(merged, current)
        .into_iter()
        .filter(|item| seen.insert(item.record_id().clone()))
        .collect();

    results.truncate(limit);
    results
}
