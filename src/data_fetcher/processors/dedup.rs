use crate::data_fetcher::models::{RecordKey, StatRecord};
use std::collections::HashSet;

/// Result of deduplicating one tab's candidates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DedupOutcome {
    /// Records to append, in candidate order
    pub fresh: Vec<StatRecord>,
    /// Candidates whose key was already in the tab
    pub already_present: usize,
    /// Candidates dropped because an earlier candidate had the same key
    pub repeated_in_batch: usize,
}

/// Drops candidates whose key is in `existing`, and every candidate after
/// the first one carrying a given key.
pub fn dedup_with_stats(
    candidates: Vec<StatRecord>,
    existing: &HashSet<RecordKey>,
) -> DedupOutcome {
    let mut seen: HashSet<RecordKey> = HashSet::new();
    let mut outcome = DedupOutcome::default();

    for record in candidates {
        if existing.contains(&record.key) {
            outcome.already_present += 1;
        } else if !seen.insert(record.key.clone()) {
            outcome.repeated_in_batch += 1;
        } else {
            outcome.fresh.push(record);
        }
    }

    outcome
}

/// Candidates not yet present in the tab, one per key, first occurrence wins.
pub fn dedup(candidates: Vec<StatRecord>, existing: &HashSet<RecordKey>) -> Vec<StatRecord> {
    dedup_with_stats(candidates, existing).fresh
}
