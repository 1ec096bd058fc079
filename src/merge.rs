//! Coalescing of overlapping or adjacent ranges.

use tracing::debug;

use crate::DateRange;

/// Sorts `ranges` by start and folds every range that overlaps or directly
/// follows the running one into it.
///
/// The result is sorted, pairwise disjoint, separated by at least one
/// uncovered day, and covers exactly the same days as the input.
pub fn merge_ranges(ranges: &[DateRange]) -> Vec<DateRange> {
    let mut sorted = ranges.to_vec();
    sorted.sort_unstable();

    let mut merged: Vec<DateRange> = Vec::with_capacity(sorted.len());
    for range in sorted {
        match merged.last_mut() {
            Some(running) if running.touches(&range) => *running = running.cover(&range),
            _ => merged.push(range),
        }
    }

    debug!(input = ranges.len(), output = merged.len(), "merged ranges");
    merged
}
