//! Turns raw `(start, end)` string pairs into validated [`DateRange`]s,
//! collecting one [`RangeIssue`] per rejected pair instead of failing the batch.

use std::collections::HashSet;

use tracing::debug;

use crate::prelude::*;
use crate::{DateRange, RangeError, RawRange};

/// Pipeline stage at which a range was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Stage {
    /// Rejected while preparing ranges for merging.
    #[display(fmt = " (merge stage)")]
    Merge,
    /// Rejected while preparing ranges for period accounting.
    #[display(fmt = "")]
    Accumulate,
}

/// A rejected input range.
///
/// Renders as `Range <k>: <reason>`, where `k` is the 1-based position of the
/// pair in the caller's original input, suffixed with ` (merge stage)` when
/// the merge stage rejected it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Range {index}: {error}{stage}")]
pub struct RangeIssue {
    pub index: usize,
    pub stage: Stage,
    #[source]
    pub error: RangeError,
}

/// Output of [`validate_ranges`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    /// Accepted ranges, deduplicated, in first-seen order.
    pub ranges: Vec<DateRange>,
    /// One entry per rejected input, in input order.
    pub issues: Vec<RangeIssue>,
}

impl Validation {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issue messages ready for display.
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }
}

/// Validates every raw item independently.
///
/// Malformed items and unparsable or reversed pairs are reported and
/// skipped; valid pairs that repeat an earlier one exactly are dropped
/// silently. Every issue from one call carries the same `stage`.
pub fn validate_ranges(raw: &[RawRange], stage: Stage) -> Validation {
    let mut seen = HashSet::with_capacity(raw.len());
    let mut validation = Validation::default();

    for (position, pair) in raw.iter().enumerate() {
        let index = position + 1;
        match pair.validate() {
            Ok(range) => {
                if seen.insert(range) {
                    validation.ranges.push(range);
                } else {
                    debug!(index, %range, "dropping duplicate range");
                }
            },
            Err(error) => {
                debug!(index, raw = %pair, %error, ?stage, "rejecting range");
                validation.issues.push(RangeIssue { index, stage, error });
            },
        }
    }

    validation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{init_test_logging, range, raw};

    #[test]
    fn test_all_valid_ranges_pass_through() {
        init_test_logging();
        let input = [raw("2024-01-01", "2024-01-05"), raw("2023-06-01", "2023-06-30")];
        let validation = validate_ranges(&input, Stage::Accumulate);

        assert!(validation.is_clean());
        assert_eq!(
            validation.ranges,
            vec![range("2024-01-01", "2024-01-05"), range("2023-06-01", "2023-06-30")]
        );
    }

    #[test]
    fn test_bad_ranges_are_reported_not_fatal() {
        init_test_logging();
        let input = [
            raw("2024-01-01", "2024-01-05"),
            raw("2024-02-30", "2024-03-01"),
            raw("2024-05-10", "2024-05-01"),
            raw("2024-07-01", "2024-07-02"),
        ];
        let validation = validate_ranges(&input, Stage::Accumulate);

        assert_eq!(
            validation.ranges,
            vec![range("2024-01-01", "2024-01-05"), range("2024-07-01", "2024-07-02")]
        );
        assert_eq!(
            validation.messages(),
            vec![
                "Range 2: Invalid date format".to_owned(),
                "Range 3: End date before start date".to_owned(),
            ]
        );
    }

    #[test]
    fn test_merge_stage_suffix() {
        let input = [raw("garbage", "2024-01-01"), raw("2024-01-02", "2024-01-01")];
        let validation = validate_ranges(&input, Stage::Merge);

        assert!(validation.ranges.is_empty());
        assert_eq!(
            validation.messages(),
            vec![
                "Range 1: Invalid date format (merge stage)".to_owned(),
                "Range 2: End date before start date (merge stage)".to_owned(),
            ]
        );
    }

    #[test]
    fn test_duplicates_keep_first_seen_order() {
        let input = [
            raw("2024-03-01", "2024-03-05"),
            raw("2024-01-01", "2024-01-05"),
            raw("2024-03-01", "2024-03-05"),
            // Same dates, different spelling: still a duplicate by value
            raw(" 2024-1-1", "2024-01-05 "),
        ];
        let validation = validate_ranges(&input, Stage::Accumulate);

        assert!(validation.is_clean());
        assert_eq!(
            validation.ranges,
            vec![range("2024-03-01", "2024-03-05"), range("2024-01-01", "2024-01-05")]
        );
    }

    #[test]
    fn test_issue_index_refers_to_original_position() {
        let input = [
            raw("2024-01-01", "2024-01-05"),
            raw("2024-01-01", "2024-01-05"),
            raw("nope", "nope"),
        ];
        let validation = validate_ranges(&input, Stage::Accumulate);

        assert_eq!(validation.issues.len(), 1);
        assert_eq!(validation.issues[0].index, 3);
        assert!(matches!(validation.issues[0].error, RangeError::InvalidFormat(_)));
    }

    #[test]
    fn test_empty_input() {
        let validation = validate_ranges(&[], Stage::Merge);
        assert!(validation.ranges.is_empty());
        assert!(validation.is_clean());
    }

    #[test]
    fn test_malformed_items_keep_their_position() {
        let input: Vec<RawRange> = serde_json::from_str(
            r#"[["2024-01-01", "2024-01-05"], ["2024-02-01"], [20240301, "2024-03-02"], ["2024-04-01", "2024-04-02"]]"#,
        )
        .unwrap();
        let validation = validate_ranges(&input, Stage::Accumulate);

        assert_eq!(
            validation.ranges,
            vec![range("2024-01-01", "2024-01-05"), range("2024-04-01", "2024-04-02")]
        );
        assert_eq!(
            validation.messages(),
            vec![
                "Range 2: Invalid date format".to_owned(),
                "Range 3: Invalid date format".to_owned(),
            ]
        );
    }
}
