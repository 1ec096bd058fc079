//! The full calculation pipeline and its request/response boundary.
//!
//! `validate -> (merge) -> accumulate -> evaluate`, with per-range problems
//! reported alongside the result and only configuration problems failing the
//! request as a whole.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::accumulate::{Accumulation, Heatmap, PeriodTotals, accumulate};
use crate::config::{DEFAULT_ANCHOR_DAY, DEFAULT_ANCHOR_MONTH, DEFAULT_MIN_DAYS};
use crate::merge::merge_ranges;
use crate::threshold::{Evaluation, evaluate};
use crate::validate::{RangeIssue, Stage, Validation, validate_ranges};
use crate::{Anchor, AnchorError, CalculationConfig, DateRange, PeriodLabel, RawRange};

/// Request-level failures. Nothing is computed when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalcError {
    #[error(transparent)]
    InvalidAnchor(#[from] AnchorError),

    #[error("ranges cover {total} days, more than the allowed {limit}")]
    SpanLimitExceeded { total: u64, limit: u64 },
}

/// Result of [`calculate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calculation {
    pub config:       CalculationConfig,
    /// The ranges that were accounted: merged when merging was enabled.
    pub ranges:       Vec<DateRange>,
    /// Rejected inputs in input order, all tagged with the single stage that
    /// validated them.
    pub issues:       Vec<RangeIssue>,
    pub totals:       PeriodTotals,
    pub passes:       BTreeMap<PeriodLabel, bool>,
    pub overall_pass: bool,
    pub heatmap:      Option<Heatmap>,
}

impl Calculation {
    /// Issue messages in report order.
    pub fn error_messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }
}

/// Runs the whole pipeline over `raw` with an explicit `config`.
///
/// # Errors
/// Returns `CalcError::SpanLimitExceeded` when the config caps the day span
/// and the accepted ranges exceed it. Malformed ranges are never an error;
/// they are reported in [`Calculation::issues`].
#[instrument(
    level = "debug",
    skip_all,
    fields(ranges = raw.len(), anchor = %config.anchor(), merge = config.merge_overlaps())
)]
pub fn calculate(raw: &[RawRange], config: &CalculationConfig) -> Result<Calculation, CalcError> {
    let stage = if config.merge_overlaps() {
        Stage::Merge
    } else {
        Stage::Accumulate
    };
    let Validation { ranges, issues } = validate_ranges(raw, stage);

    let ranges = if config.merge_overlaps() {
        merge_ranges(&ranges)
    } else {
        ranges
    };

    if let Some(limit) = config.max_span_days() {
        let total: u64 = ranges.iter().map(DateRange::len_days).sum();
        if total > limit {
            debug!(total, limit, "rejecting calculation over span limit");
            return Err(CalcError::SpanLimitExceeded { total, limit });
        }
    }

    let Accumulation { totals, heatmap } = accumulate(&ranges, config.anchor(), config.heatmap());
    let Evaluation { passes, overall_pass } = evaluate(&totals, config.min_days());

    debug!(
        accepted = ranges.len(),
        rejected = issues.len(),
        periods = totals.len(),
        overall_pass,
        "calculation complete"
    );

    Ok(Calculation {
        config: *config,
        ranges,
        issues,
        totals,
        passes,
        overall_pass,
        heatmap,
    })
}

const fn default_anchor_month() -> u32 {
    DEFAULT_ANCHOR_MONTH
}

const fn default_anchor_day() -> u32 {
    DEFAULT_ANCHOR_DAY
}

const fn default_min_days() -> u32 {
    DEFAULT_MIN_DAYS
}

/// Wire shape of a calculation request.
///
/// ```json
/// {"ranges": [["2023-09-01", "2024-03-01"]], "anchorMonth": 9, "anchorDay": 17,
///  "minDays": 183, "mergeOverlaps": false, "heatmap": false}
/// ```
///
/// Missing fields take the defaults from [`crate::config`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateRequest {
    #[serde(default)]
    pub ranges:         Vec<RawRange>,
    #[serde(default = "default_anchor_month")]
    pub anchor_month:   u32,
    #[serde(default = "default_anchor_day")]
    pub anchor_day:     u32,
    #[serde(default = "default_min_days")]
    pub min_days:       u32,
    #[serde(default)]
    pub merge_overlaps: bool,
    #[serde(default)]
    pub heatmap:        bool,
}

impl Default for CalculateRequest {
    fn default() -> Self {
        Self {
            ranges:         Vec::new(),
            anchor_month:   DEFAULT_ANCHOR_MONTH,
            anchor_day:     DEFAULT_ANCHOR_DAY,
            min_days:       DEFAULT_MIN_DAYS,
            merge_overlaps: false,
            heatmap:        false,
        }
    }
}

impl CalculateRequest {
    /// Validates the anchor and builds the calculation config.
    ///
    /// # Errors
    /// Returns `AnchorError` if the anchor month/day is invalid.
    pub fn config(&self) -> Result<CalculationConfig, AnchorError> {
        let anchor = Anchor::new(self.anchor_month, self.anchor_day)?;
        Ok(CalculationConfig::new(anchor, self.min_days)
            .with_merge_overlaps(self.merge_overlaps)
            .with_heatmap(self.heatmap))
    }

    /// Runs the request without a span cap.
    ///
    /// # Errors
    /// Returns `CalcError::InvalidAnchor` for a bad anchor.
    pub fn evaluate(&self) -> Result<CalculateResponse, CalcError> {
        let config = self.config()?;
        calculate(&self.ranges, &config).map(CalculateResponse::from)
    }
}

/// Wire shape of a calculation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculateResponse {
    pub totals:         PeriodTotals,
    pub errors:         Vec<String>,
    pub passes:         BTreeMap<PeriodLabel, bool>,
    pub overall_pass:   bool,
    pub threshold:      u32,
    pub anchor:         Anchor,
    pub merge_overlaps: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heatmap:        Option<BTreeMap<PeriodLabel, Vec<String>>>,
}

impl From<Calculation> for CalculateResponse {
    fn from(calculation: Calculation) -> Self {
        let errors = calculation.error_messages();
        let heatmap = calculation.heatmap.map(|heatmap| {
            heatmap
                .into_iter()
                .map(|(label, days)| (label, days.to_iso_strings()))
                .collect()
        });

        Self {
            totals: calculation.totals,
            errors,
            passes: calculation.passes,
            overall_pass: calculation.overall_pass,
            threshold: calculation.config.min_days(),
            anchor: calculation.config.anchor(),
            merge_overlaps: calculation.config.merge_overlaps(),
            heatmap,
        }
    }
}
