//! Per-calculation configuration.
//!
//! The engine never falls back to process-wide defaults: every calculation is
//! handed a [`CalculationConfig`]. The defaults below exist for boundary
//! layers that need to fill in missing request fields.

use serde::{Deserialize, Serialize};

use crate::Anchor;

/// Default anchor month (September).
pub const DEFAULT_ANCHOR_MONTH: u32 = 9;
/// Default anchor day.
pub const DEFAULT_ANCHOR_DAY: u32 = 17;
/// Default anchor: every September 17th.
pub const DEFAULT_ANCHOR: Anchor = Anchor::from_static(9, 17);
/// Default minimum days per anchor year.
pub const DEFAULT_MIN_DAYS: u32 = 183;

/// Commonly used anchor years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnchorPreset {
    /// September 17th to September 16th.
    SeptYear,
    /// January 1st to December 31st.
    CalendarYear,
    /// US federal fiscal year, October 1st to September 30th.
    FiscalYearUs,
    /// September 1st to August 31st.
    AcademicYear,
}

impl AnchorPreset {
    pub const ALL: [Self; 4] = [Self::SeptYear, Self::CalendarYear, Self::FiscalYearUs, Self::AcademicYear];

    pub const fn anchor(self) -> Anchor {
        match self {
            Self::SeptYear => DEFAULT_ANCHOR,
            Self::CalendarYear => Anchor::from_static(1, 1),
            Self::FiscalYearUs => Anchor::from_static(10, 1),
            Self::AcademicYear => Anchor::from_static(9, 1),
        }
    }

    /// Human-readable name.
    pub const fn label(self) -> &'static str {
        match self {
            Self::SeptYear => "Sept-Year",
            Self::CalendarYear => "Calendar Year",
            Self::FiscalYearUs => "Fiscal Year (US)",
            Self::AcademicYear => "Academic Year",
        }
    }
}

impl From<AnchorPreset> for Anchor {
    fn from(preset: AnchorPreset) -> Self {
        preset.anchor()
    }
}

/// Everything a calculation needs besides the ranges themselves.
///
/// # Example
///
/// ```
/// use anchor_year::{Anchor, CalculationConfig};
///
/// let anchor = Anchor::new(9, 17).unwrap();
/// let config = CalculationConfig::new(anchor, 183)
///     .with_merge_overlaps(true)
///     .with_heatmap(true);
///
/// assert_eq!(config.min_days(), 183);
/// assert!(config.merge_overlaps());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalculationConfig {
    anchor:         Anchor,
    /// A period passes when it counts at least this many days.
    min_days:       u32,
    /// Coalesce overlapping/adjacent ranges before counting.
    merge_overlaps: bool,
    /// Collect the contributing days per period.
    heatmap:        bool,
    /// Reject requests whose accounted ranges cover more days than this.
    max_span_days:  Option<u64>,
}

impl CalculationConfig {
    /// Creates a configuration with merging and heatmap off and no span cap.
    pub const fn new(anchor: Anchor, min_days: u32) -> Self {
        Self {
            anchor,
            min_days,
            merge_overlaps: false,
            heatmap: false,
            max_span_days: None,
        }
    }

    pub const fn with_merge_overlaps(mut self, merge_overlaps: bool) -> Self {
        self.merge_overlaps = merge_overlaps;
        self
    }

    pub const fn with_heatmap(mut self, heatmap: bool) -> Self {
        self.heatmap = heatmap;
        self
    }

    /// Caps the total day span a calculation may account for.
    pub const fn with_max_span_days(mut self, max_span_days: u64) -> Self {
        self.max_span_days = Some(max_span_days);
        self
    }

    pub const fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub const fn min_days(&self) -> u32 {
        self.min_days
    }

    pub const fn merge_overlaps(&self) -> bool {
        self.merge_overlaps
    }

    pub const fn heatmap(&self) -> bool {
        self.heatmap
    }

    pub const fn max_span_days(&self) -> Option<u64> {
        self.max_span_days
    }
}

impl Default for CalculationConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ANCHOR, DEFAULT_MIN_DAYS)
    }
}
