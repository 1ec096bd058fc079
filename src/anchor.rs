use std::cmp::{max, min};
use std::num::NonZeroU8;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::consts::{LEAP_REFERENCE_YEAR, MAX_DAY, MIN_DAY, PERIOD_LABEL_SEPARATOR};
use crate::date::clamped_date;
use crate::prelude::*;
use crate::types::{Day, Month};
use crate::{DateRange, ParseError};

/// Rejected anchor configuration. Request-level: nothing is computed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnchorError {
    #[error("anchor_month must be between 1 and 12, got {0}")]
    InvalidMonth(u32),

    #[error("anchor_day must be between 1 and 31, got {0}")]
    InvalidDay(u32),

    /// The pair does not exist even in a leap year (e.g. 2/30, 4/31).
    #[error("Invalid anchor date: month {month} doesn't have {day} days")]
    NonexistentDate { month: u32, day: u32 },
}

/// The (month, day) on which every anchor year begins.
///
/// Guaranteed to name a date that exists in at least a leap year. Feb 29 is
/// accepted and clamped to Feb 28 in years without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(try_from = "AnchorRepr", into = "AnchorRepr")]
#[display(fmt = "{:02}-{:02}", "month.get()", "day.get()")]
pub struct Anchor {
    month: Month,
    day:   Day,
}

#[derive(Serialize, Deserialize)]
struct AnchorRepr {
    month: u32,
    day:   u32,
}

impl Anchor {
    /// Validates an anchor month/day pair.
    ///
    /// # Errors
    /// Returns `AnchorError` if the month is outside 1-12, the day outside
    /// 1-31, or the pair does not exist in any year.
    pub fn new(month: u32, day: u32) -> Result<Self, AnchorError> {
        let month_u8 = u8::try_from(month).map_err(|_| AnchorError::InvalidMonth(month))?;
        let month_typed = Month::new(month_u8).map_err(|_| AnchorError::InvalidMonth(month))?;

        let day_u8 = u8::try_from(day)
            .ok()
            .filter(|d| (MIN_DAY..=MAX_DAY).contains(d))
            .ok_or(AnchorError::InvalidDay(day))?;
        let day_typed = Day::new(day_u8, LEAP_REFERENCE_YEAR, month_u8)
            .map_err(|_| AnchorError::NonexistentDate { month, day })?;

        Ok(Self {
            month: month_typed,
            day:   day_typed,
        })
    }

    /// Builds an anchor from literals known to be valid, for constants.
    /// A zero component fails const evaluation.
    pub(crate) const fn from_static(month: u8, day: u8) -> Self {
        match (NonZeroU8::new(month), NonZeroU8::new(day)) {
            (Some(month), Some(day)) => Self {
                month: Month(month),
                day:   Day(day),
            },
            _ => panic!("anchor constants must be non-zero"),
        }
    }

    pub const fn month(&self) -> u8 {
        self.month.get()
    }

    pub const fn day(&self) -> u8 {
        self.day.get()
    }

    /// The anchor date in `year`, clamped to the month's last day when needed.
    pub fn date_in(&self, year: i32) -> NaiveDate {
        clamped_date(year, self.month, self.day)
    }

    /// Start of the anchor year containing `date`.
    pub fn period_start(&self, date: NaiveDate) -> NaiveDate {
        let candidate = self.date_in(date.year());
        if date < candidate {
            self.date_in(date.year().saturating_sub(1))
        } else {
            candidate
        }
    }

    /// Start of the anchor year after the one starting at `period_start`.
    ///
    /// Recomputed from the anchor rather than from `period_start`, so a
    /// clamped Feb 28 start is followed by Feb 29 in a leap year.
    pub fn next_period_start(&self, period_start: NaiveDate) -> NaiveDate {
        self.date_in(period_start.year().saturating_add(1))
    }

    /// The full anchor-year period containing `date`.
    pub fn period_containing(&self, date: NaiveDate) -> AnchorPeriod {
        let start = self.period_start(date);
        AnchorPeriod {
            start,
            next_start: self.next_period_start(start),
        }
    }
}

impl TryFrom<AnchorRepr> for Anchor {
    type Error = AnchorError;

    fn try_from(repr: AnchorRepr) -> Result<Self, Self::Error> {
        Self::new(repr.month, repr.day)
    }
}

impl From<Anchor> for AnchorRepr {
    fn from(anchor: Anchor) -> Self {
        Self {
            month: u32::from(anchor.month()),
            day:   u32::from(anchor.day()),
        }
    }
}

/// Free-function form of [`Anchor::period_start`].
pub fn period_start(date: NaiveDate, anchor: Anchor) -> NaiveDate {
    anchor.period_start(date)
}

/// Free-function form of [`Anchor::next_period_start`].
pub fn next_period_start(period_start: NaiveDate, anchor: Anchor) -> NaiveDate {
    anchor.next_period_start(period_start)
}

/// A half-open anchor year `[start, next_start)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnchorPeriod {
    start:      NaiveDate,
    next_start: NaiveDate,
}

impl AnchorPeriod {
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Exclusive end: the anchor date of the following year.
    pub const fn next_start(&self) -> NaiveDate {
        self.next_start
    }

    /// Last day belonging to this period.
    pub fn end_inclusive(&self) -> NaiveDate {
        self.next_start.pred_opt().unwrap_or(self.next_start)
    }

    pub fn label(&self) -> PeriodLabel {
        PeriodLabel(self.start.year())
    }

    /// Number of days in the period (365 or 366).
    pub fn len_days(&self) -> i64 {
        self.next_start.signed_duration_since(self.start).num_days()
    }

    /// Intersection of `range` with this period, if any day is shared.
    pub fn overlap(&self, range: &DateRange) -> Option<DateRange> {
        let start = max(range.start(), self.start);
        let end = min(range.end(), self.end_inclusive());
        DateRange::new(start, end).ok()
    }

    /// The period immediately following this one.
    pub fn next(&self, anchor: Anchor) -> Self {
        Self {
            start:      self.next_start,
            next_start: anchor.next_period_start(self.next_start),
        }
    }
}

/// Identifies an anchor year by the calendar year it starts in.
///
/// Rendered as `"2023-2024"`; ordering follows the start year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{}{}{}", "_0", PERIOD_LABEL_SEPARATOR, "_0 + 1")]
pub struct PeriodLabel(i32);

impl PeriodLabel {
    pub const fn new(start_year: i32) -> Self {
        Self(start_year)
    }

    pub const fn start_year(self) -> i32 {
        self.0
    }
}

impl FromStr for PeriodLabel {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidFormat(s.to_owned());
        let (first, second) = s.trim().split_once(PERIOD_LABEL_SEPARATOR).ok_or_else(invalid)?;
        let first: i32 = first.parse().map_err(|_| invalid())?;
        let second: i32 = second.parse().map_err(|_| invalid())?;
        if first.checked_add(1) != Some(second) {
            return Err(invalid());
        }
        Ok(Self(first))
    }
}

impl Serialize for PeriodLabel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PeriodLabel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
