use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date::{format_iso, next_day, parse_iso_date};
use crate::{ParseError, prelude::*};

/// Separator used by the `start/end` text form of a range.
pub const RANGE_SEPARATOR: char = '/';

/// An inclusive span of calendar days.
/// The start date is always less than or equal to the end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{start}/{end}")]
pub struct DateRange {
    start: NaiveDate,
    end:   NaiveDate,
}

/// Why a single input range was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// One of the endpoints is not a `YYYY-MM-DD` date.
    #[error("Invalid date format")]
    InvalidFormat(#[source] ParseError),

    /// Both endpoints parse but are in the wrong order.
    #[error("End date before start date")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

impl DateRange {
    /// Creates a new date range with validation.
    ///
    /// # Errors
    /// Returns `RangeError::EndBeforeStart` if start > end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        if end < start {
            return Err(RangeError::EndBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parses both endpoints and validates their order.
    ///
    /// # Errors
    /// Returns `RangeError::InvalidFormat` if either endpoint fails to parse,
    /// otherwise `RangeError::EndBeforeStart` if they are out of order.
    pub fn parse(start: &str, end: &str) -> Result<Self, RangeError> {
        let start = parse_iso_date(start).map_err(RangeError::InvalidFormat)?;
        let end = parse_iso_date(end).map_err(RangeError::InvalidFormat)?;
        Self::new(start, end)
    }

    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    pub const fn dates(&self) -> (NaiveDate, NaiveDate) {
        (self.start, self.end)
    }

    /// Number of days covered, counting both endpoints.
    pub fn len_days(&self) -> u64 {
        let span = self.end.signed_duration_since(self.start).num_days();
        u64::try_from(span).map_or(0, |days| days + 1)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Whether the two ranges share at least one day.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Whether `other` can be folded into `self` without leaving a gap:
    /// it overlaps, or starts on the day right after `self` ends.
    pub fn touches(&self, other: &Self) -> bool {
        let reach = next_day(self.end).unwrap_or(self.end);
        other.start <= reach && self.start <= next_day(other.end).unwrap_or(other.end)
    }

    /// Smallest range covering both. Only meaningful when they touch.
    pub fn cover(&self, other: &Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end:   self.end.max(other.end),
        }
    }

    /// Iterates every day in the range, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |d| *d <= self.end)
    }
}

impl FromStr for DateRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s.trim().split_once(RANGE_SEPARATOR).ok_or_else(|| {
            RangeError::InvalidFormat(ParseError::InvalidFormat(format!(
                "No range separator found (expected '{RANGE_SEPARATOR}'): {s}"
            )))
        })?;
        Self::parse(start, end)
    }
}

/// Wire form is a two-element array of ISO strings: `["2024-01-01", "2024-01-05"]`.
impl Serialize for DateRange {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        (format_iso(self.start), format_iso(self.end)).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DateRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let (start, end) = <(String, String)>::deserialize(deserializer)?;
        Self::parse(&start, &end).map_err(|e| match e {
            RangeError::InvalidFormat(inner) => <D::Error as serde::de::Error>::custom(inner),
            other @ RangeError::EndBeforeStart { .. } => <D::Error as serde::de::Error>::custom(other),
        })
    }
}

/// One caller-supplied range item, not yet validated.
///
/// Anything that is not a two-string array is kept as [`RawRange::Malformed`]
/// so a single bad item is reported at its own position instead of failing
/// deserialization of the whole list.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum RawRange {
    /// A `[start, end]` pair of strings.
    #[display(fmt = "{_0}/{_1}")]
    Pair(String, String),
    /// Any other JSON value found where a pair was expected.
    #[display(fmt = "{_0}")]
    Malformed(serde_json::Value),
}

impl RawRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self::Pair(start.into(), end.into())
    }

    /// The start string, if this item is a pair.
    pub fn start(&self) -> Option<&str> {
        match self {
            Self::Pair(start, _) => Some(start),
            Self::Malformed(_) => None,
        }
    }

    /// The end string, if this item is a pair.
    pub fn end(&self) -> Option<&str> {
        match self {
            Self::Pair(_, end) => Some(end),
            Self::Malformed(_) => None,
        }
    }

    /// Parses and order-checks this item.
    ///
    /// # Errors
    /// Returns `RangeError::InvalidFormat` for a malformed item, otherwise
    /// see [`DateRange::parse`].
    pub fn validate(&self) -> Result<DateRange, RangeError> {
        match self {
            Self::Pair(start, end) => DateRange::parse(start, end),
            Self::Malformed(value) => Err(RangeError::InvalidFormat(ParseError::InvalidFormat(format!(
                "expected a [start, end] pair of strings, found {value}"
            )))),
        }
    }
}

impl From<DateRange> for RawRange {
    fn from(range: DateRange) -> Self {
        Self::Pair(format_iso(range.start), format_iso(range.end))
    }
}

impl From<serde_json::Value> for RawRange {
    fn from(value: serde_json::Value) -> Self {
        if let serde_json::Value::Array(items) = &value {
            if let [serde_json::Value::String(start), serde_json::Value::String(end)] = items.as_slice() {
                return Self::Pair(start.clone(), end.clone());
            }
        }
        Self::Malformed(value)
    }
}

impl Serialize for RawRange {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Pair(start, end) => (start, end).serialize(serializer),
            Self::Malformed(value) => value.serialize(serializer),
        }
    }
}

/// Accepts any value; see [`RawRange::Malformed`].
impl<'de> Deserialize<'de> for RawRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(Self::from)
    }
}
