//! Day-count accounting over rolling anchor years.
//!
//! An anchor year starts on a fixed (month, day), for example every
//! September 17th, and runs to the day before the next one. Given a set of
//! date ranges this crate reports how many days fall into each anchor year,
//! whether each year reaches a minimum, and optionally which days contributed.
//!
//! ```
//! use anchor_year::{CalculationConfig, RawRange, calculate};
//!
//! let config = CalculationConfig::default(); // September 17th, 183 days
//! let result = calculate(&[RawRange::new("2023-09-01", "2024-03-01")], &config).unwrap();
//!
//! let totals: Vec<(String, u32)> = result.totals.iter().map(|(k, v)| (k.to_string(), *v)).collect();
//! assert_eq!(totals, vec![("2022-2023".to_owned(), 16), ("2023-2024".to_owned(), 167)]);
//! assert!(!result.overall_pass);
//! ```

mod accumulate;
mod anchor;
mod calculator;
mod consts;
mod date;
mod merge;
mod prelude;
mod range;
mod threshold;
mod types;
mod validate;

pub mod config;
pub mod session;

#[cfg(test)]
mod test_utils;

pub use accumulate::{Accumulation, DaySet, Heatmap, PeriodTotals, accumulate};
pub use anchor::{Anchor, AnchorError, AnchorPeriod, PeriodLabel, next_period_start, period_start};
pub use calculator::{CalcError, CalculateRequest, CalculateResponse, Calculation, calculate};
pub use config::{AnchorPreset, CalculationConfig};
pub use consts::*;
pub use date::{ParseError, clamped_date, format_iso, next_day, parse_iso_date};
pub use merge::merge_ranges;
pub use range::{DateRange, RANGE_SEPARATOR, RangeError, RawRange};
pub use threshold::{Evaluation, evaluate};
pub use types::{Day, Month, days_in_month, is_leap_year};
pub use validate::{RangeIssue, Stage, Validation, validate_ranges};
