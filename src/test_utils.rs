//! Shared constructors for unit tests. Panicking on bad literals is fine here.

use std::sync::Once;

use chrono::NaiveDate;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::consts::LEAP_REFERENCE_YEAR;
use crate::{Anchor, DateRange, Day, Month, RawRange};

static TEST_LOGGING: Once = Once::new();

/// Installs a test-captured `tracing` subscriber once per test binary.
///
/// Honors `RUST_LOG`; defaults to `debug` for this crate.
pub fn init_test_logging() {
    TEST_LOGGING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("anchor_year=debug"));
        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_test_writer()
                .with_target(true)
                .with_filter(filter),
        );
        if tracing::dispatcher::has_been_set() {
            return;
        }
        subscriber
            .try_init()
            .unwrap_or_else(|e| eprintln!("Error: Failed to set up logging: {e}"));
    });
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("test date literal must be valid")
}

pub fn month(value: u8) -> Month {
    Month::new(value).expect("test month literal must be valid")
}

/// Any day number up to 31, validated against January.
pub fn day(value: u8) -> Day {
    Day::new(value, LEAP_REFERENCE_YEAR, 1).expect("test day literal must be valid")
}

pub fn anchor(month: u32, day: u32) -> Anchor {
    Anchor::new(month, day).expect("test anchor literal must be valid")
}

/// Builds a validated range from two ISO literals.
pub fn range(start: &str, end: &str) -> DateRange {
    start
        .parse::<NaiveDate>()
        .ok()
        .zip(end.parse::<NaiveDate>().ok())
        .and_then(|(s, e)| DateRange::new(s, e).ok())
        .expect("test range literal must be valid")
}

pub fn raw(start: &str, end: &str) -> RawRange {
    RawRange::new(start, end)
}
