//! Strict ISO calendar-date parsing and the small amount of day arithmetic
//! the period engine needs on top of `chrono`.

use chrono::NaiveDate;

use crate::consts::{DATE_SEPARATOR, ISO_DATE_FORMAT, ISO_YEAR_DIGITS, MAX_YEAR, MIN_YEAR};
use crate::prelude::*;
use crate::types::{Day, Month, days_in_month};

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid year: {} (must be {}-{})", "_0", MIN_YEAR, MAX_YEAR)]
    InvalidYear(i32),
    #[display(fmt = "Invalid month: {} (must be 1-12)", "_0")]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { month: u8, day: u8, year: i32 },
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for ParseError {}

/// Parses a `YYYY-MM-DD` calendar date.
///
/// The year must have exactly four digits and lie in `MIN_YEAR..=MAX_YEAR`;
/// month and day accept one or two digits. Surrounding whitespace is ignored.
///
/// # Errors
/// Returns a `ParseError` describing the first component that failed.
pub fn parse_iso_date(s: &str) -> Result<NaiveDate, ParseError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let parts: Vec<&str> = trimmed.split(DATE_SEPARATOR).collect();
    let [year_str, month_str, day_str] = parts.as_slice() else {
        return Err(ParseError::InvalidFormat(format!(
            "expected YYYY{DATE_SEPARATOR}MM{DATE_SEPARATOR}DD, found {trimmed}"
        )));
    };

    if year_str.len() != ISO_YEAR_DIGITS {
        return Err(ParseError::InvalidFormat(trimmed.to_owned()));
    }
    let year = parse_digits(year_str)?;
    let month = parse_digits(month_str).and_then(|m| narrow(m, trimmed))?;
    let day = parse_digits(day_str).and_then(|d| narrow(d, trimmed))?;

    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(ParseError::InvalidYear(year));
    }
    let month = Month::new(month)?.get();

    NaiveDate::from_ymd_opt(year, u32::from(month), u32::from(day))
        .ok_or(ParseError::InvalidDay { month, day, year })
}

/// Digits only: no sign, no embedded whitespace, at most two digits for
/// month/day (enforced by `narrow`).
fn parse_digits(s: &str) -> Result<i32, ParseError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidFormat(s.to_owned()));
    }
    s.parse::<i32>()
        .map_err(|_| ParseError::InvalidFormat(s.to_owned()))
}

fn narrow(value: i32, context: &str) -> Result<u8, ParseError> {
    u8::try_from(value).map_err(|_| ParseError::InvalidFormat(context.to_owned()))
}

/// Builds `year-month-day`, substituting the last day of the month when `day`
/// does not exist in that year (Feb 29 outside leap years).
///
/// Saturates to `NaiveDate::MIN`/`MAX` outside chrono's representable range.
pub fn clamped_date(year: i32, month: Month, day: Day) -> NaiveDate {
    let day = day.get().min(days_in_month(year, month.get()));
    NaiveDate::from_ymd_opt(year, u32::from(month.get()), u32::from(day)).unwrap_or(if year < 0 {
        NaiveDate::MIN
    } else {
        NaiveDate::MAX
    })
}

/// The calendar day after `date`, if representable.
#[inline]
pub fn next_day(date: NaiveDate) -> Option<NaiveDate> {
    date.succ_opt()
}

/// Renders a date as `YYYY-MM-DD`.
pub fn format_iso(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, day, month};

    #[test]
    fn test_parse_iso_full_date() {
        assert_eq!(parse_iso_date("2023-09-17").unwrap(), date(2023, 9, 17));
        assert_eq!(parse_iso_date("  2023-09-17 ").unwrap(), date(2023, 9, 17));
        assert_eq!(parse_iso_date("2023-9-7").unwrap(), date(2023, 9, 7));
    }

    #[test]
    fn test_parse_leap_day() {
        assert_eq!(parse_iso_date("2024-02-29").unwrap(), date(2024, 2, 29));
        assert!(matches!(
            parse_iso_date("2023-02-29"),
            Err(ParseError::InvalidDay {
                month: 2,
                day: 29,
                year: 2023
            })
        ));
    }

    #[test]
    fn test_day_checked_against_month_length() {
        assert_eq!(parse_iso_date("2023-04-30").unwrap(), date(2023, 4, 30));
        assert_eq!(
            parse_iso_date("2023-04-31"),
            Err(ParseError::InvalidDay {
                month: 4,
                day:   31,
                year:  2023,
            })
        );
        assert_eq!(
            parse_iso_date("2023-04-00"),
            Err(ParseError::InvalidDay {
                month: 4,
                day:   0,
                year:  2023,
            })
        );
        assert_eq!(parse_iso_date("2023-00-10"), Err(ParseError::InvalidMonth(0)));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        struct TestCase {
            input:       &'static str,
            description: &'static str,
        }

        let cases = [
            TestCase {
                input:       "",
                description: "empty",
            },
            TestCase {
                input:       "2023/09/17",
                description: "wrong separator",
            },
            TestCase {
                input:       "09-17-2023",
                description: "month-first order",
            },
            TestCase {
                input:       "2023-09",
                description: "missing day",
            },
            TestCase {
                input:       "2023-09-17-01",
                description: "too many components",
            },
            TestCase {
                input:       "2023-13-01",
                description: "month out of range",
            },
            TestCase {
                input:       "2023-04-31",
                description: "day out of range",
            },
            TestCase {
                input:       "0000-01-01",
                description: "year zero",
            },
            TestCase {
                input:       "-2023-01-01",
                description: "signed year",
            },
            TestCase {
                input:       "2023-+9-01",
                description: "signed month",
            },
            TestCase {
                input:       "2023-009-01",
                description: "three-digit month",
            },
            TestCase {
                input:       "abcd-ef-gh",
                description: "non-numeric",
            },
            TestCase {
                input:       "23-09-17",
                description: "two-digit year",
            },
        ];

        for case in &cases {
            assert!(
                parse_iso_date(case.input).is_err(),
                "Expected failure for {:?} ({})",
                case.input,
                case.description
            );
        }
    }

    #[test]
    fn test_parse_error_display() {
        assert_eq!(ParseError::EmptyInput.to_string(), "Empty date string");
        assert_eq!(ParseError::InvalidYear(0).to_string(), "Invalid year: 0 (must be 1-9999)");
        assert_eq!(
            ParseError::InvalidDay {
                month: 2,
                day:   30,
                year:  2024,
            }
            .to_string(),
            "Invalid day 30 for month 2024-02"
        );
    }

    #[test]
    fn test_clamped_date() {
        assert_eq!(clamped_date(2024, month(2), day(29)), date(2024, 2, 29));
        assert_eq!(clamped_date(2021, month(2), day(29)), date(2021, 2, 28));
        assert_eq!(clamped_date(2100, month(2), day(29)), date(2100, 2, 28));
        assert_eq!(clamped_date(2021, month(9), day(17)), date(2021, 9, 17));
    }

    #[test]
    fn test_next_day_rolls_over() {
        assert_eq!(next_day(date(2023, 12, 31)), Some(date(2024, 1, 1)));
        assert_eq!(next_day(date(2024, 2, 28)), Some(date(2024, 2, 29)));
        assert_eq!(next_day(NaiveDate::MAX), None);
    }

    #[test]
    fn test_format_iso() {
        assert_eq!(format_iso(date(2024, 3, 1)), "2024-03-01");
        assert_eq!(format_iso(date(987, 3, 1)), "0987-03-01");
    }
}
