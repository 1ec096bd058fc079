use std::num::NonZeroU8;

use chrono::NaiveDate;

use crate::ParseError;
use crate::consts::{DAYS_IN_MONTH, FEBRUARY, FEBRUARY_DAYS_LEAP, MAX_MONTH};

/// Calendar month, `1..=12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month(pub(crate) NonZeroU8);

impl Month {
    /// # Errors
    /// Returns `ParseError::InvalidMonth` if the value is 0 or > `MAX_MONTH`.
    pub fn new(value: u8) -> Result<Self, ParseError> {
        NonZeroU8::new(value)
            .filter(|m| m.get() <= MAX_MONTH)
            .map(Self)
            .ok_or(ParseError::InvalidMonth(value))
    }

    /// The month number, `1..=12`.
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

/// Day of month, checked against a concrete year and month at construction.
///
/// Once built it is only a number: an anchor day of 29 built against a leap
/// February is later clamped, not re-validated, in common years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Day(pub(crate) NonZeroU8);

impl Day {
    /// # Errors
    /// Returns `ParseError::InvalidDay` if the value is 0, the month is not a
    /// calendar month, or the month has fewer days in `year`.
    pub fn new(value: u8, year: i32, month: u8) -> Result<Self, ParseError> {
        let fits = (1..=MAX_MONTH).contains(&month) && value <= days_in_month(year, month);
        NonZeroU8::new(value)
            .filter(|_| fits)
            .map(Self)
            .ok_or(ParseError::InvalidDay { month, day: value, year })
    }

    /// The day number, `1..=31`.
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

/// Whether `year` has a February 29th, as far as `chrono` can represent it.
///
/// Proleptic Gregorian, so year 0 and negative years follow the same rule.
pub fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, u32::from(FEBRUARY), u32::from(FEBRUARY_DAYS_LEAP)).is_some()
}

/// Days in `month` of `year`. `month` must be `1..=12`.
pub fn days_in_month(year: i32, month: u8) -> u8 {
    debug_assert!(month != 0 && month <= MAX_MONTH);

    if month == FEBRUARY && is_leap_year(year) {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}
