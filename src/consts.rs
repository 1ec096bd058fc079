/// Earliest year accepted by [`crate::parse_iso_date`].
pub const MIN_YEAR: i32 = 1;
/// Latest year accepted by [`crate::parse_iso_date`]; keeps the year at four digits.
pub const MAX_YEAR: i32 = 9999;

/// December; months run `1..=MAX_MONTH`.
pub const MAX_MONTH: u8 = 12;
/// Lower bound for any day of month.
pub const MIN_DAY: u8 = 1;
/// Longest month length; the upper bound for an anchor day.
pub const MAX_DAY: u8 = 31;

/// Month number of February, the only month whose length varies.
pub const FEBRUARY: u8 = 2;
/// February's length in a leap year.
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Month lengths in a common year, indexed by month number (index 0 unused).
pub const DAYS_IN_MONTH: [u8; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Any leap year. An anchor (month, day) is valid if it exists in this year.
pub const LEAP_REFERENCE_YEAR: i32 = 2024;

/// Separates year, month and day in `YYYY-MM-DD`.
pub const DATE_SEPARATOR: char = '-';
/// Separates the two years of a period label such as `2023-2024`.
pub const PERIOD_LABEL_SEPARATOR: char = '-';
/// Exact digit count of the year in `YYYY-MM-DD`.
pub const ISO_YEAR_DIGITS: usize = 4;
/// `chrono` format string matching [`DATE_SEPARATOR`] output.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
