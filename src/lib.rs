//! Conversion between the Bikram Sambat (Nepali) and Gregorian calendars.
//!
//! Bikram Sambat months do not follow a fixed rule, so conversion is driven
//! by a table of month lengths per year, shipped with the crate and covering
//! BS 2000 to 2090 (AD 1943-04-14 to 2034-04-13). All arithmetic goes through
//! absolute day counts, so it always agrees with the table.
//!
//! # Examples
//!
//! Converting dates:
//!
//! ```
//! use bikram_sambat::{bs_to_gregorian, gregorian_to_bs};
//!
//! let bs = gregorian_to_bs(2024, 4, 13).unwrap();
//! assert_eq!((2081, 1, 1), (bs.year(), bs.month(), bs.day()));
//!
//! let ad = bs_to_gregorian(2081, 1, 1).unwrap();
//! assert_eq!("2024-04-13", ad.to_string());
//! ```
//!
//! Arithmetic and formatting:
//!
//! ```
//! use bikram_sambat::{BsDate, FormatOptions};
//!
//! let date = BsDate::new(2081, 2, 32).unwrap();
//! let next = date.add_months(1).unwrap(); // Asar has only 31 days
//! assert_eq!("2081-03-31", next.to_string());
//! assert_eq!(-31, date.diff_in_days(next));
//! assert_eq!("३१ असार २०८१", next.format("D MMMM YYYY", &FormatOptions::devanagari()));
//! ```
//!
//! A different table can be loaded and used through a [`Converter`]:
//!
//! ```
//! use bikram_sambat::{CalendarTable, Converter};
//!
//! let table = CalendarTable::parse("
//!     epoch 2081-01-01 2024-04-13
//!     2081 31 32 31 32 31 30 30 30 29 30 29 31
//! ").unwrap();
//! let conv = Converter::new(&table);
//! let date = conv.date(2081, 12, 31).unwrap();
//! assert_eq!("2025-04-13", conv.bs_to_gregorian(date).unwrap().to_string());
//! ```

use std::cmp::Ordering;

pub mod bs;
pub mod convert;
pub mod date;
pub mod error;

pub use bs::fmt::{Digits, FormatOptions, Locale};
pub use bs::table::{CalendarTable, TableError, TableErrorKind, YearEntry};
pub use bs::{BsDate, Month};
pub use convert::{Converter, EpochAnchor};
pub use date::{Date, GregorianDate, YearType};
pub use error::{Calendar, Error, ErrorKind, Result};

/// Converts a Bikram Sambat date to Gregorian.
///
/// # Errors
///
/// [`ErrorKind::OutOfRange`] if `year` is not in the bundled table,
/// [`ErrorKind::InvalidDate`] if the month or day does not exist.
pub fn bs_to_gregorian(year: i32, month: u8, day: u8) -> Result<GregorianDate> {
    let date = BsDate::new(year, month, day)?;
    Converter::bundled().bs_to_gregorian(date)
}

/// Converts a Gregorian date to Bikram Sambat.
///
/// # Errors
///
/// [`ErrorKind::InvalidDate`] if the Gregorian date does not exist,
/// [`ErrorKind::OutOfRange`] if the bundled table does not cover it.
pub fn gregorian_to_bs(year: i32, month: u8, day: u8) -> Result<BsDate> {
    let date = GregorianDate::new(year, month, day)?;
    Converter::bundled().gregorian_to_bs(date)
}

pub fn add_days(date: BsDate, days: i32) -> Result<BsDate> {
    date.add_days(days)
}

pub fn add_months(date: BsDate, months: i32) -> Result<BsDate> {
    date.add_months(months)
}

pub fn add_years(date: BsDate, years: i32) -> Result<BsDate> {
    date.add_years(years)
}

/// Signed days from `b` to `a`; `diff_in_days(d, add_days(d, n)?) == -n`.
///
/// Each date counts from the table it was built with; see
/// [`Converter::diff_in_days`] for dates from different tables.
pub fn diff_in_days(a: BsDate, b: BsDate) -> i32 {
    a.diff_in_days(b)
}

/// `-1`, `0` or `1` as `a` is before, on, or after `b`.
///
/// ```
/// use bikram_sambat::{BsDate, compare};
///
/// let a = BsDate::new(2081, 1, 1).unwrap();
/// let b = BsDate::new(2081, 1, 2).unwrap();
/// assert_eq!(-1, compare(a, b));
/// assert_eq!(1, compare(b, a));
/// assert_eq!(0, compare(a, a));
/// ```
pub fn compare(a: BsDate, b: BsDate) -> i8 {
    match a.cmp(&b) {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

pub fn format(date: BsDate, pattern: &str, options: &FormatOptions) -> String {
    date.format(pattern, options)
}

pub fn is_supported_year(year: i32) -> bool {
    CalendarTable::bundled().is_supported(year)
}

pub fn min_supported_year() -> i32 {
    CalendarTable::bundled().min_year()
}

pub fn max_supported_year() -> i32 {
    CalendarTable::bundled().max_year()
}
