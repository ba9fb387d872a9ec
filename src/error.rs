//! Error types shared by every fallible operation of the crate.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The calendar system a date or an error refers to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Calendar {
    BikramSambat,
    Gregorian,
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Calendar::BikramSambat => "BS",
            Calendar::Gregorian => "AD",
        })
    }
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// Well-formed numbers that do not name a real date.
    InvalidDate,
    /// A date or computed result outside the years covered by the calendar
    /// table.
    OutOfRange,
    /// Malformed or negative input to a numeral or parsing routine.
    InvalidArgument,
}

/// Error type for all fallible operations in this crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Returned when a month number is outside `1..=12`.
    #[error("invalid month: {month} (must be 1..=12)")]
    InvalidMonth {
        /// The invalid month number that was provided.
        month: u8,
    },

    /// Returned when a day number exceeds the length of its month.
    #[error("invalid day: {calendar} {year:04}-{month:02} has no day {day} (max {max_day})")]
    InvalidDay {
        calendar: Calendar,
        year: i32,
        month: u8,
        day: u8,
        /// The last valid day of that month.
        max_day: u8,
    },

    /// Returned by table lookups when a month number is outside `1..=12`.
    #[error("month {month} is outside 1..=12")]
    MonthOutOfRange { month: u8 },

    /// Returned when a year is outside the supported range of a calendar.
    #[error("{calendar} year {year} is not supported (supported: {min}..={max})")]
    UnsupportedYear {
        calendar: Calendar,
        year: i32,
        min: i32,
        max: i32,
    },

    /// Returned when a conversion or arithmetic result has no representation
    /// in the target calendar.
    #[error("{calendar} date {year:04}-{month:02}-{day:02} is outside the supported range")]
    OutOfRange {
        calendar: Calendar,
        year: i32,
        month: u8,
        day: u8,
    },

    /// Returned when a day offset lands outside the supported range before a
    /// date can be produced.
    #[error("day offset {offset} falls outside the supported range")]
    OffsetOutOfRange { offset: i64 },

    /// Returned when a negative number is given to the numeral formatter.
    #[error("cannot render negative number {value} as numerals")]
    NegativeNumeral { value: i64 },

    /// Returned when text cannot be parsed as a number or date.
    #[error("malformed input {input:?}: expected {expected}")]
    Malformed {
        input: String,
        expected: &'static str,
    },
}

impl Error {
    /// Classifies the error.
    ///
    /// ```
    /// use bikram_sambat::{BsDate, ErrorKind};
    ///
    /// let err = BsDate::new(2081, 1, 32).unwrap_err();
    /// assert_eq!(ErrorKind::InvalidDate, err.kind());
    /// ```
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidMonth { .. } | Error::InvalidDay { .. } => ErrorKind::InvalidDate,
            Error::MonthOutOfRange { .. }
            | Error::UnsupportedYear { .. }
            | Error::OutOfRange { .. }
            | Error::OffsetOutOfRange { .. } => ErrorKind::OutOfRange,
            Error::NegativeNumeral { .. } | Error::Malformed { .. } => ErrorKind::InvalidArgument,
        }
    }
}

/// Shorthand used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
