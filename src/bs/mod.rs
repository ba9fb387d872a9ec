//! Bikram Sambat calendar
//!
//! The official calendar of Nepal. Years start in mid April, around 56.7
//! years ahead of the Gregorian year, and months run from Baisakh to
//! Chaitra with lengths of 29 to 32 days decided by the solar transits.
//! Month lengths come from a [`table::CalendarTable`].

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::bs::fmt::{FormatOptions, Locale};
use crate::bs::table::CalendarTable;
use crate::convert::Converter;
use crate::date::{Date, GregorianDate};
use crate::error::{Calendar, Error, Result};

pub mod fmt;
pub mod table;

/// Month of the Bikram Sambat year.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Month {
    Baisakh = 1,
    Jestha,
    Asar,
    Shrawan,
    Bhadra,
    Ashwin,
    Kartik,
    Mangsir,
    Poush,
    Magh,
    Falgun,
    Chaitra,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Baisakh,
        Month::Jestha,
        Month::Asar,
        Month::Shrawan,
        Month::Bhadra,
        Month::Ashwin,
        Month::Kartik,
        Month::Mangsir,
        Month::Poush,
        Month::Magh,
        Month::Falgun,
        Month::Chaitra,
    ];

    /// Returns the month numbered `1..=12`.
    pub fn from_number(month: u8) -> Result<Self> {
        match month {
            1..=12 => Ok(Self::ALL[usize::from(month) - 1]),
            _ => Err(Error::InvalidMonth { month }),
        }
    }

    /// Returns the month number, `1..=12`.
    pub fn number(self) -> u8 {
        self as u8
    }

    /// Romanized name, e.g. `"Baisakh"`.
    pub fn english_name(self) -> &'static str {
        self.name(Locale::English)
    }

    /// Name in Devanagari script, e.g. `"बैशाख"`.
    pub fn nepali_name(self) -> &'static str {
        self.name(Locale::Nepali)
    }

    pub fn name(self, locale: Locale) -> &'static str {
        fmt::month_name(Calendar::BikramSambat, self.number(), locale)
    }
}

/// A validated Bikram Sambat date.
///
/// Equality, hashing and ordering look at `(year, month, day)` only;
/// ordering is lexicographic, which is chronological. Each date also
/// remembers the absolute day it names in the table it was built with, so
/// day differences, weekdays and conversion to Gregorian need no table
/// lookup.
///
/// Methods that need month lengths ([`BsDate::add_days`],
/// [`BsDate::from_gregorian`], ...) use the bundled table; go through a
/// [`Converter`] to work with another one.
///
/// # Example
///
/// ```
/// use bikram_sambat::BsDate;
///
/// let date = BsDate::new(2081, 1, 1).unwrap();
/// assert_eq!("2024-04-13", date.to_gregorian().to_string());
/// assert_eq!(6, date.day_of_week()); // Saturday
/// ```
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BsDate {
    year: i32,
    month: u8,
    day: u8,
    jdn: u32,
}

impl BsDate {
    /// Creates a date, validated against the bundled table.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedYear`] if the year is not in the table,
    /// [`Error::InvalidMonth`] or [`Error::InvalidDay`] if the month or day
    /// does not exist in that year.
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self> {
        Self::new_in(CalendarTable::bundled(), year, month, day)
    }

    /// Creates a date, validated against `table`.
    pub fn new_in(table: &CalendarTable, year: i32, month: u8, day: u8) -> Result<Self> {
        let offset = table.day_offset(year, month, day)?;
        Ok(Self {
            year,
            month,
            day,
            jdn: table.epoch_jdn() + offset,
        })
    }

    /// Assembles a date whose fields were produced by `table` itself.
    pub(crate) fn from_table_parts(
        table: &CalendarTable,
        (year, month, day): (i32, u8, u8),
        offset: u32,
    ) -> Self {
        Self {
            year,
            month,
            day,
            jdn: table.epoch_jdn() + offset,
        }
    }

    /// Converts a Gregorian date using the bundled table.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if the date is outside the table coverage.
    pub fn from_gregorian(date: GregorianDate) -> Result<Self> {
        Converter::bundled().gregorian_to_bs(date)
    }

    pub fn year(self) -> i32 {
        self.year
    }

    /// Month number, `1..=12`.
    pub fn month(self) -> u8 {
        self.month
    }

    pub fn day(self) -> u8 {
        self.day
    }

    pub fn month_name(self) -> Month {
        // month is validated on construction
        Month::ALL[usize::from(self.month) - 1]
    }

    /// Returns the calendar-independant [`Date`].
    pub fn to_date(self) -> Date {
        Date::from_jdn(self.jdn)
    }

    /// Returns the same day in the Gregorian calendar, according to the
    /// table the date was built with.
    pub fn to_gregorian(self) -> GregorianDate {
        GregorianDate::from_table_date(self.to_date())
    }

    /// ISO-8601 day of week, `1..=7` for Monday through Sunday.
    pub fn day_of_week(self) -> u8 {
        self.to_date().day_of_week()
    }

    /// Moves the date by `days` using the bundled table.
    pub fn add_days(self, days: i32) -> Result<Self> {
        Converter::bundled().add_days(self, days)
    }

    /// Moves the date by whole months using the bundled table, clamping the
    /// day to the length of the target month.
    pub fn add_months(self, months: i32) -> Result<Self> {
        Converter::bundled().add_months(self, months)
    }

    /// Moves the date by whole years using the bundled table, clamping the
    /// day to the length of the target month.
    pub fn add_years(self, years: i32) -> Result<Self> {
        Converter::bundled().add_years(self, years)
    }

    /// Signed number of days from `other` to `self`.
    ///
    /// Each date counts from the table it was built with. For dates from
    /// different tables use [`Converter::diff_in_days`], which places both
    /// in one table.
    ///
    /// ```
    /// use bikram_sambat::BsDate;
    ///
    /// let a = BsDate::new(2081, 1, 1).unwrap();
    /// let b = BsDate::new(2082, 1, 1).unwrap();
    /// assert_eq!(366, b.diff_in_days(a));
    /// assert_eq!(-366, a.diff_in_days(b));
    /// ```
    pub fn diff_in_days(self, other: Self) -> i32 {
        // Both days lie within Gregorian years 1..=9999.
        (self.to_date() - other.to_date()) as i32
    }

    /// Formats the date using a pattern; see [`fmt`] for the tokens.
    ///
    /// ```
    /// use bikram_sambat::{BsDate, FormatOptions};
    ///
    /// let date = BsDate::new(2081, 1, 1).unwrap();
    /// assert_eq!("२०८१-०१-०१", date.format("YYYY-MM-DD", &FormatOptions::devanagari()));
    /// assert_eq!(
    ///     "Saturday 1 Baisakh 2081",
    ///     date.format("dddd D MMMM YYYY", &FormatOptions::default())
    /// );
    /// ```
    pub fn format(self, pattern: &str, options: &FormatOptions) -> String {
        fmt::format_fields(
            &fmt::Fields {
                calendar: Calendar::BikramSambat,
                year: self.year,
                month: self.month,
                day: self.day,
                day_of_week: self.day_of_week(),
            },
            pattern,
            options,
        )
    }
}

impl BsDate {
    fn key(self) -> (i32, u8, u8) {
        (self.year, self.month, self.day)
    }
}

impl PartialEq for BsDate {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for BsDate {}

impl Hash for BsDate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for BsDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BsDate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl std::fmt::Display for BsDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for BsDate {
    type Err = Error;

    /// Parses `YYYY-MM-DD` (or `/` separated), in Arabic or Devanagari
    /// digits, validated against the bundled table.
    fn from_str(s: &str) -> Result<Self> {
        let (y, m, d) = fmt::parse_ymd(s)?;
        Self::new(y, m, d)
    }
}

impl TryFrom<String> for BsDate {
    type Error = Error;
    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<BsDate> for String {
    fn from(date: BsDate) -> String {
        date.to_string()
    }
}
