//! Calendar-independant date, and dates in the proleptic Gregorian calendar.

use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::bs::fmt::{self as bs_fmt, FormatOptions};
use crate::error::{Calendar, Error, Result};

/// A calendar-independant date.
///
/// Supported range begins from January 1, 4713 BC, proleptic Julian calendar.
/// Conversions between calendars go through this type: two dates in
/// different calendars are the same day iff they have the same `Date`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Date {
    jdn: u32,
}

impl Date {
    /// Creates a `Date` with a Julian day number (JDN).
    pub fn from_jdn(jdn: u32) -> Self {
        Self { jdn }
    }
    /// Returns the Julian day number (JDN) of the date.
    pub fn jdn(&self) -> u32 {
        self.jdn
    }

    /// Creates a `Date` with a Gregorian calendar date.
    ///
    /// `year` should be an astronomical year number, i.e. 1 BC is `0`, 2
    /// BC is `-1`, etc. The month and day are not validated; use
    /// [`GregorianDate::new`] for that.
    ///
    /// Returns `None` if the result date is out of supported range.
    ///
    /// # Example
    ///
    /// ```
    /// use bikram_sambat::Date;
    ///
    /// let date = Date::from_gregorian(2000, 1, 1).unwrap();
    /// assert_eq!(2451545, date.jdn());
    /// ```
    pub fn from_gregorian(year: i32, month: i32, day: i32) -> Option<Self> {
        u32::try_from(gregorian_to_jdn(year, month, day))
            .map(Self::from_jdn)
            .ok()
    }
    /// Represents the date in Gregorian calendar.
    ///
    /// Returns in `(year, month, day)` format.
    ///
    /// # Example
    ///
    /// ```
    /// use bikram_sambat::Date;
    ///
    /// let date = Date::from_jdn(2451545);
    /// assert_eq!((2000, 1, 1), date.gregorian());
    /// ```
    pub fn gregorian(&self) -> (i32, i32, i32) {
        let jdn = i64::from(self.jdn);
        let f = jdn + 1401 + (((4 * jdn + 274277) / 146097) * 3) / 4 - 38;
        let e = 4 * f + 3;
        let g = (e % 1461) / 4;
        let h = 5 * g + 2;
        let day = (h % 153) / 5 + 1;
        let month = (h / 153 + 2) % 12 + 1;
        let year = e / 1461 - 4716 + (12 + 2 - month) / 12;
        (year as i32, month as i32, day as i32)
    }

    /// Returns the day of week of the date, in ISO-8601 numbering (i.e.
    /// `1..=7` for Monday through Sunday)
    ///
    /// # Example
    ///
    /// ```
    /// use bikram_sambat::Date;
    ///
    /// let date = Date::from_gregorian(2000, 1, 1).unwrap();
    /// assert_eq!(6, date.day_of_week()); // Saturday
    /// ```
    pub fn day_of_week(&self) -> u8 {
        (self.jdn % 7 + 1) as u8
    }

    /// Moves the date by `days`, returning `None` if the result would fall
    /// before JDN 0 or overflow.
    pub fn checked_add(self, days: i64) -> Option<Self> {
        i64::from(self.jdn)
            .checked_add(days)
            .and_then(|jdn| u32::try_from(jdn).ok())
            .map(Self::from_jdn)
    }
}

impl Sub<Date> for Date {
    type Output = i64;
    fn sub(self, rhs: Date) -> Self::Output {
        i64::from(self.jdn) - i64::from(rhs.jdn)
    }
}

fn gregorian_to_jdn(y: i32, m: i32, d: i32) -> i64 {
    let (y, m, d) = (y as i64, m as i64, d as i64);
    (1461 * (y + 4800 + (m - 14) / 12)) / 4 + (367 * (m - 2 - 12 * ((m - 14) / 12))) / 12
        - (3 * ((y + 4900 + (m - 14) / 12) / 100)) / 4
        + d
        - 32075
}

/// Indicates whether a year is a leap year or common year.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum YearType {
    Common,
    Leap,
}

impl YearType {
    /// Determines if `year` is a leap year in Gregorian calendar.
    pub fn from_gregorian(year: i32) -> Self {
        if year % 4 == 0 && year % 100 != 0 || year % 400 == 0 {
            Self::Leap
        } else {
            Self::Common
        }
    }
    /// Returns `true` if `self` is `Leap`, otherwise `false`.
    pub fn is_leap(&self) -> bool {
        matches!(self, YearType::Leap)
    }
    /// Number of days in a Gregorian year of this type.
    pub fn days(&self) -> u16 {
        365 + self.is_leap() as u16
    }
}

fn ordinal_day_number(month: i32, day: i32, year_type: YearType) -> i32 {
    day + match month {
        1 => 0,
        2 => 31,
        _ => 59 + (153 * (month - 3) + 2) / 5 + year_type.is_leap() as i32,
    }
}

/// Length of a Gregorian month, or `None` if `month` is not in `1..=12`.
pub fn gregorian_month_length(year: i32, month: u8) -> Option<u8> {
    Some(match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if YearType::from_gregorian(year).is_leap() => 29,
        2 => 28,
        _ => return None,
    })
}

/// A validated date in the proleptic Gregorian calendar.
///
/// Years `1..=9999` are representable. Ordering is lexicographic on
/// `(year, month, day)`, which is chronological.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GregorianDate {
    year: i32,
    month: u8,
    day: u8,
}

impl GregorianDate {
    pub const MIN_YEAR: i32 = 1;
    pub const MAX_YEAR: i32 = 9999;
    /// January 1, 1.
    pub const MIN: Self = Self {
        year: Self::MIN_YEAR,
        month: 1,
        day: 1,
    };
    /// December 31, 9999.
    pub const MAX: Self = Self {
        year: Self::MAX_YEAR,
        month: 12,
        day: 31,
    };

    /// Creates a Gregorian date, validating month and day.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedYear`] for years outside `1..=9999`,
    /// [`Error::InvalidMonth`] or [`Error::InvalidDay`] for dates that do
    /// not exist.
    ///
    /// ```
    /// use bikram_sambat::GregorianDate;
    ///
    /// assert!(GregorianDate::new(2024, 2, 29).is_ok());
    /// assert!(GregorianDate::new(2023, 2, 29).is_err());
    /// ```
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self> {
        if !(Self::MIN_YEAR..=Self::MAX_YEAR).contains(&year) {
            return Err(Error::UnsupportedYear {
                calendar: Calendar::Gregorian,
                year,
                min: Self::MIN_YEAR,
                max: Self::MAX_YEAR,
            });
        }
        let max_day = gregorian_month_length(year, month).ok_or(Error::InvalidMonth { month })?;
        if !(1..=max_day).contains(&day) {
            return Err(Error::InvalidDay {
                calendar: Calendar::Gregorian,
                year,
                month,
                day,
                max_day,
            });
        }
        Ok(Self { year, month, day })
    }

    /// Returns the date of a calendar-independant [`Date`].
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if the day falls outside years `1..=9999`.
    pub fn from_date(date: Date) -> Result<Self> {
        let (y, m, d) = date.gregorian();
        if !(Self::MIN_YEAR..=Self::MAX_YEAR).contains(&y) {
            return Err(Error::OutOfRange {
                calendar: Calendar::Gregorian,
                year: y,
                month: m as u8,
                day: d as u8,
            });
        }
        Ok(Self {
            year: y,
            month: m as u8,
            day: d as u8,
        })
    }

    /// Like [`Self::from_date`], for days a calendar table has already
    /// confined to years `1..=9999`.
    pub(crate) fn from_table_date(date: Date) -> Self {
        let (y, m, d) = date.gregorian();
        Self {
            year: y,
            month: m as u8,
            day: d as u8,
        }
    }

    /// Returns the calendar-independant [`Date`].
    pub fn to_date(self) -> Date {
        // Year >= 1 keeps the JDN far above zero.
        Date::from_jdn(gregorian_to_jdn(self.year, self.month.into(), self.day.into()) as u32)
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u8 {
        self.month
    }

    pub fn day(self) -> u8 {
        self.day
    }

    /// Day of the year, `1..=366`.
    pub fn day_of_year(self) -> u16 {
        ordinal_day_number(
            self.month.into(),
            self.day.into(),
            YearType::from_gregorian(self.year),
        ) as u16
    }

    /// ISO-8601 day of week, `1..=7` for Monday through Sunday.
    pub fn day_of_week(self) -> u8 {
        self.to_date().day_of_week()
    }

    /// Number of days in this date's month.
    pub fn days_in_month(self) -> u8 {
        // month is validated on construction
        gregorian_month_length(self.year, self.month).unwrap_or(31)
    }

    /// Moves the date by `days`, negative values moving backwards.
    ///
    /// ```
    /// use bikram_sambat::GregorianDate;
    ///
    /// let date = GregorianDate::new(2024, 2, 28).unwrap();
    /// assert_eq!("2024-03-01", date.add_days(2).unwrap().to_string());
    /// ```
    pub fn add_days(self, days: i32) -> Result<Self> {
        self.to_date()
            .checked_add(days.into())
            .ok_or(Error::OffsetOutOfRange {
                offset: days.into(),
            })
            .and_then(Self::from_date)
    }

    /// Moves the date by whole months, clamping the day to the end of the
    /// target month.
    ///
    /// ```
    /// use bikram_sambat::GregorianDate;
    ///
    /// let date = GregorianDate::new(2024, 1, 31).unwrap();
    /// assert_eq!("2024-02-29", date.add_months(1).unwrap().to_string());
    /// ```
    pub fn add_months(self, months: i32) -> Result<Self> {
        let (year, month) = shift_month(self.year, self.month, months).ok_or(
            Error::OffsetOutOfRange {
                offset: months.into(),
            },
        )?;
        let max_day = gregorian_month_length(year, month).unwrap_or(31);
        Self::new(year, month, self.day.min(max_day)).map_err(|_| Error::OutOfRange {
            calendar: Calendar::Gregorian,
            year,
            month,
            day: self.day.min(max_day),
        })
    }

    /// Moves the date by whole years. February 29 clamps to February 28 in
    /// common years.
    pub fn add_years(self, years: i32) -> Result<Self> {
        let months = years.checked_mul(12).ok_or(Error::OffsetOutOfRange {
            offset: i64::from(years) * 12,
        })?;
        self.add_months(months)
    }

    /// Signed number of days from `other` to `self`.
    pub fn diff_in_days(self, other: Self) -> i32 {
        // Both ends lie within years 1..=9999.
        (self.to_date() - other.to_date()) as i32
    }

    /// Formats the date using a pattern. See [`crate::bs::fmt`] for tokens.
    ///
    /// ```
    /// use bikram_sambat::{FormatOptions, GregorianDate};
    ///
    /// let date = GregorianDate::new(2024, 4, 13).unwrap();
    /// assert_eq!("13 April 2024", date.format("D MMMM YYYY", &FormatOptions::default()));
    /// ```
    pub fn format(self, pattern: &str, options: &FormatOptions) -> String {
        bs_fmt::format_fields(
            &bs_fmt::Fields {
                calendar: Calendar::Gregorian,
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

/// Adds `months` to `(year, month)`, returning the normalized pair.
pub(crate) fn shift_month(year: i32, month: u8, months: i32) -> Option<(i32, u8)> {
    let total = i64::from(year) * 12 + i64::from(month) - 1 + i64::from(months);
    let year = i32::try_from(total.div_euclid(12)).ok()?;
    Some((year, total.rem_euclid(12) as u8 + 1))
}

impl fmt::Display for GregorianDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for GregorianDate {
    type Err = Error;

    /// Parses `YYYY-MM-DD` (or `/` separated), in Arabic or Devanagari
    /// digits.
    fn from_str(s: &str) -> Result<Self> {
        let (y, m, d) = bs_fmt::parse_ymd(s)?;
        Self::new(y, m, d)
    }
}

impl TryFrom<String> for GregorianDate {
    type Error = Error;
    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<GregorianDate> for String {
    fn from(date: GregorianDate) -> String {
        date.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_works() {
        let date = Date::from_jdn(2440588);
        assert_eq!(2440588, date.jdn());
    }

    #[test]
    fn from_gregorian() {
        let date = Date::from_gregorian(1970, 1, 1).unwrap();
        assert_eq!(2440588, date.jdn());
        let date = Date::from_gregorian(2021, 9, 8).unwrap();
        assert_eq!(2459466, date.jdn());
        let date = Date::from_gregorian(1943, 4, 14).unwrap();
        assert_eq!(2430829, date.jdn());
    }

    #[test]
    fn to_gregorian() {
        let date = Date::from_jdn(2440588);
        assert_eq!((1970, 1, 1), date.gregorian());
        let date = Date::from_jdn(2459466);
        assert_eq!((2021, 9, 8), date.gregorian());
        let date = Date::from_jdn(2451545);
        assert_eq!((2000, 1, 1), date.gregorian());
    }

    #[test]
    fn to_day_of_week() {
        let date = Date::from_gregorian(1970, 1, 1).unwrap();
        assert_eq!(4, date.day_of_week());
        let date = Date::from_gregorian(2021, 9, 8).unwrap();
        assert_eq!(3, date.day_of_week());
        let date = Date::from_gregorian(1943, 4, 14).unwrap();
        assert_eq!(3, date.day_of_week());
    }

    #[test]
    fn checked_add_and_sub() {
        let date = Date::from_jdn(10);
        assert_eq!(Some(Date::from_jdn(15)), date.checked_add(5));
        assert_eq!(Some(Date::from_jdn(0)), date.checked_add(-10));
        assert_eq!(None, date.checked_add(-11));
        assert_eq!(-5, Date::from_jdn(5) - date);
    }

    #[test]
    fn leap_years() {
        for (std, year) in [(true, 2000), (false, 1900), (true, 2024), (false, 2023)] {
            assert_eq!(std, YearType::from_gregorian(year).is_leap(), "{year}");
        }
        assert_eq!(366, YearType::Leap.days());
    }

    #[test]
    fn gregorian_date_validation() {
        assert_eq!(
            Err(Error::InvalidDay {
                calendar: Calendar::Gregorian,
                year: 1900,
                month: 2,
                day: 29,
                max_day: 28,
            }),
            GregorianDate::new(1900, 2, 29)
        );
        assert_eq!(
            Err(Error::InvalidMonth { month: 13 }),
            GregorianDate::new(2000, 13, 1)
        );
        assert!(GregorianDate::new(2000, 4, 0).is_err());
        assert!(GregorianDate::new(0, 1, 1).is_err());
        assert!(GregorianDate::new(9999, 12, 31).is_ok());
    }

    #[test]
    fn gregorian_date_round_trips_through_jdn() {
        let mut date = GregorianDate::new(1999, 12, 25).unwrap();
        let mut jdn = date.to_date().jdn();
        for _ in 0..800 {
            assert_eq!(date, GregorianDate::from_date(Date::from_jdn(jdn)).unwrap());
            date = date.add_days(1).unwrap();
            jdn += 1;
        }
        assert_eq!("2002-03-04", date.to_string());
    }

    #[test]
    fn day_of_year() {
        for ((y, m, d), std) in [
            ((2023, 1, 1), 1),
            ((2023, 9, 13), 256),
            ((2024, 12, 31), 366),
            ((2023, 12, 31), 365),
        ] {
            assert_eq!(std, GregorianDate::new(y, m, d).unwrap().day_of_year());
        }
    }

    #[test]
    fn month_arithmetic_clamps() {
        let date = GregorianDate::new(2023, 1, 31).unwrap();
        assert_eq!("2023-02-28", date.add_months(1).unwrap().to_string());
        assert_eq!("2022-12-31", date.add_months(-1).unwrap().to_string());
        assert_eq!("2024-01-31", date.add_months(12).unwrap().to_string());
        let leap = GregorianDate::new(2024, 2, 29).unwrap();
        assert_eq!("2025-02-28", leap.add_years(1).unwrap().to_string());
        assert_eq!("2028-02-29", leap.add_years(4).unwrap().to_string());
        assert_eq!(
            crate::ErrorKind::OutOfRange,
            GregorianDate::new(9999, 12, 1)
                .unwrap()
                .add_months(1)
                .unwrap_err()
                .kind()
        );
    }

    #[test]
    fn diff_sign() {
        let a = GregorianDate::new(2024, 3, 1).unwrap();
        let b = GregorianDate::new(2024, 2, 1).unwrap();
        assert_eq!(29, a.diff_in_days(b));
        assert_eq!(-29, b.diff_in_days(a));
        assert_eq!(b, a.add_days(-29).unwrap());
    }

    #[test]
    fn parse_and_display() {
        let date: GregorianDate = "2024-04-13".parse().unwrap();
        assert_eq!((2024, 4, 13), (date.year(), date.month(), date.day()));
        assert_eq!("2024-04-13", date.to_string());
        assert_eq!(date, "२०२४/०४/१३".parse().unwrap());
        assert!("2024-02-30".parse::<GregorianDate>().is_err());
        assert!("yesterday".parse::<GregorianDate>().is_err());
    }

    #[test]
    fn shift_month_normalizes() {
        assert_eq!(Some((2024, 1)), shift_month(2023, 12, 1));
        assert_eq!(Some((2022, 12)), shift_month(2023, 1, -1));
        assert_eq!(Some((2021, 11)), shift_month(2023, 1, -14));
    }
}
