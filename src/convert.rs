//! Conversion and day arithmetic between Bikram Sambat and Gregorian dates.
//!
//! Every operation goes through the ordinal of a date: the signed number of
//! days between it and the [`EpochAnchor`] of the table, counted within its
//! own calendar. Gregorian ordinals follow from the leap-year rule; BS
//! ordinals are summed from the month lengths in the table. Two dates in
//! different calendars are the same day iff their ordinals are equal.

use std::sync::OnceLock;

use tracing::trace;

use crate::bs::BsDate;
use crate::bs::table::CalendarTable;
use crate::date::{GregorianDate, shift_month};
use crate::error::{Calendar, Error, Result};

/// A Bikram Sambat date and the Gregorian date of the same day, used as the
/// reference point of a [`CalendarTable`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct EpochAnchor {
    /// `(year, month, day)` in Bikram Sambat.
    pub bs: (i32, u8, u8),
    pub gregorian: GregorianDate,
}

impl EpochAnchor {
    /// The anchor of the bundled table, BS 2000-01-01 = AD 1943-04-14.
    pub fn bundled() -> Self {
        CalendarTable::bundled().anchor()
    }
}

/// Converts and moves dates using one [`CalendarTable`].
///
/// A converter only borrows its table, so it is cheap to create and can be
/// shared between threads.
///
/// # Example
///
/// ```
/// use bikram_sambat::{Converter, GregorianDate};
///
/// let conv = Converter::bundled();
/// let bs = conv.gregorian_to_bs(GregorianDate::new(2024, 4, 13).unwrap()).unwrap();
/// assert_eq!("2081-01-01", bs.to_string());
/// assert_eq!("2024-04-13", conv.bs_to_gregorian(bs).unwrap().to_string());
/// ```
#[derive(Debug, Copy, Clone)]
pub struct Converter<'t> {
    table: &'t CalendarTable,
}

static BUNDLED: OnceLock<Converter<'static>> = OnceLock::new();

impl<'t> Converter<'t> {
    pub fn new(table: &'t CalendarTable) -> Self {
        Self { table }
    }

    /// Converter over [`CalendarTable::bundled`].
    pub fn bundled() -> &'static Converter<'static> {
        BUNDLED.get_or_init(|| Converter::new(CalendarTable::bundled()))
    }

    pub fn table(&self) -> &'t CalendarTable {
        self.table
    }

    pub fn anchor(&self) -> EpochAnchor {
        self.table.anchor()
    }

    /// Creates a BS date validated against this converter's table.
    pub fn date(&self, year: i32, month: u8, day: u8) -> Result<BsDate> {
        BsDate::new_in(self.table, year, month, day)
    }

    /// Days from the anchor to `date`, summed from the table.
    ///
    /// # Errors
    ///
    /// Fails if `date` does not exist in this table, which can only happen
    /// for dates built against another table.
    pub fn to_ordinal_bs(&self, date: BsDate) -> Result<i64> {
        let offset = self.table.day_offset(date.year(), date.month(), date.day())?;
        Ok(i64::from(offset) - i64::from(self.table.anchor_offset()))
    }

    /// Days from the anchor to `date` in the Gregorian calendar.
    pub fn to_ordinal_gregorian(&self, date: GregorianDate) -> i64 {
        date.to_date() - self.anchor().gregorian.to_date()
    }

    /// The BS date `ordinal` days after the anchor.
    ///
    /// # Errors
    ///
    /// [`Error::OffsetOutOfRange`] when the day is not covered by the table.
    pub fn from_ordinal_bs(&self, ordinal: i64) -> Result<BsDate> {
        let out_of_range = Error::OffsetOutOfRange { offset: ordinal };
        let offset = ordinal
            .checked_add(self.table.anchor_offset().into())
            .and_then(|offset| u32::try_from(offset).ok())
            .ok_or(out_of_range.clone())?;
        let ymd = self.table.locate(offset).ok_or(out_of_range)?;
        Ok(BsDate::from_table_parts(self.table, ymd, offset))
    }

    /// The Gregorian date `ordinal` days after the anchor.
    pub fn from_ordinal_gregorian(&self, ordinal: i64) -> Result<GregorianDate> {
        self.anchor()
            .gregorian
            .to_date()
            .checked_add(ordinal)
            .ok_or(Error::OffsetOutOfRange { offset: ordinal })
            .and_then(GregorianDate::from_date)
    }

    /// Converts a BS date to the Gregorian calendar.
    pub fn bs_to_gregorian(&self, date: BsDate) -> Result<GregorianDate> {
        let ordinal = self.to_ordinal_bs(date)?;
        let gregorian = self.from_ordinal_gregorian(ordinal)?;
        trace!(%date, %gregorian, ordinal, "bs to gregorian");
        Ok(gregorian)
    }

    /// Converts a Gregorian date to Bikram Sambat.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] naming `date` if the table does not cover it.
    pub fn gregorian_to_bs(&self, date: GregorianDate) -> Result<BsDate> {
        let ordinal = self.to_ordinal_gregorian(date);
        let bs = self
            .from_ordinal_bs(ordinal)
            .map_err(|_| Error::OutOfRange {
                calendar: Calendar::Gregorian,
                year: date.year(),
                month: date.month(),
                day: date.day(),
            })?;
        trace!(%date, %bs, ordinal, "gregorian to bs");
        Ok(bs)
    }

    /// Moves `date` by `days`, negative values moving backwards.
    ///
    /// # Errors
    ///
    /// [`Error::OffsetOutOfRange`] when the result is not covered by the
    /// table.
    pub fn add_days(&self, date: BsDate, days: i32) -> Result<BsDate> {
        let ordinal = self.to_ordinal_bs(date)?;
        self.from_ordinal_bs(ordinal + i64::from(days))
    }

    /// Moves `date` by whole months. If the target month is shorter than the
    /// day of `date`, the result is the last day of the target month.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedYear`] when the target year is not in the table.
    ///
    /// # Example
    ///
    /// ```
    /// use bikram_sambat::Converter;
    ///
    /// let conv = Converter::bundled();
    /// // Asar 2081 has 31 days, Poush 2081 only 29.
    /// let date = conv.date(2081, 3, 31).unwrap();
    /// assert_eq!("2081-09-29", conv.add_months(date, 6).unwrap().to_string());
    /// ```
    pub fn add_months(&self, date: BsDate, months: i32) -> Result<BsDate> {
        let (year, month) = shift_month(date.year(), date.month(), months).ok_or(
            Error::OffsetOutOfRange {
                offset: months.into(),
            },
        )?;
        let max_day = self.table.month_length(year, month)?;
        self.date(year, month, date.day().min(max_day))
    }

    /// Moves `date` by whole years, clamping the day like [`Self::add_months`].
    pub fn add_years(&self, date: BsDate, years: i32) -> Result<BsDate> {
        let months = years.checked_mul(12).ok_or(Error::OffsetOutOfRange {
            offset: i64::from(years) * 12,
        })?;
        self.add_months(date, months)
    }

    /// `ordinal(a) - ordinal(b)`: positive when `a` is later than `b`.
    pub fn diff_in_days(&self, a: BsDate, b: BsDate) -> Result<i64> {
        Ok(self.to_ordinal_bs(a)? - self.to_ordinal_bs(b)?)
    }
}
