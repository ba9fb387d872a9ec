//! Bikram Sambat month-length table.
//!
//! Bikram Sambat months follow the sidereal solar transits, so their lengths
//! are not given by any closed formula and have to be tabulated. The bundled
//! table is read from `data/bs_calendar.txt`: one row per year with the year
//! number followed by twelve month lengths, plus an `epoch` line pairing a BS
//! date with its Gregorian date. Covering more years is a matter of appending
//! rows to that file.

use std::num::ParseIntError;
use std::sync::OnceLock;

use tracing::debug;

use crate::bs::fmt::parse_ymd;
use crate::convert::EpochAnchor;
use crate::date::GregorianDate;
use crate::error::{Calendar, Error, Result};

/// Month lengths of a single Bikram Sambat year.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct YearEntry {
    pub year: i32,
    /// Lengths of Baisakh through Chaitra.
    pub month_lengths: [u8; 12],
}

impl YearEntry {
    /// Total number of days in the year.
    pub fn days(&self) -> u16 {
        self.month_lengths.iter().map(|&len| u16::from(len)).sum()
    }
}

/// A contiguous range of Bikram Sambat years with their month lengths, and
/// the epoch tying the first day of the table to the Gregorian calendar.
///
/// Tables are immutable once built. Lookups are O(1) by year offset.
#[derive(Debug, Clone)]
pub struct CalendarTable {
    entries: Vec<YearEntry>,
    /// `year_starts[i]` is the day offset of the first day of
    /// `entries[i]`; the last element is the total number of days.
    year_starts: Vec<u32>,
    anchor: EpochAnchor,
    anchor_offset: u32,
    /// JDN of the first day of the table.
    epoch_jdn: u32,
}

static RAW_DATA: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/bs_calendar.txt"));
static BUNDLED: OnceLock<CalendarTable> = OnceLock::new();

impl CalendarTable {
    /// Returns the table shipped with this crate.
    ///
    /// Parsed once on first use; every later call returns the same table.
    pub fn bundled() -> &'static Self {
        BUNDLED.get_or_init(|| {
            Self::parse(RAW_DATA)
                .unwrap_or_else(|e| panic!("error parsing bundled calendar data: {e}"))
        })
    }

    /// Builds a table from year entries and an epoch anchor.
    ///
    /// Entries must be non-empty, in ascending contiguous year order, with
    /// every month 29 to 32 days long and every year 365 or 366 days long.
    /// The anchor's BS date must exist in the table.
    ///
    /// Errors report the 1-based position of the offending entry as `line`.
    ///
    /// # Example
    ///
    /// ```
    /// use bikram_sambat::{CalendarTable, EpochAnchor, GregorianDate, YearEntry};
    ///
    /// let table = CalendarTable::from_entries(
    ///     vec![YearEntry {
    ///         year: 2081,
    ///         month_lengths: [31, 32, 31, 32, 31, 30, 30, 30, 29, 30, 29, 31],
    ///     }],
    ///     EpochAnchor {
    ///         bs: (2081, 1, 1),
    ///         gregorian: GregorianDate::new(2024, 4, 13).unwrap(),
    ///     },
    /// )
    /// .unwrap();
    /// assert_eq!(366, table.total_days());
    /// ```
    pub fn from_entries(
        entries: Vec<YearEntry>,
        anchor: EpochAnchor,
    ) -> Result<Self, TableError> {
        Self::build(entries, anchor, &[])
    }

    /// Parses a table in the bundled data format.
    ///
    /// Blank lines and lines starting with `#` are skipped. Exactly one
    /// `epoch <bs-date> <gregorian-date>` line is required.
    #[tracing::instrument(skip_all, fields(len = raw.len()))]
    pub fn parse(raw: &str) -> Result<Self, TableError> {
        let mut entries = Vec::new();
        let mut lines = Vec::new();
        let mut anchor = None;
        for (line_num, line) in (1usize..).zip(raw.lines()) {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut it = line.split_whitespace();
            let head = it.next().unwrap_or_default();
            if head == "epoch" {
                if anchor.is_some() {
                    return Err(TableError::new(line_num, 1, TableErrorKind::DuplicateEpoch));
                }
                anchor = Some(parse_epoch(&mut it, line_num)?);
                continue;
            }
            let year: i32 = head
                .parse()
                .map_err(|e| TableError::new(line_num, 1, TableErrorKind::InvalidInt(e)))?;
            let mut month_lengths = [0u8; 12];
            for (i, len) in month_lengths.iter_mut().enumerate() {
                *len = it
                    .next()
                    .ok_or_else(|| TableError::new(line_num, i + 2, TableErrorKind::MissingField))?
                    .parse()
                    .map_err(|e| TableError::new(line_num, i + 2, TableErrorKind::InvalidInt(e)))?;
            }
            if it.next().is_some() {
                return Err(TableError::new(line_num, 14, TableErrorKind::ExtraField));
            }
            entries.push(YearEntry {
                year,
                month_lengths,
            });
            lines.push(line_num);
        }
        let anchor = anchor.ok_or(TableError::new(0, 0, TableErrorKind::MissingEpoch))?;
        Self::build(entries, anchor, &lines)
    }

    fn build(
        entries: Vec<YearEntry>,
        anchor: EpochAnchor,
        lines: &[usize],
    ) -> Result<Self, TableError> {
        let line_of = |i: usize| lines.get(i).copied().unwrap_or(i + 1);
        let first_year = entries
            .first()
            .ok_or(TableError::new(0, 0, TableErrorKind::Empty))?
            .year;
        let last_year = i32::try_from(entries.len() - 1)
            .ok()
            .and_then(|n| first_year.checked_add(n))
            .ok_or(TableError::new(0, 0, TableErrorKind::YearOverflow))?;

        let mut year_starts = Vec::with_capacity(entries.len() + 1);
        let mut total = 0u32;
        for (i, (entry, expected)) in entries.iter().zip(first_year..=last_year).enumerate() {
            if entry.year != expected {
                return Err(TableError::new(
                    line_of(i),
                    1,
                    TableErrorKind::NonContiguous {
                        expected,
                        found: entry.year,
                    },
                ));
            }
            for (m, &len) in entry.month_lengths.iter().enumerate() {
                if !(29..=32).contains(&len) {
                    return Err(TableError::new(
                        line_of(i),
                        m + 2,
                        TableErrorKind::MonthLength(len),
                    ));
                }
            }
            let days = entry.days();
            if !(365..=366).contains(&days) {
                return Err(TableError::new(line_of(i), 0, TableErrorKind::YearLength(days)));
            }
            year_starts.push(total);
            // More days than Gregorian years 1..=9999 can hold is caught below.
            total = total.saturating_add(u32::from(days));
        }
        year_starts.push(total);

        let mut table = Self {
            entries,
            year_starts,
            anchor,
            anchor_offset: 0,
            epoch_jdn: 0,
        };
        let (y, m, d) = anchor.bs;
        let anchor_offset = table
            .day_offset(y, m, d)
            .map_err(|e| TableError::new(0, 0, TableErrorKind::InvalidEpoch(e)))?;
        let anchor_jdn = anchor.gregorian.to_date().jdn();
        let min_jdn = GregorianDate::MIN.to_date().jdn();
        let max_jdn = GregorianDate::MAX.to_date().jdn();
        let epoch_jdn = anchor_jdn
            .checked_sub(anchor_offset)
            .filter(|&jdn| jdn >= min_jdn && jdn.saturating_add(total - 1) <= max_jdn)
            .ok_or(TableError::new(0, 0, TableErrorKind::EpochOutOfRange))?;
        table.anchor_offset = anchor_offset;
        table.epoch_jdn = epoch_jdn;

        debug!(
            first_year,
            last_year = table.max_year(),
            days = total,
            anchor = %anchor.gregorian,
            "calendar table built"
        );
        Ok(table)
    }

    /// First supported BS year.
    pub fn min_year(&self) -> i32 {
        self.entries[0].year
    }

    /// Last supported BS year.
    pub fn max_year(&self) -> i32 {
        self.entries[self.entries.len() - 1].year
    }

    pub fn is_supported(&self, year: i32) -> bool {
        (self.min_year()..=self.max_year()).contains(&year)
    }

    /// The epoch anchor the table was built with.
    pub fn anchor(&self) -> EpochAnchor {
        self.anchor
    }

    /// Month lengths of `year`.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedYear`] if `year` is not in the table.
    pub fn entry(&self, year: i32) -> Result<&YearEntry> {
        self.index_of(year).map(|i| &self.entries[i])
    }

    /// All entries in ascending year order.
    pub fn years(&self) -> &[YearEntry] {
        &self.entries
    }

    /// Number of days in `month` of `year`.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedYear`] for years outside the table and
    /// [`Error::MonthOutOfRange`] for months outside `1..=12`.
    ///
    /// ```
    /// use bikram_sambat::CalendarTable;
    ///
    /// let table = CalendarTable::bundled();
    /// assert_eq!(Ok(32), table.month_length(2081, 2));
    /// ```
    pub fn month_length(&self, year: i32, month: u8) -> Result<u8> {
        let entry = self.entry(year)?;
        if !(1..=12).contains(&month) {
            return Err(Error::MonthOutOfRange { month });
        }
        Ok(entry.month_lengths[usize::from(month) - 1])
    }

    /// Number of days in `year`.
    pub fn days_in_year(&self, year: i32) -> Result<u16> {
        self.entry(year).map(YearEntry::days)
    }

    /// Number of days covered by the whole table.
    pub fn total_days(&self) -> u32 {
        self.year_starts[self.entries.len()]
    }

    /// JDN of the first day of the table.
    pub(crate) fn epoch_jdn(&self) -> u32 {
        self.epoch_jdn
    }

    /// Day offset of the anchor's BS date from the first day of the table.
    pub(crate) fn anchor_offset(&self) -> u32 {
        self.anchor_offset
    }

    /// Validates `(year, month, day)` and returns its day offset from the
    /// first day of the table.
    pub(crate) fn day_offset(&self, year: i32, month: u8, day: u8) -> Result<u32> {
        let i = self.index_of(year)?;
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidMonth { month });
        }
        let lengths = &self.entries[i].month_lengths;
        let max_day = lengths[usize::from(month) - 1];
        if !(1..=max_day).contains(&day) {
            return Err(Error::InvalidDay {
                calendar: Calendar::BikramSambat,
                year,
                month,
                day,
                max_day,
            });
        }
        let before: u32 = lengths[..usize::from(month) - 1]
            .iter()
            .map(|&len| u32::from(len))
            .sum();
        Ok(self.year_starts[i] + before + u32::from(day) - 1)
    }

    /// Inverse of [`Self::day_offset`]; `None` past the end of the table.
    pub(crate) fn locate(&self, offset: u32) -> Option<(i32, u8, u8)> {
        if offset >= self.total_days() {
            return None;
        }
        let i = self.year_starts.partition_point(|&start| start <= offset) - 1;
        let entry = &self.entries[i];
        let mut rem = offset - self.year_starts[i];
        for (m, &len) in (1u8..).zip(&entry.month_lengths) {
            if rem < u32::from(len) {
                return Some((entry.year, m, rem as u8 + 1));
            }
            rem -= u32::from(len);
        }
        None
    }

    fn index_of(&self, year: i32) -> Result<usize> {
        if !self.is_supported(year) {
            return Err(Error::UnsupportedYear {
                calendar: Calendar::BikramSambat,
                year,
                min: self.min_year(),
                max: self.max_year(),
            });
        }
        Ok((year - self.min_year()) as usize)
    }
}

fn parse_epoch<'a, I: Iterator<Item = &'a str>>(
    it: &mut I,
    line_num: usize,
) -> Result<EpochAnchor, TableError> {
    use TableErrorKind::*;
    let bs = it
        .next()
        .ok_or_else(|| TableError::new(line_num, 2, MissingField))?;
    let gregorian = it
        .next()
        .ok_or_else(|| TableError::new(line_num, 3, MissingField))?;
    if it.next().is_some() {
        return Err(TableError::new(line_num, 4, ExtraField));
    }
    let bs = parse_ymd(bs).map_err(|e| TableError::new(line_num, 2, InvalidEpoch(e)))?;
    let gregorian = gregorian
        .parse()
        .map_err(|e| TableError::new(line_num, 3, InvalidEpoch(e)))?;
    Ok(EpochAnchor { bs, gregorian })
}

/// Problem found while building a [`CalendarTable`].
///
/// `line` and `field` are 1-based; `0` means the problem is not tied to a
/// single line or field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("calendar data line {line}, field {field}: {reason}")]
pub struct TableError {
    pub line: usize,
    pub field: usize,
    pub reason: TableErrorKind,
}

impl TableError {
    fn new(line: usize, field: usize, reason: TableErrorKind) -> Self {
        Self {
            line,
            field,
            reason,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableErrorKind {
    #[error("invalid integer: {0}")]
    InvalidInt(ParseIntError),
    #[error("missing field")]
    MissingField,
    #[error("unexpected extra field")]
    ExtraField,
    #[error("month length {0} is outside 29..=32")]
    MonthLength(u8),
    #[error("year has {0} days, expected 365 or 366")]
    YearLength(u16),
    #[error("expected year {expected}, found {found}")]
    NonContiguous { expected: i32, found: i32 },
    #[error("no year rows")]
    Empty,
    #[error("years run past the largest representable year")]
    YearOverflow,
    #[error("missing epoch line")]
    MissingEpoch,
    #[error("more than one epoch line")]
    DuplicateEpoch,
    #[error("invalid epoch: {0}")]
    InvalidEpoch(Error),
    #[error("epoch places the table outside Gregorian years 1..=9999")]
    EpochOutOfRange,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHORT: &str = "
# synthetic
epoch 2081-01-01 2024-04-13
2081 31 31 32 31 31 30 30 30 29 30 30 31
2082 31 31 32 31 31 30 30 30 29 30 30 30
";

    #[test]
    fn bundled_bounds() {
        let table = CalendarTable::bundled();
        assert_eq!(2000, table.min_year());
        assert_eq!(2090, table.max_year());
        assert!(table.is_supported(2081));
        assert!(!table.is_supported(1999));
        assert!(!table.is_supported(2091));
        assert_eq!((2000, 1, 1), table.anchor().bs);
        assert_eq!("1943-04-14", table.anchor().gregorian.to_string());
    }

    #[test]
    fn bundled_invariants() {
        let table = CalendarTable::bundled();
        let mut total = 0;
        for entry in table.years() {
            assert!(entry.month_lengths.iter().all(|len| (29..=32).contains(len)));
            assert!(matches!(entry.days(), 365 | 366), "{}", entry.year);
            total += u32::from(entry.days());
        }
        assert_eq!(total, table.total_days());
    }

    #[test]
    fn lengths() {
        let table = CalendarTable::bundled();
        for ((y, m), std) in [((2000, 1), 30), ((2081, 2), 32), ((2081, 9), 29), ((2082, 12), 30)] {
            assert_eq!(Ok(std), table.month_length(y, m), "{y}-{m}");
        }
        assert_eq!(Ok(366), table.days_in_year(2081));
        assert_eq!(Ok(365), table.days_in_year(2082));
        assert_eq!(
            Err(Error::MonthOutOfRange { month: 13 }),
            table.month_length(2081, 13)
        );
        assert_eq!(
            crate::ErrorKind::OutOfRange,
            table.month_length(2091, 1).unwrap_err().kind()
        );
    }

    #[test]
    fn offsets() {
        let table = CalendarTable::parse(SHORT).unwrap();
        assert_eq!(Ok(0), table.day_offset(2081, 1, 1));
        assert_eq!(Ok(31), table.day_offset(2081, 2, 1));
        assert_eq!(Ok(366), table.day_offset(2082, 1, 1));
        assert_eq!(Some((2081, 1, 1)), table.locate(0));
        assert_eq!(Some((2081, 1, 31)), table.locate(30));
        assert_eq!(Some((2081, 2, 1)), table.locate(31));
        assert_eq!(Some((2082, 12, 30)), table.locate(table.total_days() - 1));
        assert_eq!(None, table.locate(table.total_days()));
        for offset in 0..table.total_days() {
            let (y, m, d) = table.locate(offset).unwrap();
            assert_eq!(Ok(offset), table.day_offset(y, m, d));
        }
    }

    #[test]
    fn parse_errors() {
        use TableErrorKind::*;
        let cases: &[(&str, usize, usize, TableErrorKind)] = &[
            ("2081 31 31 32 31 31 30 30 30 29 30 30 31", 0, 0, MissingEpoch),
            ("epoch 2081-01-01 2024-04-13\n2081 31 31", 2, 4, MissingField),
            (
                "epoch 2081-01-01 2024-04-13\n2081 31 31 32 31 31 30 30 30 29 30 30 31 5",
                2,
                14,
                ExtraField,
            ),
            (
                "epoch 2081-01-01 2024-04-13\n2081 31 31 32 31 31 30 30 30 28 30 30 31",
                2,
                10,
                MonthLength(28),
            ),
            (
                "epoch 2081-01-01 2024-04-13\n2081 31 31 32 31 31 30 30 30 29 30 30 32",
                2,
                0,
                YearLength(367),
            ),
            (
                "epoch 2081-01-01 2024-04-13\n\
                 2081 31 31 32 31 31 30 30 30 29 30 30 31\n\
                 2083 31 31 32 31 31 30 30 30 29 30 30 30",
                3,
                1,
                NonContiguous {
                    expected: 2082,
                    found: 2083,
                },
            ),
            ("epoch 2081-01-01 2024-04-13", 0, 0, Empty),
            (
                "epoch 2081-01-01 2024-04-13\nepoch 2081-01-01 2024-04-13",
                2,
                1,
                DuplicateEpoch,
            ),
        ];
        for (raw, line, field, reason) in cases {
            let err = CalendarTable::parse(raw).unwrap_err();
            assert_eq!((*line, *field, reason), (err.line, err.field, &err.reason), "{raw}");
        }
        let err = CalendarTable::parse("epoch 2081-01-01 2024-04-13\n20x1 31").unwrap_err();
        assert!(matches!(err.reason, InvalidInt(_)));
        let err = CalendarTable::parse(
            "epoch 2079-01-01 2024-04-13\n2081 31 31 32 31 31 30 30 30 29 30 30 31",
        )
        .unwrap_err();
        assert!(matches!(err.reason, InvalidEpoch(Error::UnsupportedYear { .. })));
    }

    #[test]
    fn epoch_must_stay_in_gregorian_range() {
        let err = CalendarTable::parse(
            "epoch 2081-01-01 9999-12-01\n2081 31 31 32 31 31 30 30 30 29 30 30 31",
        )
        .unwrap_err();
        assert_eq!(TableErrorKind::EpochOutOfRange, err.reason);
    }

    #[test]
    fn error_message() {
        let err = TableError::new(3, 5, TableErrorKind::MonthLength(40));
        assert_eq!(
            "calendar data line 3, field 5: month length 40 is outside 29..=32",
            err.to_string()
        );
    }
}
