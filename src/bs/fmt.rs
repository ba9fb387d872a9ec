//! Nepali numerals, month and weekday names, and pattern formatting.
//!
//! # Patterns
//!
//! | Token | Output |
//! |-------|--------|
//! | `YYYY` | year, at least four digits |
//! | `YY` | last two digits of the year |
//! | `MMMM` | month name |
//! | `MM` | month, two digits |
//! | `M` | month |
//! | `DD` | day, two digits |
//! | `D` | day |
//! | `dddd` | weekday name |
//!
//! The longest token wins, so `MMM` is `MM` followed by `M`. Text inside
//! `[...]` is copied without the brackets; every other character is copied
//! as is.

use serde::{Deserialize, Serialize};

use crate::error::{Calendar, Error, Result};

/// Devanagari digits `०` to `९`.
pub const DEVANAGARI_DIGITS: [char; 10] = ['०', '१', '२', '३', '४', '५', '६', '७', '८', '९'];

/// Bikram Sambat month names in romanized Nepali, Baisakh first.
pub const BS_MONTHS_EN: [&str; 12] = [
    "Baisakh", "Jestha", "Asar", "Shrawan", "Bhadra", "Ashwin", "Kartik", "Mangsir", "Poush",
    "Magh", "Falgun", "Chaitra",
];
/// Bikram Sambat month names in Nepali.
pub const BS_MONTHS_NE: [&str; 12] = [
    "बैशाख", "जेठ", "असार", "साउन", "भदौ", "असोज", "कात्तिक", "मंसिर", "पुस", "माघ", "फागुन", "चैत",
];
pub const AD_MONTHS_EN: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];
/// Gregorian month names as written in Nepali.
pub const AD_MONTHS_NE: [&str; 12] = [
    "जनवरी", "फेब्रुअरी", "मार्च", "अप्रिल", "मे", "जुन", "जुलाई", "अगस्ट", "सेप्टेम्बर",
    "अक्टोबर", "नोभेम्बर", "डिसेम्बर",
];
/// Weekday names, Monday first (ISO-8601 order).
pub const WEEKDAYS_EN: [&str; 7] = [
    "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
];
pub const WEEKDAYS_NE: [&str; 7] = [
    "सोमबार", "मंगलबार", "बुधबार", "बिहिबार", "शुक्रबार", "शनिबार", "आइतबार",
];

/// Digit glyphs used when rendering numbers.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Digits {
    #[default]
    Arabic,
    Devanagari,
}

/// Language of month and weekday names.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    English,
    Nepali,
}

/// Rendering options for the `format` methods of the date types.
///
/// Each numeric field picks its digits independently. Deserializes from
/// partial configuration, missing keys taking their defaults:
///
/// ```
/// use bikram_sambat::{Digits, FormatOptions, Locale};
///
/// let opts: FormatOptions = serde_json::from_str(r#"{"year_digits": "devanagari"}"#).unwrap();
/// assert_eq!(Digits::Devanagari, opts.year_digits);
/// assert_eq!(Digits::Arabic, opts.day_digits);
/// assert_eq!(Locale::English, opts.names);
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    pub year_digits: Digits,
    pub month_digits: Digits,
    pub day_digits: Digits,
    pub names: Locale,
}

impl FormatOptions {
    /// Arabic digits and English names.
    pub fn arabic() -> Self {
        Self::default()
    }

    /// Devanagari digits and Nepali names.
    pub fn devanagari() -> Self {
        Self::default()
            .with_digits(Digits::Devanagari)
            .with_names(Locale::Nepali)
    }

    /// Uses `digits` for every numeric field.
    pub fn with_digits(self, digits: Digits) -> Self {
        Self {
            year_digits: digits,
            month_digits: digits,
            day_digits: digits,
            ..self
        }
    }

    pub fn with_names(self, names: Locale) -> Self {
        Self { names, ..self }
    }
}

/// Converts a non-negative integer to Devanagari digits.
///
/// # Errors
///
/// [`Error::NegativeNumeral`] for negative input.
///
/// # Example
///
/// ```
/// use bikram_sambat::bs::fmt::to_devanagari_digits;
///
/// assert_eq!("२०८१", to_devanagari_digits(2081).unwrap());
/// assert!(to_devanagari_digits(-1).is_err());
/// ```
pub fn to_devanagari_digits(n: i64) -> Result<String> {
    if n < 0 {
        return Err(Error::NegativeNumeral { value: n });
    }
    Ok(render_number(n as u64, 0, Digits::Devanagari))
}

/// Renders `n` zero-padded to `width` digits.
fn render_number(n: u64, width: usize, digits: Digits) -> String {
    let arabic = format!("{n:0width$}");
    match digits {
        Digits::Arabic => arabic,
        Digits::Devanagari => arabic
            .bytes()
            .map(|b| DEVANAGARI_DIGITS[usize::from(b - b'0')])
            .collect(),
    }
}

/// Parses an unsigned decimal number written in Arabic or Devanagari digits.
/// The two kinds may be mixed.
///
/// # Example
///
/// ```
/// use bikram_sambat::bs::fmt::parse_digits;
///
/// assert_eq!(Ok(2081), parse_digits("२०८१"));
/// assert_eq!(Ok(45), parse_digits("45"));
/// assert!(parse_digits("").is_err());
/// ```
pub fn parse_digits(s: &str) -> Result<u32> {
    let malformed = || Error::Malformed {
        input: s.to_owned(),
        expected: "decimal digits",
    };
    if s.is_empty() {
        return Err(malformed());
    }
    s.chars().try_fold(0u32, |acc, c| {
        let digit = c
            .to_digit(10)
            .or_else(|| DEVANAGARI_DIGITS.iter().position(|&d| d == c).map(|i| i as u32))
            .ok_or_else(malformed)?;
        acc.checked_mul(10)
            .and_then(|acc| acc.checked_add(digit))
            .ok_or_else(malformed)
    })
}

/// Splits `YYYY-MM-DD` (or `YYYY/MM/DD`) into its fields without checking
/// that the date exists.
pub(crate) fn parse_ymd(s: &str) -> Result<(i32, u8, u8)> {
    let malformed = || Error::Malformed {
        input: s.to_owned(),
        expected: "a date like YYYY-MM-DD",
    };
    let mut parts = s.trim().split(['-', '/']);
    let (Some(y), Some(m), Some(d), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(malformed());
    };
    let year = i32::try_from(parse_digits(y)?).map_err(|_| malformed())?;
    let month = u8::try_from(parse_digits(m)?).map_err(|_| malformed())?;
    let day = u8::try_from(parse_digits(d)?).map_err(|_| malformed())?;
    Ok((year, month, day))
}

/// Name of `month` (`1..=12`) of the given calendar.
///
/// # Panics
///
/// Panics if `month` is not in `1..=12`.
pub fn month_name(calendar: Calendar, month: u8, locale: Locale) -> &'static str {
    let names = match (calendar, locale) {
        (Calendar::BikramSambat, Locale::English) => &BS_MONTHS_EN,
        (Calendar::BikramSambat, Locale::Nepali) => &BS_MONTHS_NE,
        (Calendar::Gregorian, Locale::English) => &AD_MONTHS_EN,
        (Calendar::Gregorian, Locale::Nepali) => &AD_MONTHS_NE,
    };
    match month {
        1..=12 => names[usize::from(month) - 1],
        _ => panic!("month {} not in 1..=12", month),
    }
}

/// Name of an ISO-8601 weekday (`1..=7`, Monday first).
///
/// # Panics
///
/// Panics if `day_of_week` is not in `1..=7`.
pub fn weekday_name(day_of_week: u8, locale: Locale) -> &'static str {
    let names = match locale {
        Locale::English => &WEEKDAYS_EN,
        Locale::Nepali => &WEEKDAYS_NE,
    };
    match day_of_week {
        1..=7 => names[usize::from(day_of_week) - 1],
        _ => panic!("weekday {} not in 1..=7", day_of_week),
    }
}

/// The values a pattern can refer to.
#[derive(Debug, Copy, Clone)]
pub(crate) struct Fields {
    pub calendar: Calendar,
    pub year: i32,
    pub month: u8,
    pub day: u8,
    /// ISO-8601 weekday, `1..=7`.
    pub day_of_week: u8,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Token<'a> {
    Year4,
    Year2,
    MonthName,
    Month2,
    Month,
    Day2,
    Day,
    Weekday,
    Literal(&'a str),
}

const TOKENS: &[(&str, Token<'static>)] = &[
    ("YYYY", Token::Year4),
    ("MMMM", Token::MonthName),
    ("dddd", Token::Weekday),
    ("YY", Token::Year2),
    ("MM", Token::Month2),
    ("DD", Token::Day2),
    ("M", Token::Month),
    ("D", Token::Day),
];

fn tokenize(pattern: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = pattern;
    while let Some(c) = rest.chars().next() {
        if c == '[' {
            let body = &rest[1..];
            let end = body.find(']').unwrap_or(body.len());
            tokens.push(Token::Literal(&body[..end]));
            rest = body.get(end + 1..).unwrap_or("");
            continue;
        }
        if let Some((text, token)) = TOKENS.iter().find(|(text, _)| rest.starts_with(text)) {
            tokens.push(*token);
            rest = &rest[text.len()..];
            continue;
        }
        tokens.push(Token::Literal(&rest[..c.len_utf8()]));
        rest = &rest[c.len_utf8()..];
    }
    tokens
}

/// Renders `fields` according to `pattern`.
///
/// # Panics
///
/// Panics if `month` is not in `1..=12` or `day_of_week` not in `1..=7`
/// and the pattern names them.
pub(crate) fn format_fields(fields: &Fields, pattern: &str, options: &FormatOptions) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    for token in tokenize(pattern) {
        match token {
            Token::Year4 => {
                if fields.year < 0 {
                    out.push('-');
                }
                out += &render_number(fields.year.unsigned_abs().into(), 4, options.year_digits);
            }
            Token::Year2 => {
                out += &render_number(fields.year.rem_euclid(100) as u64, 2, options.year_digits);
            }
            Token::MonthName => out += month_name(fields.calendar, fields.month, options.names),
            Token::Month2 => out += &render_number(fields.month.into(), 2, options.month_digits),
            Token::Month => out += &render_number(fields.month.into(), 0, options.month_digits),
            Token::Day2 => out += &render_number(fields.day.into(), 2, options.day_digits),
            Token::Day => out += &render_number(fields.day.into(), 0, options.day_digits),
            Token::Weekday => out += weekday_name(fields.day_of_week, options.names),
            Token::Literal(text) => out += text,
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(year: i32, month: u8, day: u8) -> Fields {
        Fields {
            calendar: Calendar::BikramSambat,
            year,
            month,
            day,
            day_of_week: 7,
        }
    }

    #[test]
    fn devanagari_digits() {
        for (std, n) in [
            ("०", 0),
            ("९", 9),
            ("१०", 10),
            ("२०८१", 2081),
            ("१२३४५६७८९०", 1234567890),
        ] {
            assert_eq!(Ok(std.to_owned()), to_devanagari_digits(n));
        }
        assert_eq!(
            Err(Error::NegativeNumeral { value: -1 }),
            to_devanagari_digits(-1)
        );
    }

    #[test]
    fn digits_parse() {
        assert_eq!(Ok(2081), parse_digits("२०८१"));
        assert_eq!(Ok(2081), parse_digits("२0८1"));
        assert_eq!(Ok(7), parse_digits("007"));
        for bad in ["", "-1", "1a", "१ २", "99999999999"] {
            assert_eq!(
                crate::ErrorKind::InvalidArgument,
                parse_digits(bad).unwrap_err().kind(),
                "{bad}"
            );
        }
    }

    #[test]
    fn ymd_parse() {
        assert_eq!(Ok((2081, 1, 1)), parse_ymd("2081-01-01"));
        assert_eq!(Ok((2081, 12, 30)), parse_ymd(" २०८१/१२/३० "));
        assert!(parse_ymd("2081-01").is_err());
        assert!(parse_ymd("2081-01-01-01").is_err());
        assert!(parse_ymd("2081-300-01").is_err());
    }

    #[test]
    fn names() {
        assert_eq!("Baisakh", month_name(Calendar::BikramSambat, 1, Locale::English));
        assert_eq!("चैत", month_name(Calendar::BikramSambat, 12, Locale::Nepali));
        assert_eq!("April", month_name(Calendar::Gregorian, 4, Locale::English));
        assert_eq!("अप्रिल", month_name(Calendar::Gregorian, 4, Locale::Nepali));
        assert_eq!("Sunday", weekday_name(7, Locale::English));
        assert_eq!("आइतबार", weekday_name(7, Locale::Nepali));
        assert_eq!("सोमबार", weekday_name(1, Locale::Nepali));
    }

    #[test]
    fn tokens() {
        use Token::*;
        assert_eq!(
            vec![Year4, Literal("-"), Month2, Literal("-"), Day2],
            tokenize("YYYY-MM-DD")
        );
        assert_eq!(vec![Month2, Month, Literal(" "), Year2, Literal("Y")], tokenize("MMM YYY"));
        assert_eq!(
            vec![Literal("YYYY is "), Year4, Literal("!")],
            tokenize("[YYYY is ]YYYY!")
        );
        assert_eq!(vec![Literal("unclosed")], tokenize("[unclosed"));
        assert_eq!(vec![Literal("स"), Day], tokenize("सD"));
    }

    #[test]
    fn formatting() {
        let f = fields(2081, 1, 1);
        let dev = FormatOptions::default().with_digits(Digits::Devanagari);
        for (std, pattern, opts) in [
            ("2081-01-01", "YYYY-MM-DD", FormatOptions::default()),
            ("२०८१-०१-०१", "YYYY-MM-DD", dev),
            ("1 Baisakh 2081", "D MMMM YYYY", FormatOptions::default()),
            ("१ बैशाख २०८१, आइतबार", "D MMMM YYYY, dddd", FormatOptions::devanagari()),
            ("81/1/1", "YY/M/D", FormatOptions::default()),
            ("[2081]", "[[]YYYY[]]", FormatOptions::default()),
            ("Sunday, 1 Baisakh", "dddd, D MMMM", FormatOptions::default()),
        ] {
            assert_eq!(std, format_fields(&f, pattern, &opts), "{pattern}");
        }
    }

    #[test]
    fn negative_years_keep_their_sign() {
        let opts = FormatOptions::default();
        assert_eq!("-0005", format_fields(&fields(-5, 1, 1), "YYYY", &opts));
        assert_eq!("-12345", format_fields(&fields(-12345, 1, 1), "YYYY", &opts));
        assert_eq!("95", format_fields(&fields(-5, 1, 1), "YY", &opts));
        assert_eq!(
            "-००८१",
            format_fields(&fields(-81, 1, 1), "YYYY", &FormatOptions::devanagari())
        );
    }

    #[test]
    fn mixed_digits() {
        let opts = FormatOptions {
            year_digits: Digits::Devanagari,
            month_digits: Digits::Arabic,
            day_digits: Digits::Devanagari,
            names: Locale::English,
        };
        assert_eq!("२०८१-07-०५", format_fields(&fields(2081, 7, 5), "YYYY-MM-DD", &opts));
    }

    #[test]
    fn options_serde() {
        let opts = FormatOptions::devanagari();
        let json = serde_json::to_string(&opts).unwrap();
        assert_eq!(
            concat!(
                r#"{"year_digits":"devanagari","month_digits":"devanagari","#,
                r#""day_digits":"devanagari","names":"nepali"}"#,
            ),
            json
        );
        assert_eq!(opts, serde_json::from_str(&json).unwrap());
        assert_eq!(FormatOptions::arabic(), serde_json::from_str("{}").unwrap());
    }
}
