//! Date normalization across the textual encodings found on documents.
//!
//! Format strings use a small subset of the familiar pattern letters:
//!
//! | Token  | Meaning                         |
//! |--------|---------------------------------|
//! | `yyyy` | four-digit year                 |
//! | `yy`   | two-digit year (windowed)       |
//! | `MM`   | two-digit month                 |
//! | `M`    | one- or two-digit month         |
//! | `dd`   | two-digit day                   |
//! | `d`    | one- or two-digit day           |
//!
//! Any other character must appear literally.

use chrono::NaiveDate;
use tracing::trace;

/// Formats tried for dates read from OCR text on identity documents.
///
/// Month-first comes before day-first, so a value such as `03/04/2020` is
/// always read as March 4th. Only values whose first field exceeds 12 fall
/// through to the day-first formats.
pub const TEXT_DATE_FORMATS: &[&str] = &[
    "MM/dd/yyyy",
    "dd/MM/yyyy",
    "MM-dd-yyyy",
    "dd-MM-yyyy",
    "MM/dd/yy",
    "dd/MM/yy",
];

/// Formats tried for dates read from invoice text.
pub const INVOICE_DATE_FORMATS: &[&str] = &[
    "MM/dd/yyyy",
    "MM/dd/yy",
    "M/d/yyyy",
    "M/d/yy",
    "MM-dd-yyyy",
    "MM-dd-yy",
    "M-d-yyyy",
    "M-d-yy",
    "yyyy-MM-dd",
];

/// Two-digit years below this map to 20YY in delimited and AAMVA dates.
pub const TWO_DIGIT_YEAR_PIVOT: u32 = 70;

/// Two-digit years below this map to 20YY in MRZ dates.
pub const MRZ_CENTURY_PIVOT: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Year,
    ShortYear,
    Month,
    Day,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Number { field: Field, min: usize, max: usize },
    Literal(char),
}

fn tokenize(format: &str) -> Option<Vec<Token>> {
    let chars: Vec<char> = format.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let run = chars[i..].iter().take_while(|&&x| x == c).count();

        let token = match (c, run) {
            ('y', 4) => Token::Number { field: Field::Year, min: 4, max: 4 },
            ('y', 2) => Token::Number { field: Field::ShortYear, min: 2, max: 2 },
            ('M', 2) => Token::Number { field: Field::Month, min: 2, max: 2 },
            ('M', 1) => Token::Number { field: Field::Month, min: 1, max: 2 },
            ('d', 2) => Token::Number { field: Field::Day, min: 2, max: 2 },
            ('d', 1) => Token::Number { field: Field::Day, min: 1, max: 2 },
            ('y' | 'M' | 'd', _) => return None,
            _ => {
                tokens.push(Token::Literal(c));
                i += 1;
                continue;
            }
        };

        tokens.push(token);
        i += run;
    }

    Some(tokens)
}

fn parse_with(text: &str, tokens: &[Token]) -> Option<NaiveDate> {
    let mut rest = text;
    let mut year: Option<i32> = None;
    let mut month: Option<u32> = None;
    let mut day: Option<u32> = None;

    for token in tokens {
        match *token {
            Token::Literal(c) => {
                rest = rest.strip_prefix(c)?;
            }
            Token::Number { field, min, max } => {
                let len = rest.bytes().take(max).take_while(u8::is_ascii_digit).count();
                if len < min {
                    return None;
                }
                let value: u32 = rest[..len].parse().ok()?;
                rest = &rest[len..];

                match field {
                    Field::Year => year = Some(value as i32),
                    Field::ShortYear => year = Some(expand_year(value, TWO_DIGIT_YEAR_PIVOT)),
                    Field::Month => month = Some(value),
                    Field::Day => day = Some(value),
                }
            }
        }
    }

    if !rest.is_empty() {
        return None;
    }

    NaiveDate::from_ymd_opt(year?, month?, day?)
}

fn expand_year(two_digit: u32, pivot: u32) -> i32 {
    if two_digit < pivot {
        2000 + two_digit as i32
    } else {
        1900 + two_digit as i32
    }
}

/// Parse `text` with the first format in `formats` that matches it entirely
/// and yields a real calendar date.
///
/// Unknown format strings are skipped.
pub fn parse_date(text: &str, formats: &[&str]) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    for format in formats {
        let Some(tokens) = tokenize(format) else {
            trace!("Skipping unsupported date format {:?}", format);
            continue;
        };
        if let Some(date) = parse_with(text, &tokens) {
            return Some(date);
        }
    }

    None
}

/// Parse an undelimited AAMVA date: `MMDDYYYY` (8 digits) or `MMDDYY` (6 digits).
pub fn parse_fixed_width(code: &str) -> Option<NaiveDate> {
    let code = code.trim();
    if !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    match code.len() {
        8 => parse_date(code, &["MMddyyyy"]),
        6 => parse_date(code, &["MMddyy"]),
        _ => None,
    }
}

/// Parse an MRZ `YYMMDD` date. Years below [`MRZ_CENTURY_PIVOT`] land in the
/// 2000s, the rest in the 1900s.
pub fn parse_mrz_date(code: &str) -> Option<NaiveDate> {
    if code.len() != 6 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let year: u32 = code[0..2].parse().ok()?;
    let month: u32 = code[2..4].parse().ok()?;
    let day: u32 = code[4..6].parse().ok()?;

    NaiveDate::from_ymd_opt(expand_year(year, MRZ_CENTURY_PIVOT), month, day)
}
