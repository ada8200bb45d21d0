//! ICAO 9303 TD-3 machine readable zone decoding.
//!
//! A TD-3 MRZ is two 44-character lines at the bottom of a passport data page:
//!
//! ```text
//! P<USADOE<<JOHN<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<
//! X123456784USA8501155M3001012<<<<<<<<<<<<<<04
//! ```
//!
//! The lines arrive inside an arbitrary OCR line list and are located by shape.

use chrono::NaiveDate;
use tracing::debug;

use super::heuristic;
use crate::models::document::{DocumentType, Gender, PersonalDocument};
use crate::rules::dates::parse_mrz_date;

/// Shortest OCR line considered an MRZ candidate.
pub const MIN_CANDIDATE_LEN: usize = 40;

/// Length of a TD-3 MRZ line.
pub const TD3_LINE_LEN: usize = 44;

const FILLER: char = '<';

/// Fields decoded from a TD-3 MRZ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MrzData {
    pub passport_number: Option<String>,
    pub full_name: Option<String>,
    pub nationality: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub expiration_date: Option<NaiveDate>,
    pub issuing_country: Option<String>,
}

impl MrzData {
    /// Convert into a passport record, subject to the usual name-or-number rule.
    pub fn into_document(self) -> Option<PersonalDocument> {
        PersonalDocument::builder(DocumentType::Passport)
            .full_name(self.full_name)
            .date_of_birth(self.date_of_birth)
            .document_number(self.passport_number)
            .expiration_date(self.expiration_date)
            .nationality(self.nationality)
            .issuing_authority(self.issuing_country)
            .gender(self.gender)
            .build()
    }
}

/// Parse a passport from OCR lines: MRZ first, then the free-text heuristics
/// over the same lines.
pub fn parse_passport<S: AsRef<str>>(lines: &[S]) -> Option<PersonalDocument> {
    if let Some(document) = parse_mrz(lines).and_then(MrzData::into_document) {
        return Some(document);
    }
    debug!("No usable MRZ, falling back to passport text heuristics");
    heuristic::parse_passport_text(lines)
}

/// Strip whitespace and uppercase.
fn normalize(line: &str) -> String {
    line.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

fn is_candidate(line: &str) -> bool {
    line.len() >= MIN_CANDIDATE_LEN
        && line.chars().all(|c| c.is_ascii_alphanumeric() || c == FILLER)
}

/// OCR commonly reads the digit zero as the letter O. Only applied to the data
/// line, where the fields read here are digits or alphanumeric codes.
fn correct_digits(line: &str) -> String {
    line.replace('O', "0")
}

/// Locate and decode a TD-3 MRZ among OCR lines.
///
/// The O-to-0 correction is applied to the data line only; the name line is
/// decoded as read.
pub fn parse_mrz<S: AsRef<str>>(lines: &[S]) -> Option<MrzData> {
    let candidates: Vec<String> = lines
        .iter()
        .map(|line| normalize(line.as_ref()))
        .filter(|line| is_candidate(line))
        .collect();

    if candidates.len() < 2 {
        debug!("Found {} MRZ candidate lines, need 2", candidates.len());
        return None;
    }

    let line1 = &candidates[0];
    let line2 = correct_digits(&candidates[1]);

    if line1.len() < TD3_LINE_LEN || line2.len() < TD3_LINE_LEN {
        debug!(
            "MRZ candidates too short for TD-3 ({} and {} chars)",
            line1.len(),
            line2.len()
        );
        return None;
    }

    if !line1.starts_with("P<") {
        debug!("MRZ first line lacks passport document code");
        return None;
    }

    let country = country_code(&line1[2..5]);

    Some(MrzData {
        passport_number: passport_number(&line2),
        full_name: full_name(line1),
        nationality: country.clone(),
        date_of_birth: parse_mrz_date(&line2[13..19]),
        gender: gender(&line2[20..21]),
        expiration_date: parse_mrz_date(&line2[21..27]),
        issuing_country: country,
    })
}

fn passport_number(line2: &str) -> Option<String> {
    let number = line2[..9].replace(FILLER, "");
    (!number.is_empty()).then_some(number)
}

/// `SURNAME<<GIVEN<NAMES` after the document code and issuing state, rendered
/// as `"GIVEN NAMES SURNAME"`.
fn full_name(line1: &str) -> Option<String> {
    let components: Vec<&str> = line1[5..].split("<<").collect();
    if components.len() < 2 {
        return None;
    }

    let surname = components[0].replace(FILLER, " ");
    let given = components[1].replace(FILLER, " ");
    let name = format!("{} {}", given.trim(), surname.trim());
    let name = name.trim();

    (!name.is_empty()).then(|| name.to_string())
}

fn country_code(field: &str) -> Option<String> {
    let code = field.trim_end_matches(FILLER);
    (!code.is_empty()).then(|| code.to_string())
}

fn gender(marker: &str) -> Option<Gender> {
    match marker {
        "M" => Some(Gender::Male),
        "F" => Some(Gender::Female),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const LINE1: &str = "P<USADOE<<JOHN<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<";
    const LINE2: &str = "X123456784USA8501155M3001012<<<<<<<<<<<<<<04";

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_fixture_lengths() {
        assert_eq!(LINE1.len(), 44);
        assert_eq!(LINE2.len(), 44);
    }

    #[test]
    fn test_parse_td3() {
        let lines = vec!["PASSPORT", "UNITED STATES OF AMERICA", LINE1, LINE2];
        let mrz = parse_mrz(&lines).unwrap();

        assert_eq!(
            mrz,
            MrzData {
                passport_number: Some("X12345678".to_string()),
                full_name: Some("JOHN DOE".to_string()),
                nationality: Some("USA".to_string()),
                date_of_birth: date(1985, 1, 15),
                gender: Some(Gender::Male),
                expiration_date: date(2030, 1, 1),
                issuing_country: Some("USA".to_string()),
            }
        );
    }

    #[test]
    fn test_spaces_and_case_are_normalized() {
        let spaced = "p<usa doe<<john <<<<<<<<<<<<<<<<<<<<<<<<<<<<<<";
        let lines = vec![spaced, LINE2];
        let mrz = parse_mrz(&lines).unwrap();
        assert_eq!(mrz.full_name.as_deref(), Some("JOHN DOE"));
    }

    #[test]
    fn test_letter_o_read_as_zero_in_data_line() {
        let ocr_line2 = "X123456784USA85O1155M3OO1O12<<<<<<<<<<<<<<O4";
        let lines = vec![LINE1, ocr_line2];
        let mrz = parse_mrz(&lines).unwrap();
        assert_eq!(mrz.date_of_birth, date(1985, 1, 15));
        assert_eq!(mrz.expiration_date, date(2030, 1, 1));
        // Names keep their letter O.
        assert_eq!(mrz.full_name.as_deref(), Some("JOHN DOE"));
    }

    #[test]
    fn test_multi_part_given_names() {
        let line1 = "P<GBRSMITH<JONES<<ANNA<MARIA<<<<<<<<<<<<<<<<";
        let lines = vec![line1, LINE2];
        let mrz = parse_mrz(&lines).unwrap();
        assert_eq!(mrz.full_name.as_deref(), Some("ANNA MARIA SMITH JONES"));
        assert_eq!(mrz.nationality.as_deref(), Some("GBR"));
    }

    #[test]
    fn test_filler_country_is_none() {
        let line1 = "P<<<<DOE<<JOHN<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<";
        let mrz = parse_mrz(&[line1, LINE2]).unwrap();
        assert_eq!(mrz.nationality, None);
        assert_eq!(mrz.issuing_country, None);
    }

    #[test]
    fn test_unknown_gender_marker() {
        let line2 = "X123456784USA8501155<3001012<<<<<<<<<<<<<<04";
        let mrz = parse_mrz(&[LINE1, line2]).unwrap();
        assert_eq!(mrz.gender, None);
    }

    #[test]
    fn test_requires_passport_code() {
        let line1 = "I<USADOE<<JOHN<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<";
        assert!(parse_mrz(&[line1, LINE2]).is_none());
    }

    #[test]
    fn test_requires_two_full_length_lines() {
        assert!(parse_mrz(&[LINE1]).is_none());
        assert!(parse_mrz(&[&LINE1[..42], &LINE2[..42]]).is_none());
    }

    #[test]
    fn test_non_mrz_characters_disqualify_line() {
        let noisy = "X123456784USA8501155M3001012<<<<<<<<<<<<<-04";
        assert!(parse_mrz(&[LINE1, noisy]).is_none());
    }

    #[test]
    fn test_parse_passport_from_mrz() {
        let doc = parse_passport(&[LINE1, LINE2]).unwrap();
        assert_eq!(doc.document_type, DocumentType::Passport);
        assert_eq!(doc.full_name.as_deref(), Some("JOHN DOE"));
        assert_eq!(doc.document_number.as_deref(), Some("X12345678"));
        assert_eq!(doc.issuing_authority.as_deref(), Some("USA"));
    }

    #[test]
    fn test_parse_passport_falls_back_to_text() {
        let line1 = "I<USADOE<<JOHN<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<";
        let lines = vec![
            "REPUBLIC OF TESTLAND",
            "SURNAME DOE",
            "PASSPORT NO: X98765432",
            line1,
            LINE2,
        ];
        let doc = parse_passport(&lines).unwrap();
        assert_eq!(doc.full_name.as_deref(), Some("DOE"));
        assert_eq!(doc.document_number.as_deref(), Some("X98765432"));
        assert_eq!(doc.issuing_authority.as_deref(), Some("REPUBLIC OF TESTLAND"));
    }
}
