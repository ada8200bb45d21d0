//! Keyword- and pattern-based field extraction from free-form OCR lines.
//!
//! Used for driver's licenses and national IDs, and for passports whose MRZ
//! could not be decoded. Regex patterns run over the space-joined text;
//! keyword extraction runs line by line.

use regex::Regex;
use tracing::{debug, trace};

use crate::models::document::{DocumentType, Gender, PersonalDocument};
use crate::rules::dates::{parse_date, TEXT_DATE_FORMATS};
use crate::rules::matcher::{extract_after_keyword, first_match, line_containing};
use crate::rules::patterns::*;

/// Shortest accepted unlabeled capitalized name.
const MIN_FALLBACK_NAME_LEN: usize = 5;

/// Per-document-type keyword and pattern lists.
struct Profile {
    document_type: DocumentType,
    name_keywords: &'static [&'static str],
    dob_patterns: &'static [Regex],
    expiry_patterns: &'static [Regex],
    number_patterns: &'static [Regex],
    authority_keywords: &'static [&'static str],
    reads_nationality: bool,
}

impl Profile {
    fn for_type(document_type: DocumentType) -> Option<Self> {
        let profile = match document_type {
            DocumentType::DriversLicense => Self {
                document_type,
                name_keywords: ID_NAME_KEYWORDS,
                dob_patterns: &ID_DOB_PATTERNS,
                expiry_patterns: &ID_EXPIRY_PATTERNS,
                number_patterns: &LICENSE_NUMBER_PATTERNS,
                authority_keywords: LICENSE_AUTHORITY_KEYWORDS,
                reads_nationality: false,
            },
            DocumentType::NationalId => Self {
                document_type,
                name_keywords: ID_NAME_KEYWORDS,
                dob_patterns: &ID_DOB_PATTERNS,
                expiry_patterns: &ID_EXPIRY_PATTERNS,
                number_patterns: &ID_NUMBER_PATTERNS,
                authority_keywords: NATIONAL_ID_AUTHORITY_KEYWORDS,
                reads_nationality: false,
            },
            DocumentType::Passport => Self {
                document_type,
                name_keywords: PASSPORT_NAME_KEYWORDS,
                dob_patterns: &PASSPORT_DOB_PATTERNS,
                expiry_patterns: &PASSPORT_EXPIRY_PATTERNS,
                number_patterns: &PASSPORT_NUMBER_PATTERNS,
                authority_keywords: PASSPORT_AUTHORITY_KEYWORDS,
                reads_nationality: true,
            },
            DocumentType::UsDriversLicenseBarcode => return None,
        };
        Some(profile)
    }
}

/// Parse a driver's license or national ID from OCR lines.
///
/// Returns `None` for other document types; passports go through
/// [`parse_passport`](super::mrz::parse_passport).
pub fn parse_id<S: AsRef<str>>(lines: &[S], document_type: DocumentType) -> Option<PersonalDocument> {
    match document_type {
        DocumentType::DriversLicense | DocumentType::NationalId => parse_with_profile(lines, document_type),
        _ => {
            debug!("{} is not an ID card type", document_type.display_name());
            None
        }
    }
}

/// Parse a passport page from OCR lines without looking for an MRZ.
pub fn parse_passport_text<S: AsRef<str>>(lines: &[S]) -> Option<PersonalDocument> {
    parse_with_profile(lines, DocumentType::Passport)
}

fn parse_with_profile<S: AsRef<str>>(lines: &[S], document_type: DocumentType) -> Option<PersonalDocument> {
    let profile = Profile::for_type(document_type)?;
    let lines: Vec<&str> = lines.iter().map(|l| l.as_ref()).collect();
    let text = lines.join(" ");

    let nationality = if profile.reads_nationality {
        extract_after_keyword(&lines, NATIONALITY_KEYWORDS)
    } else {
        None
    };

    let document = PersonalDocument::builder(profile.document_type)
        .full_name(extract_name(&lines, profile.name_keywords))
        .date_of_birth(extract_date(&text, profile.dob_patterns))
        .document_number(first_match(&text, profile.number_patterns))
        .expiration_date(extract_date(&text, profile.expiry_patterns))
        .nationality(nationality)
        .issuing_authority(line_containing(&lines, profile.authority_keywords))
        .gender(extract_gender(&text))
        .build();

    match &document {
        Some(doc) => debug!(
            "Heuristic {} parse extracted {:?}",
            document_type.display_name(),
            doc.present_fields()
        ),
        None => debug!(
            "Heuristic {} parse found no name or document number",
            document_type.display_name()
        ),
    }

    document
}

/// Labeled name first, then the first unlabeled `Firstname Lastname` pair.
///
/// The unlabeled fallback accepts any two capitalized words, so place names
/// and headings such as `"New Mexico"` are picked up when no label exists.
pub fn extract_name(lines: &[&str], keywords: &[&str]) -> Option<String> {
    if let Some(name) = extract_after_keyword(lines, keywords) {
        return Some(name);
    }

    trace!("No labeled name, trying capitalized word pairs");
    lines.iter().find_map(|line| {
        CAPITALIZED_NAME
            .find(line)
            .map(|m| m.as_str())
            .filter(|name| name.len() >= MIN_FALLBACK_NAME_LEN)
            .map(str::to_string)
    })
}

fn extract_date(text: &str, patterns: &[Regex]) -> Option<chrono::NaiveDate> {
    let raw = first_match(text, patterns)?;
    let date = parse_date(&raw, TEXT_DATE_FORMATS);
    if date.is_none() {
        trace!("Matched date text did not parse");
    }
    date
}

fn extract_gender(text: &str) -> Option<Gender> {
    first_match(text, &GENDER_PATTERNS).and_then(|m| Gender::from_marker(&m))
}
