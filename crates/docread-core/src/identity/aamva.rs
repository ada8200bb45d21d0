//! AAMVA PDF417 barcode payload decoding for US driver's licenses.
//!
//! The payload is line oriented: a header line starting with `@`, then data
//! element lines made of a 3-character element code (`DAQ`, `DBB`, ...) followed
//! by the value.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, trace};

use crate::error::DocumentError;
use crate::models::document::{DocumentType, Gender, PersonalDocument};
use crate::rules::dates::parse_fixed_width;

/// Element code to raw value, as read from one payload.
pub type ElementMap = HashMap<String, String>;

/// Minimum number of data element lines for a payload to look well formed.
pub const MIN_ELEMENT_LINES: usize = 5;

const NAME_CODES: &[&str] = &["DAC", "DAD", "DCS"];
const NUMBER_CODES: &[&str] = &["DAQ", "DCF"];

const DEFAULT_AUTHORITY: &str = "Department of Motor Vehicles";
const NATIONALITY: &str = "United States";

/// Data element codes understood by this parser, with their AAMVA descriptions.
const ELEMENT_CODES: &[(&str, &str)] = &[
    ("DCA", "Jurisdiction-specific vehicle class"),
    ("DCB", "Jurisdiction-specific restriction codes"),
    ("DCD", "Jurisdiction-specific endorsement codes"),
    ("DBA", "Document expiration date"),
    ("DCS", "Customer family name"),
    ("DAC", "Customer first name"),
    ("DAD", "Customer middle name"),
    ("DBD", "Document issue date"),
    ("DBB", "Date of birth"),
    ("DBC", "Physical description – sex"),
    ("DAY", "Physical description – eye color"),
    ("DAU", "Physical description – height"),
    ("DAG", "Address – street 1"),
    ("DAI", "Address – city"),
    ("DAJ", "Address – jurisdiction code"),
    ("DAK", "Address – postal code"),
    ("DAQ", "Customer ID number"),
    ("DCF", "Document discriminator"),
    ("DCG", "Country identification"),
    ("DDE", "Family name truncation"),
    ("DDF", "First name truncation"),
    ("DDG", "Middle name truncation"),
];

/// Description of a known element code.
pub fn element_description(code: &str) -> Option<&'static str> {
    ELEMENT_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, description)| *description)
}

fn lines(payload: &str) -> Vec<&str> {
    payload.split(['\n', '\r']).collect()
}

fn has_header(lines: &[&str]) -> bool {
    lines.first().is_some_and(|line| line.starts_with('@'))
}

/// Split a data element line into `(code, value)`.
fn element(line: &str) -> Option<(&str, &str)> {
    if !line.starts_with('D') {
        return None;
    }
    let code = line.get(..3).filter(|code| code.is_ascii())?;
    Some((code, &line[3..]))
}

/// Collect the element map of a payload. Later occurrences of a code replace
/// earlier ones.
pub fn element_map(payload: &str) -> ElementMap {
    lines(payload)
        .into_iter()
        .filter_map(element)
        .map(|(code, value)| (code.to_string(), value.to_string()))
        .collect()
}

/// Quick structural pre-screen: `@` header and at least
/// [`MIN_ELEMENT_LINES`] data element lines.
pub fn is_well_formed_aamva(payload: &str) -> bool {
    let lines = lines(payload);
    if !has_header(&lines) {
        return false;
    }
    lines.iter().filter(|line| element(line).is_some()).count() >= MIN_ELEMENT_LINES
}

/// Every data element in the payload, keyed by `"CODE (description)"`.
///
/// Diagnostic only: unknown codes are kept here under `"Unknown field"`.
pub fn extract_all_fields(payload: &str) -> BTreeMap<String, String> {
    element_map(payload)
        .into_iter()
        .map(|(code, value)| {
            let description = element_description(&code).unwrap_or("Unknown field");
            (format!("{} ({})", code, description), value)
        })
        .collect()
}

/// Decode a US driver's license barcode payload.
///
/// Returns `None` for payloads without the `@` header and for payloads with
/// neither a name element (`DAC`/`DAD`/`DCS`) nor a number element
/// (`DAQ`/`DCF`). An identifying element that is present but blank still
/// counts, and surfaces as an empty string.
pub fn parse_us_drivers_license(payload: &str) -> Option<PersonalDocument> {
    try_parse_us_drivers_license(payload).ok()
}

/// Like [`parse_us_drivers_license`], classifying the failure.
pub fn try_parse_us_drivers_license(payload: &str) -> Result<PersonalDocument, DocumentError> {
    if !has_header(&lines(payload)) {
        debug!("Barcode payload rejected: missing '@' header");
        return Err(DocumentError::InvalidDocumentFormat);
    }

    let data = element_map(payload);
    debug!("Barcode payload has {} data elements", data.len());

    let document_number = field(&data, "DAQ")
        .or_else(|| field(&data, "DCF"))
        .or_else(|| blank_if_present(&data, NUMBER_CODES));
    let full_name = full_name(&data).or_else(|| blank_if_present(&data, NAME_CODES));

    let document = PersonalDocument::builder(DocumentType::UsDriversLicenseBarcode)
        .full_name(full_name)
        .date_of_birth(field(&data, "DBB").and_then(|v| parse_fixed_width(&v)))
        .document_number(document_number)
        .expiration_date(field(&data, "DBA").and_then(|v| parse_fixed_width(&v)))
        .nationality(Some(NATIONALITY.to_string()))
        .issuing_authority(Some(issuing_authority(&data)))
        .gender(gender(&data))
        .place_of_birth(address(&data))
        .build();

    document.ok_or_else(|| {
        debug!("Barcode payload rejected: no name or document number elements");
        DocumentError::InvalidDocumentFormat
    })
}

/// Trimmed, non-empty value of an element.
fn field(data: &ElementMap, code: &str) -> Option<String> {
    let value = data.get(code)?.trim();
    if value.is_empty() {
        trace!("Element {} present but blank", code);
        return None;
    }
    Some(value.to_string())
}

/// An empty value when any of `codes` is in the map, blank or not.
fn blank_if_present(data: &ElementMap, codes: &[&str]) -> Option<String> {
    codes
        .iter()
        .any(|code| data.contains_key(*code))
        .then(String::new)
}

fn join_fields(data: &ElementMap, codes: &[&str], separator: &str) -> Option<String> {
    let parts: Vec<String> = codes.iter().filter_map(|code| field(data, code)).collect();
    (!parts.is_empty()).then(|| parts.join(separator))
}

/// First, middle and family name, in that order.
fn full_name(data: &ElementMap) -> Option<String> {
    join_fields(data, NAME_CODES, " ")
}

/// Street, city, jurisdiction and postal code.
fn address(data: &ElementMap) -> Option<String> {
    join_fields(data, &["DAG", "DAI", "DAJ", "DAK"], ", ")
}

fn gender(data: &ElementMap) -> Option<Gender> {
    let code = field(data, "DBC")?;
    Some(match code.to_ascii_uppercase().as_str() {
        "1" | "M" => Gender::Male,
        "2" | "F" => Gender::Female,
        _ => Gender::Unknown,
    })
}

fn issuing_authority(data: &ElementMap) -> String {
    if let Some(jurisdiction) = field(data, "DCG") {
        return format!("{} - {}", DEFAULT_AUTHORITY, jurisdiction);
    }
    field(data, "DCA").unwrap_or_else(|| DEFAULT_AUTHORITY.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn payload(elements: &[&str]) -> String {
        let mut lines = vec!["@", "ANSI 636014040002DL00410278ZC03190008"];
        lines.extend_from_slice(elements);
        lines.join("\n")
    }

    fn sample() -> String {
        payload(&[
            "DAQD1234567",
            "DCSPUBLIC",
            "DACJOHN",
            "DADQUINCY",
            "DBB01152000",
            "DBA01152030",
            "DBC1",
            "DAG123 MAIN ST",
            "DAISACRAMENTO",
            "DAJCA",
            "DAK958220000",
            "DCGUSA",
            "DCFXYZ999",
        ])
    }

    #[test]
    fn test_parse_full_payload() {
        let doc = parse_us_drivers_license(&sample()).unwrap();

        assert_eq!(doc.document_type, DocumentType::UsDriversLicenseBarcode);
        assert_eq!(doc.full_name.as_deref(), Some("JOHN QUINCY PUBLIC"));
        assert_eq!(doc.document_number.as_deref(), Some("D1234567"));
        assert_eq!(doc.date_of_birth, NaiveDate::from_ymd_opt(2000, 1, 15));
        assert_eq!(doc.expiration_date, NaiveDate::from_ymd_opt(2030, 1, 15));
        assert_eq!(doc.gender, Some(Gender::Male));
        assert_eq!(
            doc.issuing_authority.as_deref(),
            Some("Department of Motor Vehicles - USA")
        );
        assert_eq!(
            doc.place_of_birth.as_deref(),
            Some("123 MAIN ST, SACRAMENTO, CA, 958220000")
        );
        assert_eq!(doc.nationality.as_deref(), Some("United States"));
    }

    #[test]
    fn test_dob_wrong_width_is_dropped() {
        let doc = parse_us_drivers_license(&payload(&[
            "DAQD1234567",
            "DBB01159",
            "DBC2",
            "DAJCA",
            "DAKZIP",
        ]))
        .unwrap();
        assert_eq!(doc.date_of_birth, None);
        assert_eq!(doc.gender, Some(Gender::Female));
    }

    #[test]
    fn test_name_without_middle() {
        let doc = parse_us_drivers_license(&payload(&["DACJANE", "DCSDOE"])).unwrap();
        assert_eq!(doc.full_name.as_deref(), Some("JANE DOE"));
        assert_eq!(doc.document_number, None);
    }

    #[test]
    fn test_discriminator_used_when_no_customer_id() {
        let doc = parse_us_drivers_license(&payload(&["DCFXYZ999", "DBB01152000"])).unwrap();
        assert_eq!(doc.document_number.as_deref(), Some("XYZ999"));
        assert_eq!(doc.full_name, None);
    }

    #[test]
    fn test_last_duplicate_wins() {
        let doc = parse_us_drivers_license(&payload(&["DAQFIRST1", "DAQSECOND2"])).unwrap();
        assert_eq!(doc.document_number.as_deref(), Some("SECOND2"));
    }

    #[test]
    fn test_issuing_authority_fallbacks() {
        let with_dca = parse_us_drivers_license(&payload(&["DAQD1", "DCAC"])).unwrap();
        assert_eq!(with_dca.issuing_authority.as_deref(), Some("C"));

        let bare = parse_us_drivers_license(&payload(&["DAQD1"])).unwrap();
        assert_eq!(
            bare.issuing_authority.as_deref(),
            Some("Department of Motor Vehicles")
        );
    }

    #[test]
    fn test_unknown_gender_code() {
        let doc = parse_us_drivers_license(&payload(&["DAQD1", "DBC9"])).unwrap();
        assert_eq!(doc.gender, Some(Gender::Unknown));
    }

    #[test]
    fn test_requires_name_or_number() {
        let text = payload(&["DBB01152000", "DBA01152030", "DBC1", "DAJCA", "DAK95822"]);
        assert!(is_well_formed_aamva(&text));
        assert!(parse_us_drivers_license(&text).is_none());
        assert_eq!(
            try_parse_us_drivers_license(&text),
            Err(DocumentError::InvalidDocumentFormat)
        );
    }

    #[test]
    fn test_each_identifying_code_is_enough() {
        let filler = ["DBB01152000", "DBA01152030", "DBC1", "DAJCA", "DAK95822"];
        for code in ["DACJOHN", "DADQ", "DCSDOE", "DAQD1234567", "DCFXYZ"] {
            let mut elements = filler.to_vec();
            elements.push(code);
            let text = payload(&elements);
            assert!(is_well_formed_aamva(&text));
            assert!(parse_us_drivers_license(&text).is_some(), "{}", code);
        }
    }

    #[test]
    fn test_blank_identifying_element_still_counts() {
        let filler = ["DBB01152000", "DBA01152030", "DBC1", "DAJCA", "DAK95822"];

        let mut elements = filler.to_vec();
        elements.push("DAQ");
        let text = payload(&elements);
        assert!(is_well_formed_aamva(&text));
        let doc = parse_us_drivers_license(&text).unwrap();
        assert_eq!(doc.document_number.as_deref(), Some(""));
        assert_eq!(doc.full_name, None);
        assert_eq!(doc.date_of_birth, NaiveDate::from_ymd_opt(2000, 1, 15));

        let mut elements = filler.to_vec();
        elements.push("DCS   ");
        let doc = parse_us_drivers_license(&payload(&elements)).unwrap();
        assert_eq!(doc.full_name.as_deref(), Some(""));
        assert_eq!(doc.document_number, None);
    }

    #[test]
    fn test_blank_customer_id_falls_back_to_discriminator() {
        let doc = parse_us_drivers_license(&payload(&["DAQ", "DCFXYZ999"])).unwrap();
        assert_eq!(doc.document_number.as_deref(), Some("XYZ999"));
    }

    #[test]
    fn test_missing_header_rejected() {
        let text = sample().replacen('@', "", 1);
        assert!(parse_us_drivers_license(&text).is_none());
        assert!(!is_well_formed_aamva(&text));
    }

    #[test]
    fn test_garbage_input_does_not_panic() {
        let garbage = String::from_utf8_lossy(&[0xff, 0x00, 0x44, 0xc3, 0x28, 0x0a, 0x44, 0xe2, 0x82]).into_owned();
        assert!(parse_us_drivers_license(&garbage).is_none());
        assert!(parse_us_drivers_license("").is_none());
        assert!(parse_us_drivers_license("DAQ123\nDCSDOE").is_none());

        let multibyte = "@\nDéx\nD\u{20ac}x\nDA";
        assert!(parse_us_drivers_license(multibyte).is_none());
        assert!(!is_well_formed_aamva(multibyte));
    }

    #[test]
    fn test_crlf_payload() {
        let text = sample().replace('\n', "\r\n");
        let doc = parse_us_drivers_license(&text).unwrap();
        assert_eq!(doc.full_name.as_deref(), Some("JOHN QUINCY PUBLIC"));
    }

    #[test]
    fn test_well_formed_needs_five_elements() {
        assert!(!is_well_formed_aamva(&payload(&["DAQD1", "DCSDOE", "DACJOHN", "DBC1"])));
        assert!(is_well_formed_aamva(&payload(&[
            "DAQD1", "DCSDOE", "DACJOHN", "DBC1", "DAJCA"
        ])));
    }

    #[test]
    fn test_extract_all_fields_labels_unknown_codes() {
        let fields = extract_all_fields(&payload(&["DAQD1", "DZZWHAT"]));
        assert_eq!(fields.get("DAQ (Customer ID number)").map(String::as_str), Some("D1"));
        assert_eq!(fields.get("DZZ (Unknown field)").map(String::as_str), Some("WHAT"));
    }
}
