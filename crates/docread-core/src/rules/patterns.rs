//! Pattern tables for identity document and invoice extraction.
//!
//! Every list is ordered most-specific-first and evaluated with
//! [`first_match`](super::matcher::first_match); all of them are compiled
//! case-insensitively unless noted.

use lazy_static::lazy_static;
use regex::Regex;

use super::matcher::compile_patterns;

/// A delimited numeric date as printed on card faces.
macro_rules! date_after {
    ($label:literal) => {
        concat!(r"\b", $label, r"[: ]*([0-9]{1,2}[/-][0-9]{1,2}[/-][0-9]{2,4})")
    };
}

// Name keywords, scanned line by line.
pub const PASSPORT_NAME_KEYWORDS: &[&str] = &["NAME", "SURNAME", "GIVEN NAME", "HOLDER"];
pub const ID_NAME_KEYWORDS: &[&str] = &[
    "NAME",
    "NOME",
    "FULL NAME",
    "LASTNAME",
    "FIRST NAME",
    "LN",
    "FN",
];

pub const NATIONALITY_KEYWORDS: &[&str] = &["NATIONALITY", "CITIZEN", "COUNTRY OF BIRTH"];

// Issuing authority keywords, matched as substrings of the uppercased line.
pub const LICENSE_AUTHORITY_KEYWORDS: &[&str] = &["DMV", "DEPARTMENT", "MOTOR", "VEHICLE", "STATE"];
pub const NATIONAL_ID_AUTHORITY_KEYWORDS: &[&str] =
    &["GOVERNMENT", "MINISTRY", "DEPARTMENT", "STATE", "FEDERAL"];
pub const PASSPORT_AUTHORITY_KEYWORDS: &[&str] =
    &["AUTHORITY", "ISSUING", "GOVERNMENT", "REPUBLIC", "KINGDOM", "STATE"];

// Corporate-entity keywords, matched as substrings of the lowercased line.
pub const VENDOR_KEYWORDS: &[&str] = &[
    "company",
    "corp",
    "corporation",
    "inc",
    "llc",
    "ltd",
    "limited",
];

lazy_static! {
    /// Unlabeled "Firstname Lastname" fallback. Case-sensitive.
    pub static ref CAPITALIZED_NAME: Regex = Regex::new(r"[A-Z][a-z]+ [A-Z][a-z]+").unwrap();

    // Date of birth
    pub static ref ID_DOB_PATTERNS: Vec<Regex> = compile_patterns(&[
        date_after!("DATE OF BIRTH"),
        date_after!("DOB"),
        date_after!("BIRTH"),
        date_after!("BORN"),
        r"\b([0-9]{1,2}[/-][0-9]{1,2}[/-][0-9]{4})\b",
    ]);

    pub static ref PASSPORT_DOB_PATTERNS: Vec<Regex> = compile_patterns(&[
        date_after!("DATE OF BIRTH"),
        date_after!("DOB"),
        date_after!("BIRTH"),
    ]);

    // Expiration date
    pub static ref ID_EXPIRY_PATTERNS: Vec<Regex> = compile_patterns(&[
        date_after!("DATE OF EXPIRY"),
        date_after!("VALID UNTIL"),
        date_after!("EXPIRES"),
        date_after!("EXPIRY"),
        date_after!("EXP"),
    ]);

    pub static ref PASSPORT_EXPIRY_PATTERNS: Vec<Regex> = compile_patterns(&[
        date_after!("DATE OF EXPIRY"),
        date_after!("EXPIRY"),
        date_after!("EXPIRES"),
    ]);

    // Document numbers
    pub static ref LICENSE_NUMBER_PATTERNS: Vec<Regex> = compile_patterns(&[
        r"\bDL\b[#: ]*([A-Z0-9]{8,20})\b",
        r"\bLIC\b[#: ]*([A-Z0-9]{8,20})\b",
        r"\bLICENSE\b[#: ]*([A-Z0-9]{8,20})\b",
        r"\b([A-Z][0-9]{7,15})\b",
        r"\b([0-9]{8,15})\b",
    ]);

    pub static ref ID_NUMBER_PATTERNS: Vec<Regex> = compile_patterns(&[
        r"\bID\b[#: ]*([A-Z0-9]{8,20})\b",
        r"\bNUMBER\b[#: ]*([A-Z0-9]{8,20})\b",
        r"\b([A-Z][0-9]{7,15})\b",
        r"\b([0-9]{8,15})\b",
    ]);

    pub static ref PASSPORT_NUMBER_PATTERNS: Vec<Regex> = compile_patterns(&[
        r"\bPASSPORT\s*(?:NO\b\.?|NUMBER\b|#)[.#: ]*([A-Z0-9]{6,12})\b",
        r"\bNO\b[.: ]*([A-Z0-9]{6,12})\b",
        r"\bNUMBER\b[.: ]*([A-Z0-9]{6,12})\b",
        r"\b([A-Z][0-9]{8})\b",
        r"\b([0-9]{8,9})\b",
    ]);

    pub static ref GENDER_PATTERNS: Vec<Regex> = compile_patterns(&[
        r"\bSEX[: ]*([MF])",
        r"\bGENDER[: ]*([MF])",
        r"\b([MF])\b",
    ]);

    // Invoice amounts
    pub static ref AMOUNT_PATTERNS: Vec<Regex> = compile_patterns(&[
        r"\$[\d,]+\.?\d*",
        r"total:?\s*\$?[\d,]+\.?\d*",
        r"amount:?\s*\$?[\d,]+\.?\d*",
    ]);

    // Invoice dates, each tried against the invoice date formats.
    pub static ref INVOICE_DATE_PATTERNS: Vec<Regex> = compile_patterns(&[
        r"\d{1,2}/\d{1,2}/\d{2,4}",
        r"\d{1,2}-\d{1,2}-\d{2,4}",
        r"\d{4}-\d{2}-\d{2}",
    ]);

    // Invoice number codes are upper-case only, even behind a case-insensitive label.
    pub static ref INVOICE_NUMBER_PATTERNS: Vec<Regex> = compile_patterns(&[
        r"\binvoice\s*(?:number|no\.?)?\s*#?:?\s*((?-i:[A-Z0-9][A-Z0-9\-]{2,}))",
        r"\binv\b\.?\s*#?:?\s*((?-i:[A-Z0-9][A-Z0-9\-]{2,}))",
        r"#((?-i:[A-Z0-9\-]{3,}))",
    ]);

    /// `description quantity unit_price amount` on a single line.
    pub static ref LINE_ITEM: Regex = Regex::new(
        r"^(.+?)\s+(\d+)\s+\$?([\d,]+\.?\d*)\s+\$?([\d,]+\.?\d*)$"
    ).unwrap();

    /// Bare capitalized vendor line. Case-sensitive.
    pub static ref VENDOR_NAME: Regex = Regex::new(r"^[A-Z][a-zA-Z\s&]+$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::super::matcher::first_match;
    use super::*;

    #[test]
    fn test_all_tables_compile() {
        for table in [
            &*ID_DOB_PATTERNS,
            &*PASSPORT_DOB_PATTERNS,
            &*ID_EXPIRY_PATTERNS,
            &*PASSPORT_EXPIRY_PATTERNS,
            &*LICENSE_NUMBER_PATTERNS,
            &*ID_NUMBER_PATTERNS,
            &*PASSPORT_NUMBER_PATTERNS,
            &*GENDER_PATTERNS,
            &*AMOUNT_PATTERNS,
            &*INVOICE_DATE_PATTERNS,
            &*INVOICE_NUMBER_PATTERNS,
        ] {
            assert!(!table.is_empty());
        }
        assert!(LINE_ITEM.is_match("Widget 3 $10.00 $30.00"));
        assert!(VENDOR_NAME.is_match("Acme & Sons"));
    }

    #[test]
    fn test_labeled_license_number_beats_bare() {
        let text = "12345678901 DL# D12345678";
        assert_eq!(
            first_match(text, &LICENSE_NUMBER_PATTERNS),
            Some("D12345678".to_string())
        );
    }

    #[test]
    fn test_passport_header_is_not_a_number() {
        let text = "PASSPORT UNITED STATES PASSPORT NO: X12345678";
        assert_eq!(
            first_match(text, &PASSPORT_NUMBER_PATTERNS),
            Some("X12345678".to_string())
        );
    }

    #[test]
    fn test_gender_label_with_word() {
        assert_eq!(first_match("SEX: MALE", &GENDER_PATTERNS), Some("M".to_string()));
        assert_eq!(first_match("Gender F", &GENDER_PATTERNS), Some("F".to_string()));
    }

    #[test]
    fn test_invoice_number_code_is_upper_case() {
        assert_eq!(
            first_match("Invoice #: INV-2024-001", &INVOICE_NUMBER_PATTERNS),
            Some("INV-2024-001".to_string())
        );
        assert_eq!(first_match("Invoice Date: 01/15/2024", &INVOICE_NUMBER_PATTERNS), None);
        assert_eq!(first_match("INVOICE", &INVOICE_NUMBER_PATTERNS), None);
    }
}
