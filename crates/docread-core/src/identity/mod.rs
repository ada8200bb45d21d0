//! Identity document parsers.
//!
//! Each document family has its own free-function parser; [`parse_document`]
//! dispatches on [`DocumentType`]. All parsers return `None` unless the
//! record carries a name or a document number.

pub mod aamva;
pub mod heuristic;
pub mod mrz;

pub use aamva::{
    element_description, extract_all_fields, is_well_formed_aamva, parse_us_drivers_license,
    try_parse_us_drivers_license,
};
pub use heuristic::{parse_id, parse_passport_text};
pub use mrz::{parse_mrz, parse_passport, MrzData};

use crate::models::document::{DocumentType, PersonalDocument};

/// Parse OCR lines (or barcode payload lines) as the given document type.
pub fn parse_document<S: AsRef<str>>(lines: &[S], document_type: DocumentType) -> Option<PersonalDocument> {
    match document_type {
        DocumentType::Passport => mrz::parse_passport(lines),
        DocumentType::DriversLicense | DocumentType::NationalId => heuristic::parse_id(lines, document_type),
        DocumentType::UsDriversLicenseBarcode => {
            let payload = lines.iter().map(|l| l.as_ref()).collect::<Vec<_>>().join("\n");
            aamva::parse_us_drivers_license(&payload)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_by_type() {
        let barcode = ["@", "ANSI 636014040002DL", "DAQD1234567", "DCSPUBLIC", "DACJOHN", "DBB01152000"];
        let doc = parse_document(&barcode, DocumentType::UsDriversLicenseBarcode).unwrap();
        assert_eq!(doc.document_type, DocumentType::UsDriversLicenseBarcode);
        assert_eq!(doc.full_name.as_deref(), Some("JOHN PUBLIC"));

        let text = ["NAME: JOHN Q PUBLIC", "DL# D1234567X"];
        let doc = parse_document(&text, DocumentType::DriversLicense).unwrap();
        assert_eq!(doc.document_type, DocumentType::DriversLicense);

        let doc = parse_document(&text, DocumentType::NationalId).unwrap();
        assert_eq!(doc.document_type, DocumentType::NationalId);
    }

    #[test]
    fn test_barcode_lines_need_header() {
        let lines = ["DAQD1234567", "DCSPUBLIC"];
        assert!(parse_document(&lines, DocumentType::UsDriversLicenseBarcode).is_none());
    }
}
