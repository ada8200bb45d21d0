//! Identity document data models.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Kind of identity document being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Driver's license read through OCR text.
    DriversLicense,
    /// National identity card read through OCR text.
    NationalId,
    /// Passport read through MRZ or OCR text.
    Passport,
    /// US driver's license read from its PDF417 barcode.
    UsDriversLicenseBarcode,
}

/// How the upstream collaborator captures a given document type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanningMethod {
    /// OCR over the document face.
    TextRecognition,
    /// PDF417 symbology decode.
    BarcodeDetection,
}

impl DocumentType {
    /// All document types, in display order.
    pub const ALL: [DocumentType; 4] = [
        DocumentType::DriversLicense,
        DocumentType::NationalId,
        DocumentType::Passport,
        DocumentType::UsDriversLicenseBarcode,
    ];

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::DriversLicense => "Driver's License",
            Self::NationalId => "National ID",
            Self::Passport => "Passport",
            Self::UsDriversLicenseBarcode => "US DL Code",
        }
    }

    pub fn scanning_method(&self) -> ScanningMethod {
        match self {
            Self::DriversLicense | Self::NationalId | Self::Passport => {
                ScanningMethod::TextRecognition
            }
            Self::UsDriversLicenseBarcode => ScanningMethod::BarcodeDetection,
        }
    }
}

impl Default for DocumentType {
    fn default() -> Self {
        Self::Passport
    }
}

/// Document holder's sex as printed or encoded on the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

impl Gender {
    /// Map a single `M`/`F` marker (case-insensitive).
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker.trim().to_ascii_uppercase().as_str() {
            "M" => Some(Self::Male),
            "F" => Some(Self::Female),
            _ => None,
        }
    }

    pub fn display(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Unknown => "Unknown",
        }
    }
}

/// A decoded identity document.
///
/// Extraction is best-effort, so every field except the document type is
/// optional. Instances are only produced when at least a name or a document
/// number was found; see [`PersonalDocument::builder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalDocument {
    /// Type of the source document.
    pub document_type: DocumentType,

    /// Holder's full name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    /// Holder's date of birth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,

    /// Document, license, or passport number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_number: Option<String>,

    /// Date the document expires.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,

    /// Nationality or country code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,

    /// Issuing authority or issuing country.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuing_authority: Option<String>,

    /// Holder's sex.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,

    /// Place of birth, or the postal address for barcode-decoded licenses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_of_birth: Option<String>,
}

impl PersonalDocument {
    /// Start collecting fields for a document of the given type.
    pub fn builder(document_type: DocumentType) -> PersonalDocumentBuilder {
        PersonalDocumentBuilder {
            document: PersonalDocument {
                document_type,
                full_name: None,
                date_of_birth: None,
                document_number: None,
                expiration_date: None,
                nationality: None,
                issuing_authority: None,
                gender: None,
                place_of_birth: None,
            },
        }
    }

    /// Whether the document expired before today (local time).
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Local::now().date_naive())
    }

    /// Whether the document expired strictly before `today`.
    pub fn is_expired_at(&self, today: NaiveDate) -> bool {
        self.expiration_date.is_some_and(|date| date < today)
    }

    /// Names of the optional fields that were extracted.
    pub fn present_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.full_name.is_some() {
            fields.push("full_name");
        }
        if self.date_of_birth.is_some() {
            fields.push("date_of_birth");
        }
        if self.document_number.is_some() {
            fields.push("document_number");
        }
        if self.expiration_date.is_some() {
            fields.push("expiration_date");
        }
        if self.nationality.is_some() {
            fields.push("nationality");
        }
        if self.issuing_authority.is_some() {
            fields.push("issuing_authority");
        }
        if self.gender.is_some() {
            fields.push("gender");
        }
        if self.place_of_birth.is_some() {
            fields.push("place_of_birth");
        }
        fields
    }
}

/// Accumulates extracted fields and enforces the minimum-signal rule on build.
#[derive(Debug, Clone)]
pub struct PersonalDocumentBuilder {
    document: PersonalDocument,
}

impl PersonalDocumentBuilder {
    pub fn full_name(mut self, value: Option<String>) -> Self {
        self.document.full_name = value;
        self
    }

    pub fn date_of_birth(mut self, value: Option<NaiveDate>) -> Self {
        self.document.date_of_birth = value;
        self
    }

    pub fn document_number(mut self, value: Option<String>) -> Self {
        self.document.document_number = value;
        self
    }

    pub fn expiration_date(mut self, value: Option<NaiveDate>) -> Self {
        self.document.expiration_date = value;
        self
    }

    pub fn nationality(mut self, value: Option<String>) -> Self {
        self.document.nationality = value;
        self
    }

    pub fn issuing_authority(mut self, value: Option<String>) -> Self {
        self.document.issuing_authority = value;
        self
    }

    pub fn gender(mut self, value: Option<Gender>) -> Self {
        self.document.gender = value;
        self
    }

    pub fn place_of_birth(mut self, value: Option<String>) -> Self {
        self.document.place_of_birth = value;
        self
    }

    /// Finish the record, or `None` when neither a name nor a document number
    /// was extracted.
    pub fn build(self) -> Option<PersonalDocument> {
        if self.document.full_name.is_none() && self.document.document_number.is_none() {
            return None;
        }
        Some(self.document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_builder_requires_name_or_number() {
        let empty = PersonalDocument::builder(DocumentType::NationalId)
            .date_of_birth(Some(date(1990, 1, 15)))
            .gender(Some(Gender::Male))
            .build();
        assert!(empty.is_none());

        let named = PersonalDocument::builder(DocumentType::NationalId)
            .full_name(Some("Jane Roe".to_string()))
            .build();
        assert!(named.is_some());

        let numbered = PersonalDocument::builder(DocumentType::NationalId)
            .document_number(Some("A1234567".to_string()))
            .build();
        assert!(numbered.is_some());
    }

    #[test]
    fn test_is_expired_is_strict() {
        let doc = PersonalDocument::builder(DocumentType::Passport)
            .document_number(Some("X1234567".to_string()))
            .expiration_date(Some(date(2025, 6, 1)))
            .build()
            .unwrap();

        assert!(!doc.is_expired_at(date(2025, 6, 1)));
        assert!(doc.is_expired_at(date(2025, 6, 2)));
        assert!(!doc.is_expired_at(date(2025, 5, 31)));
    }

    #[test]
    fn test_missing_expiry_is_not_expired() {
        let doc = PersonalDocument::builder(DocumentType::Passport)
            .document_number(Some("X1234567".to_string()))
            .build()
            .unwrap();
        assert!(!doc.is_expired());
    }

    #[test]
    fn test_document_type_scanning_method() {
        assert_eq!(
            DocumentType::UsDriversLicenseBarcode.scanning_method(),
            ScanningMethod::BarcodeDetection
        );
        assert_eq!(
            DocumentType::Passport.scanning_method(),
            ScanningMethod::TextRecognition
        );
        assert_eq!(DocumentType::NationalId.display_name(), "National ID");
    }

    #[test]
    fn test_gender_marker() {
        assert_eq!(Gender::from_marker("m"), Some(Gender::Male));
        assert_eq!(Gender::from_marker("F"), Some(Gender::Female));
        assert_eq!(Gender::from_marker("X"), None);
    }
}
