//! Core library for identity document and invoice field extraction.
//!
//! This crate provides:
//! - AAMVA PDF417 barcode decoding for US driver's licenses
//! - ICAO 9303 TD-3 machine readable zone decoding for passports
//! - Keyword and pattern heuristics for OCR text of licenses, ID cards and passports
//! - Line-oriented invoice field extraction
//!
//! Image capture and OCR are out of scope: inputs are the text lines or barcode
//! payload an upstream recognizer already produced.

pub mod error;
pub mod identity;
pub mod invoice;
pub mod models;
pub mod processing;
pub mod rules;

pub use error::{DocreadError, DocumentError, Result};
pub use identity::{parse_document, parse_id, parse_mrz, parse_passport, parse_us_drivers_license};
pub use invoice::{extract_invoice, InvoiceExtraction, InvoiceExtractor, RuleInvoiceExtractor};
pub use models::config::{DocreadConfig, ExtractionConfig, OutputConfig};
pub use models::document::{DocumentType, Gender, PersonalDocument, ScanningMethod};
pub use models::invoice::{InvoiceData, LineItem};
pub use processing::{DocumentProcessingResult, DocumentProcessor, RecognizedText};
