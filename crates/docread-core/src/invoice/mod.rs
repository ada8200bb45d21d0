//! Invoice field extraction module.

mod extractor;

pub use extractor::{extract_invoice, InvoiceExtraction, RuleInvoiceExtractor};

use crate::models::invoice::InvoiceData;

/// Trait for invoice field extractors.
///
/// Extraction never fails: text without recognizable fields yields
/// [`InvoiceData::empty`].
pub trait InvoiceExtractor {
    /// Extract invoice data from OCR lines.
    fn extract_lines(&self, lines: &[&str]) -> InvoiceData;

    /// Extract invoice data from newline-separated text.
    fn extract(&self, text: &str) -> InvoiceData {
        let lines: Vec<&str> = text.lines().collect();
        self.extract_lines(&lines)
    }
}
