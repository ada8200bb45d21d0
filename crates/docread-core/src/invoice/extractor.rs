//! Line-oriented rule-based invoice parser.

use std::time::Instant;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info, trace};

use crate::models::invoice::{InvoiceData, LineItem};
use crate::rules::amounts::{parse_amount, parse_price_token};
use crate::rules::dates::{parse_date, INVOICE_DATE_FORMATS};
use crate::rules::matcher::first_match;
use crate::rules::patterns::{
    AMOUNT_PATTERNS, INVOICE_DATE_PATTERNS, INVOICE_NUMBER_PATTERNS, LINE_ITEM, VENDOR_KEYWORDS,
    VENDOR_NAME,
};

use super::InvoiceExtractor;

/// Vendor lines must be at least this long...
const MIN_VENDOR_LEN: usize = 4;
/// ...and shorter than this.
const MAX_VENDOR_LEN: usize = 100;

/// Extracted invoice plus the checks run over it.
#[derive(Debug, Clone)]
pub struct InvoiceExtraction {
    /// Extracted invoice data.
    pub invoice: InvoiceData,
    /// Missing or inconsistent fields, as reported by [`InvoiceData::validate`].
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Per-line regex extractor.
///
/// Each line is tried against every field independently. The vendor is the
/// first accepted line; amount, date and invoice number keep the last value
/// found, top to bottom. Line items must fit on a single line as
/// `description quantity unit_price amount`; wrapped descriptions are not
/// recognized.
#[derive(Debug, Clone, Default)]
pub struct RuleInvoiceExtractor;

impl RuleInvoiceExtractor {
    /// Create a new extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract and validate, timing the run.
    pub fn extract_with_report(&self, text: &str) -> InvoiceExtraction {
        let start = Instant::now();
        info!("Parsing invoice from {} characters of text", text.len());

        let invoice = self.extract(text);
        let warnings = invoice.validate();

        debug!(
            "Extracted invoice with {} line items and {} warnings",
            invoice.line_items.len(),
            warnings.len()
        );

        InvoiceExtraction {
            invoice,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

impl InvoiceExtractor for RuleInvoiceExtractor {
    fn extract_lines(&self, lines: &[&str]) -> InvoiceData {
        let mut invoice = InvoiceData::empty();

        for line in lines.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
            if invoice.vendor.is_none() && is_vendor_line(line) {
                invoice.vendor = Some(line.to_string());
            }

            if let Some(amount) = extract_amount(line) {
                invoice.amount = Some(amount);
            }

            if let Some(date) = extract_date(line) {
                invoice.date = Some(date);
            }

            if let Some(number) = first_match(line, &INVOICE_NUMBER_PATTERNS) {
                invoice.invoice_number = Some(number);
            }

            if let Some(item) = parse_line_item(line) {
                invoice.line_items.push(item);
            }
        }

        trace!(
            "Invoice fields: vendor={} amount={} date={} number={}",
            invoice.vendor.is_some(),
            invoice.amount.is_some(),
            invoice.date.is_some(),
            invoice.invoice_number.is_some()
        );

        invoice
    }
}

/// Extract invoice fields from OCR text with the default extractor.
pub fn extract_invoice(text: &str) -> InvoiceData {
    RuleInvoiceExtractor::new().extract(text)
}

fn is_vendor_line(line: &str) -> bool {
    let len = line.chars().count();
    if !(MIN_VENDOR_LEN..MAX_VENDOR_LEN).contains(&len) {
        return false;
    }

    let lower = line.to_lowercase();
    VENDOR_KEYWORDS.iter().any(|k| lower.contains(k)) || VENDOR_NAME.is_match(line)
}

fn extract_amount(line: &str) -> Option<Decimal> {
    AMOUNT_PATTERNS
        .iter()
        .filter_map(|pattern| pattern.find(line))
        .find_map(|m| parse_amount(m.as_str()))
}

/// Each date pattern's match is tried against every invoice format before
/// moving to the next pattern, so `2024-01-15` is not lost to the partial
/// `24-01-15` match of the dashed pattern.
fn extract_date(line: &str) -> Option<NaiveDate> {
    INVOICE_DATE_PATTERNS
        .iter()
        .filter_map(|pattern| pattern.find(line))
        .find_map(|m| parse_date(m.as_str(), INVOICE_DATE_FORMATS))
}

fn parse_line_item(line: &str) -> Option<LineItem> {
    let caps = LINE_ITEM.captures(line)?;

    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() <= 3 {
        return None;
    }
    let description = tokens[..tokens.len() - 3].join(" ");
    if description.is_empty() {
        return None;
    }

    Some(LineItem {
        description,
        quantity: caps[2].parse().ok(),
        unit_price: parse_price_token(&caps[3]),
        amount: parse_price_token(&caps[4]),
    })
}
