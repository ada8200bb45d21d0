//! Invoice data models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Header fields and line items read from a commercial invoice.
///
/// The header `amount` is whatever amount-looking value the extractor found
/// last in the text. It is kept separate from [`InvoiceData::total_amount`],
/// which is always the sum of the line items, so callers can compare the two.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceData {
    /// Vendor (issuer) name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,

    /// Amount found in the invoice text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,

    /// Invoice date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    /// Invoice number/identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,

    /// Line items in document order.
    pub line_items: Vec<LineItem>,
}

/// A single line item on the invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product/service description.
    pub description: String,

    /// Quantity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,

    /// Price per unit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Decimal>,

    /// Line total.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
}

impl InvoiceData {
    /// An invoice with no extracted fields.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check if nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        self.vendor.is_none()
            && self.amount.is_none()
            && self.date.is_none()
            && self.invoice_number.is_none()
            && self.line_items.is_empty()
    }

    /// Sum of the line items that carry an amount (zero when there are none).
    ///
    /// `None` when the sum does not fit in a [`Decimal`].
    pub fn total_amount(&self) -> Option<Decimal> {
        self.line_items
            .iter()
            .filter_map(|item| item.amount)
            .try_fold(Decimal::ZERO, |total, amount| total.checked_add(amount))
    }

    /// Header amount minus the line item total, when both are available and
    /// the difference is representable.
    pub fn amount_discrepancy(&self) -> Option<Decimal> {
        let has_item_amounts = self.line_items.iter().any(|item| item.amount.is_some());
        match self.amount {
            Some(amount) if has_item_amounts => amount.checked_sub(self.total_amount()?),
            _ => None,
        }
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Validate the invoice data and return any issues found.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.vendor.is_none() {
            issues.push("Missing vendor".to_string());
        }

        if self.invoice_number.is_none() {
            issues.push("Missing invoice number".to_string());
        }

        if self.date.is_none() {
            issues.push("Missing invoice date".to_string());
        }

        if self.line_items.is_empty() {
            issues.push("No line items".to_string());
        }

        match self.total_amount() {
            None => issues.push("Line item total overflows".to_string()),
            Some(total) => {
                if let Some(diff) = self.amount_discrepancy() {
                    if !diff.is_zero() {
                        issues.push(format!(
                            "Line item total ({}) differs from invoice amount ({})",
                            total,
                            self.amount.unwrap_or_default()
                        ));
                    }
                }
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn item(description: &str, amount: Option<&str>) -> LineItem {
        LineItem {
            description: description.to_string(),
            quantity: Some(1),
            unit_price: amount.map(dec),
            amount: amount.map(dec),
        }
    }

    #[test]
    fn test_total_amount_is_exact_decimal_sum() {
        let invoice = InvoiceData {
            line_items: vec![item("A", Some("0.10")), item("B", Some("0.20")), item("C", None)],
            ..InvoiceData::default()
        };
        assert_eq!(invoice.total_amount(), Some(dec("0.30")));
    }

    #[test]
    fn test_total_amount_overflow_is_none() {
        let invoice = InvoiceData {
            amount: Some(dec("1.00")),
            line_items: vec![item("A", Some("70000000000000000000000000000")), item("B", Some("70000000000000000000000000000"))],
            ..InvoiceData::default()
        };
        assert_eq!(invoice.total_amount(), None);
        assert_eq!(invoice.amount_discrepancy(), None);
        assert!(invoice.validate().contains(&"Line item total overflows".to_string()));
    }

    #[test]
    fn test_amount_discrepancy_overflow_is_none() {
        let invoice = InvoiceData {
            amount: Some(Decimal::MIN),
            line_items: vec![item("A", Some("70000000000000000000000000000"))],
            ..InvoiceData::default()
        };
        assert_eq!(invoice.total_amount(), Some(dec("70000000000000000000000000000")));
        assert_eq!(invoice.amount_discrepancy(), None);
    }

    #[test]
    fn test_total_amount_empty_is_zero() {
        assert_eq!(InvoiceData::empty().total_amount(), Some(Decimal::ZERO));
        assert!(InvoiceData::empty().is_empty());
    }

    #[test]
    fn test_amount_discrepancy() {
        let mut invoice = InvoiceData {
            amount: Some(dec("50.00")),
            line_items: vec![item("A", Some("30.00"))],
            ..InvoiceData::default()
        };
        assert_eq!(invoice.amount_discrepancy(), Some(dec("20.00")));

        invoice.line_items.clear();
        assert_eq!(invoice.amount_discrepancy(), None);
    }

    #[test]
    fn test_validate_reports_discrepancy() {
        let invoice = InvoiceData {
            vendor: Some("Acme Corp".to_string()),
            amount: Some(dec("99.00")),
            date: NaiveDate::from_ymd_opt(2024, 3, 1),
            invoice_number: Some("INV-001".to_string()),
            line_items: vec![item("A", Some("30.00"))],
        };
        let issues = invoice.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("differs"));
    }

    #[test]
    fn test_to_json_skips_missing_fields() {
        let json = InvoiceData::empty().to_json().unwrap();
        assert!(!json.contains("vendor"));
        assert!(json.contains("line_items"));
    }
}
