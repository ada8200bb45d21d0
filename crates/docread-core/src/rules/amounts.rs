//! Currency amount parsing for invoice text.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse an amount by keeping only digits and the decimal point.
///
/// Labels, currency symbols and thousands separators are dropped, so
/// `"Total: $1,234.56"` parses to `1234.56`. Returns `None` when what is
/// left is not a valid decimal (e.g. no digits, or two decimal points).
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let cleaned = cleaned.trim_end_matches('.');
    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    Decimal::from_str(cleaned).ok()
}

/// Parse a price token as it appears inside a line item (`$10.00`, `1,250.5`).
pub fn parse_price_token(token: &str) -> Option<Decimal> {
    let cleaned = token.trim().trim_start_matches('$').replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(cleaned.trim_end_matches('.')).ok()
}
