//! Rule-based building blocks shared by the document and invoice parsers.

pub mod amounts;
pub mod dates;
pub mod matcher;
pub mod patterns;

pub use amounts::{parse_amount, parse_price_token};
pub use dates::{
    parse_date, parse_fixed_width, parse_mrz_date, INVOICE_DATE_FORMATS, TEXT_DATE_FORMATS,
};
pub use matcher::{compile_patterns, extract, extract_after_keyword, first_match, line_containing};
