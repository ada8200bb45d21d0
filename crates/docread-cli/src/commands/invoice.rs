//! Invoice command - extract invoice fields from OCR text.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use docread_core::invoice::RuleInvoiceExtractor;
use docread_core::models::invoice::InvoiceData;

use super::{emit, load_config, read_input, to_json, OutputFormat};

/// Arguments for the invoice command.
#[derive(Args)]
pub struct InvoiceArgs {
    /// Invoice text file
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Report missing or inconsistent fields
    #[arg(long)]
    validate: bool,
}

pub async fn run(args: InvoiceArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    info!("Processing file: {}", args.input.display());

    let text = read_input(&args.input).await?;
    if text.trim().is_empty() {
        anyhow::bail!("Input file is empty: {}", args.input.display());
    }

    let extraction = RuleInvoiceExtractor::new().extract_with_report(&text);

    if args.validate && !extraction.warnings.is_empty() {
        eprintln!("{}", style("Validation issues:").yellow());
        for issue in &extraction.warnings {
            eprintln!("  - {}", issue);
        }
    }

    let output = format_invoice(&extraction.invoice, args.format, config.output.pretty_json)?;
    emit(args.output.as_ref(), &output).await?;

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn format_invoice(invoice: &InvoiceData, format: OutputFormat, pretty: bool) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(to_json(invoice, pretty)?),
        OutputFormat::Csv => format_csv(invoice),
        OutputFormat::Text => Ok(format_text(invoice)),
    }
}

/// One row per line item, header fields repeated; a single row when there
/// are no line items.
fn format_csv(invoice: &InvoiceData) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "vendor",
        "invoice_number",
        "date",
        "amount",
        "description",
        "quantity",
        "unit_price",
        "line_amount",
    ])?;

    let header = [
        invoice.vendor.clone().unwrap_or_default(),
        invoice.invoice_number.clone().unwrap_or_default(),
        invoice.date.map(|d| d.to_string()).unwrap_or_default(),
        invoice.amount.map(|a| a.to_string()).unwrap_or_default(),
    ];

    if invoice.line_items.is_empty() {
        let mut row = header.to_vec();
        row.extend(std::iter::repeat_n(String::new(), 4));
        wtr.write_record(&row)?;
    }

    for item in &invoice.line_items {
        let mut row = header.to_vec();
        row.push(item.description.clone());
        row.push(item.quantity.map(|q| q.to_string()).unwrap_or_default());
        row.push(item.unit_price.map(|p| p.to_string()).unwrap_or_default());
        row.push(item.amount.map(|a| a.to_string()).unwrap_or_default());
        wtr.write_record(&row)?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(invoice: &InvoiceData) -> String {
    let mut output = String::new();

    let or_dash = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());

    output.push_str(&format!("Vendor: {}\n", or_dash(invoice.vendor.clone())));
    output.push_str(&format!("Invoice: {}\n", or_dash(invoice.invoice_number.clone())));
    output.push_str(&format!("Date: {}\n", or_dash(invoice.date.map(|d| d.to_string()))));
    output.push('\n');

    if !invoice.line_items.is_empty() {
        output.push_str("Line items:\n");
        for item in &invoice.line_items {
            output.push_str(&format!(
                "  {} x{} @ {} = {}\n",
                item.description,
                or_dash(item.quantity.map(|q| q.to_string())),
                or_dash(item.unit_price.map(|p| p.to_string())),
                or_dash(item.amount.map(|a| a.to_string())),
            ));
        }
        output.push('\n');
    }

    output.push_str("Summary:\n");
    output.push_str(&format!("  Amount:     {}\n", or_dash(invoice.amount.map(|a| a.to_string()))));
    output.push_str(&format!(
        "  Line total: {}\n",
        or_dash(invoice.total_amount().map(|t| t.to_string()))
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use docread_core::invoice::extract_invoice;

    #[test]
    fn test_csv_row_per_line_item() {
        let invoice = extract_invoice("Acme Inc\nWidget 3 $10.00 $30.00\nBolt 10 $0.50 $5.00");
        let csv = format_csv(&invoice).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("Acme Inc,"));
        assert!(lines[2].ends_with("Bolt,10,0.50,5.00"));
    }

    #[test]
    fn test_csv_without_line_items() {
        let csv = format_csv(&InvoiceData::empty()).unwrap();
        assert_eq!(csv.lines().nth(1), Some(",,,,,,,"));
    }

    #[test]
    fn test_text_summary() {
        let invoice = extract_invoice("Widget 3 $10.00 $30.00");
        let text = format_text(&invoice);
        assert!(text.contains("Vendor: -"));
        assert!(text.contains("Widget x3 @ 10.00 = 30.00"));
        assert!(text.contains("Line total: 30.00"));
    }
}
