//! Batch processing command for multiple invoice text files.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use docread_core::invoice::RuleInvoiceExtractor;
use docread_core::models::invoice::InvoiceData;

use super::invoice::format_invoice;
use super::{load_config, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching invoice text files
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    invoice: Option<InvoiceData>,
    warnings: usize,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "txt" | "text")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        tokio::fs::create_dir_all(output_dir).await?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let extractor = RuleInvoiceExtractor::new();
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let result = process_single_file(&path, &extractor).await;
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok((invoice, warnings)) => {
                results.push(ProcessResult {
                    path,
                    invoice: Some(invoice),
                    warnings,
                    error: None,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        invoice: None,
                        warnings: 0,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    overall_pb.abandon();
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("Complete");

    let successful: Vec<_> = results.iter().filter(|r| r.invoice.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        for result in &successful {
            let Some(invoice) = &result.invoice else {
                continue;
            };
            let output_name = result
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("invoice");
            let output_path = output_dir.join(format!("{}.{}", output_name, args.format.extension()));

            let content = format_invoice(invoice, args.format, config.output.pretty_json)?;
            tokio::fs::write(&output_path, content).await?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Extraction itself never fails; a file is an error when it cannot be read
/// or yields no fields at all.
async fn process_single_file(
    path: &Path,
    extractor: &RuleInvoiceExtractor,
) -> anyhow::Result<(InvoiceData, usize)> {
    let text = tokio::fs::read_to_string(path).await?;
    if text.trim().is_empty() {
        anyhow::bail!("File is empty");
    }

    let extraction = extractor.extract_with_report(&text);
    if extraction.invoice.is_empty() {
        anyhow::bail!("No invoice fields found");
    }

    Ok((extraction.invoice, extraction.warnings.len()))
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "vendor",
        "invoice_number",
        "date",
        "amount",
        "line_items",
        "line_total",
        "warnings",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();

        let row: Vec<String> = match &result.invoice {
            Some(invoice) => vec![
                filename,
                "success".to_string(),
                invoice.vendor.clone().unwrap_or_default(),
                invoice.invoice_number.clone().unwrap_or_default(),
                invoice.date.map(|d| d.to_string()).unwrap_or_default(),
                invoice.amount.map(|a| a.to_string()).unwrap_or_default(),
                invoice.line_items.len().to_string(),
                invoice.total_amount().map(|t| t.to_string()).unwrap_or_default(),
                result.warnings.to_string(),
                result.processing_time_ms.to_string(),
                String::new(),
            ],
            None => vec![
                filename,
                "error".to_string(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                result.processing_time_ms.to_string(),
                result.error.clone().unwrap_or_default(),
            ],
        };
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}
