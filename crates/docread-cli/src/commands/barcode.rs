//! Barcode command - decode a US driver's license PDF417 payload.

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use docread_core::identity::aamva::{extract_all_fields, is_well_formed_aamva};
use docread_core::processing::DocumentProcessor;

use super::document::{print_confidence, report};
use super::{emit, load_config, read_input, to_json, OutputFormat};

/// Arguments for the barcode command.
#[derive(Args)]
pub struct BarcodeArgs {
    /// File holding the decoded barcode payload
    #[arg(required = true)]
    input: PathBuf,

    /// Print every data element instead of the parsed document
    #[arg(long, conflicts_with = "check")]
    all_fields: bool,

    /// Only check that the payload looks like an AAMVA record
    #[arg(long)]
    check: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show confidence and timing
    #[arg(long)]
    show_confidence: bool,
}

pub async fn run(args: BarcodeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    info!("Processing file: {}", args.input.display());

    let payload = read_input(&args.input).await?;

    if args.check {
        if !is_well_formed_aamva(&payload) {
            anyhow::bail!("Payload is not a well-formed AAMVA record");
        }
        println!("{} Payload is a well-formed AAMVA record", style("✓").green());
        return Ok(());
    }

    if args.all_fields {
        let fields = extract_all_fields(&payload);
        if fields.is_empty() {
            anyhow::bail!("No data elements found in payload");
        }
        return emit(args.output.as_ref(), &to_json(&fields, config.output.pretty_json)?).await;
    }

    let processor = DocumentProcessor::from_config(&config.extraction);
    let result = processor.process_barcode(&payload);

    report(&result, args.format, config.output.pretty_json, args.output.as_ref()).await?;

    if args.show_confidence {
        print_confidence(&result);
    }

    Ok(())
}
