//! CLI for identity document and invoice field extraction.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{barcode, batch, config, document, invoice};

/// docread - Extract structured fields from identity documents and invoices
#[derive(Parser)]
#[command(name = "docread")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a passport, driver's license or ID card from OCR text
    Document(document::DocumentArgs),

    /// Decode a US driver's license PDF417 barcode payload
    Barcode(barcode::BarcodeArgs),

    /// Extract fields from a single invoice text file
    Invoice(invoice::InvoiceArgs),

    /// Extract fields from multiple invoice text files
    Batch(batch::BatchArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Document(args) => document::run(args, config_path).await,
        Commands::Barcode(args) => barcode::run(args, config_path).await,
        Commands::Invoice(args) => invoice::run(args, config_path).await,
        Commands::Batch(args) => batch::run(args, config_path).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
