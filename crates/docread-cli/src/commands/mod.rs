//! Subcommands and the helpers they share.

pub mod barcode;
pub mod batch;
pub mod config;
pub mod document;
pub mod invoice;

use std::path::{Path, PathBuf};

use console::style;
use serde::Serialize;
use tracing::debug;

use docread_core::models::config::DocreadConfig;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Text => "txt",
        }
    }
}

/// Load the `--config` file, else the default config file if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<DocreadConfig> {
    if let Some(path) = config_path {
        return Ok(DocreadConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Loading config from {}", default_path.display());
        Ok(DocreadConfig::from_file(&default_path)?)
    } else {
        Ok(DocreadConfig::default())
    }
}

pub async fn read_input(input: &Path) -> anyhow::Result<String> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }
    Ok(tokio::fs::read_to_string(input).await?)
}

pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

/// Write to the output file, or stdout when none was given.
pub async fn emit(output: Option<&PathBuf>, content: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            tokio::fs::write(path, content).await?;
            println!("{} Output written to {}", style("✓").green(), path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}
