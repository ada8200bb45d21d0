//! Document command - read an identity document from OCR text.

use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use tracing::{debug, info};

use docread_core::models::document::DocumentType;
use docread_core::processing::{DocumentProcessingResult, DocumentProcessor, RecognizedText};

use super::{emit, load_config, read_input, to_json, OutputFormat};

/// Arguments for the document command.
#[derive(Args)]
pub struct DocumentArgs {
    /// OCR text file (one line per text region) or JSON array of observations
    #[arg(required = true)]
    input: PathBuf,

    /// Document type (default: from configuration)
    #[arg(short = 't', long = "type", value_enum)]
    document_type: Option<DocumentKind>,

    /// Confidence assigned to every line of a plain text input
    #[arg(long, default_value = "1.0")]
    confidence: f32,

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

/// Document types read from OCR text.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum DocumentKind {
    Passport,
    DriversLicense,
    NationalId,
}

impl From<DocumentKind> for DocumentType {
    fn from(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::Passport => DocumentType::Passport,
            DocumentKind::DriversLicense => DocumentType::DriversLicense,
            DocumentKind::NationalId => DocumentType::NationalId,
        }
    }
}

pub async fn run(args: DocumentArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let document_type = args
        .document_type
        .map(DocumentType::from)
        .unwrap_or(config.extraction.default_document_type);

    info!("Processing file: {}", args.input.display());

    let content = read_input(&args.input).await?;
    let observations = parse_observations(&args.input, &content, args.confidence)?;
    debug!("Read {} observations", observations.len());

    let processor = DocumentProcessor::from_config(&config.extraction);
    let result = processor.process_text(&observations, document_type);

    report(&result, args.format, config.output.pretty_json, args.output.as_ref()).await?;

    if args.show_confidence {
        print_confidence(&result);
    }

    Ok(())
}

/// `.json` inputs hold serialized observations; anything else is one
/// observation per non-empty line.
fn parse_observations(path: &Path, content: &str, confidence: f32) -> anyhow::Result<Vec<RecognizedText>> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        return Ok(serde_json::from_str(content)?);
    }

    Ok(content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| RecognizedText::new(l, confidence))
        .collect())
}

/// Render a processing result, failing when no document came out of it.
pub async fn report(
    result: &DocumentProcessingResult,
    format: OutputFormat,
    pretty: bool,
    output: Option<&PathBuf>,
) -> anyhow::Result<()> {
    if result.document.is_none() {
        let errors: Vec<String> = result.errors.iter().map(|e| e.to_string()).collect();
        anyhow::bail!("No document extracted: {}", errors.join("; "));
    }

    if !result.is_successful() {
        eprintln!(
            "{} Result below the {:.0}% confidence threshold",
            style("⚠").yellow(),
            result.min_confidence * 100.0
        );
    }

    let rendered = format_result(result, format, pretty)?;
    emit(output, &rendered).await
}

fn format_result(result: &DocumentProcessingResult, format: OutputFormat, pretty: bool) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(to_json(result, pretty)?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

fn format_csv(result: &DocumentProcessingResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "document_type",
        "full_name",
        "document_number",
        "date_of_birth",
        "expiration_date",
        "gender",
        "nationality",
        "issuing_authority",
        "place_of_birth",
        "expired",
        "confidence",
    ])?;

    if let Some(doc) = &result.document {
        let row: Vec<String> = vec![
            doc.document_type.display_name().to_string(),
            doc.full_name.clone().unwrap_or_default(),
            doc.document_number.clone().unwrap_or_default(),
            doc.date_of_birth.map(|d| d.to_string()).unwrap_or_default(),
            doc.expiration_date.map(|d| d.to_string()).unwrap_or_default(),
            doc.gender.map(|g| g.display().to_string()).unwrap_or_default(),
            doc.nationality.clone().unwrap_or_default(),
            doc.issuing_authority.clone().unwrap_or_default(),
            doc.place_of_birth.clone().unwrap_or_default(),
            doc.is_expired().to_string(),
            format!("{:.2}", result.confidence),
        ];
        wtr.write_record(&row)?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &DocumentProcessingResult) -> String {
    let Some(doc) = &result.document else {
        return String::new();
    };

    let mut output = String::new();
    output.push_str(&format!("Document: {}\n", doc.document_type.display_name()));

    let rows = [
        ("Name", doc.full_name.clone()),
        ("Number", doc.document_number.clone()),
        ("Date of birth", doc.date_of_birth.map(|d| d.to_string())),
        ("Expires", doc.expiration_date.map(|d| d.to_string())),
        ("Gender", doc.gender.map(|g| g.display().to_string())),
        ("Nationality", doc.nationality.clone()),
        ("Issued by", doc.issuing_authority.clone()),
        ("Address", doc.place_of_birth.clone()),
    ];
    for (label, value) in rows {
        if let Some(value) = value {
            output.push_str(&format!("  {:<14} {}\n", format!("{}:", label), value));
        }
    }

    if doc.is_expired() {
        output.push_str("\nDocument is expired\n");
    }

    output
}

pub fn print_confidence(result: &DocumentProcessingResult) {
    println!();
    println!(
        "{} Confidence: {:.1}%",
        style("ℹ").blue(),
        result.confidence * 100.0
    );
    println!(
        "{} Processing time: {}ms",
        style("ℹ").blue(),
        result.processing_time_ms
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_observations() {
        let obs = parse_observations(Path::new("scan.txt"), "NAME: A B C\n\n  \nDL# D1234567X\n", 0.8).unwrap();
        assert_eq!(obs.len(), 2);
        assert_eq!(obs[1].text, "DL# D1234567X");
        assert_eq!(obs[1].confidence, 0.8);
    }

    #[test]
    fn test_json_observations() {
        let json = r#"[{"text": "NAME: A B C", "confidence": 0.5}]"#;
        let obs = parse_observations(Path::new("scan.JSON"), json, 1.0).unwrap();
        assert_eq!(obs, vec![RecognizedText::new("NAME: A B C", 0.5)]);
    }
}
