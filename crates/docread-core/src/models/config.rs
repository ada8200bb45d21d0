//! Configuration structures for document processing.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::document::DocumentType;
use crate::error::{DocreadError, Result};

/// Confidence the surrounding application requires before a scan counts as
/// successful.
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.7;

/// Main configuration for the docread pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocreadConfig {
    /// Document extraction configuration.
    pub extraction: ExtractionConfig,

    /// Output rendering configuration.
    pub output: OutputConfig,
}

/// Document extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Mean OCR confidence a result must exceed to count as successful (0.0 - 1.0).
    pub min_confidence: f32,

    /// Reject barcode payloads that fail the AAMVA well-formedness pre-screen
    /// before attempting a full parse.
    pub require_well_formed_barcode: bool,

    /// Document type assumed when the caller does not name one.
    pub default_document_type: DocumentType,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            require_well_formed_barcode: false,
            default_document_type: DocumentType::Passport,
        }
    }
}

/// Output rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    pub pretty_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty_json: true }
    }
}

impl DocreadConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let confidence = self.extraction.min_confidence;
        if !(0.0..=1.0).contains(&confidence) {
            return Err(DocreadError::Config(format!(
                "extraction.min_confidence must be between 0.0 and 1.0, got {}",
                confidence
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DocreadConfig::default();
        assert_eq!(config.extraction.min_confidence, 0.7);
        assert!(!config.extraction.require_well_formed_barcode);
        assert_eq!(config.extraction.default_document_type, DocumentType::Passport);
        assert!(config.output.pretty_json);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: DocreadConfig =
            serde_json::from_str(r#"{"extraction": {"min_confidence": 0.5}}"#).unwrap();
        assert_eq!(config.extraction.min_confidence, 0.5);
        assert_eq!(config.extraction.default_document_type, DocumentType::Passport);
        assert!(config.output.pretty_json);
    }

    #[test]
    fn test_validate_rejects_out_of_range_confidence() {
        let mut config = DocreadConfig::default();
        config.extraction.min_confidence = 1.5;
        assert!(matches!(config.validate(), Err(DocreadError::Config(_))));
    }

    #[test]
    fn test_save_and_load_round_trip_on_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        let mut config = DocreadConfig::default();
        config.extraction.default_document_type = DocumentType::NationalId;
        config.save(&path).unwrap();

        let loaded = DocreadConfig::from_file(&path).unwrap();
        assert_eq!(loaded.extraction.default_document_type, DocumentType::NationalId);
    }
}
