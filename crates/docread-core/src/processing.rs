//! Turns OCR observations or barcode payloads into scored parse results.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::DocumentError;
use crate::identity::{self, aamva};
use crate::models::config::{ExtractionConfig, DEFAULT_MIN_CONFIDENCE};
use crate::models::document::{DocumentType, PersonalDocument};

/// One line of text reported by the OCR collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedText {
    pub text: String,
    /// Recognition confidence (0.0 - 1.0).
    #[serde(default = "full_confidence")]
    pub confidence: f32,
}

fn full_confidence() -> f32 {
    1.0
}

fn default_min_confidence() -> f32 {
    DEFAULT_MIN_CONFIDENCE
}

impl RecognizedText {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }
}

/// Outcome of one document scan.
///
/// A partial document can be present alongside errors; the caller decides
/// through [`is_successful`](Self::is_successful) whether to accept it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentProcessingResult {
    pub document: Option<PersonalDocument>,
    /// Mean confidence of the observations the document was parsed from.
    pub confidence: f32,
    pub processing_time_ms: u64,
    pub errors: Vec<DocumentError>,
    /// Threshold `confidence` must exceed for the result to count as successful.
    #[serde(skip, default = "default_min_confidence")]
    pub min_confidence: f32,
}

impl DocumentProcessingResult {
    /// A result carrying only an upstream failure.
    pub fn failed(error: DocumentError) -> Self {
        Self {
            document: None,
            confidence: 0.0,
            processing_time_ms: 0,
            errors: vec![error],
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }

    pub fn is_successful(&self) -> bool {
        self.document.is_some() && self.confidence > self.min_confidence && self.errors.is_empty()
    }
}

/// Document processor configured from [`ExtractionConfig`].
#[derive(Debug, Clone)]
pub struct DocumentProcessor {
    min_confidence: f32,
    require_well_formed_barcode: bool,
}

impl DocumentProcessor {
    /// Create a processor with default settings.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            min_confidence: config.min_confidence,
            require_well_formed_barcode: config.require_well_formed_barcode,
        }
    }

    /// Set the success threshold.
    pub fn with_min_confidence(mut self, confidence: f32) -> Self {
        self.min_confidence = confidence;
        self
    }

    /// Reject barcode payloads that fail [`aamva::is_well_formed_aamva`].
    pub fn with_barcode_prescreen(mut self, enabled: bool) -> Self {
        self.require_well_formed_barcode = enabled;
        self
    }

    /// Parse OCR observations as the given document type.
    ///
    /// Observations with blank text are ignored. With none left the result
    /// carries [`DocumentError::DocumentNotDetected`]; a parse that finds no
    /// name or number carries [`DocumentError::InvalidDocumentFormat`].
    pub fn process_text(
        &self,
        observations: &[RecognizedText],
        document_type: DocumentType,
    ) -> DocumentProcessingResult {
        let start = Instant::now();
        info!(
            "Processing {} text observations as {}",
            observations.len(),
            document_type.display_name()
        );

        let usable: Vec<&RecognizedText> = observations
            .iter()
            .filter(|o| !o.text.trim().is_empty())
            .collect();

        if usable.is_empty() {
            debug!("No usable text observations");
            return self.result(None, 0.0, start, vec![DocumentError::DocumentNotDetected]);
        }

        let confidence = usable.iter().map(|o| o.confidence).sum::<f32>() / usable.len() as f32;
        let lines: Vec<&str> = usable.iter().map(|o| o.text.as_str()).collect();

        match identity::parse_document(&lines, document_type) {
            Some(document) => self.result(Some(document), confidence, start, Vec::new()),
            None => self.result(None, confidence, start, vec![DocumentError::InvalidDocumentFormat]),
        }
    }

    /// Decode a PDF417 payload as a US driver's license.
    pub fn process_barcode(&self, payload: &str) -> DocumentProcessingResult {
        let start = Instant::now();
        info!("Processing barcode payload of {} bytes", payload.len());

        if payload.trim().is_empty() {
            return self.result(None, 0.0, start, vec![DocumentError::DocumentNotDetected]);
        }

        if self.require_well_formed_barcode && !aamva::is_well_formed_aamva(payload) {
            debug!("Barcode payload failed the well-formedness check");
            return self.result(None, 0.0, start, vec![DocumentError::InvalidDocumentFormat]);
        }

        match aamva::try_parse_us_drivers_license(payload) {
            Ok(document) => self.result(Some(document), 1.0, start, Vec::new()),
            Err(error) => self.result(None, 0.0, start, vec![error]),
        }
    }

    fn result(
        &self,
        document: Option<PersonalDocument>,
        confidence: f32,
        start: Instant,
        errors: Vec<DocumentError>,
    ) -> DocumentProcessingResult {
        DocumentProcessingResult {
            document,
            confidence,
            processing_time_ms: start.elapsed().as_millis() as u64,
            errors,
            min_confidence: self.min_confidence,
        }
    }
}

impl Default for DocumentProcessor {
    fn default() -> Self {
        Self::new()
    }
}
