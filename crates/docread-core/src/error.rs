//! Error types for the docread-core library.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the docread library.
#[derive(Error, Debug)]
pub enum DocreadError {
    /// Document classification error.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Classified failure of a document scan, surfaced next to (never instead of)
/// whatever partial record could be extracted.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentError {
    /// A structural precondition failed, or nothing useful could be extracted.
    #[error("document format is not supported")]
    InvalidDocumentFormat,

    /// No usable text or barcode observations at all.
    #[error("no document detected in the input")]
    DocumentNotDetected,

    /// Upstream text or barcode recognition failed.
    #[error("unable to recognize text from the document")]
    TextRecognitionFailed,

    /// Upstream image precondition failed.
    #[error("image quality is too low for processing")]
    LowImageQuality,
}

/// Result type for the docread library.
pub type Result<T> = std::result::Result<T, DocreadError>;
