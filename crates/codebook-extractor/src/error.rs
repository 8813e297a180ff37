//! Error types for the Extractor

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during extraction
///
/// Every variant is scoped to a single document; batch extraction turns them
/// into per-document failures instead of aborting.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Document could not be read from disk
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Path that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Document exceeds maximum size
    #[error("Document too large: {0} bytes (max: {1})")]
    DocumentTooLarge(usize, usize),

    /// HTML selector or parse failure
    #[error("HTML error: {0}")]
    Html(String),

    /// PDF could not be loaded
    #[error("PDF error: {0}")]
    Pdf(String),

    /// CSV reader failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A text template failed to compile
    #[error("Invalid template '{name}': {reason}")]
    Template {
        /// Template name
        name: String,
        /// What was wrong with it
        reason: String,
    },

    /// Extraction panicked inside a format parser
    #[error("Extraction panicked: {0}")]
    Panicked(String),

    /// Extraction worker was cancelled
    #[error("Extraction task failed: {0}")]
    Join(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
