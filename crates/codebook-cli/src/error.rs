//! Error types for the CLI application.

use codebook_extractor::ExtractorError;
use codebook_ranker::RankerError;
use codebook_taxonomy::TaxonomyError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// CSV output error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Taxonomy could not be compiled
    #[error(transparent)]
    Taxonomy(#[from] TaxonomyError),

    /// Extractor could not be built
    #[error(transparent)]
    Extractor(#[from] ExtractorError),

    /// Scoring failed
    #[error(transparent)]
    Ranker(#[from] RankerError),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
