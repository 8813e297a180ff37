//! Taxonomy error types

use thiserror::Error;

/// Errors that can occur while building a taxonomy
#[derive(Error, Debug)]
pub enum TaxonomyError {
    /// An identifier-prefix or keyword pattern failed to compile
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The offending pattern text
        pattern: String,
        /// Regex compilation error
        #[source]
        source: regex::Error,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
