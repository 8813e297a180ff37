//! Error types for ranking

use thiserror::Error;

/// Errors that can occur while scoring records
#[derive(Error, Debug)]
pub enum RankerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A rule's name pattern failed to compile
    #[error("Invalid name pattern for rule '{tag}': {source}")]
    InvalidPattern {
        /// Rule tag
        tag: String,
        /// Underlying regex error
        #[source]
        source: regex::Error,
    },

    /// A record reached the scorer with a score already set
    #[error("Record already scored: {0}")]
    AlreadyScored(String),
}
