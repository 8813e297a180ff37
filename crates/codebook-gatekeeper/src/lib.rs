//! Codebook Gatekeeper
//!
//! Admission control for candidate variables pulled out of codebook documents.
//!
//! The Gatekeeper provides:
//! - Identifier validation (with case normalization for free-text sources)
//! - Name and description length windows per extractor
//! - Layout-noise filtering for regex-template matches
//!
//! Rejections are a filtering decision, not an error: extractors drop the
//! candidate and move on.
//!
//! # Examples
//!
//! ```
//! use codebook_gatekeeper::{Gatekeeper, ValidationConfig};
//!
//! let gatekeeper = Gatekeeper::new(ValidationConfig::default())?;
//! let result = gatekeeper.validate("SEXORIEN", "Sexual orientation", &gatekeeper.table_policy());
//! assert!(result.is_accepted());
//! # Ok::<(), codebook_gatekeeper::GatekeeperError>(())
//! ```

#![warn(missing_docs)]

mod validator;
mod error;
mod config;

pub use validator::{
    collapse_whitespace, AdmissionPolicy, Gatekeeper, RejectionReason, ValidationResult, ValidationStatus,
};
pub use error::GatekeeperError;
pub use config::ValidationConfig;
