//! Codebook Extractor
//!
//! Turns survey codebook documents (HTML, PDF, plain text, CSV) into candidate
//! [`VariableRecord`](codebook_domain::VariableRecord)s and keyword hits.
//!
//! # Architecture
//!
//! ```text
//! DocumentHandle → format extractors → Gatekeeper → Taxonomy tag → DocumentExtraction
//! ```
//!
//! Each format runs a fixed sequence of extractors:
//!
//! - **HTML**: table rows, then labelled `Variable Name: … Description: …` text
//! - **PDF**: column-aligned table lines on every page, then text templates on every page
//! - **Text**: text templates, then a keyword line scan
//! - **CSV**: keyword scan over cells, one hit per row
//!
//! Documents fail independently: an unreadable file becomes an
//! [`ExtractionFailure`] and the batch carries on.
//!
//! # Example Usage
//!
//! ```no_run
//! use codebook_domain::{DocumentFormat, DocumentHandle};
//! use codebook_extractor::CodebookExtractor;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = CodebookExtractor::with_defaults()?;
//!
//! let documents = vec![
//!     DocumentHandle::inline(
//!         "codebook.html",
//!         DocumentFormat::Html,
//!         "<table><tr><td>SEXORIEN</td><td>Sexual orientation of respondent</td></tr></table>",
//!     ),
//!     DocumentHandle::from_path("brfss_2022.pdf", DocumentFormat::Pdf),
//! ];
//!
//! let result = extractor.extract_all(&documents);
//! println!("Found: {} records", result.metadata.records_found);
//! println!("Failures: {} documents", result.failures.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod config;
mod types;
mod templates;
mod format;
mod html;
mod pdf;
mod text;
mod csv_scan;
mod extractor;

#[cfg(test)]
mod tests;

pub use error::ExtractorError;
pub use config::{ExtractorConfig, TextTemplate};
pub use types::{ExtractionFailure, ExtractionMetadata, ExtractionResult};
pub use extractor::CodebookExtractor;
