//! Codebook Domain Layer
//!
//! Core data model shared by every codebook-miner crate. It has a single
//! external dependency (serde) and defines the record schema, the identifier
//! grammar, document handles and the extraction trait boundary.
//!
//! ## Key Concepts
//!
//! - **VariableRecord**: a variable's name, description and provenance
//! - **Identifier grammar**: `[A-Z_][A-Z0-9_]{0,31}` after case normalization
//! - **DocumentHandle**: a caller-supplied document tagged with its format
//! - **KeywordHit**: a whole-word keyword match in a text line or CSV cell

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod hit;
pub mod identifier;
pub mod record;
pub mod traits;

// Re-exports for convenience
pub use document::{DocumentBody, DocumentFormat, DocumentHandle};
pub use hit::{HitLocation, KeywordHit};
pub use record::{MatchType, SourceType, VariableRecord, PATTERN_MATCH_CATEGORY};
pub use traits::{DocumentExtraction, Extractor};
