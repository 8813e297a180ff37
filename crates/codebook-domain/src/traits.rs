//! Trait definitions for the extraction boundary
//!
//! The extractor crate implements these; the ranker and CLI only see records.

use crate::{DocumentHandle, KeywordHit, VariableRecord};
use serde::Serialize;

/// Everything one document yielded
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentExtraction {
    /// Source identifier of the document
    pub source_id: String,

    /// Candidate records in document order
    pub records: Vec<VariableRecord>,

    /// Keyword hits from line/column scans, in document order
    pub hits: Vec<KeywordHit>,

    /// Non-fatal problems (e.g. malformed CSV rows)
    pub warnings: Vec<String>,

    /// Candidates dropped by validation
    pub rejected: usize,
}

/// Trait for turning one codebook document into candidate records
///
/// Implemented by the application layer (codebook-extractor)
pub trait Extractor {
    /// Error type for extraction operations
    type Error;

    /// Extract candidate records from a single document
    fn extract(&self, document: &DocumentHandle) -> Result<DocumentExtraction, Self::Error>;
}
