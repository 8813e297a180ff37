//! Batch result types for extraction

use codebook_domain::{DocumentExtraction, KeywordHit, VariableRecord};
use serde::Serialize;

/// Result of extracting a batch of documents
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractionResult {
    /// Per-document output, in input order
    pub documents: Vec<DocumentExtraction>,

    /// Documents that could not be processed
    pub failures: Vec<ExtractionFailure>,

    /// Metadata about the batch
    pub metadata: ExtractionMetadata,
}

impl ExtractionResult {
    /// All candidate records, concatenated in input order
    pub fn records(&self) -> impl Iterator<Item = &VariableRecord> {
        self.documents.iter().flat_map(|d| d.records.iter())
    }

    /// Consume the result, keeping the concatenated records
    pub fn into_records(self) -> Vec<VariableRecord> {
        self.documents.into_iter().flat_map(|d| d.records).collect()
    }

    /// All keyword hits in input order
    pub fn hits(&self) -> impl Iterator<Item = &KeywordHit> {
        self.documents.iter().flat_map(|d| d.hits.iter())
    }

    /// Non-fatal warnings as `(source_id, message)` pairs
    pub fn warnings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.documents.iter().flat_map(|d| {
            d.warnings
                .iter()
                .map(move |w| (d.source_id.as_str(), w.as_str()))
        })
    }

    /// Whether no document yielded a record
    pub fn is_empty(&self) -> bool {
        self.metadata.records_found == 0
    }
}

/// A document that failed as a whole
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionFailure {
    /// Source identifier of the failed document
    pub source_id: String,

    /// Reason for failure
    pub reason: String,
}

/// Metadata about an extraction batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionMetadata {
    /// Documents handed to the extractor
    pub documents_supplied: usize,

    /// Documents that were processed without a fatal error
    pub documents_extracted: usize,

    /// Records accepted across the batch
    pub records_found: usize,

    /// Candidates dropped by validation
    pub candidates_rejected: usize,

    /// Keyword hits across the batch
    pub hits_found: usize,

    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}
