//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::csv_scan::CsvExtractor;
use crate::error::ExtractorError;
use crate::format::{Context, FormatExtractor};
use crate::html::HtmlExtractor;
use crate::pdf::PdfExtractor;
use crate::templates::TemplateSet;
use crate::text::TextExtractor;
use crate::types::{ExtractionFailure, ExtractionMetadata, ExtractionResult};
use codebook_domain::{DocumentBody, DocumentExtraction, DocumentFormat, DocumentHandle, Extractor};
use codebook_gatekeeper::Gatekeeper;
use codebook_taxonomy::Taxonomy;
use std::any::Any;
use std::borrow::Cow;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// The Extractor turns codebook documents into candidate variable records
///
/// Owns the compiled taxonomy, the gatekeeper and the text templates; it is
/// immutable after construction so a single instance can be shared across
/// blocking worker threads.
#[derive(Debug, Clone)]
pub struct CodebookExtractor {
    taxonomy: Taxonomy,
    gatekeeper: Gatekeeper,
    config: ExtractorConfig,
    templates: TemplateSet,
}

impl CodebookExtractor {
    /// Create a new Extractor
    ///
    /// # Errors
    /// Returns error if the configuration is invalid or a template fails to compile
    pub fn new(
        taxonomy: Taxonomy,
        gatekeeper: Gatekeeper,
        config: ExtractorConfig,
    ) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        let templates = TemplateSet::compile(&config.text_templates)?;
        debug!("Compiled {} text templates", templates.len());

        Ok(Self {
            taxonomy,
            gatekeeper,
            config,
            templates,
        })
    }

    /// Create an Extractor with the built-in taxonomy and default settings
    pub fn with_defaults() -> Result<Self, ExtractorError> {
        let taxonomy = Taxonomy::default_taxonomy()
            .map_err(|e| ExtractorError::Config(e.to_string()))?;
        Self::new(taxonomy, Gatekeeper::default_config(), ExtractorConfig::default())
    }

    /// Taxonomy used for tagging and keyword scans
    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract one document with every extractor for its format
    pub fn extract_document(
        &self,
        document: &DocumentHandle,
    ) -> Result<DocumentExtraction, ExtractorError> {
        let bytes = self.read(document)?;
        let ctx = Context {
            taxonomy: &self.taxonomy,
            gatekeeper: &self.gatekeeper,
            templates: &self.templates,
            config: &self.config,
        };

        let extraction = format_extractor(document.format).extract(&ctx, document, &bytes)?;
        debug!(
            "{}: {} records, {} hits, {} rejected",
            document.source_id,
            extraction.records.len(),
            extraction.hits.len(),
            extraction.rejected
        );
        Ok(extraction)
    }

    /// Extract a batch sequentially
    ///
    /// A failing or panicking document becomes an [`ExtractionFailure`]; the
    /// rest of the batch still runs.
    pub fn extract_all(&self, documents: &[DocumentHandle]) -> ExtractionResult {
        let start = Instant::now();
        info!("Starting extraction of {} documents", documents.len());

        let outcomes = documents
            .iter()
            .map(|document| {
                let outcome = isolate(|| self.extract_document(document));
                (document.source_id.clone(), outcome)
            })
            .collect();

        assemble(outcomes, start)
    }

    /// Extract a batch with one blocking task per document
    ///
    /// Results are collected in input order, so the output is identical to
    /// [`extract_all`](Self::extract_all) apart from timing.
    pub async fn extract_all_concurrent(
        self: Arc<Self>,
        documents: Vec<DocumentHandle>,
    ) -> ExtractionResult {
        let start = Instant::now();
        info!("Starting concurrent extraction of {} documents", documents.len());

        let tasks: Vec<_> = documents
            .into_iter()
            .map(|document| {
                let extractor = Arc::clone(&self);
                let source_id = document.source_id.clone();
                let task = tokio::task::spawn_blocking(move || {
                    isolate(|| extractor.extract_document(&document))
                });
                (source_id, task)
            })
            .collect();

        let mut outcomes = Vec::with_capacity(tasks.len());
        for (source_id, task) in tasks {
            let outcome = match task.await {
                Ok(outcome) => outcome,
                Err(e) => Err(ExtractorError::Join(e.to_string())),
            };
            outcomes.push((source_id, outcome));
        }

        assemble(outcomes, start)
    }

    fn read<'d>(&self, document: &'d DocumentHandle) -> Result<Cow<'d, [u8]>, ExtractorError> {
        let bytes = match &document.body {
            DocumentBody::Inline(bytes) => Cow::Borrowed(bytes.as_slice()),
            DocumentBody::Path(path) => {
                let bytes = std::fs::read(path).map_err(|source| ExtractorError::Read {
                    path: path.clone(),
                    source,
                })?;
                Cow::Owned(bytes)
            }
        };

        if bytes.len() > self.config.max_document_bytes {
            return Err(ExtractorError::DocumentTooLarge(
                bytes.len(),
                self.config.max_document_bytes,
            ));
        }
        Ok(bytes)
    }
}

impl Extractor for CodebookExtractor {
    type Error = ExtractorError;

    fn extract(&self, document: &DocumentHandle) -> Result<DocumentExtraction, Self::Error> {
        self.extract_document(document)
    }
}

/// Run one document's extraction, turning a panic into an error
pub(crate) fn isolate<T>(extract: impl FnOnce() -> Result<T, ExtractorError>) -> Result<T, ExtractorError> {
    panic::catch_unwind(AssertUnwindSafe(extract)).unwrap_or_else(|payload| {
        Err(ExtractorError::Panicked(panic_message(payload.as_ref())))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn format_extractor(format: DocumentFormat) -> &'static dyn FormatExtractor {
    match format {
        DocumentFormat::Html => &HtmlExtractor,
        DocumentFormat::Pdf => &PdfExtractor,
        DocumentFormat::Text => &TextExtractor,
        DocumentFormat::Csv => &CsvExtractor,
    }
}

/// Fold per-document outcomes into a batch result, preserving order
fn assemble(
    outcomes: Vec<(String, Result<DocumentExtraction, ExtractorError>)>,
    start: Instant,
) -> ExtractionResult {
    let mut documents = Vec::new();
    let mut failures = Vec::new();
    let documents_supplied = outcomes.len();

    for (source_id, outcome) in outcomes {
        match outcome {
            Ok(extraction) => documents.push(extraction),
            Err(e) => {
                warn!("Failed to extract {}: {}", source_id, e);
                failures.push(ExtractionFailure {
                    source_id,
                    reason: e.to_string(),
                });
            }
        }
    }

    let metadata = ExtractionMetadata {
        documents_supplied,
        documents_extracted: documents.len(),
        records_found: documents.iter().map(|d| d.records.len()).sum(),
        candidates_rejected: documents.iter().map(|d| d.rejected).sum(),
        hits_found: documents.iter().map(|d| d.hits.len()).sum(),
        processing_time_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
    };

    if metadata.records_found == 0 {
        info!("No variables found in {} documents", documents_supplied);
    }
    info!(
        "Extraction complete: {} records, {} hits, {} failed documents",
        metadata.records_found,
        metadata.hits_found,
        failures.len()
    );

    ExtractionResult {
        documents,
        failures,
        metadata,
    }
}
