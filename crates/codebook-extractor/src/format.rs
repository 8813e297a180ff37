//! Per-format extraction plumbing shared by every document format

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::templates::TemplateSet;
use codebook_domain::{
    DocumentExtraction, DocumentHandle, KeywordHit, MatchType, SourceType, VariableRecord,
};
use codebook_gatekeeper::{AdmissionPolicy, Gatekeeper};
use codebook_taxonomy::Taxonomy;
use tracing::{debug, warn};

/// Read-only state every format extractor works against
pub(crate) struct Context<'a> {
    pub taxonomy: &'a Taxonomy,
    pub gatekeeper: &'a Gatekeeper,
    pub templates: &'a TemplateSet,
    pub config: &'a ExtractorConfig,
}

/// One document format's extraction pipeline
pub(crate) trait FormatExtractor {
    /// Run every extractor for this format, in its fixed order
    fn extract(
        &self,
        ctx: &Context<'_>,
        document: &DocumentHandle,
        bytes: &[u8],
    ) -> Result<DocumentExtraction, ExtractorError>;
}

/// Where a candidate was found and how
#[derive(Debug, Clone, Copy)]
pub(crate) struct Origin {
    pub source_type: SourceType,
    pub match_type: MatchType,
    pub page: Option<u32>,
    pub line: Option<u32>,
}

impl Origin {
    pub fn new(source_type: SourceType, match_type: MatchType) -> Self {
        Self {
            source_type,
            match_type,
            page: None,
            line: None,
        }
    }

    pub fn on_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn on_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }
}

/// Accumulates one document's records, hits and warnings in document order
pub(crate) struct Collector<'c, 'a> {
    ctx: &'c Context<'a>,
    extraction: DocumentExtraction,
}

impl<'c, 'a> Collector<'c, 'a> {
    pub fn new(ctx: &'c Context<'a>, source_id: &str) -> Self {
        Self {
            ctx,
            extraction: DocumentExtraction {
                source_id: source_id.to_string(),
                ..Default::default()
            },
        }
    }

    /// Validate a candidate and keep it as a tagged record if accepted
    pub fn admit(
        &mut self,
        name: &str,
        description: &str,
        policy: &AdmissionPolicy,
        origin: Origin,
    ) -> bool {
        let result = self.ctx.gatekeeper.validate(name, description, policy);
        if !result.is_accepted() {
            self.extraction.rejected += 1;
            return false;
        }

        let record = VariableRecord::new(
            result.name,
            result.description,
            self.extraction.source_id.as_str(),
            origin.source_type,
            origin.match_type,
        );
        let mut record = match record {
            Ok(record) => record,
            Err(e) => {
                debug!("Dropped candidate in {}: {}", self.extraction.source_id, e);
                self.extraction.rejected += 1;
                return false;
            }
        };

        if let Some(page) = origin.page {
            record = record.with_page(page);
        }
        if let Some(line) = origin.line {
            record = record.with_line(line);
        }
        self.ctx.taxonomy.tag(&mut record);
        self.extraction.records.push(record);
        true
    }

    /// Run the free-text templates over `text`
    pub fn admit_templates(&mut self, text: &str, source_type: SourceType, page: Option<u32>) {
        let ctx = self.ctx;
        for found in ctx.templates.apply(text) {
            let policy = ctx
                .gatekeeper
                .template_policy(found.min_description, found.max_description);
            let mut origin = Origin::new(source_type, MatchType::RegexText);
            origin.page = page;
            if self.admit(&found.name, &found.description, &policy, origin) {
                debug!("Template '{}' matched {}", found.template, found.name);
            }
        }
    }

    pub fn hit(&mut self, hit: KeywordHit) {
        self.extraction.hits.push(hit);
    }

    /// Record a non-fatal problem with the document
    pub fn warn(&mut self, message: String) {
        warn!("{}: {}", self.extraction.source_id, message);
        self.extraction.warnings.push(message);
    }

    pub fn source_id(&self) -> &str {
        &self.extraction.source_id
    }

    pub fn context(&self) -> &'c Context<'a> {
        self.ctx
    }

    pub fn finish(self) -> DocumentExtraction {
        self.extraction
    }
}
