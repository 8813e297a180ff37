//! Extract, aggregate and score: the full miner pipeline.

use crate::config::MinerConfig;
use crate::error::{CliError, Result};
use codebook_domain::{DocumentHandle, VariableRecord};
use codebook_extractor::{CodebookExtractor, ExtractionResult};
use codebook_gatekeeper::Gatekeeper;
use codebook_ranker::{CategorySummary, RelevanceScorer};
use codebook_taxonomy::Taxonomy;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Documents found on disk plus paths that were passed over
#[derive(Debug, Default)]
pub struct DocumentSet {
    /// Supported documents in walk order
    pub documents: Vec<DocumentHandle>,

    /// Files with an unsupported extension
    pub skipped: Vec<PathBuf>,
}

/// Output of one pipeline run
#[derive(Debug)]
pub struct ScanReport {
    /// Every unique record, scored and sorted descending
    pub records: Vec<VariableRecord>,

    /// Records discarded as later duplicates of an earlier name
    pub duplicates_dropped: usize,

    /// Per-document extraction output, failures and metadata
    pub extraction: ExtractionResult,
}

/// Owns the compiled components for a run.
pub struct Pipeline {
    extractor: Arc<CodebookExtractor>,
    scorer: RelevanceScorer,
}

impl Pipeline {
    /// Build every component from configuration.
    pub fn from_config(config: &MinerConfig) -> Result<Self> {
        let taxonomy = Taxonomy::new(config.taxonomy.clone())?;
        let gatekeeper = Gatekeeper::new(config.validation.clone())
            .map_err(|e| CliError::Config(e.to_string()))?;
        let extractor = CodebookExtractor::new(taxonomy, gatekeeper, config.extractor.clone())?;
        let scorer = RelevanceScorer::new(config.scoring.clone())?;

        Ok(Self {
            extractor: Arc::new(extractor),
            scorer,
        })
    }

    /// Taxonomy used for tagging.
    pub fn taxonomy(&self) -> &Taxonomy {
        self.extractor.taxonomy()
    }

    /// Run the pipeline over `documents`, in order.
    pub async fn run(&self, documents: Vec<DocumentHandle>, concurrent: bool) -> Result<ScanReport> {
        let extraction = if concurrent {
            Arc::clone(&self.extractor).extract_all_concurrent(documents).await
        } else {
            self.extractor.extract_all(&documents)
        };

        let candidates: Vec<VariableRecord> = extraction.records().cloned().collect();
        let ranked = self.scorer.rank(candidates)?;
        if ranked.records.is_empty() {
            info!("No variables found");
        }

        Ok(ScanReport {
            records: ranked.records,
            duplicates_dropped: ranked.duplicates_dropped,
            extraction,
        })
    }

    /// Count records per taxonomy category and group.
    pub fn summarize(&self, records: &[VariableRecord]) -> CategorySummary {
        CategorySummary::from_records(records, self.taxonomy())
    }
}

/// Resolve command-line paths into document handles.
///
/// Directories are walked recursively with entries in sorted order so runs
/// are reproducible. Files with an unrecognised extension are skipped.
pub fn collect_documents(paths: &[PathBuf], columns: Option<&[String]>) -> Result<DocumentSet> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            walk(path, &mut files)?;
        } else {
            files.push(path.clone());
        }
    }

    let mut set = DocumentSet::default();
    for file in files {
        match DocumentHandle::detect(&file) {
            Some(document) => {
                let document = match columns {
                    Some(columns) => document.with_columns(columns.to_vec()),
                    None => document,
                };
                debug!("Queued {} as {}", file.display(), document.format.as_str());
                set.documents.push(document);
            }
            None => {
                warn!("Skipping {}: unsupported file type", file.display());
                set.skipped.push(file);
            }
        }
    }
    Ok(set)
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();

    for entry in entries {
        if entry.is_dir() {
            walk(&entry, files)?;
        } else {
            files.push(entry);
        }
    }
    Ok(())
}

/// Records kept after the score floor and the top-N cut.
///
/// Relies on `records` being sorted descending by score.
pub fn window(records: &[VariableRecord], top: Option<usize>, min_score: Option<u32>) -> &[VariableRecord] {
    let floor = min_score.map_or(records.len(), |min| {
        records.iter().position(|r| r.score() < min).unwrap_or(records.len())
    });
    let end = top.map_or(floor, |n| n.min(floor));
    &records[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use codebook_domain::{DocumentFormat, MatchType, SourceType};

    fn scored(name: &str, score: u32) -> VariableRecord {
        let mut record =
            VariableRecord::new(name, "description", "a.txt", SourceType::Text, MatchType::Keyword).unwrap();
        record.set_score(score, Vec::new()).unwrap();
        record
    }

    #[test]
    fn test_window() {
        let records = vec![scored("A", 20), scored("B", 10), scored("C", 5), scored("D", 0)];

        assert_eq!(window(&records, None, None).len(), 4);
        assert_eq!(window(&records, Some(2), None).len(), 2);
        assert_eq!(window(&records, None, Some(1)).len(), 3);
        assert_eq!(window(&records, Some(10), Some(10)).len(), 2);
        assert!(window(&records, Some(0), None).is_empty());
    }

    #[test]
    fn test_collect_documents_walks_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("b_nested");
        fs::create_dir(&nested).unwrap();
        fs::write(dir.path().join("c.csv"), "name,label\n").unwrap();
        fs::write(dir.path().join("a.html"), "<p></p>").unwrap();
        fs::write(dir.path().join("notes.docx"), "binary").unwrap();
        fs::write(nested.join("z.txt"), "text").unwrap();

        let set = collect_documents(&[dir.path().to_path_buf()], None).unwrap();
        let ids: Vec<_> = set.documents.iter().map(|d| d.source_id.as_str()).collect();
        assert_eq!(ids, vec!["a.html", "z.txt", "c.csv"]);
        assert_eq!(set.documents[2].format, DocumentFormat::Csv);
        assert_eq!(set.skipped.len(), 1);
    }

    #[test]
    fn test_collect_documents_applies_columns() {
        let columns = vec!["Notes".to_string()];
        let set = collect_documents(&[PathBuf::from("codebook.csv")], Some(&columns)).unwrap();
        assert_eq!(set.documents[0].columns.as_deref(), Some(&columns[..]));
    }
}
