//! Weighted keyword scoring of aggregated records

use crate::aggregate::{aggregate, Aggregation};
use crate::{RankerError, ScoringConfig};
use codebook_domain::VariableRecord;
use regex::Regex;
use tracing::{debug, info};

#[derive(Debug, Clone)]
struct CompiledRule {
    tag: String,
    weight: u32,
    phrases: Vec<String>,
    name_pattern: Option<Regex>,
}

impl CompiledRule {
    fn matches(&self, name: &str, description: &str) -> bool {
        self.phrases.iter().any(|p| description.contains(p.as_str()))
            || self.name_pattern.as_ref().is_some_and(|re| re.is_match(name))
    }
}

/// Scores records by summing the weights of every matching rule
#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    rules: Vec<CompiledRule>,
}

impl RelevanceScorer {
    /// Compile a scorer from configuration
    pub fn new(config: ScoringConfig) -> Result<Self, RankerError> {
        config.validate().map_err(RankerError::Config)?;

        let rules = config
            .rules
            .into_iter()
            .map(|rule| {
                let name_pattern = rule
                    .name_pattern
                    .as_deref()
                    .map(Regex::new)
                    .transpose()
                    .map_err(|source| RankerError::InvalidPattern {
                        tag: rule.tag.clone(),
                        source,
                    })?;
                Ok(CompiledRule {
                    phrases: rule.phrases.iter().map(|p| p.to_lowercase()).collect(),
                    tag: rule.tag,
                    weight: rule.weight,
                    name_pattern,
                })
            })
            .collect::<Result<Vec<_>, RankerError>>()?;

        Ok(Self { rules })
    }

    /// Scorer with the built-in rule table
    pub fn default_rules() -> Result<Self, RankerError> {
        Self::new(ScoringConfig::default())
    }

    /// Score and matching tags for one record, without mutating it
    pub fn evaluate(&self, record: &VariableRecord) -> (u32, Vec<String>) {
        let description = record.description.to_lowercase();
        let mut score = 0u32;
        let mut reasons = Vec::new();

        for rule in &self.rules {
            if rule.matches(&record.name, &description) {
                score = score.saturating_add(rule.weight);
                reasons.push(rule.tag.clone());
            }
        }
        (score, reasons)
    }

    /// Score every record and sort descending by score
    ///
    /// Ties keep their incoming order. Every record is kept, including those
    /// scoring zero.
    ///
    /// # Errors
    /// Returns [`RankerError::AlreadyScored`] if a record was scored before
    pub fn score(&self, records: Vec<VariableRecord>) -> Result<Vec<VariableRecord>, RankerError> {
        let mut scored = Vec::with_capacity(records.len());
        for mut record in records {
            let (score, reasons) = self.evaluate(&record);
            record
                .set_score(score, reasons)
                .map_err(RankerError::AlreadyScored)?;
            debug!("Scored {} = {} {:?}", record.name, score, record.reasons);
            scored.push(record);
        }

        // sort_by is stable
        scored.sort_by(|a, b| b.score().cmp(&a.score()));

        info!(
            "Scored {} records, {} with a positive score",
            scored.len(),
            scored.iter().filter(|r| r.score() > 0).count()
        );
        Ok(scored)
    }

    /// Deduplicate concatenated extractor output, then score it
    pub fn rank(&self, records: Vec<VariableRecord>) -> Result<Aggregation, RankerError> {
        let aggregation = aggregate(records);
        info!(
            "Aggregated {} unique records, dropped {} duplicates",
            aggregation.records.len(),
            aggregation.duplicates_dropped
        );
        Ok(Aggregation {
            records: self.score(aggregation.records)?,
            duplicates_dropped: aggregation.duplicates_dropped,
        })
    }

    /// Rule tags and weights in evaluation order
    pub fn rules(&self) -> impl Iterator<Item = (&str, u32)> {
        self.rules.iter().map(|r| (r.tag.as_str(), r.weight))
    }
}
