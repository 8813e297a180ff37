//! Variable records - the single entity recovered from codebooks

use crate::identifier::is_valid_identifier;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category label assigned when only an identifier-prefix pattern matched
pub const PATTERN_MATCH_CATEGORY: &str = "pattern_match";

/// Kind of document region a record was extracted from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    /// HTML table row
    Html,
    /// HTML visible text (label scan)
    HtmlText,
    /// PDF page line split into cells
    PdfTable,
    /// PDF page text (regex templates)
    PdfText,
    /// Plain text file
    Text,
    /// CSV data row
    Csv,
}

impl SourceType {
    /// Get the source type as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Html => "html",
            SourceType::HtmlText => "html_text",
            SourceType::PdfTable => "pdf_table",
            SourceType::PdfText => "pdf_text",
            SourceType::Text => "text",
            SourceType::Csv => "csv",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a record was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Description contained a taxonomy keyword
    Keyword,
    /// Name matched an identifier-prefix pattern
    VariablePattern,
    /// Structured table row
    Table,
    /// Free-text regex template
    RegexText,
}

impl MatchType {
    /// Get the match type as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Keyword => "keyword",
            MatchType::VariablePattern => "variable_pattern",
            MatchType::Table => "table",
            MatchType::RegexText => "regex_text",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A canonical (name, description, provenance) tuple from a codebook
///
/// Records are created by exactly one extractor call with a valid name and a
/// non-empty description. Only the relevance fields change afterwards, and
/// only once (see [`VariableRecord::set_score`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableRecord {
    /// Variable name, case-normalized to the source form
    pub name: String,

    /// Whitespace-collapsed description
    pub description: String,

    /// Provenance: file name or path the record was found in
    pub source_file: String,

    /// Document region kind
    pub source_type: SourceType,

    /// 1-based page number (paginated sources only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// 1-based line (text) or row (CSV) number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,

    /// Taxonomy label assigned at extraction time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// How the record was found
    pub match_type: MatchType,

    /// Cumulative relevance weight, set by the scorer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<u32>,

    /// Rule tags that contributed to the score, in rule order
    #[serde(default)]
    pub reasons: Vec<String>,
}

impl VariableRecord {
    /// Create a new unscored record
    ///
    /// # Errors
    /// Returns error if the name fails the identifier grammar or the
    /// description is blank.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        source_file: impl Into<String>,
        source_type: SourceType,
        match_type: MatchType,
    ) -> Result<Self, String> {
        let name = name.into();
        let description = description.into();

        if !is_valid_identifier(&name) {
            return Err(format!("Invalid variable name: {:?}", name));
        }
        if description.trim().is_empty() {
            return Err(format!("Empty description for variable {}", name));
        }

        Ok(Self {
            name,
            description,
            source_file: source_file.into(),
            source_type,
            page: None,
            line: None,
            category: None,
            match_type,
            relevance_score: None,
            reasons: Vec::new(),
        })
    }

    /// Attach a page number
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Attach a line or row number
    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    /// Assign a taxonomy label and the match type that produced it
    pub fn tag(&mut self, category: impl Into<String>, match_type: MatchType) {
        self.category = Some(category.into());
        self.match_type = match_type;
    }

    /// Whether the scorer has already annotated this record
    pub fn is_scored(&self) -> bool {
        self.relevance_score.is_some()
    }

    /// Record the relevance score and contributing rule tags
    ///
    /// # Errors
    /// Returns error if the record was already scored.
    pub fn set_score(&mut self, score: u32, reasons: Vec<String>) -> Result<(), String> {
        if self.is_scored() {
            return Err(format!("Variable {} has already been scored", self.name));
        }
        self.relevance_score = Some(score);
        self.reasons = reasons;
        Ok(())
    }

    /// Score, treating an unscored record as zero
    pub fn score(&self) -> u32 {
        self.relevance_score.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> VariableRecord {
        VariableRecord::new(
            "SEXORIEN",
            "Sexual orientation of respondent",
            "codebook.html",
            SourceType::Html,
            MatchType::Table,
        )
        .unwrap()
    }

    #[test]
    fn test_new_record_is_unscored() {
        let record = record();
        assert!(!record.is_scored());
        assert_eq!(record.score(), 0);
        assert!(record.reasons.is_empty());
        assert!(record.page.is_none());
    }

    #[test]
    fn test_rejects_invalid_name() {
        let result = VariableRecord::new("123", "Numeric code", "f", SourceType::Csv, MatchType::Keyword);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_blank_description() {
        let result = VariableRecord::new("AGE", "   ", "f", SourceType::Csv, MatchType::Keyword);
        assert!(result.is_err());
    }

    #[test]
    fn test_score_is_set_once() {
        let mut record = record();
        record.set_score(16, vec!["direct_topic_indicator".into()]).unwrap();
        assert_eq!(record.score(), 16);
        assert!(record.set_score(3, Vec::new()).is_err());
        assert_eq!(record.score(), 16);
    }

    #[test]
    fn test_tag_overrides_match_type() {
        let mut record = record();
        record.tag("sexual_orientation", MatchType::Keyword);
        assert_eq!(record.category.as_deref(), Some("sexual_orientation"));
        assert_eq!(record.match_type, MatchType::Keyword);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(SourceType::PdfTable.to_string(), "pdf_table");
        assert_eq!(SourceType::HtmlText.to_string(), "html_text");
        assert_eq!(MatchType::VariablePattern.to_string(), "variable_pattern");
        assert_eq!(MatchType::RegexText.to_string(), "regex_text");
    }
}
