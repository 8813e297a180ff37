//! Compiled keyword taxonomy

use crate::config::{Category, TaxonomyConfig};
use crate::error::TaxonomyError;
use codebook_domain::{MatchType, VariableRecord, PATTERN_MATCH_CATEGORY};
use regex::Regex;
use tracing::debug;

/// A category with its phrases lower-cased for matching
#[derive(Debug, Clone)]
struct CompiledCategory {
    category: Category,
    phrases: Vec<String>,
}

/// A whole-word, case-insensitive keyword matcher
#[derive(Debug, Clone)]
struct KeywordMatcher {
    keyword: String,
    regex: Regex,
}

/// Taxonomy ready for tagging and keyword scans
///
/// Built once from a [`TaxonomyConfig`] and shared read-only by every
/// extractor and by the scorer.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    categories: Vec<CompiledCategory>,
    identifier_patterns: Vec<Regex>,
    keywords: Vec<KeywordMatcher>,
}

impl Taxonomy {
    /// Compile a taxonomy from configuration
    ///
    /// # Errors
    /// Returns error if the configuration is invalid or a pattern fails to compile
    pub fn new(config: TaxonomyConfig) -> Result<Self, TaxonomyError> {
        config.validate().map_err(TaxonomyError::Config)?;

        let identifier_patterns = config
            .identifier_patterns
            .iter()
            .map(|pattern| compile_prefix(pattern))
            .collect::<Result<Vec<_>, _>>()?;

        let keyword_source: Vec<&str> = if config.search_keywords.is_empty() {
            config
                .categories
                .iter()
                .flat_map(|c| c.phrases.iter().map(String::as_str))
                .collect()
        } else {
            config.search_keywords.iter().map(String::as_str).collect()
        };

        let mut keywords: Vec<KeywordMatcher> = Vec::with_capacity(keyword_source.len());
        for keyword in keyword_source {
            if keywords.iter().any(|k| k.keyword == keyword) {
                continue;
            }
            keywords.push(KeywordMatcher {
                keyword: keyword.to_string(),
                regex: compile_whole_word(keyword)?,
            });
        }

        let categories = config
            .categories
            .into_iter()
            .map(|category| CompiledCategory {
                phrases: category.phrases.iter().map(|p| p.to_lowercase()).collect(),
                category,
            })
            .collect();

        debug!(
            "Compiled taxonomy: {} identifier patterns, {} scan keywords",
            identifier_patterns.len(),
            keywords.len()
        );

        Ok(Self {
            categories,
            identifier_patterns,
            keywords,
        })
    }

    /// Create the built-in taxonomy
    pub fn default_taxonomy() -> Result<Self, TaxonomyError> {
        Self::new(TaxonomyConfig::default())
    }

    /// Categories in tagging priority order
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter().map(|c| &c.category)
    }

    /// First category with a phrase occurring in the description
    pub fn category_for(&self, description: &str) -> Option<&Category> {
        let lower = description.to_lowercase();
        self.categories
            .iter()
            .find(|c| c.phrases.iter().any(|phrase| lower.contains(phrase.as_str())))
            .map(|c| &c.category)
    }

    /// Whether the name starts with one of the identifier-prefix patterns
    pub fn matches_identifier_pattern(&self, name: &str) -> bool {
        self.identifier_patterns.iter().any(|re| re.is_match(name))
    }

    /// Reporting group for a category label
    pub fn group_of(&self, category: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.category.name == category)
            .map(|c| c.category.group.as_str())
    }

    /// Assign a category to a freshly extracted record
    ///
    /// Description keywords take priority over identifier patterns; records
    /// matching neither keep their extractor's match type.
    pub fn tag(&self, record: &mut VariableRecord) {
        if let Some(category) = self.category_for(&record.description) {
            let name = category.name.clone();
            record.tag(name, MatchType::Keyword);
        } else if self.matches_identifier_pattern(&record.name) {
            record.tag(PATTERN_MATCH_CATEGORY, MatchType::VariablePattern);
        }
    }

    /// First configured keyword appearing as a whole word in `text`
    pub fn find_keyword(&self, text: &str) -> Option<&str> {
        self.keywords
            .iter()
            .find(|k| k.regex.is_match(text))
            .map(|k| k.keyword.as_str())
    }

    /// Scan keywords in evaluation order
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(|k| k.keyword.as_str())
    }
}

/// Compile a pattern anchored at the start of the name
pub(crate) fn compile_prefix(pattern: &str) -> Result<Regex, TaxonomyError> {
    Regex::new(&format!("^(?:{})", pattern)).map_err(|source| TaxonomyError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Compile a literal keyword as a case-insensitive whole-word matcher
pub(crate) fn compile_whole_word(keyword: &str) -> Result<Regex, TaxonomyError> {
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(keyword))).map_err(|source| {
        TaxonomyError::InvalidPattern {
            pattern: keyword.to_string(),
            source,
        }
    })
}
