//! Configuration for relevance scoring
//!
//! Rules are evaluated in order and are independent of each other: every
//! matching rule adds its weight, so overlapping rules double-count.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A weighted scoring rule
///
/// Matches when any phrase occurs in the lower-cased description or the
/// name pattern matches the case-sensitive name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRule {
    /// Tag appended to a record's reasons when the rule fires
    pub tag: String,

    /// Points added to the score
    pub weight: u32,

    /// Lower-case substrings searched in the description
    #[serde(default)]
    pub phrases: Vec<String>,

    /// Regex matched against the variable name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_pattern: Option<String>,
}

impl ScoringRule {
    /// Rule triggered by description phrases
    pub fn phrases(tag: &str, weight: u32, phrases: &[&str]) -> Self {
        Self {
            tag: tag.to_string(),
            weight,
            phrases: phrases.iter().map(|p| p.to_string()).collect(),
            name_pattern: None,
        }
    }

    /// Rule triggered by a name pattern
    pub fn name_pattern(tag: &str, weight: u32, pattern: &str) -> Self {
        Self {
            tag: tag.to_string(),
            weight,
            phrases: Vec::new(),
            name_pattern: Some(pattern.to_string()),
        }
    }
}

/// Configuration for the relevance scorer
///
/// # Examples
///
/// ```
/// use codebook_ranker::ScoringConfig;
///
/// let config = ScoringConfig::default();
/// assert_eq!(config.rules.len(), 6);
/// assert_eq!(config.rules[0].tag, "direct_topic_indicator");
/// assert_eq!(config.rules[0].weight, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Rules in evaluation order
    pub rules: Vec<ScoringRule>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            rules: vec![
                ScoringRule::phrases("direct_topic_indicator", 10, &[
                    "sexual orientation", "transgender", "gay", "lesbian", "bisexual",
                ]),
                ScoringRule::phrases("behavior_indicator", 8, &[
                    "sex with", "sexual partner", "msm", "wsw",
                ]),
                ScoringRule::phrases("key_demographic", 5, &["sex", "gender", "age", "marital"]),
                ScoringRule::phrases("health_disparity", 7, &[
                    "hiv", "mental health", "depression", "suicide", "discrimination",
                ]),
                ScoringRule::phrases("access_indicator", 4, &["healthcare", "insurance", "doctor"]),
                ScoringRule::name_pattern("identifier_pattern", 6, r"^(SEX|TRNSGNDR|SXORIENT)"),
            ],
        }
    }
}

impl ScoringConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        let mut tags = HashSet::new();
        for rule in &self.rules {
            if rule.tag.trim().is_empty() {
                return Err("rule tag cannot be empty".to_string());
            }
            if !tags.insert(rule.tag.as_str()) {
                return Err(format!("duplicate rule tag '{}'", rule.tag));
            }
            if rule.phrases.is_empty() && rule.name_pattern.is_none() {
                return Err(format!("rule '{}' has no phrases and no name pattern", rule.tag));
            }
            if rule.phrases.iter().any(|p| p.is_empty()) {
                return Err(format!("rule '{}' has an empty phrase", rule.tag));
            }
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str)
            .map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
