//! Keyword taxonomy configuration

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Group for the research-topic categories
pub const TOPIC_GROUP: &str = "topic";
/// Group for demographic categories
pub const DEMOGRAPHIC_GROUP: &str = "demographic";
/// Group for health-outcome categories
pub const HEALTH_OUTCOME_GROUP: &str = "health_outcome";

/// A named set of keyword phrases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Label written into `VariableRecord::category`
    pub name: String,

    /// Reporting group the category belongs to
    #[serde(default = "default_group")]
    pub group: String,

    /// Phrases matched as lower-case substrings of the description
    pub phrases: Vec<String>,
}

impl Category {
    /// Create a category from string slices
    pub fn new(name: &str, group: &str, phrases: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            group: group.to_string(),
            phrases: phrases.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Configuration for topic tagging and keyword scans
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyConfig {
    /// Regex prefixes matched at the start of a variable name
    #[serde(default)]
    pub identifier_patterns: Vec<String>,

    /// Whole-word keywords for line/CSV scans; empty means every category phrase
    #[serde(default)]
    pub search_keywords: Vec<String>,

    /// Categories in tagging priority order
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl TaxonomyConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.categories.is_empty() {
            return Err("taxonomy must define at least one category".to_string());
        }

        let mut seen = HashSet::new();
        for category in &self.categories {
            if category.name.trim().is_empty() {
                return Err("category name cannot be empty".to_string());
            }
            if !seen.insert(category.name.as_str()) {
                return Err(format!("duplicate category '{}'", category.name));
            }
            if category.phrases.is_empty() {
                return Err(format!("category '{}' has no phrases", category.name));
            }
            if category.phrases.iter().any(|p| p.trim().is_empty()) {
                return Err(format!("category '{}' contains an empty phrase", category.name));
            }
        }

        if self.identifier_patterns.iter().any(|p| p.trim().is_empty()) {
            return Err("identifier patterns cannot be empty".to_string());
        }
        if self.search_keywords.iter().any(|k| k.trim().is_empty()) {
            return Err("search keywords cannot be empty".to_string());
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

impl Default for TaxonomyConfig {
    /// Sexual orientation and gender identity survey taxonomy
    fn default() -> Self {
        let categories = vec![
            Category::new("sexual_orientation", TOPIC_GROUP, &[
                "sexual orientation", "gay", "lesbian", "bisexual", "homosexual",
                "heterosexual", "straight", "same-sex", "same sex", "attracted to",
                "sexual identity", "sexual preference", "lgb", "orientation",
            ]),
            Category::new("gender_identity", TOPIC_GROUP, &[
                "transgender", "gender identity", "trans", "gender", "birth sex",
                "assigned sex", "identify as", "cisgender", "non-binary", "nonbinary",
                "gender expression", "biological sex", "natal sex",
            ]),
            Category::new("sexual_behavior", TOPIC_GROUP, &[
                "sex with men", "sex with women", "msm", "wsw", "sexual partner",
                "sexual behavior", "sexual activity", "intimate partner",
            ]),
            Category::new("discrimination", TOPIC_GROUP, &[
                "discrimination", "treated unfairly", "harassed", "bullied",
                "stigma", "prejudice", "bias", "treated differently",
            ]),
            Category::new("healthcare", TOPIC_GROUP, &[
                "healthcare", "health care", "doctor", "provider", "coverage",
                "insurance", "hormone", "hrt", "prep", "hiv", "std", "sti",
            ]),
            Category::new("mental_health", TOPIC_GROUP, &[
                "depression", "anxiety", "mental health", "suicide", "suicidal",
                "stress", "support", "counseling", "therapy",
            ]),
            Category::new("social_support", TOPIC_GROUP, &[
                "family support", "acceptance", "coming out", "closeted",
                "community", "social support", "isolation",
            ]),
            Category::new("age", DEMOGRAPHIC_GROUP, &["age", "birth", "born"]),
            Category::new("race_ethnicity", DEMOGRAPHIC_GROUP, &[
                "race", "ethnicity", "hispanic", "white", "black",
                "asian", "native american", "pacific islander",
            ]),
            Category::new("education", DEMOGRAPHIC_GROUP, &[
                "education", "school", "grade", "degree", "college",
            ]),
            Category::new("income", DEMOGRAPHIC_GROUP, &["income", "money", "earn", "salary", "wage"]),
            Category::new("employment", DEMOGRAPHIC_GROUP, &["employ", "work", "job", "occupation"]),
            Category::new("geography", DEMOGRAPHIC_GROUP, &[
                "state", "county", "urban", "rural", "city", "metro",
            ]),
            Category::new("household", DEMOGRAPHIC_GROUP, &["household", "living", "reside", "home"]),
            Category::new("relationship", DEMOGRAPHIC_GROUP, &[
                "marital", "married", "partner", "spouse", "relationship",
            ]),
            Category::new("mental_health_outcomes", HEALTH_OUTCOME_GROUP, &[
                "depression", "anxiety", "mental", "emotional",
                "psychological", "stress", "suicide",
            ]),
            Category::new("substance_use", HEALTH_OUTCOME_GROUP, &[
                "alcohol", "drink", "smoke", "tobacco", "drug",
                "substance", "marijuana", "opioid",
            ]),
            Category::new("sexual_health", HEALTH_OUTCOME_GROUP, &[
                "hiv", "aids", "std", "sti", "sexually transmitted",
                "condom", "safe sex", "sexual health",
            ]),
            Category::new("chronic_conditions", HEALTH_OUTCOME_GROUP, &[
                "diabetes", "heart", "cancer", "asthma", "copd",
                "kidney", "arthritis", "chronic",
            ]),
            Category::new("healthcare_access", HEALTH_OUTCOME_GROUP, &[
                "insurance", "coverage", "doctor", "physician",
                "healthcare", "medical care", "checkup", "cost",
            ]),
            Category::new("preventive_care", HEALTH_OUTCOME_GROUP, &[
                "screening", "vaccine", "immunization", "preventive",
                "mammogram", "colonoscopy", "flu shot",
            ]),
            Category::new("overall_health", HEALTH_OUTCOME_GROUP, &[
                "general health", "overall health", "health status",
                "quality of life", "physical health", "health days",
            ]),
        ];

        let identifier_patterns = [
            r"SEX\d*", r"SEXORIEN\d*", r"SXORIENT\d*", r"TRNSGNDR\d*",
            r"SOMALE\d*", r"SOFEMALE\d*", r"GENHLTH\d*", r"MENTHLTH\d*",
            r"HLTHPLN\d*", r"MEDCOST\d*", r"CHECKUP\d*", r"CVDINFR\d*",
            r"CVDCRHD\d*", r"CVDSTRK\d*", r"ASTHMA\d*", r"CHCSCNCR\d*",
            r"CHCOCNCR\d*", r"CHCCOPD\d*", r"ADDEPEV\d*", r"CHCKIDNY\d*",
            r"DIABETE\d*", r"MARITAL\d*", r"EDUCA\d*", r"EMPLOY\d*",
            r"INCOME\d*", r"HIVTST\d*", r"HIVRISK\d*",
        ]
        .iter()
        .map(|p| p.to_string())
        .collect();

        let search_keywords = [
            "sexual orientation", "sexorient", "sexorien", "_sexori1", "sxorient",
            "gender identity", "transgender", "trnsgndr", "_trngrnd", "genid_describe",
            "gay", "lesbian", "bisexual", "straight", "heterosexual", "queer",
            "male", "female", "sex", "birthsex", "sex1", "sexvar",
            "lgbt", "sogi", "somale", "sofemale", "cisgender",
        ]
        .iter()
        .map(|k| k.to_string())
        .collect();

        Self {
            identifier_patterns,
            search_keywords,
            categories,
        }
    }
}

fn default_group() -> String {
    TOPIC_GROUP.to_string()
}
