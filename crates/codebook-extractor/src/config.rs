//! Configuration for the Extractor

use serde::{Deserialize, Serialize};

/// A multi-line regex template for free-text layouts
///
/// The pattern must either define named groups `name` and `description` or
/// at least two positional groups (name first, description second).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextTemplate {
    /// Template identifier used in logs
    pub name: String,

    /// Regex pattern
    pub pattern: String,

    /// Minimum accepted description length (characters)
    #[serde(default = "default_min_description")]
    pub min_description: usize,

    /// Maximum accepted description length (characters)
    #[serde(default = "default_max_description")]
    pub max_description: usize,
}

impl TextTemplate {
    /// Create a template with the default description window
    pub fn new(name: &str, pattern: &str) -> Self {
        Self {
            name: name.to_string(),
            pattern: pattern.to_string(),
            min_description: default_min_description(),
            max_description: default_max_description(),
        }
    }
}

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Maximum document size (bytes)
    pub max_document_bytes: usize,

    /// Minimum run of spaces separating cells in a PDF text line
    pub pdf_cell_gap: usize,

    /// CSV headers recognized as the variable-name column, in priority order
    pub csv_name_columns: Vec<String>,

    /// Free-text templates, applied in order
    pub text_templates: Vec<TextTemplate>,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_document_bytes == 0 {
            return Err("max_document_bytes must be greater than 0".to_string());
        }
        if self.pdf_cell_gap < 2 {
            return Err("pdf_cell_gap must be at least 2".to_string());
        }
        for template in &self.text_templates {
            if template.min_description > template.max_description {
                return Err(format!(
                    "template '{}': min_description cannot exceed max_description",
                    template.name
                ));
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

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_document_bytes: 64 * 1024 * 1024,
            pdf_cell_gap: 2,
            csv_name_columns: [
                "variable name",
                "variable_name",
                "sas variable name",
                "sas variable",
                "variable",
                "name",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
            text_templates: vec![
                TextTemplate::new(
                    "topic_name_colon",
                    r"(SXORIENT|SEXORIEN|TRNSGNDR|TRANSGEN)\s*:?\s*([^\n]+(?:\n[^\n\w]*[^\n]+)*)",
                ),
                TextTemplate::new(
                    "variable_name_label",
                    r"Variable Name:\s*([A-Za-z_][A-Za-z0-9_]*)\s*\n([^\n]+(?:\n[^\n\w]*[^\n]+)*)",
                ),
                TextTemplate::new(
                    "topic_token_line",
                    r"([A-Z_]*(?:SEX|ORIENT|TRANS|GENDER)[A-Z0-9_]*)\s+([A-Za-z][^\n]{20,300})",
                ),
            ],
        }
    }
}

fn default_min_description() -> usize {
    5
}

fn default_max_description() -> usize {
    300
}
