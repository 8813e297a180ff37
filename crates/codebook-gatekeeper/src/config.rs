//! Gatekeeper configuration

use codebook_domain::identifier::MAX_IDENTIFIER_LEN;
use serde::{Deserialize, Serialize};

/// Configuration for candidate admission rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Phrases that mark a free-text description as layout noise
    pub noise_phrases: Vec<String>,

    /// Minimum description length for table rows (HTML and PDF)
    pub table_min_description: usize,

    /// Minimum name length for free-text templates
    pub template_min_name: usize,

    /// Maximum name length for free-text templates
    pub template_max_name: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            noise_phrases: [
                "hidden",
                "blank",
                "missing",
                "page",
                "section",
                "question prologue",
                "calculated by",
                "go to",
            ]
            .iter()
            .map(|p| p.to_string())
            .collect(),
            table_min_description: 4,
            template_min_name: 3,
            template_max_name: MAX_IDENTIFIER_LEN,
        }
    }
}

impl ValidationConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.template_min_name == 0 {
            return Err("template_min_name must be greater than 0".to_string());
        }
        if self.template_min_name > self.template_max_name {
            return Err("template_min_name cannot exceed template_max_name".to_string());
        }
        if self.template_max_name > MAX_IDENTIFIER_LEN {
            return Err(format!("template_max_name cannot exceed {}", MAX_IDENTIFIER_LEN));
        }
        if self.table_min_description == 0 {
            return Err("table_min_description must be greater than 0".to_string());
        }
        if self.noise_phrases.iter().any(|p| p.trim().is_empty()) {
            return Err("noise phrases cannot be empty".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str)
            .map_err(|e| format!("Failed to parse TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ValidationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.table_min_description, 4);
        assert!(config.noise_phrases.iter().any(|p| p == "question prologue"));
    }

    #[test]
    fn test_invalid_name_window() {
        let mut config = ValidationConfig::default();
        config.template_min_name = 40;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml() {
        let config = ValidationConfig::from_toml(
            r#"
            noise_phrases = ["skip"]
            table_min_description = 2
            template_min_name = 2
            template_max_name = 16
            "#,
        )
        .unwrap();
        assert_eq!(config.noise_phrases, vec!["skip".to_string()]);
        assert_eq!(config.template_max_name, 16);
    }
}
