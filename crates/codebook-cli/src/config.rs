//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use codebook_extractor::ExtractorConfig;
use codebook_gatekeeper::ValidationConfig;
use codebook_ranker::ScoringConfig;
use codebook_taxonomy::TaxonomyConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Full miner configuration, one section per component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MinerConfig {
    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Candidate admission rules
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Format extractor settings
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Relevance scoring rules
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Keyword taxonomy
    #[serde(default)]
    pub taxonomy: TaxonomyConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// Quiet (names only) format
    Quiet,
}

impl MinerConfig {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".codebook").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Otherwise the default path is used when
    /// present, falling back to built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Ok(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        let contents = fs::read_to_string(&path).map_err(|e| {
            CliError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Check every section for impossible settings.
    pub fn validate(&self) -> Result<()> {
        let sections = [
            ("validation", self.validation.validate()),
            ("extractor", self.extractor.validate()),
            ("scoring", self.scoring.validate()),
            ("taxonomy", self.taxonomy.validate()),
        ];
        for (section, outcome) in sections {
            outcome.map_err(|e| CliError::Config(format!("[{}] {}", section, e)))?;
        }
        Ok(())
    }

    /// Save configuration to a file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}
