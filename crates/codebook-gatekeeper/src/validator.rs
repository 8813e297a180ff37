//! Candidate validation logic

use crate::{GatekeeperError, ValidationConfig};
use codebook_domain::identifier::{self, MAX_IDENTIFIER_LEN};
use tracing::debug;

/// Result of candidate validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether the candidate passed validation
    pub status: ValidationStatus,

    /// Rejection reasons (if any)
    pub reasons: Vec<RejectionReason>,

    /// Name after case normalization
    pub name: String,

    /// Description after whitespace collapsing
    pub description: String,
}

impl ValidationResult {
    /// Whether the candidate was accepted
    pub fn is_accepted(&self) -> bool {
        self.status == ValidationStatus::Accepted
    }
}

/// Validation status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStatus {
    /// Candidate accepted
    Accepted,

    /// Candidate rejected
    Rejected,
}

/// Reasons for rejection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    /// Name does not satisfy the identifier grammar
    InvalidIdentifier(String),

    /// Name length outside the policy window
    NameLength {
        /// Actual length
        length: usize,
        /// Minimum allowed
        min: usize,
        /// Maximum allowed
        max: usize,
    },

    /// Description shorter than the policy minimum
    DescriptionTooShort {
        /// Actual length
        length: usize,
        /// Minimum allowed
        min: usize,
    },

    /// Description longer than the policy maximum
    DescriptionTooLong {
        /// Actual length
        length: usize,
        /// Maximum allowed
        max: usize,
    },

    /// Description contains a layout-noise phrase
    NoisePhrase(String),
}

/// Per-extractor admission rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissionPolicy {
    /// Uppercase the name before validating it (free-text sources)
    pub normalize_case: bool,

    /// Minimum name length
    pub min_name: usize,

    /// Maximum name length
    pub max_name: usize,

    /// Minimum description length (characters)
    pub min_description: usize,

    /// Maximum description length (characters), unbounded if `None`
    pub max_description: Option<usize>,

    /// Reject descriptions containing a noise phrase
    pub reject_noise: bool,
}

impl AdmissionPolicy {
    /// Policy for tokens validated exactly as extracted
    pub fn as_extracted(min_description: usize) -> Self {
        Self {
            normalize_case: false,
            min_name: 1,
            max_name: MAX_IDENTIFIER_LEN,
            min_description,
            max_description: None,
            reject_noise: false,
        }
    }

    /// Policy for case-insensitive free text
    pub fn free_text(min_description: usize) -> Self {
        Self {
            normalize_case: true,
            ..Self::as_extracted(min_description)
        }
    }
}

/// The Gatekeeper filters extracted candidates before they become records
#[derive(Debug, Clone)]
pub struct Gatekeeper {
    config: ValidationConfig,
    noise_phrases: Vec<String>,
}

impl Gatekeeper {
    /// Create a Gatekeeper after checking the configuration
    pub fn new(config: ValidationConfig) -> Result<Self, GatekeeperError> {
        config.validate().map_err(GatekeeperError::Config)?;
        Ok(Self::build(config))
    }

    /// Create a Gatekeeper with default configuration
    pub fn default_config() -> Self {
        Self::build(ValidationConfig::default())
    }

    fn build(config: ValidationConfig) -> Self {
        let noise_phrases = config.noise_phrases.iter().map(|p| p.to_lowercase()).collect();
        Self {
            config,
            noise_phrases,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Policy for HTML and PDF table rows
    pub fn table_policy(&self) -> AdmissionPolicy {
        AdmissionPolicy::as_extracted(self.config.table_min_description)
    }

    /// Policy for free-text regex templates with a description window
    pub fn template_policy(&self, min_description: usize, max_description: usize) -> AdmissionPolicy {
        AdmissionPolicy {
            normalize_case: true,
            min_name: self.config.template_min_name,
            max_name: self.config.template_max_name,
            min_description,
            max_description: Some(max_description),
            reject_noise: true,
        }
    }

    /// Validate a candidate name/description pair against a policy
    ///
    /// All checks run so the result lists every reason a candidate failed.
    pub fn validate(&self, name: &str, description: &str, policy: &AdmissionPolicy) -> ValidationResult {
        let mut reasons = Vec::new();

        let name = if policy.normalize_case {
            identifier::normalize(name)
        } else {
            name.trim().to_string()
        };
        let description = collapse_whitespace(description);

        // 1. Identifier grammar
        if !identifier::is_valid_identifier(&name) {
            reasons.push(RejectionReason::InvalidIdentifier(name.clone()));
        }

        // 2. Name length window
        let name_len = name.chars().count();
        if name_len < policy.min_name || name_len > policy.max_name {
            reasons.push(RejectionReason::NameLength {
                length: name_len,
                min: policy.min_name,
                max: policy.max_name,
            });
        }

        // 3. Description length window
        let description_len = description.chars().count();
        if description_len < policy.min_description.max(1) {
            reasons.push(RejectionReason::DescriptionTooShort {
                length: description_len,
                min: policy.min_description.max(1),
            });
        }
        if let Some(max) = policy.max_description {
            if description_len > max {
                reasons.push(RejectionReason::DescriptionTooLong {
                    length: description_len,
                    max,
                });
            }
        }

        // 4. Layout noise
        if policy.reject_noise {
            if let Some(phrase) = self.noise_phrase(&description) {
                reasons.push(RejectionReason::NoisePhrase(phrase.to_string()));
            }
        }

        let status = if reasons.is_empty() {
            ValidationStatus::Accepted
        } else {
            debug!("Rejected candidate {:?}: {:?}", name, reasons);
            ValidationStatus::Rejected
        };

        ValidationResult {
            status,
            reasons,
            name,
            description,
        }
    }

    /// First noise phrase contained in the description
    fn noise_phrase(&self, description: &str) -> Option<&str> {
        let lower = description.to_lowercase();
        self.noise_phrases
            .iter()
            .find(|phrase| lower.contains(phrase.as_str()))
            .map(String::as_str)
    }
}

/// Collapse internal whitespace runs to single spaces and trim
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
