//! Codebook Taxonomy
//!
//! Static category → keyword-phrase mapping plus identifier-prefix patterns.
//!
//! The taxonomy drives three things:
//! - **Topic tagging**: the first category whose phrase appears in a record's
//!   description becomes its `category` (`match_type = keyword`)
//! - **Prefix tagging**: names matching a known prefix family get
//!   `category = "pattern_match"` (`match_type = variable_pattern`)
//! - **Keyword scans**: whole-word matching for plain-text and CSV scanners
//!
//! # Examples
//!
//! ```
//! use codebook_taxonomy::{Taxonomy, TaxonomyConfig};
//!
//! let taxonomy = Taxonomy::new(TaxonomyConfig::default()).unwrap();
//! let category = taxonomy.category_for("Sexual orientation of respondent").unwrap();
//! assert_eq!(category.name, "sexual_orientation");
//! assert!(taxonomy.matches_identifier_pattern("SXORIENT"));
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod taxonomy;

pub use config::{Category, TaxonomyConfig, DEMOGRAPHIC_GROUP, HEALTH_OUTCOME_GROUP, TOPIC_GROUP};
pub use error::TaxonomyError;
pub use taxonomy::Taxonomy;
