//! Codebook Ranker
//!
//! Deduplicates extracted variable records and ranks them by relevance.
//!
//! # Overview
//!
//! - **Aggregation**: one record per variable name, first occurrence wins
//! - **Scoring**: ordered weighted keyword rules, all evaluated, weights summed
//! - **Ranking**: stable sort descending by score
//! - **Summary**: record counts per taxonomy category and group
//!
//! ## Default rules
//!
//! | Tag | Trigger | Weight |
//! |-----|---------|--------|
//! | `direct_topic_indicator` | sexual orientation, transgender, gay, lesbian, bisexual | 10 |
//! | `behavior_indicator` | sex with, sexual partner, msm, wsw | 8 |
//! | `key_demographic` | sex, gender, age, marital | 5 |
//! | `health_disparity` | hiv, mental health, depression, suicide, discrimination | 7 |
//! | `access_indicator` | healthcare, insurance, doctor | 4 |
//! | `identifier_pattern` | name matches `^(SEX\|TRNSGNDR\|SXORIENT)` | 6 |
//!
//! # Usage
//!
//! ```
//! use codebook_domain::{MatchType, SourceType, VariableRecord};
//! use codebook_ranker::RelevanceScorer;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let records = vec![
//!     VariableRecord::new("AGE", "Age in years", "a.html", SourceType::Html, MatchType::Table)?,
//!     VariableRecord::new("SEXORIEN", "Sexual orientation", "a.html", SourceType::Html, MatchType::Table)?,
//! ];
//!
//! let scorer = RelevanceScorer::default_rules()?;
//! let ranked = scorer.rank(records)?;
//! assert_eq!(ranked.records[0].name, "SEXORIEN");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod aggregate;
mod config;
mod error;
mod scorer;
mod summary;

pub use aggregate::{aggregate, Aggregation};
pub use config::{ScoringConfig, ScoringRule};
pub use error::RankerError;
pub use scorer::RelevanceScorer;
pub use summary::{CategoryCount, CategorySummary, OTHER_GROUP};
