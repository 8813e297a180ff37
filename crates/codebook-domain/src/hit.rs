//! Keyword hits reported by the line and column scanners

use serde::{Deserialize, Serialize};

/// Where in a document a keyword was found
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HitLocation {
    /// 1-based line of a plain-text file
    Line {
        /// Line number
        number: u32,
    },
    /// 1-based CSV row (the header is row 1) and the matching column
    Row {
        /// Row number
        number: u32,
        /// Header of the matching cell
        column: String,
    },
}

/// A whole-word keyword match in a line or CSV cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordHit {
    /// Document the hit came from
    pub source_file: String,

    /// Line or row of the hit
    pub location: HitLocation,

    /// Configured keyword that matched
    pub keyword: String,

    /// Trimmed line or cell text
    pub content: String,

    /// CSV only: the full row as (header, value) pairs in column order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub row_context: Vec<(String, String)>,
}
