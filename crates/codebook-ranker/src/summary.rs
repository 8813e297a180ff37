//! Category counts over scored records

use codebook_domain::{VariableRecord, PATTERN_MATCH_CATEGORY};
use codebook_taxonomy::Taxonomy;
use serde::Serialize;
use std::collections::BTreeMap;

/// Group used for categories the taxonomy does not know
pub const OTHER_GROUP: &str = "other";

/// Record count for one taxonomy category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    /// Category name
    pub category: String,
    /// Reporting group of the category
    pub group: String,
    /// Records tagged with it
    pub count: usize,
}

/// How records are spread across the taxonomy
///
/// Tracks per-category and per-group counts plus identifier-pattern and
/// untagged records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    /// Non-zero category counts in taxonomy order
    pub categories: Vec<CategoryCount>,

    /// Records per taxonomy group
    pub groups: BTreeMap<String, usize>,

    /// Records tagged only by an identifier pattern
    pub pattern_match: usize,

    /// Records with no category
    pub untagged: usize,

    /// Total records counted
    pub total: usize,
}

impl CategorySummary {
    /// Count records per category and group
    pub fn from_records(records: &[VariableRecord], taxonomy: &Taxonomy) -> Self {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        let mut summary = Self {
            total: records.len(),
            ..Self::default()
        };

        for record in records {
            match record.category.as_deref() {
                None => summary.untagged += 1,
                Some(PATTERN_MATCH_CATEGORY) => summary.pattern_match += 1,
                Some(category) => *counts.entry(category).or_insert(0) += 1,
            }
        }

        for category in taxonomy.categories() {
            if let Some(count) = counts.remove(category.name.as_str()) {
                summary.push(&category.name, &category.group, count);
            }
        }
        // categories from a different taxonomy than the one given
        for (category, count) in counts {
            summary.push(category, OTHER_GROUP, count);
        }

        summary
    }

    fn push(&mut self, category: &str, group: &str, count: usize) {
        *self.groups.entry(group.to_string()).or_insert(0) += count;
        self.categories.push(CategoryCount {
            category: category.to_string(),
            group: group.to_string(),
            count,
        });
    }

    /// Count for one category, zero if absent
    pub fn count(&self, category: &str) -> usize {
        self.categories
            .iter()
            .find(|c| c.category == category)
            .map_or(0, |c| c.count)
    }

    /// Generate a plain-text report
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Category Summary".to_string(),
            "================".to_string(),
            format!("Records: {}", self.total),
            String::new(),
        ];

        if !self.groups.is_empty() {
            lines.push("By group:".to_string());
            for (group, count) in &self.groups {
                lines.push(format!("  {}: {}", group, count));
            }
            lines.push(String::new());
        }

        if !self.categories.is_empty() {
            lines.push("By category:".to_string());
            for c in &self.categories {
                lines.push(format!("  {} ({}): {}", c.category, c.group, c.count));
            }
            lines.push(String::new());
        }

        lines.push(format!("Identifier pattern only: {}", self.pattern_match));
        lines.push(format!("Untagged: {}", self.untagged));
        lines.join("\n")
    }
}
