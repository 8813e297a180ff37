//! Rules command implementation.

use crate::config::{MinerConfig, OutputFormat};
use crate::error::Result;
use crate::output::Formatter;
use codebook_ranker::ScoringConfig;
use codebook_taxonomy::TaxonomyConfig;
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

#[derive(Serialize)]
struct RulesView<'a> {
    taxonomy: &'a TaxonomyConfig,
    scoring: &'a ScoringConfig,
}

/// Execute the rules command.
pub fn execute_rules(config: &MinerConfig, formatter: &Formatter) -> Result<()> {
    println!("{}", render_rules(config, formatter.format())?);
    Ok(())
}

/// Render the active taxonomy and scoring rules.
pub fn render_rules(config: &MinerConfig, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        let view = RulesView {
            taxonomy: &config.taxonomy,
            scoring: &config.scoring,
        };
        return Ok(serde_json::to_string_pretty(&view)?);
    }

    let mut scoring = Builder::default();
    scoring.push_record(["Tag", "Weight", "Trigger"]);
    for rule in &config.scoring.rules {
        let mut triggers = rule.phrases.join(", ");
        if let Some(pattern) = &rule.name_pattern {
            if !triggers.is_empty() {
                triggers.push_str("; ");
            }
            triggers.push_str(&format!("name ~ {}", pattern));
        }
        scoring.push_record([rule.tag.clone(), rule.weight.to_string(), triggers]);
    }

    let mut categories = Builder::default();
    categories.push_record(["Category", "Group", "Phrases"]);
    for category in &config.taxonomy.categories {
        categories.push_record([
            category.name.clone(),
            category.group.clone(),
            category.phrases.join(", "),
        ]);
    }

    let mut scoring = scoring.build();
    scoring.with(Style::rounded());
    let mut categories = categories.build();
    categories.with(Style::rounded());

    Ok(format!(
        "Scoring rules\n{}\n\nTaxonomy categories\n{}\n\nIdentifier patterns: {}\nScan keywords: {}",
        scoring,
        categories,
        config.taxonomy.identifier_patterns.join(", "),
        config.taxonomy.search_keywords.join(", "),
    ))
}
