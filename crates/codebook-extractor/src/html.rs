//! HTML codebooks: table rows, then labelled name/description text

use crate::error::ExtractorError;
use crate::format::{Collector, Context, FormatExtractor, Origin};
use codebook_domain::{DocumentExtraction, DocumentHandle, MatchType, SourceType};
use codebook_gatekeeper::AdmissionPolicy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;
use tracing::debug;

const NAME_LABEL: &str = r"(?i)\b(?:SAS\s+Variable\s+Name|Variable\s+Name|SAS\s+Variable|SAS\s+Name|Variable)\s*:\s*([A-Za-z_][A-Za-z0-9_]*)";
const DESCRIPTION_LABEL: &str = r"(?i)\b(?:Description|Label|Question)\s*:\s*([^\n]+)";

/// Elements whose text is never rendered
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

pub(crate) struct HtmlExtractor;

impl FormatExtractor for HtmlExtractor {
    fn extract(
        &self,
        ctx: &Context<'_>,
        document: &DocumentHandle,
        bytes: &[u8],
    ) -> Result<DocumentExtraction, ExtractorError> {
        let source = String::from_utf8_lossy(bytes);
        let html = Html::parse_document(&source);
        let mut collector = Collector::new(ctx, &document.source_id);

        extract_table_rows(&html, &mut collector)?;
        extract_labelled_text(&html, &mut collector)?;

        Ok(collector.finish())
    }
}

/// Every `<tr>` with at least two direct cells becomes a (name, description) candidate
fn extract_table_rows(html: &Html, collector: &mut Collector<'_, '_>) -> Result<(), ExtractorError> {
    let rows = Selector::parse("tr").map_err(|e| ExtractorError::Html(format!("{:?}", e)))?;
    let policy = collector.context().gatekeeper.table_policy();
    let origin = Origin::new(SourceType::Html, MatchType::Table);

    let mut seen = 0usize;
    for row in html.select(&rows) {
        let cells: Vec<String> = row
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|cell| matches!(cell.value().name(), "td" | "th"))
            .map(|cell| cell_text(&cell))
            .collect();

        if cells.len() < 2 {
            continue;
        }
        seen += 1;
        collector.admit(&cells[0], &cells[1], &policy, origin);
    }

    debug!("{}: {} table rows with two or more cells", collector.source_id(), seen);
    Ok(())
}

/// Scan visible text for `Variable Name: X ... Description: Y` blocks
fn extract_labelled_text(html: &Html, collector: &mut Collector<'_, '_>) -> Result<(), ExtractorError> {
    let (name_label, description_label) = label_patterns()?;
    let text = visible_text(html);
    let policy = AdmissionPolicy::free_text(1);
    let origin = Origin::new(SourceType::HtmlText, MatchType::RegexText);

    let names: Vec<_> = name_label.captures_iter(&text).collect();
    for (i, caps) in names.iter().enumerate() {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        // The description must appear before the next name label
        let end = names
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(text.len(), |next| next.start());
        let window = &text[whole.end()..end];

        if let Some(description) = description_label.captures(window).and_then(|c| c.get(1)) {
            collector.admit(name.as_str(), description.as_str(), &policy, origin);
        }
    }
    Ok(())
}

fn label_patterns() -> Result<(&'static Regex, &'static Regex), ExtractorError> {
    static PATTERNS: OnceLock<Result<(Regex, Regex), String>> = OnceLock::new();
    let compiled = PATTERNS.get_or_init(|| {
        let name = Regex::new(NAME_LABEL).map_err(|e| e.to_string())?;
        let description = Regex::new(DESCRIPTION_LABEL).map_err(|e| e.to_string())?;
        Ok((name, description))
    });
    match compiled {
        Ok((name, description)) => Ok((name, description)),
        Err(e) => Err(ExtractorError::Html(e.clone())),
    }
}

/// Trimmed text nodes of a cell joined with single spaces
fn cell_text(cell: &ElementRef<'_>) -> String {
    cell.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Rendered text of the document, one text node per line
fn visible_text(html: &Html) -> String {
    let mut lines = Vec::new();
    for node in html.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .filter_map(|a| a.value().as_element().map(|e| e.name()))
            .any(|name| HIDDEN_ELEMENTS.contains(&name));
        if hidden {
            continue;
        }
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            lines.push(trimmed);
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractorConfig;
    use crate::templates::TemplateSet;
    use codebook_domain::DocumentFormat;
    use codebook_gatekeeper::Gatekeeper;
    use codebook_taxonomy::Taxonomy;

    fn run(html: &str) -> DocumentExtraction {
        let taxonomy = Taxonomy::default_taxonomy().unwrap();
        let gatekeeper = Gatekeeper::default_config();
        let config = ExtractorConfig::default();
        let templates = TemplateSet::compile(&config.text_templates).unwrap();
        let ctx = Context {
            taxonomy: &taxonomy,
            gatekeeper: &gatekeeper,
            templates: &templates,
            config: &config,
        };
        let document = DocumentHandle::inline("codebook.html", DocumentFormat::Html, html);
        HtmlExtractor.extract(&ctx, &document, html.as_bytes()).unwrap()
    }

    #[test]
    fn test_table_rows() {
        let extraction = run(
            "<table>
               <tr><th>Name</th><th>Label</th></tr>
               <tr><td>SEXORIEN</td><td>Sexual orientation of respondent</td></tr>
               <tr><td>AGE</td><td><b>Age</b> in   years</td></tr>
               <tr><td>ONLY_ONE</td></tr>
             </table>",
        );

        let names: Vec<_> = extraction.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["SEXORIEN", "AGE"]);
        assert_eq!(extraction.records[0].source_type, SourceType::Html);
        assert_eq!(extraction.records[1].description, "Age in years");
        // "Name" fails the identifier grammar as extracted
        assert_eq!(extraction.rejected, 1);
    }

    #[test]
    fn test_table_names_not_uppercased() {
        let extraction = run("<table><tr><td>sexorien</td><td>Sexual orientation</td></tr></table>");
        assert!(extraction.records.is_empty());
    }

    #[test]
    fn test_table_short_description_rejected() {
        let extraction = run("<table><tr><td>AGE</td><td>Age</td></tr></table>");
        assert!(extraction.records.is_empty());
        assert_eq!(extraction.rejected, 1);
    }

    #[test]
    fn test_table_tags_category() {
        let extraction = run("<table><tr><td>SEXORIEN</td><td>Sexual orientation of respondent</td></tr></table>");
        let record = &extraction.records[0];
        assert_eq!(record.category.as_deref(), Some("sexual_orientation"));
        assert_eq!(record.match_type, MatchType::Keyword);
    }

    #[test]
    fn test_labelled_text() {
        let extraction = run(
            "<body>
               <p><b>SAS Variable Name:</b> trnsgndr</p>
               <p>Question: Do you consider yourself to be transgender?</p>
               <p>Variable Name: NOLABEL</p>
               <p>Variable: income2</p>
               <p>Label: Annual household income</p>
               <script>var x = 'Variable Name: HIDDEN Label: nope';</script>
             </body>",
        );

        let names: Vec<_> = extraction.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["TRNSGNDR", "INCOME2"]);
        assert_eq!(extraction.records[0].source_type, SourceType::HtmlText);
        assert_eq!(
            extraction.records[0].description,
            "Do you consider yourself to be transgender?"
        );
        assert_eq!(extraction.records[1].description, "Annual household income");
    }

    #[test]
    fn test_tables_precede_labelled_text() {
        let extraction = run(
            "<p>Variable Name: MARITAL</p><p>Description: Marital status</p>
             <table><tr><td>SEX</td><td>Sex of respondent</td></tr></table>",
        );
        let names: Vec<_> = extraction.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["SEX", "MARITAL"]);
    }
}
