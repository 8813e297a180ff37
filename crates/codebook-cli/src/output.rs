//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::{CliError, Result};
use codebook_domain::{HitLocation, KeywordHit, VariableRecord};
use codebook_ranker::CategorySummary;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Widest description shown in table output
const DESCRIPTION_WIDTH: usize = 60;

/// Scores at or above this are highlighted as strong matches
const STRONG_SCORE: u32 = 15;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Active output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format ranked records.
    pub fn format_records(&self, records: &[VariableRecord]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
            OutputFormat::Table => Ok(self.format_records_table(records)),
            OutputFormat::Csv => format_records_csv(records),
            OutputFormat::Quiet => Ok(records
                .iter()
                .map(|r| r.name.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format records as a table.
    fn format_records_table(&self, records: &[VariableRecord]) -> String {
        if records.is_empty() {
            return self.colorize("No variables found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "Name", "Score", "Category", "Source", "Location", "Description", "Reasons"]);

        for (rank, record) in records.iter().enumerate() {
            builder.push_record([
                (rank + 1).to_string(),
                record.name.clone(),
                self.score_cell(record.score()),
                record.category.clone().unwrap_or_default(),
                format!("{} ({})", record.source_file, record.source_type),
                location(record),
                truncate(&record.description, DESCRIPTION_WIDTH),
                record.reasons.join(", "),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format keyword hits.
    pub fn format_hits(&self, hits: &[&KeywordHit]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(hits)?),
            OutputFormat::Csv => format_hits_csv(hits),
            OutputFormat::Quiet => Ok(hits
                .iter()
                .map(|h| format!("{}:{}", h.source_file, hit_location(&h.location)))
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if hits.is_empty() {
                    return Ok(self.colorize("No keyword hits.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Source", "Location", "Keyword", "Content"]);
                for hit in hits {
                    builder.push_record([
                        hit.source_file.clone(),
                        hit_location(&hit.location),
                        self.colorize(&hit.keyword, "cyan"),
                        truncate(&hit.content, DESCRIPTION_WIDTH),
                    ]);
                }
                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
        }
    }

    /// Format the category summary.
    pub fn format_summary(&self, summary: &CategorySummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(summary)?),
            _ => Ok(summary.summary()),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn score_cell(&self, score: u32) -> String {
        let text = score.to_string();
        if !self.color_enabled {
            return text;
        }
        match score {
            0 => text.dimmed().to_string(),
            s if s >= STRONG_SCORE => text.green().bold().to_string(),
            _ => text.yellow().to_string(),
        }
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn format_records_csv(records: &[VariableRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "rank", "name", "score", "category", "match_type", "source_file", "source_type", "page", "line",
        "description", "reasons",
    ])?;
    for (rank, record) in records.iter().enumerate() {
        writer.write_record([
            (rank + 1).to_string(),
            record.name.clone(),
            record.score().to_string(),
            record.category.clone().unwrap_or_default(),
            record.match_type.to_string(),
            record.source_file.clone(),
            record.source_type.to_string(),
            record.page.map(|p| p.to_string()).unwrap_or_default(),
            record.line.map(|l| l.to_string()).unwrap_or_default(),
            record.description.clone(),
            record.reasons.join(";"),
        ])?;
    }
    finish_csv(writer)
}

fn format_hits_csv(hits: &[&KeywordHit]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["source_file", "location", "keyword", "content"])?;
    for hit in hits {
        writer.write_record([
            hit.source_file.as_str(),
            hit_location(&hit.location).as_str(),
            hit.keyword.as_str(),
            hit.content.as_str(),
        ])?;
    }
    finish_csv(writer)
}

fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer.into_inner().map_err(|e| CliError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| CliError::InvalidInput(e.to_string()))
}

fn location(record: &VariableRecord) -> String {
    match (record.page, record.line) {
        (Some(page), _) => format!("p. {}", page),
        (None, Some(line)) => format!("line {}", line),
        (None, None) => String::new(),
    }
}

fn hit_location(location: &HitLocation) -> String {
    match location {
        HitLocation::Line { number } => format!("line {}", number),
        HitLocation::Row { number, column } => format!("row {} [{}]", number, column),
    }
}

/// Shorten to `width` characters, marking the cut with an ellipsis
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use codebook_domain::{MatchType, SourceType};

    fn scored_record() -> VariableRecord {
        let mut record = VariableRecord::new(
            "SEXORIEN",
            "Sexual orientation of respondent",
            "codebook.html",
            SourceType::Html,
            MatchType::Keyword,
        )
        .unwrap()
        .with_page(3);
        record
            .set_score(21, vec!["direct_topic_indicator".into(), "identifier_pattern".into()])
            .unwrap();
        record
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_records(&[scored_record()]).unwrap();
        assert!(output.contains("\"relevance_score\": 21"));
        assert!(output.contains("\"source_type\": \"html\""));
    }

    #[test]
    fn test_quiet_format() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_records(&[scored_record()]).unwrap();
        assert_eq!(output, "SEXORIEN");
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_records(&[scored_record()]).unwrap();
        assert!(output.contains("Score"));
        assert!(output.contains("SEXORIEN"));
        assert!(output.contains("p. 3"));
    }

    #[test]
    fn test_csv_format() {
        let formatter = Formatter::new(OutputFormat::Csv, false);
        let output = formatter.format_records(&[scored_record()]).unwrap();
        let mut lines = output.lines();
        assert!(lines.next().unwrap().starts_with("rank,name,score"));
        assert!(lines
            .next()
            .unwrap()
            .starts_with("1,SEXORIEN,21,,keyword,codebook.html,html,3,"));
    }

    #[test]
    fn test_empty_records() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_records(&[]).unwrap();
        assert!(output.contains("No variables found"));
    }

    #[test]
    fn test_hit_table() {
        let hit = KeywordHit {
            source_file: "notes.csv".to_string(),
            location: HitLocation::Row {
                number: 4,
                column: "Notes".to_string(),
            },
            keyword: "gay".to_string(),
            content: "gay or lesbian".to_string(),
            row_context: Vec::new(),
        };
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_hits(&[&hit]).unwrap();
        assert!(output.contains("row 4 [Notes]"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
    }
}
