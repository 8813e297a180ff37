//! CSV codebooks: keyword scan over cells, one hit per row

use crate::error::ExtractorError;
use crate::format::{Collector, Context, FormatExtractor, Origin};
use codebook_domain::{
    DocumentExtraction, DocumentHandle, HitLocation, KeywordHit, MatchType, SourceType,
};
use codebook_gatekeeper::AdmissionPolicy;
use csv::{ByteRecord, ReaderBuilder};

pub(crate) struct CsvExtractor;

impl FormatExtractor for CsvExtractor {
    fn extract(
        &self,
        ctx: &Context<'_>,
        document: &DocumentHandle,
        bytes: &[u8],
    ) -> Result<DocumentExtraction, ExtractorError> {
        let mut collector = Collector::new(ctx, &document.source_id);
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = decode(reader.byte_headers()?);
        if headers.iter().all(|h| h.trim().is_empty()) {
            collector.warn("file is empty or has no header row".to_string());
            return Ok(collector.finish());
        }

        let scope = column_scope(&headers, document.columns.as_deref());
        if scope.is_empty() {
            collector.warn("none of the requested columns are present".to_string());
        }
        let name_column = name_column(&headers, &ctx.config.csv_name_columns);
        let policy = AdmissionPolicy::as_extracted(1);

        let mut record = ByteRecord::new();
        let mut index = 0usize;
        while reader.read_byte_record(&mut record)? {
            index += 1;
            // header is row 1
            let row_number = u32::try_from(index + 1).unwrap_or(u32::MAX);

            if record.len() != headers.len() {
                collector.warn(format!(
                    "row {}: expected {} cells, found {}; row skipped",
                    row_number,
                    headers.len(),
                    record.len()
                ));
                continue;
            }

            let cells = decode(&record);
            scan_row(&mut collector, &headers, &cells, &scope, name_column, row_number, &policy);
        }

        Ok(collector.finish())
    }
}

fn scan_row(
    collector: &mut Collector<'_, '_>,
    headers: &[String],
    cells: &[String],
    scope: &[usize],
    name_column: Option<usize>,
    row_number: u32,
    policy: &AdmissionPolicy,
) {
    let taxonomy = collector.context().taxonomy;

    for &column in scope {
        let value = cells[column].trim();
        let Some(keyword) = taxonomy.find_keyword(value) else {
            continue;
        };

        let row_context = headers
            .iter()
            .cloned()
            .zip(cells.iter().map(|c| c.trim().to_string()))
            .collect();
        let source_file = collector.source_id().to_string();
        collector.hit(KeywordHit {
            source_file,
            location: HitLocation::Row {
                number: row_number,
                column: headers[column].clone(),
            },
            keyword: keyword.to_string(),
            content: value.to_string(),
            row_context,
        });

        if let Some(name) = name_column.map(|i| cells[i].trim()) {
            let origin = Origin::new(SourceType::Csv, MatchType::Keyword).on_line(row_number);
            collector.admit(name, value, policy, origin);
        }
        // one hit per row
        break;
    }
}

/// Column indices to scan, in header order
fn column_scope(headers: &[String], requested: Option<&[String]>) -> Vec<usize> {
    match requested {
        None => (0..headers.len()).collect(),
        Some(requested) => headers
            .iter()
            .enumerate()
            .filter(|(_, h)| requested.iter().any(|r| r == h.trim()))
            .map(|(i, _)| i)
            .collect(),
    }
}

/// First configured name column present in the header, case-insensitively
fn name_column(headers: &[String], candidates: &[String]) -> Option<usize> {
    candidates.iter().find_map(|candidate| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(candidate.trim()))
    })
}

fn decode(record: &ByteRecord) -> Vec<String> {
    record
        .iter()
        .map(|field| String::from_utf8_lossy(field).into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractorConfig;
    use crate::templates::TemplateSet;
    use codebook_domain::DocumentFormat;
    use codebook_gatekeeper::Gatekeeper;
    use codebook_taxonomy::Taxonomy;

    fn run(document: DocumentHandle) -> DocumentExtraction {
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
        let bytes = match &document.body {
            codebook_domain::DocumentBody::Inline(bytes) => bytes.clone(),
            codebook_domain::DocumentBody::Path(_) => unreachable!(),
        };
        CsvExtractor.extract(&ctx, &document, &bytes).unwrap()
    }

    fn csv(content: &str) -> DocumentHandle {
        DocumentHandle::inline("codebook.csv", DocumentFormat::Csv, content)
    }

    #[test]
    fn test_one_hit_per_row_with_context() {
        let extraction = run(csv(
            "Variable Name,Label,Notes\n\
             SEXVAR,Sex of respondent,male or female\n\
             INCOME2,Household income,none\n",
        ));

        assert_eq!(extraction.hits.len(), 1);
        let hit = &extraction.hits[0];
        assert_eq!(
            hit.location,
            HitLocation::Row {
                number: 2,
                column: "Variable Name".to_string()
            }
        );
        assert_eq!(hit.keyword, "sexvar");
        assert_eq!(hit.row_context.len(), 3);
        assert_eq!(hit.row_context[2], ("Notes".to_string(), "male or female".to_string()));
    }

    #[test]
    fn test_record_from_name_column() {
        let extraction = run(csv(
            "name,label\n\
             SEXVAR,Sex of respondent\n",
        ));

        // first matching cell is the name itself
        assert_eq!(extraction.records.len(), 1);
        let record = &extraction.records[0];
        assert_eq!(record.name, "SEXVAR");
        assert_eq!(record.description, "SEXVAR");
        assert_eq!(record.line, Some(2));
        assert_eq!(record.source_type, SourceType::Csv);
    }

    #[test]
    fn test_column_scope() {
        let document = csv(
            "VARIABLE,Description\n\
             SEXVAR,Sex of respondent\n",
        )
        .with_columns(vec!["Description".to_string()]);
        let extraction = run(document);

        assert_eq!(extraction.hits.len(), 1);
        assert_eq!(extraction.hits[0].content, "Sex of respondent");
        assert_eq!(extraction.records[0].name, "SEXVAR");
        assert_eq!(extraction.records[0].description, "Sex of respondent");
    }

    #[test]
    fn test_lowercase_names_not_admitted() {
        let extraction = run(csv("variable,label\nsexvar,Sex of respondent\n"));
        assert_eq!(extraction.hits.len(), 1);
        assert!(extraction.records.is_empty());
        assert_eq!(extraction.rejected, 1);
    }

    #[test]
    fn test_malformed_row_skipped_with_warning() {
        let good = "variable,label\nSEXVAR,Sex of respondent\nTRNSGNDR,Transgender identity\n";
        let bad = "variable,label\nSEXVAR,Sex of respondent\nBROKEN,too,many\nTRNSGNDR,Transgender identity\n";

        let clean = run(csv(good));
        let dirty = run(csv(bad));

        let content = |e: &DocumentExtraction| -> Vec<(String, String)> {
            e.records.iter().map(|r| (r.name.clone(), r.description.clone())).collect()
        };
        assert_eq!(content(&dirty), content(&clean));
        assert_eq!(content(&dirty).len(), 2);
        assert_eq!(dirty.hits.len(), clean.hits.len());

        // rows keep their physical numbers across the skipped row
        assert_eq!(clean.records[1].line, Some(3));
        assert_eq!(dirty.records[1].line, Some(4));

        assert_eq!(dirty.warnings.len(), 1);
        assert!(dirty.warnings[0].contains("row 3"));
    }

    #[test]
    fn test_empty_file_warns() {
        let extraction = run(csv(""));
        assert!(extraction.hits.is_empty());
        assert_eq!(extraction.warnings.len(), 1);
    }

    #[test]
    fn test_name_column_priority() {
        let headers: Vec<String> = ["name", "SAS Variable", "Label"].iter().map(|s| s.to_string()).collect();
        let config = ExtractorConfig::default();
        assert_eq!(name_column(&headers, &config.csv_name_columns), Some(1));
    }
}
