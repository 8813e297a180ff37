//! PDF codebooks: column-aligned table lines, then free-text templates

use crate::error::ExtractorError;
use crate::format::{Collector, Context, FormatExtractor, Origin};
use codebook_domain::{DocumentExtraction, DocumentHandle, MatchType, SourceType};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId};
use regex::Regex;
use std::collections::BTreeMap;
use tracing::debug;

/// Baselines closer than this are treated as the same row
const BASELINE_TOLERANCE: f32 = 0.5;

/// Kerning offsets in a `TJ` array below this read as a word space
const TJ_SPACE_OFFSET: f32 = -100.0;

/// Text of one PDF page
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PageText {
    pub number: u32,
    pub text: String,
}

pub(crate) struct PdfExtractor;

impl FormatExtractor for PdfExtractor {
    fn extract(
        &self,
        ctx: &Context<'_>,
        document: &DocumentHandle,
        bytes: &[u8],
    ) -> Result<DocumentExtraction, ExtractorError> {
        let pdf = Document::load_mem(bytes).map_err(|e| ExtractorError::Pdf(e.to_string()))?;

        let mut pages = Vec::new();
        let mut warnings = Vec::new();
        for (page_number, page_id) in pdf.get_pages() {
            match page_text(&pdf, page_id) {
                Ok(text) => pages.push(PageText { number: page_number, text }),
                Err(e) => warnings.push(format!("page {}: text extraction failed: {}", page_number, e)),
            }
        }
        debug!("{}: {} pages with text", document.source_id, pages.len());

        let mut collector = Collector::new(ctx, &document.source_id);
        for warning in warnings {
            collector.warn(warning);
        }
        extract_pages(&pages, &mut collector)?;
        Ok(collector.finish())
    }
}

/// Text of one page with a line break wherever the baseline moves
fn page_text(pdf: &Document, page_id: ObjectId) -> Result<String, lopdf::Error> {
    let encodings: BTreeMap<Vec<u8>, &str> = pdf
        .get_page_fonts(page_id)
        .into_iter()
        .map(|(name, font)| (name, font.get_font_encoding()))
        .collect();
    let content = Content::decode(&pdf.get_page_content(page_id)?)?;
    Ok(lay_out(&content.operations, &encodings))
}

/// Rebuilds text lines from content-stream operations.
///
/// Text shown on a new baseline starts a new line. Text moved along the
/// same baseline, like a cell in the next column, is separated by a tab.
fn lay_out(operations: &[Operation], encodings: &BTreeMap<Vec<u8>, &str>) -> String {
    let mut layout = Layout::default();
    for operation in operations {
        let operands = &operation.operands;
        match operation.operator.as_str() {
            "Tf" => {
                layout.encoding = operands
                    .first()
                    .and_then(|font| font.as_name().ok())
                    .and_then(|name| encodings.get(name).copied());
            }
            "BT" => layout.move_to(Some(0.0)),
            "Tm" => layout.move_to(operand(operands, 5)),
            "Td" | "TD" => {
                let dy = operand(operands, 1).unwrap_or(0.0);
                layout.move_to(layout.cursor_y.map(|y| y + dy));
            }
            "T*" => layout.next_line(),
            "Tj" | "TJ" => layout.show(operands),
            "'" | "\"" => {
                layout.next_line();
                layout.show(operands.last().map(std::slice::from_ref).unwrap_or_default());
            }
            _ => {}
        }
    }
    layout.text
}

fn operand(operands: &[Object], index: usize) -> Option<f32> {
    operands.get(index).and_then(|o| o.as_float().ok())
}

#[derive(Default)]
struct Layout<'e> {
    text: String,
    encoding: Option<&'e str>,
    /// Baseline of the text matrix; `None` once it can no longer be tracked
    cursor_y: Option<f32>,
    /// Baseline of the last shown text
    line_y: Option<f32>,
    moved: bool,
    line_break: bool,
}

impl Layout<'_> {
    fn move_to(&mut self, y: Option<f32>) {
        self.cursor_y = y;
        self.moved = true;
    }

    fn next_line(&mut self) {
        self.cursor_y = None;
        self.line_break = true;
    }

    fn show(&mut self, operands: &[Object]) {
        let mut shown = String::new();
        self.collect(operands, &mut shown);
        if shown.is_empty() {
            return;
        }

        if !self.text.is_empty() && !self.text.ends_with('\n') {
            let same_baseline = match (self.line_y, self.cursor_y) {
                (Some(line), Some(cursor)) => (line - cursor).abs() < BASELINE_TOLERANCE,
                _ => false,
            };
            if self.line_break || !same_baseline {
                self.text.push('\n');
            } else if self.moved {
                self.text.push('\t');
            }
        }
        self.text.push_str(&shown);
        self.line_y = self.cursor_y;
        self.moved = false;
        self.line_break = false;
    }

    fn collect(&self, operands: &[Object], out: &mut String) {
        for operand in operands {
            match operand {
                Object::String(bytes, _) => out.push_str(&Document::decode_text(self.encoding, bytes)),
                Object::Array(items) => self.collect(items, out),
                Object::Integer(_) | Object::Real(_) => {
                    if operand.as_float().is_ok_and(|offset| offset < TJ_SPACE_OFFSET) {
                        out.push(' ');
                    }
                }
                _ => {}
            }
        }
    }
}

/// Table pass over every page, then the template pass over every page
pub(crate) fn extract_pages(pages: &[PageText], collector: &mut Collector<'_, '_>) -> Result<(), ExtractorError> {
    let ctx = collector.context();
    let splitter = cell_splitter(ctx.config.pdf_cell_gap)?;
    let policy = ctx.gatekeeper.table_policy();

    for page in pages {
        let origin = Origin::new(SourceType::PdfTable, MatchType::Table).on_page(page.number);
        for line in page.text.lines() {
            let cells: Vec<&str> = splitter
                .split(line.trim())
                .filter(|cell| !cell.is_empty())
                .collect();
            if cells.len() >= 2 {
                collector.admit(cells[0], cells[1], &policy, origin);
            }
        }
    }

    for page in pages {
        collector.admit_templates(&page.text, SourceType::PdfText, Some(page.number));
    }
    Ok(())
}

/// Cells are separated by tabs or runs of at least `gap` spaces
fn cell_splitter(gap: usize) -> Result<Regex, ExtractorError> {
    Regex::new(&format!(r"\t+| {{{},}}", gap)).map_err(|e| ExtractorError::Config(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractorConfig;
    use crate::templates::TemplateSet;
    use codebook_gatekeeper::Gatekeeper;
    use codebook_taxonomy::Taxonomy;

    fn run(pages: &[PageText]) -> DocumentExtraction {
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
        let mut collector = Collector::new(&ctx, "codebook.pdf");
        extract_pages(pages, &mut collector).unwrap();
        collector.finish()
    }

    fn page(number: u32, text: &str) -> PageText {
        PageText {
            number,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_cell_splitter() {
        let splitter = cell_splitter(2).unwrap();
        let cells: Vec<_> = splitter.split("AGE  Age of respondent\tNUM").collect();
        assert_eq!(cells, vec!["AGE", "Age of respondent", "NUM"]);
    }

    #[test]
    fn test_table_lines_tagged_with_page() {
        let extraction = run(&[
            page(1, "Variable    Description\nMARITAL    Marital status of respondent"),
            page(2, "INCOME2\tAnnual household income"),
        ]);

        let tables: Vec<_> = extraction
            .records
            .iter()
            .filter(|r| r.source_type == SourceType::PdfTable)
            .collect();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].name, "MARITAL");
        assert_eq!(tables[0].page, Some(1));
        assert_eq!(tables[1].name, "INCOME2");
        assert_eq!(tables[1].page, Some(2));
    }

    #[test]
    fn test_single_spaces_do_not_split() {
        let extraction = run(&[page(1, "MARITAL Marital status of respondent")]);
        assert!(extraction
            .records
            .iter()
            .all(|r| r.source_type != SourceType::PdfTable));
    }

    #[test]
    fn test_tables_before_templates_across_pages() {
        let extraction = run(&[
            page(1, "SXORIENT: Which of the following best represents how you think of yourself?"),
            page(2, "AGE    Age of the respondent in years"),
        ]);

        let order: Vec<_> = extraction
            .records
            .iter()
            .map(|r| (r.name.as_str(), r.source_type))
            .collect();
        assert_eq!(order[0], ("AGE", SourceType::PdfTable));
        assert!(order.contains(&("SXORIENT", SourceType::PdfText)));
        let sxorient = extraction.records.iter().find(|r| r.name == "SXORIENT").unwrap();
        assert_eq!(sxorient.page, Some(1));
        assert_eq!(sxorient.match_type, MatchType::VariablePattern);
        assert_eq!(sxorient.category.as_deref(), Some(codebook_domain::PATTERN_MATCH_CATEGORY));
    }

    #[test]
    fn test_noise_rejected_in_templates() {
        let extraction = run(&[page(3, "SXORIENT: Hidden question, go to section 4")]);
        assert!(extraction
            .records
            .iter()
            .all(|r| r.source_type != SourceType::PdfText));
        assert!(extraction.rejected > 0);
    }

    fn ops(operations: Vec<Operation>) -> String {
        lay_out(&operations, &BTreeMap::new())
    }

    fn show(text: &str) -> Operation {
        Operation::new("Tj", vec![Object::string_literal(text)])
    }

    fn move_by(x: i64, y: i64) -> Operation {
        Operation::new("Td", vec![x.into(), y.into()])
    }

    /// One-page PDF whose content stream is `operations`
    fn build_pdf(operations: Vec<Operation>) -> Vec<u8> {
        use lopdf::{dictionary, Stream};

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_layout_breaks_on_new_baseline() {
        let text = ops(vec![
            Operation::new("BT", vec![]),
            move_by(50, 700),
            show("SEXORIEN    Sexual orientation of respondent"),
            move_by(0, -14),
            show("MARITAL    Marital status of respondent"),
            Operation::new("T*", vec![]),
            show("INCOME2    Annual household income"),
            Operation::new("ET", vec![]),
        ]);

        assert_eq!(
            text,
            "SEXORIEN    Sexual orientation of respondent\n\
             MARITAL    Marital status of respondent\n\
             INCOME2    Annual household income"
        );
    }

    #[test]
    fn test_layout_joins_cells_on_same_baseline() {
        let text = ops(vec![
            Operation::new("BT", vec![]),
            move_by(50, 700),
            show("AGE"),
            Operation::new("ET", vec![]),
            Operation::new("BT", vec![]),
            move_by(150, 700),
            show("Age of respondent"),
            Operation::new("ET", vec![]),
            Operation::new("BT", vec![]),
            Operation::new("Tm", vec![1.into(), 0.into(), 0.into(), 1.into(), 50.into(), 686.into()]),
            show("SEX"),
            Operation::new("Tm", vec![1.into(), 0.into(), 0.into(), 1.into(), 150.into(), 686.into()]),
            Operation::new(
                "TJ",
                vec![Object::Array(vec![
                    Object::string_literal("Sex"),
                    (-250).into(),
                    Object::string_literal("of respondent"),
                ])],
            ),
            Operation::new("ET", vec![]),
        ]);

        assert_eq!(text, "AGE\tAge of respondent\nSEX\tSex of respondent");
    }

    #[test]
    fn test_rows_in_one_text_block_stay_separate() {
        let bytes = build_pdf(vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 10.into()]),
            move_by(50, 700),
            show("SEXORIEN    Sexual orientation of respondent"),
            move_by(0, -14),
            show("MARITAL    Marital status of respondent"),
            Operation::new("ET", vec![]),
        ]);

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
        let document = DocumentHandle::inline("codebook.pdf", codebook_domain::DocumentFormat::Pdf, bytes.clone());
        let extraction = PdfExtractor.extract(&ctx, &document, &bytes).unwrap();

        let tables: Vec<_> = extraction
            .records
            .iter()
            .filter(|r| r.source_type == SourceType::PdfTable)
            .map(|r| (r.name.as_str(), r.description.as_str(), r.page))
            .collect();
        assert_eq!(
            tables,
            vec![
                ("SEXORIEN", "Sexual orientation of respondent", Some(1)),
                ("MARITAL", "Marital status of respondent", Some(1)),
            ]
        );
        assert!(extraction.warnings.is_empty());
    }

    #[test]
    fn test_invalid_pdf_is_fatal() {
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
        let document = DocumentHandle::inline("broken.pdf", codebook_domain::DocumentFormat::Pdf, "not a pdf");
        let result = PdfExtractor.extract(&ctx, &document, b"not a pdf");
        assert!(matches!(result, Err(ExtractorError::Pdf(_))));
    }
}
