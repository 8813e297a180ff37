//! Plain-text codebooks: free-text templates, then a keyword line scan

use crate::error::ExtractorError;
use crate::format::{Collector, Context, FormatExtractor, Origin};
use codebook_domain::{
    DocumentExtraction, DocumentHandle, HitLocation, KeywordHit, MatchType, SourceType,
};
use codebook_gatekeeper::AdmissionPolicy;

pub(crate) struct TextExtractor;

impl FormatExtractor for TextExtractor {
    fn extract(
        &self,
        ctx: &Context<'_>,
        document: &DocumentHandle,
        bytes: &[u8],
    ) -> Result<DocumentExtraction, ExtractorError> {
        let text = String::from_utf8_lossy(bytes);
        let mut collector = Collector::new(ctx, &document.source_id);

        collector.admit_templates(&text, SourceType::Text, None);
        scan_lines(&text, &mut collector);

        Ok(collector.finish())
    }
}

fn scan_lines(text: &str, collector: &mut Collector<'_, '_>) {
    let taxonomy = collector.context().taxonomy;
    let policy = AdmissionPolicy::free_text(1);

    for (index, line) in text.lines().enumerate() {
        let number = u32::try_from(index + 1).unwrap_or(u32::MAX);
        let Some(keyword) = taxonomy.find_keyword(line) else {
            continue;
        };

        let content = line.trim();
        let source_file = collector.source_id().to_string();
        collector.hit(KeywordHit {
            source_file,
            location: HitLocation::Line { number },
            keyword: keyword.to_string(),
            content: content.to_string(),
            row_context: Vec::new(),
        });

        if let Some((name, description)) = split_leading_token(content) {
            let origin = Origin::new(SourceType::Text, MatchType::Keyword).on_line(number);
            collector.admit(name, description, &policy, origin);
        }
    }
}

/// Split `NAME: rest of line` into the token and its remainder.
///
/// Only a token written in capitals or followed by `:` or `=` names a
/// variable; ordinary question text yields nothing.
fn split_leading_token(line: &str) -> Option<(&str, &str)> {
    let (token, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let name = token.trim_end_matches([':', '.', '-', '=']);
    let separated = token.ends_with([':', '=']) || rest.trim_start().starts_with([':', '=']);
    let capitals = name.chars().any(|c| c.is_ascii_uppercase()) && !name.chars().any(char::is_lowercase);
    let description = rest.trim_start_matches(|c: char| c.is_whitespace() || matches!(c, ':' | '-' | '='));

    if name.is_empty() || description.trim().is_empty() || !(separated || capitals) {
        return None;
    }
    Some((name, description))
}
