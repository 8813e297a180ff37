//! Integration tests for the Extractor

#[cfg(test)]
mod tests {
    use crate::extractor::isolate;
    use crate::{CodebookExtractor, ExtractorConfig, ExtractorError, TextTemplate};
    use codebook_domain::{DocumentFormat, DocumentHandle, Extractor, SourceType};
    use codebook_gatekeeper::Gatekeeper;
    use codebook_taxonomy::Taxonomy;
    use std::io::Write;
    use std::sync::Arc;

    const HTML: &str = "<table><tr><td>SEXORIEN</td><td>Sexual orientation of respondent</td></tr>\
                        <tr><td>AGE</td><td>Age of respondent</td></tr></table>";
    const CSV: &str = "Variable,Notes\nDEPRESS,patient reports feeling depressed\nTRNSGNDR,transgender identity\n";
    const TEXT: &str = "SEX: Sex of respondent\nAre you gay?\n";

    fn batch() -> Vec<DocumentHandle> {
        vec![
            DocumentHandle::inline("codebook.html", DocumentFormat::Html, HTML),
            DocumentHandle::inline("missing.pdf", DocumentFormat::Pdf, "definitely not a pdf"),
            DocumentHandle::inline("notes.csv", DocumentFormat::Csv, CSV),
            DocumentHandle::inline("codebook.txt", DocumentFormat::Text, TEXT),
        ]
    }

    #[test]
    fn test_batch_isolates_failures() {
        let extractor = CodebookExtractor::with_defaults().unwrap();
        let result = extractor.extract_all(&batch());

        assert_eq!(result.metadata.documents_supplied, 4);
        assert_eq!(result.metadata.documents_extracted, 3);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].source_id, "missing.pdf");
        assert!(result.failures[0].reason.contains("PDF"));

        let sources: Vec<_> = result.documents.iter().map(|d| d.source_id.as_str()).collect();
        assert_eq!(sources, vec!["codebook.html", "notes.csv", "codebook.txt"]);
    }

    #[test]
    fn test_records_concatenate_in_input_order() {
        let extractor = CodebookExtractor::with_defaults().unwrap();
        let result = extractor.extract_all(&batch());

        let names: Vec<_> = result.records().map(|r| r.name.as_str()).collect();
        assert_eq!(&names[..2], &["SEXORIEN", "AGE"]);
        assert!(names.contains(&"TRNSGNDR"));
        assert!(names.contains(&"SEX"));
        assert_eq!(result.metadata.records_found, names.len());
        assert_eq!(result.metadata.hits_found, result.hits().count());
    }

    #[test]
    fn test_csv_hit_without_keyword_in_name() {
        let extractor = CodebookExtractor::with_defaults().unwrap();
        let document = DocumentHandle::inline("notes.csv", DocumentFormat::Csv, CSV);
        let extraction = extractor.extract_document(&document).unwrap();

        // "depressed" is not a scan keyword; only the transgender row hits
        assert_eq!(extraction.hits.len(), 1);
        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.records[0].name, "TRNSGNDR");
        assert_eq!(extraction.records[0].source_type, SourceType::Csv);
    }

    #[test]
    fn test_reads_documents_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".html").tempfile().unwrap();
        file.write_all(HTML.as_bytes()).unwrap();

        let document = DocumentHandle::detect(file.path()).unwrap();
        let extractor = CodebookExtractor::with_defaults().unwrap();
        let extraction = extractor.extract(&document).unwrap();

        assert_eq!(extraction.records.len(), 2);
        assert!(extraction.records[0].source_file.ends_with(".html"));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let document = DocumentHandle::from_path(dir.path().join("gone.csv"), DocumentFormat::Csv);
        let extractor = CodebookExtractor::with_defaults().unwrap();

        let result = extractor.extract_document(&document);
        assert!(matches!(result, Err(ExtractorError::Read { .. })));
    }

    #[test]
    fn test_document_too_large() {
        let config = ExtractorConfig {
            max_document_bytes: 16,
            ..Default::default()
        };
        let extractor = CodebookExtractor::new(
            Taxonomy::default_taxonomy().unwrap(),
            Gatekeeper::default_config(),
            config,
        )
        .unwrap();
        let document = DocumentHandle::inline("big.txt", DocumentFormat::Text, "x".repeat(17));

        let result = extractor.extract_document(&document);
        assert!(matches!(result, Err(ExtractorError::DocumentTooLarge(17, 16))));
    }

    #[test]
    fn test_invalid_template_rejected_at_construction() {
        let config = ExtractorConfig {
            text_templates: vec![TextTemplate::new("broken", "(")],
            ..Default::default()
        };
        let result = CodebookExtractor::new(
            Taxonomy::default_taxonomy().unwrap(),
            Gatekeeper::default_config(),
            config,
        );
        assert!(matches!(result, Err(ExtractorError::Template { .. })));
    }

    #[test]
    fn test_no_variables_found_is_not_an_error() {
        let extractor = CodebookExtractor::with_defaults().unwrap();
        let documents = vec![DocumentHandle::inline("empty.txt", DocumentFormat::Text, "nothing to see\n")];
        let result = extractor.extract_all(&documents);

        assert!(result.failures.is_empty());
        assert!(result.is_empty());
        assert_eq!(result.into_records(), Vec::new());
    }

    #[test]
    fn test_deterministic() {
        let extractor = CodebookExtractor::with_defaults().unwrap();
        let first = extractor.extract_all(&batch());
        let second = extractor.extract_all(&batch());
        assert_eq!(first.documents, second.documents);
        assert_eq!(first.failures, second.failures);
    }

    #[tokio::test]
    async fn test_concurrent_matches_sequential() {
        let extractor = Arc::new(CodebookExtractor::with_defaults().unwrap());
        let sequential = extractor.extract_all(&batch());
        let concurrent = Arc::clone(&extractor).extract_all_concurrent(batch()).await;

        assert_eq!(concurrent.documents, sequential.documents);
        assert_eq!(concurrent.failures, sequential.failures);
        assert_eq!(concurrent.metadata.records_found, sequential.metadata.records_found);
    }

    #[test]
    fn test_panic_becomes_document_error() {
        let result: Result<(), ExtractorError> = isolate(|| panic!("malformed xref in {}", "bad.pdf"));
        match result {
            Err(ExtractorError::Panicked(message)) => assert_eq!(message, "malformed xref in bad.pdf"),
            other => panic!("expected Panicked, got {:?}", other),
        }

        let result = isolate(|| Ok::<_, ExtractorError>(7));
        assert_eq!(result.unwrap(), 7);
    }
}
