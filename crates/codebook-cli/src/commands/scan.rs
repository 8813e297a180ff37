//! Scan command implementation.

use crate::cli::ScanArgs;
use crate::config::{MinerConfig, OutputFormat};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::pipeline::{collect_documents, window, Pipeline};
use std::fs;

/// Execute the scan command.
pub async fn execute_scan(args: ScanArgs, config: &MinerConfig, formatter: &Formatter) -> Result<()> {
    let columns = (!args.columns.is_empty()).then_some(args.columns.as_slice());
    let set = collect_documents(&args.paths, columns)?;

    for path in &set.skipped {
        eprintln!("{}", formatter.warning(&format!("Skipped {} (unsupported file type)", path.display())));
    }
    if set.documents.is_empty() {
        return Err(CliError::InvalidInput("no supported codebook files found".to_string()));
    }

    let pipeline = Pipeline::from_config(config)?;
    let report = pipeline.run(set.documents, args.concurrent).await?;

    for failure in &report.extraction.failures {
        eprintln!("{}", formatter.error(&format!("{}: {}", failure.source_id, failure.reason)));
    }
    for (source, warning) in report.extraction.warnings() {
        eprintln!("{}", formatter.warning(&format!("{}: {}", source, warning)));
    }

    let shown = window(&report.records, args.top, args.min_score);
    let mut sections = vec![formatter.format_records(shown)?];

    if args.hits {
        let hits: Vec<_> = report.extraction.hits().collect();
        sections.push(formatter.format_hits(&hits)?);
    }
    if args.summary {
        let summary = pipeline.summarize(&report.records);
        sections.push(formatter.format_summary(&summary)?);
    }

    let output = sections.join("\n\n");
    match &args.output {
        Some(path) => {
            fs::write(path, format!("{}\n", output))?;
            eprintln!("{}", formatter.success(&format!("Wrote {} variables to {}", shown.len(), path.display())));
        }
        None => println!("{}", output),
    }

    if formatter.format() == OutputFormat::Table {
        let meta = &report.extraction.metadata;
        eprintln!(
            "{}",
            formatter.info(&format!(
                "{} unique variables ({} shown) from {}/{} documents; {} duplicates dropped, {} candidates rejected",
                report.records.len(),
                shown.len(),
                meta.documents_extracted,
                meta.documents_supplied,
                report.duplicates_dropped,
                meta.candidates_rejected
            ))
        );
    }

    Ok(())
}
