//! First-seen-wins deduplication by variable name

use codebook_domain::VariableRecord;
use std::collections::HashSet;
use tracing::debug;

/// Deduplicated records plus how many duplicates were discarded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    /// One record per unique name, in first-seen order
    pub records: Vec<VariableRecord>,

    /// Later records whose name had already been seen
    pub duplicates_dropped: usize,
}

/// Keep the first record for each name and drop later ones entirely
///
/// `records` must be the concatenation of extractor outputs in the order the
/// documents were supplied; that order decides which duplicate survives.
pub fn aggregate(records: Vec<VariableRecord>) -> Aggregation {
    let mut seen = HashSet::with_capacity(records.len());
    let mut kept = Vec::with_capacity(records.len());
    let mut duplicates_dropped = 0;

    for record in records {
        if seen.contains(&record.name) {
            debug!("Dropped duplicate {} from {}", record.name, record.source_file);
            duplicates_dropped += 1;
            continue;
        }
        seen.insert(record.name.clone());
        kept.push(record);
    }

    Aggregation {
        records: kept,
        duplicates_dropped,
    }
}
