//! Dropping overlapping records before they reach the renderer.
//!
//! The renderer rejects independent overlaps. This pass scans left to right
//! and keeps a record only if it starts at or after the end of the last kept
//! one. Records sharing an identical range compete on score.

use std::cmp::Ordering;

use crate::wire::EntityRecord;

fn score(record: &EntityRecord) -> f64 {
    record.score.unwrap_or(0.0)
}

/// Sort by start ascending, end descending, score descending.
fn scan_order(a: &EntityRecord, b: &EntityRecord) -> Ordering {
    a.start
        .cmp(&b.start)
        .then_with(|| b.end.cmp(&a.end))
        .then_with(|| score(b).partial_cmp(&score(a)).unwrap_or(Ordering::Equal))
}

/// Remove overlapping records, keeping the earliest-starting, longest, then
/// highest scoring ones. A missing score counts as `0.0`.
///
/// The result never contains two overlapping records.
pub fn resolve_overlaps(mut records: Vec<EntityRecord>) -> Vec<EntityRecord> {
    let total = records.len();
    records.sort_by(scan_order);

    let mut kept: Vec<EntityRecord> = Vec::with_capacity(records.len());
    let mut last_end = i64::MIN;
    for record in records {
        if record.start >= last_end {
            last_end = record.end;
            kept.push(record);
        }
    }

    tracing::debug!(total, kept = kept.len(), "resolved overlapping entities");
    kept
}
