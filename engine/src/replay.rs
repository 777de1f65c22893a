//! Replaying recorded history up to a recovery point.
//!
//! On restart a connector rebuilds its schema by re-applying the history it
//! recorded, but only the part written at or before the offset it resumes
//! from. Records from other sources and records past the stop point are
//! skipped; the history is not assumed to be sorted, so a later record does
//! not end the scan.

use crate::{comparator::RecordComparator, error::Result, HistoryRecord};

/// Select, in order, the records that are at or before `stop_point`.
pub fn replay<'a, C, I>(
    comparator: &C,
    records: I,
    stop_point: &HistoryRecord,
) -> Result<Vec<&'a HistoryRecord>>
where
    C: RecordComparator + ?Sized,
    I: IntoIterator<Item = &'a HistoryRecord>,
{
    let mut applied = Vec::new();
    let mut skipped = 0usize;

    for record in records {
        if comparator.is_at_or_before(record, stop_point)? {
            applied.push(record);
        } else {
            skipped += 1;
        }
    }

    tracing::debug!(
        applied = applied.len(),
        skipped,
        stop_position = %stop_point.position(),
        "replayed history"
    );
    Ok(applied)
}
