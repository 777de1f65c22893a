//! Ordering of history records.
//!
//! A comparator answers one question: is the first record at the same or an
//! earlier point in the change stream than the second? Records are only
//! ordered against records from the same source; positions from different
//! sources never compare as at-or-before.
//!
//! The answer is built from two hooks on [`RecordComparator`]:
//!
//! - [`is_same_source`](RecordComparator::is_same_source): structural
//!   equality of the source documents by default
//! - [`is_position_at_or_before`](RecordComparator::is_position_at_or_before):
//!   compares only the fields both positions share by default
//!
//! Connectors with their own position semantics replace the position hook
//! with [`using_positions`] and keep the source rule.

use crate::{error::Result, Document, HistoryRecord};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Decides whether one history record is at or before another.
///
/// Implementations hold no mutable state and may be shared across threads.
pub trait RecordComparator: Send + Sync {
    /// Check whether `record1` is at the same or an earlier point than
    /// `record2`.
    ///
    /// Both hooks are always evaluated. A negative outcome of either is
    /// logged at debug level with the compared values; errors from the
    /// position hook are returned as is.
    fn is_at_or_before(&self, record1: &HistoryRecord, record2: &HistoryRecord) -> Result<bool> {
        let source_same = self.is_same_source(record1.source(), record2.source());
        let position_ok = self.is_position_at_or_before(record1.position(), record2.position())?;
        if !source_same {
            tracing::debug!(
                source1 = %record1.source(),
                source2 = %record2.source(),
                "is_at_or_before: source is not the same"
            );
        }
        if !position_ok {
            tracing::debug!(
                position1 = %record1.position(),
                position2 = %record2.position(),
                "is_at_or_before: position is not at or before"
            );
        }
        Ok(source_same && position_ok)
    }

    /// Check whether two source documents identify the same origin.
    fn is_same_source(&self, source1: &Document, source2: &Document) -> bool {
        source1 == source2
    }

    /// Check whether `position1` is at or before `position2`.
    fn is_position_at_or_before(&self, position1: &Document, position2: &Document) -> Result<bool> {
        Ok(position1.compare_using_similar_fields(position2)? != Ordering::Greater)
    }
}

/// Requires identical sources and compares only the fields present in both
/// positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimilarFieldsComparator;

impl RecordComparator for SimilarFieldsComparator {}

/// The comparator used when nothing more specific is configured.
pub const DEFAULT_COMPARATOR: SimilarFieldsComparator = SimilarFieldsComparator;

/// Create a comparator that requires identical sources but uses `compare` to
/// decide whether the first position is at or before the second.
pub fn using_positions<F>(compare: F) -> PositionFnComparator<F>
where
    F: Fn(&Document, &Document) -> bool + Send + Sync,
{
    PositionFnComparator { compare }
}

/// Comparator whose position check is a caller-supplied function.
#[derive(Clone)]
pub struct PositionFnComparator<F> {
    compare: F,
}

impl<F> RecordComparator for PositionFnComparator<F>
where
    F: Fn(&Document, &Document) -> bool + Send + Sync,
{
    fn is_position_at_or_before(&self, position1: &Document, position2: &Document) -> Result<bool> {
        Ok((self.compare)(position1, position2))
    }
}

impl<F> fmt::Debug for PositionFnComparator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PositionFnComparator").finish_non_exhaustive()
    }
}

/// Compares positions on an explicit list of fields, most significant first.
///
/// A field missing from either position is skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOrderComparator {
    fields: Vec<String>,
}

impl FieldOrderComparator {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

impl RecordComparator for FieldOrderComparator {
    fn is_position_at_or_before(&self, position1: &Document, position2: &Document) -> Result<bool> {
        Ok(position1.compare_on_fields(position2, &self.fields)? != Ordering::Greater)
    }
}

impl<C: RecordComparator + ?Sized> RecordComparator for &C {
    fn is_at_or_before(&self, record1: &HistoryRecord, record2: &HistoryRecord) -> Result<bool> {
        (**self).is_at_or_before(record1, record2)
    }

    fn is_same_source(&self, source1: &Document, source2: &Document) -> bool {
        (**self).is_same_source(source1, source2)
    }

    fn is_position_at_or_before(&self, position1: &Document, position2: &Document) -> Result<bool> {
        (**self).is_position_at_or_before(position1, position2)
    }
}

impl<C: RecordComparator + ?Sized> RecordComparator for Box<C> {
    fn is_at_or_before(&self, record1: &HistoryRecord, record2: &HistoryRecord) -> Result<bool> {
        (**self).is_at_or_before(record1, record2)
    }

    fn is_same_source(&self, source1: &Document, source2: &Document) -> bool {
        (**self).is_same_source(source1, source2)
    }

    fn is_position_at_or_before(&self, position1: &Document, position2: &Document) -> Result<bool> {
        (**self).is_position_at_or_before(position1, position2)
    }
}

impl<C: RecordComparator + ?Sized> RecordComparator for Arc<C> {
    fn is_at_or_before(&self, record1: &HistoryRecord, record2: &HistoryRecord) -> Result<bool> {
        (**self).is_at_or_before(record1, record2)
    }

    fn is_same_source(&self, source1: &Document, source2: &Document) -> bool {
        (**self).is_same_source(source1, source2)
    }

    fn is_position_at_or_before(&self, position1: &Document, position2: &Document) -> Result<bool> {
        (**self).is_position_at_or_before(position1, position2)
    }
}
