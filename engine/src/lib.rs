//! # History Order
//!
//! Decides whether one recorded change event sits at or before another in a
//! change-data-capture stream.
//!
//! A connector reading a database log records history as it goes: which
//! source produced an event, and where in that source's log it sits. On
//! restart it has to compare those recorded positions against the offset it
//! resumes from. This crate provides that comparison.
//!
//! ## Design Principles
//!
//! - **No IO**: positions are compared, never stored or read
//! - **Pure**: comparators are stateless and safe to share across threads
//! - **Same source only**: records from different sources are never ordered
//!
//! ## Core Concepts
//!
//! ### Documents
//!
//! Sources and positions are [`Document`]s: JSON objects that remember the
//! order their fields were written in. Sources are matched by structural
//! equality. Positions are compared field by field, considering only the
//! fields both positions share, so a connector that adds a field to its
//! offsets can still order old positions against new ones.
//!
//! ### Comparators
//!
//! The [`RecordComparator`] trait answers
//! [`is_at_or_before`](RecordComparator::is_at_or_before):
//! - [`DEFAULT_COMPARATOR`] - identical sources, shared-field positions
//! - [`using_positions`] - identical sources, caller-defined positions
//! - [`FieldOrderComparator`] - identical sources, an explicit field order
//!
//! ### Replay
//!
//! [`replay`] selects the history records to re-apply when recovering to a
//! given point.
//!
//! ## Quick Start
//!
//! ```rust
//! use history_order::{Document, HistoryRecord, RecordComparator, DEFAULT_COMPARATOR};
//!
//! let source = Document::new().with("server", "inventory");
//! let earlier = HistoryRecord::new(source.clone(), Document::new().with("lsn", 10));
//! let later = HistoryRecord::new(source, Document::new().with("lsn", 20).with("txId", 4));
//!
//! assert!(DEFAULT_COMPARATOR.is_at_or_before(&earlier, &later).unwrap());
//! assert!(!DEFAULT_COMPARATOR.is_at_or_before(&later, &earlier).unwrap());
//! ```
//!
//! ## Logging
//!
//! Negative outcomes are reported as `tracing` debug events carrying both
//! compared documents. The crate never installs a subscriber.

pub mod comparator;
pub mod config;
pub mod document;
pub mod error;
pub mod record;
pub mod replay;

// Re-export main types at crate root
pub use comparator::{
    using_positions, FieldOrderComparator, PositionFnComparator, RecordComparator,
    SimilarFieldsComparator, DEFAULT_COMPARATOR,
};
pub use config::{ComparatorConfig, PositionStrategy};
pub use document::Document;
pub use error::Error;
pub use record::HistoryRecord;
pub use replay::replay;
