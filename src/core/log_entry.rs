//! Log entry structure

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

// Breaks ties between entries stamped with the same instant
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// One rendered line together with the instant it was produced.
///
/// Entries are immutable; a buffer slot is overwritten with a new entry,
/// never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub sequence: u64,
    pub line: String,
}

impl LogEntry {
    pub fn new(line: impl Into<String>) -> Self {
        Self::with_timestamp(Utc::now(), line)
    }

    pub fn with_timestamp(timestamp: DateTime<Utc>, line: impl Into<String>) -> Self {
        Self {
            timestamp,
            sequence: SEQUENCE.fetch_add(1, AtomicOrdering::Relaxed),
            line: line.into(),
        }
    }

    /// Recency order used by every merged view.
    #[inline]
    pub fn chronological(a: &LogEntry, b: &LogEntry) -> Ordering {
        a.timestamp
            .cmp(&b.timestamp)
            .then(a.sequence.cmp(&b.sequence))
    }

    pub fn into_pair(self) -> (DateTime<Utc>, String) {
        (self.timestamp, self.line)
    }
}
