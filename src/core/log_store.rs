//! Per-level log history
//!
//! `LogStore` owns one [`LevelBuffer`] for every storable [`LogLevel`] and the
//! capacity setting they all follow. Each buffer is locked independently, so
//! merged views are built from per-level snapshots and order entries by
//! timestamp only; they are not a consistent cut across levels.

use super::error::{LoggerError, Result};
use super::level_buffer::LevelBuffer;
use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use super::metrics::StoreMetrics;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

/// Number of entries kept per level unless configured otherwise
pub const DEFAULT_MAX_LOG_COUNT: usize = 200;

static SHARED_STORE: OnceLock<Arc<LogStore>> = OnceLock::new();

#[derive(Debug)]
pub struct LogStore {
    buffers: [LevelBuffer; LogLevel::STORABLE.len()],
    capacity: Arc<AtomicUsize>,
    metrics: StoreMetrics,
}

impl LogStore {
    /// Create a store keeping up to `capacity` entries for each level.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(LoggerError::InvalidCapacity(capacity));
        }
        Ok(Self::build(capacity))
    }

    fn build(capacity: usize) -> Self {
        let shared = Arc::new(AtomicUsize::new(capacity));
        Self {
            buffers: std::array::from_fn(|_| LevelBuffer::shared(Arc::clone(&shared))),
            capacity: shared,
            metrics: StoreMetrics::new(),
        }
    }

    /// Process-wide store, created with the default capacity on first use.
    ///
    /// Loggers never reach for it implicitly; it exists so a host can share
    /// one store between its providers and its diagnostics surface.
    pub fn shared() -> Arc<LogStore> {
        Arc::clone(SHARED_STORE.get_or_init(|| Arc::new(LogStore::default())))
    }

    pub fn capacity(&self) -> usize {
        self.capacity.load(Ordering::Acquire)
    }

    /// Change the per-level capacity.
    ///
    /// Buffers adopt the new value on their next append; snapshots taken
    /// before then are already limited to it.
    pub fn set_capacity(&self, capacity: usize) -> Result<()> {
        if capacity == 0 {
            return Err(LoggerError::InvalidCapacity(capacity));
        }
        self.capacity.store(capacity, Ordering::Release);
        Ok(())
    }

    pub fn metrics(&self) -> &StoreMetrics {
        &self.metrics
    }

    fn buffer(&self, level: LogLevel) -> Option<&LevelBuffer> {
        level.slot().map(|slot| &self.buffers[slot])
    }

    /// Store a rendered line under `level`, stamped with the current time.
    ///
    /// Returns `false` when the line was absorbed instead: the sentinel
    /// level and empty lines are never stored.
    pub fn append(&self, level: LogLevel, line: impl Into<String>) -> bool {
        self.append_entry(level, LogEntry::new(line))
    }

    pub fn append_entry(&self, level: LogLevel, entry: LogEntry) -> bool {
        let Some(buffer) = self.buffer(level) else {
            self.metrics.record_discarded();
            return false;
        };
        if entry.line.is_empty() {
            self.metrics.record_discarded();
            return false;
        }

        if buffer.append(entry) {
            self.metrics.record_overwritten();
        }
        self.metrics.record_appended();
        true
    }

    fn collect<F>(&self, include: F) -> Vec<LogEntry>
    where
        F: Fn(LogLevel) -> bool,
    {
        let mut entries: Vec<LogEntry> = LogLevel::STORABLE
            .iter()
            .filter(|level| include(**level))
            .filter_map(|level| self.buffer(*level))
            .flat_map(LevelBuffer::snapshot)
            .collect();
        entries.sort_by(LogEntry::chronological);
        entries
    }

    /// The `limit` most recent entries across all levels, oldest first.
    pub fn timed_all_entries_desc_by_recency(&self, limit: usize) -> Vec<(DateTime<Utc>, String)> {
        let mut entries = self.collect(|_| true);
        entries.reverse();
        entries.truncate(limit);
        entries.reverse();
        entries.into_iter().map(LogEntry::into_pair).collect()
    }

    pub fn all_entries_desc_by_recency(&self, limit: usize) -> Vec<String> {
        strip(self.timed_all_entries_desc_by_recency(limit))
    }

    /// Most recent entries across all levels, bounded by the capacity.
    pub fn all_entries(&self) -> Vec<String> {
        self.all_entries_desc_by_recency(self.capacity())
    }

    pub fn timed_all_entries(&self) -> Vec<(DateTime<Utc>, String)> {
        self.timed_all_entries_desc_by_recency(self.capacity())
    }

    pub fn timed_entries_for_level(&self, level: LogLevel) -> Vec<(DateTime<Utc>, String)> {
        self.collect(|candidate| candidate == level)
            .into_iter()
            .map(LogEntry::into_pair)
            .collect()
    }

    /// Lines stored for exactly `level`, oldest first.
    pub fn entries_for_level(&self, level: LogLevel) -> Vec<String> {
        strip(self.timed_entries_for_level(level))
    }

    pub fn timed_entries_at_least(&self, min_level: LogLevel) -> Vec<(DateTime<Utc>, String)> {
        self.collect(|candidate| candidate >= min_level)
            .into_iter()
            .map(LogEntry::into_pair)
            .collect()
    }

    /// Lines of every level `>= min_level`, oldest first.
    pub fn entries_at_least(&self, min_level: LogLevel) -> Vec<String> {
        strip(self.timed_entries_at_least(min_level))
    }

    pub fn timed_entries_at_most(&self, max_level: LogLevel) -> Vec<(DateTime<Utc>, String)> {
        self.collect(|candidate| candidate <= max_level)
            .into_iter()
            .map(LogEntry::into_pair)
            .collect()
    }

    /// Lines of every level `<= max_level`, oldest first.
    pub fn entries_at_most(&self, max_level: LogLevel) -> Vec<String> {
        strip(self.timed_entries_at_most(max_level))
    }

    /// Number of entries currently held for `level`.
    pub fn len(&self, level: LogLevel) -> usize {
        self.buffer(level).map_or(0, LevelBuffer::len)
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.iter().all(LevelBuffer::is_empty)
    }

    pub fn clear(&self) {
        for buffer in &self.buffers {
            buffer.clear();
        }
    }
}

impl Default for LogStore {
    fn default() -> Self {
        Self::build(DEFAULT_MAX_LOG_COUNT)
    }
}

fn strip(entries: Vec<(DateTime<Utc>, String)>) -> Vec<String> {
    entries.into_iter().map(|(_, line)| line).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_capacity() {
        assert!(matches!(LogStore::new(0), Err(LoggerError::InvalidCapacity(0))));

        let store = LogStore::new(5).unwrap();
        assert!(store.set_capacity(0).is_err());
        assert_eq!(store.capacity(), 5);
    }

    #[test]
    fn test_keeps_last_entries_per_level() {
        let store = LogStore::new(3).unwrap();
        for line in ["a", "b", "c", "d"] {
            store.append(LogLevel::Information, line);
        }

        assert_eq!(store.entries_for_level(LogLevel::Information), vec!["b", "c", "d"]);
        assert_eq!(store.metrics().overwritten(), 1);
    }

    #[test]
    fn test_sentinel_and_empty_lines_are_absorbed() {
        let store = LogStore::new(3).unwrap();

        assert!(!store.append(LogLevel::None, "ignored"));
        assert!(!store.append(LogLevel::Error, ""));

        assert!(store.is_empty());
        assert!(store.entries_for_level(LogLevel::None).is_empty());
        assert_eq!(store.metrics().discarded(), 2);
    }

    #[test]
    fn test_level_ranges() {
        let store = LogStore::new(10).unwrap();
        store.append(LogLevel::Information, "info");
        store.append(LogLevel::Warning, "warning");
        store.append(LogLevel::Error, "error");

        assert_eq!(store.entries_at_least(LogLevel::Warning), vec!["warning", "error"]);
        assert_eq!(store.entries_at_most(LogLevel::Warning), vec!["info", "warning"]);
        assert!(store.entries_at_least(LogLevel::None).is_empty());
    }

    #[test]
    fn test_all_entries_keeps_most_recent_ascending() {
        let store = LogStore::new(10).unwrap();
        store.append(LogLevel::Debug, "1");
        store.append(LogLevel::Error, "2");
        store.append(LogLevel::Debug, "3");
        store.append(LogLevel::Warning, "4");

        assert_eq!(store.all_entries_desc_by_recency(3), vec!["2", "3", "4"]);
        assert_eq!(store.all_entries(), vec!["1", "2", "3", "4"]);
        assert!(store.all_entries_desc_by_recency(0).is_empty());
    }

    #[test]
    fn test_timed_views_are_ascending() {
        let store = LogStore::new(10).unwrap();
        store.append(LogLevel::Trace, "t");
        store.append(LogLevel::Critical, "c");

        let timed = store.timed_entries_at_most(LogLevel::Critical);
        assert_eq!(timed.len(), 2);
        assert!(timed[0].0 <= timed[1].0);
        assert_eq!(timed[1].1, "c");
    }

    #[test]
    fn test_clear() {
        let store = LogStore::new(2).unwrap();
        store.append(LogLevel::Warning, "w");
        store.clear();
        assert_eq!(store.len(LogLevel::Warning), 0);
    }
}
