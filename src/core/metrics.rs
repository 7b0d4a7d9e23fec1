//! Store metrics for observability
//!
//! Counters describing what the store did with the lines handed to it.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for [`LogStore`](super::LogStore) activity.
///
/// # Example
///
/// ```
/// use rust_memory_logger::StoreMetrics;
///
/// let metrics = StoreMetrics::new();
/// metrics.record_appended();
/// metrics.record_discarded();
///
/// assert_eq!(metrics.appended(), 1);
/// assert_eq!(metrics.discarded(), 1);
/// ```
#[derive(Debug, Default)]
pub struct StoreMetrics {
    /// Lines stored in a level buffer
    appended: AtomicU64,

    /// Appends that replaced the oldest entry of a full buffer
    overwritten: AtomicU64,

    /// Lines absorbed without storing (sentinel level or empty line)
    discarded: AtomicU64,
}

impl StoreMetrics {
    pub const fn new() -> Self {
        Self {
            appended: AtomicU64::new(0),
            overwritten: AtomicU64::new(0),
            discarded: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn appended(&self) -> u64 {
        self.appended.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn overwritten(&self) -> u64 {
        self.overwritten.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn discarded(&self) -> u64 {
        self.discarded.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_appended(&self) -> u64 {
        self.appended.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_overwritten(&self) -> u64 {
        self.overwritten.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_discarded(&self) -> u64 {
        self.discarded.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of stored lines that evicted an older one (0.0 - 100.0)
    pub fn overwrite_rate(&self) -> f64 {
        let appended = self.appended();
        if appended == 0 {
            return 0.0;
        }
        (self.overwritten() as f64 / appended as f64) * 100.0
    }

    pub fn reset(&self) {
        self.appended.store(0, Ordering::Relaxed);
        self.overwritten.store(0, Ordering::Relaxed);
        self.discarded.store(0, Ordering::Relaxed);
    }
}
