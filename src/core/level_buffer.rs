//! Fixed-capacity circular buffer holding the most recent entries of one level
//!
//! The backing sequence and the write index live behind a single
//! `parking_lot::RwLock`: appends take the write half, snapshots the read
//! half, so concurrent snapshots never wait on each other.

use super::log_entry::LogEntry;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug)]
struct Ring {
    entries: Vec<LogEntry>,
    next: usize,
    /// Capacity the physical layout was built for
    committed: usize,
}

impl Ring {
    fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            next: 0,
            committed: capacity,
        }
    }

    /// Entries oldest first, regardless of physical slot order.
    fn ordered(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries[self.next..]
            .iter()
            .chain(self.entries[..self.next].iter())
    }

    fn relayout(&mut self, capacity: usize) {
        let mut ordered: Vec<LogEntry> = self.ordered().cloned().collect();
        if ordered.len() > capacity {
            ordered.drain(..ordered.len() - capacity);
        }
        ordered.reserve(capacity.saturating_sub(ordered.len()));

        self.next = ordered.len() % capacity;
        self.entries = ordered;
        self.committed = capacity;
    }

    /// Returns `true` when the oldest entry was overwritten.
    fn push(&mut self, entry: LogEntry) -> bool {
        let overwritten = if self.entries.len() < self.committed {
            self.entries.push(entry);
            false
        } else {
            self.entries[self.next] = entry;
            true
        };
        self.next = (self.next + 1) % self.committed;
        overwritten
    }
}

/// Ring buffer of [`LogEntry`] values for a single severity level.
///
/// The capacity is shared with the owning store and re-read on every append.
/// When it no longer matches the layout the ring was built for, the ring is
/// rebuilt in logical order keeping only the newest entries, so a buffer
/// always holds at most `capacity` of the most recent appends.
#[derive(Debug)]
pub struct LevelBuffer {
    ring: RwLock<Ring>,
    capacity: Arc<AtomicUsize>,
}

impl LevelBuffer {
    /// Create a buffer with its own, unshared capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::shared(Arc::new(AtomicUsize::new(capacity)))
    }

    /// Create a buffer that follows a capacity setting owned elsewhere.
    pub fn shared(capacity: Arc<AtomicUsize>) -> Self {
        let initial = capacity.load(Ordering::Acquire).max(1);
        Self {
            ring: RwLock::new(Ring::new(initial)),
            capacity,
        }
    }

    #[inline]
    fn current_capacity(&self) -> usize {
        self.capacity.load(Ordering::Acquire).max(1)
    }

    /// Append an entry, overwriting the oldest one once the buffer is full.
    ///
    /// Returns `true` if an older entry was overwritten.
    pub fn append(&self, entry: LogEntry) -> bool {
        let capacity = self.current_capacity();
        let mut ring = self.ring.write();
        if ring.committed != capacity {
            ring.relayout(capacity);
        }
        ring.push(entry)
    }

    /// Consistent copy of the buffer, oldest entry first.
    pub fn snapshot(&self) -> Vec<LogEntry> {
        let capacity = self.current_capacity();
        let ring = self.ring.read();
        let skip = ring.entries.len().saturating_sub(capacity);
        ring.ordered().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.ring.read().entries.len().min(self.current_capacity())
    }

    pub fn is_empty(&self) -> bool {
        self.ring.read().entries.is_empty()
    }

    /// Capacity the current physical layout was built for.
    pub fn capacity(&self) -> usize {
        self.ring.read().committed
    }

    pub fn clear(&self) {
        let capacity = self.current_capacity();
        *self.ring.write() = Ring::new(capacity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(entries: &[LogEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.line.as_str()).collect()
    }

    #[test]
    fn test_grows_until_capacity() {
        let buffer = LevelBuffer::with_capacity(3);
        assert!(!buffer.append(LogEntry::new("a")));
        assert!(!buffer.append(LogEntry::new("b")));

        assert_eq!(buffer.len(), 2);
        assert_eq!(lines(&buffer.snapshot()), vec!["a", "b"]);
    }

    #[test]
    fn test_overwrites_oldest() {
        let buffer = LevelBuffer::with_capacity(3);
        for line in ["a", "b", "c"] {
            buffer.append(LogEntry::new(line));
        }
        assert!(buffer.append(LogEntry::new("d")));

        assert_eq!(lines(&buffer.snapshot()), vec!["b", "c", "d"]);
    }

    #[test]
    fn test_wraps_multiple_times() {
        let buffer = LevelBuffer::with_capacity(2);
        for i in 0..7 {
            buffer.append(LogEntry::new(i.to_string()));
        }
        assert_eq!(lines(&buffer.snapshot()), vec!["5", "6"]);
    }

    #[test]
    fn test_snapshot_is_repeatable() {
        let buffer = LevelBuffer::with_capacity(4);
        for line in ["a", "b", "c", "d", "e"] {
            buffer.append(LogEntry::new(line));
        }
        assert_eq!(buffer.snapshot(), buffer.snapshot());
    }

    #[test]
    fn test_shrinking_capacity_keeps_newest() {
        let capacity = Arc::new(AtomicUsize::new(4));
        let buffer = LevelBuffer::shared(Arc::clone(&capacity));
        for line in ["a", "b", "c", "d", "e"] {
            buffer.append(LogEntry::new(line));
        }

        capacity.store(2, Ordering::Release);
        // Snapshot respects the new limit before any further append
        assert_eq!(lines(&buffer.snapshot()), vec!["d", "e"]);

        buffer.append(LogEntry::new("f"));
        assert_eq!(buffer.capacity(), 2);
        assert_eq!(lines(&buffer.snapshot()), vec!["e", "f"]);
    }

    #[test]
    fn test_growing_capacity_preserves_order() {
        let capacity = Arc::new(AtomicUsize::new(2));
        let buffer = LevelBuffer::shared(Arc::clone(&capacity));
        for line in ["a", "b", "c"] {
            buffer.append(LogEntry::new(line));
        }

        capacity.store(4, Ordering::Release);
        for line in ["d", "e", "f"] {
            buffer.append(LogEntry::new(line));
        }
        assert_eq!(lines(&buffer.snapshot()), vec!["c", "d", "e", "f"]);
    }

    #[test]
    fn test_clear() {
        let buffer = LevelBuffer::with_capacity(2);
        buffer.append(LogEntry::new("a"));
        buffer.clear();
        assert!(buffer.is_empty());
        assert!(buffer.snapshot().is_empty());
    }
}
