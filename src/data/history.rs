//! Ordered sample history with optional FIFO capacity.

use std::collections::VecDeque;

/// Default number of entries kept by a rolling window (one hour of minutes).
pub const DEFAULT_WINDOW: usize = 60;

/// Ordered sequence of samples, oldest first.
///
/// A bounded history evicts its oldest entry before accepting a new one once
/// it is full, so its length never exceeds the capacity. An unbounded history
/// only grows.
#[derive(Debug, Clone)]
pub struct HistoryBuffer<T> {
    entries: VecDeque<T>,
    capacity: Option<usize>,
}

impl<T> HistoryBuffer<T> {
    /// Create a history that keeps at most `capacity` entries.
    ///
    /// A capacity of zero is treated as one so the latest sample is always
    /// retained.
    pub fn bounded(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: Some(capacity),
        }
    }

    /// Create a history without a size limit.
    pub fn unbounded() -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: None,
        }
    }

    /// Append a sample, evicting the oldest entry if the history is full.
    ///
    /// Returns the evicted entry, if any.
    pub fn push(&mut self, sample: T) -> Option<T> {
        let evicted = match self.capacity {
            Some(capacity) if self.entries.len() >= capacity => self.entries.pop_front(),
            _ => None,
        };
        self.entries.push_back(sample);
        evicted
    }

    /// Most recent entry.
    pub fn latest(&self) -> Option<&T> {
        self.entries.back()
    }

    /// Iterate from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum length, or `None` for an unbounded history.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }
}

impl<T: Clone> HistoryBuffer<T> {
    /// Copy the history out, oldest first.
    pub fn to_vec(&self) -> Vec<T> {
        self.entries.iter().cloned().collect()
    }
}

impl<T> Extend<T> for HistoryBuffer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for sample in iter {
            self.push(sample);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_history_keeps_length_at_capacity() {
        let mut history = HistoryBuffer::bounded(3);
        history.extend(1..=10);

        assert_eq!(history.len(), 3);
        assert_eq!(history.to_vec(), vec![8, 9, 10]);
    }

    #[test]
    fn push_evicts_strictly_the_oldest_entry() {
        let mut history = HistoryBuffer::bounded(2);
        assert_eq!(history.push("a"), None);
        assert_eq!(history.push("b"), None);
        assert_eq!(history.push("c"), Some("a"));
        assert_eq!(history.push("d"), Some("b"));
        assert_eq!(history.to_vec(), vec!["c", "d"]);
    }

    #[test]
    fn unbounded_history_never_evicts() {
        let mut history = HistoryBuffer::unbounded();
        for i in 0..500 {
            assert_eq!(history.push(i), None);
        }
        assert_eq!(history.len(), 500);
        assert_eq!(history.capacity(), None);
        assert_eq!(history.iter().next(), Some(&0));
    }

    #[test]
    fn latest_tracks_newest_push() {
        let mut history = HistoryBuffer::bounded(DEFAULT_WINDOW);
        assert!(history.latest().is_none());
        assert!(history.is_empty());

        history.push(1.5);
        history.push(2.5);
        assert_eq!(history.latest(), Some(&2.5));
    }

    #[test]
    fn zero_capacity_still_keeps_latest() {
        let mut history = HistoryBuffer::bounded(0);
        history.push(1);
        history.push(2);
        assert_eq!(history.capacity(), Some(1));
        assert_eq!(history.to_vec(), vec![2]);
    }
}
