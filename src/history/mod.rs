//! Bounded, insertion-ordered store of spoken sequences
//!
//! The buffer is a fixed-capacity ring: the newest entry sits at logical
//! position 0, and appending at capacity evicts the oldest entry. A movable
//! read cursor, owned by the buffer, supports review navigation; its
//! position is resolved after every append by the configured cursor policy.

mod cursor;

pub use cursor::{CursorMove, CursorNavigator, CursorPolicy};

use crate::sequence::SpeechSequence;
use std::collections::VecDeque;
use tracing::debug;

/// Default number of retained entries
pub const DEFAULT_CAPACITY: usize = 500;

/// Smallest allowed capacity
pub const MIN_CAPACITY: usize = 1;

/// Largest allowed capacity
pub const MAX_CAPACITY: usize = 10_000_000;

/// One stored utterance
///
/// Identity is position in the buffer, not content; duplicates are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// The full sequence as spoken, markers included
    pub sequence: SpeechSequence,
    /// Lifetime append ordinal, monotonically increasing
    pub inserted_at: u64,
}

/// What an append did to the buffer and cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendOutcome {
    /// The oldest entry was dropped to make room
    pub evicted: bool,
    /// The context policy pushed the cursor onto the last slot of the window
    pub edge_warning: bool,
}

/// Fixed-capacity history of spoken sequences, newest first
#[derive(Debug)]
pub struct HistoryBuffer {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
    cursor: CursorNavigator,
}

impl HistoryBuffer {
    /// Create a buffer holding at most `capacity` entries.
    ///
    /// The capacity is clamped into `MIN_CAPACITY..=MAX_CAPACITY` and fixed
    /// for the buffer's lifetime; a changed capacity preference only takes
    /// effect when the buffer is re-created.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.clamp(MIN_CAPACITY, MAX_CAPACITY);
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            capacity,
            cursor: CursorNavigator::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current cursor position, `None` while the buffer is empty
    pub fn cursor(&self) -> Option<usize> {
        self.cursor.position()
    }

    /// Entry under the cursor
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.cursor.position()?)
    }

    /// Entry at a logical position (0 = newest)
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    /// Entries newest-first
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Entries oldest-first
    pub fn iter_oldest_first(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }

    /// Insert an entry at the head, evicting the tail at capacity, then
    /// resolve the cursor per `policy`.
    pub fn append(&mut self, entry: HistoryEntry, policy: CursorPolicy) -> AppendOutcome {
        let evicted = if self.entries.len() == self.capacity {
            self.entries.pop_back();
            true
        } else {
            false
        };
        self.entries.push_front(entry);
        let edge_warning = self
            .cursor
            .on_append(policy, self.entries.len(), self.capacity);
        if evicted {
            debug!("History at capacity {}, oldest entry evicted", self.capacity);
        }
        AppendOutcome {
            evicted,
            edge_warning,
        }
    }

    /// Move the cursor one entry older and return it
    pub fn prev(&mut self) -> NavOutcome<'_> {
        let moved = self.cursor.prev(self.entries.len());
        self.resolve(moved)
    }

    /// Move the cursor one entry newer and return it
    pub fn next(&mut self) -> NavOutcome<'_> {
        let moved = self.cursor.next(self.entries.len());
        self.resolve(moved)
    }

    /// Jump the cursor to the oldest entry and return it
    pub fn first(&mut self) -> NavOutcome<'_> {
        let moved = self.cursor.first(self.entries.len());
        self.resolve(moved)
    }

    /// Jump the cursor to the newest entry and return it
    pub fn last(&mut self) -> NavOutcome<'_> {
        let moved = self.cursor.last(self.entries.len());
        self.resolve(moved)
    }

    fn resolve(&self, moved: CursorMove) -> NavOutcome<'_> {
        match moved {
            CursorMove::Moved(index) => match self.entries.get(index) {
                Some(entry) => NavOutcome::Moved(entry),
                None => NavOutcome::Empty,
            },
            CursorMove::Boundary => NavOutcome::Boundary,
            CursorMove::Empty => NavOutcome::Empty,
        }
    }
}

/// Result of a navigation request against the buffer
#[derive(Debug, PartialEq, Eq)]
pub enum NavOutcome<'a> {
    /// Cursor moved onto this entry
    Moved(&'a HistoryEntry),
    /// Cursor is already at that end; a boundary signal is owed, not an error
    Boundary,
    /// Buffer is empty; silent no-op
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(text: &str, ordinal: u64) -> HistoryEntry {
        HistoryEntry {
            sequence: SpeechSequence::from_text(text),
            inserted_at: ordinal,
        }
    }

    fn filled(capacity: usize, texts: &[&str]) -> HistoryBuffer {
        let mut buffer = HistoryBuffer::with_capacity(capacity);
        for (i, text) in texts.iter().enumerate() {
            buffer.append(entry(text, i as u64 + 1), CursorPolicy::Latest);
        }
        buffer
    }

    fn texts(buffer: &HistoryBuffer) -> Vec<String> {
        buffer.iter().map(|e| e.sequence.flatten()).collect()
    }

    #[test]
    fn test_len_is_min_of_appends_and_capacity() {
        for n in 0..8 {
            let labels: Vec<String> = (0..n).map(|i| format!("item {i}")).collect();
            let refs: Vec<&str> = labels.iter().map(|s| s.as_str()).collect();
            let buffer = filled(3, &refs);
            assert_eq!(buffer.len(), n.min(3));
        }
    }

    #[test]
    fn test_contents_are_last_capacity_entries_newest_first() {
        let buffer = filled(3, &["a", "b", "c", "d", "e"]);
        assert_eq!(texts(&buffer), vec!["e", "d", "c"]);
    }

    #[test]
    fn test_eviction_drops_exactly_the_oldest() {
        let mut buffer = filled(3, &["a", "b", "c"]);
        let outcome = buffer.append(entry("d", 4), CursorPolicy::Latest);
        assert!(outcome.evicted);
        assert_eq!(texts(&buffer), vec!["d", "c", "b"]);
    }

    #[test]
    fn test_capacity_is_clamped() {
        assert_eq!(HistoryBuffer::with_capacity(0).capacity(), MIN_CAPACITY);
        assert_eq!(
            HistoryBuffer::with_capacity(usize::MAX).capacity(),
            MAX_CAPACITY
        );
    }

    #[test]
    fn test_navigation_boundaries() {
        let mut buffer = filled(10, &["oldest", "middle", "newest"]);
        assert_eq!(buffer.cursor(), Some(0));

        // already at the newest entry
        assert_eq!(buffer.next(), NavOutcome::Boundary);
        assert_eq!(buffer.cursor(), Some(0));

        match buffer.prev() {
            NavOutcome::Moved(e) => assert_eq!(e.sequence.flatten(), "middle"),
            other => panic!("unexpected {other:?}"),
        }
        match buffer.prev() {
            NavOutcome::Moved(e) => assert_eq!(e.sequence.flatten(), "oldest"),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(buffer.prev(), NavOutcome::Boundary);
        assert_eq!(buffer.cursor(), Some(2));
    }

    #[test]
    fn test_first_and_last_jumps() {
        let mut buffer = filled(10, &["oldest", "middle", "newest"]);
        match buffer.first() {
            NavOutcome::Moved(e) => assert_eq!(e.sequence.flatten(), "oldest"),
            other => panic!("unexpected {other:?}"),
        }
        match buffer.last() {
            NavOutcome::Moved(e) => assert_eq!(e.sequence.flatten(), "newest"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_empty_buffer_navigation_is_silent() {
        let mut buffer = HistoryBuffer::with_capacity(5);
        assert_eq!(buffer.prev(), NavOutcome::Empty);
        assert_eq!(buffer.next(), NavOutcome::Empty);
        assert_eq!(buffer.first(), NavOutcome::Empty);
        assert_eq!(buffer.last(), NavOutcome::Empty);
        assert!(buffer.current().is_none());
    }

    #[test]
    fn test_duplicates_are_kept() {
        let buffer = filled(5, &["same", "same"]);
        assert_eq!(buffer.len(), 2);
        assert_eq!(texts(&buffer), vec!["same", "same"]);
    }

    #[test]
    fn test_fixed_index_cursor_survives_eviction() {
        let mut buffer = filled(3, &["a", "b", "c"]);
        buffer.first();
        assert_eq!(buffer.cursor(), Some(2));
        buffer.append(entry("d", 4), CursorPolicy::FixedIndex);
        assert_eq!(buffer.cursor(), Some(2));
        assert_eq!(
            buffer.current().map(|e| e.sequence.flatten()),
            Some("b".to_string())
        );
    }
}
