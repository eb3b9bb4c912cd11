//! Review cursor movement and append-time resolution
//!
//! The cursor is an index into the history buffer, position 0 being the
//! newest entry. It is `None` exactly when the buffer is empty, and is
//! re-clamped into the valid range every time an append resolves.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the cursor moves when a new entry is appended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CursorPolicy {
    /// Reset to the newest entry
    #[default]
    Latest,
    /// Keep tracking the entry that was being reviewed
    Context,
    /// Stay at the same numeric position
    FixedIndex,
}

impl CursorPolicy {
    /// Cycle order used by the toggle gesture
    pub fn next(self) -> Self {
        match self {
            CursorPolicy::Latest => CursorPolicy::Context,
            CursorPolicy::Context => CursorPolicy::FixedIndex,
            CursorPolicy::FixedIndex => CursorPolicy::Latest,
        }
    }
}

impl fmt::Display for CursorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CursorPolicy::Latest => write!(f, "latest"),
            CursorPolicy::Context => write!(f, "context"),
            CursorPolicy::FixedIndex => write!(f, "fixed index"),
        }
    }
}

/// Result of a cursor move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    /// Cursor now rests on this index
    Moved(usize),
    /// Already at the end being moved past; cursor unchanged
    Boundary,
    /// Buffer is empty; nothing to do
    Empty,
}

/// Movable read cursor over a history buffer
#[derive(Debug, Clone, Copy, Default)]
pub struct CursorNavigator {
    position: Option<usize>,
}

impl CursorNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Resolve the cursor after an entry landed at the head.
    ///
    /// `len` is the buffer length after the append. Returns true when the
    /// context policy pushed the cursor onto the last slot of the window,
    /// meaning the tracked entry is about to fall off.
    pub fn on_append(&mut self, policy: CursorPolicy, len: usize, capacity: usize) -> bool {
        debug_assert!(len >= 1);
        match policy {
            CursorPolicy::Latest => {
                self.position = Some(0);
                false
            }
            CursorPolicy::Context => {
                let edge = capacity - 1;
                match self.position {
                    Some(pos) => {
                        let tracked = (pos + 1).min(edge);
                        self.position = Some(tracked.min(len - 1));
                        tracked == edge
                    }
                    None => {
                        self.position = Some(0);
                        false
                    }
                }
            }
            CursorPolicy::FixedIndex => {
                let pos = self.position.unwrap_or(0);
                self.position = Some(pos.min(len - 1));
                false
            }
        }
    }

    /// Move one entry older (higher index)
    pub fn prev(&mut self, len: usize) -> CursorMove {
        let Some(pos) = self.guard(len) else {
            return CursorMove::Empty;
        };
        if pos + 1 > len - 1 {
            CursorMove::Boundary
        } else {
            self.position = Some(pos + 1);
            CursorMove::Moved(pos + 1)
        }
    }

    /// Move one entry newer (lower index)
    pub fn next(&mut self, len: usize) -> CursorMove {
        let Some(pos) = self.guard(len) else {
            return CursorMove::Empty;
        };
        if pos == 0 {
            CursorMove::Boundary
        } else {
            self.position = Some(pos - 1);
            CursorMove::Moved(pos - 1)
        }
    }

    /// Jump to the oldest entry
    pub fn first(&mut self, len: usize) -> CursorMove {
        if self.guard(len).is_none() {
            return CursorMove::Empty;
        }
        self.position = Some(len - 1);
        CursorMove::Moved(len - 1)
    }

    /// Jump to the newest entry
    pub fn last(&mut self, len: usize) -> CursorMove {
        if self.guard(len).is_none() {
            return CursorMove::Empty;
        }
        self.position = Some(0);
        CursorMove::Moved(0)
    }

    fn guard(&self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        // position is always set once the buffer is non-empty
        self.position.map(|pos| pos.min(len - 1))
    }
}
