//! Session-scoped recording of spoken text
//!
//! While a recording is active, every text that lands in the history buffer
//! is also collected here. Stopping joins the collected lines and hands them
//! back for a single clipboard write. A recording that is still active when
//! the owning session is torn down is discarded, not flushed.

use tracing::info;

/// What a start/stop request did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderEvent {
    /// Recording is now active
    Started,
    /// Start requested while already recording; nothing changed
    AlreadyActive,
    /// Recording stopped; the newline-joined text collected while active
    Stopped(String),
    /// Stop requested while not recording; nothing changed
    NotActive,
}

/// Accumulator for one recording session
#[derive(Debug, Default)]
pub struct Recorder {
    active: bool,
    items: Vec<String>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Number of lines collected so far
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn start(&mut self) -> RecorderEvent {
        if self.active {
            return RecorderEvent::AlreadyActive;
        }
        self.active = true;
        info!("Recording started");
        RecorderEvent::Started
    }

    /// Collect one flattened text; ignored while inactive
    pub fn observe(&mut self, text: &str) {
        if self.active {
            self.items.push(text.to_string());
        }
    }

    pub fn stop(&mut self) -> RecorderEvent {
        if !self.active {
            return RecorderEvent::NotActive;
        }
        self.active = false;
        let joined = self.items.join("\n");
        self.items.clear();
        info!("Recording stopped, {} chars collected", joined.len());
        RecorderEvent::Stopped(joined)
    }
}
