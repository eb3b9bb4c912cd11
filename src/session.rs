//! Plugin session: the single owner of all review state
//!
//! One `SpeechSession` is constructed when the plugin loads and owns the
//! history buffer, cursor, recorder, preferences and lifetime counters.
//! The installed speak hook feeds it; user gestures drive it. Appends are
//! deferred: the hook only enqueues, and the host's function queue calls
//! [`SpeechSession::pump`] once the speech dispatch that produced the
//! entries has completed.

use crate::error::ValidationError;
use crate::export::{self, ExportError, ExportKind};
use crate::gestures::Command;
use crate::history::{HistoryBuffer, HistoryEntry, NavOutcome};
use crate::host::SpeechHost;
use crate::preferences::{PostCopyAction, Preferences};
use crate::recorder::{Recorder, RecorderEvent};
use crate::search::{self, FragmentSelector, SearchMatch, SearchQuery};
use crate::sequence::SpeechSequence;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Tone played when prev/next runs out of history
const BOUNDARY_TONE: (u32, u32) = (200, 100);

/// Tone confirming a jump to the first or last entry
const CONFIRM_TONE: (u32, u32) = (880, 60);

/// Warning when the context-tracked entry reaches the edge of the window
const EDGE_WARNING_TONE: (u32, u32) = (110, 150);

/// How a gesture command was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The session handled it
    Handled,
    /// The caller owns the search UI and should open it now
    OpenSearchRequested,
}

/// Review session over the host's speech stream
pub struct SpeechSession {
    host: Arc<dyn SpeechHost + Send + Sync>,
    prefs: Preferences,
    buffer: HistoryBuffer,
    recorder: Recorder,
    /// Deferred append queue, drained by the host's function queue
    pending: VecDeque<SpeechSequence>,
    viewer_active: bool,
    lifetime_appended: u64,
    last_spoken_text: String,
    exports_base: Option<PathBuf>,
}

impl SpeechSession {
    pub fn new(host: Arc<dyn SpeechHost + Send + Sync>, prefs: Preferences) -> Self {
        let capacity = prefs.clamped_capacity();
        host.register_settings_panel();
        info!("Speech history session ready, capacity {}", capacity);
        Self {
            host,
            prefs,
            buffer: HistoryBuffer::with_capacity(capacity),
            recorder: Recorder::new(),
            pending: VecDeque::new(),
            viewer_active: false,
            lifetime_appended: 0,
            last_spoken_text: String::new(),
            exports_base: export::exports_dir(),
        }
    }

    /// Override the export location (default: the documents folder)
    pub fn set_exports_base(&mut self, base: PathBuf) {
        self.exports_base = Some(base);
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn history_len(&self) -> usize {
        self.buffer.len()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.buffer.cursor()
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.is_active()
    }

    /// Most recent flattened text, updated even when the buffer is bypassed
    pub fn last_spoken_text(&self) -> &str {
        &self.last_spoken_text
    }

    /// Suppress appends while a viewer UI is focused, so the host speaking
    /// the viewer's own labels cannot feed back into history.
    pub fn set_viewer_active(&mut self, active: bool) {
        self.viewer_active = active;
    }

    // -- speak interception path --

    /// Called by the installed hook, after the original speak has run.
    ///
    /// Flattens synchronously; the buffer mutation itself waits in the
    /// deferred queue until [`pump`](Self::pump).
    pub fn enqueue_spoken(&mut self, sequence: &SpeechSequence) {
        let text = sequence.flatten();
        if text.is_empty() {
            return;
        }
        self.last_spoken_text = text;
        if self.viewer_active {
            debug!("Viewer focused, spoken entry suppressed");
            return;
        }
        self.pending.push_back(sequence.clone());
    }

    /// Called by the legacy spell hook; spelled text never enters history
    pub fn note_spelled(&mut self, text: &str) {
        if !text.is_empty() {
            self.last_spoken_text = text.to_string();
        }
    }

    /// Drain the deferred append queue; returns how many entries landed
    pub fn pump(&mut self) -> usize {
        let mut drained = 0;
        while let Some(sequence) = self.pending.pop_front() {
            self.apply_append(sequence);
            drained += 1;
        }
        drained
    }

    fn apply_append(&mut self, sequence: SpeechSequence) {
        let text = sequence.flatten();
        self.lifetime_appended += 1;
        let entry = HistoryEntry {
            sequence,
            inserted_at: self.lifetime_appended,
        };
        let outcome = self.buffer.append(entry, self.prefs.cursor_policy);
        if outcome.edge_warning {
            self.host.play_tone(EDGE_WARNING_TONE.0, EDGE_WARNING_TONE.1);
        }
        self.recorder.observe(&text);
        if self.prefs.auto_export
            && self.lifetime_appended % self.buffer.capacity() as u64 == 0
        {
            self.run_auto_export(self.buffer.len());
        }
    }

    // -- review navigation --

    /// Review the previous (older) item
    pub fn review_prev(&mut self) {
        let host = Arc::clone(&self.host);
        match self.buffer.prev() {
            NavOutcome::Moved(entry) => host.vocalize(&entry.sequence),
            NavOutcome::Boundary => host.play_tone(BOUNDARY_TONE.0, BOUNDARY_TONE.1),
            NavOutcome::Empty => {}
        }
    }

    /// Review the next (newer) item
    pub fn review_next(&mut self) {
        let host = Arc::clone(&self.host);
        match self.buffer.next() {
            NavOutcome::Moved(entry) => host.vocalize(&entry.sequence),
            NavOutcome::Boundary => host.play_tone(BOUNDARY_TONE.0, BOUNDARY_TONE.1),
            NavOutcome::Empty => {}
        }
    }

    /// Jump to the oldest item
    pub fn review_first(&mut self) {
        let host = Arc::clone(&self.host);
        if let NavOutcome::Moved(entry) = self.buffer.first() {
            host.play_tone(CONFIRM_TONE.0, CONFIRM_TONE.1);
            host.vocalize(&entry.sequence);
        }
    }

    /// Jump to the newest item
    pub fn review_last(&mut self) {
        let host = Arc::clone(&self.host);
        if let NavOutcome::Moved(entry) = self.buffer.last() {
            host.play_tone(CONFIRM_TONE.0, CONFIRM_TONE.1);
            host.vocalize(&entry.sequence);
        }
    }

    // -- copy --

    /// Copy the item under the cursor (the newest, unless reviewing)
    pub fn copy_current(&self) {
        let Some(entry) = self.buffer.current() else {
            return;
        };
        let mut text = entry.sequence.flatten();
        if self.prefs.trim_whitespace_from_start {
            text = text.trim_start().to_string();
        }
        if self.prefs.trim_whitespace_from_end {
            text = text.trim_end().to_string();
        }
        info!("Copying history item at position {:?}", self.buffer.cursor());
        if self.host.copy_to_clipboard(&text) {
            match self.prefs.post_copy_action {
                PostCopyAction::None => {}
                PostCopyAction::Beep => self
                    .host
                    .play_tone(self.prefs.beep_frequency, self.prefs.beep_duration),
                PostCopyAction::Speak => self.host.notify("Copied"),
                PostCopyAction::Both => {
                    self.host
                        .play_tone(self.prefs.beep_frequency, self.prefs.beep_duration);
                    self.host.notify("Copied");
                }
            }
        }
    }

    // -- recording --

    pub fn start_recording(&mut self) {
        match self.recorder.start() {
            RecorderEvent::Started => self.host.notify("Recording started"),
            RecorderEvent::AlreadyActive => self.host.notify("Already recording"),
            _ => {}
        }
    }

    pub fn stop_recording(&mut self) {
        match self.recorder.stop() {
            RecorderEvent::Stopped(text) => {
                self.host.copy_to_clipboard(&text);
                self.host.notify("Recording stopped");
            }
            RecorderEvent::NotActive => self.host.notify("Not recording"),
            _ => {}
        }
    }

    // -- search --

    /// Filter history with the configured search preferences.
    ///
    /// Entries are scanned newest-first; match indices refer to that order.
    pub fn search(&self, raw_query: &str) -> Result<Vec<SearchMatch>, ValidationError> {
        let query = SearchQuery {
            query: raw_query.to_string(),
            mode: self.prefs.search_by,
            case_sensitive: self.prefs.case_sensitive,
            position: self.prefs.position_mode,
            fragments: FragmentSelector::parse(&self.prefs.fragment_selector)?,
        };
        let sequences: Vec<&SpeechSequence> =
            self.buffer.iter().map(|e| &e.sequence).collect();
        search::search(&sequences, &query)
    }

    // -- export --

    /// User-triggered export of the whole buffer under a chosen name
    pub fn export_named(&self, name: &str) -> Result<PathBuf, ExportError> {
        let texts: Vec<String> = self
            .buffer
            .iter_oldest_first()
            .map(|e| e.sequence.flatten())
            .collect();
        self.write_export(&texts, &ExportKind::Named(name.to_string()))
    }

    /// Export the newest `count` entries, oldest first in the document
    fn run_auto_export(&self, count: usize) {
        let mut texts: Vec<String> = self
            .buffer
            .iter()
            .take(count)
            .map(|e| e.sequence.flatten())
            .collect();
        texts.reverse();
        match self.write_export(&texts, &ExportKind::Automatic) {
            Ok(path) => info!("Automatic history export written: {:?}", path),
            Err(e) => {
                error!("Automatic history export failed: {}", e);
                self.host.show_message(&e.to_string(), "History export failed");
            }
        }
    }

    fn write_export(&self, texts: &[String], kind: &ExportKind) -> Result<PathBuf, ExportError> {
        let base = self
            .exports_base
            .clone()
            .ok_or(ExportError::NoDocumentsDir)?;
        export::write_export(
            &base,
            texts,
            self.buffer.capacity(),
            self.lifetime_appended,
            kind,
        )
    }

    // -- policy / dispatch / teardown --

    /// Cycle the append-time cursor policy and announce the new one
    pub fn toggle_cursor_policy(&mut self) {
        self.prefs.cursor_policy = self.prefs.cursor_policy.next();
        info!("Cursor policy now {}", self.prefs.cursor_policy);
        self.host
            .notify(&format!("Cursor policy: {}", self.prefs.cursor_policy));
    }

    /// Resolve a gesture command
    pub fn handle_command(&mut self, command: Command) -> CommandOutcome {
        match command {
            Command::CopyLast => self.copy_current(),
            Command::Prev => self.review_prev(),
            Command::Next => self.review_next(),
            Command::First => self.review_first(),
            Command::Last => self.review_last(),
            Command::ToggleCursorPolicy => self.toggle_cursor_policy(),
            Command::StartRecording => self.start_recording(),
            Command::StopRecording => self.stop_recording(),
            Command::OpenSearch => return CommandOutcome::OpenSearchRequested,
        }
        CommandOutcome::Handled
    }

    /// Close the session: drain the queue, write any partial-cycle export,
    /// and discard an active recording unflushed.
    pub fn shutdown(&mut self) {
        self.pump();
        if self.prefs.auto_export {
            let remainder =
                (self.lifetime_appended % self.buffer.capacity() as u64) as usize;
            if remainder > 0 {
                self.run_auto_export(remainder.min(self.buffer.len()));
            }
        }
        if self.recorder.is_active() {
            warn!("Session closing with an active recording; contents discarded");
        }
        self.host.unregister_settings_panel();
        info!("Session closed after {} appends", self.lifetime_appended);
    }
}
