//! Speak hook installation
//!
//! The host's speak entry point is wrapped, never replaced: the returned
//! function calls the original unconditionally first, so real speech is
//! never suppressed, then hands the sequence to the session for deferred
//! appending. `uninstall` gives the original back so the host can restore
//! it at teardown.

use crate::sequence::SpeechSequence;
use crate::session::SpeechSession;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// The host's speak entry point
pub type SpeakFn = Arc<dyn Fn(&SpeechSequence) + Send + Sync>;

/// The legacy host's spell entry point
pub type SpellFn = Arc<dyn Fn(&str) + Send + Sync>;

/// Where the host exposes its speech functions
///
/// Older hosts publish a single module-level speak function; newer ones
/// moved it into a namespaced speech API. The style is detected once at
/// startup, not re-checked per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStyle {
    Legacy,
    Namespaced,
}

/// Detected host version, e.g. 2021.1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct HostVersion {
    pub year: u16,
    pub major: u8,
}

/// First host version with the namespaced speech API
const NAMESPACED_SINCE: HostVersion = HostVersion {
    year: 2021,
    major: 1,
};

impl HostVersion {
    pub fn new(year: u16, major: u8) -> Self {
        Self { year, major }
    }

    /// Which hook style this host wants
    pub fn hook_style(self) -> HookStyle {
        if self >= NAMESPACED_SINCE {
            HookStyle::Namespaced
        } else {
            HookStyle::Legacy
        }
    }
}

/// Install/uninstall contract for the speech entry points
///
/// Holds the originals while installed so they can be restored.
pub struct SpeakHook {
    style: HookStyle,
    original_speak: Option<SpeakFn>,
    original_spell: Option<SpellFn>,
}

impl SpeakHook {
    pub fn new(style: HookStyle) -> Self {
        Self {
            style,
            original_speak: None,
            original_spell: None,
        }
    }

    pub fn style(&self) -> HookStyle {
        self.style
    }

    pub fn is_installed(&self) -> bool {
        self.original_speak.is_some()
    }

    /// Wrap the host's speak function.
    ///
    /// The returned function calls `original` first, then lets the session
    /// enqueue the sequence for appending after the dispatch completes.
    pub fn install(
        &mut self,
        original: SpeakFn,
        session: &Arc<Mutex<SpeechSession>>,
    ) -> SpeakFn {
        if self.original_speak.is_some() {
            warn!("Speak hook already installed, replacing");
        }
        info!("Installing speak hook ({:?} style)", self.style);
        self.original_speak = Some(original.clone());
        let session = Arc::clone(session);
        Arc::new(move |sequence: &SpeechSequence| {
            original(sequence);
            if let Ok(mut session) = session.lock() {
                session.enqueue_spoken(sequence);
            }
        })
    }

    /// Wrap the legacy host's spell function.
    ///
    /// Spelled text only updates the last-spoken tracker; it never enters
    /// the history buffer.
    pub fn install_spell(
        &mut self,
        original: SpellFn,
        session: &Arc<Mutex<SpeechSession>>,
    ) -> SpellFn {
        info!("Installing spell hook");
        self.original_spell = Some(original.clone());
        let session = Arc::clone(session);
        Arc::new(move |text: &str| {
            original(text);
            if let Ok(mut session) = session.lock() {
                session.note_spelled(text);
            }
        })
    }

    /// Give back the original speak function for the host to restore
    pub fn uninstall(&mut self) -> Option<SpeakFn> {
        if self.original_speak.is_some() {
            info!("Uninstalling speak hook");
        }
        self.original_speak.take()
    }

    /// Give back the original spell function
    pub fn uninstall_spell(&mut self) -> Option<SpellFn> {
        self.original_spell.take()
    }
}
