#![deny(clippy::all)]

//! Bounded, navigable history of recently spoken text for assistive
//! screen-reading hosts.
//!
//! The host's speak entry point is wrapped (never suppressed) so every
//! non-empty utterance lands in a fixed-capacity, newest-first buffer. A
//! review cursor navigates it with audible boundary feedback, a linear
//! search layer filters it, a recorder collects spoken text for a single
//! clipboard flush, and snapshots can be exported to disk as JSON.
//!
//! All state lives in one [`session::SpeechSession`]; the host is reached
//! only through the [`host::SpeechHost`] trait.

pub mod error;
pub mod export;
pub mod gestures;
pub mod history;
pub mod host;
pub mod preferences;
pub mod recorder;
pub mod search;
pub mod sequence;
pub mod session;

pub use error::{AppError, ValidationError};
pub use history::{CursorPolicy, HistoryBuffer, HistoryEntry};
pub use host::{DesktopHost, HookStyle, HostVersion, SpeakFn, SpeakHook, SpeechHost};
pub use preferences::{PostCopyAction, Preferences};
pub use search::{PositionMode, SearchMatch, SearchMode};
pub use sequence::{ControlMarker, SpeechElement, SpeechSequence, FRAGMENT_SEPARATOR};
pub use session::{CommandOutcome, SpeechSession};
