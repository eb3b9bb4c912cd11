//! Host integration layer
//!
//! The screen-reading host owns speech output, tones, the clipboard and all
//! dialogs; the core only calls through this boundary. `SpeechHost` is the
//! outbound surface, `SpeakHook` the inbound speak interception.

mod clipboard;
mod hook;

pub use hook::{HookStyle, HostVersion, SpeakFn, SpeakHook, SpellFn};

use crate::sequence::SpeechSequence;
use tracing::info;

/// Outbound host services
pub trait SpeechHost {
    /// Speak a sequence directly, bypassing the installed history hook.
    ///
    /// Used for review playback so reviewing never re-appends into history.
    fn vocalize(&self, sequence: &SpeechSequence);

    /// Play an audible tone
    fn play_tone(&self, frequency_hz: u32, duration_ms: u32);

    /// Write text to the host clipboard, reporting success
    fn copy_to_clipboard(&self, text: &str) -> bool;

    /// Speak a short notice (not stored in history)
    fn notify(&self, text: &str);

    /// Show a blocking message dialog
    fn show_message(&self, text: &str, caption: &str);

    /// Add the plugin's settings panel to the host settings dialog
    fn register_settings_panel(&self) {}

    /// Remove the settings panel again at teardown
    fn unregister_settings_panel(&self) {}
}

/// Desktop host for the review harness
///
/// Backs the clipboard with the system clipboard; speech and dialogs are
/// printed, tones logged.
#[derive(Debug, Default)]
pub struct DesktopHost;

impl SpeechHost for DesktopHost {
    fn vocalize(&self, sequence: &SpeechSequence) {
        println!("{}", sequence.flatten());
    }

    fn play_tone(&self, frequency_hz: u32, duration_ms: u32) {
        info!("Tone: {} Hz for {} ms", frequency_hz, duration_ms);
    }

    fn copy_to_clipboard(&self, text: &str) -> bool {
        clipboard::copy_to_clipboard(text)
    }

    fn notify(&self, text: &str) {
        println!("{text}");
    }

    fn show_message(&self, text: &str, caption: &str) {
        println!("[{caption}] {text}");
    }

    fn register_settings_panel(&self) {
        info!("Settings panel registered");
    }

    fn unregister_settings_panel(&self) {
        info!("Settings panel removed");
    }
}
