//! Clipboard backing for the desktop host
//!
//! Handles copying history text to the system clipboard.

use arboard::Clipboard;
use tracing::{error, info};

/// Copy text to clipboard, reporting success
pub(crate) fn copy_to_clipboard(text: &str) -> bool {
    if text.is_empty() {
        info!("Nothing to copy (empty text)");
        return false;
    }
    match Clipboard::new() {
        Ok(mut clipboard) => match clipboard.set_text(text) {
            Ok(_) => {
                info!("Copied to clipboard ({} chars)", text.len());
                true
            }
            Err(e) => {
                error!("Failed to copy to clipboard: {}", e);
                false
            }
        },
        Err(e) => {
            error!("Failed to initialize clipboard: {}", e);
            false
        }
    }
}
