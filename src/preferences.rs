//! User preferences storage
//!
//! Handles saving and loading user preferences to a JSON file in the
//! application support directory. Keys mirror the host's persisted
//! key-value names (camelCase).

use crate::history::{CursorPolicy, DEFAULT_CAPACITY, MAX_CAPACITY, MIN_CAPACITY};
use crate::search::{PositionMode, SearchMode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use tracing::{error, info};

/// Feedback after a successful clipboard copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostCopyAction {
    None,
    #[default]
    Beep,
    Speak,
    Both,
}

impl fmt::Display for PostCopyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostCopyAction::None => write!(f, "none"),
            PostCopyAction::Beep => write!(f, "beep"),
            PostCopyAction::Speak => write!(f, "speak"),
            PostCopyAction::Both => write!(f, "both"),
        }
    }
}

/// User preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Preferences {
    /// Retained history entries; takes effect when the buffer is re-created
    pub max_history_length: usize,
    /// Strip leading whitespace when copying text
    pub trim_whitespace_from_start: bool,
    /// Strip trailing whitespace when copying text
    pub trim_whitespace_from_end: bool,
    /// Feedback after a successful copy
    pub post_copy_action: PostCopyAction,
    /// Copy-confirmation beep frequency in Hz
    pub beep_frequency: u32,
    /// Copy-confirmation beep duration in milliseconds
    pub beep_duration: u32,
    /// Where the cursor moves when a new item is appended
    pub cursor_policy: CursorPolicy,
    /// Search by text or by 1-based entry index
    pub search_by: SearchMode,
    /// Position-in-string matching mode for text searches
    pub position_mode: PositionMode,
    /// Case-sensitive text matching
    pub case_sensitive: bool,
    /// Re-filter while the search query is being typed
    pub live_query: bool,
    /// Fragment selector string ("0" = all fragments)
    pub fragment_selector: String,
    /// Export a snapshot once per full buffer cycle and at shutdown
    pub auto_export: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            max_history_length: DEFAULT_CAPACITY,
            trim_whitespace_from_start: false,
            trim_whitespace_from_end: false,
            post_copy_action: PostCopyAction::Beep,
            beep_frequency: 1500,
            beep_duration: 120,
            cursor_policy: CursorPolicy::Latest,
            search_by: SearchMode::Text,
            position_mode: PositionMode::Anywhere,
            case_sensitive: false,
            live_query: false,
            fragment_selector: "0".to_string(),
            auto_export: false,
        }
    }
}

impl Preferences {
    /// Buffer capacity clamped into the supported range
    pub fn clamped_capacity(&self) -> usize {
        self.max_history_length.clamp(MIN_CAPACITY, MAX_CAPACITY)
    }
}

/// Get the preferences file path
fn preferences_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("Retrace").join("preferences.json"))
}

/// Load preferences from disk
///
/// Returns default preferences if the file doesn't exist or can't be read
pub fn load_preferences() -> Preferences {
    let Some(path) = preferences_path() else {
        return Preferences::default();
    };

    if !path.exists() {
        return Preferences::default();
    }

    match fs::read_to_string(&path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(prefs) => prefs,
            Err(e) => {
                error!("Failed to parse preferences: {}", e);
                Preferences::default()
            }
        },
        Err(e) => {
            error!("Failed to read preferences file: {}", e);
            Preferences::default()
        }
    }
}

/// Save preferences to disk
pub fn save_preferences(prefs: &Preferences) -> Result<(), PreferencesError> {
    let path = preferences_path().ok_or(PreferencesError::NoConfigDir)?;

    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
            info!("Created preferences directory: {:?}", parent);
        }
    }

    let json = serde_json::to_string_pretty(prefs)?;
    fs::write(&path, json)?;
    info!("Saved preferences to: {:?}", path);

    Ok(())
}

/// Preferences errors
#[derive(Debug, thiserror::Error)]
pub enum PreferencesError {
    #[error("Could not find config directory")]
    NoConfigDir,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
