//! Gesture surface: key bindings mapped to review commands
//!
//! Bindings are configuration, not core logic: the defaults ship in the
//! embedded `config.toml` and any binding can be replaced at runtime. The
//! host (or harness) resolves a pressed hotkey to a [`Command`] and hands it
//! to the session.

use global_hotkey::hotkey::HotKey;
use serde::Deserialize;
use std::fmt;
use tracing::info;

/// User commands reachable through gestures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    CopyLast,
    Prev,
    Next,
    First,
    Last,
    ToggleCursorPolicy,
    StartRecording,
    StopRecording,
    OpenSearch,
}

impl Command {
    pub const ALL: [Command; 9] = [
        Command::CopyLast,
        Command::Prev,
        Command::Next,
        Command::First,
        Command::Last,
        Command::ToggleCursorPolicy,
        Command::StartRecording,
        Command::StopRecording,
        Command::OpenSearch,
    ];
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Command::CopyLast => "copy-last",
            Command::Prev => "prev",
            Command::Next => "next",
            Command::First => "first",
            Command::Last => "last",
            Command::ToggleCursorPolicy => "toggle-cursor-policy",
            Command::StartRecording => "start-recording",
            Command::StopRecording => "stop-recording",
            Command::OpenSearch => "open-search",
        };
        write!(f, "{name}")
    }
}

/// Default bindings embedded at compile time
const DEFAULT_BINDINGS: &str = include_str!("../config.toml");

#[derive(Deserialize)]
struct EmbeddedConfig {
    gestures: GestureDefaults,
}

#[derive(Deserialize)]
struct GestureDefaults {
    copy_last: String,
    prev: String,
    next: String,
    first: String,
    last: String,
    toggle_cursor_policy: String,
    start_recording: String,
    stop_recording: String,
    open_search: String,
}

/// Hotkey-to-command map
pub struct GestureMap {
    bindings: Vec<(HotKey, Command)>,
}

impl GestureMap {
    /// Build the map from the embedded default bindings
    pub fn defaults() -> Result<Self, GestureError> {
        let config: EmbeddedConfig = toml::from_str(DEFAULT_BINDINGS)?;
        let g = &config.gestures;
        let mut map = Self {
            bindings: Vec::with_capacity(Command::ALL.len()),
        };
        for (binding, command) in [
            (&g.copy_last, Command::CopyLast),
            (&g.prev, Command::Prev),
            (&g.next, Command::Next),
            (&g.first, Command::First),
            (&g.last, Command::Last),
            (&g.toggle_cursor_policy, Command::ToggleCursorPolicy),
            (&g.start_recording, Command::StartRecording),
            (&g.stop_recording, Command::StopRecording),
            (&g.open_search, Command::OpenSearch),
        ] {
            map.bind(binding, command)?;
        }
        info!("Gesture map loaded with {} bindings", map.bindings.len());
        Ok(map)
    }

    /// Bind (or rebind) a command to a key combination like "Shift+F11"
    pub fn bind(&mut self, binding: &str, command: Command) -> Result<(), GestureError> {
        let hotkey: HotKey = binding.parse().map_err(|e| GestureError::BadBinding {
            binding: binding.to_string(),
            command,
            source: e,
        })?;
        self.bindings.retain(|(_, c)| *c != command);
        self.bindings.push((hotkey, command));
        Ok(())
    }

    /// Resolve a pressed hotkey to its command
    pub fn command_for(&self, hotkey: &HotKey) -> Option<Command> {
        self.bindings
            .iter()
            .find(|(h, _)| h.id() == hotkey.id())
            .map(|(_, c)| *c)
    }

    /// Current bindings
    pub fn iter(&self) -> impl Iterator<Item = (&HotKey, Command)> {
        self.bindings.iter().map(|(h, c)| (h, *c))
    }
}

/// Gesture map errors
#[derive(Debug, thiserror::Error)]
pub enum GestureError {
    #[error("Invalid embedded gesture config: {0}")]
    BadConfig(#[from] toml::de::Error),

    #[error("Unparseable key binding '{binding}' for {command}: {source}")]
    BadBinding {
        binding: String,
        command: Command,
        #[source]
        source: global_hotkey::hotkey::HotKeyParseError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_every_command() {
        let map = GestureMap::defaults().unwrap();
        for command in Command::ALL {
            assert!(
                map.iter().any(|(_, c)| c == command),
                "no binding for {command}"
            );
        }
    }

    #[test]
    fn test_lookup_by_hotkey() {
        let map = GestureMap::defaults().unwrap();
        let hotkey: HotKey = "Shift+F11".parse().unwrap();
        assert_eq!(map.command_for(&hotkey), Some(Command::Prev));
        let unbound: HotKey = "Control+Alt+F1".parse().unwrap();
        assert_eq!(map.command_for(&unbound), None);
    }

    #[test]
    fn test_rebind_replaces_old_binding() {
        let mut map = GestureMap::defaults().unwrap();
        map.bind("Control+F6", Command::Prev).unwrap();
        let new: HotKey = "Control+F6".parse().unwrap();
        let old: HotKey = "Shift+F11".parse().unwrap();
        assert_eq!(map.command_for(&new), Some(Command::Prev));
        assert_eq!(map.command_for(&old), None);
    }

    #[test]
    fn test_bad_binding_is_rejected() {
        let mut map = GestureMap::defaults().unwrap();
        assert!(map.bind("NotAKey+Q", Command::Prev).is_err());
    }
}
