use thiserror::Error;

/// Invalid user input
///
/// Reported through a blocking message, no state mutated. Boundary hits and
/// empty-buffer requests are deliberately not errors; the session signals or
/// silently ignores those.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("Index {index} is out of range (history holds {len} items)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid fragment selector '{0}'")]
    InvalidSelector(String),

    #[error("Export name is empty")]
    EmptyFilename,

    #[error("Export name contains forbidden character {ch:?}")]
    ForbiddenFilenameChar { ch: char },
}

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Export failed: {0}")]
    Export(#[from] crate::export::ExportError),

    #[error("Preferences error: {0}")]
    Preferences(#[from] crate::preferences::PreferencesError),

    #[error("Gesture error: {0}")]
    Gesture(#[from] crate::gestures::GestureError),
}
