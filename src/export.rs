//! History export to disk
//!
//! Writes a snapshot of history texts as a structured JSON document, one
//! file per export event. Automatic periodic exports and user-named exports
//! land in separate subdirectories. The document is serialized fully in
//! memory and written with a single call, so a failed export leaves no
//! partial file behind.

use crate::error::ValidationError;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Characters rejected in user-supplied export names
pub const FORBIDDEN_FILENAME_CHARS: &[char] =
    &['\t', '/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// The serialized export record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDocument {
    /// Creation date/time, RFC 3339
    pub created: String,
    /// Configured buffer capacity at export time
    pub capacity: usize,
    /// Number of entries in this file
    pub exported: usize,
    /// Entries appended over the whole session so far
    pub lifetime_total: u64,
    /// Per-entry flattened text, oldest first
    pub history: Vec<String>,
}

/// Which subdirectory an export lands in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportKind {
    /// Periodic export, triggered once per full buffer cycle
    Automatic,
    /// User-triggered export with a chosen name
    Named(String),
}

impl ExportKind {
    fn subdir(&self) -> &'static str {
        match self {
            ExportKind::Automatic => "auto",
            ExportKind::Named(_) => "named",
        }
    }
}

/// Default export directory under the user's documents folder
pub fn exports_dir() -> Option<PathBuf> {
    dirs::document_dir().map(|d| d.join("Retrace").join("exports"))
}

/// Reject names containing path-special characters or tabs
pub fn validate_export_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyFilename);
    }
    if let Some(ch) = name.chars().find(|c| FORBIDDEN_FILENAME_CHARS.contains(c)) {
        return Err(ValidationError::ForbiddenFilenameChar { ch });
    }
    Ok(())
}

/// Export to the default documents location
pub fn export(
    texts: &[String],
    capacity: usize,
    lifetime_total: u64,
    kind: &ExportKind,
) -> Result<PathBuf, ExportError> {
    let base = exports_dir().ok_or(ExportError::NoDocumentsDir)?;
    write_export(&base, texts, capacity, lifetime_total, kind)
}

/// Export under an explicit base directory
///
/// Returns the path of the written file.
pub fn write_export(
    base: &Path,
    texts: &[String],
    capacity: usize,
    lifetime_total: u64,
    kind: &ExportKind,
) -> Result<PathBuf, ExportError> {
    if let ExportKind::Named(name) = kind {
        validate_export_name(name)?;
    }

    let dir = base.join(kind.subdir());
    if !dir.exists() {
        fs::create_dir_all(&dir).map_err(|e| ExportError::CreateDirectory {
            path: dir.clone(),
            source: e,
        })?;
        info!("Created export directory: {:?}", dir);
    }

    let timestamp = Local::now().format("%Y-%m-%d-%H-%M-%S");
    let filename = match kind {
        ExportKind::Automatic => format!("history-{}-{}-items.json", timestamp, texts.len()),
        ExportKind::Named(name) => format!("{}-{}.json", name.trim(), timestamp),
    };

    let document = ExportDocument {
        created: Local::now().to_rfc3339(),
        capacity,
        exported: texts.len(),
        lifetime_total,
        history: texts.to_vec(),
    };
    let json = serde_json::to_string_pretty(&document)?;

    let path = dir.join(filename);
    fs::write(&path, json).map_err(|e| ExportError::WriteFile {
        path: path.clone(),
        source: e,
    })?;

    info!("Exported {} history entries to: {:?}", texts.len(), path);
    Ok(path)
}

/// Export errors with contextual information
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Could not find Documents directory")]
    NoDocumentsDir,

    #[error(transparent)]
    InvalidName(#[from] ValidationError),

    #[error("Failed to create directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write to file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize export document: {0}")]
    Serialize(#[from] serde_json::Error),
}
