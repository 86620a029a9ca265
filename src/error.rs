//! Error types for the slide curation engine.

use std::path::Path;

use thiserror::Error;

/// Result type alias for curation operations.
pub type CuratorResult<T> = Result<T, CuratorError>;

/// Errors that can occur while reading, editing or saving a script.
///
/// Malformed JSON never shows up here: the conversion engine logs it and
/// treats it as empty content. These variants cover I/O and caller mistakes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CuratorError {
    /// A repository read, write or listing failed.
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    /// A file or directory the operation needs does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The script directory lacks `script.json` or `slide_matches.json`.
    #[error("Script not eligible for editing: {0}")]
    ScriptNotEligible(String),

    /// An operation needed an open script but none is selected.
    #[error("No script selected")]
    NoScriptSelected,

    /// A paragraph id did not resolve to a paragraph.
    #[error("Paragraph not found: {0}")]
    ParagraphNotFound(i64),

    /// A split range does not lie within the paragraph text.
    #[error("Invalid split: offset {index} outside text of {length} characters")]
    InvalidSplit { index: usize, length: usize },

    /// Serialization error while producing JSON output.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CuratorError {
    /// Creates an Io error for the given path.
    pub fn io(path: impl AsRef<Path>, err: impl std::fmt::Display) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            message: err.to_string(),
        }
    }

    /// Creates a NotFound error.
    pub fn not_found(path: impl AsRef<Path>) -> Self {
        Self::NotFound(path.as_ref().display().to_string())
    }

    /// Creates a ScriptNotEligible error.
    pub fn script_not_eligible(id: impl Into<String>) -> Self {
        Self::ScriptNotEligible(id.into())
    }

    /// Creates a ParagraphNotFound error.
    pub fn paragraph_not_found(id: i64) -> Self {
        Self::ParagraphNotFound(id)
    }

    /// Creates an InvalidSplit error.
    pub fn invalid_split(index: usize, length: usize) -> Self {
        Self::InvalidSplit { index, length }
    }
}

impl From<serde_json::Error> for CuratorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
