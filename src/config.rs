//! Curation configuration and the on-disk layout of a script directory.
//!
//! Every script lives in its own directory under the script root:
//!
//! ```text
//! <root>/<id>/script.json          source transcript (read-only)
//! <root>/<id>/slide_matches.json   precomputed match candidates (read-only)
//! <root>/<id>/script_edited.json   saved assignments
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CuratorResult;

/// File name of the source transcript.
pub const SCRIPT_FILE: &str = "script.json";

/// File name of the precomputed slide matches.
pub const SLIDE_MATCHES_FILE: &str = "slide_matches.json";

/// File name of the persisted, hand-edited document.
pub const EDITED_FILE: &str = "script_edited.json";

/// Default root directory holding one sub-directory per script.
pub const DEFAULT_SCRIPT_ROOT: &str = "../output";

// =============================================================================
// CURATOR CONFIG
// =============================================================================

/// Settings shared by the session and the command-line front end.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CuratorConfig {
    /// Directory containing one sub-directory per script id.
    pub script_root: PathBuf,

    /// Prefix joined onto every `slide_file` read from the match list.
    pub slide_image_prefix: String,

    /// Directory entries never offered as scripts (e.g. `.DS_Store`).
    pub ignored_entries: Vec<String>,
}

impl Default for CuratorConfig {
    fn default() -> Self {
        Self {
            script_root: PathBuf::from(DEFAULT_SCRIPT_ROOT),
            slide_image_prefix: String::new(),
            ignored_entries: vec![".DS_Store".to_string()],
        }
    }
}

impl CuratorConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON. Missing keys take their defaults.
    pub fn from_json_str(raw: &str) -> CuratorResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Builder: Set the script root.
    pub fn with_script_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.script_root = root.into();
        self
    }

    /// Builder: Set the slide image prefix.
    pub fn with_slide_image_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.slide_image_prefix = prefix.into();
        self
    }

    /// Builder: Add an ignored directory entry.
    pub fn with_ignored_entry(mut self, entry: impl Into<String>) -> Self {
        self.ignored_entries.push(entry.into());
        self
    }

    /// Returns true if a directory entry should never be listed as a script.
    pub fn is_ignored(&self, entry: &str) -> bool {
        self.ignored_entries.iter().any(|e| e == entry)
    }

    /// Returns the file layout of the given script.
    pub fn layout(&self, script_id: &str) -> ScriptLayout {
        ScriptLayout::new(&self.script_root, script_id)
    }
}

// =============================================================================
// SCRIPT LAYOUT
// =============================================================================

/// Paths of the three files belonging to one script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLayout {
    dir: PathBuf,
}

impl ScriptLayout {
    /// Creates the layout for `<root>/<script_id>`.
    pub fn new(root: &Path, script_id: &str) -> Self {
        Self {
            dir: root.join(script_id),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn script_path(&self) -> PathBuf {
        self.dir.join(SCRIPT_FILE)
    }

    pub fn slide_matches_path(&self) -> PathBuf {
        self.dir.join(SLIDE_MATCHES_FILE)
    }

    pub fn edited_path(&self) -> PathBuf {
        self.dir.join(EDITED_FILE)
    }
}

// =============================================================================
// TESTS
// =============================================================================
