//! File access capability injected into the curation session.
//!
//! The engine never touches a concrete filesystem. It reads and writes UTF-8
//! text through [`ScriptRepository`], which has a std-filesystem
//! implementation ([`FsRepository`]) and an in-memory one
//! ([`MemoryRepository`]) for tests and embedding.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::error::{CuratorError, CuratorResult};

/// Text-file capabilities the session depends on.
pub trait ScriptRepository {
    /// Reads a whole file as UTF-8 text.
    fn read_text(&self, path: &Path) -> CuratorResult<String>;

    /// Replaces a file's contents with `text`.
    fn write_text(&self, path: &Path, text: &str) -> CuratorResult<()>;

    /// Returns true if a file or directory exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Lists the entry names directly inside a directory.
    fn list_dir(&self, path: &Path) -> CuratorResult<Vec<String>>;
}

// =============================================================================
// FILESYSTEM
// =============================================================================

/// Repository backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsRepository;

impl FsRepository {
    pub fn new() -> Self {
        Self
    }
}

impl ScriptRepository for FsRepository {
    fn read_text(&self, path: &Path) -> CuratorResult<String> {
        std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CuratorError::not_found(path),
            _ => CuratorError::io(path, e),
        })
    }

    fn write_text(&self, path: &Path, text: &str) -> CuratorResult<()> {
        std::fs::write(path, text).map_err(|e| CuratorError::io(path, e))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn list_dir(&self, path: &Path) -> CuratorResult<Vec<String>> {
        let entries = std::fs::read_dir(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CuratorError::not_found(path),
            _ => CuratorError::io(path, e),
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CuratorError::io(path, e))?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }
}

// =============================================================================
// IN-MEMORY
// =============================================================================

/// Repository holding files in a map keyed by path.
///
/// Directories are implicit: a path exists as a directory when some file
/// lives beneath it.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    files: RefCell<BTreeMap<PathBuf, String>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: Add a file.
    pub fn with_file(self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        self.files.borrow_mut().insert(path.into(), text.into());
        self
    }

    /// Returns a copy of a file's current contents.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.borrow().get(path.as_ref()).cloned()
    }
}

impl ScriptRepository for MemoryRepository {
    fn read_text(&self, path: &Path) -> CuratorResult<String> {
        self.get(path).ok_or_else(|| CuratorError::not_found(path))
    }

    fn write_text(&self, path: &Path, text: &str) -> CuratorResult<()> {
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), text.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files
            .borrow()
            .keys()
            .any(|key| key == path || key.starts_with(path))
    }

    fn list_dir(&self, path: &Path) -> CuratorResult<Vec<String>> {
        let files = self.files.borrow();
        let names: BTreeSet<String> = files
            .keys()
            .filter_map(|key| key.strip_prefix(path).ok())
            .filter_map(|rest| rest.components().next())
            .map(|first| first.as_os_str().to_string_lossy().into_owned())
            .collect();

        if names.is_empty() {
            return Err(CuratorError::not_found(path));
        }
        Ok(names.into_iter().collect())
    }
}

// =============================================================================
// TESTS
// =============================================================================
