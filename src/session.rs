//! Curation session: script discovery, loading and saving.
//!
//! Loading is split so the file reads can happen away from the editor:
//!
//! 1. [`CurationSession::select_script`] resets the editor and returns a
//!    [`LoadTicket`] naming the script.
//! 2. [`CurationSession::fetch`] reads and converts the files. It does not
//!    touch editor state, and any read error aborts the whole load.
//! 3. [`CurationSession::apply`] hands the result to the editor, unless the
//!    user selected another script in the meantime.
//!
//! [`CurationSession::open_script`] runs all three in sequence.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::CuratorConfig;
use crate::editor::{Action, EditorStore};
use crate::error::{CuratorError, CuratorResult};
use crate::repository::ScriptRepository;
use crate::script::{load_document_with_prefix, ScriptDocument, Slide};

/// Identifies the script a load was started for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    script_id: String,
}

impl LoadTicket {
    pub fn script_id(&self) -> &str {
        &self.script_id
    }
}

/// Converted contents of a script, ready to apply.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedScript {
    pub script_id: String,
    pub document: ScriptDocument,
    pub slides: Vec<Slide>,
}

/// An editor bound to a script repository.
pub struct CurationSession<R: ScriptRepository> {
    repo: R,
    config: CuratorConfig,
    store: EditorStore,
}

impl<R: ScriptRepository> CurationSession<R> {
    pub fn new(repo: R, config: CuratorConfig) -> Self {
        Self {
            repo,
            config,
            store: EditorStore::new(),
        }
    }

    pub fn config(&self) -> &CuratorConfig {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn store(&self) -> &EditorStore {
        &self.store
    }

    /// Applies a user action to the open script.
    pub fn dispatch(&mut self, action: Action) {
        self.store.dispatch(action);
    }

    // =========================================================================
    // DISCOVERY
    // =========================================================================

    /// Lists script ids under the root that have both input files, sorted.
    pub fn list_scripts(&self) -> CuratorResult<Vec<String>> {
        let mut scripts: Vec<String> = self
            .repo
            .list_dir(&self.config.script_root)?
            .into_iter()
            .filter(|entry| !self.config.is_ignored(entry))
            .filter(|entry| self.is_eligible(entry))
            .collect();
        scripts.sort();
        Ok(scripts)
    }

    /// Returns true if the script has both `script.json` and `slide_matches.json`.
    pub fn is_eligible(&self, script_id: &str) -> bool {
        let layout = self.config.layout(script_id);
        self.repo.exists(&layout.script_path()) && self.repo.exists(&layout.slide_matches_path())
    }

    // =========================================================================
    // LOADING
    // =========================================================================

    /// Makes `script_id` the current script, discarding the open one.
    pub fn select_script(&mut self, script_id: &str) -> CuratorResult<LoadTicket> {
        if !self.is_eligible(script_id) {
            return Err(CuratorError::script_not_eligible(script_id));
        }
        self.store.dispatch(Action::script_selected(script_id));
        Ok(LoadTicket {
            script_id: script_id.to_string(),
        })
    }

    /// Reads and converts the files of the ticket's script.
    ///
    /// `script_edited.json` is read only if it exists; when it has paragraphs
    /// it replaces the merge of the two input files.
    pub fn fetch(&self, ticket: &LoadTicket) -> CuratorResult<LoadedScript> {
        let layout = self.config.layout(&ticket.script_id);

        let script_raw = self.repo.read_text(&layout.script_path())?;
        let matches_raw = self.repo.read_text(&layout.slide_matches_path())?;
        let edited_path = layout.edited_path();
        let edited_raw = if self.repo.exists(&edited_path) {
            Some(self.repo.read_text(&edited_path)?)
        } else {
            None
        };

        let loaded = load_document_with_prefix(
            Some(&script_raw),
            Some(&matches_raw),
            edited_raw.as_deref(),
            &self.config.slide_image_prefix,
        );
        Ok(LoadedScript {
            script_id: ticket.script_id.clone(),
            document: loaded.document,
            slides: loaded.slides,
        })
    }

    /// Hands a fetched script to the editor.
    ///
    /// Returns false, changing nothing, when the script is no longer current.
    pub fn apply(&mut self, loaded: LoadedScript) -> bool {
        if !self.store.state().accepts_load_for(&loaded.script_id) {
            warn!(
                script_id = %loaded.script_id,
                current = ?self.store.current_script_id(),
                "Discarding stale script load"
            );
            return false;
        }

        info!(
            script_id = %loaded.script_id,
            paragraphs = loaded.document.len(),
            slides = loaded.slides.len(),
            "Script loaded"
        );
        self.store.dispatch(Action::SlidesLoaded {
            slides: loaded.slides,
        });
        self.store.dispatch(Action::DeletedSlidesLoaded {
            deleted_slides: loaded.document.deleted_slides,
        });
        self.store.dispatch(Action::ScriptDataLoaded {
            script_id: loaded.script_id,
            paragraphs: loaded.document.content,
        });
        true
    }

    /// Selects, fetches and applies a script.
    pub fn open_script(&mut self, script_id: &str) -> CuratorResult<()> {
        let ticket = self.select_script(script_id)?;
        let loaded = self.fetch(&ticket)?;
        self.apply(loaded);
        Ok(())
    }

    // =========================================================================
    // SAVING
    // =========================================================================

    /// Writes the open document to `script_edited.json`.
    ///
    /// History is checkpointed only after the write succeeds; on failure the
    /// editor keeps its history and edited flag.
    pub fn save(&mut self) -> CuratorResult<PathBuf> {
        let script_id = self
            .store
            .current_script_id()
            .ok_or(CuratorError::NoScriptSelected)?
            .to_string();

        let document = self.store.document();
        let json = document.to_pretty_json()?;
        let path = self.config.layout(&script_id).edited_path();

        self.repo.write_text(&path, &json)?;
        self.store.dispatch(Action::ScriptSaved);
        info!(
            script_id = %script_id,
            paragraphs = document.len(),
            path = %path.display(),
            "Script saved"
        );
        Ok(path)
    }
}

// =============================================================================
// TESTS
// =============================================================================
