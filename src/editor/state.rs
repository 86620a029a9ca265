//! Editor state and history snapshots.

use serde::{Deserialize, Serialize};

use crate::script::{Paragraph, ScriptDocument, Slide};

// =============================================================================
// EDITOR STATE
// =============================================================================

/// Everything the editor knows about the open script.
///
/// Only [`reduce`](super::reducer::reduce) should produce new states; callers
/// read fields directly or through [`selectors`](super::selectors).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorState {
    /// Script whose load results are accepted. Loads for other ids are stale.
    pub current_script_id: Option<String>,

    pub paragraphs: Vec<Paragraph>,

    /// Slide library discovered at load time.
    pub all_slides: Vec<Slide>,

    /// Library slides the operator removed.
    pub deleted_slides: Vec<String>,

    /// Library cursor. Moving it is not an edit.
    pub selected_library_slide: Option<String>,

    /// True when there are changes since the last load or save.
    pub script_edited: bool,

    pub undo_history: Vec<Snapshot>,
    pub redo_history: Vec<Snapshot>,
}

impl EditorState {
    /// Creates an empty state with no script selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty state waiting for `script_id` to load.
    pub fn for_script(script_id: impl Into<String>) -> Self {
        Self {
            current_script_id: Some(script_id.into()),
            ..Self::default()
        }
    }

    /// Returns true if results of a load started for `script_id` may be applied.
    pub fn accepts_load_for(&self, script_id: &str) -> bool {
        self.current_script_id.as_deref() == Some(script_id)
    }

    /// Index of the paragraph with the given id.
    pub fn paragraph_index(&self, paragraph_id: i64) -> Option<usize> {
        self.paragraphs.iter().position(|p| p.id == paragraph_id)
    }

    pub fn paragraph(&self, paragraph_id: i64) -> Option<&Paragraph> {
        self.paragraphs.iter().find(|p| p.id == paragraph_id)
    }

    /// Deep copy of the saveable document.
    pub fn to_document(&self) -> ScriptDocument {
        ScriptDocument::new(self.paragraphs.clone(), self.deleted_slides.clone())
    }
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// A history frame: an owned copy of the undoable part of [`EditorState`].
///
/// Frames never share data with the live state, so later edits cannot leak
/// into history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub paragraphs: Vec<Paragraph>,
    pub all_slides: Vec<Slide>,
    pub deleted_slides: Vec<String>,
    pub selected_library_slide: Option<String>,
}

impl Snapshot {
    /// Copies the undoable fields of `state`.
    pub fn capture(state: &EditorState) -> Self {
        Self {
            paragraphs: state.paragraphs.clone(),
            all_slides: state.all_slides.clone(),
            deleted_slides: state.deleted_slides.clone(),
            selected_library_slide: state.selected_library_slide.clone(),
        }
    }

    /// Moves the undoable fields out of `state`, leaving them empty.
    /// Used when the state is about to be overwritten by [`restore`](Self::restore).
    pub fn take(state: &mut EditorState) -> Self {
        Self {
            paragraphs: std::mem::take(&mut state.paragraphs),
            all_slides: std::mem::take(&mut state.all_slides),
            deleted_slides: std::mem::take(&mut state.deleted_slides),
            selected_library_slide: state.selected_library_slide.take(),
        }
    }

    /// Overwrites the undoable fields of `state` with this frame.
    pub fn restore(self, state: &mut EditorState) {
        state.paragraphs = self.paragraphs;
        state.all_slides = self.all_slides;
        state.deleted_slides = self.deleted_slides;
        state.selected_library_slide = self.selected_library_slide;
    }

    /// Returns true if `state` has the same document content as this frame.
    /// The library cursor is not content.
    pub fn same_content_as(&self, state: &EditorState) -> bool {
        self.paragraphs == state.paragraphs
            && self.all_slides == state.all_slides
            && self.deleted_slides == state.deleted_slides
    }
}

// =============================================================================
// TESTS
// =============================================================================
