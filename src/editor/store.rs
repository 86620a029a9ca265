//! Single-writer holder for the editor state.
//!
//! `EditorStore` owns the current [`EditorState`] and feeds actions through
//! [`reduce`] one at a time. Each dispatch runs to completion before the next
//! can start, so readers always see a state between actions.

use tracing::trace;

use super::action::Action;
use super::reducer::reduce;
use super::selectors::{self, CompletionStats};
use super::state::EditorState;
use crate::error::{CuratorError, CuratorResult};
use crate::script::{Paragraph, ScriptDocument, Slide, SlideCandidate};

#[derive(Debug, Clone, Default)]
pub struct EditorStore {
    state: EditorState,
}

impl EditorStore {
    // =========================================================================
    // INITIALIZATION
    // =========================================================================

    /// Creates a store with no script selected.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    // =========================================================================
    // DISPATCH
    // =========================================================================

    /// Applies one action.
    pub fn dispatch(&mut self, action: Action) {
        trace!(action = action.name(), "Dispatch");
        let current = std::mem::take(&mut self.state);
        self.state = reduce(current, &action);
    }

    /// Assigns `candidate` to the paragraph.
    pub fn select_slide(&mut self, paragraph_id: i64, candidate: SlideCandidate) {
        self.dispatch(Action::select_slide(paragraph_id, candidate));
    }

    /// Assigns a library slide by file, with score 0. Unknown files are ignored.
    pub fn assign_library_slide(&mut self, paragraph_id: i64, slide_file: &str) {
        let Some(slide) = selectors::find_slide(&self.state, slide_file) else {
            return;
        };
        let candidate = SlideCandidate::from_slide(slide);
        self.select_slide(paragraph_id, candidate);
    }

    pub fn reject_slide(&mut self, paragraph_id: i64, candidate: SlideCandidate) {
        self.dispatch(Action::reject_slide(paragraph_id, candidate));
    }

    pub fn update_text(&mut self, paragraph_id: i64, new_text: impl Into<String>) {
        self.dispatch(Action::update_text(paragraph_id, new_text));
    }

    pub fn undo(&mut self) {
        self.dispatch(Action::Undo);
    }

    pub fn redo(&mut self) {
        self.dispatch(Action::Redo);
    }

    // =========================================================================
    // SELECTORS
    // =========================================================================

    pub fn current_script_id(&self) -> Option<&str> {
        self.state.current_script_id.as_deref()
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        selectors::paragraphs(&self.state)
    }

    /// Looks up a paragraph of the open script by id.
    pub fn paragraph(&self, paragraph_id: i64) -> CuratorResult<&Paragraph> {
        self.state
            .paragraph(paragraph_id)
            .ok_or_else(|| CuratorError::paragraph_not_found(paragraph_id))
    }

    pub fn script_edited(&self) -> bool {
        selectors::script_edited(&self.state)
    }

    pub fn undo_available(&self) -> bool {
        selectors::undo_available(&self.state)
    }

    pub fn redo_available(&self) -> bool {
        selectors::redo_available(&self.state)
    }

    pub fn available_slides(&self) -> Vec<Slide> {
        selectors::available_slides(&self.state)
    }

    pub fn completion_stats(&self) -> CompletionStats {
        selectors::completion_stats(&self.state)
    }

    /// Copy of the saveable document, taken between actions.
    pub fn document(&self) -> ScriptDocument {
        self.state.to_document()
    }
}

// =============================================================================
// TESTS
// =============================================================================
