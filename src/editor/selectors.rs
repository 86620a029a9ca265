//! Derived views of [`EditorState`].
//!
//! All selectors recompute from the state they are given; nothing is cached
//! between calls.

use std::collections::HashSet;

use serde::Serialize;

use super::state::EditorState;
use crate::script::{Paragraph, Slide};

pub fn paragraphs(state: &EditorState) -> &[Paragraph] {
    &state.paragraphs
}

pub fn script_edited(state: &EditorState) -> bool {
    state.script_edited
}

pub fn undo_available(state: &EditorState) -> bool {
    !state.undo_history.is_empty()
}

pub fn redo_available(state: &EditorState) -> bool {
    !state.redo_history.is_empty()
}

pub fn undo_history_length(state: &EditorState) -> usize {
    state.undo_history.len()
}

/// Library slides that are neither assigned to a paragraph nor deleted, in
/// library order.
pub fn available_slides(state: &EditorState) -> Vec<Slide> {
    let unavailable = unavailable_slide_files(state);
    state
        .all_slides
        .iter()
        .filter(|slide| !unavailable.contains(slide.slide_file.as_str()))
        .cloned()
        .collect()
}

/// First available slide, used to position the library cursor.
pub fn first_available_slide(state: &EditorState) -> Option<String> {
    let unavailable = unavailable_slide_files(state);
    state
        .all_slides
        .iter()
        .find(|slide| !unavailable.contains(slide.slide_file.as_str()))
        .map(|slide| slide.slide_file.clone())
}

/// Available slides sorted by display name, as offered for manual assignment.
pub fn library_for_assignment(state: &EditorState) -> Vec<Slide> {
    let mut slides = available_slides(state);
    slides.sort_by(|a, b| a.slide_name.cmp(&b.slide_name));
    slides
}

pub fn find_slide<'a>(state: &'a EditorState, slide_file: &str) -> Option<&'a Slide> {
    state.all_slides.iter().find(|s| s.slide_file == slide_file)
}

fn unavailable_slide_files(state: &EditorState) -> HashSet<&str> {
    state
        .paragraphs
        .iter()
        .flat_map(|p| p.selected_slides.iter())
        .map(|c| c.slide_file.as_str())
        .chain(state.deleted_slides.iter().map(String::as_str))
        .collect()
}

// =============================================================================
// COMPLETION
// =============================================================================

/// Progress through a script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CompletionStats {
    pub total: usize,
    pub completed: usize,
    pub open: usize,
    /// `completed / total * 100`, 0 for an empty script.
    pub percentage: f64,
}

/// A paragraph is done once it has a confirmed slide or nothing left to review.
pub fn is_paragraph_completed(paragraph: &Paragraph) -> bool {
    !paragraph.selected_slides.is_empty() || paragraph.slide_candidates.is_empty()
}

pub fn completion_stats(state: &EditorState) -> CompletionStats {
    let total = state.paragraphs.len();
    let completed = state
        .paragraphs
        .iter()
        .filter(|p| is_paragraph_completed(p))
        .count();
    let percentage = if total > 0 {
        completed as f64 / total as f64 * 100.0
    } else {
        0.0
    };
    CompletionStats {
        total,
        completed,
        open: total - completed,
        percentage,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::SlideCandidate;

    fn state() -> EditorState {
        EditorState {
            paragraphs: vec![
                Paragraph::new(1, "A").with_selected_slide(SlideCandidate::new("deck/b.png", 0.9)),
                Paragraph::new(2, "B").with_candidate(SlideCandidate::new("deck/c.png", 0.2)),
                Paragraph::new(3, "C"),
                Paragraph::new(4, "D").with_candidate(SlideCandidate::new("deck/a.png", 0.5)),
            ],
            all_slides: vec![
                Slide::from_path("deck/d.png"),
                Slide::from_path("deck/b.png"),
                Slide::from_path("deck/c.png"),
                Slide::from_path("deck/a.png"),
            ],
            deleted_slides: vec!["deck/c.png".to_string()],
            ..EditorState::for_script("lecture")
        }
    }

    #[test]
    fn test_available_slides_excludes_assigned_and_deleted() {
        let files: Vec<String> = available_slides(&state())
            .into_iter()
            .map(|s| s.slide_file)
            .collect();
        assert_eq!(files, vec!["deck/d.png", "deck/a.png"]);
        assert_eq!(first_available_slide(&state()).as_deref(), Some("deck/d.png"));
    }

    #[test]
    fn test_available_slides_recomputed_after_change() {
        let mut state = state();
        assert_eq!(available_slides(&state).len(), 2);

        state.paragraphs[0].selected_slides.clear();
        state.deleted_slides.clear();
        assert_eq!(available_slides(&state).len(), 4);
    }

    #[test]
    fn test_library_for_assignment_sorted_by_name() {
        let names: Vec<String> = library_for_assignment(&state())
            .into_iter()
            .map(|s| s.slide_name)
            .collect();
        assert_eq!(names, vec!["a.png", "d.png"]);
    }

    #[test]
    fn test_history_flags() {
        let mut state = state();
        assert!(!undo_available(&state));
        assert!(!redo_available(&state));

        state.undo_history.push(Default::default());
        assert!(undo_available(&state));
        assert_eq!(undo_history_length(&state), 1);
    }

    #[test]
    fn test_completion_stats() {
        let stats = completion_stats(&state());
        assert_eq!(stats.total, 4);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.open, 2);
        assert_eq!(stats.percentage, 50.0);

        assert_eq!(completion_stats(&EditorState::new()), CompletionStats::default());
    }

    #[test]
    fn test_find_slide() {
        let state = state();
        assert_eq!(find_slide(&state, "deck/a.png").unwrap().slide_name, "a.png");
        assert!(find_slide(&state, "deck/z.png").is_none());
    }
}
