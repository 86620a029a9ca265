//! The editor state machine.
//!
//! [`reduce`] applies one [`Action`] to an [`EditorState`] and returns the
//! next state. Document edits push a [`Snapshot`] of the prior state onto the
//! undo stack and clear the redo stack; an edit that leaves the document
//! content unchanged returns the input state untouched.

use tracing::{debug, warn};

use super::action::Action;
use super::selectors::first_available_slide;
use super::state::{EditorState, Snapshot};
use crate::script::{Paragraph, SlideCandidate};

/// Applies `action` to `state`.
pub fn reduce(state: EditorState, action: &Action) -> EditorState {
    match action {
        Action::ScriptSelected { script_id } => EditorState::for_script(script_id.clone()),

        Action::ScriptDataLoaded {
            script_id,
            paragraphs,
        } => script_data_loaded(state, script_id, paragraphs),

        Action::SlidesLoaded { slides } => {
            let mut state = state;
            state.all_slides = slides.clone();
            state.selected_library_slide = first_available_slide(&state);
            state
        }

        Action::DeletedSlidesLoaded { deleted_slides } => EditorState {
            deleted_slides: deleted_slides.clone(),
            ..state
        },

        Action::SelectSlideForParagraph {
            paragraph_id,
            candidate,
        } => edit(state, action, |s| select_slide(s, *paragraph_id, candidate)),

        Action::RejectSlideForParagraph {
            paragraph_id,
            candidate,
        } => edit(state, action, |s| {
            if let Some(paragraph) = paragraph_mut(s, *paragraph_id) {
                let slide_file = candidate.slide_file.as_str();
                paragraph.slide_candidates.retain(|c| c.slide_file != slide_file);
                paragraph.selected_slides.retain(|c| c.slide_file != slide_file);
            }
        }),

        Action::ClearSlideCandidatesForParagraph { paragraph_id } => edit(state, action, |s| {
            if let Some(paragraph) = paragraph_mut(s, *paragraph_id) {
                paragraph.slide_candidates.clear();
            }
        }),

        Action::UpdateParagraphText {
            paragraph_id,
            new_text,
        } => edit(state, action, |s| {
            if let Some(paragraph) = paragraph_mut(s, *paragraph_id) {
                paragraph.text.clone_from(new_text);
            }
        }),

        Action::SplitParagraph {
            paragraph_id,
            updated_text,
            new_paragraph_text,
        } => edit(state, action, |s| {
            split_paragraph(s, *paragraph_id, updated_text, new_paragraph_text)
        }),

        Action::DeleteSlideFromLibrary { slide_file } => edit(state, action, |s| {
            if s.deleted_slides.contains(slide_file) {
                return;
            }
            s.deleted_slides.push(slide_file.clone());
            if s.selected_library_slide.as_deref() == Some(slide_file.as_str()) {
                s.selected_library_slide = None;
            }
        }),

        Action::SelectSlideFromLibrary { slide_file } => EditorState {
            selected_library_slide: Some(slide_file.clone()),
            ..state
        },

        Action::DeselectSlideFromLibrary => EditorState {
            selected_library_slide: None,
            ..state
        },

        Action::Undo => undo(state),

        Action::Redo => redo(state),

        Action::ScriptSaved => EditorState {
            undo_history: Vec::new(),
            redo_history: Vec::new(),
            script_edited: false,
            ..state
        },
    }
}

// =============================================================================
// HISTORY
// =============================================================================

/// Runs a document edit with history bookkeeping.
///
/// The pre-edit frame is captured first. If `mutate` leaves the content
/// unchanged, the frame is restored and the state is returned as it was.
fn edit<F>(mut state: EditorState, action: &Action, mutate: F) -> EditorState
where
    F: FnOnce(&mut EditorState),
{
    let frame = Snapshot::capture(&state);
    mutate(&mut state);

    if frame.same_content_as(&state) {
        debug!(action = action.name(), "Edit had no effect, history unchanged");
        frame.restore(&mut state);
        return state;
    }

    state.undo_history.push(frame);
    state.redo_history.clear();
    state.script_edited = true;
    debug!(
        action = action.name(),
        undo_depth = state.undo_history.len(),
        "History entry pushed"
    );
    state
}

fn undo(mut state: EditorState) -> EditorState {
    let Some(frame) = state.undo_history.pop() else {
        return state;
    };
    let current = Snapshot::take(&mut state);
    state.redo_history.push(current);
    frame.restore(&mut state);
    state.script_edited = true;
    debug!(
        undo_remaining = state.undo_history.len(),
        redo_depth = state.redo_history.len(),
        "Undo"
    );
    state
}

fn redo(mut state: EditorState) -> EditorState {
    let Some(frame) = state.redo_history.pop() else {
        return state;
    };
    let current = Snapshot::take(&mut state);
    state.undo_history.push(current);
    frame.restore(&mut state);
    state.script_edited = true;
    debug!(
        undo_depth = state.undo_history.len(),
        redo_remaining = state.redo_history.len(),
        "Redo"
    );
    state
}

// =============================================================================
// EDITS
// =============================================================================

fn script_data_loaded(
    state: EditorState,
    script_id: &str,
    paragraphs: &[Paragraph],
) -> EditorState {
    if !state.accepts_load_for(script_id) {
        warn!(
            script_id,
            current = ?state.current_script_id,
            "Discarding stale script load"
        );
        return state;
    }

    let mut next = EditorState {
        current_script_id: state.current_script_id,
        paragraphs: paragraphs.to_vec(),
        all_slides: state.all_slides,
        deleted_slides: state.deleted_slides,
        selected_library_slide: None,
        script_edited: false,
        undo_history: Vec::new(),
        redo_history: Vec::new(),
    };
    next.selected_library_slide = first_available_slide(&next);
    next
}

/// Confirms `candidate` on the target paragraph and detaches the same slide
/// from every other paragraph, so a slide is selected in at most one place.
fn select_slide(state: &mut EditorState, paragraph_id: i64, candidate: &SlideCandidate) {
    if state.paragraph_index(paragraph_id).is_none() {
        return;
    }

    let slide_file = candidate.slide_file.as_str();
    for paragraph in &mut state.paragraphs {
        paragraph.slide_candidates.retain(|c| c.slide_file != slide_file);

        if paragraph.id != paragraph_id {
            paragraph.selected_slides.retain(|c| c.slide_file != slide_file);
            continue;
        }

        match paragraph
            .selected_slides
            .iter_mut()
            .find(|c| c.slide_file == slide_file)
        {
            Some(existing) => existing.selected = true,
            None => paragraph
                .selected_slides
                .push(candidate.clone().with_selected(true)),
        }
    }

    state.selected_library_slide = first_available_slide(state);
}

/// Replaces the paragraph's text with `updated_text` and inserts a new
/// paragraph right after it, numbered one above the highest existing id.
fn split_paragraph(
    state: &mut EditorState,
    paragraph_id: i64,
    updated_text: &str,
    new_paragraph_text: &str,
) {
    let Some(index) = state.paragraph_index(paragraph_id) else {
        return;
    };

    let highest = state.paragraphs.iter().map(|p| p.id).fold(0, i64::max);
    let Some(new_id) = highest.checked_add(1) else {
        warn!(paragraph_id, highest, "No paragraph id left above the highest one, split skipped");
        return;
    };
    state.paragraphs[index].text = updated_text.to_string();
    state
        .paragraphs
        .insert(index + 1, Paragraph::new(new_id, new_paragraph_text));
}

fn paragraph_mut(state: &mut EditorState, paragraph_id: i64) -> Option<&mut Paragraph> {
    state.paragraphs.iter_mut().find(|p| p.id == paragraph_id)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::selectors;
    use crate::script::{load_document, Slide};
    use proptest::prelude::*;
    use serde_json::json;

    fn apply(state: EditorState, actions: &[Action]) -> EditorState {
        actions.iter().fold(state, reduce)
    }

    /// Selected script "lecture" with three paragraphs and a four-slide library.
    fn loaded_state() -> EditorState {
        let paragraphs = vec![
            Paragraph::new(1, "Welcome to the course.")
                .with_candidate(SlideCandidate::new("deck/p1.png", 0.9))
                .with_candidate(SlideCandidate::new("deck/p2.png", 0.4)),
            Paragraph::new(2, "Today we cover ownership.")
                .with_candidate(SlideCandidate::new("deck/p2.png", 0.8)),
            Paragraph::new(5, "Questions?"),
        ];
        let slides = ["deck/p1.png", "deck/p2.png", "deck/p3.png", "deck/p4.png"]
            .into_iter()
            .map(Slide::from_path)
            .collect();

        apply(
            EditorState::new(),
            &[
                Action::script_selected("lecture"),
                Action::SlidesLoaded { slides },
                Action::ScriptDataLoaded {
                    script_id: "lecture".to_string(),
                    paragraphs,
                },
            ],
        )
    }

    fn assert_exclusive(state: &EditorState) {
        for paragraph in &state.paragraphs {
            for selected in &paragraph.selected_slides {
                assert!(selected.selected);
                let owners = state
                    .paragraphs
                    .iter()
                    .filter(|p| p.has_selected(&selected.slide_file))
                    .count();
                assert_eq!(owners, 1, "{} selected twice", selected.slide_file);
                assert!(
                    state
                        .paragraphs
                        .iter()
                        .all(|p| !p.has_candidate(&selected.slide_file)),
                    "{} still offered as candidate",
                    selected.slide_file
                );
            }
        }
    }

    #[test]
    fn test_script_selected_resets_state() {
        let mut state = loaded_state();
        state = reduce(state, &Action::select_slide(1, SlideCandidate::new("deck/p1.png", 0.9)));
        assert!(state.script_edited);

        let state = reduce(state, &Action::script_selected("other"));
        assert_eq!(state, EditorState::for_script("other"));
    }

    #[test]
    fn test_loaded_state_autoselects_first_available() {
        let state = loaded_state();
        assert_eq!(state.selected_library_slide.as_deref(), Some("deck/p1.png"));
        assert!(!state.script_edited);
        assert!(state.undo_history.is_empty());
    }

    #[test]
    fn test_stale_load_is_discarded() {
        let state = reduce(EditorState::new(), &Action::script_selected("b"));
        let stale = Action::ScriptDataLoaded {
            script_id: "a".to_string(),
            paragraphs: vec![Paragraph::new(1, "from a")],
        };
        let next = reduce(state.clone(), &stale);
        assert_eq!(next, state);
    }

    #[test]
    fn test_select_slide_moves_assignment_between_paragraphs() {
        let state = loaded_state();
        let state = reduce(
            state,
            &Action::select_slide(1, SlideCandidate::new("deck/p2.png", 0.4)),
        );

        assert!(state.paragraph(1).unwrap().has_selected("deck/p2.png"));
        assert!(!state.paragraph(1).unwrap().has_candidate("deck/p2.png"));
        assert!(state.paragraph(1).unwrap().has_candidate("deck/p1.png"));
        assert!(!state.paragraph(2).unwrap().references("deck/p2.png"));
        assert_exclusive(&state);

        // Reassign to paragraph 5; it leaves paragraph 1.
        let state = reduce(
            state,
            &Action::select_slide(5, SlideCandidate::new("deck/p2.png", 0.0)),
        );
        assert!(!state.paragraph(1).unwrap().references("deck/p2.png"));
        assert_eq!(
            state.paragraph(5).unwrap().selected_slides,
            vec![SlideCandidate::new("deck/p2.png", 0.0).with_selected(true)]
        );
        assert_eq!(state.undo_history.len(), 2);
        assert_exclusive(&state);
    }

    #[test]
    fn test_select_slide_advances_library_cursor() {
        let state = loaded_state();
        let state = reduce(
            state,
            &Action::select_slide(1, SlideCandidate::new("deck/p1.png", 0.9)),
        );
        assert_eq!(state.selected_library_slide.as_deref(), Some("deck/p2.png"));
    }

    #[test]
    fn test_reselecting_selected_slide_is_noop() {
        let state = reduce(
            loaded_state(),
            &Action::select_slide(1, SlideCandidate::new("deck/p1.png", 0.9)),
        );
        let again = reduce(
            state.clone(),
            &Action::select_slide(1, SlideCandidate::new("deck/p1.png", 0.9)),
        );
        assert_eq!(again, state);
    }

    #[test]
    fn test_select_slide_for_unknown_paragraph_is_noop() {
        let state = loaded_state();
        let next = reduce(
            state.clone(),
            &Action::select_slide(99, SlideCandidate::new("deck/p2.png", 0.1)),
        );
        assert_eq!(next, state);
    }

    #[test]
    fn test_reject_is_local_to_paragraph() {
        let state = loaded_state();
        let state = reduce(
            state,
            &Action::reject_slide(1, SlideCandidate::new("deck/p2.png", 0.4)),
        );

        assert!(!state.paragraph(1).unwrap().references("deck/p2.png"));
        assert!(state.paragraph(2).unwrap().has_candidate("deck/p2.png"));
        assert!(state.script_edited);
        assert_eq!(state.undo_history.len(), 1);
    }

    #[test]
    fn test_reject_removes_selection() {
        let state = reduce(
            loaded_state(),
            &Action::select_slide(2, SlideCandidate::new("deck/p2.png", 0.8)),
        );
        let state = reduce(
            state,
            &Action::reject_slide(2, SlideCandidate::new("deck/p2.png", 0.8)),
        );
        assert!(!state.paragraph(2).unwrap().references("deck/p2.png"));
        assert_eq!(state.undo_history.len(), 2);
    }

    #[test]
    fn test_clear_candidates() {
        let state = loaded_state();
        let state = reduce(state, &Action::ClearSlideCandidatesForParagraph { paragraph_id: 1 });
        assert!(state.paragraph(1).unwrap().slide_candidates.is_empty());
        assert_eq!(state.paragraph(2).unwrap().slide_candidates.len(), 1);
        assert_eq!(state.undo_history.len(), 1);

        let again = reduce(
            state.clone(),
            &Action::ClearSlideCandidatesForParagraph { paragraph_id: 1 },
        );
        assert_eq!(again, state);
    }

    #[test]
    fn test_update_text_with_same_text_is_noop() {
        let state = loaded_state();
        let next = reduce(state.clone(), &Action::update_text(5, "Questions?"));
        assert_eq!(next.undo_history.len(), state.undo_history.len());
        assert_eq!(next.script_edited, state.script_edited);
        assert_eq!(next, state);
    }

    #[test]
    fn test_update_text_keeps_slides() {
        let state = reduce(loaded_state(), &Action::update_text(1, "Welcome!"));
        let paragraph = state.paragraph(1).unwrap();
        assert_eq!(paragraph.text, "Welcome!");
        assert_eq!(paragraph.slide_candidates.len(), 2);
        assert!(state.script_edited);
    }

    #[test]
    fn test_update_text_unknown_paragraph_is_noop() {
        let state = loaded_state();
        assert_eq!(reduce(state.clone(), &Action::update_text(42, "x")), state);
    }

    #[test]
    fn test_split_inserts_after_target_with_fresh_id() {
        let state = loaded_state();
        let original = state.paragraph(1).unwrap().clone();
        let action = Action::split_at(&original, 8, 8).unwrap();

        let state = reduce(state, &action);
        let ids: Vec<i64> = state.paragraphs.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 6, 2, 5]);

        let first = state.paragraph(1).unwrap();
        let second = state.paragraph(6).unwrap();
        assert_eq!(format!("{}{}", first.text, second.text), original.text);
        assert_eq!(first.slide_candidates, original.slide_candidates);
        assert!(second.slide_candidates.is_empty());
        assert!(second.selected_slides.is_empty());
        assert_eq!(state.undo_history.len(), 1);
    }

    #[test]
    fn test_split_unknown_paragraph_is_noop() {
        let state = loaded_state();
        let action = Action::SplitParagraph {
            paragraph_id: 3,
            updated_text: "a".to_string(),
            new_paragraph_text: "b".to_string(),
        };
        assert_eq!(reduce(state.clone(), &action), state);
    }

    #[test]
    fn test_split_with_exhausted_id_space_is_noop() {
        let script = json!({ "content": [{ "id": i64::MAX, "text": "ab" }] }).to_string();
        let loaded = load_document(Some(&script), None, None);
        let state = apply(
            EditorState::new(),
            &[
                Action::script_selected("lecture"),
                Action::ScriptDataLoaded {
                    script_id: "lecture".to_string(),
                    paragraphs: loaded.document.content,
                },
            ],
        );
        assert_eq!(state.paragraph(i64::MAX).unwrap().text, "ab");

        let action = Action::SplitParagraph {
            paragraph_id: i64::MAX,
            updated_text: "a".to_string(),
            new_paragraph_text: "b".to_string(),
        };
        let next = reduce(state.clone(), &action);
        assert_eq!(next, state);
        assert!(!selectors::undo_available(&next));
    }

    #[test]
    fn test_delete_slide_from_library() {
        let state = loaded_state();
        assert_eq!(state.selected_library_slide.as_deref(), Some("deck/p1.png"));

        let delete = Action::DeleteSlideFromLibrary {
            slide_file: "deck/p1.png".to_string(),
        };
        let state = reduce(state, &delete);
        assert_eq!(state.deleted_slides, vec!["deck/p1.png"]);
        assert!(state.selected_library_slide.is_none());
        assert!(!selectors::available_slides(&state)
            .iter()
            .any(|s| s.slide_file == "deck/p1.png"));

        let again = reduce(state.clone(), &delete);
        assert_eq!(again, state);

        let state = reduce(state, &Action::Undo);
        assert!(state.deleted_slides.is_empty());
        assert_eq!(state.selected_library_slide.as_deref(), Some("deck/p1.png"));
    }

    #[test]
    fn test_library_cursor_moves_do_not_touch_history() {
        let state = loaded_state();
        let state = reduce(
            state,
            &Action::SelectSlideFromLibrary {
                slide_file: "deck/p3.png".to_string(),
            },
        );
        assert_eq!(state.selected_library_slide.as_deref(), Some("deck/p3.png"));
        assert!(state.undo_history.is_empty());
        assert!(!state.script_edited);

        let state = reduce(state, &Action::DeselectSlideFromLibrary);
        assert!(state.selected_library_slide.is_none());
        assert!(state.undo_history.is_empty());
    }

    #[test]
    fn test_undo_redo_on_empty_history_are_noops() {
        let state = loaded_state();
        assert_eq!(reduce(state.clone(), &Action::Undo), state);
        assert_eq!(reduce(state.clone(), &Action::Redo), state);
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let state = apply(
            loaded_state(),
            &[
                Action::update_text(1, "one"),
                Action::Undo,
                Action::update_text(2, "two"),
            ],
        );
        assert!(state.redo_history.is_empty());
        assert_eq!(state.undo_history.len(), 1);
        assert_eq!(state.paragraph(1).unwrap().text, "Welcome to the course.");
    }

    #[test]
    fn test_script_saved_clears_history() {
        let state = apply(
            loaded_state(),
            &[
                Action::update_text(1, "one"),
                Action::update_text(2, "two"),
                Action::Undo,
                Action::ScriptSaved,
            ],
        );
        assert!(state.undo_history.is_empty());
        assert!(state.redo_history.is_empty());
        assert!(!state.script_edited);
        assert_eq!(state.paragraph(1).unwrap().text, "one");
    }

    #[test]
    fn test_select_then_undo_scenario() {
        let script = json!({
            "id": "s",
            "content": [{ "id": 1, "text": "A" }, { "id": 196, "text": "B" }]
        })
        .to_string();
        let matches = json!([
            { "slide_file": "X", "results": [{ "paragraph_id": 196, "score": 0.89 }] },
            { "slide_file": "Y", "results": [{ "paragraph_id": 1, "score": 0.93 }] }
        ])
        .to_string();
        let loaded = load_document(Some(&script), Some(&matches), None);

        let state = apply(
            EditorState::new(),
            &[
                Action::script_selected("s"),
                Action::SlidesLoaded { slides: loaded.slides },
                Action::ScriptDataLoaded {
                    script_id: "s".to_string(),
                    paragraphs: loaded.document.content,
                },
            ],
        );
        let before = state.clone();

        let x = state.paragraph(196).unwrap().slide_candidates[0].clone();
        let state = reduce(state, &Action::select_slide(196, x));

        let p196 = state.paragraph(196).unwrap();
        assert_eq!(
            p196.selected_slides,
            vec![SlideCandidate::new("X", 0.89).with_selected(true)]
        );
        assert!(p196.slide_candidates.is_empty());
        assert_eq!(state.paragraph(1), before.paragraph(1));

        let state = reduce(state, &Action::Undo);
        assert_eq!(state.paragraphs, before.paragraphs);
        assert_eq!(state.all_slides, before.all_slides);
        assert_eq!(state.selected_library_slide, before.selected_library_slide);
        assert_eq!(state.redo_history.len(), 1);
    }

    // =========================================================================
    // PROPERTIES
    // =========================================================================

    const SLIDES: [&str; 4] = ["deck/p1.png", "deck/p2.png", "deck/p3.png", "deck/p4.png"];
    const PARAGRAPH_IDS: [i64; 5] = [1, 2, 5, 6, 99];

    fn arb_action() -> impl Strategy<Value = Action> {
        let paragraph = proptest::sample::select(PARAGRAPH_IDS.to_vec());
        let slide = proptest::sample::select(SLIDES.to_vec());
        prop_oneof![
            (paragraph.clone(), slide.clone())
                .prop_map(|(id, s)| Action::select_slide(id, SlideCandidate::new(s, 0.5))),
            (paragraph.clone(), slide.clone())
                .prop_map(|(id, s)| Action::reject_slide(id, SlideCandidate::new(s, 0.5))),
            paragraph
                .clone()
                .prop_map(|id| Action::ClearSlideCandidatesForParagraph { paragraph_id: id }),
            (paragraph.clone(), "[a-c]{0,3}").prop_map(|(id, t)| Action::update_text(id, t)),
            (paragraph, "[a-c]{0,2}", "[a-c]{0,2}").prop_map(|(id, a, b)| {
                Action::SplitParagraph {
                    paragraph_id: id,
                    updated_text: a,
                    new_paragraph_text: b,
                }
            }),
            slide.prop_map(|s| Action::DeleteSlideFromLibrary {
                slide_file: s.to_string()
            }),
            Just(Action::Undo),
            Just(Action::Redo),
        ]
    }

    proptest! {
        #[test]
        fn prop_selection_stays_exclusive(
            actions in proptest::collection::vec(arb_action(), 0..40)
        ) {
            let mut state = loaded_state();
            for action in &actions {
                state = reduce(state, action);
                assert_exclusive(&state);
            }
        }

        #[test]
        fn prop_undo_then_redo_restores(
            prefix in proptest::collection::vec(arb_action(), 0..20),
            action in arb_action(),
        ) {
            let state = apply(loaded_state(), &prefix);
            let applied = reduce(state, &action);
            let round_trip = apply(applied.clone(), &[Action::Undo, Action::Redo]);
            if selectors::undo_available(&applied) {
                prop_assert_eq!(round_trip, applied);
            }
        }

        #[test]
        fn prop_split_ids_strictly_increase(
            prefix in proptest::collection::vec(arb_action(), 0..20),
            target in proptest::sample::select(PARAGRAPH_IDS.to_vec()),
        ) {
            let state = apply(loaded_state(), &prefix);
            let max_before = state.paragraphs.iter().map(|p| p.id).max().unwrap_or(0);
            let count_before = state.paragraphs.len();
            let exists = state.paragraph(target).is_some();

            let state = reduce(state, &Action::SplitParagraph {
                paragraph_id: target,
                updated_text: "a".to_string(),
                new_paragraph_text: "b".to_string(),
            });

            if exists {
                prop_assert_eq!(state.paragraphs.len(), count_before + 1);
                let index = state.paragraph_index(target).unwrap();
                prop_assert!(state.paragraphs[index + 1].id > max_before);
            } else {
                prop_assert_eq!(state.paragraphs.len(), count_before);
            }
        }
    }
}
