//! Editor actions.
//!
//! Every user edit and every load/save notification is one [`Action`]. The
//! serde form is `{ "type": "selectSlideForParagraph", "paragraphId": 3, ... }`
//! so a JavaScript front end can dispatch the same objects.

use serde::{Deserialize, Serialize};

use crate::error::{CuratorError, CuratorResult};
use crate::script::{Paragraph, Slide, SlideCandidate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Action {
    /// Resets the editor for a newly chosen script and clears history.
    ScriptSelected { script_id: String },

    /// Paragraphs finished loading for `script_id`. Ignored if stale.
    ScriptDataLoaded {
        script_id: String,
        paragraphs: Vec<Paragraph>,
    },

    /// Replaces the slide library.
    SlidesLoaded { slides: Vec<Slide> },

    /// Replaces the deleted-slide list.
    DeletedSlidesLoaded { deleted_slides: Vec<String> },

    /// Assigns a slide to one paragraph, detaching it from all others.
    SelectSlideForParagraph {
        paragraph_id: i64,
        candidate: SlideCandidate,
    },

    /// Removes a slide from one paragraph's candidates and selections.
    RejectSlideForParagraph {
        paragraph_id: i64,
        candidate: SlideCandidate,
    },

    ClearSlideCandidatesForParagraph { paragraph_id: i64 },

    UpdateParagraphText { paragraph_id: i64, new_text: String },

    /// Cuts a paragraph in two; the second part gets a fresh id.
    SplitParagraph {
        paragraph_id: i64,
        updated_text: String,
        new_paragraph_text: String,
    },

    DeleteSlideFromLibrary { slide_file: String },

    SelectSlideFromLibrary { slide_file: String },

    DeselectSlideFromLibrary,

    Undo,

    Redo,

    /// The document was written successfully; history is checkpointed.
    ScriptSaved,
}

impl Action {
    pub fn script_selected(script_id: impl Into<String>) -> Self {
        Self::ScriptSelected {
            script_id: script_id.into(),
        }
    }

    pub fn select_slide(paragraph_id: i64, candidate: SlideCandidate) -> Self {
        Self::SelectSlideForParagraph {
            paragraph_id,
            candidate,
        }
    }

    pub fn reject_slide(paragraph_id: i64, candidate: SlideCandidate) -> Self {
        Self::RejectSlideForParagraph {
            paragraph_id,
            candidate,
        }
    }

    pub fn update_text(paragraph_id: i64, new_text: impl Into<String>) -> Self {
        Self::UpdateParagraphText {
            paragraph_id,
            new_text: new_text.into(),
        }
    }

    /// Builds a split of `paragraph` at a selection range given in characters.
    ///
    /// Text before `start` stays in the paragraph, text after `end` moves to the
    /// new one; anything between them is dropped. A caret split has `start == end`.
    pub fn split_at(paragraph: &Paragraph, start: usize, end: usize) -> CuratorResult<Self> {
        let (updated_text, new_paragraph_text) = split_text(&paragraph.text, start, end)?;
        Ok(Self::SplitParagraph {
            paragraph_id: paragraph.id,
            updated_text,
            new_paragraph_text,
        })
    }

    /// Short label for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ScriptSelected { .. } => "scriptSelected",
            Self::ScriptDataLoaded { .. } => "scriptDataLoaded",
            Self::SlidesLoaded { .. } => "slidesLoaded",
            Self::DeletedSlidesLoaded { .. } => "deletedSlidesLoaded",
            Self::SelectSlideForParagraph { .. } => "selectSlideForParagraph",
            Self::RejectSlideForParagraph { .. } => "rejectSlideForParagraph",
            Self::ClearSlideCandidatesForParagraph { .. } => "clearSlideCandidatesForParagraph",
            Self::UpdateParagraphText { .. } => "updateParagraphText",
            Self::SplitParagraph { .. } => "splitParagraph",
            Self::DeleteSlideFromLibrary { .. } => "deleteSlideFromLibrary",
            Self::SelectSlideFromLibrary { .. } => "selectSlideFromLibrary",
            Self::DeselectSlideFromLibrary => "deselectSlideFromLibrary",
            Self::Undo => "undo",
            Self::Redo => "redo",
            Self::ScriptSaved => "scriptSaved",
        }
    }
}

/// Cuts `text` at character offsets `start..end`, returning the text before
/// `start` and the text after `end`.
pub fn split_text(text: &str, start: usize, end: usize) -> CuratorResult<(String, String)> {
    let length = text.chars().count();
    if start > length {
        return Err(CuratorError::invalid_split(start, length));
    }
    if end < start || end > length {
        return Err(CuratorError::invalid_split(end, length));
    }

    let byte_at = |offset: usize| {
        text.char_indices()
            .nth(offset)
            .map(|(i, _)| i)
            .unwrap_or(text.len())
    };
    Ok((
        text[..byte_at(start)].to_string(),
        text[byte_at(end)..].to_string(),
    ))
}
