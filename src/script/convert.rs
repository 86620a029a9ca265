//! Load-time conversion and merge.
//!
//! Builds the in-memory [`ScriptDocument`] and slide library from the three
//! raw files of a script. A saved `script_edited.json` with at least one
//! paragraph is authoritative; otherwise the source script is merged with the
//! precomputed slide matches. Malformed JSON is logged and read as empty.

use std::collections::{HashMap, HashSet};

use serde_json::Value;
use tracing::{debug, warn};

use super::model::{slide_name, Paragraph, ScriptDocument, Slide, SlideCandidate, SlideMatch};

/// Result of [`load_document`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedDocument {
    pub document: ScriptDocument,
    pub slides: Vec<Slide>,
}

/// Converts raw file contents into a document and slide library, with no
/// prefix applied to match `slide_file`s.
pub fn load_document(
    script_raw: Option<&str>,
    slide_matches_raw: Option<&str>,
    edited_raw: Option<&str>,
) -> LoadedDocument {
    load_document_with_prefix(script_raw, slide_matches_raw, edited_raw, "")
}

/// Converts raw file contents into a document and slide library.
///
/// `slide_image_prefix` is joined onto every `slide_file` read from the match
/// list. Saved documents already carry full paths and are not re-prefixed.
pub fn load_document_with_prefix(
    script_raw: Option<&str>,
    slide_matches_raw: Option<&str>,
    edited_raw: Option<&str>,
    slide_image_prefix: &str,
) -> LoadedDocument {
    if let Some(mut document) = edited_document(edited_raw) {
        document.sort_by_id();
        let slides = slide_library_from_document(&document);
        debug!(
            paragraphs = document.len(),
            slides = slides.len(),
            "Loaded saved document"
        );
        return LoadedDocument { document, slides };
    }

    let mut document = ScriptDocument::from_script(&safe_parse(script_raw));
    let matches = parse_slide_matches(slide_matches_raw);
    merge_matches(&mut document, &matches, slide_image_prefix);
    document.sort_by_id();

    let slides = if matches.is_empty() {
        slide_library_from_document(&document)
    } else {
        slide_library_from_matches(&matches, slide_image_prefix)
    };

    debug!(
        paragraphs = document.len(),
        matches = matches.len(),
        slides = slides.len(),
        "Merged script with slide matches"
    );
    LoadedDocument { document, slides }
}

/// Returns the saved document if it parses and has at least one paragraph.
fn edited_document(edited_raw: Option<&str>) -> Option<ScriptDocument> {
    let raw = edited_raw.filter(|r| !r.is_empty())?;
    let document = ScriptDocument::from_json(&safe_parse(Some(raw)));
    (!document.is_empty()).then_some(document)
}

fn parse_slide_matches(raw: Option<&str>) -> Vec<SlideMatch> {
    let parsed = safe_parse(raw);
    let Some(rows) = parsed.as_array() else {
        return Vec::new();
    };

    let matches: Vec<SlideMatch> = rows.iter().filter_map(SlideMatch::from_json).collect();
    if matches.len() < rows.len() {
        warn!(
            discarded = rows.len() - matches.len(),
            "Discarded slide match rows without slide_file"
        );
    }
    matches
}

/// Attaches every match result to the paragraph whose `id` equals its
/// `paragraph_id`. A slide already selected or pending on that paragraph
/// only has its score updated.
fn merge_matches(document: &mut ScriptDocument, matches: &[SlideMatch], prefix: &str) {
    let index_by_id: HashMap<i64, usize> = document
        .content
        .iter()
        .enumerate()
        .map(|(index, p)| (p.id, index))
        .rev()
        .collect();

    for slide_match in matches {
        let slide_file = format!("{}{}", prefix, slide_match.slide_file);
        for result in &slide_match.results {
            let Some(&index) = index_by_id.get(&result.paragraph_id) else {
                debug!(
                    paragraph_id = result.paragraph_id,
                    slide_file = %slide_file,
                    "Match result references unknown paragraph"
                );
                continue;
            };
            let paragraph = &mut document.content[index];

            if let Some(selected) = paragraph
                .selected_slides
                .iter_mut()
                .find(|c| c.slide_file == slide_file)
            {
                selected.score = result.score;
                selected.selected = true;
            } else if let Some(candidate) = paragraph
                .slide_candidates
                .iter_mut()
                .find(|c| c.slide_file == slide_file)
            {
                candidate.score = result.score;
            } else {
                paragraph
                    .slide_candidates
                    .push(SlideCandidate::new(slide_file.clone(), result.score));
            }
        }
    }

    for paragraph in &mut document.content {
        dedup_candidates(paragraph);
    }
}

/// Keeps the first candidate per `slide_file`.
fn dedup_candidates(paragraph: &mut Paragraph) {
    let mut seen = HashSet::new();
    paragraph
        .slide_candidates
        .retain(|c| seen.insert(c.slide_file.clone()));
}

/// Library in first-appearance order of the match list.
fn slide_library_from_matches(matches: &[SlideMatch], prefix: &str) -> Vec<Slide> {
    let mut seen = HashSet::new();
    matches
        .iter()
        .filter_map(|m| {
            let slide_file = format!("{}{}", prefix, m.slide_file);
            seen.insert(slide_file.clone()).then(|| Slide {
                slide_file,
                slide_name: slide_name(&m.slide_file).to_string(),
            })
        })
        .collect()
}

/// Library of every slide the document references, sorted by display name.
pub fn slide_library_from_document(document: &ScriptDocument) -> Vec<Slide> {
    let mut seen = HashSet::new();
    let mut slides: Vec<Slide> = document
        .content
        .iter()
        .flat_map(|p| p.slide_candidates.iter().chain(p.selected_slides.iter()))
        .filter(|c| !c.slide_file.is_empty())
        .filter(|c| seen.insert(c.slide_file.clone()))
        .map(|c| Slide::from_path(c.slide_file.clone()))
        .collect();
    slides.sort_by(|a, b| a.slide_name.cmp(&b.slide_name));
    slides
}

/// Parses JSON, logging and returning an empty object on failure.
fn safe_parse(raw: Option<&str>) -> Value {
    let Some(raw) = raw.filter(|r| !r.is_empty()) else {
        return Value::Object(Default::default());
    };
    match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            warn!(error = %err, "Failed to parse JSON content");
            Value::Object(Default::default())
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
