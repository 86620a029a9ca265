//! Data models for scripts, paragraphs and slides.
//!
//! The structs serialize to the `script_edited.json` shape. Reading goes
//! through the lenient `from_json` constructors instead of `Deserialize` so a
//! malformed field degrades to a default rather than failing the whole file.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// =============================================================================
// SLIDE CANDIDATE
// =============================================================================

/// A scored link between one slide image and one paragraph.
///
/// Lives in exactly one paragraph, either as a pending suggestion
/// (`slideCandidates`) or a confirmed assignment (`selectedSlides`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SlideCandidate {
    /// Relative path of the slide image; identifies the slide.
    pub slide_file: String,

    /// Match confidence. Arbitrary real number, 0 for manual assignments.
    /// Non-finite values are stored as 0.
    #[serde(deserialize_with = "finite_or_zero")]
    pub score: f64,

    /// True once the operator confirmed the assignment.
    pub selected: bool,
}

impl SlideCandidate {
    /// Creates an unselected candidate.
    pub fn new(slide_file: impl Into<String>, score: f64) -> Self {
        Self {
            slide_file: slide_file.into(),
            score: if score.is_finite() { score } else { 0.0 },
            selected: false,
        }
    }

    /// Creates a score-0 candidate for assigning a library slide by hand.
    pub fn from_slide(slide: &Slide) -> Self {
        Self::new(slide.slide_file.clone(), 0.0)
    }

    /// Builder: Set selected flag.
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Reads a candidate from JSON. Returns None when `slide_file` is missing or empty.
    pub fn from_json(value: &Value) -> Option<Self> {
        let slide_file = value.get("slide_file")?.as_str()?;
        if slide_file.is_empty() {
            return None;
        }
        Some(Self {
            slide_file: slide_file.to_string(),
            score: number_or_zero(value.get("score")),
            selected: value
                .get("selected")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        })
    }
}

// =============================================================================
// PARAGRAPH
// =============================================================================

/// A unit of transcript text with its slide suggestions and assignments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Paragraph {
    /// Unique within a document. Not necessarily contiguous.
    pub id: i64,

    pub text: String,

    /// Unconfirmed suggestions.
    #[serde(rename = "slideCandidates", default)]
    pub slide_candidates: Vec<SlideCandidate>,

    /// Confirmed assignments, all with `selected == true`.
    #[serde(rename = "selectedSlides", default)]
    pub selected_slides: Vec<SlideCandidate>,
}

impl Paragraph {
    /// Creates a paragraph with no slides.
    pub fn new(id: i64, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            slide_candidates: Vec::new(),
            selected_slides: Vec::new(),
        }
    }

    /// Builder: Add a pending candidate.
    pub fn with_candidate(mut self, candidate: SlideCandidate) -> Self {
        self.slide_candidates.push(candidate.with_selected(false));
        self
    }

    /// Builder: Add a confirmed assignment.
    pub fn with_selected_slide(mut self, candidate: SlideCandidate) -> Self {
        self.selected_slides.push(candidate.with_selected(true));
        self
    }

    /// Reads a full paragraph (text and slides) from JSON.
    ///
    /// A non-integer `id` becomes 0, a non-string `text` becomes empty, and
    /// slide entries without a `slide_file` are dropped. Entries in
    /// `selectedSlides` are always marked selected.
    pub fn from_json(value: &Value) -> Self {
        let mut paragraph = Self::from_script_json(value);
        paragraph.slide_candidates = candidates_from_json(value.get("slideCandidates"));
        paragraph.selected_slides = candidates_from_json(value.get("selectedSlides"))
            .into_iter()
            .map(|c| c.with_selected(true))
            .collect();
        paragraph
    }

    /// Reads only `id` and `text`, as found in a source `script.json`.
    pub fn from_script_json(value: &Value) -> Self {
        Self::new(
            value.get("id").and_then(integer_value).unwrap_or(0),
            value.get("text").and_then(Value::as_str).unwrap_or(""),
        )
    }

    /// Returns true if the paragraph references `slide_file` as candidate or selection.
    pub fn references(&self, slide_file: &str) -> bool {
        self.has_candidate(slide_file) || self.has_selected(slide_file)
    }

    pub fn has_candidate(&self, slide_file: &str) -> bool {
        self.slide_candidates
            .iter()
            .any(|c| c.slide_file == slide_file)
    }

    pub fn has_selected(&self, slide_file: &str) -> bool {
        self.selected_slides.iter().any(|c| c.slide_file == slide_file)
    }
}

fn candidates_from_json(value: Option<&Value>) -> Vec<SlideCandidate> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(SlideCandidate::from_json).collect())
        .unwrap_or_default()
}

// =============================================================================
// SLIDE
// =============================================================================

/// An entry of the slide library.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Slide {
    pub slide_file: String,

    /// Final path segment, for display only.
    pub slide_name: String,
}

impl Slide {
    /// Creates a library entry named after the last segment of `slide_file`.
    pub fn from_path(slide_file: impl Into<String>) -> Self {
        let slide_file = slide_file.into();
        let slide_name = slide_name(&slide_file).to_string();
        Self {
            slide_file,
            slide_name,
        }
    }
}

/// Returns the final segment of a `/`- or `\`-separated path.
pub fn slide_name(slide_file: &str) -> &str {
    slide_file.rsplit(['/', '\\']).next().unwrap_or(slide_file)
}

// =============================================================================
// SCRIPT DOCUMENT
// =============================================================================

/// The persisted form of an edited script.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScriptDocument {
    pub content: Vec<Paragraph>,

    /// Slides removed from the usable library.
    #[serde(rename = "deletedSlides", default)]
    pub deleted_slides: Vec<String>,
}

impl ScriptDocument {
    pub fn new(content: Vec<Paragraph>, deleted_slides: Vec<String>) -> Self {
        Self {
            content,
            deleted_slides,
        }
    }

    /// Returns true if there are no paragraphs.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Returns the number of paragraphs.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Reads a saved `script_edited.json` document.
    pub fn from_json(value: &Value) -> Self {
        let content = value
            .get("content")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(Paragraph::from_json).collect())
            .unwrap_or_default();
        let deleted_slides = value
            .get("deletedSlides")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Self::new(content, deleted_slides)
    }

    /// Reads a source `script.json`: paragraph ids and text, no slides.
    pub fn from_script(value: &Value) -> Self {
        let content = value
            .get("content")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(Paragraph::from_script_json).collect())
            .unwrap_or_default();
        Self::new(content, Vec::new())
    }

    /// Sorts paragraphs ascending by id. Stable for equal ids.
    pub fn sort_by_id(&mut self) {
        self.content.sort_by_key(|p| p.id);
    }

    /// Serializes with 2-space indentation.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// =============================================================================
// SLIDE MATCHES (raw input)
// =============================================================================

/// One row of `slide_matches.json`: a slide and the paragraphs it may belong to.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideMatch {
    /// `slide_file` exactly as it appears in the match file.
    pub slide_file: String,
    pub results: Vec<SlideMatchResult>,
}

/// A scored paragraph reference inside a [`SlideMatch`].
#[derive(Debug, Clone, PartialEq)]
pub struct SlideMatchResult {
    pub paragraph_id: i64,
    pub score: f64,
}

impl SlideMatch {
    /// Reads a match row. Returns None when `slide_file` is missing or empty;
    /// results with an unusable `paragraph_id` are dropped.
    pub fn from_json(value: &Value) -> Option<Self> {
        let slide_file = value.get("slide_file")?.as_str()?;
        if slide_file.is_empty() {
            return None;
        }
        let results = value
            .get("results")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(SlideMatchResult::from_json).collect())
            .unwrap_or_default();
        Some(Self {
            slide_file: slide_file.to_string(),
            results,
        })
    }
}

impl SlideMatchResult {
    /// Reads a result. `paragraph_id` may be a number or a numeric string and
    /// must be positive; a non-numeric `score` becomes 0.
    pub fn from_json(value: &Value) -> Option<Self> {
        let paragraph_id = value.get("paragraph_id").and_then(parse_paragraph_id)?;
        if paragraph_id <= 0 {
            return None;
        }
        Some(Self {
            paragraph_id,
            score: number_or_zero(value.get("score")),
        })
    }
}

// =============================================================================
// JSON HELPERS
// =============================================================================

/// Reads an integral JSON number.
fn integer_value(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    (f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
}

/// Reads a paragraph reference: an integral number, or a string whose
/// leading characters form an integer (`"12"`, `" 7 "`, `"3a"`).
fn parse_paragraph_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(_) => integer_value(value),
        Value::String(s) => {
            let s = s.trim_start();
            let (sign, digits) = match s.strip_prefix('-') {
                Some(rest) => (-1, rest),
                None => (1, s.strip_prefix('+').unwrap_or(s)),
            };
            let end = digits
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(digits.len());
            digits[..end].parse::<i64>().ok().map(|n| sign * n)
        }
        _ => None,
    }
}

fn finite_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let score = f64::deserialize(deserializer)?;
    Ok(if score.is_finite() { score } else { 0.0 })
}

fn number_or_zero(value: Option<&Value>) -> f64 {
    value
        .and_then(Value::as_f64)
        .filter(|f| f.is_finite())
        .unwrap_or(0.0)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::value::{Error as ValueError, F64Deserializer};
    use serde::de::IntoDeserializer;
    use serde_json::json;

    #[test]
    fn test_non_finite_scores_become_zero() {
        for score in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let deserializer: F64Deserializer<ValueError> = score.into_deserializer();
            assert_eq!(finite_or_zero(deserializer).unwrap(), 0.0);
            assert_eq!(SlideCandidate::new("deck/p1.png", score).score, 0.0);
        }
        let deserializer: F64Deserializer<ValueError> = 0.25f64.into_deserializer();
        assert_eq!(finite_or_zero(deserializer).unwrap(), 0.25);
    }

    #[test]
    fn test_paragraph_from_json_defaults_malformed_fields() {
        let paragraph = Paragraph::from_json(&json!({
            "id": "seven",
            "text": 42,
            "slideCandidates": [
                { "slide_file": "", "score": 0.5, "selected": false },
                { "slide_file": "slides/page_002.png", "score": 0.7 },
                { "score": 0.1 }
            ],
            "selectedSlides": [
                { "slide_file": "slides/page_001.png", "score": 0.9, "selected": false }
            ]
        }));

        assert_eq!(paragraph.id, 0);
        assert_eq!(paragraph.text, "");
        assert_eq!(
            paragraph.slide_candidates,
            vec![SlideCandidate::new("slides/page_002.png", 0.7)]
        );
        assert_eq!(paragraph.selected_slides.len(), 1);
        assert!(paragraph.selected_slides[0].selected);
    }

    #[test]
    fn test_script_document_serializes_camel_case_keys() {
        let doc = ScriptDocument::new(
            vec![Paragraph::new(1, "Intro")
                .with_selected_slide(SlideCandidate::new("a.png", 0.5))],
            vec!["b.png".to_string()],
        );

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["content"][0]["slideCandidates"], json!([]));
        assert_eq!(value["content"][0]["selectedSlides"][0]["selected"], true);
        assert_eq!(value["deletedSlides"], json!(["b.png"]));

        let pretty = doc.to_pretty_json().unwrap();
        assert!(pretty.contains("\n  \"content\""));
    }

    #[test]
    fn test_from_script_ignores_slides() {
        let doc = ScriptDocument::from_script(&json!({
            "id": "lecture",
            "content": [
                {
                    "id": 2,
                    "text": "B",
                    "slideCandidates": [{ "slide_file": "x.png", "score": 1 }]
                },
                { "id": 1.0, "text": "A" }
            ]
        }));

        assert_eq!(doc.len(), 2);
        assert_eq!(doc.content[0], Paragraph::new(2, "B"));
        assert_eq!(doc.content[1], Paragraph::new(1, "A"));
    }

    #[test]
    fn test_from_json_without_content_is_empty() {
        assert!(ScriptDocument::from_json(&json!({})).is_empty());
        assert!(ScriptDocument::from_json(&json!([1, 2])).is_empty());
        assert!(ScriptDocument::from_json(&json!({ "content": "nope" })).is_empty());
    }

    #[test]
    fn test_slide_name_handles_both_separators() {
        assert_eq!(slide_name("deck/slides/page_001.png"), "page_001.png");
        assert_eq!(slide_name("deck\\page_002.png"), "page_002.png");
        assert_eq!(slide_name("page_003.png"), "page_003.png");
        assert_eq!(Slide::from_path("a/b.png").slide_name, "b.png");
    }

    #[test]
    fn test_slide_match_parses_string_and_numeric_ids() {
        let row = SlideMatch::from_json(&json!({
            "slide_file": "slides/page_004.png",
            "results": [
                { "paragraph_id": "12", "score": 0.8 },
                { "paragraph_id": 3, "score": "high" },
                { "paragraph_id": "abc", "score": 0.1 },
                { "paragraph_id": 0, "score": 0.1 },
                { "paragraph_id": 2.5, "score": 0.1 },
                { "score": 0.1 }
            ]
        }))
        .unwrap();

        assert_eq!(
            row.results,
            vec![
                SlideMatchResult { paragraph_id: 12, score: 0.8 },
                SlideMatchResult { paragraph_id: 3, score: 0.0 },
            ]
        );
    }

    #[test]
    fn test_slide_match_requires_slide_file() {
        assert!(SlideMatch::from_json(&json!({ "results": [] })).is_none());
        assert!(SlideMatch::from_json(&json!({ "slide_file": "", "results": [] })).is_none());
        assert!(SlideMatch::from_json(&json!("slides/page_001.png")).is_none());
    }

    #[test]
    fn test_candidate_from_slide_is_unscored() {
        let candidate = SlideCandidate::from_slide(&Slide::from_path("deck/p.png"));
        assert_eq!(candidate, SlideCandidate::new("deck/p.png", 0.0));
    }
}
