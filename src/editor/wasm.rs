//! WASM bindings for the editor.
//!
//! The front end owns file access; it hands raw JSON strings to
//! `loadDocument`, dispatches plain action objects, and reads back state
//! through the selector methods.

use serde::Serialize;
use serde_wasm_bindgen::{from_value, Serializer};
use wasm_bindgen::prelude::*;

use crate::error::CuratorError;
use crate::script::load_document_with_prefix;
use super::action::Action;
use super::store::EditorStore;

/// Serialize a value to JsValue with maps as plain JS objects (not Map).
fn to_js_value<T: Serialize>(value: &T) -> Result<JsValue, serde_wasm_bindgen::Error> {
    value.serialize(&Serializer::new().serialize_maps_as_objects(true))
}

// =============================================================================
// ERROR CONVERSION
// =============================================================================

impl From<CuratorError> for JsValue {
    fn from(err: CuratorError) -> JsValue {
        JsValue::from_str(&err.to_string())
    }
}

// =============================================================================
// MAIN WRAPPER TYPE
// =============================================================================

/// JavaScript-friendly wrapper around [`EditorStore`].
#[wasm_bindgen]
pub struct JsScriptEditor {
    inner: EditorStore,
    slide_image_prefix: String,
}

#[wasm_bindgen]
impl JsScriptEditor {
    /// Creates an editor with no script selected.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// const editor = new JsScriptEditor("../../");
    /// ```
    #[wasm_bindgen(constructor)]
    pub fn new(slide_image_prefix: Option<String>) -> JsScriptEditor {
        JsScriptEditor {
            inner: EditorStore::new(),
            slide_image_prefix: slide_image_prefix.unwrap_or_default(),
        }
    }

    /// Selects a script and loads its raw file contents in one step.
    ///
    /// Returns false when `scriptId` is no longer current by the time the
    /// contents arrive, i.e. the user switched scripts in between.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// editor.selectScript("lecture-01");
    /// const [script, matches, edited] = await readAll("lecture-01");
    /// editor.loadDocument("lecture-01", script, matches, edited);
    /// ```
    #[wasm_bindgen(js_name = loadDocument)]
    pub fn load_document(
        &mut self,
        script_id: &str,
        script_raw: Option<String>,
        slide_matches_raw: Option<String>,
        edited_raw: Option<String>,
    ) -> bool {
        if !self.inner.state().accepts_load_for(script_id) {
            return false;
        }
        let loaded = load_document_with_prefix(
            script_raw.as_deref(),
            slide_matches_raw.as_deref(),
            edited_raw.as_deref(),
            &self.slide_image_prefix,
        );
        self.inner.dispatch(Action::SlidesLoaded {
            slides: loaded.slides,
        });
        self.inner.dispatch(Action::DeletedSlidesLoaded {
            deleted_slides: loaded.document.deleted_slides,
        });
        self.inner.dispatch(Action::ScriptDataLoaded {
            script_id: script_id.to_string(),
            paragraphs: loaded.document.content,
        });
        true
    }

    /// Starts editing a different script. Pending loads for other ids become stale.
    #[wasm_bindgen(js_name = selectScript)]
    pub fn select_script(&mut self, script_id: &str) {
        self.inner.dispatch(Action::script_selected(script_id));
    }

    /// Dispatches an action object such as `{ type: "undo" }`.
    pub fn dispatch(&mut self, action: JsValue) -> Result<(), JsValue> {
        let action: Action = from_value(action)?;
        self.inner.dispatch(action);
        Ok(())
    }

    /// Gets the full editor state, including history.
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> Result<JsValue, JsValue> {
        Ok(to_js_value(self.inner.state())?)
    }

    pub fn paragraphs(&self) -> Result<JsValue, JsValue> {
        Ok(to_js_value(&self.inner.paragraphs())?)
    }

    #[wasm_bindgen(js_name = availableSlides)]
    pub fn available_slides(&self) -> Result<JsValue, JsValue> {
        Ok(to_js_value(&self.inner.available_slides())?)
    }

    #[wasm_bindgen(js_name = completionStats)]
    pub fn completion_stats(&self) -> Result<JsValue, JsValue> {
        Ok(to_js_value(&self.inner.completion_stats())?)
    }

    #[wasm_bindgen(js_name = undoAvailable)]
    pub fn undo_available(&self) -> bool {
        self.inner.undo_available()
    }

    #[wasm_bindgen(js_name = redoAvailable)]
    pub fn redo_available(&self) -> bool {
        self.inner.redo_available()
    }

    #[wasm_bindgen(js_name = scriptEdited)]
    pub fn script_edited(&self) -> bool {
        self.inner.script_edited()
    }

    /// Serializes the document for `script_edited.json`.
    ///
    /// Call `dispatch({ type: "scriptSaved" })` only after the write succeeded.
    #[wasm_bindgen(js_name = toEditedJson)]
    pub fn to_edited_json(&self) -> Result<String, JsValue> {
        let json = self
            .inner
            .document()
            .to_pretty_json()
            .map_err(CuratorError::from)?;
        Ok(json)
    }
}

impl Default for JsScriptEditor {
    fn default() -> Self {
        Self::new(None)
    }
}
