//! Editor module.
//!
//! Holds the mutation state machine for an open script: actions, the pure
//! reducer with linear undo/redo history, derived selectors and a
//! single-writer store around them.

pub mod action;
pub mod reducer;
pub mod selectors;
pub mod state;
pub mod store;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-exports for convenience
pub use action::{split_text, Action};
pub use reducer::reduce;
pub use selectors::CompletionStats;
pub use state::{EditorState, Snapshot};
pub use store::EditorStore;

#[cfg(feature = "wasm")]
pub use wasm::JsScriptEditor;
