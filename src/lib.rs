//! SlideCurator - assign slide images to transcript paragraphs.
//!
//! This crate holds the editing engine behind a slide curation UI:
//!
//! - **Document model**: scripts of paragraphs, each with suggested and
//!   confirmed slides, plus a slide library
//! - **Load-time merge**: precomputed slide matches are attached to paragraphs
//!   by id, unless a saved, hand-edited document already exists
//! - **Editor**: a pure `(state, action) -> state` reducer with linear
//!   undo/redo history, a dirty flag and derived selectors
//! - **Session**: script discovery, stale-load discard and save-then-checkpoint
//!   over an injected file repository
//!
//! # Example
//!
//! ```rust
//! use slidecurator::{Action, CurationSession, CuratorConfig, MemoryRepository, SlideCandidate};
//!
//! let repo = MemoryRepository::new()
//!     .with_file("scripts/intro/script.json", r#"{"content": [{"id": 1, "text": "Hello"}]}"#)
//!     .with_file(
//!         "scripts/intro/slide_matches.json",
//!         r#"[{"slide_file": "deck/p1.png", "results": [{"paragraph_id": "1", "score": 0.9}]}]"#,
//!     );
//! let mut session = CurationSession::new(repo, CuratorConfig::new().with_script_root("scripts"));
//!
//! session.open_script("intro").unwrap();
//! session.dispatch(Action::select_slide(1, SlideCandidate::new("deck/p1.png", 0.9)));
//! assert!(session.store().script_edited());
//!
//! session.save().unwrap();
//! assert!(!session.store().undo_available());
//! ```

pub mod config;
pub mod error;
pub mod repository;
pub mod session;

// Script module
pub mod script;

// Editor module
pub mod editor;

// Re-exports for convenience
pub use config::{CuratorConfig, ScriptLayout};
pub use editor::{reduce, Action, CompletionStats, EditorState, EditorStore, Snapshot};
pub use error::{CuratorError, CuratorResult};
pub use repository::{FsRepository, MemoryRepository, ScriptRepository};
pub use script::{load_document, LoadedDocument, Paragraph, ScriptDocument, Slide, SlideCandidate};
pub use session::{CurationSession, LoadTicket, LoadedScript};

#[cfg(feature = "wasm")]
pub use editor::JsScriptEditor;
