//! Script document module.
//!
//! Provides the document model and the load-time conversion that merges
//! precomputed slide matches with a previously saved document.

pub mod convert;
pub mod model;

// Re-exports for convenience
pub use convert::{
    load_document, load_document_with_prefix, slide_library_from_document, LoadedDocument,
};
pub use model::{
    slide_name, Paragraph, ScriptDocument, Slide, SlideCandidate, SlideMatch, SlideMatchResult,
};
