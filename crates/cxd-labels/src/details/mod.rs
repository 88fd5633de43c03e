//! Shared building blocks for label functions.
//!
//! Nothing here knows about diagnostic families except [`fields`], which
//! owns one extractor per message template. Everything else is a small pure
//! predicate over source text, type spellings or identifier vocabularies.

pub mod cast;
pub mod fields;
pub mod literals;
pub mod operators;
pub mod shapes;
pub mod similarity;
pub mod source;
pub mod types;
pub mod vocab;
