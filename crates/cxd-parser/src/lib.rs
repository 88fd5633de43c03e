//! # cxd-parser
//!
//! Source preprocessing, AST indexing and context extraction for C++
//! diagnostics.
//!
//! - [`preprocess`]: comment stripping and `bits/stdc++.h` expansion
//! - [`provider`]: the [`AstProvider`] seam and the tree-sitter implementation
//! - [`index`]: one-pass translation index over the main file
//! - [`context`]: focus cursor, metadata, parent chain and token normalization
//! - [`pipeline`]: the fault-isolated parse -> index -> extract driver

pub mod ast;
pub mod context;
pub mod error;
pub mod index;
pub mod pipeline;
pub mod preprocess;
pub mod provider;

pub use context::{DEFAULT_RADIUS, extract_context};
pub use error::ParserError;
pub use index::{TuIndex, build_index};
pub use pipeline::safe_extract_context;
pub use preprocess::{expand_bits_header, strip_comments};
pub use provider::{AstProvider, ParseOptions, TreeSitterCppProvider};
