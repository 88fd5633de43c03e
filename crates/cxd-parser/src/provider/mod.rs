//! The AST front end seam.
//!
//! Indexing and extraction only ever see a [`TranslationUnit`]; where it comes
//! from is up to the [`AstProvider`]. [`TreeSitterCppProvider`] is the
//! built-in implementation.

pub mod tree_sitter;

pub use self::tree_sitter::TreeSitterCppProvider;

use crate::ast::TranslationUnit;
use crate::error::ParserError;

/// Default name of the file under diagnosis.
pub const DEFAULT_FILE_NAME: &str = "code.cpp";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Name the main file is registered under.
    pub file_name: String,
    /// Produce macro and preprocessing-directive cursors.
    pub track_macros: bool,
}

impl ParseOptions {
    #[must_use]
    pub fn new(track_macros: bool) -> Self {
        Self {
            track_macros,
            ..Self::default()
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_FILE_NAME.to_string(),
            track_macros: false,
        }
    }
}

/// Something that turns source text into a [`TranslationUnit`].
///
/// Implementations must be usable from several threads at once; each call
/// builds an independent unit.
pub trait AstProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns [`ParserError::ParseFailed`] when no unit can be produced.
    fn parse(&self, source: &str, options: &ParseOptions) -> Result<TranslationUnit, ParserError>;
}
