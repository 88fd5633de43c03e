//! Tree-sitter backed [`AstProvider`] for C++.
//!
//! tree-sitter gives a concrete syntax tree but no semantics, so the walker
//! layers a small amount of its own on top: lexical scopes for name
//! resolution, a table of well-known standard-library names, and spelling
//! based expression types. Tokens come from a separate lexer pass and are
//! attached to the most specific cursor covering them.

mod decls;
mod lexer;
mod preproc;
mod stdlib;
mod types;
mod walker;

use ast_grep_language::{LanguageExt, SupportLang};
use tracing::debug;

use crate::ast::{SourceRange, Token, TranslationUnit};
use crate::error::ParserError;

use super::{AstProvider, ParseOptions};
use lexer::LineIndex;
use walker::Walker;

#[derive(Debug, Clone, Copy, Default)]
pub struct TreeSitterCppProvider;

impl TreeSitterCppProvider {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl AstProvider for TreeSitterCppProvider {
    fn parse(&self, source: &str, options: &ParseOptions) -> Result<TranslationUnit, ParserError> {
        if u32::try_from(source.len()).is_err() {
            return Err(ParserError::ParseFailed {
                file: options.file_name.clone(),
                message: format!("source of {} bytes is too large", source.len()),
            });
        }

        let grep = SupportLang::Cpp.ast_grep(source);
        let root = grep.root();
        let lines = LineIndex::new(source);

        let mut walker = Walker::new(&lines, options);
        let tu = walker.builder.root();
        walker.walk_children(&root, tu)?;
        let mut builder = walker.finish();
        builder.set_root_extent(SourceRange::new(lines.position(0), lines.position(source.len())));

        let mut token_count = 0usize;
        for raw in lexer::lex(source) {
            let cursor = builder.deepest_cursor_at(raw.offset);
            builder.push_token(Token {
                kind: raw.kind,
                spelling: raw.spelling,
                location: lines.position(raw.offset),
                cursor,
            });
            token_count += 1;
        }

        let unit = builder.finish();
        debug!(
            file = %options.file_name,
            cursors = unit.len(),
            tokens = token_count,
            includes = unit.includes().len(),
            "parsed translation unit"
        );
        Ok(unit)
    }
}

#[cfg(test)]
mod tests;
