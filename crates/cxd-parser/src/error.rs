//! Parser error types for cxd-parser.

use crate::ast::CursorId;

/// Errors raised while parsing, indexing or extracting context.
///
/// None of these escape [`crate::pipeline::safe_extract_context`]; they are
/// logged there and turned into an empty record.
#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    #[error("Parse failed for {file}: {message}")]
    ParseFailed { file: String, message: String },

    #[error("Cursor {0} is not part of the translation unit")]
    DanglingCursor(CursorId),

    #[error("Line {0} is not a valid 1-based line")]
    InvalidLine(u32),
}
