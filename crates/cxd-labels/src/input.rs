//! The immutable bundle every label function reads.

use cxd_core::diagnostic::Diagnostic;

use crate::details::source::normalize_source_text;

/// Lines on each side of the error line searched for spelling candidates.
pub const DEFAULT_CANDIDATE_WINDOW: usize = 10;

/// A diagnostic plus the source it was reported against.
///
/// The source is normalized once on construction, so rules always see real
/// newlines even when the sample was stored with `\n` escapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelInput {
    pub code: String,
    pub text: String,
    pub source: String,
    /// 1-based error line. Rules that need a source window abstain without it.
    pub line: Option<u32>,
    pub candidate_window: usize,
}

impl LabelInput {
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        text: impl Into<String>,
        source: &str,
        line: Option<u32>,
    ) -> Self {
        Self {
            code: code.into(),
            text: text.into(),
            source: normalize_source_text(source),
            line,
            candidate_window: DEFAULT_CANDIDATE_WINDOW,
        }
    }

    #[must_use]
    pub fn from_diagnostic(diagnostic: &Diagnostic, source: &str) -> Self {
        Self::new(
            diagnostic.code.as_str(),
            diagnostic.message.as_str(),
            source,
            diagnostic.line,
        )
    }

    #[must_use]
    pub const fn with_candidate_window(mut self, window: usize) -> Self {
        self.candidate_window = window;
        self
    }

    /// Whether this input belongs to the family of `code`.
    #[must_use]
    pub fn is(&self, code: &str) -> bool {
        self.code == code
    }

    /// Source lines `line - radius ..= line + radius`, clamped to the file.
    #[must_use]
    pub fn window(&self, radius: usize) -> Option<Vec<&str>> {
        self.line
            .map(|line| crate::details::source::lines_window(&self.source, line, radius))
    }
}
