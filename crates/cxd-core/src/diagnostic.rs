//! Compiler diagnostics as plain data.
//!
//! The compiler is an external collaborator. Its output is consumed here as text
//! in the MSVC shape:
//!
//! ```text
//! C:\build\tmp_1f2e.cpp(12): error C2065: cout: undeclared identifier
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

const ERROR_MARKER: &str = "error ";
const LINE_ANCHOR: &str = ".cpp(";
const BITS_HEADER: &str = "bits/stdc++.h";

/// One compiler-emitted diagnostic.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Diagnostic {
    /// Short code, e.g. `C2065`.
    pub code: String,
    /// Localized, template-shaped message. Starts with the code.
    pub message: String,
    /// 1-based line, absent when the compiler gave no line anchor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl Diagnostic {
    /// Build a diagnostic from an already split message (`C2065: cout: ...`).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if the message does not start with a
    /// `code:` field.
    pub fn from_message(message: impl Into<String>, line: Option<u32>) -> Result<Self, CoreError> {
        let message = message.into();
        let code = leading_code(&message)
            .ok_or_else(|| CoreError::Validation(format!("no diagnostic code in '{message}'")))?;
        Ok(Self {
            code: code.to_string(),
            message,
            line,
        })
    }

    /// Parse the first error out of raw compiler output.
    ///
    /// The message is the rest of the line after the first `error ` marker. The
    /// line number comes from the first `.cpp(<n>)` anchor anywhere in the
    /// output. Returns `None` when the output carries no error.
    #[must_use]
    pub fn from_compiler_output(output: &str) -> Option<Self> {
        let start = output.find(ERROR_MARKER)? + ERROR_MARKER.len();
        let rest = &output[start..];
        let message = rest.split('\n').next().unwrap_or_default().trim();
        let code = leading_code(message)?;
        Some(Self {
            code: code.to_string(),
            message: message.to_string(),
            line: first_line_anchor(output),
        })
    }

    /// Whether the diagnostic complains about the GCC aggregate header, which
    /// MSVC does not ship. Such samples should be re-run with the header expanded.
    #[must_use]
    pub fn mentions_missing_bits_header(&self) -> bool {
        self.message.match_indices(BITS_HEADER).any(|(idx, _)| {
            let before = self.message[..idx].ends_with(' ');
            let after = &self.message[idx + BITS_HEADER.len()..];
            before && after.starts_with(':') && !after.starts_with("::")
        })
    }
}

/// The `C2065` in `C2065: cout: ...`.
fn leading_code(message: &str) -> Option<&str> {
    let (head, _) = message.split_once(':')?;
    let head = head.trim();
    let valid = !head.is_empty()
        && head.len() <= 8
        && head.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then_some(head)
}

fn first_line_anchor(output: &str) -> Option<u32> {
    output.match_indices(LINE_ANCHOR).find_map(|(idx, _)| {
        let tail = &output[idx + LINE_ANCHOR.len()..];
        let digits_len = tail.chars().take_while(char::is_ascii_digit).count();
        if digits_len == 0 || !tail[digits_len..].starts_with(')') {
            return None;
        }
        tail[..digits_len].parse().ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_msvc_output() {
        let out = "tmp_ab12.cpp\r\nC:\\b\\tmp_ab12.cpp(7): error C2065: cout: undeclared identifier\r\n";
        let diag = Diagnostic::from_compiler_output(out).unwrap();
        assert_eq!(diag.code, "C2065");
        assert_eq!(diag.message, "C2065: cout: undeclared identifier");
        assert_eq!(diag.line, Some(7));
    }

    #[test]
    fn parses_localized_message() {
        let out = "x.cpp(12): error C2065: cout: необъявленный идентификатор";
        let diag = Diagnostic::from_compiler_output(out).unwrap();
        assert_eq!(diag.code, "C2065");
        assert_eq!(diag.message, "C2065: cout: необъявленный идентификатор");
        assert_eq!(diag.line, Some(12));
    }

    #[test]
    fn output_without_error_yields_none() {
        assert_eq!(Diagnostic::from_compiler_output("tmp.cpp\r\n"), None);
    }

    #[test]
    fn missing_line_anchor_keeps_message() {
        let diag = Diagnostic::from_compiler_output("fatal: error C1083: cannot open").unwrap();
        assert_eq!(diag.code, "C1083");
        assert_eq!(diag.line, None);
    }

    #[test]
    fn from_message_requires_code() {
        assert!(Diagnostic::from_message("no code here", None).is_err());
        let diag = Diagnostic::from_message("C2146: syntax error", Some(3)).unwrap();
        assert_eq!(diag.code, "C2146");
    }

    #[test]
    fn detects_missing_bits_header() {
        let diag = Diagnostic::from_message(
            "C1083: Cannot open include file: bits/stdc++.h: No such file or directory",
            Some(1),
        )
        .unwrap();
        assert!(diag.mentions_missing_bits_header());

        let other = Diagnostic::from_message("C2065: cout: undeclared identifier", Some(1)).unwrap();
        assert!(!other.mentions_missing_bits_header());
    }
}
