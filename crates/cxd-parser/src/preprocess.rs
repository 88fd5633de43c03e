//! Lexical clean-up applied to raw source before parsing.

use regex::Regex;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Code,
    InString,
    InChar,
    InLineComment,
    InBlockComment,
}

/// Remove `//` and `/* */` comments, leaving string and character literals
/// untouched.
///
/// A line comment keeps its terminating newline so line numbers survive.
/// Inside a literal a backslash copies the next character verbatim.
/// Unterminated literals and comments run to the end of input. The result is
/// trimmed on both ends.
#[must_use]
pub fn strip_comments(code: &str) -> String {
    let code = code.trim();
    let mut out = String::with_capacity(code.len());
    let mut state = ScanState::Code;
    let mut chars = code.chars().peekable();

    while let Some(ch) = chars.next() {
        match state {
            ScanState::Code => match ch {
                '"' => {
                    state = ScanState::InString;
                    out.push(ch);
                }
                '\'' => {
                    state = ScanState::InChar;
                    out.push(ch);
                }
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    state = ScanState::InLineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    state = ScanState::InBlockComment;
                }
                _ => out.push(ch),
            },
            ScanState::InString | ScanState::InChar => {
                out.push(ch);
                let closing = if state == ScanState::InString { '"' } else { '\'' };
                if ch == '\\' {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                } else if ch == closing {
                    state = ScanState::Code;
                }
            }
            ScanState::InLineComment => {
                if ch == '\n' {
                    out.push(ch);
                    state = ScanState::Code;
                }
            }
            ScanState::InBlockComment => {
                if ch == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = ScanState::Code;
                }
            }
        }
    }

    out.trim().to_string()
}

static BITS_HEADER_INCLUDE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"#\s*include\s*(?:<\s*bits/stdc\+\+\.h\s*>|"\s*bits/stdc\+\+\.h\s*")"#)
        .expect("valid bits header regex")
});

/// Headers the GCC aggregate `<bits/stdc++.h>` stands for.
pub const BITS_HEADER_EXPANSION: &[&str] = &[
    "iostream", "fstream", "iomanip", "sstream", "streambuf", "locale", "codecvt",
    "array", "vector", "map", "unordered_map", "set", "unordered_set", "forward_list",
    "list", "queue", "deque", "stack", "bitset", "algorithm", "iterator", "string",
    "string_view", "cmath", "cstdio", "cstdlib", "cstring", "functional", "numeric",
    "utility", "limits", "memory", "memory_resource", "scoped_allocator", "new",
    "typeinfo", "typeindex", "type_traits", "optional", "variant", "any", "chrono",
    "random", "ratio", "valarray", "complex", "thread", "mutex", "shared_mutex",
    "condition_variable", "future", "atomic", "regex", "exception", "stdexcept",
    "system_error", "cerrno", "assert.h",
];

/// Replace every `#include <bits/stdc++.h>` (or the quoted form) with one
/// `#include` line per header in [`BITS_HEADER_EXPANSION`].
///
/// Compilers without the GCC aggregate header then see the same declarations.
/// Returns the input unchanged when the header is not included.
#[must_use]
pub fn expand_bits_header(code: &str) -> String {
    if !BITS_HEADER_INCLUDE.is_match(code) {
        return code.to_string();
    }
    let replacement = BITS_HEADER_EXPANSION
        .iter()
        .map(|h| format!("#include <{h}>"))
        .collect::<Vec<_>>()
        .join("\n");
    BITS_HEADER_INCLUDE
        .replace_all(code, regex::NoExpand(&replacement))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn line_comment_keeps_newline() {
        assert_eq!(strip_comments("int x; // comment\nint y;"), "int x; \nint y;");
    }

    #[test]
    fn string_with_slashes_is_preserved() {
        let src = r#"auto s = "http://x";"#;
        assert_eq!(strip_comments(src), src);
    }

    #[rstest]
    #[case::block("int /* gone */ x;", "int  x;")]
    #[case::multiline_block("a/*\n\n*/b", "ab")]
    #[case::escaped_quote(r#"s = "a\"//b"; // c"#, r#"s = "a\"//b";"#)]
    #[case::char_literal(r"c = '\''; // x", r"c = '\'';")]
    #[case::char_slash("c = '/'; /* x */", "c = '/';")]
    #[case::unterminated_block("x; /* never closed", "x;")]
    #[case::unterminated_string(r#"s = "open // not a comment"#, r#"s = "open // not a comment"#)]
    #[case::outer_whitespace("  \n int a; \n\n", "int a;")]
    #[case::only_comment("// nothing", "")]
    fn strips(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strip_comments(input), expected);
    }

    #[test]
    fn line_count_is_preserved_for_line_comments() {
        let src = "a; // one\nb; // two\nc;";
        assert_eq!(strip_comments(src).lines().count(), 3);
    }

    #[test]
    fn expands_angle_and_quoted_forms() {
        for src in ["#include <bits/stdc++.h>\nint main(){}", "# include \"bits/stdc++.h\"\nint main(){}"] {
            let out = expand_bits_header(src);
            assert!(out.starts_with("#include <iostream>\n#include <fstream>"));
            assert!(out.contains("#include <assert.h>\nint main(){}"));
            assert!(!out.contains("bits/stdc++.h"));
        }
    }

    #[test]
    fn expansion_is_identity_without_header() {
        let src = "#include <vector>\nint main(){}";
        assert_eq!(expand_bits_header(src), src);
    }
}
