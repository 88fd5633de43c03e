//! Source text normalization, line windows and identifier candidates.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use super::vocab::{CPP_FUNCTIONS, is_keyword};

static IDENT_IN_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z_][A-Za-z0-9_]*\b").expect("valid identifier regex"));

static CALL_IN_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Za-z_][A-Za-z0-9_]*)\s*\(").expect("valid call regex")
});

/// Undo storage escaping: literal `\n` becomes a newline, and `\"` becomes `"`
/// when escaped quotes outnumber bare ones.
#[must_use]
pub fn normalize_source_text(source: &str) -> String {
    let text = source.replace("\\n", "\n");
    let escaped = text.matches("\\\"").count();
    let bare = text.matches('"').count() - escaped;
    if escaped > bare {
        text.replace("\\\"", "\"")
    } else {
        text
    }
}

/// Lines `line - radius ..= line + radius` (1-based `line`), clamped to the text.
#[must_use]
pub fn lines_window(source: &str, line: u32, radius: usize) -> Vec<&str> {
    let lines: Vec<&str> = source.split('\n').collect();
    let center = (line as usize).saturating_sub(1);
    let start = center.saturating_sub(radius);
    let end = lines.len().min(center + radius + 1);
    if start >= end {
        return Vec::new();
    }
    lines[start..end].to_vec()
}

/// The first window line mentioning `ident` as a whole word, else the middle line.
#[must_use]
pub fn focus_line<'s>(window: &[&'s str], ident: Option<&str>) -> &'s str {
    if let Some(ident) = ident.filter(|i| !i.is_empty()) {
        if let Some(line) = window.iter().copied().find(|line| has_word(line, ident)) {
            return line;
        }
    }
    window.get(window.len() / 2).copied().unwrap_or_default()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whether `needle` occurs in `haystack` delimited by word boundaries on both ends.
#[must_use]
pub fn has_word(haystack: &str, needle: &str) -> bool {
    let (Some(first), Some(last)) = (needle.chars().next(), needle.chars().next_back()) else {
        return false;
    };
    haystack.match_indices(needle).any(|(idx, _)| {
        let before = haystack[..idx].chars().next_back();
        let after = haystack[idx + needle.len()..].chars().next();
        let opens = before.is_some_and(is_word_char) != is_word_char(first);
        let closes = after.is_some_and(is_word_char) != is_word_char(last);
        opens && closes
    })
}

/// Lines within `window` of the 1-based `line`, or every line when `line` is
/// outside the text.
fn relevant_lines(source: &str, line: Option<u32>, window: usize) -> Vec<&str> {
    let lines: Vec<&str> = source.split('\n').collect();
    match line.map(|l| l as usize) {
        Some(line) if line > 0 && line <= lines.len() => {
            let start = (line - 1).saturating_sub(window);
            let end = lines.len().min(line + window);
            lines[start..end].to_vec()
        }
        _ => lines,
    }
}

/// Non-keyword identifiers near the error line.
#[must_use]
pub fn identifier_candidates(source: &str, line: Option<u32>, window: usize) -> BTreeSet<String> {
    relevant_lines(source, line, window)
        .into_iter()
        .flat_map(|l| IDENT_IN_CODE.find_iter(l))
        .map(|m| m.as_str())
        .filter(|ident| !is_keyword(ident))
        .map(str::to_string)
        .collect()
}

/// Names called near the error line, excluding well-known library functions.
#[must_use]
pub fn function_candidates(source: &str, line: Option<u32>, window: usize) -> BTreeSet<String> {
    relevant_lines(source, line, window)
        .into_iter()
        .flat_map(|l| CALL_IN_CODE.captures_iter(l))
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .filter(|name| !CPP_FUNCTIONS.contains(*name))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn normalize_expands_escaped_newlines() {
        assert_eq!(normalize_source_text(r"int a;\nint b;"), "int a;\nint b;");
    }

    #[test]
    fn normalize_unescapes_mostly_escaped_quotes() {
        assert_eq!(
            normalize_source_text(r#"cout << \"hi\";"#),
            r#"cout << "hi";"#
        );
        assert_eq!(
            normalize_source_text(r#"s = "a\"b";"#),
            r#"s = "a\"b";"#
        );
    }

    #[test]
    fn window_clamps_to_text() {
        let src = "a\nb\nc\nd";
        assert_eq!(lines_window(src, 1, 1), vec!["a", "b"]);
        assert_eq!(lines_window(src, 3, 1), vec!["b", "c", "d"]);
        assert_eq!(lines_window(src, 9, 1), Vec::<&str>::new());
        assert_eq!(lines_window(src, 0, 0), vec!["a"]);
    }

    #[test]
    fn focus_prefers_line_with_word() {
        let window = ["int a;", "int b;", "cin >> a b;"];
        assert_eq!(focus_line(&window, Some("b")), "int b;");
        assert_eq!(focus_line(&window, Some("zz")), "int b;");
        assert_eq!(focus_line(&[], Some("b")), "");
    }

    #[rstest]
    #[case("int count = 0;", "count", true)]
    #[case("int counter = 0;", "count", false)]
    #[case("x=count;", "count", true)]
    #[case("a::count", "count", true)]
    #[case("", "count", false)]
    fn word_boundaries(#[case] hay: &str, #[case] needle: &str, #[case] expected: bool) {
        assert_eq!(has_word(hay, needle), expected);
    }

    #[test]
    fn identifier_candidates_skip_keywords() {
        let src = "int main() {\n    int total = 0;\n    retrun totl;\n}";
        let got = identifier_candidates(src, Some(3), 10);
        let want: BTreeSet<String> =
            ["main", "retrun", "total", "totl"].into_iter().map(String::from).collect();
        assert_eq!(got, want);
    }

    #[test]
    fn identifier_candidates_respect_window() {
        let src = "int far;\n\n\nint near;\nx;";
        let got = identifier_candidates(src, Some(5), 1);
        assert!(got.contains("near"));
        assert!(!got.contains("far"));
    }

    #[test]
    fn function_candidates_skip_library_calls() {
        let src = "int solve(int n) { return sqrt(n); }\nint x = slove(3);";
        let got = function_candidates(src, Some(2), 10);
        let want: BTreeSet<String> =
            ["slove", "solve"].into_iter().map(String::from).collect();
        assert_eq!(got, want);
    }
}
