//! String and character literal handling.

use std::sync::LazyLock;

use regex::Regex;

static STRING_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:u8|u|U|L)?"(?:\\.|[^"\\])*""#).expect("valid string literal regex")
});

static CHAR_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:u8|u|U|L)?'(?:\\.|[^'\\])+'").expect("valid char literal regex")
});

const RAW_PREFIXES: &[&str] = &["u8R\"", "uR\"", "UR\"", "LR\"", "R\""];
const MAX_RAW_DELIMITER: usize = 16;

/// Byte span of the first raw string literal (`R"d(...)d"`) at or after `from`.
fn find_raw_string(text: &str, from: usize) -> Option<(usize, usize)> {
    let mut cursor = from;
    while cursor < text.len() {
        let (start, prefix) = RAW_PREFIXES
            .iter()
            .filter_map(|p| text[cursor..].find(p).map(|i| (cursor + i, *p)))
            .min_by_key(|&(i, p)| (i, std::cmp::Reverse(p.len())))?;
        let body = start + prefix.len();
        let delimiter_len = text[body..]
            .char_indices()
            .take(MAX_RAW_DELIMITER + 1)
            .find(|&(_, c)| c == '(')
            .map(|(i, _)| i);
        if let Some(len) = delimiter_len {
            let delimiter = &text[body..body + len];
            let valid = delimiter
                .chars()
                .all(|c| !c.is_whitespace() && c != ')' && c != '\\');
            let close = format!("){delimiter}\"");
            if valid {
                if let Some(end) = text[body + len + 1..].find(&close) {
                    return Some((start, body + len + 1 + end + close.len()));
                }
            }
        }
        cursor = start + prefix.len();
    }
    None
}

fn replace_raw_strings(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    while let Some((start, end)) = find_raw_string(text, copied) {
        out.push_str(&text[copied..start]);
        out.push_str("\"\"");
        copied = end;
    }
    out.push_str(&text[copied..]);
    out
}

/// Replace every string literal with `""` and every character literal with
/// `''`, so operators inside them stop matching.
#[must_use]
pub fn strip_literals(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let text = replace_raw_strings(text);
    let text = STRING_LITERAL.replace_all(&text, "\"\"");
    CHAR_LITERAL.replace_all(&text, "''").into_owned()
}

#[must_use]
pub fn has_string_literal(text: &str) -> bool {
    STRING_LITERAL.is_match(text) || find_raw_string(text, 0).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(r#"cout << "a << b";"#, r#"cout << "";"#)]
    #[case(r"if (c == '>') x;", "if (c == '') x;")]
    #[case(r#"s = "a\"b" + 'q';"#, r#"s = "" + '';"#)]
    #[case(r#"auto r = R"x(a "quoted" )" b)x";"#, r#"auto r = "";"#)]
    #[case(r#"auto w = L"wide";"#, r#"auto w = "";"#)]
    #[case("int x = 1;", "int x = 1;")]
    #[case("", "")]
    fn strips_literals(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strip_literals(input), expected);
    }

    #[test]
    fn detects_string_literals() {
        assert!(has_string_literal(r#"x == "yes""#));
        assert!(has_string_literal(r#"R"(raw)""#));
        assert!(!has_string_literal("x == 'y'"));
    }
}
