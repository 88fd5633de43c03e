//! Conversions between incompatible types (C2440, C2446).

use std::sync::LazyLock;

use cxd_core::enums::FixCategory;
use regex::Regex;

use crate::details::cast::{destination_type_pattern, has_explicit_cast};
use crate::details::fields::{comparison_operator, conversion_types, quoted_fragments};
use crate::details::literals::{has_string_literal, strip_literals};
use crate::details::operators::CMP_OPS;
use crate::details::types::{CHARLIKE, is_arithmetic, is_char_array, is_pointer_or_array, looks_like_type};
use crate::input::LabelInput;

/// Conversion impossible.
pub const C2440: &str = "C2440";
/// No conversion between the operands of a comparison.
pub const C2446: &str = "C2446";

const NULL_CONSTANT: &str = r"(?:nullptr|NULL|0(?:x0+)?(?:[uUlL]{0,3})?)";
const STRING_LITERAL: &str = r#""(?:\\.|[^"\\])*""#;

/// C string comparisons compare contents, not pointers.
static CONTENT_COMPARISON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:strcmp|wcscmp|strncmp|wcsncmp|memcmp)\s*\(").expect("valid content comparison regex")
});

/// `s.find("x") == ...` where the literal is a search key.
static FIND_WITH_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)\bfind\s*\(\s*"(?:\\.|[^"\\])*"\s*(?:==|!=|<=|>=|<|>)"#)
        .expect("valid find precedence regex")
});

fn is_equality(op: &str) -> bool {
    op == "==" || op == "!="
}

/// `p == nullptr`, `0 != q` and the like, outside literals.
fn has_null_comparison(text: &str, op: &str) -> bool {
    if !is_equality(op) {
        return false;
    }
    let op = regex::escape(op);
    let pattern = format!(r"\b{NULL_CONSTANT}\b\s*{op}|{op}\s*\b{NULL_CONSTANT}\b");
    Regex::new(&pattern).is_ok_and(|re| re.is_match(&strip_literals(text)))
}

/// A string literal directly on either side of `op`.
fn has_string_literal_in_comparison(text: &str, op: &str) -> bool {
    if !is_equality(op) {
        return false;
    }
    let op = regex::escape(op);
    let pattern = format!(r"(?s){STRING_LITERAL}\s*{op}|{op}\s*{STRING_LITERAL}");
    Regex::new(&pattern).is_ok_and(|re| re.is_match(text))
}

/// The destination type is already cast to nearby, so the cast itself is wrong.
#[must_use]
pub fn c2440_fix_cast(input: &LabelInput) -> Option<FixCategory> {
    if !input.is(C2440) {
        return None;
    }
    let (_, to) = conversion_types(&input.text)?;
    let pattern = destination_type_pattern(to);
    input
        .window(1)?
        .iter()
        .any(|line| has_explicit_cast(line, &pattern))
        .then_some(FixCategory::FixCast)
}

/// A pointer or array compared with something that is not a pointer.
///
/// Content comparisons (`strcmp`), null checks and `find("...")` precedence
/// slips abstain, as does comparing a `char` array against a number next to a
/// string literal.
#[must_use]
pub fn c2446_fix_pointers_for_cast(input: &LabelInput) -> Option<FixCategory> {
    if !input.is(C2446) {
        return None;
    }
    let op = comparison_operator(&input.text)?;
    if !CMP_OPS.contains(&op) {
        return None;
    }

    let focus: Vec<&str> = input
        .window(1)?
        .into_iter()
        .filter(|line| line.contains(op))
        .collect();
    if focus.is_empty() {
        return None;
    }
    let window_text = focus.join("\n");

    if CONTENT_COMPARISON.is_match(&window_text) || has_null_comparison(&window_text, op) {
        return None;
    }

    let types: Vec<&str> = quoted_fragments(&input.text)
        .into_iter()
        .filter(|t| looks_like_type(t))
        .collect();
    let pointers: Vec<&str> = types.iter().copied().filter(|t| is_pointer_or_array(t)).collect();
    if pointers.is_empty() {
        return None;
    }

    if has_string_literal_in_comparison(&window_text, op) {
        if FIND_WITH_LITERAL.is_match(&window_text) {
            return None;
        }
        if types.iter().any(|t| is_char_array(t)) && types.iter().any(|t| is_arithmetic(t)) {
            return None;
        }
    }

    let char_pointers = pointers.len() >= 2 && pointers.iter().any(|t| CHARLIKE.is_match(t));

    if is_equality(op) {
        if char_pointers && has_string_literal(&window_text) {
            return Some(FixCategory::FixPointersForCast);
        }
        if pointers.len() == 1 && types.len() >= 2 && types.iter().any(|t| !pointers.contains(t)) {
            return Some(FixCategory::FixPointersForCast);
        }
    }

    char_pointers.then_some(FixCategory::FixPointersForCast)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("p == nullptr", "==", true)]
    #[case("0 != q", "!=", true)]
    #[case("p == 0x0", "==", true)]
    #[case("p == 10", "==", false)]
    #[case("s == \"0\"", "==", false)]
    #[case("p < nullptr", "<", false)]
    fn null_comparisons(#[case] text: &str, #[case] op: &str, #[case] expected: bool) {
        assert_eq!(has_null_comparison(text, op), expected);
    }

    #[test]
    fn literal_next_to_operator() {
        assert!(has_string_literal_in_comparison("if (s == \"yes\")", "=="));
        assert!(has_string_literal_in_comparison("if (\"a\" != s)", "!="));
        assert!(!has_string_literal_in_comparison("if (s == t)", "=="));
    }

    fn c2440(to: &str, source: &str, line: u32) -> LabelInput {
        LabelInput::new(
            C2440,
            format!("C2440: =: невозможно преобразовать \"double\" в \"{to}\""),
            source,
            Some(line),
        )
    }

    #[test]
    fn existing_cast_to_destination() {
        let src = "int main() {\n    int* p = (int*)3.5;\n}";
        assert_eq!(c2440_fix_cast(&c2440("int *", src, 2)), Some(FixCategory::FixCast));
    }

    #[test]
    fn plain_conversion_abstains() {
        let src = "int main() {\n    int* p = 3.5;\n}";
        assert_eq!(c2440_fix_cast(&c2440("int *", src, 2)), None);
    }

    fn c2446(message: &str, source: &str, line: u32) -> LabelInput {
        LabelInput::new(C2446, message, source, Some(line))
    }

    #[test]
    fn pointer_compared_with_number() {
        let input = c2446(
            "C2446: ==: нет преобразования \"int\" в \"int *\"",
            "int main() {\n    if (p == n) {}\n}",
            2,
        );
        assert_eq!(c2446_fix_pointers_for_cast(&input), Some(FixCategory::FixPointersForCast));
    }

    #[test]
    fn char_pointers_against_literal() {
        let input = c2446(
            "C2446: ==: нет преобразования \"const char *\" в \"char *\"",
            "int main() {\n    if (name == \"bob\") {}\n}",
            2,
        );
        assert_eq!(c2446_fix_pointers_for_cast(&input), Some(FixCategory::FixPointersForCast));
    }

    #[rstest]
    #[case("int main() {\n    if (strcmp(a, b) == n) {}\n}")]
    #[case("int main() {\n    if (p == NULL) {}\n}")]
    fn content_and_null_checks_abstain(#[case] source: &str) {
        let input = c2446("C2446: ==: нет преобразования \"int\" в \"int *\"", source, 2);
        assert_eq!(c2446_fix_pointers_for_cast(&input), None);
    }

    #[test]
    fn operator_absent_from_window_abstains() {
        let input = c2446(
            "C2446: ==: нет преобразования \"int\" в \"int *\"",
            "int main() {\n    f();\n}",
            2,
        );
        assert_eq!(c2446_fix_pointers_for_cast(&input), None);
    }
}
