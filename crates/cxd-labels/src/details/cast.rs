//! Detection of explicit casts to a given destination type.

use std::sync::LazyLock;

use regex::Regex;

static TAG_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:class|struct|enum)\s+").expect("valid tag prefix regex"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

static TYPE_TAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*?)((?:\s*[\*&]\s*)+)?\s*$").expect("valid type tail regex")
});

/// `sizeof(...)` and friends name types without converting anything.
static TYPE_ID_CONTEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:sizeof|alignof|decltype|typeid)\s*\(\s*[^()]*\)")
        .expect("valid type-id context regex")
});

/// `class Foo  *` -> `Foo *`.
#[must_use]
pub fn normalize_type_name(ty: &str) -> String {
    let ty = TAG_PREFIX.replace(ty.trim(), "");
    WHITESPACE.replace_all(&ty, " ").trim().to_string()
}

/// Pattern source matching `ty` as written in code: free spacing around
/// `*`/`&`, and the usual spellings of the `long long` family.
#[must_use]
pub fn destination_type_pattern(ty: &str) -> String {
    let ty = normalize_type_name(ty);
    let (base, suffix) = TYPE_TAIL.captures(&ty).map_or((ty.as_str(), ""), |c| {
        (
            c.get(1).map_or("", |m| m.as_str()),
            c.get(2).map_or("", |m| m.as_str()),
        )
    });
    let base = base.trim();

    let mut variants = vec![regex::escape(base)];
    let synonyms: &[&str] = match base {
        "ll" => &[
            r"long\s+long",
            r"long\s+long\s+int",
            r"signed\s+long\s+long",
            r"signed\s+long\s+long\s+int",
        ],
        "ull" => &[r"unsigned\s+long\s+long", r"unsigned\s+long\s+long\s+int"],
        "long long" => &[r"long\s+long", r"long\s+long\s+int"],
        _ => &[],
    };
    variants.extend(synonyms.iter().map(|s| (*s).to_string()));

    let suffix: String = suffix
        .chars()
        .filter(|c| matches!(c, '*' | '&'))
        .map(|c| format!(r"\s*{}\s*", regex::escape(&c.to_string())))
        .collect();
    format!("(?:{}){suffix}", variants.join("|"))
}

/// Whether `line` already casts something to the type `pattern` matches,
/// in keyword, C-style or functional form. Functional casts are only
/// considered for non-pointer, non-reference destinations.
#[must_use]
pub fn has_explicit_cast(line: &str, pattern: &str) -> bool {
    if line.is_empty() {
        return false;
    }
    let safe = TYPE_ID_CONTEXT.replace_all(line, " ");

    let keyword_cast = format!(
        r"\b(?:static_cast|reinterpret_cast|const_cast|dynamic_cast)\s*<\s*{pattern}\s*>\s*\("
    );
    let c_style = format!(r#"(?:^|[^\w:])\(\s*{pattern}\s*\)\s*[A-Za-z_(0-9"'&*]"#);
    let mut forms = vec![keyword_cast, c_style];
    if !pattern.contains('*') && !pattern.contains('&') {
        forms.push(format!(r"\b{pattern}\s*\("));
    }

    forms
        .iter()
        .filter_map(|form| Regex::new(form).ok())
        .any(|re| re.is_match(&safe))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn normalizes_type_names() {
        assert_eq!(normalize_type_name("  class   Foo  * "), "Foo *");
        assert_eq!(normalize_type_name("unsigned\tint"), "unsigned int");
    }

    #[test]
    fn pointer_suffix_tolerates_spacing() {
        let pattern = destination_type_pattern("int *");
        let re = Regex::new(&format!("^{pattern}$")).unwrap();
        assert!(re.is_match("int*"));
        assert!(re.is_match("int *"));
        assert!(!re.is_match("int&"));
    }

    #[test]
    fn long_long_synonyms() {
        let pattern = destination_type_pattern("ll");
        let re = Regex::new(&format!("^{pattern}$")).unwrap();
        assert!(re.is_match("long long"));
        assert!(re.is_match("signed long long int"));
        assert!(re.is_match("ll"));
    }

    #[rstest]
    #[case("int x = static_cast<int>(d);", "int", true)]
    #[case("int x = (int)d;", "int", true)]
    #[case("int x = int(d);", "int", true)]
    #[case("int x = sizeof(int);", "int", false)]
    #[case("int x = d;", "int", false)]
    #[case("char* p = (char *)buf;", "char *", true)]
    #[case("char* p = char(buf);", "char *", false)]
    #[case("ll v = (long long) a * b;", "ll", true)]
    fn explicit_casts(#[case] line: &str, #[case] ty: &str, #[case] expected: bool) {
        let pattern = destination_type_pattern(ty);
        assert_eq!(has_explicit_cast(line, &pattern), expected);
    }
}
