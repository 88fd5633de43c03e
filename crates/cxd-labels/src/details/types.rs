//! Coarse categories for type spellings quoted in diagnostics.
//!
//! MSVC prints types fully expanded (`std::basic_string<char,...>`,
//! `std::_Vector_iterator<...>`), so categories are keyword searches rather
//! than parses.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use super::operators::{CMP_OPS, OPS_SET};
use super::vocab::is_type_word;

macro_rules! type_regex {
    ($name:ident, $pattern:expr) => {
        pub static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($pattern).expect(concat!("valid ", stringify!($name))));
    };
}

type_regex!(STRING_TYPE, r"(?i)\bstd::(?:basic_)?string\b");
type_regex!(ITERATOR_TYPE, r"(?i)\b(?:std::)?\w*iterator\b");
type_regex!(PAIR_TYPE, r"(?i)\bstd::pair\b");
type_regex!(
    STL_CONTAINER,
    r"(?i)\bstd::(?:vector|deque|list|forward_list|array|valarray|map|multimap|unordered_map|unordered_multimap|set|multiset|unordered_set|stack|queue|priority_queue|bitset)\b"
);
type_regex!(
    INDEXABLE_STL,
    r"(?i)\bstd::(?:vector|deque|array|valarray|basic_string|string|wstring|unordered_map|map)\b"
);
type_regex!(
    NON_INDEXABLE_STL,
    r"(?i)\bstd::(?:stack|queue|priority_queue|list|forward_list|set|multiset|unordered_set|unordered_multimap|multimap)\b"
);
type_regex!(COMPLEX_TYPE, r"(?i)\bstd::complex\b");
type_regex!(OSTREAM_TYPE, r"(?i)\bstd::(?:basic_)?ostream\b|std::basic_ostream\s*<");
type_regex!(ISTREAM_TYPE, r"(?i)\bstd::(?:basic_)?istream\b|std::basic_istream\s*<");
type_regex!(
    CHARLIKE,
    r"(?i)\b(?:char|wchar_t|char16_t|char32_t|unsigned\s+char|signed\s+char)\b"
);
type_regex!(
    ARITH_TYPE,
    r"(?i)\b(?:bool|char|wchar_t|char16_t|char32_t|short|int|long|float|double|__int8|__int16|__int32|__int64|unsigned|signed|size_t|uintptr_t|intptr_t|int64_t|int32_t|int16_t|int8_t)\b"
);
type_regex!(PTR_OR_ARRAY, r"\*|\[[^\]]*\]");
type_regex!(ARRAY_TYPE, r"\[[^\]]*\]");
type_regex!(VOID_TYPE, r"(?i)^\s*void\s*$");
type_regex!(OVERLOADED_FUNCTION, r"(?i)\boverloaded-function\b");
type_regex!(CONST_CHAR_ARRAY, r"(?i)\bconst\s+char\s*\[\s*\d+\s*\]");
type_regex!(CONST_QUALIFIER, r"(?i)\bconst\b");

static TYPE_LIKE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:const\s+)?(?:[A-Za-z_]\w*::)*[A-Za-z_]\w*(?:\s*<.*>\s*)?(?:\s*[\*&]\s*)*$",
    )
    .expect("valid type-like token regex")
});

static OUTER_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:const\s+)?((?:[A-Za-z_]\w*::)*[A-Za-z_]\w*)")
        .expect("valid outer type regex")
});

static QUALIFIED_OUTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*((?:(?:const|volatile)\s+)*)(?:class|struct|enum)?\s*((?:[A-Za-z_]\w*::)*[A-Za-z_]\w*)",
    )
    .expect("valid qualified outer regex")
});

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z_][A-Za-z0-9_]*\b").expect("valid word regex"));

/// Whether a quoted fragment of a diagnostic names a type.
#[must_use]
pub fn looks_like_type(token: &str) -> bool {
    if token.is_empty() || CMP_OPS.contains(&token) {
        return false;
    }
    if PTR_OR_ARRAY.is_match(token) || token.contains("::") || token.contains('<') {
        return true;
    }
    WORD.find_iter(token).any(|w| is_type_word(w.as_str()))
}

#[must_use]
pub fn is_char_array(ty: &str) -> bool {
    ty.contains('[') && ty.contains(']') && CHARLIKE.is_match(ty)
}

#[must_use]
pub fn is_arithmetic(ty: &str) -> bool {
    ARITH_TYPE.is_match(ty)
}

#[must_use]
pub fn is_pointer_or_array(ty: &str) -> bool {
    PTR_OR_ARRAY.is_match(ty)
}

/// Outermost type name with a leading `const` dropped:
/// `const std::vector<int>&` -> `std::vector`.
#[must_use]
pub fn outer_type(ty: &str) -> &str {
    OUTER_TYPE
        .captures(ty.trim())
        .and_then(|c| c.get(1))
        .map_or("", |m| m.as_str())
}

/// Outer type name and the lowercase `const`/`volatile` qualifiers in front of it.
#[must_use]
pub fn split_outer_and_qualifiers(ty: &str) -> (&str, BTreeSet<String>) {
    let Some(caps) = QUALIFIED_OUTER.captures(ty.trim()) else {
        return ("", BTreeSet::new());
    };
    let qualifiers = caps
        .get(1)
        .map(|m| {
            m.as_str()
                .split_whitespace()
                .map(str::to_lowercase)
                .collect()
        })
        .unwrap_or_default();
    let outer = caps.get(2).map_or("", |m| m.as_str());
    (outer, qualifiers)
}

/// The most informative type among quoted fragments: the longest one that
/// parses as a type or carries `std`, `::`, `<` or a space.
#[must_use]
pub fn best_type_candidate<'q>(quoted: &[&'q str], op: Option<&str>) -> &'q str {
    let mut candidates: Vec<&str> = quoted
        .iter()
        .copied()
        .filter(|t| !t.is_empty() && !OPS_SET.contains(t) && op != Some(*t))
        .filter(|t| {
            TYPE_LIKE_TOKEN.is_match(t)
                || t.contains("std")
                || t.contains("::")
                || t.contains('<')
                || t.contains(' ')
        })
        .collect();
    // stable: equal lengths keep message order
    candidates.sort_by_key(|t| std::cmp::Reverse(t.len()));
    candidates.first().copied().unwrap_or_default()
}

/// Whether `pattern` matches any of `texts`.
#[must_use]
pub fn matches_any(pattern: &Regex, texts: &[&str]) -> bool {
    texts.iter().any(|t| pattern.is_match(t))
}
