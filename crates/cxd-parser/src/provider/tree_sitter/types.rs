//! Type spellings: normalization, classification and the small amount of
//! expression typing the provider performs.

use std::collections::HashSet;

use crate::ast::{TypeInfo, TypeKind};

use super::stdlib::STD_RECORD_NAMES;

const BUILTIN_WORDS: &[&str] = &[
    "bool", "char", "char8_t", "char16_t", "char32_t", "wchar_t", "short", "int", "long", "float",
    "double", "signed", "unsigned",
];

const QUALIFIERS: &[&str] = &["const", "volatile", "static", "constexpr", "mutable", "inline", "register", "extern"];

/// Canonical spacing: single spaces, `int *`, `vector<int>`, `map<int, int>`.
pub(crate) fn normalize_spelling(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;
    for c in raw.chars() {
        if c.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        match c {
            '*' | '&' => {
                if !out.ends_with(['*', '&', ' ', '(', '<']) && !out.is_empty() {
                    out.push(' ');
                }
            }
            '>' | ')' | ',' | '[' | ']' => {}
            _ if pending_space && !out.ends_with(['<', '(']) => out.push(' '),
            _ => {}
        }
        if c == '[' && !out.ends_with(['*', '&']) && !out.is_empty() && !out.ends_with(' ') {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);
        if c == ',' {
            out.push(' ');
        }
    }
    out.replace(",  ", ", ").trim().to_string()
}

/// Strip leading qualifiers and a `std::` prefix: `const std::string` -> `string`.
pub(crate) fn base_name(spelling: &str) -> &str {
    let mut s = spelling.trim();
    loop {
        let Some(stripped) = QUALIFIERS
            .iter()
            .find_map(|q| s.strip_prefix(q).filter(|rest| rest.starts_with(' ')))
        else {
            break;
        };
        s = stripped.trim_start();
    }
    let s = s.strip_prefix("std::").unwrap_or(s);
    s.split('<').next().unwrap_or(s).trim()
}

fn is_builtin(spelling: &str) -> bool {
    let words: Vec<&str> = spelling
        .split_whitespace()
        .filter(|w| !QUALIFIERS.contains(w))
        .collect();
    !words.is_empty() && words.iter().all(|w| BUILTIN_WORDS.contains(w))
}

pub(crate) fn is_arithmetic(spelling: &str) -> bool {
    is_builtin(spelling) && !spelling.contains('*')
}

/// Names declared in the main file that change how a spelling is classified.
#[derive(Debug, Default)]
pub(crate) struct TypeEnv {
    pub records: HashSet<String>,
    pub enums: HashSet<String>,
    pub aliases: HashSet<String>,
    pub template_params: HashSet<String>,
}

impl TypeEnv {
    pub fn classify(&self, spelling: &str) -> TypeKind {
        let s = spelling.trim();
        if s.is_empty() {
            return TypeKind::Invalid;
        }
        if s.ends_with("&&") {
            return TypeKind::RValueReference;
        }
        if s.ends_with('&') {
            return TypeKind::LValueReference;
        }
        if s.ends_with("[]") {
            return TypeKind::IncompleteArray;
        }
        if s.ends_with(']') {
            return TypeKind::ConstantArray;
        }
        if strip_trailing_qualifiers(s).ends_with('*') {
            return TypeKind::Pointer;
        }
        let base = base_name(s);
        if base == "void" {
            TypeKind::Void
        } else if base == "auto" {
            TypeKind::Auto
        } else if is_builtin(base) {
            TypeKind::Builtin
        } else if self.aliases.contains(base) || base == "size_t" || base == "string" {
            TypeKind::Typedef
        } else if self.enums.contains(base) {
            TypeKind::Enum
        } else if self.records.contains(base) || STD_RECORD_NAMES.contains(&base) || s.contains('<') {
            TypeKind::Record
        } else {
            TypeKind::Unexposed
        }
    }

    pub fn info(&self, spelling: &str) -> TypeInfo {
        let spelling = normalize_spelling(spelling);
        TypeInfo::new(self.classify(&spelling), spelling)
    }
}

/// `char *const` -> `char *`.
fn strip_trailing_qualifiers(spelling: &str) -> &str {
    let mut s = spelling.trim_end();
    loop {
        let Some(rest) = ["const", "volatile"].into_iter().find_map(|q| {
            s.strip_suffix(q)
                .filter(|rest| rest.ends_with(' ') || rest.ends_with('*'))
        }) else {
            return s;
        };
        s = rest.trim_end();
    }
}

/// `int *` -> `int`, `int [5]` -> `int`.
pub(crate) fn pointee(spelling: &str) -> Option<String> {
    let s = spelling.trim();
    if let Some(inner) = s.strip_suffix('*') {
        return Some(inner.trim_end().to_string());
    }
    if s.ends_with(']') {
        return s.rfind('[').map(|i| s[..i].trim_end().to_string());
    }
    None
}

/// Top-level template arguments: `map<int, vector<int>>` -> `["int", "vector<int>"]`.
pub(crate) fn template_args(spelling: &str) -> Vec<String> {
    let Some(open) = spelling.find('<') else {
        return Vec::new();
    };
    let Some(close) = spelling.rfind('>') else {
        return Vec::new();
    };
    if close <= open {
        return Vec::new();
    }
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for c in spelling[open + 1..close].chars() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                args.push(current.trim().to_string());
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    if !current.trim().is_empty() {
        args.push(current.trim().to_string());
    }
    args
}

/// Element type produced by `x[i]`.
pub(crate) fn subscript_result(spelling: &str) -> Option<String> {
    if let Some(inner) = pointee(spelling) {
        return Some(inner);
    }
    let base = base_name(spelling);
    let args = template_args(spelling);
    match base {
        "string" | "basic_string" => Some("char".to_string()),
        "vector" | "deque" | "array" => args.into_iter().next(),
        "map" | "unordered_map" => args.into_iter().nth(1),
        _ => None,
    }
}

/// Result type of a member access on a standard container or string.
pub(crate) fn std_member_result(object: &str, member: &str) -> Option<String> {
    let object = object.trim_end_matches(['&', '*', ' ']);
    let base = base_name(object);
    if !STD_RECORD_NAMES.contains(&base) {
        return None;
    }
    let args = template_args(object);
    match member {
        "size" | "length" | "count" => Some("size_t".to_string()),
        "empty" => Some("bool".to_string()),
        "c_str" => Some("const char *".to_string()),
        "substr" => Some(object.to_string()),
        "first" => args.first().cloned(),
        "second" => args.get(1).cloned(),
        "front" | "back" | "top" | "at" => subscript_result(object).or_else(|| args.first().cloned()),
        _ => None,
    }
}

/// Usual arithmetic conversion for two builtin operands.
pub(crate) fn arithmetic_result(lhs: &str, rhs: &str) -> String {
    let rank = |s: &str| {
        let b = base_name(s);
        if b.contains("double") {
            4
        } else if b.contains("float") {
            3
        } else if b.contains("long long") {
            2
        } else if b.contains("long") {
            1
        } else {
            0
        }
    };
    let (l, r) = (rank(lhs), rank(rhs));
    match l.max(r) {
        4 => "double".to_string(),
        3 => "float".to_string(),
        _ if l >= r && l > 0 => base_name(lhs).to_string(),
        _ if r > 0 => base_name(rhs).to_string(),
        _ => "int".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("int*", "int *")]
    #[case("const  char *", "const char *")]
    #[case("int**", "int **")]
    #[case("vector< int >", "vector<int>")]
    #[case("map<int,vector<int> >", "map<int, vector<int>>")]
    #[case("long   long", "long long")]
    #[case("int [10]", "int [10]")]
    #[case("int&", "int &")]
    fn normalizes(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_spelling(raw), expected);
    }

    #[test]
    fn classifies_shapes() {
        let mut env = TypeEnv::default();
        env.records.insert("Node".into());
        env.aliases.insert("ll".into());
        assert_eq!(env.classify("int *"), TypeKind::Pointer);
        assert_eq!(env.classify("char *const"), TypeKind::Pointer);
        assert_eq!(env.classify("Node"), TypeKind::Record);
        assert_eq!(env.classify("vector<int>"), TypeKind::Record);
        assert_eq!(env.classify("std::string"), TypeKind::Typedef);
        assert_eq!(env.classify("const long long"), TypeKind::Builtin);
        assert_eq!(env.classify("ll"), TypeKind::Typedef);
        assert_eq!(env.classify("int [3]"), TypeKind::ConstantArray);
        assert_eq!(env.classify("void"), TypeKind::Void);
        assert_eq!(env.classify("Mystery"), TypeKind::Unexposed);
    }

    #[test]
    fn container_element_types() {
        assert_eq!(subscript_result("vector<long long>").as_deref(), Some("long long"));
        assert_eq!(subscript_result("map<string, int>").as_deref(), Some("int"));
        assert_eq!(subscript_result("int *").as_deref(), Some("int"));
        assert_eq!(subscript_result("std::string").as_deref(), Some("char"));
        assert_eq!(subscript_result("Node"), None);
    }

    #[test]
    fn member_results() {
        assert_eq!(std_member_result("vector<int>", "size").as_deref(), Some("size_t"));
        assert_eq!(std_member_result("pair<int, double>", "second").as_deref(), Some("double"));
        assert_eq!(std_member_result("Node", "size"), None);
    }

    #[test]
    fn arithmetic_conversions() {
        assert_eq!(arithmetic_result("int", "double"), "double");
        assert_eq!(arithmetic_result("long long", "int"), "long long");
        assert_eq!(arithmetic_result("char", "int"), "int");
    }
}
