//! Standard-library entities the provider resolves by name.
//!
//! The provider does not read headers. Instead, names listed here resolve to
//! synthetic declarations in [`EXTERNAL_FILE`](crate::ast::EXTERNAL_FILE)
//! when their header is visible and, for `std` members, when the name is
//! reachable through `std::`, `using namespace std;` or `using std::name;`.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::ast::{CursorKind, TypeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StdEntity {
    pub kind: CursorKind,
    pub header: &'static str,
    /// Lives in namespace `std` (C library functions do not).
    pub in_std: bool,
    pub type_kind: TypeKind,
    /// Variable type, function result type, or typedef underlying type.
    pub type_spelling: &'static str,
}

const fn var(header: &'static str, ty: &'static str) -> StdEntity {
    StdEntity {
        kind: CursorKind::VarDecl,
        header,
        in_std: true,
        type_kind: TypeKind::Record,
        type_spelling: ty,
    }
}

const fn func(header: &'static str, in_std: bool, result: &'static str) -> StdEntity {
    StdEntity {
        kind: CursorKind::FunctionDecl,
        header,
        in_std,
        type_kind: TypeKind::FunctionProto,
        type_spelling: result,
    }
}

const fn template_func(header: &'static str, result: &'static str) -> StdEntity {
    StdEntity {
        kind: CursorKind::FunctionTemplate,
        header,
        in_std: true,
        type_kind: TypeKind::FunctionProto,
        type_spelling: result,
    }
}

const fn class_template(header: &'static str) -> StdEntity {
    StdEntity {
        kind: CursorKind::ClassTemplate,
        header,
        in_std: true,
        type_kind: TypeKind::Record,
        type_spelling: "",
    }
}

const fn typedef(header: &'static str, underlying: &'static str) -> StdEntity {
    StdEntity {
        kind: CursorKind::TypedefDecl,
        header,
        in_std: true,
        type_kind: TypeKind::Typedef,
        type_spelling: underlying,
    }
}

pub(crate) static STD_ENTITIES: LazyLock<HashMap<&'static str, StdEntity>> = LazyLock::new(|| {
    HashMap::from([
        // streams
        ("cin", var("istream", "std::istream")),
        ("cout", var("ostream", "std::ostream")),
        ("cerr", var("ostream", "std::ostream")),
        ("clog", var("ostream", "std::ostream")),
        ("endl", template_func("ostream", "std::ostream &")),
        ("getline", template_func("string", "std::istream &")),
        ("setprecision", func("iomanip", true, "")),
        ("fixed", func("ios", true, "std::ios_base &")),
        // C library
        ("printf", func("cstdio", false, "int")),
        ("scanf", func("cstdio", false, "int")),
        ("puts", func("cstdio", false, "int")),
        ("getchar", func("cstdio", false, "int")),
        ("putchar", func("cstdio", false, "int")),
        ("strlen", func("cstring", false, "size_t")),
        ("strcmp", func("cstring", false, "int")),
        ("strcpy", func("cstring", false, "char *")),
        ("strcat", func("cstring", false, "char *")),
        ("memset", func("cstring", false, "void *")),
        ("memcpy", func("cstring", false, "void *")),
        ("abs", func("cstdlib", false, "int")),
        ("rand", func("cstdlib", false, "int")),
        ("srand", func("cstdlib", false, "void")),
        ("exit", func("cstdlib", false, "void")),
        ("malloc", func("cstdlib", false, "void *")),
        ("free", func("cstdlib", false, "void")),
        ("atoi", func("cstdlib", false, "int")),
        ("sqrt", func("cmath", false, "double")),
        ("pow", func("cmath", false, "double")),
        ("fabs", func("cmath", false, "double")),
        ("floor", func("cmath", false, "double")),
        ("ceil", func("cmath", false, "double")),
        ("round", func("cmath", false, "double")),
        ("log", func("cmath", false, "double")),
        ("exp", func("cmath", false, "double")),
        ("sin", func("cmath", false, "double")),
        ("cos", func("cmath", false, "double")),
        // algorithms and utilities
        ("sort", template_func("algorithm", "void")),
        ("stable_sort", template_func("algorithm", "void")),
        ("reverse", template_func("algorithm", "void")),
        ("max", template_func("algorithm", "")),
        ("min", template_func("algorithm", "")),
        ("max_element", template_func("algorithm", "")),
        ("min_element", template_func("algorithm", "")),
        ("find", template_func("algorithm", "")),
        ("count", template_func("algorithm", "")),
        ("fill", template_func("algorithm", "void")),
        ("unique", template_func("algorithm", "")),
        ("lower_bound", template_func("algorithm", "")),
        ("upper_bound", template_func("algorithm", "")),
        ("binary_search", template_func("algorithm", "bool")),
        ("next_permutation", template_func("algorithm", "bool")),
        ("swap", template_func("utility", "void")),
        ("make_pair", template_func("utility", "")),
        ("accumulate", template_func("numeric", "")),
        ("gcd", template_func("numeric", "")),
        ("to_string", func("string", true, "std::string")),
        ("stoi", func("string", true, "int")),
        ("stoll", func("string", true, "long long")),
        // types
        ("string", typedef("string", "std::basic_string<char>")),
        ("size_t", typedef("cstddef", "unsigned long long")),
        ("vector", class_template("vector")),
        ("map", class_template("map")),
        ("unordered_map", class_template("unordered_map")),
        ("set", class_template("set")),
        ("unordered_set", class_template("unordered_set")),
        ("multiset", class_template("set")),
        ("pair", class_template("utility")),
        ("queue", class_template("queue")),
        ("priority_queue", class_template("queue")),
        ("stack", class_template("stack")),
        ("deque", class_template("deque")),
        ("list", class_template("list")),
        ("array", class_template("array")),
        ("bitset", class_template("bitset")),
        ("complex", class_template("complex")),
        ("tuple", class_template("tuple")),
    ])
});

/// Headers whose content `<iostream>` brings in with common standard libraries.
const IOSTREAM_PULLS: &[&str] = &[
    "istream", "ostream", "ios", "string", "cstdio", "cstdlib", "cstring", "cmath", "utility",
    "cstddef",
];

/// Whether an entity declared in `header` is visible given the direct includes.
pub(crate) fn header_visible(header: &str, includes: &[String]) -> bool {
    includes.iter().any(|inc| {
        inc == header
            || inc == "bits/stdc++.h"
            || (inc == "iostream" && IOSTREAM_PULLS.contains(&header))
    })
}

/// Record types from the standard library whose spelling marks a variable as an object.
pub(crate) const STD_RECORD_NAMES: &[&str] = &[
    "string", "vector", "map", "unordered_map", "set", "unordered_set", "multiset", "pair",
    "queue", "priority_queue", "stack", "deque", "list", "array", "bitset", "complex", "tuple",
    "istream", "ostream", "stringstream", "istringstream", "ostringstream", "ifstream",
    "ofstream", "basic_string",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_objects_are_records() {
        let cout = STD_ENTITIES["cout"];
        assert_eq!(cout.kind, CursorKind::VarDecl);
        assert!(cout.type_kind.is_record());
        assert!(cout.in_std);
    }

    #[test]
    fn header_visibility() {
        let includes = vec!["iostream".to_string()];
        assert!(header_visible("ostream", &includes));
        assert!(header_visible("string", &includes));
        assert!(!header_visible("vector", &includes));
        assert!(header_visible("vector", &["bits/stdc++.h".to_string()]));
        assert!(!header_visible("ostream", &[]));
    }
}
