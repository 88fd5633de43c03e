//! Closed vocabularies the heuristics compare identifiers against.

use std::collections::HashSet;
use std::sync::LazyLock;

fn set(words: &[&'static str]) -> HashSet<&'static str> {
    words.iter().copied().collect()
}

/// Keywords, builtin type names and a handful of ubiquitous library names
/// that never count as user identifiers.
pub static CPP_KEYWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    set(&[
        "if", "else", "switch", "case", "default", "for", "while", "do", "break", "continue",
        "goto", "return", "bool", "char", "wchar_t", "char8_t", "char16_t", "char32_t",
        "int64_t", "int32_t", "int16_t", "int8_t", "__int64", "__int32", "__int16", "__int8",
        "short", "int", "signed", "unsigned", "long", "float", "double", "void", "true",
        "false", "nullptr", "class", "struct", "union", "enum", "vector", "list",
        "forward_list", "deque", "map", "set", "unordered_map", "unordered_set", "queue",
        "stack", "array", "bitset", "pair", "public", "protected", "private", "friend",
        "virtual", "explicit", "mutable", "namespace", "template", "typename", "typedef",
        "using", "new", "delete", "operator", "sizeof", "this", "const", "constexpr",
        "consteval", "constinit", "volatile", "static", "extern", "register", "thread_local",
        "inline", "noexcept", "static_cast", "const_cast", "reinterpret_cast", "try", "catch",
        "throw", "and", "or", "not", "xor", "bitand", "bitor", "compl", "and_eq", "or_eq",
        "xor_eq", "not_eq", "decltype", "typeid", "static_assert", "cout", "cin", "cerr",
        "clog", "wcout", "wcin", "wcerr", "wclog",
    ])
});

/// Standard library functions and member functions commonly called by name.
pub static CPP_FUNCTIONS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    set(&[
        "abort", "abs", "accumulate", "acos", "acosh", "addressof", "adjacent_difference",
        "advance", "all_of", "allocate_shared", "any_of", "append", "asctime", "asin", "asinh",
        "assert", "atan", "atanh", "atanl", "atanf", "atan2", "atan2l", "atan2f", "atof", "atoi",
        "atol", "back", "bsearch", "bucket", "bucket_count", "calloc", "capacity", "cbegin",
        "cbrt", "ceil", "cend", "clear", "clock", "compare", "copy", "copy_if", "copy_n",
        "copysign", "count", "count_if", "c_str", "ctime", "dec", "defaultfloat", "difftime",
        "distance", "dynamic_pointer_cast", "empty", "endl", "ends", "erase", "erf", "erfc",
        "exit", "exp", "exp2", "expm1", "fabs", "fclose", "fdim", "fgets", "fill", "fflush",
        "floor", "flush", "fmod", "fopen", "fprintf", "fputs", "fread", "free", "freopen",
        "frexp", "front", "fscanf", "fseek", "ftell", "fwrite", "gcd", "get", "gets", "getchar",
        "getline", "gmtime", "hash", "hex", "hexfloat", "hypot", "ignore", "inner_product",
        "insert", "internal", "iota", "isfinite", "isgreater", "isgreaterequal", "isinf",
        "isless", "islessequal", "islessgreater", "isnan", "isnormal", "isunordered", "is_heap",
        "is_heap_until", "is_partitioned", "is_sorted", "is_sorted_until", "istream_iterator",
        "lalpha", "ldexp", "length", "lgamma", "llround", "load_factor", "localtime", "log",
        "log10", "log1p", "log2", "lround", "malloc", "make_error_code", "make_error_condition",
        "make_heap", "make_pair", "make_shared", "make_tuple", "make_unique", "max", "max_size",
        "memcmp", "memcpy", "memmove", "memset", "merge", "min", "mismatch", "modf", "move",
        "move_backward", "next", "nextafter", "next_permutation", "nexttoward", "none_of",
        "noshowbase", "noshowpoint", "noshowpos", "noboolalpha", "oct", "partial_sort",
        "partial_sort_copy", "partial_sum", "perror", "pop", "pop_back", "pop_front",
        "pop_heap", "pow", "printf", "push", "push_back", "push_front", "push_heap", "puts",
        "qsort", "rbegin", "read", "realloc", "ref", "rehash", "remquo", "remove",
        "remove_copy", "remove_copy_if", "remove_if", "replace", "replace_copy",
        "replace_copy_if", "replace_if", "reserve", "reset", "resize",
        "return_temporary_buffer", "rethrow_exception", "rewind", "right", "rfind", "rotate",
        "rotate_copy", "round", "rtrim", "scientific", "search", "search_n", "set_difference",
        "set_intersection", "set_symmetric_difference", "set_union", "setfill", "setprecision",
        "setw", "shrink_to_fit", "shuffle", "signbit", "sin", "sinh", "size", "sort",
        "sort_heap", "sprintf", "sqrt", "scanf", "sscanf", "stable_partition", "stable_sort",
        "static_pointer_cast", "stoi", "stol", "stold", "stoll", "stof", "stod", "stoull",
        "stoul", "strat", "strcat", "strchr", "strcmp", "strcpy", "strcspn", "strlen",
        "strncat", "strncmp", "strncpy", "strpbrk", "strrchr", "strspn", "strstr", "strtok",
        "substr", "swap", "swap_ranges", "system", "tan", "tanh", "tgamma", "time", "tie",
        "top", "to_string", "transform", "trunc", "type_index", "ungetc", "unique",
        "unique_copy", "unique_lock", "unordered_map", "unordered_set", "upper_bound", "value",
        "vprintf", "vsnprintf", "wait", "wait_for", "wait_until", "write", "ws", "yield",
    ])
});

/// Names whose absence almost always means a missing `#include` or `std::`.
pub static KNOWN_STD_IDENTIFIERS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    set(&[
        "cout", "cin", "cerr", "clog", "wcout", "wcin", "wcerr", "wclog", "string", "wstring",
        "vector", "list", "forward_list", "deque", "map", "set", "unordered_map",
        "unordered_set", "queue", "stack", "array", "bitset", "pair", "ifstream", "ofstream",
        "fstream", "istringstream", "ostringstream", "stringstream", "abs", "sqrt", "sin",
        "cos", "tan", "log", "log10", "exp", "pow", "ceil", "floor", "round", "trunc", "printf",
        "scanf", "puts", "gets", "strlen", "strcmp", "strcpy", "memset", "memcpy", "system",
        "count", "sort", "max", "min", "M_PI", "M_PI_2",
    ])
});

pub static TYPE_KEYWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    set(&[
        "bool", "char", "wchar_t", "char8_t", "char16_t", "char32_t", "int64_t", "int32_t",
        "int16_t", "int8_t", "__int64", "__int32", "__int16", "__int8", "short", "int",
        "signed", "unsigned", "long", "float", "double", "void", "string", "wstring", "vector",
        "list", "forward_list", "deque", "map", "set", "unordered_map", "unordered_set",
        "queue", "stack", "array", "bitset", "pair",
    ])
});

/// Competitive-programming aliases that read as types.
pub const COMMON_TYPE_ALIASES: &[&str] = &["ll", "ull"];

pub const STREAM_OBJECTS: &[&str] =
    &["cin", "cout", "cerr", "clog", "wcin", "wcout", "wcerr", "wclog"];

/// Statement keywords that stand at the start of a statement.
pub const CONTROL_KEYWORDS: &[&str] = &["return", "break", "continue", "else", "case"];

/// Statement keywords followed by a parenthesized head.
pub const LOOP_KEYWORDS: &[&str] = &["for", "while", "switch"];

#[must_use]
pub fn is_keyword(word: &str) -> bool {
    CPP_KEYWORDS.contains(word)
}

#[must_use]
pub fn is_type_word(word: &str) -> bool {
    TYPE_KEYWORDS.contains(word) || COMMON_TYPE_ALIASES.contains(&word)
}

#[must_use]
pub fn is_stream_object(word: &str) -> bool {
    STREAM_OBJECTS.contains(&word)
}
