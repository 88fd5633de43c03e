//! The token normalization alphabet.
//!
//! These strings are a feature contract for downstream vectorizers: renaming
//! one invalidates every stored record.

use std::collections::HashSet;
use std::sync::LazyLock;

pub const NUM: &str = "<NUM>";
pub const STR: &str = "<STR>";

pub const PP_INCLUDE: &str = "<PP_INCLUDE>";
pub const PP_DEFINE: &str = "<PP_DEFINE>";
pub const PP_PRAGMA: &str = "<PP_PRAGMA>";
pub const PP_IF: &str = "<PP_IF>";
pub const PP_ELIF: &str = "<PP_ELIF>";
pub const PP_ELSE: &str = "<PP_ELSE>";
pub const PP_ENDIF: &str = "<PP_ENDIF>";
pub const PP_OTHER: &str = "<PP_OTHER>";
pub const MACRO_DEF: &str = "<MACRO_DEF>";
pub const MACRO_USE: &str = "<MACRO_USE>";
pub const MACRO_NAME_DEF: &str = "<MACRO_NAME_DEF>";
pub const MACRO_NAME_USE: &str = "<MACRO_NAME_USE>";

pub const ID_TYPE_ALIAS_DECL: &str = "<ID_TYPE_ALIAS_DECL>";
pub const ID_TYPE_ALIAS_USE: &str = "<ID_TYPE_ALIAS_USE>";
pub const ID_TYPE_USER_USE: &str = "<ID_TYPE_USER_USE>";
pub const ID_TYPE_BUILTIN_USE: &str = "<ID_TYPE_BUILTIN_USE>";
pub const ID_VAR_PTR_DECL: &str = "<ID_VAR_PTR_DECL>";
pub const ID_VAR_OBJ_DECL: &str = "<ID_VAR_OBJ_DECL>";
pub const ID_VAR_SCALAR_DECL: &str = "<ID_VAR_SCALAR_DECL>";
pub const ID_VAR_PTR_USE: &str = "<ID_VAR_PTR_USE>";
pub const ID_VAR_OBJ_USE: &str = "<ID_VAR_OBJ_USE>";
pub const ID_VAR_SCALAR_USE: &str = "<ID_VAR_SCALAR_USE>";
pub const ID_FUNC_DECL: &str = "<ID_FUNC_DECL>";
pub const ID_FUNC_USE_USER: &str = "<ID_FUNC_USE_USER>";
pub const ID_FUNC_USE_LIB: &str = "<ID_FUNC_USE_LIB>";
pub const ID_IDENT: &str = "<ID_IDENT>";

/// Prefix of operator punctuation tags: `OP_<<`, `OP_==`.
pub const OP_PREFIX: &str = "OP_";

/// Punctuation treated as an operator, both for `OP_` tags and for finding a
/// binary operator's spelling.
pub static OPERATORS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "==", "!=", "<", ">", "<=", ">=", "&&", "||", "!", "+", "-", "*", "/", "%", "++", "--",
        "=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "&", "|", "^", "~", "<<", ">>",
        "<<=", ">>=", ".", "->", "?", ":", ",",
    ])
});

#[must_use]
pub fn is_operator(spelling: &str) -> bool {
    OPERATORS.contains(spelling)
}
