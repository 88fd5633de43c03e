//! Token -> tag mapping.
//!
//! Precedence: preprocessor constructs (macro tracking only), literals,
//! identifiers resolved through their owning cursor, punctuation, keywords.
//! A token yields exactly one tag or `None` when it continues a directive.

use crate::ast::{Cursor, CursorKind, Token, TokenKind, TranslationUnit, TypeKind};
use crate::error::ParserError;
use crate::index::TuIndex;

use super::tags;

/// `<NUM>` when the spelling is digits with at most one dot and a sign, else `<STR>`.
fn literal_tag(spelling: &str) -> &'static str {
    let unsigned = spelling.replacen('.', "", 1);
    let digits = unsigned.trim_start_matches(['+', '-']);
    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        tags::NUM
    } else {
        tags::STR
    }
}

fn punctuation_tag(spelling: &str) -> String {
    if tags::is_operator(spelling) {
        format!("{}{spelling}", tags::OP_PREFIX)
    } else {
        spelling.to_string()
    }
}

fn fallback_tag(token: &Token) -> String {
    match token.kind {
        TokenKind::Literal => literal_tag(&token.spelling).to_string(),
        TokenKind::Punctuation => punctuation_tag(&token.spelling),
        TokenKind::Keyword => token.spelling.to_uppercase(),
        TokenKind::Identifier => tags::ID_IDENT.to_string(),
    }
}

fn macro_name_tag(spelling: &str, index: &TuIndex) -> Option<&'static str> {
    if index.macro_uses.contains(spelling) {
        Some(tags::MACRO_NAME_USE)
    } else if index.macro_defs.contains(spelling) {
        Some(tags::MACRO_NAME_DEF)
    } else {
        None
    }
}

fn directive_tag(spelling: &str) -> &'static str {
    let text = spelling.trim_start();
    if text.starts_with("define") {
        tags::PP_DEFINE
    } else if text.starts_with("pragma") {
        tags::PP_PRAGMA
    } else if text.starts_with("if") {
        tags::PP_IF
    } else if text.starts_with("elif") {
        tags::PP_ELIF
    } else if text.starts_with("else") {
        tags::PP_ELSE
    } else if text.starts_with("endif") {
        tags::PP_ENDIF
    } else {
        tags::PP_OTHER
    }
}

const fn shape_tag(ty: TypeKind, ptr: &'static str, obj: &'static str, scalar: &'static str) -> &'static str {
    if ty.is_pointer() {
        ptr
    } else if ty.is_record() {
        obj
    } else {
        scalar
    }
}

/// Preprocessor tag for a token owned by a directive or macro cursor.
///
/// `Some(None)` suppresses a continuation token; `None` means the cursor is
/// not a preprocessor construct.
fn preprocessor_tag(token: &Token, owner: &Cursor) -> Option<Option<&'static str>> {
    let leading = token.location.offset == owner.extent.start.offset;
    match owner.kind {
        CursorKind::InclusionDirective => Some(leading.then_some(tags::PP_INCLUDE)),
        CursorKind::PreprocessingDirective => Some(leading.then(|| directive_tag(&owner.spelling))),
        CursorKind::MacroDefinition => Some(Some(tags::MACRO_DEF)),
        CursorKind::MacroInstantiation => Some(Some(tags::MACRO_USE)),
        _ => None,
    }
}

fn identifier_tag(tu: &TranslationUnit, owner: &Cursor, token: &Token) -> Result<&'static str, ParserError> {
    let referenced = owner.referenced.map(|r| tu.cursor(r)).transpose()?;
    let in_file = |c: &Cursor| tu.is_main_file(c);

    let tag = match owner.kind {
        k if k.is_alias_decl() && k != CursorKind::TypeAliasTemplateDecl => tags::ID_TYPE_ALIAS_DECL,
        CursorKind::TypeRef => match referenced {
            Some(r) if r.kind.is_alias_decl() => tags::ID_TYPE_ALIAS_USE,
            Some(r) if in_file(r) => tags::ID_TYPE_USER_USE,
            _ => tags::ID_TYPE_BUILTIN_USE,
        },
        k if k.is_variable_like() => shape_tag(
            owner.ty.kind,
            tags::ID_VAR_PTR_DECL,
            tags::ID_VAR_OBJ_DECL,
            tags::ID_VAR_SCALAR_DECL,
        ),
        CursorKind::DeclRefExpr => match referenced {
            Some(r) if r.kind.is_function_like() => {
                if in_file(r) {
                    tags::ID_FUNC_USE_USER
                } else {
                    tags::ID_FUNC_USE_LIB
                }
            }
            Some(r) if r.kind.is_variable_like() => shape_tag(
                r.ty.kind,
                tags::ID_VAR_PTR_USE,
                tags::ID_VAR_OBJ_USE,
                tags::ID_VAR_SCALAR_USE,
            ),
            _ => tags::ID_IDENT,
        },
        k if k.is_function_like() => tags::ID_FUNC_DECL,
        _ => tags::ID_IDENT,
    };
    tracing::trace!(token = %token.spelling, owner = %owner.kind, tag, "normalized identifier");
    Ok(tag)
}

/// Map one token to its tag, or `None` when it is suppressed.
///
/// # Errors
///
/// Returns [`ParserError::DanglingCursor`] when the token's cursor or its
/// referenced declaration is not part of `tu`.
pub fn normalize_token(
    tu: &TranslationUnit,
    index: &TuIndex,
    token: &Token,
    track_macros: bool,
) -> Result<Option<String>, ParserError> {
    let Some(owner_id) = token.cursor else {
        if token.kind == TokenKind::Identifier {
            if let Some(tag) = macro_name_tag(&token.spelling, index) {
                return Ok(Some(tag.to_string()));
            }
        }
        return Ok(Some(fallback_tag(token)));
    };
    let owner = tu.cursor(owner_id)?;

    if track_macros {
        if let Some(tag) = preprocessor_tag(token, owner) {
            return Ok(tag.map(str::to_string));
        }
    }

    match token.kind {
        TokenKind::Identifier => {
            if track_macros {
                if let Some(tag) = macro_name_tag(&token.spelling, index) {
                    return Ok(Some(tag.to_string()));
                }
            }
            identifier_tag(tu, owner, token).map(|t| Some(t.to_string()))
        }
        _ => Ok(Some(fallback_tag(token))),
    }
}
