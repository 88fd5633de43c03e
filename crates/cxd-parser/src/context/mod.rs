//! Context extraction around one diagnostic line.
//!
//! Four steps, each fault-isolated: a failing step is logged and leaves its
//! fields empty while the others still contribute to the record.

pub mod normalize;
pub mod tags;

pub use normalize::normalize_token;

use cxd_core::context::{ContextRecord, CoreInfo, CursorMeta};
use tracing::warn;

use crate::ast::{Cursor, CursorId, CursorKind, TokenKind, TranslationUnit};
use crate::error::ParserError;
use crate::index::TuIndex;

/// Ancestors recorded in the parent chain.
pub const MAX_PARENT_DEPTH: usize = 6;
/// Argument types recorded for a call.
pub const MAX_CALL_ARGS: usize = 4;
pub const DEFAULT_RADIUS: u32 = 2;

/// Build the [`ContextRecord`] for `line`.
///
/// # Errors
///
/// Returns [`ParserError::InvalidLine`] for line 0. Faults inside individual
/// steps are logged and do not fail the call.
pub fn extract_context(
    tu: &TranslationUnit,
    index: &TuIndex,
    line: u32,
    track_macros: bool,
    radius: u32,
) -> Result<ContextRecord, ParserError> {
    if line == 0 {
        return Err(ParserError::InvalidLine(line));
    }
    let mut record = ContextRecord {
        line: Some(line),
        ..ContextRecord::default()
    };

    let focus = step("smallest_cursor", line, smallest_cursor(tu, index, line)).flatten();
    if let Some(focus) = focus {
        record.core_info = step("core_info", line, core_info(tu, focus));
        record.cursor_meta = step("cursor_meta", line, cursor_meta(tu, focus)).flatten();
        record.parent_chain = step("parent_chain", line, parent_chain(tu, index, focus)).unwrap_or_default();
    }
    record.local_tokens =
        step("local_tokens", line, local_tokens(tu, index, line, track_macros, radius)).unwrap_or_default();

    record.includes.clone_from(&index.includes);
    record.macros.clone_from(&index.macros);
    record.aliases_and_namespaces = index.aliases.clone();
    record.decl_counts = index.decl_counts.clone();
    Ok(record)
}

fn step<T>(name: &str, line: u32, result: Result<T, ParserError>) -> Option<T> {
    result
        .map_err(|error| warn!(step = name, line, %error, "context step failed"))
        .ok()
}

/// Interesting cursor at `line` with the shortest extent covering it; first wins ties.
///
/// # Errors
///
/// Returns [`ParserError::DanglingCursor`] for an indexed id outside `tu`.
pub fn smallest_cursor(tu: &TranslationUnit, index: &TuIndex, line: u32) -> Result<Option<CursorId>, ParserError> {
    let mut best: Option<(CursorId, usize)> = None;
    for &id in index.cursors_at(line) {
        let extent = tu.cursor(id)?.extent;
        if !extent.covers_line(line) {
            continue;
        }
        let len = extent.len();
        if best.is_none_or(|(_, best_len)| len < best_len) {
            best = Some((id, len));
        }
    }
    Ok(best.map(|(id, _)| id))
}

fn core_info(tu: &TranslationUnit, id: CursorId) -> Result<CoreInfo, ParserError> {
    let cur = tu.cursor(id)?;
    Ok(CoreInfo {
        kind: cur.kind.as_str().to_string(),
        spelling: cur.spelling.clone(),
        display_name: cur.display_name.clone(),
        line: cur.location.line,
        is_decl: cur.kind.is_declaration(),
        is_expr: cur.kind.is_expression(),
        is_stmt: cur.kind.is_statement(),
        type_spelling: cur.ty.is_valid().then(|| cur.ty.spelling.clone()),
        result_type: cur
            .result_type
            .as_ref()
            .filter(|t| !t.spelling.is_empty())
            .map(|t| t.spelling.clone()),
    })
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

/// First operator punctuation inside the cursor's extent.
fn operator_spelling(tu: &TranslationUnit, cur: &Cursor) -> Option<String> {
    tu.tokens_in_range(&cur.extent)
        .iter()
        .find(|t| t.kind == TokenKind::Punctuation && tags::is_operator(&t.spelling))
        .map(|t| t.spelling.clone())
}

/// Argument cursors of a call: every child except a callee at the call's start.
fn call_arguments<'t>(tu: &'t TranslationUnit, cur: &Cursor) -> Result<Vec<&'t Cursor>, ParserError> {
    let mut args = Vec::with_capacity(cur.children.len());
    for (i, &child) in cur.children.iter().enumerate() {
        let c = tu.cursor(child)?;
        let is_callee = i == 0
            && c.extent.start.offset == cur.extent.start.offset
            && matches!(
                c.kind,
                CursorKind::DeclRefExpr | CursorKind::MemberRefExpr | CursorKind::TypeRef | CursorKind::UnexposedExpr
            );
        if !is_callee {
            args.push(c);
        }
    }
    Ok(args)
}

fn cursor_meta(tu: &TranslationUnit, id: CursorId) -> Result<Option<CursorMeta>, ParserError> {
    let cur = tu.cursor(id)?;
    let meta = match cur.kind {
        CursorKind::BinaryOperator => {
            let lhs = cur.children.first().map(|&c| tu.cursor(c)).transpose()?;
            let rhs = cur.children.get(1).map(|&c| tu.cursor(c)).transpose()?;
            Some(CursorMeta::BinaryOperator {
                op_spelling: operator_spelling(tu, cur),
                lhs_kind: lhs.map(|c| c.kind.as_str().to_string()),
                lhs_type: lhs.and_then(|c| non_empty(&c.ty.spelling)),
                rhs_kind: rhs.map(|c| c.kind.as_str().to_string()),
                rhs_type: rhs.and_then(|c| non_empty(&c.ty.spelling)),
            })
        }
        CursorKind::CallExpr => {
            let args = call_arguments(tu, cur)?;
            Some(CursorMeta::Call {
                num_args: u32::try_from(args.len()).unwrap_or(u32::MAX),
                arg_types: args
                    .iter()
                    .take(MAX_CALL_ARGS)
                    .map(|a| a.ty.spelling.clone())
                    .collect(),
                more_than_four_args: args.len() > MAX_CALL_ARGS,
                result_type: cur.result_type.as_ref().and_then(|t| non_empty(&t.spelling)),
            })
        }
        CursorKind::DeclRefExpr | CursorKind::MemberRefExpr | CursorKind::TypeRef => {
            let referenced = cur.referenced.map(|r| tu.cursor(r)).transpose()?;
            Some(CursorMeta::Reference {
                is_type_ref: cur.kind == CursorKind::TypeRef,
                ref_kind: referenced.map(|r| r.kind.as_str().to_string()),
                ref_type: referenced.and_then(|r| non_empty(&r.ty.spelling)),
            })
        }
        _ => None,
    };
    Ok(meta)
}

fn parent_chain(tu: &TranslationUnit, index: &TuIndex, id: CursorId) -> Result<Vec<String>, ParserError> {
    let mut chain = Vec::new();
    let mut node = id;
    while chain.len() < MAX_PARENT_DEPTH {
        let Some(parent) = index.parent_of(node) else {
            break;
        };
        let kind = tu.cursor(parent)?.kind;
        if kind == CursorKind::TranslationUnit {
            break;
        }
        chain.push(kind.as_str().to_string());
        node = parent;
    }
    Ok(chain)
}

fn local_tokens(
    tu: &TranslationUnit,
    index: &TuIndex,
    line: u32,
    track_macros: bool,
    radius: u32,
) -> Result<Vec<String>, ParserError> {
    let lo = line.saturating_sub(radius).max(1);
    let hi = line.saturating_add(radius);
    let mut out = Vec::new();
    for token in tu.tokens_in_lines(lo, hi) {
        if let Some(tag) = normalize_token(tu, index, token, track_macros)? {
            out.push(tag);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Position, SourceRange, Token, TranslationUnitBuilder, TypeInfo, TypeKind};
    use crate::index::build_index;
    use pretty_assertions::assert_eq;

    fn pos(line: u32, offset: usize) -> Position {
        Position { line, column: 1, offset }
    }

    fn at(kind: CursorKind, spelling: &str, line: u32, start: usize, end: usize) -> Cursor {
        Cursor::new(kind, spelling)
            .in_file("code.cpp")
            .at(pos(line, start), SourceRange::new(pos(line, start), pos(line, end)))
    }

    /// `int main() {` / `  x = y + 1;` / `}` built by hand.
    fn unit() -> TranslationUnit {
        let mut b = TranslationUnitBuilder::new("code.cpp");
        let root = b.root();
        let mut main = at(CursorKind::FunctionDecl, "main", 1, 0, 30);
        main.extent.end = pos(3, 30);
        let main = b.add_child(root, main).unwrap();
        let mut body = at(CursorKind::CompoundStmt, "", 1, 11, 30);
        body.extent.end = pos(3, 30);
        let body = b.add_child(main, body).unwrap();
        let assign = b
            .add_child(body, at(CursorKind::BinaryOperator, "", 2, 15, 26).typed(TypeInfo::new(TypeKind::Builtin, "int")))
            .unwrap();
        b.add_child(assign, at(CursorKind::DeclRefExpr, "x", 2, 15, 16).typed(TypeInfo::new(TypeKind::Builtin, "int")))
            .unwrap();
        let sum = b
            .add_child(assign, at(CursorKind::BinaryOperator, "", 2, 19, 24).typed(TypeInfo::new(TypeKind::Builtin, "int")))
            .unwrap();
        b.add_child(sum, at(CursorKind::DeclRefExpr, "y", 2, 19, 20)).unwrap();
        b.add_child(sum, at(CursorKind::IntegerLiteral, "", 2, 23, 24)).unwrap();
        for (kind, spelling, line, offset, owner) in [
            (TokenKind::Identifier, "x", 2, 15, Some(CursorId::from_raw(4))),
            (TokenKind::Punctuation, "=", 2, 17, Some(assign)),
            (TokenKind::Identifier, "y", 2, 19, Some(CursorId::from_raw(6))),
            (TokenKind::Punctuation, "+", 2, 21, Some(sum)),
            (TokenKind::Literal, "1", 2, 23, Some(CursorId::from_raw(7))),
            (TokenKind::Punctuation, ";", 2, 24, Some(body)),
        ] {
            b.push_token(Token {
                kind,
                spelling: spelling.into(),
                location: pos(line, offset),
                cursor: owner,
            });
        }
        b.finish()
    }

    #[test]
    fn picks_smallest_cursor_on_line() {
        let tu = unit();
        let idx = build_index(&tu, false).unwrap();
        let focus = smallest_cursor(&tu, &idx, 2).unwrap().unwrap();
        assert_eq!(tu.cursor(focus).unwrap().spelling, "x");
    }

    #[test]
    fn equal_spans_keep_first_in_traversal_order() {
        let mut b = TranslationUnitBuilder::new("code.cpp");
        let root = b.root();
        let first = b.add_child(root, at(CursorKind::DeclRefExpr, "a", 1, 0, 3)).unwrap();
        b.add_child(root, at(CursorKind::DeclRefExpr, "b", 1, 4, 7)).unwrap();
        let tu = b.finish();
        let idx = build_index(&tu, false).unwrap();
        for _ in 0..3 {
            assert_eq!(smallest_cursor(&tu, &idx, 1).unwrap(), Some(first));
        }
    }

    #[test]
    fn full_record_for_assignment_line() {
        let tu = unit();
        let idx = build_index(&tu, false).unwrap();
        let record = extract_context(&tu, &idx, 2, false, 2).unwrap();

        let core = record.core_info.unwrap();
        assert_eq!(core.kind, "DECL_REF_EXPR");
        assert!(core.is_expr);
        assert_eq!(core.type_spelling.as_deref(), Some("int"));
        assert_eq!(
            record.cursor_meta,
            Some(CursorMeta::Reference { is_type_ref: false, ref_kind: None, ref_type: None })
        );
        assert_eq!(record.parent_chain, vec!["BINARY_OPERATOR", "COMPOUND_STMT", "FUNCTION_DECL"]);
        assert_eq!(
            record.local_tokens,
            vec!["<ID_IDENT>", "OP_=", "<ID_IDENT>", "OP_+", "<NUM>", ";"]
        );
    }

    #[test]
    fn binary_operator_meta_reads_operator_token() {
        let tu = unit();
        let meta = cursor_meta(&tu, CursorId::from_raw(3)).unwrap().unwrap();
        assert_eq!(
            meta,
            CursorMeta::BinaryOperator {
                op_spelling: Some("=".into()),
                lhs_kind: Some("DECL_REF_EXPR".into()),
                lhs_type: Some("int".into()),
                rhs_kind: Some("BINARY_OPERATOR".into()),
                rhs_type: Some("int".into()),
            }
        );
    }

    #[test]
    fn call_meta_caps_argument_types() {
        let mut b = TranslationUnitBuilder::new("code.cpp");
        let root = b.root();
        let call = b.add_child(root, at(CursorKind::CallExpr, "f", 1, 0, 20)).unwrap();
        b.add_child(call, at(CursorKind::DeclRefExpr, "f", 1, 0, 1)).unwrap();
        for i in 0..5 {
            let lit = at(CursorKind::IntegerLiteral, "", 1, 2 + i * 2, 3 + i * 2)
                .typed(TypeInfo::new(TypeKind::Builtin, "int"));
            b.add_child(call, lit).unwrap();
        }
        let tu = b.finish();
        let Some(CursorMeta::Call { num_args, arg_types, more_than_four_args, .. }) =
            cursor_meta(&tu, call).unwrap()
        else {
            panic!("expected call meta");
        };
        assert_eq!(num_args, 5);
        assert_eq!(arg_types.len(), 4);
        assert!(more_than_four_args);
    }

    #[test]
    fn parent_chain_is_capped() {
        let mut b = TranslationUnitBuilder::new("code.cpp");
        let mut parent = b.root();
        for depth in 0..9 {
            parent = b.add_child(parent, at(CursorKind::CompoundStmt, "", 1, depth, 100 - depth)).unwrap();
        }
        let leaf = b.add_child(parent, at(CursorKind::DeclRefExpr, "x", 1, 40, 41)).unwrap();
        let tu = b.finish();
        let idx = build_index(&tu, false).unwrap();
        assert_eq!(parent_chain(&tu, &idx, leaf).unwrap().len(), MAX_PARENT_DEPTH);
    }

    #[test]
    fn line_zero_is_rejected() {
        let tu = unit();
        let idx = build_index(&tu, false).unwrap();
        assert!(matches!(extract_context(&tu, &idx, 0, false, 2), Err(ParserError::InvalidLine(0))));
    }

    #[test]
    fn line_without_cursors_keeps_global_fields() {
        let tu = unit();
        let idx = build_index(&tu, false).unwrap();
        let record = extract_context(&tu, &idx, 40, false, 2).unwrap();
        assert_eq!(record.line, Some(40));
        assert!(record.core_info.is_none());
        assert!(record.local_tokens.is_empty());
        assert_eq!(record.decl_counts.func_kinds.get("FUNCTION_DECL"), Some(&1));
    }

    #[test]
    fn extraction_is_deterministic() {
        let tu = unit();
        let idx = build_index(&tu, false).unwrap();
        let a = extract_context(&tu, &idx, 2, false, 2).unwrap();
        let b = extract_context(&tu, &idx, 2, false, 2).unwrap();
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
    }
}
