use pretty_assertions::assert_eq;

use super::TreeSitterCppProvider;
use crate::ast::{Cursor, CursorId, CursorKind, EXTERNAL_FILE, TranslationUnit, TypeKind};
use crate::provider::{AstProvider, ParseOptions};

mod expressions;
mod preprocessor;

fn parse(source: &str) -> TranslationUnit {
    TreeSitterCppProvider
        .parse(source, &ParseOptions::default())
        .expect("parse should succeed")
}

fn parse_tracked(source: &str) -> TranslationUnit {
    TreeSitterCppProvider
        .parse(source, &ParseOptions::new(true))
        .expect("parse should succeed")
}

fn find<'t>(tu: &'t TranslationUnit, kind: CursorKind, spelling: &str) -> Option<(CursorId, &'t Cursor)> {
    tu.cursors().find(|(_, c)| c.kind == kind && c.spelling == spelling)
}

fn find_all<'t>(tu: &'t TranslationUnit, kind: CursorKind) -> Vec<&'t Cursor> {
    tu.cursors().filter(|(_, c)| c.kind == kind).map(|(_, c)| c).collect()
}

fn referenced<'t>(tu: &'t TranslationUnit, cursor: &Cursor) -> Option<&'t Cursor> {
    cursor.referenced.and_then(|r| tu.cursor(r).ok())
}

#[test]
fn root_spans_whole_source() {
    let src = "int x;\nint y;\n";
    let tu = parse(src);
    let root = tu.cursor(tu.root()).unwrap();
    assert_eq!(root.kind, CursorKind::TranslationUnit);
    assert_eq!(root.file, None);
    assert_eq!(root.extent.end.offset, src.len());
    assert_eq!(tu.main_file(), "code.cpp");
}

#[test]
fn broken_source_still_parses() {
    let tu = parse("int main() {\n    retrun 0;\n    int x = ;\n");
    assert!(find(&tu, CursorKind::FunctionDecl, "main").is_some());
    assert!(!tu.tokens().is_empty());
}

#[test]
fn tokens_are_owned_by_the_deepest_cursor() {
    let tu = parse("int main() {\n    int value = 1;\n    return value;\n}\n");
    let owners: Vec<_> = tu
        .tokens()
        .iter()
        .filter(|t| t.spelling == "value")
        .map(|t| tu.cursor(t.cursor.unwrap()).unwrap().kind)
        .collect();
    assert_eq!(owners, vec![CursorKind::VarDecl, CursorKind::DeclRefExpr]);
    let lines: Vec<_> = tu.tokens().iter().map(|t| t.location.line).collect();
    assert!(lines.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn external_declarations_are_outside_the_main_file() {
    let tu = parse("#include <iostream>\nint main() { std::cout << 1; }\n");
    let (_, cout) = find(&tu, CursorKind::VarDecl, "cout").unwrap();
    assert_eq!(cout.file.as_deref(), Some(EXTERNAL_FILE));
    assert!(cout.ty.kind.is_record());
    assert!(!tu.is_main_file(cout));
}

#[test]
fn custom_file_name() {
    let options = ParseOptions {
        file_name: "main.cc".into(),
        track_macros: false,
    };
    let tu = TreeSitterCppProvider.parse("int x;", &options).unwrap();
    let (_, x) = find(&tu, CursorKind::VarDecl, "x").unwrap();
    assert_eq!(x.file.as_deref(), Some("main.cc"));
    assert_eq!(x.ty.kind, TypeKind::Builtin);
}
