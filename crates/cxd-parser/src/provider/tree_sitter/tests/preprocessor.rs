use pretty_assertions::assert_eq;

use super::{find, find_all, parse, parse_tracked};
use crate::ast::CursorKind;

#[test]
fn includes_are_recorded_without_tracking() {
    let tu = parse("#include <iostream>\n#include \"local/util.h\"\nint main() {}\n");
    let headers: Vec<_> = tu.includes().iter().map(|i| i.header.as_str()).collect();
    assert_eq!(headers, vec!["iostream", "local/util.h"]);
    assert!(tu.includes().iter().all(|i| i.depth == 1 && i.source_file == "code.cpp"));
    assert_eq!(tu.includes()[1].line, 2);
    assert!(find_all(&tu, CursorKind::InclusionDirective).is_empty());
}

#[test]
fn inclusion_directive_when_tracking() {
    let tu = parse_tracked("#include <iostream>\nint main() {}\n");
    let directives = find_all(&tu, CursorKind::InclusionDirective);
    assert_eq!(directives.len(), 1);
    assert_eq!(directives[0].spelling, "iostream");
    assert_eq!(directives[0].extent.start.offset, 0);
}

#[test]
fn macro_definition_and_use() {
    let tu = parse_tracked("#define N 5\nint a[N];\n");
    let (_, def) = find(&tu, CursorKind::MacroDefinition, "N").unwrap();
    assert_eq!(def.location.line, 1);
    assert!(find(&tu, CursorKind::MacroInstantiation, "N").is_some());
    let (_, directive) = find(&tu, CursorKind::PreprocessingDirective, "define").unwrap();
    assert_eq!(directive.extent.start.offset, 0);
}

#[test]
fn macros_untracked_are_plain_references() {
    let tu = parse("#define N 5\nint a[N];\n");
    assert!(find_all(&tu, CursorKind::MacroDefinition).is_empty());
    let (_, n) = find(&tu, CursorKind::DeclRefExpr, "N").unwrap();
    assert_eq!(n.referenced, None);
}

#[test]
fn conditional_blocks_are_transparent() {
    let tu = parse_tracked("#ifdef DEBUG\nint x;\n#endif\n");
    assert!(find(&tu, CursorKind::VarDecl, "x").is_some());
    let spellings: Vec<_> = find_all(&tu, CursorKind::PreprocessingDirective)
        .into_iter()
        .map(|c| c.spelling.clone())
        .collect();
    assert_eq!(spellings, vec!["ifdef DEBUG", "endif"]);
}

#[test]
fn pragma_once() {
    let tu = parse_tracked("#pragma once\nint x;\n");
    assert!(find(&tu, CursorKind::PreprocessingDirective, "pragma once").is_some());
}
