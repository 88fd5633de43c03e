use pretty_assertions::assert_eq;

use super::{find, find_all, parse, referenced};
use crate::ast::{CursorKind, EXTERNAL_FILE, TypeKind};

#[test]
fn stream_objects_need_header_and_namespace() {
    let with = parse("#include <iostream>\nusing namespace std;\nint main() { cout << 1; }\n");
    let (_, cout) = find(&with, CursorKind::DeclRefExpr, "cout").unwrap();
    let target = referenced(&with, cout).unwrap();
    assert_eq!(target.kind, CursorKind::VarDecl);
    assert_eq!(target.file.as_deref(), Some(EXTERNAL_FILE));
    assert_eq!(cout.ty.spelling, "std::ostream");

    let no_namespace = parse("#include <iostream>\nint main() { cout << 1; }\n");
    let (_, cout) = find(&no_namespace, CursorKind::DeclRefExpr, "cout").unwrap();
    assert_eq!(cout.referenced, None);

    let no_header = parse("using namespace std;\nint main() { cout << 1; }\n");
    let (_, cout) = find(&no_header, CursorKind::DeclRefExpr, "cout").unwrap();
    assert_eq!(cout.referenced, None);
}

#[test]
fn using_declaration_exposes_one_name() {
    let tu = parse("#include <iostream>\nusing std::cout;\nint main() { cout << 1; cin >> 1; }\n");
    assert!(find(&tu, CursorKind::UsingDeclaration, "cout").is_some());
    let (_, cout) = find(&tu, CursorKind::DeclRefExpr, "cout").unwrap();
    assert!(cout.referenced.is_some());
    let (_, cin) = find(&tu, CursorKind::DeclRefExpr, "cin").unwrap();
    assert_eq!(cin.referenced, None);
}

#[test]
fn qualified_std_name_has_namespace_ref() {
    let tu = parse("#include <iostream>\nint main() { std::cout << 1; }\n");
    let (_, cout) = find(&tu, CursorKind::DeclRefExpr, "cout").unwrap();
    assert!(cout.referenced.is_some());
    assert_eq!(cout.children.len(), 1);
    let ns_ref = tu.cursor(cout.children[0]).unwrap();
    assert_eq!(ns_ref.kind, CursorKind::NamespaceRef);
    assert_eq!(ns_ref.spelling, "std");
}

#[test]
fn binary_operator_types() {
    let tu = parse("int main() {\n    int a = 1;\n    double d = 2.0;\n    bool c = a < d;\n    double s = a + d;\n}\n");
    let ops = find_all(&tu, CursorKind::BinaryOperator);
    let spellings: Vec<_> = ops.iter().map(|c| c.ty.spelling.as_str()).collect();
    assert_eq!(spellings, vec!["bool", "double"]);
    // The operator is the anchor location.
    assert_eq!(ops[0].location.line, 4);
    assert_eq!(ops[0].children.len(), 2);
}

#[test]
fn compound_assignment_kind() {
    let tu = parse("int main() { int a = 0; a += 2; a = 3; }\n");
    assert_eq!(find_all(&tu, CursorKind::CompoundAssignOperator).len(), 1);
    assert_eq!(find_all(&tu, CursorKind::BinaryOperator).len(), 1);
}

#[test]
fn user_function_call() {
    let tu = parse("int add(int a, int b) { return a + b; }\nint main() { return add(1, 2); }\n");
    let (fn_id, _) = find(&tu, CursorKind::FunctionDecl, "add").unwrap();
    let (_, call) = find(&tu, CursorKind::CallExpr, "add").unwrap();
    assert_eq!(call.referenced, Some(fn_id));
    assert_eq!(call.ty.spelling, "int");
    assert_eq!(call.result_type.as_ref().unwrap().spelling, "int");
    assert_eq!(call.children.len(), 3);
}

#[test]
fn library_call_resolves_to_external_function() {
    let tu = parse("#include <cmath>\nint main() { double r = sqrt(2.0); }\n");
    let (_, call) = find(&tu, CursorKind::CallExpr, "sqrt").unwrap();
    let target = referenced(&tu, call).unwrap();
    assert!(target.kind.is_function_like());
    assert_eq!(target.file.as_deref(), Some(EXTERNAL_FILE));
}

#[test]
fn unknown_call_stays_unresolved() {
    let tu = parse("int main() { frobnicate(1); }\n");
    let (_, call) = find(&tu, CursorKind::CallExpr, "frobnicate").unwrap();
    assert_eq!(call.referenced, None);
    assert!(!call.ty.is_valid());
}

#[test]
fn member_calls_on_std_types() {
    let tu = parse("#include <vector>\nusing namespace std;\nint main() {\n    vector<int> v;\n    int n = v.size();\n}\n");
    let (_, member) = find(&tu, CursorKind::MemberRefExpr, "size").unwrap();
    assert_eq!(member.ty.spelling, "size_t");
    let (_, call) = find(&tu, CursorKind::CallExpr, "size").unwrap();
    assert_eq!(call.ty.spelling, "size_t");
}

#[test]
fn subscript_of_vector_yields_element_type() {
    let tu = parse("#include <vector>\nusing namespace std;\nint main() {\n    vector<int> v;\n    v[0] = 1;\n}\n");
    let subs = find_all(&tu, CursorKind::ArraySubscriptExpr);
    assert_eq!(subs.len(), 1);
    assert_eq!(subs[0].ty.spelling, "int");
}

#[test]
fn literals() {
    let tu = parse("int main() { auto s = \"hey\"; char c = 'x'; double d = 1.5; bool b = true; }\n");
    let string = find_all(&tu, CursorKind::StringLiteral);
    assert_eq!(string[0].ty.spelling, "const char [4]");
    assert_eq!(find_all(&tu, CursorKind::CharacterLiteral)[0].ty.spelling, "char");
    assert_eq!(find_all(&tu, CursorKind::FloatingLiteral)[0].ty.spelling, "double");
    assert_eq!(find_all(&tu, CursorKind::CxxBoolLiteralExpr)[0].ty.kind, TypeKind::Builtin);
}

#[test]
fn control_statements() {
    let tu = parse(
        "int main() {\n    for (int i = 0; i < 3; i++) {}\n    while (true) { break; }\n    if (1) return 0;\n}\n",
    );
    for kind in [
        CursorKind::ForStmt,
        CursorKind::WhileStmt,
        CursorKind::IfStmt,
        CursorKind::ReturnStmt,
        CursorKind::BreakStmt,
        CursorKind::UnaryOperator,
    ] {
        assert_eq!(find_all(&tu, kind).len(), 1, "{kind}");
    }
    let (loop_var, _) = find(&tu, CursorKind::VarDecl, "i").unwrap();
    let uses: Vec<_> = find_all(&tu, CursorKind::DeclRefExpr)
        .into_iter()
        .filter(|c| c.spelling == "i")
        .collect();
    assert_eq!(uses.len(), 2);
    assert!(uses.iter().all(|c| c.referenced == Some(loop_var)));
}

#[test]
fn nearest_declaration_wins() {
    let tu = parse("int x;\nint main() {\n    int x = 1;\n    return x;\n}\n");
    let locals: Vec<_> = tu
        .cursors()
        .filter(|(_, c)| c.kind == CursorKind::VarDecl && c.spelling == "x")
        .map(|(id, _)| id)
        .collect();
    assert_eq!(locals.len(), 2);
    let (_, use_of_x) = find(&tu, CursorKind::DeclRefExpr, "x").unwrap();
    assert_eq!(use_of_x.referenced, Some(locals[1]));
}

#[test]
fn scopes_end_with_their_block() {
    let tu = parse("int main() {\n    { int inner = 1; }\n    return inner;\n}\n");
    let (_, use_of_inner) = find(&tu, CursorKind::DeclRefExpr, "inner").unwrap();
    assert_eq!(use_of_inner.referenced, None);
}
