//! CST -> cursor arena.
//!
//! One pre-order walk over the tree-sitter tree. Declarations register in a
//! lexical scope stack as they are created, so references resolve to the
//! nearest preceding declaration of the same name. Expression types are
//! filled in after an expression's children have been built.

use ast_grep_core::{Doc, Node};
use std::collections::{HashMap, HashSet};

use crate::ast::{
    Cursor, CursorId, CursorKind, EXTERNAL_FILE, Position, SourceRange, TranslationUnitBuilder,
    TypeInfo, TypeKind,
};
use crate::error::ParserError;
use crate::provider::ParseOptions;

use super::lexer::LineIndex;
use super::stdlib::{STD_ENTITIES, header_visible};
use super::types::{self, TypeEnv};

pub(crate) type WalkResult = Result<Option<CursorId>, ParserError>;

const CAST_KEYWORDS: &[(&str, CursorKind)] = &[
    ("static_cast", CursorKind::CxxStaticCastExpr),
    ("dynamic_cast", CursorKind::CxxDynamicCastExpr),
    ("reinterpret_cast", CursorKind::CxxReinterpretCastExpr),
    ("const_cast", CursorKind::CxxConstCastExpr),
];

const COMPARISON_OPS: &[&str] = &["==", "!=", "<", ">", "<=", ">=", "&&", "||", "<=>"];

pub(crate) struct Walker<'s> {
    pub(super) lines: &'s LineIndex,
    pub(super) file: String,
    pub(super) track_macros: bool,
    pub(super) builder: TranslationUnitBuilder,
    pub(super) scopes: Vec<HashMap<String, CursorId>>,
    pub(super) externals: HashMap<String, CursorId>,
    /// Record cursor -> member name -> member cursor.
    pub(super) members: HashMap<CursorId, HashMap<String, CursorId>>,
    pub(super) records: HashMap<String, CursorId>,
    pub(super) namespaces: HashMap<String, CursorId>,
    pub(super) types: TypeEnv,
    pub(super) macros: HashSet<String>,
    pub(super) includes: Vec<String>,
    /// `using namespace std;` seen.
    pub(super) std_open: bool,
    /// Names brought in with `using std::name;`.
    pub(super) std_names: HashSet<String>,
    /// Enclosing record bodies, innermost last.
    pub(super) class_stack: Vec<(String, CursorId)>,
}

impl<'s> Walker<'s> {
    pub fn new(lines: &'s LineIndex, options: &ParseOptions) -> Self {
        Self {
            lines,
            file: options.file_name.clone(),
            track_macros: options.track_macros,
            builder: TranslationUnitBuilder::new(options.file_name.clone()),
            scopes: vec![HashMap::new()],
            externals: HashMap::new(),
            members: HashMap::new(),
            records: HashMap::new(),
            namespaces: HashMap::new(),
            types: TypeEnv::default(),
            macros: HashSet::new(),
            includes: Vec::new(),
            std_open: false,
            std_names: HashSet::new(),
            class_stack: Vec::new(),
        }
    }

    pub fn finish(self) -> TranslationUnitBuilder {
        self.builder
    }

    // ── Positions and cursor construction ──────────────────────────────

    pub(super) fn pos(&self, offset: usize) -> Position {
        self.lines.position(offset)
    }

    pub(super) fn span(&self, start: usize, end: usize) -> SourceRange {
        SourceRange::new(self.pos(start), self.pos(end.max(start)))
    }

    pub(super) fn cursor<D: Doc>(&self, kind: CursorKind, spelling: impl Into<String>, node: &Node<D>) -> Cursor {
        let r = node.range();
        Cursor::new(kind, spelling)
            .in_file(self.file.clone())
            .at(self.pos(r.start), self.span(r.start, r.end))
    }

    pub(super) fn add(&mut self, parent: CursorId, cursor: Cursor) -> Result<CursorId, ParserError> {
        self.builder.add_child(parent, cursor)
    }

    pub(super) fn ty(&self, id: Option<CursorId>) -> TypeInfo {
        id.and_then(|id| self.builder.get(id))
            .map(|c| c.ty.clone())
            .unwrap_or_default()
    }

    pub(super) fn set_type(&mut self, id: CursorId, ty: TypeInfo) {
        if let Some(c) = self.builder.get_mut(id) {
            c.ty = ty;
        }
    }

    pub(super) fn set_referenced(&mut self, id: CursorId, referenced: Option<CursorId>) {
        if let Some(c) = self.builder.get_mut(id) {
            c.referenced = referenced;
        }
    }

    pub(super) fn kind_of(&self, id: CursorId) -> Option<CursorKind> {
        self.builder.get(id).map(|c| c.kind)
    }

    // ── Scopes and name resolution ─────────────────────────────────────

    pub(super) fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub(super) fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub(super) fn declare(&mut self, name: &str, id: CursorId) {
        if name.is_empty() {
            return;
        }
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), id);
        }
        if let Some(&(_, record)) = self.class_stack.last() {
            let parent_is_record = self
                .builder
                .get(record)
                .is_some_and(|r| r.children.contains(&id));
            if parent_is_record {
                self.members
                    .entry(record)
                    .or_default()
                    .insert(name.to_string(), id);
            }
        }
    }

    pub(super) fn lookup_local(&self, name: &str) -> Option<CursorId> {
        self.scopes.iter().rev().find_map(|s| s.get(name).copied())
    }

    /// Resolve `name`, optionally qualified by `scope` (`std`, a namespace or a record).
    pub(super) fn resolve(&mut self, name: &str, scope: Option<&str>) -> Result<Option<CursorId>, ParserError> {
        match scope {
            None => {
                if let Some(id) = self.lookup_local(name) {
                    return Ok(Some(id));
                }
                self.resolve_std(name, false)
            }
            Some("std") => self.resolve_std(name, true),
            Some(other) => {
                if let Some(&record) = self.records.get(other) {
                    return Ok(self.member(record, name));
                }
                Ok(self.lookup_local(name))
            }
        }
    }

    fn resolve_std(&mut self, name: &str, qualified: bool) -> Result<Option<CursorId>, ParserError> {
        let Some(entity) = STD_ENTITIES.get(name).copied() else {
            return Ok(None);
        };
        if !header_visible(entity.header, &self.includes) {
            return Ok(None);
        }
        let reachable = !entity.in_std || qualified || self.std_open || self.std_names.contains(name);
        if !reachable {
            return Ok(None);
        }
        if let Some(&id) = self.externals.get(name) {
            return Ok(Some(id));
        }
        let mut cursor = Cursor::new(entity.kind, name).in_file(EXTERNAL_FILE);
        match entity.kind {
            CursorKind::VarDecl => {
                cursor.ty = TypeInfo::new(entity.type_kind, entity.type_spelling);
            }
            CursorKind::FunctionDecl | CursorKind::FunctionTemplate => {
                cursor.ty = TypeInfo::new(TypeKind::FunctionProto, format!("{} (...)", entity.type_spelling));
                if !entity.type_spelling.is_empty() {
                    cursor.result_type = Some(self.types.info(entity.type_spelling));
                }
            }
            CursorKind::TypedefDecl => {
                cursor.ty = TypeInfo::new(TypeKind::Typedef, name);
                cursor.underlying_type = Some(entity.type_spelling.to_string());
            }
            _ => {
                cursor.ty = TypeInfo::new(TypeKind::Record, name);
            }
        }
        let root = self.builder.root();
        let id = self.add(root, cursor)?;
        self.externals.insert(name.to_string(), id);
        Ok(Some(id))
    }

    /// Namespace declaration for `name`, synthesizing `std` on demand.
    pub(super) fn resolve_namespace(&mut self, name: &str) -> Result<Option<CursorId>, ParserError> {
        if let Some(&id) = self.namespaces.get(name) {
            return Ok(Some(id));
        }
        if name != "std" {
            return Ok(None);
        }
        let key = "namespace std";
        if let Some(&id) = self.externals.get(key) {
            return Ok(Some(id));
        }
        let root = self.builder.root();
        let id = self.add(root, Cursor::new(CursorKind::Namespace, "std").in_file(EXTERNAL_FILE))?;
        self.externals.insert(key.to_string(), id);
        Ok(Some(id))
    }

    pub(super) fn member(&self, record: CursorId, name: &str) -> Option<CursorId> {
        self.members.get(&record).and_then(|m| m.get(name)).copied()
    }

    /// Record declared in the main file that values of `spelling` belong to.
    pub(super) fn record_of(&self, spelling: &str) -> Option<CursorId> {
        let trimmed = spelling.trim_end_matches(['*', '&', ' ']);
        self.records.get(types::base_name(trimmed)).copied()
    }

    // ── Generic walk ───────────────────────────────────────────────────

    pub fn walk_children<D: Doc>(&mut self, node: &Node<D>, parent: CursorId) -> Result<(), ParserError> {
        for child in node.children().filter(Node::is_named) {
            self.walk(&child, parent)?;
        }
        Ok(())
    }

    /// Build cursors for `node` under `parent` and return the primary one.
    pub fn walk<D: Doc>(&mut self, node: &Node<D>, parent: CursorId) -> WalkResult {
        if node.range().is_empty() {
            return Ok(None);
        }
        let kind = node.kind();
        match kind.as_ref() {
            "comment" => Ok(None),
            "preproc_include" => self.include(node, parent),
            "preproc_def" | "preproc_function_def" => self.macro_definition(node, parent),
            "preproc_call" => self.preproc_call(node, parent),
            "preproc_if" | "preproc_ifdef" | "preproc_elif" | "preproc_elifdef" | "preproc_else" => {
                self.preproc_conditional(node, parent)
            }
            "namespace_definition" => self.namespace(node, parent),
            "using_declaration" => self.using(node, parent),
            "alias_declaration" => self.alias(node, parent, None),
            "type_definition" => self.typedef(node, parent),
            "template_declaration" => self.template(node, parent),
            "function_definition" => self.function(node, parent, None, None).map(Some),
            "declaration" | "field_declaration" => self.declaration(node, parent),
            "class_specifier" | "struct_specifier" | "union_specifier" => {
                if node.field("body").is_some() {
                    self.record(node, parent, None, None)
                } else {
                    self.type_ref(node, parent)
                }
            }
            "enum_specifier" => self.enumeration(node, parent),
            "access_specifier" => {
                let c = self.cursor(CursorKind::CxxAccessSpecifier, node.text().trim(), node);
                self.add(parent, c).map(Some)
            }
            "compound_statement" => {
                let id = self.add(parent, self.cursor(CursorKind::CompoundStmt, "", node))?;
                self.push_scope();
                let res = self.walk_children(node, id);
                self.pop_scope();
                res.map(|()| Some(id))
            }
            "expression_statement" => {
                let named: Vec<_> = node.children().filter(Node::is_named).collect();
                if named.is_empty() {
                    return self.add(parent, self.cursor(CursorKind::NullStmt, "", node)).map(Some);
                }
                let mut last = None;
                for child in &named {
                    last = self.walk(child, parent)?.or(last);
                }
                Ok(last)
            }
            "return_statement" => self.statement(node, parent, CursorKind::ReturnStmt, false),
            "if_statement" => self.statement(node, parent, CursorKind::IfStmt, true),
            "for_statement" => self.statement(node, parent, CursorKind::ForStmt, true),
            "while_statement" => self.statement(node, parent, CursorKind::WhileStmt, true),
            "do_statement" => self.statement(node, parent, CursorKind::DoStmt, false),
            "switch_statement" => self.statement(node, parent, CursorKind::SwitchStmt, true),
            "for_range_loop" => self.range_for(node, parent),
            "case_statement" => {
                let is_default = node.children().any(|c| !c.is_named() && c.text() == "default");
                let kind = if is_default { CursorKind::DefaultStmt } else { CursorKind::CaseStmt };
                self.statement(node, parent, kind, false)
            }
            "break_statement" => self.add(parent, self.cursor(CursorKind::BreakStmt, "", node)).map(Some),
            "continue_statement" => self.add(parent, self.cursor(CursorKind::ContinueStmt, "", node)).map(Some),

            "identifier" => self.identifier(node, parent),
            "qualified_identifier" => self.qualified(node, parent),
            "template_function" => self.template_function(node, parent),
            "field_expression" => self.member_access(node, parent),
            "call_expression" => self.call(node, parent),
            "binary_expression" | "assignment_expression" | "comma_expression" => self.binary(node, parent),
            "unary_expression" | "pointer_expression" | "update_expression" => self.unary(node, parent),
            "conditional_expression" => self.conditional(node, parent),
            "subscript_expression" => self.subscript(node, parent),
            "parenthesized_expression" => {
                let id = self.add(parent, self.cursor(CursorKind::ParenExpr, "", node))?;
                let mut inner = None;
                for child in node.children().filter(Node::is_named) {
                    inner = self.walk(&child, id)?.or(inner);
                }
                let ty = self.ty(inner);
                self.set_type(id, ty);
                Ok(Some(id))
            }
            "cast_expression" => self.c_style_cast(node, parent),
            "sizeof_expression" | "alignof_expression" => {
                let id = self.add(parent, self.cursor(CursorKind::UnaryExpr, "", node))?;
                self.walk_children(node, id)?;
                self.set_type(id, TypeInfo::new(TypeKind::Typedef, "size_t"));
                Ok(Some(id))
            }
            "number_literal" => self.number(node, parent),
            "string_literal" | "raw_string_literal" | "concatenated_string" => {
                let text = node.text();
                let ty = format!("const char [{}]", string_storage_len(&text));
                let c = self
                    .cursor(CursorKind::StringLiteral, text.as_ref(), node)
                    .typed(TypeInfo::new(TypeKind::ConstantArray, ty));
                self.add(parent, c).map(Some)
            }
            "char_literal" => self.literal(node, parent, CursorKind::CharacterLiteral, "char"),
            "true" | "false" => self.literal(node, parent, CursorKind::CxxBoolLiteralExpr, "bool"),
            "nullptr" | "null" => {
                let c = self
                    .cursor(CursorKind::CxxNullPtrLiteralExpr, "", node)
                    .typed(TypeInfo::new(TypeKind::Typedef, "std::nullptr_t"));
                self.add(parent, c).map(Some)
            }
            "this" => {
                let ty = self
                    .class_stack
                    .last()
                    .map(|(name, _)| TypeInfo::new(TypeKind::Pointer, format!("{name} *")))
                    .unwrap_or_default();
                let c = self.cursor(CursorKind::CxxThisExpr, "", node).typed(ty);
                self.add(parent, c).map(Some)
            }
            "new_expression" => self.new_expression(node, parent),
            "delete_expression" => {
                let c = self
                    .cursor(CursorKind::CxxDeleteExpr, "", node)
                    .typed(TypeInfo::new(TypeKind::Void, "void"));
                let id = self.add(parent, c)?;
                self.walk_children(node, id)?;
                Ok(Some(id))
            }
            "lambda_expression" => self.lambda(node, parent),
            "initializer_list" => {
                let id = self.add(parent, self.cursor(CursorKind::InitListExpr, "", node))?;
                self.walk_children(node, id)?;
                Ok(Some(id))
            }
            "type_identifier" | "template_type" | "type_descriptor" | "primitive_type"
            | "sized_type_specifier" | "placeholder_type_specifier" | "dependent_type" | "decltype" => {
                self.type_ref(node, parent)
            }
            "namespace_identifier" => {
                let name = node.text().to_string();
                let referenced = self.resolve_namespace(&name)?;
                let mut c = self.cursor(CursorKind::NamespaceRef, name, node);
                c.referenced = referenced;
                self.add(parent, c).map(Some)
            }
            "field_identifier" => {
                let name = node.text().to_string();
                let referenced = self
                    .class_stack
                    .last()
                    .and_then(|&(_, record)| self.member(record, &name));
                let mut c = self.cursor(CursorKind::MemberRef, name, node);
                c.referenced = referenced;
                c.ty = self.ty(referenced);
                self.add(parent, c).map(Some)
            }
            _ => {
                let mut last = None;
                for child in node.children().filter(Node::is_named) {
                    last = self.walk(&child, parent)?.or(last);
                }
                Ok(last)
            }
        }
    }

    // ── Statements ─────────────────────────────────────────────────────

    fn statement<D: Doc>(&mut self, node: &Node<D>, parent: CursorId, kind: CursorKind, scoped: bool) -> WalkResult {
        let id = self.add(parent, self.cursor(kind, "", node))?;
        if scoped {
            self.push_scope();
        }
        let res = self.walk_children(node, id);
        if scoped {
            self.pop_scope();
        }
        res.map(|()| Some(id))
    }

    fn range_for<D: Doc>(&mut self, node: &Node<D>, parent: CursorId) -> WalkResult {
        let id = self.add(parent, self.cursor(CursorKind::CxxForRangeStmt, "", node))?;
        self.push_scope();
        let res = self.range_for_parts(node, id);
        self.pop_scope();
        res.map(|()| Some(id))
    }

    fn range_for_parts<D: Doc>(&mut self, node: &Node<D>, id: CursorId) -> Result<(), ParserError> {
        if let (Some(type_node), Some(declarator)) = (node.field("type"), node.field("declarator")) {
            self.variable(node, Some(&type_node), &declarator, id, CursorKind::VarDecl, true)?;
        }
        if let Some(right) = node.field("right") {
            self.walk(&right, id)?;
        }
        if let Some(body) = node.field("body") {
            self.walk(&body, id)?;
        }
        Ok(())
    }

    // ── Expressions ────────────────────────────────────────────────────

    fn identifier<D: Doc>(&mut self, node: &Node<D>, parent: CursorId) -> WalkResult {
        let name = node.text().to_string();
        if self.track_macros && self.macros.contains(&name) {
            return self.add(parent, self.cursor(CursorKind::MacroInstantiation, name, node)).map(Some);
        }
        let referenced = self.resolve(&name, None)?;
        let mut c = self.cursor(CursorKind::DeclRefExpr, name, node);
        c.referenced = referenced;
        c.ty = self.ty(referenced);
        self.add(parent, c).map(Some)
    }

    fn qualified<D: Doc>(&mut self, node: &Node<D>, parent: CursorId) -> WalkResult {
        let (scopes, name_node) = split_qualified(node);
        let name = name_node
            .as_ref()
            .map(|n| leaf_name(n))
            .unwrap_or_default();
        let scope_name = scopes.last().map(|s| s.text().to_string());
        let referenced = self.resolve(&name, scope_name.as_deref())?;
        let mut c = self.cursor(CursorKind::DeclRefExpr, name, node);
        if let Some(n) = &name_node {
            c.location = self.pos(n.range().start);
        }
        c.referenced = referenced;
        c.ty = self.ty(referenced);
        let id = self.add(parent, c)?;
        for scope in &scopes {
            self.scope_ref(scope, id)?;
        }
        if let Some(n) = name_node.filter(|n| n.kind() == "template_function") {
            if let Some(args) = n.field("arguments") {
                self.template_arguments(&args, id)?;
            }
        }
        Ok(Some(id))
    }

    /// `std` in `std::cout`, `A` in `A::f`.
    pub(super) fn scope_ref<D: Doc>(&mut self, scope: &Node<D>, parent: CursorId) -> WalkResult {
        let name = leaf_name(scope);
        if let Some(&record) = self.records.get(&name) {
            let mut c = self.cursor(CursorKind::TypeRef, name.clone(), scope);
            c.referenced = Some(record);
            c.ty = self.types.info(&name);
            return self.add(parent, c).map(Some);
        }
        let referenced = self.resolve_namespace(&name)?;
        let mut c = self.cursor(CursorKind::NamespaceRef, name, scope);
        c.referenced = referenced;
        self.add(parent, c).map(Some)
    }

    fn template_function<D: Doc>(&mut self, node: &Node<D>, parent: CursorId) -> WalkResult {
        let name = node.field("name").map(|n| leaf_name(&n)).unwrap_or_default();
        let referenced = self.resolve(&name, None)?;
        let mut c = self.cursor(CursorKind::DeclRefExpr, name, node);
        c.referenced = referenced;
        c.ty = self.ty(referenced);
        let id = self.add(parent, c)?;
        if let Some(args) = node.field("arguments") {
            self.template_arguments(&args, id)?;
        }
        Ok(Some(id))
    }

    pub(super) fn template_arguments<D: Doc>(&mut self, args: &Node<D>, parent: CursorId) -> Result<(), ParserError> {
        for arg in args.children().filter(Node::is_named) {
            if arg.kind() == "type_descriptor" {
                self.type_ref(&arg, parent)?;
            } else {
                self.walk(&arg, parent)?;
            }
        }
        Ok(())
    }

    fn member_access<D: Doc>(&mut self, node: &Node<D>, parent: CursorId) -> WalkResult {
        let field = node.field("field");
        let name = field.as_ref().map(|f| leaf_name(f)).unwrap_or_default();
        let mut c = self.cursor(CursorKind::MemberRefExpr, name.clone(), node);
        if let Some(f) = &field {
            c.location = self.pos(f.range().start);
        }
        let id = self.add(parent, c)?;
        let object = match node.field("argument") {
            Some(arg) => self.walk(&arg, id)?,
            None => None,
        };
        let object_ty = self.ty(object);
        let referenced = self
            .record_of(&object_ty.spelling)
            .and_then(|record| self.member(record, &name));
        let ty = match referenced {
            Some(_) => self.ty(referenced),
            None => types::std_member_result(&object_ty.spelling, &name)
                .map(|s| self.types.info(&s))
                .unwrap_or_default(),
        };
        self.set_referenced(id, referenced);
        self.set_type(id, ty);
        Ok(Some(id))
    }

    fn call<D: Doc>(&mut self, node: &Node<D>, parent: CursorId) -> WalkResult {
        let Some(function) = node.field("function") else {
            return self.fallback(node, parent);
        };
        let arguments = node.field("arguments");
        let fkind = function.kind().to_string();

        if fkind == "template_function" {
            let name = function.field("name").map(|n| leaf_name(&n)).unwrap_or_default();
            if let Some(&(_, kind)) = CAST_KEYWORDS.iter().find(|(kw, _)| *kw == name) {
                return self.named_cast(node, &function, arguments.as_ref(), parent, kind);
            }
        }
        if matches!(fkind.as_str(), "primitive_type" | "sized_type_specifier") {
            let ty = self.types.info(&function.text());
            let c = self.cursor(CursorKind::CxxFunctionalCastExpr, "", node).typed(ty);
            let id = self.add(parent, c)?;
            self.walk_arguments(arguments.as_ref(), id)?;
            return Ok(Some(id));
        }

        let callee_name = match fkind.as_str() {
            "identifier" => function.text().to_string(),
            "qualified_identifier" => split_qualified(&function)
                .1
                .map(|n| leaf_name(&n))
                .unwrap_or_default(),
            "field_expression" => function.field("field").map(|n| leaf_name(&n)).unwrap_or_default(),
            "template_function" => function.field("name").map(|n| leaf_name(&n)).unwrap_or_default(),
            _ => String::new(),
        };

        if self.track_macros && fkind == "identifier" && self.macros.contains(&callee_name) {
            return self
                .add(parent, self.cursor(CursorKind::MacroInstantiation, callee_name, node))
                .map(Some);
        }

        // `Node(1, 2)`: construction of a named type.
        if fkind == "identifier" {
            let target = self.lookup_local(&callee_name);
            let is_type = target
                .and_then(|t| self.kind_of(t))
                .is_some_and(|k| k.is_type_like() || k.is_alias_decl() || k == CursorKind::TemplateTypeParameter);
            if is_type {
                let c = self
                    .cursor(CursorKind::CallExpr, callee_name.clone(), node)
                    .typed(self.types.info(&callee_name));
                let id = self.add(parent, c)?;
                let mut type_ref = self.cursor(CursorKind::TypeRef, callee_name.clone(), &function);
                type_ref.referenced = target;
                type_ref.ty = self.types.info(&callee_name);
                self.add(id, type_ref)?;
                self.walk_arguments(arguments.as_ref(), id)?;
                return Ok(Some(id));
            }
        }

        let id = self.add(parent, self.cursor(CursorKind::CallExpr, callee_name, node))?;
        let callee = self.walk(&function, id)?;
        self.walk_arguments(arguments.as_ref(), id)?;

        let referenced = callee
            .and_then(|c| self.builder.get(c))
            .and_then(|c| c.referenced);
        let result = referenced
            .and_then(|r| self.builder.get(r))
            .and_then(|r| r.result_type.clone())
            .or_else(|| {
                // Member call on a standard type: size(), empty(), ...
                let callee = callee.and_then(|c| self.builder.get(c))?;
                (callee.kind == CursorKind::MemberRefExpr && callee.ty.is_valid()).then(|| callee.ty.clone())
            });
        self.set_referenced(id, referenced);
        if let Some(result) = result {
            self.set_type(id, result.clone());
            if let Some(c) = self.builder.get_mut(id) {
                c.result_type = Some(result);
            }
        }
        Ok(Some(id))
    }

    fn walk_arguments<D: Doc>(&mut self, arguments: Option<&Node<D>>, parent: CursorId) -> Result<(), ParserError> {
        if let Some(args) = arguments {
            self.walk_children(args, parent)?;
        }
        Ok(())
    }

    fn named_cast<D: Doc>(
        &mut self,
        node: &Node<D>,
        function: &Node<D>,
        arguments: Option<&Node<D>>,
        parent: CursorId,
        kind: CursorKind,
    ) -> WalkResult {
        let target = function
            .field("arguments")
            .and_then(|a| a.children().find(Node::is_named))
            .map(|t| self.types.info(&t.text()))
            .unwrap_or_default();
        let name = function.field("name").map(|n| leaf_name(&n)).unwrap_or_default();
        let c = self.cursor(kind, name, node).typed(target);
        let id = self.add(parent, c)?;
        if let Some(args) = function.field("arguments") {
            self.template_arguments(&args, id)?;
        }
        self.walk_arguments(arguments, id)?;
        Ok(Some(id))
    }

    fn c_style_cast<D: Doc>(&mut self, node: &Node<D>, parent: CursorId) -> WalkResult {
        let target = node
            .field("type")
            .map(|t| self.types.info(&t.text()))
            .unwrap_or_default();
        let c = self.cursor(CursorKind::CStyleCastExpr, "", node).typed(target);
        let id = self.add(parent, c)?;
        if let Some(t) = node.field("type") {
            self.type_ref(&t, id)?;
        }
        if let Some(value) = node.field("value") {
            self.walk(&value, id)?;
        }
        Ok(Some(id))
    }

    fn binary<D: Doc>(&mut self, node: &Node<D>, parent: CursorId) -> WalkResult {
        let op_node = node.field("operator");
        let op = op_node
            .as_ref()
            .map_or_else(|| ",".to_string(), |o| o.text().to_string());
        let kind = if op.len() >= 2 && op.ends_with('=') && !COMPARISON_OPS.contains(&op.as_str()) {
            CursorKind::CompoundAssignOperator
        } else {
            CursorKind::BinaryOperator
        };
        let mut c = self.cursor(kind, "", node);
        if let Some(o) = &op_node {
            c.location = self.pos(o.range().start);
        }
        let id = self.add(parent, c)?;
        let lhs = match node.field("left") {
            Some(l) => self.walk(&l, id)?,
            None => None,
        };
        let rhs = match node.field("right") {
            Some(r) => self.walk(&r, id)?,
            None => None,
        };
        let (lt, rt) = (self.ty(lhs), self.ty(rhs));
        let ty = if COMPARISON_OPS.contains(&op.as_str()) {
            TypeInfo::new(TypeKind::Builtin, "bool")
        } else if op == "," {
            rt
        } else if op.ends_with('=') {
            lt
        } else if types::is_arithmetic(&lt.spelling) && types::is_arithmetic(&rt.spelling) {
            self.types.info(&types::arithmetic_result(&lt.spelling, &rt.spelling))
        } else if lt.is_valid() {
            lt
        } else {
            rt
        };
        self.set_type(id, ty);
        Ok(Some(id))
    }

    fn unary<D: Doc>(&mut self, node: &Node<D>, parent: CursorId) -> WalkResult {
        let op_node = node.field("operator");
        let op = op_node.as_ref().map(|o| o.text().to_string()).unwrap_or_default();
        let mut c = self.cursor(CursorKind::UnaryOperator, "", node);
        if let Some(o) = &op_node {
            c.location = self.pos(o.range().start);
        }
        let id = self.add(parent, c)?;
        let operand = match node.field("argument") {
            Some(a) => self.walk(&a, id)?,
            None => None,
        };
        let ot = self.ty(operand);
        let ty = match op.as_str() {
            "!" => TypeInfo::new(TypeKind::Builtin, "bool"),
            "*" => types::pointee(&ot.spelling)
                .map(|s| self.types.info(&s))
                .unwrap_or_default(),
            "&" if ot.is_valid() => self.types.info(&format!("{} *", ot.spelling)),
            _ => ot,
        };
        self.set_type(id, ty);
        Ok(Some(id))
    }

    fn conditional<D: Doc>(&mut self, node: &Node<D>, parent: CursorId) -> WalkResult {
        let id = self.add(parent, self.cursor(CursorKind::ConditionalOperator, "", node))?;
        let mut branch = None;
        for field in ["condition", "consequence", "alternative"] {
            if let Some(part) = node.field(field) {
                let built = self.walk(&part, id)?;
                if field == "consequence" {
                    branch = built;
                }
            }
        }
        let ty = self.ty(branch);
        self.set_type(id, ty);
        Ok(Some(id))
    }

    fn subscript<D: Doc>(&mut self, node: &Node<D>, parent: CursorId) -> WalkResult {
        let id = self.add(parent, self.cursor(CursorKind::ArraySubscriptExpr, "", node))?;
        let base_node = node.field("argument");
        let base = match &base_node {
            Some(b) => self.walk(b, id)?,
            None => None,
        };
        let base_range = base_node.as_ref().map(Node::range);
        for child in node.children().filter(Node::is_named) {
            if Some(child.range()) != base_range {
                self.walk(&child, id)?;
            }
        }
        let bt = self.ty(base);
        let ty = types::subscript_result(&bt.spelling)
            .map(|s| self.types.info(&s))
            .unwrap_or_default();
        self.set_type(id, ty);
        Ok(Some(id))
    }

    fn number<D: Doc>(&mut self, node: &Node<D>, parent: CursorId) -> WalkResult {
        let text = node.text().to_ascii_lowercase();
        let hex = text.starts_with("0x");
        let floating = !hex && (text.contains('.') || text.contains('e') || text.ends_with('f'));
        let (kind, ty) = if floating {
            let ty = if text.ends_with('f') { "float" } else { "double" };
            (CursorKind::FloatingLiteral, ty)
        } else {
            let suffix = text.trim_start_matches(|c: char| c.is_ascii_hexdigit() || c == 'x' || c == '\'');
            let ty = match (suffix.contains('u'), suffix.matches('l').count()) {
                (true, 0) => "unsigned int",
                (false, 1) => "long",
                (true, 1) => "unsigned long",
                (false, 2) => "long long",
                (true, 2) => "unsigned long long",
                _ => "int",
            };
            (CursorKind::IntegerLiteral, ty)
        };
        self.literal(node, parent, kind, ty)
    }

    fn literal<D: Doc>(&mut self, node: &Node<D>, parent: CursorId, kind: CursorKind, ty: &str) -> WalkResult {
        let c = self
            .cursor(kind, "", node)
            .typed(TypeInfo::new(TypeKind::Builtin, ty));
        self.add(parent, c).map(Some)
    }

    fn new_expression<D: Doc>(&mut self, node: &Node<D>, parent: CursorId) -> WalkResult {
        let type_node = node.field("type");
        let ty = type_node
            .as_ref()
            .map(|t| self.types.info(&format!("{} *", t.text())))
            .unwrap_or_default();
        let id = self.add(parent, self.cursor(CursorKind::CxxNewExpr, "", node).typed(ty))?;
        let type_range = type_node.as_ref().map(Node::range);
        if let Some(t) = &type_node {
            self.type_ref(t, id)?;
        }
        for child in node.children().filter(Node::is_named) {
            if Some(child.range()) != type_range {
                self.walk(&child, id)?;
            }
        }
        Ok(Some(id))
    }

    fn lambda<D: Doc>(&mut self, node: &Node<D>, parent: CursorId) -> WalkResult {
        let c = self
            .cursor(CursorKind::LambdaExpr, "", node)
            .typed(TypeInfo::new(TypeKind::Unexposed, "lambda"));
        let id = self.add(parent, c)?;
        self.push_scope();
        let res = self.lambda_parts(node, id);
        self.pop_scope();
        res.map(|()| Some(id))
    }

    fn lambda_parts<D: Doc>(&mut self, node: &Node<D>, id: CursorId) -> Result<(), ParserError> {
        if let Some(params) = node
            .field("declarator")
            .and_then(|d| d.field("parameters"))
        {
            self.parameters(&params, id)?;
        }
        if let Some(body) = node.field("body") {
            self.walk(&body, id)?;
        }
        Ok(())
    }

    pub(super) fn fallback<D: Doc>(&mut self, node: &Node<D>, parent: CursorId) -> WalkResult {
        let mut last = None;
        for child in node.children().filter(Node::is_named) {
            last = self.walk(&child, parent)?.or(last);
        }
        Ok(last)
    }

    // ── Types ──────────────────────────────────────────────────────────

    /// Reference cursors for the identifiers of a type specifier.
    pub(super) fn type_ref<D: Doc>(&mut self, node: &Node<D>, parent: CursorId) -> WalkResult {
        match node.kind().as_ref() {
            "type_identifier" => {
                let name = node.text().to_string();
                if self.track_macros && self.macros.contains(&name) {
                    return self.add(parent, self.cursor(CursorKind::MacroInstantiation, name, node)).map(Some);
                }
                let referenced = self.resolve(&name, None)?;
                let mut c = self.cursor(CursorKind::TypeRef, name.clone(), node);
                c.referenced = referenced;
                c.ty = self.types.info(&name);
                self.add(parent, c).map(Some)
            }
            "qualified_identifier" => {
                let (scopes, name_node) = split_qualified(node);
                let mut first = None;
                for scope in &scopes {
                    first = first.or(self.scope_ref(scope, parent)?);
                }
                let scope_name = scopes.last().map(|s| s.text().to_string());
                let Some(name_node) = name_node else {
                    return Ok(first);
                };
                let name = leaf_name(&name_node);
                let referenced = self.resolve(&name, scope_name.as_deref())?;
                let kind = if name_node.kind() == "template_type" {
                    CursorKind::TemplateRef
                } else {
                    CursorKind::TypeRef
                };
                let anchor = name_node.field("name").unwrap_or_else(|| name_node.clone());
                let mut c = self.cursor(kind, name.clone(), &anchor);
                c.referenced = referenced;
                c.ty = self.types.info(&name);
                let id = self.add(parent, c)?;
                if let Some(args) = name_node.field("arguments") {
                    self.template_arguments(&args, parent)?;
                }
                Ok(first.or(Some(id)))
            }
            "template_type" => {
                let Some(name_node) = node.field("name") else {
                    return self.fallback(node, parent);
                };
                let name = name_node.text().to_string();
                let referenced = self.resolve(&name, None)?;
                let mut c = self.cursor(CursorKind::TemplateRef, name, &name_node);
                c.referenced = referenced;
                let id = self.add(parent, c)?;
                if let Some(args) = node.field("arguments") {
                    self.template_arguments(&args, parent)?;
                }
                Ok(Some(id))
            }
            "type_descriptor" => match node.field("type") {
                Some(t) => self.type_ref(&t, parent),
                None => Ok(None),
            },
            "class_specifier" | "struct_specifier" | "union_specifier" | "enum_specifier" => {
                if node.field("body").is_some() {
                    return self.walk(node, parent);
                }
                match node.field("name") {
                    Some(name) => self.type_ref(&name, parent),
                    None => Ok(None),
                }
            }
            "primitive_type" | "sized_type_specifier" | "placeholder_type_specifier" => Ok(None),
            _ => self.fallback(node, parent),
        }
    }
}

/// Scope segments and the final name of `a::b::c`.
pub(super) fn split_qualified<'r, D: Doc>(node: &Node<'r, D>) -> (Vec<Node<'r, D>>, Option<Node<'r, D>>) {
    let mut scopes = Vec::new();
    let mut current = node.clone();
    loop {
        if let Some(scope) = current.field("scope") {
            scopes.push(scope);
        }
        match current.field("name") {
            Some(name) if name.kind() == "qualified_identifier" => current = name,
            name => return (scopes, name),
        }
    }
}

/// Plain name of an identifier-like node (`vector` for `vector<int>`).
pub(super) fn leaf_name<D: Doc>(node: &Node<D>) -> String {
    match node.kind().as_ref() {
        "template_type" | "template_function" | "template_method" => node
            .field("name")
            .map_or_else(|| node.text().to_string(), |n| n.text().to_string()),
        "qualified_identifier" => split_qualified(node)
            .1
            .map_or_else(|| node.text().to_string(), |n| leaf_name(&n)),
        _ => node.text().to_string(),
    }
}

/// Storage size of a string literal including the terminator.
fn string_storage_len(literal: &str) -> usize {
    let body = literal
        .find('"')
        .and_then(|start| literal.rfind('"').filter(|&end| end > start).map(|end| &literal[start + 1..end]))
        .unwrap_or("");
    let mut len = 0;
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            chars.next();
            len += 1;
        } else {
            len += c.len_utf8();
        }
    }
    len + 1
}
