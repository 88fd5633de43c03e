//! Declarations: variables, functions, records, enums, namespaces, aliases.

use ast_grep_core::{Doc, Node};

use crate::ast::{Cursor, CursorId, CursorKind, TypeInfo, TypeKind};
use crate::error::ParserError;

use super::types::normalize_spelling;
use super::walker::{WalkResult, Walker, leaf_name, split_qualified};

const DECLARATOR_KINDS: &[&str] = &[
    "identifier",
    "field_identifier",
    "type_identifier",
    "init_declarator",
    "pointer_declarator",
    "reference_declarator",
    "array_declarator",
    "function_declarator",
    "parenthesized_declarator",
    "qualified_identifier",
    "destructor_name",
    "operator_name",
    "template_function",
];

const TAG_SPECIFIERS: &[&str] = &["class_specifier", "struct_specifier", "union_specifier", "enum_specifier"];

/// A declarator peeled from the outside in.
pub(super) struct Declarator<'r, D: Doc> {
    pub name: Option<Node<'r, D>>,
    /// Appended to the base type: ` *`, ` &`, ` [10]`.
    pub suffix: String,
    pub function: Option<Node<'r, D>>,
    pub sizes: Vec<Node<'r, D>>,
    pub init: Vec<Node<'r, D>>,
}

impl<'r, D: Doc> Declarator<'r, D> {
    const fn empty() -> Self {
        Self {
            name: None,
            suffix: String::new(),
            function: None,
            sizes: Vec::new(),
            init: Vec::new(),
        }
    }

    pub fn peel(node: &Node<'r, D>) -> Self {
        let mut shape = Self::empty();
        let mut current = Some(node.clone());
        while let Some(n) = current.take() {
            match n.kind().as_ref() {
                "init_declarator" => {
                    shape.init.extend(n.field("value"));
                    current = n.field("declarator");
                }
                "pointer_declarator" | "abstract_pointer_declarator" => {
                    shape.suffix.push_str(" *");
                    current = n.field("declarator");
                }
                "reference_declarator" | "abstract_reference_declarator" => {
                    let amp = if n.text().trim_start().starts_with("&&") { " &&" } else { " &" };
                    shape.suffix.push_str(amp);
                    current = n.children().find(Node::is_named);
                }
                "array_declarator" | "abstract_array_declarator" => {
                    match n.field("size") {
                        Some(size) => {
                            shape.suffix.push_str(&format!(" [{}]", size.text()));
                            shape.sizes.push(size);
                        }
                        None => shape.suffix.push_str(" []"),
                    }
                    current = n.field("declarator");
                }
                "function_declarator" | "abstract_function_declarator" => {
                    current = n.field("declarator");
                    shape.function = Some(n);
                }
                "parenthesized_declarator" => current = n.children().find(Node::is_named),
                _ => shape.name = Some(n),
            }
        }
        shape
    }

    fn name_text(&self) -> String {
        self.name.as_ref().map(leaf_name).unwrap_or_default()
    }
}

fn is_tag_with_body<D: Doc>(node: &Node<D>) -> bool {
    TAG_SPECIFIERS.contains(&node.kind().as_ref()) && node.field("body").is_some()
}

/// Base type of a declaration including its cv-qualifiers: `const long long`.
fn base_type<D: Doc>(decl: &Node<D>, type_node: Option<&Node<D>>) -> String {
    let mut parts: Vec<String> = decl
        .children()
        .filter(|c| c.kind() == "type_qualifier")
        .map(|c| c.text().to_string())
        .collect();
    if let Some(t) = type_node {
        if TAG_SPECIFIERS.contains(&t.kind().as_ref()) {
            parts.push(t.field("name").map_or_else(|| "(anonymous)".to_string(), |n| n.text().to_string()));
        } else {
            parts.push(t.text().to_string());
        }
    }
    parts.join(" ")
}

fn parameter_type<D: Doc>(param: &Node<D>) -> String {
    let suffix = param
        .field("declarator")
        .map(|d| Declarator::peel(&d).suffix)
        .unwrap_or_default();
    normalize_spelling(&format!("{}{suffix}", base_type(param, param.field("type").as_ref())))
}

impl Walker<'_> {
    fn in_record_body(&self, parent: CursorId) -> bool {
        self.class_stack.last().is_some_and(|&(_, record)| record == parent)
    }

    fn template_params<D: Doc>(&mut self, params: Option<&Node<D>>, owner: CursorId) -> Result<(), ParserError> {
        let Some(params) = params else {
            return Ok(());
        };
        for param in params.children().filter(Node::is_named) {
            if !param.kind().ends_with("type_parameter_declaration") {
                continue;
            }
            let name_node = param
                .field("name")
                .or_else(|| param.children().find(|c| c.kind() == "type_identifier"));
            let name = name_node.as_ref().map(|n| n.text().to_string()).unwrap_or_default();
            let mut c = self
                .cursor(CursorKind::TemplateTypeParameter, name.clone(), &param)
                .typed(TypeInfo::new(TypeKind::Unexposed, name.clone()));
            if let Some(n) = &name_node {
                c.location = self.pos(n.range().start);
            }
            let id = self.add(owner, c)?;
            self.types.template_params.insert(name.clone());
            self.declare(&name, id);
        }
        Ok(())
    }

    // ── Variables ──────────────────────────────────────────────────────

    pub(super) fn declaration<D: Doc>(&mut self, node: &Node<D>, parent: CursorId) -> WalkResult {
        let type_node = node.field("type");
        let in_block = self.kind_of(parent).is_some_and(CursorKind::is_statement);
        let var_kind = if self.in_record_body(parent) {
            CursorKind::FieldDecl
        } else {
            CursorKind::VarDecl
        };
        let target = if in_block {
            self.add(parent, self.cursor(CursorKind::DeclStmt, "", node))?
        } else {
            parent
        };
        if let Some(t) = type_node.as_ref().filter(|t| is_tag_with_body(t)) {
            self.walk(t, target)?;
        }
        let type_range = type_node.as_ref().map(Node::range);
        let mut last = None;
        for child in node.children().filter(Node::is_named) {
            if Some(child.range()) == type_range || !DECLARATOR_KINDS.contains(&child.kind().as_ref()) {
                continue;
            }
            let first = last.is_none();
            last = self
                .variable(node, type_node.as_ref(), &child, target, var_kind, first)?
                .or(last);
        }
        if let (Some(default), Some(field)) = (node.field("default_value"), last) {
            self.walk(&default, field)?;
        }
        if in_block { Ok(Some(target)) } else { Ok(last) }
    }

    /// One declarator of a declaration; function declarators become prototypes.
    pub(super) fn variable<D: Doc>(
        &mut self,
        decl: &Node<D>,
        type_node: Option<&Node<D>>,
        declarator: &Node<D>,
        parent: CursorId,
        kind: CursorKind,
        first: bool,
    ) -> WalkResult {
        let shape = Declarator::peel(declarator);
        if shape.function.is_some() {
            return self
                .callable(decl, type_node, &shape, parent, None, None)
                .map(Some);
        }
        let name = shape.name_text();
        let ty = self
            .types
            .info(&format!("{}{}", base_type(decl, type_node), shape.suffix));
        let start = decl.range().start;
        let mut c = Cursor::new(kind, name.clone())
            .in_file(self.file.clone())
            .at(self.pos(start), self.span(start, declarator.range().end))
            .typed(ty.clone());
        if let Some(n) = &shape.name {
            c.location = self.pos(n.range().start);
        }
        let id = self.add(parent, c)?;
        if first {
            if let Some(t) = type_node.filter(|t| !is_tag_with_body(t)) {
                self.type_ref(t, id)?;
            }
        }
        for size in &shape.sizes {
            self.walk(size, id)?;
        }
        self.declare(&name, id);
        for init in &shape.init {
            if init.kind() == "argument_list" {
                let spelling = type_node.map(leaf_name).unwrap_or_default();
                let call = self.cursor(CursorKind::CallExpr, spelling, init).typed(ty.clone());
                let call = self.add(id, call)?;
                self.walk_children(init, call)?;
            } else {
                self.walk(init, id)?;
            }
        }
        Ok(Some(id))
    }

    pub(super) fn parameters<D: Doc>(&mut self, list: &Node<D>, owner: CursorId) -> Result<(), ParserError> {
        for param in list.children().filter(Node::is_named) {
            if !matches!(
                param.kind().as_ref(),
                "parameter_declaration" | "optional_parameter_declaration" | "variadic_parameter_declaration"
            ) {
                continue;
            }
            let shape = param
                .field("declarator")
                .map_or_else(Declarator::empty, |d| Declarator::peel(&d));
            let name = shape.name_text();
            let mut c = self
                .cursor(CursorKind::ParmDecl, name.clone(), &param)
                .typed(self.types.info(&parameter_type(&param)));
            if let Some(n) = &shape.name {
                c.location = self.pos(n.range().start);
            }
            let id = self.add(owner, c)?;
            if let Some(t) = param.field("type") {
                self.type_ref(&t, id)?;
            }
            self.declare(&name, id);
            if let Some(default) = param.field("default_value") {
                self.walk(&default, id)?;
            }
        }
        Ok(())
    }

    // ── Functions ──────────────────────────────────────────────────────

    /// A function definition, body included.
    pub(super) fn function<D: Doc>(
        &mut self,
        node: &Node<D>,
        parent: CursorId,
        template_kind: Option<CursorKind>,
        template_params: Option<&Node<D>>,
    ) -> Result<CursorId, ParserError> {
        let id = self.function_header(node, parent, template_kind, template_params)?;
        self.function_body(id, node)?;
        Ok(id)
    }

    fn function_header<D: Doc>(
        &mut self,
        node: &Node<D>,
        parent: CursorId,
        template_kind: Option<CursorKind>,
        template_params: Option<&Node<D>>,
    ) -> Result<CursorId, ParserError> {
        let shape = node
            .field("declarator")
            .map_or_else(Declarator::empty, |d| Declarator::peel(&d));
        self.callable(node, node.field("type").as_ref(), &shape, parent, template_kind, template_params)
    }

    /// Cursor, template parameters, return type and parameters of a function.
    fn callable<D: Doc>(
        &mut self,
        decl: &Node<D>,
        type_node: Option<&Node<D>>,
        shape: &Declarator<'_, D>,
        parent: CursorId,
        template_kind: Option<CursorKind>,
        template_params: Option<&Node<D>>,
    ) -> Result<CursorId, ParserError> {
        let name_kind = shape.name.as_ref().map(|n| n.kind().to_string()).unwrap_or_default();
        let (kind, name, out_of_class) = match name_kind.as_str() {
            "qualified_identifier" => {
                let (scopes, last) = shape
                    .name
                    .as_ref()
                    .map_or_else(|| (Vec::new(), None), split_qualified);
                let owner = scopes.last().map(leaf_name).unwrap_or_default();
                let last_kind = last.as_ref().map(|l| l.kind().to_string()).unwrap_or_default();
                let name = last.as_ref().map(leaf_name).unwrap_or_default();
                let is_record = self.records.contains_key(&owner);
                let kind = if last_kind == "destructor_name" {
                    CursorKind::Destructor
                } else if is_record && name == owner {
                    CursorKind::Constructor
                } else if is_record {
                    CursorKind::CxxMethod
                } else {
                    CursorKind::FunctionDecl
                };
                (kind, name, true)
            }
            "destructor_name" => (CursorKind::Destructor, shape.name_text(), false),
            _ => {
                let name = shape.name_text();
                let kind = match self.class_stack.last() {
                    Some((record, id)) if *id == parent && *record == name => CursorKind::Constructor,
                    Some((_, id)) if *id == parent => CursorKind::CxxMethod,
                    _ => CursorKind::FunctionDecl,
                };
                (kind, name, false)
            }
        };
        let kind = template_kind.unwrap_or(kind);

        let params: Vec<String> = shape
            .function
            .as_ref()
            .and_then(|f| f.field("parameters"))
            .map(|list| {
                list.children()
                    .filter(|p| p.kind().ends_with("parameter_declaration"))
                    .map(|p| parameter_type(&p))
                    .collect()
            })
            .unwrap_or_default();
        let result = match kind {
            CursorKind::Constructor | CursorKind::Destructor => "void".to_string(),
            _ => normalize_spelling(&format!("{}{}", base_type(decl, type_node), shape.suffix)),
        };
        let signature = params.join(", ");

        let mut c = self
            .cursor(kind, name.clone(), decl)
            .typed(TypeInfo::new(TypeKind::FunctionProto, format!("{result} ({signature})")));
        c.display_name = format!("{name}({signature})");
        c.result_type = Some(self.types.info(&result));
        if let Some(n) = &shape.name {
            c.location = self.pos(n.range().start);
        }
        let id = self.add(parent, c)?;
        if !out_of_class {
            self.declare(&name, id);
        }

        self.push_scope();
        let res = self.callable_children(type_node, shape, id, template_params);
        self.pop_scope();
        res.map(|()| id)
    }

    fn callable_children<D: Doc>(
        &mut self,
        type_node: Option<&Node<D>>,
        shape: &Declarator<'_, D>,
        id: CursorId,
        template_params: Option<&Node<D>>,
    ) -> Result<(), ParserError> {
        self.template_params(template_params, id)?;
        if let Some(t) = type_node.filter(|t| !is_tag_with_body(t)) {
            self.type_ref(t, id)?;
        }
        if let Some(list) = shape.function.as_ref().and_then(|f| f.field("parameters")) {
            self.parameters(&list, id)?;
        }
        Ok(())
    }

    /// Member initializers and body of a function definition.
    fn function_body<D: Doc>(&mut self, id: CursorId, definition: &Node<D>) -> Result<(), ParserError> {
        let owner = definition
            .field("declarator")
            .map(|d| Declarator::peel(&d))
            .and_then(|shape| shape.name)
            .filter(|n| n.kind() == "qualified_identifier")
            .and_then(|n| split_qualified(&n).0.last().map(leaf_name))
            .and_then(|owner| self.records.get(&owner).map(|&record| (owner, record)));

        self.push_scope();
        if let Some((name, record)) = &owner {
            self.class_stack.push((name.clone(), *record));
            let members: Vec<(String, CursorId)> = self
                .members
                .get(record)
                .map(|m| m.iter().map(|(k, v)| (k.clone(), *v)).collect())
                .unwrap_or_default();
            if let Some(scope) = self.scopes.last_mut() {
                scope.extend(members);
            }
        }
        let own: Vec<(String, CursorId)> = self
            .builder
            .get(id)
            .map(|c| c.children.clone())
            .unwrap_or_default()
            .into_iter()
            .filter_map(|child| {
                let c = self.builder.get(child)?;
                matches!(c.kind, CursorKind::ParmDecl | CursorKind::TemplateTypeParameter)
                    .then(|| (c.spelling.clone(), child))
            })
            .collect();
        if let Some(scope) = self.scopes.last_mut() {
            scope.extend(own);
        }

        let res = self.function_body_parts(id, definition);
        if owner.is_some() {
            self.class_stack.pop();
        }
        self.pop_scope();
        res
    }

    fn function_body_parts<D: Doc>(&mut self, id: CursorId, definition: &Node<D>) -> Result<(), ParserError> {
        for init in definition.children().filter(|c| c.kind() == "field_initializer_list") {
            self.walk_children(&init, id)?;
        }
        if let Some(body) = definition.field("body") {
            self.walk(&body, id)?;
        }
        Ok(())
    }

    // ── Records and enums ──────────────────────────────────────────────

    pub(super) fn record<D: Doc>(
        &mut self,
        node: &Node<D>,
        parent: CursorId,
        template_kind: Option<CursorKind>,
        template_params: Option<&Node<D>>,
    ) -> WalkResult {
        let kind = template_kind.unwrap_or(match node.kind().as_ref() {
            "class_specifier" => CursorKind::ClassDecl,
            "union_specifier" => CursorKind::UnionDecl,
            _ => CursorKind::StructDecl,
        });
        let name_node = node.field("name");
        let name = name_node.as_ref().map(leaf_name).unwrap_or_default();
        let mut c = self
            .cursor(kind, name.clone(), node)
            .typed(TypeInfo::new(TypeKind::Record, name.clone()));
        if let Some(n) = &name_node {
            c.location = self.pos(n.range().start);
        }
        let id = self.add(parent, c)?;
        if !name.is_empty() {
            self.types.records.insert(name.clone());
            self.records.insert(name.clone(), id);
        }
        self.declare(&name, id);

        self.push_scope();
        self.class_stack.push((name, id));
        let res = self.record_members(node, id, template_params);
        self.class_stack.pop();
        self.pop_scope();
        res.map(|()| Some(id))
    }

    fn record_members<D: Doc>(
        &mut self,
        node: &Node<D>,
        id: CursorId,
        template_params: Option<&Node<D>>,
    ) -> Result<(), ParserError> {
        self.template_params(template_params, id)?;
        for clause in node.children().filter(|c| c.kind() == "base_class_clause") {
            for base in clause.children().filter(Node::is_named) {
                if base.kind() != "access_specifier" {
                    self.type_ref(&base, id)?;
                }
            }
        }
        let Some(body) = node.field("body") else {
            return Ok(());
        };
        // Inline method bodies see every member, so they are walked last.
        let mut deferred = Vec::new();
        for member in body.children().filter(Node::is_named) {
            if member.kind() == "function_definition" {
                let method = self.function_header(&member, id, None, None)?;
                deferred.push((method, member));
            } else {
                self.walk(&member, id)?;
            }
        }
        for (method, definition) in &deferred {
            self.function_body(*method, definition)?;
        }
        Ok(())
    }

    pub(super) fn enumeration<D: Doc>(&mut self, node: &Node<D>, parent: CursorId) -> WalkResult {
        let Some(body) = node.field("body") else {
            return self.type_ref(node, parent);
        };
        let name_node = node.field("name");
        let name = name_node.as_ref().map(leaf_name).unwrap_or_default();
        let mut c = self
            .cursor(CursorKind::EnumDecl, name.clone(), node)
            .typed(TypeInfo::new(TypeKind::Enum, name.clone()));
        if let Some(n) = &name_node {
            c.location = self.pos(n.range().start);
        }
        let id = self.add(parent, c)?;
        if !name.is_empty() {
            self.types.enums.insert(name.clone());
        }
        self.declare(&name, id);
        for enumerator in body.children().filter(|c| c.kind() == "enumerator") {
            let constant = enumerator.field("name").map(|n| n.text().to_string()).unwrap_or_default();
            let mut c = self
                .cursor(CursorKind::EnumConstantDecl, constant.clone(), &enumerator)
                .typed(TypeInfo::new(TypeKind::Enum, name.clone()));
            if let Some(n) = enumerator.field("name") {
                c.location = self.pos(n.range().start);
            }
            let constant_id = self.add(id, c)?;
            if let Some(scope) = self.scopes.last_mut() {
                scope.insert(constant, constant_id);
            }
            if let Some(value) = enumerator.field("value") {
                self.walk(&value, constant_id)?;
            }
        }
        Ok(Some(id))
    }

    // ── Scoping, aliases, templates ────────────────────────────────────

    pub(super) fn namespace<D: Doc>(&mut self, node: &Node<D>, parent: CursorId) -> WalkResult {
        let name_node = node.field("name");
        let name = name_node.as_ref().map(|n| n.text().to_string()).unwrap_or_default();
        let mut c = self.cursor(CursorKind::Namespace, name.clone(), node);
        if let Some(n) = &name_node {
            c.location = self.pos(n.range().start);
        }
        let id = self.add(parent, c)?;
        self.namespaces.insert(name, id);
        if let Some(body) = node.field("body") {
            self.walk_children(&body, id)?;
        }
        Ok(Some(id))
    }

    pub(super) fn using<D: Doc>(&mut self, node: &Node<D>, parent: CursorId) -> WalkResult {
        let is_directive = node.children().any(|c| !c.is_named() && c.text() == "namespace");
        let Some(target) = node.children().filter(Node::is_named).last() else {
            return Ok(None);
        };
        if is_directive {
            let name = target.text().to_string();
            if name == "std" {
                self.std_open = true;
            }
            let referenced = self.resolve_namespace(&name)?;
            let mut c = self.cursor(CursorKind::UsingDirective, name.clone(), node);
            c.location = self.pos(target.range().start);
            c.referenced = referenced;
            let id = self.add(parent, c)?;
            let mut ns_ref = self.cursor(CursorKind::NamespaceRef, name, &target);
            ns_ref.referenced = referenced;
            self.add(id, ns_ref)?;
            return Ok(Some(id));
        }

        let (scopes, last) = if target.kind() == "qualified_identifier" {
            split_qualified(&target)
        } else {
            (Vec::new(), Some(target.clone()))
        };
        let name = last.as_ref().map(leaf_name).unwrap_or_default();
        let scope_name = scopes.last().map(|s| s.text().to_string());
        if scope_name.as_deref() == Some("std") {
            self.std_names.insert(name.clone());
        }
        let referenced = self.resolve(&name, scope_name.as_deref())?;
        let mut c = self.cursor(CursorKind::UsingDeclaration, name, node);
        if let Some(l) = &last {
            c.location = self.pos(l.range().start);
        }
        c.referenced = referenced;
        let id = self.add(parent, c)?;
        for scope in &scopes {
            self.scope_ref(scope, id)?;
        }
        Ok(Some(id))
    }

    pub(super) fn alias<D: Doc>(
        &mut self,
        node: &Node<D>,
        parent: CursorId,
        template_params: Option<&Node<D>>,
    ) -> WalkResult {
        let kind = if template_params.is_some() {
            CursorKind::TypeAliasTemplateDecl
        } else {
            CursorKind::TypeAliasDecl
        };
        let name_node = node.field("name");
        let name = name_node.as_ref().map(|n| n.text().to_string()).unwrap_or_default();
        let type_node = node.field("type");
        let mut c = self
            .cursor(kind, name.clone(), node)
            .typed(TypeInfo::new(TypeKind::Typedef, name.clone()));
        c.underlying_type = type_node.as_ref().map(|t| normalize_spelling(&t.text()));
        if let Some(n) = &name_node {
            c.location = self.pos(n.range().start);
        }
        let id = self.add(parent, c)?;
        self.types.aliases.insert(name.clone());
        self.declare(&name, id);

        self.push_scope();
        let res = self.template_params(template_params, id).and_then(|()| match &type_node {
            Some(t) => self.type_ref(t, id).map(|_| ()),
            None => Ok(()),
        });
        self.pop_scope();
        res.map(|()| Some(id))
    }

    pub(super) fn typedef<D: Doc>(&mut self, node: &Node<D>, parent: CursorId) -> WalkResult {
        let type_node = node.field("type");
        if let Some(t) = type_node.as_ref().filter(|t| is_tag_with_body(t)) {
            self.walk(t, parent)?;
        }
        let base = base_type(node, type_node.as_ref());
        let type_range = type_node.as_ref().map(Node::range);
        let mut last = None;
        for child in node.children().filter(Node::is_named) {
            if Some(child.range()) == type_range || !DECLARATOR_KINDS.contains(&child.kind().as_ref()) {
                continue;
            }
            let shape = Declarator::peel(&child);
            let name = shape.name_text();
            let start = node.range().start;
            let mut c = Cursor::new(CursorKind::TypedefDecl, name.clone())
                .in_file(self.file.clone())
                .at(self.pos(start), self.span(start, child.range().end))
                .typed(TypeInfo::new(TypeKind::Typedef, name.clone()));
            c.underlying_type = Some(normalize_spelling(&format!("{base}{}", shape.suffix)));
            if let Some(n) = &shape.name {
                c.location = self.pos(n.range().start);
            }
            let id = self.add(parent, c)?;
            if last.is_none() {
                if let Some(t) = type_node.as_ref().filter(|t| !is_tag_with_body(t)) {
                    self.type_ref(t, id)?;
                }
            }
            self.types.aliases.insert(name.clone());
            self.declare(&name, id);
            last = Some(id);
        }
        Ok(last)
    }

    pub(super) fn template<D: Doc>(&mut self, node: &Node<D>, parent: CursorId) -> WalkResult {
        let params = node.field("parameters");
        let params_range = params.as_ref().map(Node::range);
        let Some(inner) = node
            .children()
            .filter(Node::is_named)
            .filter(|c| Some(c.range()) != params_range)
            .last()
        else {
            return Ok(None);
        };
        match inner.kind().as_ref() {
            "function_definition" => self
                .function(&inner, parent, Some(CursorKind::FunctionTemplate), params.as_ref())
                .map(Some),
            "class_specifier" | "struct_specifier" | "union_specifier" if inner.field("body").is_some() => {
                self.record(&inner, parent, Some(CursorKind::ClassTemplate), params.as_ref())
            }
            "alias_declaration" => self.alias(&inner, parent, params.as_ref()),
            _ => self.walk(&inner, parent),
        }
    }
}
