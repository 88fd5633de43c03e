//! Preprocessor lines.
//!
//! Includes are always recorded; directive and macro cursors only exist when
//! macro tracking is on. Conditional blocks are transparent: their content is
//! built under the enclosing cursor.

use ast_grep_core::{Doc, Node};

use crate::ast::{Cursor, CursorId, CursorKind, Inclusion};

use super::walker::{WalkResult, Walker};

impl Walker<'_> {
    fn directive(&mut self, parent: CursorId, spelling: String, start: usize, end: usize) -> WalkResult {
        let c = Cursor::new(CursorKind::PreprocessingDirective, spelling)
            .in_file(self.file.clone())
            .at(self.pos(start), self.span(start, end));
        self.add(parent, c).map(Some)
    }

    pub(super) fn include<D: Doc>(&mut self, node: &Node<D>, parent: CursorId) -> WalkResult {
        let path = node.field("path");
        let header = path
            .as_ref()
            .map(|p| {
                p.text()
                    .trim()
                    .trim_start_matches(['<', '"'])
                    .trim_end_matches(['>', '"'])
                    .trim()
                    .to_string()
            })
            .unwrap_or_default();
        let start = node.range().start;
        self.includes.push(header.clone());
        self.builder.push_include(Inclusion {
            header: header.clone(),
            source_file: self.file.clone(),
            line: self.pos(start).line,
            depth: 1,
        });
        if !self.track_macros {
            return Ok(None);
        }
        let end = path.as_ref().map_or(node.range().end, |p| p.range().end);
        let c = Cursor::new(CursorKind::InclusionDirective, header)
            .in_file(self.file.clone())
            .at(self.pos(start), self.span(start, end));
        self.add(parent, c).map(Some)
    }

    pub(super) fn macro_definition<D: Doc>(&mut self, node: &Node<D>, parent: CursorId) -> WalkResult {
        let Some(name_node) = node.field("name") else {
            return Ok(None);
        };
        let name = name_node.text().to_string();
        self.macros.insert(name.clone());
        if !self.track_macros {
            return Ok(None);
        }
        if let Some(keyword) = node.children().next() {
            let r = keyword.range();
            self.directive(parent, "define".to_string(), r.start, r.end)?;
        }
        let start = name_node.range().start;
        let end = node
            .field("value")
            .or_else(|| node.field("parameters"))
            .map_or(name_node.range().end, |n| n.range().end);
        let c = Cursor::new(CursorKind::MacroDefinition, name)
            .in_file(self.file.clone())
            .at(self.pos(start), self.span(start, end));
        self.add(parent, c).map(Some)
    }

    /// `#pragma once` and other directives with a free-form argument.
    pub(super) fn preproc_call<D: Doc>(&mut self, node: &Node<D>, parent: CursorId) -> WalkResult {
        if !self.track_macros {
            return Ok(None);
        }
        let Some(directive) = node.field("directive") else {
            return Ok(None);
        };
        let mut spelling = directive.text().trim_start_matches('#').trim().to_string();
        let mut end = directive.range().end;
        if let Some(arg) = node.field("argument") {
            let text = arg.text();
            if !text.trim().is_empty() {
                spelling.push(' ');
                spelling.push_str(text.trim());
                end = arg.range().start + text.trim_end().len();
            }
        }
        self.directive(parent, spelling, node.range().start, end)
    }

    pub(super) fn preproc_conditional<D: Doc>(&mut self, node: &Node<D>, parent: CursorId) -> WalkResult {
        let condition = node.field("condition").or_else(|| node.field("name"));
        let condition_range = condition.as_ref().map(Node::range);
        let mut built = None;
        if self.track_macros {
            if let Some(head) = node.children().next().filter(|h| !h.is_named()) {
                let mut spelling = head.text().trim_start_matches('#').trim().to_string();
                let mut end = head.range().end;
                if let Some(cond) = &condition {
                    spelling.push(' ');
                    spelling.push_str(cond.text().trim());
                    end = cond.range().end;
                }
                built = self.directive(parent, spelling, node.range().start, end)?;
            }
        }
        for child in node.children() {
            if child.is_named() {
                if Some(child.range()) != condition_range {
                    self.walk(&child, parent)?;
                }
            } else if self.track_macros && child.text().trim_start().starts_with("#endif") {
                let r = child.range();
                self.directive(parent, "endif".to_string(), r.start, r.start + "#endif".len())?;
            }
        }
        Ok(built)
    }
}
