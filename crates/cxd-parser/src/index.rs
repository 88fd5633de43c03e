//! Translation index: one pre-order pass over the main file's cursors.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use cxd_core::context::{AliasesAndNamespaces, DeclCounts, MacroEvent, TypedefRecord};
use cxd_core::enums::MacroEventKind;
use tracing::debug;

use crate::ast::{CursorId, CursorKind, TranslationUnit};
use crate::error::ParserError;

/// Marker recorded for a using-directive whose namespace did not resolve.
pub const UNKNOWN_NAMESPACE: &str = "<UNKNOWN_NS>";

/// Derived lookup tables for one translation unit.
///
/// Holds cursor ids, not cursors, so it is only meaningful together with the
/// unit it was built from.
#[derive(Debug, Clone, Default)]
pub struct TuIndex {
    cursors_by_line: BTreeMap<u32, Vec<CursorId>>,
    parent_of: Vec<Option<CursorId>>,
    pub aliases: AliasesAndNamespaces,
    pub decl_counts: DeclCounts,
    pub includes: Vec<String>,
    pub macros: Vec<MacroEvent>,
    pub macro_defs: BTreeSet<String>,
    pub macro_uses: BTreeSet<String>,
}

impl TuIndex {
    /// Interesting cursors anchored on `line`, in traversal order.
    #[must_use]
    pub fn cursors_at(&self, line: u32) -> &[CursorId] {
        self.cursors_by_line.get(&line).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn parent_of(&self, id: CursorId) -> Option<CursorId> {
        self.parent_of.get(id.index()).copied().flatten()
    }

    #[must_use]
    pub fn indexed_lines(&self) -> usize {
        self.cursors_by_line.len()
    }
}

/// `bits/stdc++.h` -> `stdc++`, `iostream` -> `iostream`.
#[must_use]
pub fn header_basename(header: &str) -> String {
    let path = Path::new(header);
    path.file_stem()
        .or_else(|| path.file_name())
        .map_or_else(|| header.to_string(), |s| s.to_string_lossy().into_owned())
}

/// Build the [`TuIndex`] for `tu`.
///
/// # Errors
///
/// Returns [`ParserError::DanglingCursor`] when a child id points outside the arena.
pub fn build_index(tu: &TranslationUnit, track_macros: bool) -> Result<TuIndex, ParserError> {
    let mut idx = TuIndex {
        parent_of: vec![None; tu.len()],
        ..TuIndex::default()
    };

    // (cursor, parent) pairs; children are pushed reversed to keep pre-order.
    let mut stack = vec![(tu.root(), None::<CursorId>)];
    while let Some((id, parent)) = stack.pop() {
        let cur = tu.cursor(id)?;
        if cur.file.is_none() {
            for &child in cur.children.iter().rev() {
                stack.push((child, Some(id)));
            }
            continue;
        }
        if !tu.is_main_file(cur) {
            continue;
        }

        if let Some(slot) = idx.parent_of.get_mut(id.index()) {
            *slot = parent;
        }
        let kind = cur.kind;
        let line = cur.location.line;
        if kind.is_interesting() {
            idx.cursors_by_line.entry(line).or_default().push(id);
        }

        if track_macros {
            let event = match kind {
                CursorKind::MacroDefinition => {
                    idx.macro_defs.insert(cur.spelling.clone());
                    Some(MacroEventKind::MacroDef)
                }
                CursorKind::MacroInstantiation => {
                    idx.macro_uses.insert(cur.spelling.clone());
                    Some(MacroEventKind::MacroUse)
                }
                CursorKind::PreprocessingDirective => Some(MacroEventKind::PpDirective),
                _ => None,
            };
            if let Some(kind) = event {
                idx.macros.push(MacroEvent {
                    kind,
                    name: cur.spelling.clone(),
                    line,
                });
            }
        }

        match kind {
            CursorKind::UsingDirective => {
                let name = match cur.referenced {
                    Some(ns) => {
                        let ns = tu.cursor(ns)?;
                        if ns.display_name.is_empty() {
                            ns.spelling.clone()
                        } else {
                            ns.display_name.clone()
                        }
                    }
                    None => UNKNOWN_NAMESPACE.to_string(),
                };
                idx.aliases.using_directives.push(name);
            }
            CursorKind::UsingDeclaration => idx.aliases.using_decls.push(cur.spelling.clone()),
            CursorKind::TypedefDecl | CursorKind::TypeAliasDecl => {
                let underlying = cur
                    .underlying_type
                    .clone()
                    .unwrap_or_else(|| cur.ty.spelling.clone());
                idx.aliases.typedefs.push(TypedefRecord {
                    name: cur.spelling.clone(),
                    underlying,
                    kind: kind.as_str().to_string(),
                });
            }
            CursorKind::Namespace => idx.aliases.namespaces.push(cur.spelling.clone()),
            _ => {}
        }

        let counts = &mut idx.decl_counts;
        if kind.is_type_like() {
            *counts.type_kinds.entry(kind.as_str().to_string()).or_default() += 1;
        } else if kind.is_variable_like() {
            *counts.var_kinds.entry(kind.as_str().to_string()).or_default() += 1;
            *counts.var_types.entry(cur.ty.spelling.clone()).or_default() += 1;
        } else if kind.is_function_like() {
            *counts.func_kinds.entry(kind.as_str().to_string()).or_default() += 1;
        }

        for &child in cur.children.iter().rev() {
            stack.push((child, Some(id)));
        }
    }

    idx.includes = tu
        .includes()
        .iter()
        .filter(|inc| inc.depth == 1 && inc.source_file == tu.main_file())
        .map(|inc| header_basename(&inc.header))
        .collect();

    debug!(
        lines = idx.cursors_by_line.len(),
        includes = idx.includes.len(),
        macros = idx.macros.len(),
        "built translation index"
    );
    Ok(idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Cursor, Inclusion, Position, SourceRange, TranslationUnitBuilder, TypeInfo, TypeKind};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn at(line: u32, start: usize, end: usize) -> (Position, SourceRange) {
        let p = |offset| Position { line, column: 1, offset };
        (p(start), SourceRange::new(p(start), p(end)))
    }

    fn cursor(kind: CursorKind, spelling: &str, line: u32, start: usize, end: usize) -> Cursor {
        let (loc, ext) = at(line, start, end);
        Cursor::new(kind, spelling).in_file("code.cpp").at(loc, ext)
    }

    fn sample() -> TranslationUnit {
        let mut b = TranslationUnitBuilder::new("code.cpp");
        let root = b.root();
        let std_ns = b
            .add_child(root, Cursor::new(CursorKind::Namespace, "std").in_file("<external>"))
            .unwrap();
        let mut using = cursor(CursorKind::UsingDirective, "std", 1, 0, 20);
        using.referenced = Some(std_ns);
        b.add_child(root, using).unwrap();
        let mut alias = cursor(CursorKind::TypeAliasDecl, "ll", 2, 21, 40);
        alias.underlying_type = Some("long long".into());
        b.add_child(root, alias).unwrap();
        let main = b.add_child(root, cursor(CursorKind::FunctionDecl, "main", 3, 41, 90)).unwrap();
        let body = b.add_child(main, cursor(CursorKind::CompoundStmt, "", 3, 52, 90)).unwrap();
        let stmt = b.add_child(body, cursor(CursorKind::DeclStmt, "", 4, 54, 64)).unwrap();
        b.add_child(
            stmt,
            cursor(CursorKind::VarDecl, "x", 4, 54, 63).typed(TypeInfo::new(TypeKind::Builtin, "int")),
        )
        .unwrap();
        b.push_include(Inclusion {
            header: "bits/stdc++.h".into(),
            source_file: "code.cpp".into(),
            line: 1,
            depth: 1,
        });
        b.push_include(Inclusion {
            header: "vector".into(),
            source_file: "/usr/include/c++/bits/stdc++.h".into(),
            line: 40,
            depth: 2,
        });
        b.finish()
    }

    #[test]
    fn records_aliases_and_directives() {
        let idx = build_index(&sample(), false).unwrap();
        assert_eq!(idx.aliases.using_directives, vec!["std"]);
        assert_eq!(idx.aliases.typedefs.len(), 1);
        assert_eq!(idx.aliases.typedefs[0].underlying, "long long");
        assert_eq!(idx.aliases.typedefs[0].kind, "TYPE_ALIAS_DECL");
    }

    #[test]
    fn external_cursors_are_skipped() {
        let idx = build_index(&sample(), false).unwrap();
        assert!(idx.aliases.namespaces.is_empty());
        assert_eq!(idx.parent_of(CursorId::from_raw(1)), None);
    }

    #[test]
    fn interesting_cursors_by_line_and_parents() {
        let tu = sample();
        let idx = build_index(&tu, false).unwrap();
        let at_four = idx.cursors_at(4);
        assert_eq!(at_four.len(), 1);
        let var = at_four[0];
        assert_eq!(tu.cursor(var).unwrap().kind, CursorKind::VarDecl);
        let stmt = idx.parent_of(var).unwrap();
        assert_eq!(tu.cursor(stmt).unwrap().kind, CursorKind::DeclStmt);
        assert_eq!(idx.cursors_at(3).len(), 1);
        assert!(idx.cursors_at(99).is_empty());
    }

    #[test]
    fn decl_counts() {
        let idx = build_index(&sample(), false).unwrap();
        assert_eq!(idx.decl_counts.func_kinds.get("FUNCTION_DECL"), Some(&1));
        assert_eq!(idx.decl_counts.var_kinds.get("VAR_DECL"), Some(&1));
        assert_eq!(idx.decl_counts.var_types.get("int"), Some(&1));
        assert!(idx.decl_counts.type_kinds.is_empty());
    }

    #[test]
    fn only_direct_includes_by_basename() {
        let idx = build_index(&sample(), false).unwrap();
        assert_eq!(idx.includes, vec!["stdc++"]);
    }

    #[test]
    fn unresolved_using_directive() {
        let mut b = TranslationUnitBuilder::new("code.cpp");
        let root = b.root();
        b.add_child(root, cursor(CursorKind::UsingDirective, "nope", 1, 0, 10)).unwrap();
        let idx = build_index(&b.finish(), false).unwrap();
        assert_eq!(idx.aliases.using_directives, vec![UNKNOWN_NAMESPACE]);
    }

    #[test]
    fn macro_events_only_when_tracked() {
        let mut b = TranslationUnitBuilder::new("code.cpp");
        let root = b.root();
        b.add_child(root, cursor(CursorKind::PreprocessingDirective, "define", 1, 0, 7)).unwrap();
        b.add_child(root, cursor(CursorKind::MacroDefinition, "N", 1, 8, 13)).unwrap();
        b.add_child(root, cursor(CursorKind::MacroInstantiation, "N", 2, 20, 21)).unwrap();
        let tu = b.finish();

        let untracked = build_index(&tu, false).unwrap();
        assert!(untracked.macros.is_empty());
        assert!(untracked.macro_defs.is_empty());

        let tracked = build_index(&tu, true).unwrap();
        let kinds: Vec<_> = tracked.macros.iter().map(|m| m.kind).collect();
        assert_eq!(
            kinds,
            vec![MacroEventKind::PpDirective, MacroEventKind::MacroDef, MacroEventKind::MacroUse]
        );
        assert!(tracked.macro_defs.contains("N"));
        assert!(tracked.macro_uses.contains("N"));
    }

    #[rstest]
    #[case("bits/stdc++.h", "stdc++")]
    #[case("iostream", "iostream")]
    #[case("my/dir/util.hpp", "util")]
    fn basenames(#[case] header: &str, #[case] expected: &str) {
        assert_eq!(header_basename(header), expected);
    }
}
