//! Arena model of a parsed translation unit.
//!
//! Cursors live in one `Vec` and point at each other through [`CursorId`]
//! indices: children, the referenced declaration, and (in the index) parents.
//! Nothing holds a borrow into another cursor, so the whole unit can be
//! built incrementally and dropped in one go.

mod kind;

pub use kind::{CursorKind, TypeKind};

use std::fmt;

use crate::error::ParserError;

/// Name of the pseudo-file external declarations (standard library entities
/// resolved by name) are attributed to.
pub const EXTERNAL_FILE: &str = "<external>";

/// Stable handle of a cursor inside one [`TranslationUnit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CursorId(u32);

impl CursorId {
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CursorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A point in the main file. `line` and `column` are 1-based, `offset` is a byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
    pub offset: usize,
}

/// Half-open byte span `[start, end)` with line information on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceRange {
    pub start: Position,
    pub end: Position,
}

impl SourceRange {
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Byte length of the span.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub const fn covers_line(&self, line: u32) -> bool {
        self.start.line <= line && line <= self.end.line
    }

    #[must_use]
    pub const fn contains_offset(&self, offset: usize) -> bool {
        self.start.offset <= offset && offset < self.end.offset
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TypeInfo {
    pub kind: TypeKind,
    pub spelling: String,
}

impl TypeInfo {
    #[must_use]
    pub fn new(kind: TypeKind, spelling: impl Into<String>) -> Self {
        Self {
            kind,
            spelling: spelling.into(),
        }
    }

    #[must_use]
    pub fn invalid() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.kind.is_valid()
    }
}

/// One AST node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    pub kind: CursorKind,
    pub spelling: String,
    pub display_name: String,
    /// File the cursor was written in. `None` for the translation-unit root.
    pub file: Option<String>,
    /// Anchor point: the declared name for declarations, the operator for operators.
    pub location: Position,
    pub extent: SourceRange,
    pub ty: TypeInfo,
    pub result_type: Option<TypeInfo>,
    /// Underlying type spelling for typedefs and aliases.
    pub underlying_type: Option<String>,
    /// Declaration a reference or expression resolves to.
    pub referenced: Option<CursorId>,
    pub children: Vec<CursorId>,
}

impl Cursor {
    #[must_use]
    pub fn new(kind: CursorKind, spelling: impl Into<String>) -> Self {
        let spelling = spelling.into();
        Self {
            kind,
            display_name: spelling.clone(),
            spelling,
            file: None,
            location: Position::default(),
            extent: SourceRange::default(),
            ty: TypeInfo::invalid(),
            result_type: None,
            underlying_type: None,
            referenced: None,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    #[must_use]
    pub const fn at(mut self, location: Position, extent: SourceRange) -> Self {
        self.location = location;
        self.extent = extent;
        self
    }

    #[must_use]
    pub fn typed(mut self, ty: TypeInfo) -> Self {
        self.ty = ty;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    Keyword,
    Literal,
    Punctuation,
}

/// A lexical token of the main file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub spelling: String,
    pub location: Position,
    /// Most specific cursor whose extent covers the token.
    pub cursor: Option<CursorId>,
}

/// An `#include` seen while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inclusion {
    /// Header as written, without the delimiters (`bits/stdc++.h`).
    pub header: String,
    /// File containing the directive.
    pub source_file: String,
    pub line: u32,
    /// 1 for includes written in the main file, deeper for transitive ones.
    pub depth: u32,
}

/// A parsed translation unit: cursor arena, token stream and inclusion list.
#[derive(Debug, Clone)]
pub struct TranslationUnit {
    main_file: String,
    cursors: Vec<Cursor>,
    tokens: Vec<Token>,
    includes: Vec<Inclusion>,
}

impl TranslationUnit {
    #[must_use]
    pub const fn root(&self) -> CursorId {
        CursorId(0)
    }

    #[must_use]
    pub fn main_file(&self) -> &str {
        &self.main_file
    }

    /// # Errors
    ///
    /// Returns [`ParserError::DanglingCursor`] for an id outside the arena.
    pub fn cursor(&self, id: CursorId) -> Result<&Cursor, ParserError> {
        self.cursors
            .get(id.index())
            .ok_or(ParserError::DanglingCursor(id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cursors.len() <= 1
    }

    pub fn cursors(&self) -> impl Iterator<Item = (CursorId, &Cursor)> {
        self.cursors
            .iter()
            .enumerate()
            .map(|(i, c)| (CursorId(index_to_u32(i)), c))
    }

    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Tokens whose line lies in `[lo, hi]`, in source order.
    #[must_use]
    pub fn tokens_in_lines(&self, lo: u32, hi: u32) -> &[Token] {
        let start = self.tokens.partition_point(|t| t.location.line < lo);
        let end = self.tokens.partition_point(|t| t.location.line <= hi);
        &self.tokens[start..end.max(start)]
    }

    /// Tokens that start inside `range`.
    #[must_use]
    pub fn tokens_in_range(&self, range: &SourceRange) -> &[Token] {
        let start = self
            .tokens
            .partition_point(|t| t.location.offset < range.start.offset);
        let end = self
            .tokens
            .partition_point(|t| t.location.offset < range.end.offset);
        &self.tokens[start..end.max(start)]
    }

    #[must_use]
    pub fn includes(&self) -> &[Inclusion] {
        &self.includes
    }

    #[must_use]
    pub fn is_main_file(&self, cursor: &Cursor) -> bool {
        cursor.file.as_deref() == Some(self.main_file.as_str())
    }

    /// Most specific main-file cursor whose extent contains `offset`.
    #[must_use]
    pub fn deepest_cursor_at(&self, offset: usize) -> Option<CursorId> {
        deepest_cursor_in(&self.cursors, &self.main_file, offset)
    }
}

/// Descend from the root, always into the first main-file child covering `offset`.
fn deepest_cursor_in(cursors: &[Cursor], main_file: &str, offset: usize) -> Option<CursorId> {
    let mut current = cursors.first()?;
    let mut found = None;
    loop {
        let next = current.children.iter().copied().find(|child| {
            cursors.get(child.index()).is_some_and(|c| {
                c.file.as_deref() == Some(main_file) && c.extent.contains_offset(offset)
            })
        });
        match next {
            Some(child) => {
                found = Some(child);
                current = &cursors[child.index()];
            }
            None => return found,
        }
    }
}

fn index_to_u32(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}

/// Incremental construction of a [`TranslationUnit`].
///
/// Providers push cursors parent-first; tokens may be pushed in any order and
/// are sorted on [`finish`](Self::finish).
#[derive(Debug)]
pub struct TranslationUnitBuilder {
    tu: TranslationUnit,
}

impl TranslationUnitBuilder {
    #[must_use]
    pub fn new(main_file: impl Into<String>) -> Self {
        let main_file = main_file.into();
        let root = Cursor::new(CursorKind::TranslationUnit, main_file.clone());
        Self {
            tu: TranslationUnit {
                main_file,
                cursors: vec![root],
                tokens: Vec::new(),
                includes: Vec::new(),
            },
        }
    }

    #[must_use]
    pub const fn root(&self) -> CursorId {
        CursorId(0)
    }

    #[must_use]
    pub fn main_file(&self) -> &str {
        &self.tu.main_file
    }

    /// Append `cursor` as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`ParserError::DanglingCursor`] if `parent` is unknown.
    pub fn add_child(&mut self, parent: CursorId, cursor: Cursor) -> Result<CursorId, ParserError> {
        if parent.index() >= self.tu.cursors.len() {
            return Err(ParserError::DanglingCursor(parent));
        }
        let id = CursorId(index_to_u32(self.tu.cursors.len()));
        self.tu.cursors.push(cursor);
        self.tu.cursors[parent.index()].children.push(id);
        Ok(id)
    }

    #[must_use]
    pub fn get(&self, id: CursorId) -> Option<&Cursor> {
        self.tu.cursors.get(id.index())
    }

    pub fn get_mut(&mut self, id: CursorId) -> Option<&mut Cursor> {
        self.tu.cursors.get_mut(id.index())
    }

    #[must_use]
    pub fn deepest_cursor_at(&self, offset: usize) -> Option<CursorId> {
        deepest_cursor_in(&self.tu.cursors, &self.tu.main_file, offset)
    }

    pub fn set_root_extent(&mut self, extent: SourceRange) {
        self.tu.cursors[0].extent = extent;
    }

    pub fn push_token(&mut self, token: Token) {
        self.tu.tokens.push(token);
    }

    pub fn push_include(&mut self, inclusion: Inclusion) {
        self.tu.includes.push(inclusion);
    }

    #[must_use]
    pub fn finish(mut self) -> TranslationUnit {
        self.tu.tokens.sort_by_key(|t| t.location.offset);
        self.tu
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pos(line: u32, column: u32, offset: usize) -> Position {
        Position {
            line,
            column,
            offset,
        }
    }

    #[test]
    fn builder_links_children_in_order() {
        let mut b = TranslationUnitBuilder::new("code.cpp");
        let root = b.root();
        let f = b
            .add_child(root, Cursor::new(CursorKind::FunctionDecl, "main").in_file("code.cpp"))
            .unwrap();
        let v = b
            .add_child(f, Cursor::new(CursorKind::VarDecl, "x").in_file("code.cpp"))
            .unwrap();
        let tu = b.finish();
        assert_eq!(tu.cursor(root).unwrap().children, vec![f]);
        assert_eq!(tu.cursor(f).unwrap().children, vec![v]);
        assert_eq!(tu.len(), 3);
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let mut b = TranslationUnitBuilder::new("code.cpp");
        let err = b
            .add_child(CursorId(7), Cursor::new(CursorKind::VarDecl, "x"))
            .unwrap_err();
        assert!(matches!(err, ParserError::DanglingCursor(CursorId(7))));
    }

    #[test]
    fn tokens_are_sorted_and_windowed() {
        let mut b = TranslationUnitBuilder::new("code.cpp");
        for (line, offset, text) in [(3, 20, "c"), (1, 0, "a"), (2, 10, "b")] {
            b.push_token(Token {
                kind: TokenKind::Identifier,
                spelling: text.into(),
                location: pos(line, 1, offset),
                cursor: None,
            });
        }
        let tu = b.finish();
        let spellings: Vec<_> = tu
            .tokens_in_lines(2, 3)
            .iter()
            .map(|t| t.spelling.as_str())
            .collect();
        assert_eq!(spellings, vec!["b", "c"]);
        assert!(tu.tokens_in_lines(5, 9).is_empty());
    }

    #[test]
    fn deepest_cursor_skips_other_files() {
        let mut b = TranslationUnitBuilder::new("code.cpp");
        let root = b.root();
        let extent = SourceRange::new(pos(1, 1, 0), pos(1, 11, 10));
        b.add_child(
            root,
            Cursor::new(CursorKind::VarDecl, "ext").in_file("iostream").at(pos(1, 1, 0), extent),
        )
        .unwrap();
        let var = b
            .add_child(
                root,
                Cursor::new(CursorKind::VarDecl, "x").in_file("code.cpp").at(pos(1, 5, 4), extent),
            )
            .unwrap();
        let lit_extent = SourceRange::new(pos(1, 9, 8), pos(1, 10, 9));
        let lit = b
            .add_child(
                var,
                Cursor::new(CursorKind::IntegerLiteral, "").in_file("code.cpp").at(lit_extent.start, lit_extent),
            )
            .unwrap();
        let tu = b.finish();
        assert_eq!(tu.deepest_cursor_at(4), Some(var));
        assert_eq!(tu.deepest_cursor_at(8), Some(lit));
        assert_eq!(tu.deepest_cursor_at(40), None);
    }
}
