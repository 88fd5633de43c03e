//! Raw C++ tokenizer for the main file.
//!
//! Produces the same token granularity a compiler front end reports: comments
//! and whitespace vanish, `#include` becomes `#` + `include`, and header names
//! inside `<...>` are lexed as ordinary tokens.

use std::collections::HashSet;
use std::sync::LazyLock;

use crate::ast::{Position, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawToken {
    pub kind: TokenKind,
    pub spelling: String,
    pub offset: usize,
}

pub(crate) static CPP_KEYWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool",
        "break", "case", "catch", "char", "char8_t", "char16_t", "char32_t", "class",
        "compl", "concept", "const", "consteval", "constexpr", "constinit", "const_cast",
        "continue", "co_await", "co_return", "co_yield", "decltype", "default", "delete",
        "do", "double", "dynamic_cast", "else", "enum", "explicit", "export", "extern",
        "false", "float", "for", "friend", "goto", "if", "inline", "int", "long", "mutable",
        "namespace", "new", "noexcept", "not", "not_eq", "nullptr", "operator", "or",
        "or_eq", "private", "protected", "public", "register", "reinterpret_cast",
        "requires", "return", "short", "signed", "sizeof", "static", "static_assert",
        "static_cast", "struct", "switch", "template", "this", "thread_local", "throw",
        "true", "try", "typedef", "typeid", "typename", "union", "unsigned", "using",
        "virtual", "void", "volatile", "wchar_t", "while", "xor", "xor_eq",
    ]
    .into_iter()
    .collect()
});

/// Punctuators, longest first so greedy matching picks `>>=` over `>>`.
const PUNCTUATORS: &[&str] = &[
    "...", "<<=", ">>=", "->*", "<=>", "::", "->", "++", "--", "<<", ">>", "<=", ">=",
    "==", "!=", "&&", "||", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "##", ".*",
];

/// Maps byte offsets to 1-based line/column positions.
#[derive(Debug, Clone)]
pub(crate) struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { line_starts }
    }

    pub fn position(&self, offset: usize) -> Position {
        let line_idx = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let line_start = self.line_starts.get(line_idx).copied().unwrap_or_default();
        Position {
            line: to_u32(line_idx + 1),
            column: to_u32(offset - line_start + 1),
            offset,
        }
    }
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

const fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic() || !c.is_ascii()
}

const fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric() || !c.is_ascii()
}

/// Tokenize `source`. Never fails; unknown characters become single-character
/// punctuation.
pub(crate) fn lex(source: &str) -> Vec<RawToken> {
    let mut lexer = Lexer {
        src: source,
        pos: 0,
        tokens: Vec::new(),
    };
    lexer.run();
    lexer.tokens
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    tokens: Vec<RawToken>,
}

impl Lexer<'_> {
    fn rest(&self) -> &str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump_while(&mut self, pred: impl Fn(char) -> bool) {
        let len: usize = self
            .rest()
            .chars()
            .take_while(|&c| pred(c))
            .map(char::len_utf8)
            .sum();
        self.pos += len;
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        self.tokens.push(RawToken {
            kind,
            spelling: self.src[start..self.pos].to_string(),
            offset: start,
        });
    }

    fn run(&mut self) {
        while let Some(c) = self.peek() {
            let start = self.pos;
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else if c == '\\' && matches!(self.peek_at(1), Some('\n' | '\r')) {
                self.pos += 1;
            } else if self.rest().starts_with("//") {
                self.bump_while(|c| c != '\n');
            } else if self.rest().starts_with("/*") {
                self.pos = self.rest()[2..]
                    .find("*/")
                    .map_or(self.src.len(), |end| self.pos + 2 + end + 2);
            } else if self.raw_string_prefix_len().is_some() {
                self.lex_raw_string();
                self.push(TokenKind::Literal, start);
            } else if let Some(prefix) = self.quote_prefix_len() {
                self.pos += prefix;
                self.lex_quoted();
                self.push(TokenKind::Literal, start);
            } else if c.is_ascii_digit() || (c == '.' && self.peek_at(1).is_some_and(|d| d.is_ascii_digit())) {
                self.lex_number();
                self.push(TokenKind::Literal, start);
            } else if is_ident_start(c) {
                self.bump_while(is_ident_continue);
                let kind = if CPP_KEYWORDS.contains(&self.src[start..self.pos]) {
                    TokenKind::Keyword
                } else {
                    TokenKind::Identifier
                };
                self.push(kind, start);
            } else {
                let len = PUNCTUATORS
                    .iter()
                    .find(|p| self.rest().starts_with(**p))
                    .map_or(c.len_utf8(), |p| p.len());
                self.pos += len;
                self.push(TokenKind::Punctuation, start);
            }
        }
    }

    /// Length of an encoding prefix (`L`, `u8`, `u`, `U`) directly followed by a quote.
    fn quote_prefix_len(&self) -> Option<usize> {
        let rest = self.rest();
        ["u8", "L", "u", "U", ""]
            .into_iter()
            .find(|p| {
                rest.starts_with(p)
                    && matches!(rest[p.len()..].chars().next(), Some('"' | '\''))
            })
            .map(str::len)
    }

    fn raw_string_prefix_len(&self) -> Option<usize> {
        let rest = self.rest();
        ["u8R\"", "LR\"", "uR\"", "UR\"", "R\""]
            .into_iter()
            .find(|p| rest.starts_with(p))
            .map(str::len)
    }

    fn lex_raw_string(&mut self) {
        let Some(prefix) = self.raw_string_prefix_len() else {
            return;
        };
        self.pos += prefix;
        let delim_len = self.rest().find('(').unwrap_or(0);
        let closing = format!("){}\"", &self.rest()[..delim_len]);
        self.pos = self
            .rest()
            .find(&closing)
            .map_or(self.src.len(), |end| self.pos + end + closing.len());
    }

    /// Consume a `"..."` or `'...'` literal starting at the opening quote.
    /// Stops at an unescaped newline, like a compiler does for unterminated literals.
    fn lex_quoted(&mut self) {
        let Some(quote) = self.peek() else {
            return;
        };
        self.pos += 1;
        while let Some(c) = self.peek() {
            match c {
                '\\' => {
                    self.pos += 1;
                    if let Some(next) = self.peek() {
                        self.pos += next.len_utf8();
                    }
                }
                '\n' => return,
                _ => {
                    self.pos += c.len_utf8();
                    if c == quote {
                        return;
                    }
                }
            }
        }
    }

    fn lex_number(&mut self) {
        while let Some(c) = self.peek() {
            if matches!(c, 'e' | 'E' | 'p' | 'P') && matches!(self.peek_at(1), Some('+' | '-')) {
                self.pos += 2;
            } else if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '\'' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }
}
