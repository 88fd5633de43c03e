//! Textual shapes of C++ statements around an identifier.
//!
//! These look at one or a few raw source lines, never at an AST: the source
//! they inspect failed to compile, so a parse of it is the least reliable
//! thing available.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::source::has_word;
use super::vocab::{TYPE_KEYWORDS, is_keyword, is_stream_object, is_type_word};

const ID: &str = r"[A-Za-z_]\w*";
const NUM: &str = r"(?:\d+(?:\.\d*)?|\.\d+)";
const NUM_LIT: &str = r"[-+]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][-+]?\d+)?[uUlLfF]*";
const STR: &str = r#""(?:[^"\\]|\\.)*""#;
const CHR: &str = r"'(?:[^'\\]|\\.)*'";
const STREAM_HEAD: &str = r"(?:std::\s*)?(?:w?cin|w?cout|w?cerr|w?clog)";
const QUAL_TYPE: &str = r"(?:[A-Za-z_]\w*::)*[A-Za-z_]\w*(?:<[^;(){}]*>)?";

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid built-in shape pattern")
}

/// `cin a >> b`: the head is followed by an operand before the first shift.
static STREAM_MISSING_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"\b{STREAM_HEAD}\b\s+(?:{ID}|{NUM_LIT}|{STR}|{CHR})\s*(?:<<|>>)"
    ))
});

/// `cin >> a b`: two operands after a shift with only whitespace between.
static STREAM_MISSING_MID: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(r"\b{STREAM_HEAD}\b[^\n;]*?(?:<<|>>)\s*{ID}\s+{ID}\b"))
});

/// `cout << "=" x`: a literal glued to the next operand.
static STREAM_LITERAL_GLUE: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"\b{STREAM_HEAD}\b[^\n;]*?(?:<<|>>)\s*(?:{STR}|{CHR})\s*({ID})\b"
    ))
});

static LEADING_SHIFT: LazyLock<Regex> = LazyLock::new(|| compile(r"^[ \t]*(?:<<|>>)"));

static FOR_HEADER: LazyLock<Regex> = LazyLock::new(|| compile(r"\bfor\s*\(([^)]*)\)"));

static RANGE_FOR_DECL: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"^\s*(?:(?:const|volatile|constexpr)\s+)*(?:auto|{QUAL_TYPE})(?:\s*[\*&]\s*)*\s*(?:\[[^\]]+\]|{ID})\s*$"
    ))
});

static CALL_ARGS: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"\b({ID})\s*\(([^()]*)\)")));

static CONDITION: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\b(?:if|while|switch)\s*\(([^()]*)\)"));

static LITERAL_GLUE: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"(?:{STR}|{CHR})\s*({ID})")));

static ADJACENT_OPERANDS: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(r"({ID}|{NUM}|{STR}|{CHR}|\]|\))\s+({ID})"))
});

static CONTROL_START: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"^\s*\b(?:if|for|while|switch|return|case|default|else|do)\b")
});

static STREAM_OP: LazyLock<Regex> = LazyLock::new(|| compile(r"<<|>>"));

/// A declaration head: qualifiers, then a builtin or user type, then a
/// declarator name. Group 1 is the type.
static DECL_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    let quals = r"(?:constexpr|const|volatile|static|extern|register|inline|typename)";
    let builtin = r"(?:signed|unsigned)?\s*(?:short|long\s+long|long)?\s*(?:int|char|double|float|bool|void)?";
    let user = r"(?:[A-Za-z_]\w*::)*[A-Za-z_]\w*(?:\s*<[^;{}()]*>)?";
    compile(&format!(
        r"(?:^|[;{{}}(])\s*(?:{quals}\s+)*({builtin}|{user})\s+(?:[\*&]\s*)*[A-Za-z_]\w*"
    ))
});

static DECL_ADJACENT: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(r"(?:^|,)\s*(?:[\*&]\s*)*({ID})[ \t]+({ID})\b"))
});

static DECL_AFTER_INIT: LazyLock<Regex> = LazyLock::new(|| {
    let init = format!(r"(?:{NUM_LIT}|true|false|nullptr|{STR}|{CHR})");
    compile(&format!(r"\b({ID})\s*=\s*{init}[ \t]+({ID})\b"))
});

static DECLARATOR_END: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^\s*(?:=|,|;|\)|\]|\{|\[)"));

static WORD: LazyLock<Regex> = LazyLock::new(|| compile(r"\b[A-Za-z_][A-Za-z0-9_]*\b"));

/// Pattern with `ident` spliced in literally.
fn with_ident(template: &str, ident: &str) -> Option<Regex> {
    Regex::new(&template.replace("IDENT", &regex::escape(ident))).ok()
}

/// `ident` used where a type belongs: `vectr<int> v;`, `strng s`, `map<strng, int>`.
#[must_use]
pub fn is_type_like_context(line: &str, ident: &str) -> bool {
    let declaration = with_ident(
        r"(?:^|[;{}(])\s*(?:(?:constexpr|const)\s+)?(?:[A-Za-z_]\w*::)*IDENT(?:<[^<>]*>)?\s*(?:[\*&]+)?\s+([A-Za-z_]\w*)",
        ident,
    );
    if let Some(caps) = declaration.as_ref().and_then(|re| re.captures(line)) {
        return caps.get(1).is_some_and(|name| !is_keyword(name.as_str()));
    }
    in_template_arguments(line, ident)
}

fn in_template_arguments(line: &str, ident: &str) -> bool {
    line.match_indices('<').any(|(open, _)| {
        let after = &line[open + 1..];
        if after.starts_with(['=', '<']) {
            return false;
        }
        after
            .find('>')
            .is_some_and(|close| has_word(&after[..close], ident))
    })
}

/// `ident` at the start of a statement: `retrun 0;`, `} esle {`.
#[must_use]
pub fn is_control_like_context(line: &str, ident: &str) -> bool {
    with_ident(r"(?:^|[;:{})])\s*IDENT\b", ident).is_some_and(|re| re.is_match(line))
}

/// `ident` at the start of a statement with a parenthesized head: `fro (`.
#[must_use]
pub fn is_loop_like_context(line: &str, ident: &str) -> bool {
    with_ident(r"(?:^|[;:{})])\s*IDENT\s*\(", ident).is_some_and(|re| re.is_match(line))
}

/// A stream expression missing one of its `<<`/`>>`.
#[must_use]
pub fn stream_missing_shift(line: &str) -> bool {
    if STREAM_MISSING_FIRST.is_match(line) || STREAM_MISSING_MID.is_match(line) {
        return true;
    }
    let Some(caps) = STREAM_LITERAL_GLUE.captures(line) else {
        return false;
    };
    // `cout << "*"  cout << x` is a missing `;`, not a missing shift
    let glued = caps.get(1).map_or("", |m| m.as_str());
    let tail = caps.get(0).map_or("", |m| &line[m.end()..]);
    !(is_stream_object(glued) && LEADING_SHIFT.is_match(tail))
}

/// Whether a `for` header body is a range-for (`auto& x : xs`).
#[must_use]
pub fn is_range_for_body(body: &str) -> bool {
    if body.contains(';') {
        return false;
    }
    body.match_indices(':').any(|(idx, _)| {
        let before = body[..idx].chars().next_back();
        let after = body[idx + 1..].chars().next();
        before != Some(':')
            && after != Some(':')
            && !body[idx + 1..].is_empty()
            && RANGE_FOR_DECL.is_match(&body[..idx])
    })
}

/// A classic `for` header with fewer than two `;`.
#[must_use]
pub fn for_header_missing_semicolon(line: &str) -> bool {
    let Some(body) = FOR_HEADER.captures(line).and_then(|c| c.get(1)) else {
        return false;
    };
    let body = body.as_str();
    !is_range_for_body(body) && body.matches(';').count() < 2
}

fn right_is(caps: &Captures<'_>, group: usize, ident: &str) -> bool {
    caps.get(group).is_some_and(|m| m.as_str() == ident)
}

/// `printf("%d" n)`, `f(a b)`: `ident` follows another operand inside call
/// arguments with no separator.
#[must_use]
pub fn missing_separator_in_call_args(line: &str, ident: &str) -> bool {
    CALL_ARGS.captures_iter(line).any(|call| {
        let callee = call.get(1).map_or("", |m| m.as_str());
        if is_keyword(callee) {
            return false;
        }
        let args = call.get(2).map_or("", |m| m.as_str());
        LITERAL_GLUE.captures_iter(args).any(|c| right_is(&c, 1, ident))
            || ADJACENT_OPERANDS.captures_iter(args).any(|c| right_is(&c, 2, ident))
    })
}

/// `if (a b)`, `while (x y && z)`: an operator missing inside a condition.
///
/// A type keyword on the left is accepted as a declaration (`if (int x = f())`).
/// Aliases such as `ll` are not: there the left word is taken as a value.
#[must_use]
pub fn missing_operator_in_condition(line: &str, ident: &str) -> bool {
    let Some(cond) = CONDITION.captures(line).and_then(|c| c.get(1)) else {
        return false;
    };
    let cond = cond.as_str();
    LITERAL_GLUE.captures_iter(cond).any(|c| right_is(&c, 1, ident))
        || ADJACENT_OPERANDS.captures_iter(cond).any(|c| {
            right_is(&c, 2, ident) && c.get(1).is_some_and(|left| !TYPE_KEYWORDS.contains(left.as_str()))
        })
}

/// Whether the type part of a declaration head really names a type.
#[must_use]
pub fn looks_like_declaration_type(type_part: &str) -> bool {
    if type_part.trim().is_empty() {
        return false;
    }
    if type_part.contains("::") || type_part.contains('<') {
        return true;
    }
    WORD.find_iter(type_part).any(|w| is_type_word(w.as_str()))
}

/// `int a b;`, `int x = 0 y;`: two declarators without a comma, on a line
/// that is a declaration and not a control statement or stream expression.
#[must_use]
pub fn adjacent_declarators(line: &str, ident: &str) -> bool {
    if CONTROL_START.is_match(line) || STREAM_OP.is_match(line) {
        return false;
    }
    let Some(ty) = DECL_PREFIX.captures(line).and_then(|c| c.get(1)) else {
        return false;
    };
    if !looks_like_declaration_type(ty.as_str()) {
        return false;
    }
    let rest = &line[ty.end()..];
    if !rest.contains(ident) {
        return false;
    }
    let ends_declarator =
        |caps: &Captures<'_>| caps.get(0).is_some_and(|m| DECLARATOR_END.is_match(&rest[m.end()..]));

    DECL_AFTER_INIT
        .captures_iter(rest)
        .any(|c| right_is(&c, 2, ident) && ends_declarator(&c))
        || DECL_ADJACENT
            .captures_iter(rest)
            .any(|c| right_is(&c, 2, ident) && ends_declarator(&c))
}
