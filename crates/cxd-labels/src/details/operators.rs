//! Operator vocabularies and operator-position scanners.

use std::sync::LazyLock;

use regex::Regex;

use super::literals::strip_literals;

pub const CMP_OPS: &[&str] = &["==", "!=", "<", ">", "<=", ">="];

/// Every operator spelling a C2676 message can quote.
pub const OPS_SET: &[&str] = &[
    "[", "]", "+", "-", "*", "/", "%", "<<", ">>", "<", ">", "<=", ">=", "==", "!=", "&", "|",
    "^", "&&", "||", "+=", "-=", "*=", "/=", "%=", "++", "--",
];

pub const ARITH_OPS: &[&str] = &["+", "-", "*", "/", "%", "+=", "-=", "*=", "/=", "%="];
pub const INCREMENT_OPS: &[&str] = &["++", "--"];
pub const ITER_WRONG_ARITH_OPS: &[&str] = &["+", "-", "*", "/", "%", "+=", "-="];
/// Orderings that iterators of node containers and `std::complex` lack.
pub const ORDERING_OPS: &[&str] = &["<", ">", "<=", ">="];
pub const MUTATING_OPS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "&=", "^=", "|=", "<<=", ">>=", "++", "--",
];
/// Operators that bind tighter than `<<`/`>>` is easy to forget.
pub const STREAM_PRECEDENCE_OPS: &[&str] =
    &["==", "!=", "&", "^", "|", "&&", "||", "<", ">", "<=", ">="];
pub const BITWISE_LOGIC_OPS: &[&str] = &["&", "|", "^", "&&", "||"];

#[must_use]
pub fn is_one_of(op: &str, set: &[&str]) -> bool {
    set.contains(&op)
}

/// Direction of a stream shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    /// `cout << x`
    Output,
    /// `cin >> x`
    Input,
}

static OUTPUT_SHIFT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:std::)?c(?:out|err|log)\b\s*<<").expect("valid output shift regex")
});

static INPUT_SHIFT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:std::)?cin\b\s*>>").expect("valid input shift regex"));

impl Stream {
    const fn shift(self) -> &'static str {
        match self {
            Self::Output => "<<",
            Self::Input => ">>",
        }
    }

    fn head(self) -> &'static Regex {
        match self {
            Self::Output => &OUTPUT_SHIFT,
            Self::Input => &INPUT_SHIFT,
        }
    }
}

fn char_before(text: &str, idx: usize) -> Option<char> {
    text[..idx].chars().next_back()
}

fn char_after(text: &str, idx: usize) -> Option<char> {
    text[idx..].chars().next()
}

/// First `<<` or `>>` of `stream`'s direction that is not part of `<<<`-style
/// runs or a compound assignment.
#[must_use]
pub fn find_shift(text: &str, stream: Stream) -> Option<usize> {
    text.match_indices(stream.shift())
        .map(|(idx, _)| idx)
        .find(|&idx| char_before(text, idx) != Some('<') && char_after(text, idx + 2) != Some('='))
}

/// A lone `<` or `>` used as a comparison, not as half of a shift.
#[must_use]
pub fn has_lone_angle(text: &str) -> bool {
    text.char_indices().any(|(idx, c)| {
        (c == '<' || c == '>')
            && char_before(text, idx) != Some(c)
            && char_after(text, idx + 1) != Some(c)
    })
}

/// Whether `op` occurs in `text` as that operator rather than as part of a
/// longer one (`=` inside `==`, `<<` inside `<<=`).
#[must_use]
pub fn contains_operator(text: &str, op: &str) -> bool {
    let guarded = |before: &[char], after: &[char]| {
        text.match_indices(op).any(|(idx, _)| {
            char_before(text, idx).is_none_or(|c| !before.contains(&c))
                && char_after(text, idx + op.len()).is_none_or(|c| !after.contains(&c))
        })
    };
    match op {
        "=" => guarded(&['=', '!', '<', '>'], &['=']),
        "<<" => guarded(&['<'], &['=', '<']),
        ">>" => guarded(&['>'], &['=', '>']),
        _ => text.contains(op),
    }
}

/// Window lines where `op` appears outside literals.
#[must_use]
pub fn focus_lines_by_op<'s>(window: &[&'s str], op: &str) -> Vec<&'s str> {
    window
        .iter()
        .copied()
        .filter(|line| contains_operator(&strip_literals(line), op))
        .collect()
}

/// Whether a stream shift precedes `op` in the same expression.
///
/// Either the stream head (`cout <<`, `cin >>`) is followed later by `op`, or
/// some bare shift of the same direction sits left of the first `op`.
#[must_use]
pub fn has_shift_before_op(window_text: &str, stream: Stream, op: &str) -> bool {
    let text = strip_literals(window_text);
    if let Some(head) = stream.head().find(&text) {
        if text[head.end()..].contains(op) {
            return true;
        }
    }
    text.find(op)
        .is_some_and(|op_pos| find_shift(&text[..op_pos], stream).is_some())
}
