//! Undeclared and unknown identifiers (C2065, C3861).

use cxd_core::enums::FixCategory;

use crate::details::fields::leading_identifier;
use crate::details::shapes::{is_control_like_context, is_loop_like_context, is_type_like_context};
use crate::details::similarity::{CANDIDATE_CUTOFF, best_candidate, closest, is_keyword_typo, is_typo_of_any};
use crate::details::source::{function_candidates, identifier_candidates};
use crate::details::vocab::{
    CONTROL_KEYWORDS, CPP_FUNCTIONS, KNOWN_STD_IDENTIFIERS, LOOP_KEYWORDS, TYPE_KEYWORDS,
};
use crate::input::LabelInput;

/// Undeclared identifier.
pub const C2065: &str = "C2065";
/// Identifier not found (used as a function).
pub const C3861: &str = "C3861";

fn is_plain_identifier(ident: &str) -> bool {
    ident.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_known_std_name(ident: &str) -> bool {
    KNOWN_STD_IDENTIFIERS.contains(ident)
        || KNOWN_STD_IDENTIFIERS.contains(ident.trim_start_matches(['?', '$']))
}

fn header_or_std_namespace(input: &LabelInput, code: &str) -> Option<FixCategory> {
    if !input.is(code) {
        return None;
    }
    let ident = leading_identifier(&input.text)?;
    is_known_std_name(ident).then_some(FixCategory::HeaderOrStdNamespace)
}

/// A well-known standard name used without its header or `std::`.
#[must_use]
pub fn c2065_header_or_std_namespace(input: &LabelInput) -> Option<FixCategory> {
    header_or_std_namespace(input, C2065)
}

#[must_use]
pub fn c3861_header_or_std_namespace(input: &LabelInput) -> Option<FixCategory> {
    header_or_std_namespace(input, C3861)
}

/// A misspelled type keyword, statement keyword or nearby identifier.
#[must_use]
pub fn c2065_fix_name_spelling(input: &LabelInput) -> Option<FixCategory> {
    if !input.is(C2065) {
        return None;
    }
    let ident = leading_identifier(&input.text)?;
    if !is_plain_identifier(ident) {
        return Some(FixCategory::FixNameSpelling);
    }
    if KNOWN_STD_IDENTIFIERS.contains(ident) {
        return None;
    }

    let window = input.window(1)?.join("\n");

    if is_type_like_context(&window, ident) {
        return is_typo_of_any(ident, TYPE_KEYWORDS.iter().copied())
            .then_some(FixCategory::FixNameSpelling);
    }

    if let Some((keyword, score)) = closest(ident, CONTROL_KEYWORDS.iter().copied()) {
        if is_keyword_typo(ident, keyword, score) {
            return is_control_like_context(&window, ident).then_some(FixCategory::FixNameSpelling);
        }
    }

    let mut candidates = identifier_candidates(&input.source, input.line, input.candidate_window);
    candidates.remove(ident);
    best_candidate(ident, &candidates, CANDIDATE_CUTOFF).map(|_| FixCategory::FixNameSpelling)
}

/// A misspelled loop keyword, library function or nearby function name.
#[must_use]
pub fn c3861_fix_name_spelling(input: &LabelInput) -> Option<FixCategory> {
    if !input.is(C3861) {
        return None;
    }
    let ident = leading_identifier(&input.text)?;
    if !is_plain_identifier(ident) {
        return Some(FixCategory::FixNameSpelling);
    }
    if CPP_FUNCTIONS.contains(ident) {
        return None;
    }

    let window = input.window(1)?.join("\n");

    if let Some((keyword, score)) = closest(ident, LOOP_KEYWORDS.iter().copied()) {
        if is_keyword_typo(ident, keyword, score) {
            return is_loop_like_context(&window, ident).then_some(FixCategory::FixNameSpelling);
        }
    }

    if is_typo_of_any(ident, CPP_FUNCTIONS.iter().copied()) {
        return Some(FixCategory::FixNameSpelling);
    }

    let mut candidates = function_candidates(&input.source, input.line, input.candidate_window);
    candidates.remove(ident);
    best_candidate(ident, &candidates, CANDIDATE_CUTOFF).map(|_| FixCategory::FixNameSpelling)
}
