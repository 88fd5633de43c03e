//! Missing separators and operators (C2146).

use cxd_core::enums::FixCategory;

use crate::details::fields::identifier_before;
use crate::details::shapes::{
    adjacent_declarators, for_header_missing_semicolon, missing_operator_in_condition,
    missing_separator_in_call_args, stream_missing_shift,
};
use crate::details::source::focus_line;
use crate::input::LabelInput;

/// Syntax error: missing token before identifier.
pub const C2146: &str = "C2146";

/// The line around the reported identifier is missing a `<<`, a `;` in a
/// `for` header, a comma between arguments or declarators, or an operator in
/// a condition.
#[must_use]
pub fn c2146_incorrect_construction_or_symbols(input: &LabelInput) -> Option<FixCategory> {
    if !input.is(C2146) {
        return None;
    }
    let ident = identifier_before(&input.text)?;
    let window = input.window(1)?;
    let line = focus_line(&window, Some(ident));

    let broken = stream_missing_shift(line)
        || for_header_missing_semicolon(line)
        || missing_separator_in_call_args(line, ident)
        || missing_operator_in_condition(line, ident)
        || adjacent_declarators(line, ident);
    broken.then_some(FixCategory::IncorrectConstructionOrSymbols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn c2146(ident: &str, statement: &str) -> LabelInput {
        LabelInput::new(
            C2146,
            format!("C2146: синтаксическая ошибка: отсутствие \";\" перед идентификатором \"{ident}\""),
            &format!("int main() {{\n    {statement}\n}}"),
            Some(2),
        )
    }

    #[rstest]
    #[case("b", "cin >> a b;")]
    #[case("i", "for (int i = 0 i < n; i++) {}")]
    #[case("n", "printf(\"%d\" n);")]
    #[case("y", "if (x y) {}")]
    #[case("b", "int a b;")]
    fn broken_constructions(#[case] ident: &str, #[case] statement: &str) {
        assert_eq!(
            c2146_incorrect_construction_or_symbols(&c2146(ident, statement)),
            Some(FixCategory::IncorrectConstructionOrSymbols)
        );
    }

    #[test]
    fn well_formed_line_abstains() {
        assert_eq!(c2146_incorrect_construction_or_symbols(&c2146("b", "int b = 0;")), None);
    }

    #[test]
    fn english_message() {
        let input = LabelInput::new(
            C2146,
            "C2146: syntax error: missing ';' before identifier 'b'",
            "int a b;",
            Some(1),
        );
        assert_eq!(
            c2146_incorrect_construction_or_symbols(&input),
            Some(FixCategory::IncorrectConstructionOrSymbols)
        );
    }
}
