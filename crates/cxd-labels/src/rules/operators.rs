//! Operators applied to operands that do not support them (C2676, C2678, C2679).

use std::sync::LazyLock;

use cxd_core::enums::FixCategory;
use regex::Regex;

use crate::details::fields::{operator_and_operand, operator_head, quoted_fragments};
use crate::details::literals::strip_literals;
use crate::details::operators::{
    ARITH_OPS, BITWISE_LOGIC_OPS, CMP_OPS, INCREMENT_OPS, ITER_WRONG_ARITH_OPS, MUTATING_OPS,
    OPS_SET, ORDERING_OPS, STREAM_PRECEDENCE_OPS, Stream, focus_lines_by_op, has_lone_angle,
    has_shift_before_op, is_one_of,
};
use crate::details::types::{
    ARRAY_TYPE, CHARLIKE, COMPLEX_TYPE, CONST_CHAR_ARRAY, CONST_QUALIFIER, INDEXABLE_STL,
    ISTREAM_TYPE, ITERATOR_TYPE, NON_INDEXABLE_STL, OSTREAM_TYPE, OVERLOADED_FUNCTION, PAIR_TYPE,
    PTR_OR_ARRAY, STL_CONTAINER, STRING_TYPE, VOID_TYPE, best_type_candidate, matches_any,
    outer_type, split_outer_and_qualifiers,
};
use crate::input::LabelInput;

/// Operand type does not define the operator.
pub const C2676: &str = "C2676";
/// No operator takes a left operand of the reported type.
pub const C2678: &str = "C2678";
/// No operator takes a right operand of the reported type.
pub const C2679: &str = "C2679";

const STRING_OPERATOR_MISUSE: &[&str] = &[
    "<<", ">>", "==", "!=", "<", ">", "<=", ">=", "+=", "-=", ">>=", "<<=",
];

static EOF_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|[^\w])EOF(?:[^\w]|$)").expect("valid EOF regex"));

static EOF_STRING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)"\s*EOF\s*""#).expect("valid EOF literal regex"));

/// Right-hand sides that make `cin >> x == ...` a comparison of the stream itself.
static STREAM_CONSTANT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:EOF|nullptr|NULL|true|false|0(?:x0+)?[uUlL]{0,3}|\d+[uUlL]{0,3})\b")
        .expect("valid stream constant regex")
});

/// Calls and comparisons that turn a string into a truth value.
static BOOLISH_STRING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.empty\s*\(|\.size\s*\(|\.length\s*\(|==|!=|<=|>=|\bcompare\s*\(|\bfind\s*\(")
        .expect("valid boolish string regex")
});

static BOOL_OPERAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"==|!=|<=|>=|\b[A-Za-z_]\w*\b|\(").expect("valid bool operand regex")
});

static MULTICHAR_SUBSCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\s*(?:u8|u|U|L)?'(?:\\.|[^'\\]){2,}'\s*\]").expect("valid multichar regex")
});

static SHIFT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<<|>>").expect("valid shift regex"));

fn rest_after<'t>(text: &'t str, op: &str) -> &'t str {
    text.split_once(op).map_or("", |(_, rest)| rest)
}

/// The operator is used on a type that lacks it: iterator arithmetic, ordering
/// of `std::complex`, indexing a `std::set` and similar.
#[must_use]
pub fn c2676_fix_expr_for_operator(input: &LabelInput) -> Option<FixCategory> {
    if !input.is(C2676) {
        return None;
    }
    let text = input.text.as_str();
    let quoted = quoted_fragments(text);
    let op = operator_head(text)
        .or_else(|| quoted.first().copied().filter(|q| OPS_SET.contains(q)))?;

    let first_type = best_type_candidate(&quoted, Some(op));
    let outer = outer_type(first_type);
    let all = [outer, first_type, text];

    let is_ostream = OSTREAM_TYPE.is_match(text) || OSTREAM_TYPE.is_match(first_type);
    let is_istream = ISTREAM_TYPE.is_match(text) || ISTREAM_TYPE.is_match(first_type);
    if is_ostream && is_one_of(op, &["<", ">", ">>", ">>=", "<<="]) {
        return None;
    }
    if is_istream && is_one_of(op, &["<", ">", "<<", ">>=", "<<="]) {
        return None;
    }

    if matches_any(&ITERATOR_TYPE, &all)
        && (is_one_of(op, ORDERING_OPS) || is_one_of(op, ITER_WRONG_ARITH_OPS))
    {
        return Some(FixCategory::FixExprForOperator);
    }
    if matches_any(&COMPLEX_TYPE, &all) && (is_one_of(op, ARITH_OPS) || is_one_of(op, INCREMENT_OPS)) {
        return Some(FixCategory::FixExprForOperator);
    }

    let is_string = matches!(outer, "std::string" | "std::basic_string") || STRING_TYPE.is_match(outer);
    if is_string && is_one_of(op, STRING_OPERATOR_MISUSE) {
        return Some(FixCategory::FixExprForOperator);
    }
    if PAIR_TYPE.is_match(outer) && is_one_of(op, CMP_OPS) {
        return Some(FixCategory::FixExprForOperator);
    }

    if op == "[" {
        if matches_any(&NON_INDEXABLE_STL, &all) {
            return Some(FixCategory::FixExprForOperator);
        }
        if matches_any(&STL_CONTAINER, &all) && !matches_any(&INDEXABLE_STL, &all) {
            return Some(FixCategory::FixExprForOperator);
        }
    }

    if is_one_of(op, ARITH_OPS) && matches_any(&STL_CONTAINER, &all) {
        return Some(FixCategory::FixExprForOperator);
    }

    // a user type without the operator overloaded
    let user_type = !outer.is_empty() && !STL_CONTAINER.is_match(outer) && !is_ostream && !is_istream;
    let overloadable = is_one_of(op, ARITH_OPS)
        || is_one_of(op, CMP_OPS)
        || is_one_of(op, INCREMENT_OPS)
        || is_one_of(op, BITWISE_LOGIC_OPS);
    (user_type && overloadable).then_some(FixCategory::FixExprForOperator)
}

/// The left operand is wrong: assigning through `const`, ordering
/// `std::complex`, a string used as a condition, or a stream expression
/// swallowed by operator precedence.
#[must_use]
pub fn c2678_fix_left_operand(input: &LabelInput) -> Option<FixCategory> {
    if !input.is(C2678) {
        return None;
    }
    let text = input.text.as_str();
    let (op, lhs_raw) = operator_and_operand(text, C2678)?;
    let (lhs_outer, qualifiers) = split_outer_and_qualifiers(lhs_raw);
    let all = [lhs_outer, lhs_raw, text];

    let is_ostream = OSTREAM_TYPE.is_match(lhs_outer);
    let is_istream = ISTREAM_TYPE.is_match(lhs_outer);
    if is_ostream && is_one_of(op, &["<", ">", ">>"]) {
        return None;
    }
    if is_istream && is_one_of(op, &["<", ">", "<<"]) {
        return None;
    }

    if qualifiers.contains("const") && is_one_of(op, MUTATING_OPS) {
        return Some(FixCategory::FixLeftOperand);
    }
    if matches_any(&COMPLEX_TYPE, &all) && is_one_of(op, ORDERING_OPS) {
        return Some(FixCategory::FixLeftOperand);
    }

    let window = input.window(2)?;
    let focus: Vec<&str> = window.iter().copied().filter(|line| line.contains(op)).collect();
    let window_text = if focus.is_empty() { window.join("\n") } else { focus.join("\n") };

    if matches_any(&STRING_TYPE, &all) && is_one_of(op, &["&&", "||"]) {
        let stripped = strip_literals(&window_text);
        let unshifted = SHIFT.replace_all(&stripped, " ");
        if !BOOLISH_STRING.is_match(&unshifted) && !has_lone_angle(&unshifted) {
            return Some(FixCategory::FixLeftOperand);
        }
    }

    if is_ostream
        && is_one_of(op, STREAM_PRECEDENCE_OPS)
        && has_shift_before_op(&window_text, Stream::Output, op)
    {
        return Some(FixCategory::FixLeftOperand);
    }

    if is_istream {
        let shifted = || has_shift_before_op(&window_text, Stream::Input, op);
        if is_one_of(op, &["==", "!="]) {
            let stripped = strip_literals(&window_text);
            let eof_like = EOF_WORD.is_match(&stripped) || EOF_STRING.is_match(&window_text);
            let constant_like = STREAM_CONSTANT.is_match(rest_after(&stripped, op));
            if (eof_like || constant_like) && shifted() {
                return Some(FixCategory::FixLeftOperand);
            }
        }
        if is_one_of(op, &["&&", "||"]) && shifted() {
            return Some(FixCategory::FixLeftOperand);
        }
        if is_one_of(op, &["&", "|"]) && shifted() {
            let rhs = rest_after(&window_text, op);
            if BOOL_OPERAND.is_match(rhs) || has_lone_angle(rhs) {
                return Some(FixCategory::FixLeftOperand);
            }
        }
    }

    None
}

/// The right operand is wrong: `void`, an unresolved overload, something
/// `cin` cannot read into, a container `cout` cannot print, or pointer
/// arithmetic with a non-pointer.
#[must_use]
pub fn c2679_fix_right_operand(input: &LabelInput) -> Option<FixCategory> {
    if !input.is(C2679) {
        return None;
    }
    let text = input.text.as_str();
    let (op, rhs) = operator_and_operand(text, C2679)?;
    let charlike = CHARLIKE.is_match(rhs);
    let container = STL_CONTAINER.is_match(rhs) || STL_CONTAINER.is_match(text);

    if VOID_TYPE.is_match(rhs) {
        return Some(FixCategory::FixRightOperand);
    }
    if is_one_of(op, &["<<", ">>"]) && OVERLOADED_FUNCTION.is_match(rhs) {
        return Some(FixCategory::FixRightOperand);
    }

    let fires = match op {
        ">>" => {
            CONST_CHAR_ARRAY.is_match(rhs)
                || CONST_QUALIFIER.is_match(rhs)
                || (ARRAY_TYPE.is_match(rhs) && !charlike)
                || (rhs.contains('*') && !charlike)
                || container
        }
        "<<" => ITERATOR_TYPE.is_match(rhs) || PAIR_TYPE.is_match(rhs) || container,
        "[" => input.window(2).is_some_and(|window| {
            let focus = focus_lines_by_op(&window, op);
            let window_text = if focus.is_empty() { window.join("\n") } else { focus.join("\n") };
            MULTICHAR_SUBSCRIPT.is_match(&window_text)
        }),
        "=" => STL_CONTAINER.is_match(rhs),
        _ if is_one_of(op, ARITH_OPS) => {
            (PTR_OR_ARRAY.is_match(rhs) && !charlike)
                || ITERATOR_TYPE.is_match(rhs)
                || PAIR_TYPE.is_match(rhs)
        }
        _ => false,
    };
    fires.then_some(FixCategory::FixRightOperand)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn c2676(message: &str) -> LabelInput {
        LabelInput::new(C2676, message, "", None)
    }

    #[rstest]
    #[case("C2676: бинарный \"<\": \"std::_List_iterator<std::_List_val<int>>\" не определяет этот оператор")]
    #[case("C2676: бинарный \"+\": \"std::complex<double>\" не определяет этот оператор")]
    #[case("C2676: бинарный \"[\": \"std::set<int,std::less<int>>\" не определяет этот оператор")]
    #[case("C2676: binary '==': 'Point' does not define this operator or a conversion")]
    fn operator_missing_on_type(#[case] message: &str) {
        assert_eq!(
            c2676_fix_expr_for_operator(&c2676(message)),
            Some(FixCategory::FixExprForOperator)
        );
    }

    #[test]
    fn stream_in_wrong_direction_abstains() {
        let message = "C2676: бинарный \">>\": \"std::ostream\" не определяет этот оператор";
        assert_eq!(c2676_fix_expr_for_operator(&c2676(message)), None);
    }

    #[test]
    fn indexable_container_subscript_abstains() {
        let message = "C2676: бинарный \"[\": \"std::vector<int>\" не определяет этот оператор";
        assert_eq!(c2676_fix_expr_for_operator(&c2676(message)), None);
    }

    fn c2678(op: &str, lhs: &str, source: &str, line: u32) -> LabelInput {
        LabelInput::new(
            C2678,
            format!(
                "C2678: бинарный \"{op}\": не найден оператор, принимающий левый операнд типа \"{lhs}\" (или приемлемое преобразование отсутствует)"
            ),
            source,
            Some(line),
        )
    }

    #[test]
    fn assignment_through_const() {
        let input = c2678("=", "const std::string", "", 1);
        assert_eq!(c2678_fix_left_operand(&input), Some(FixCategory::FixLeftOperand));
    }

    #[test]
    fn output_precedence_slip() {
        let src = "int main() {\n    cout << a == b;\n}";
        let input = c2678("==", "std::basic_ostream<char,std::char_traits<char>>", src, 2);
        assert_eq!(c2678_fix_left_operand(&input), Some(FixCategory::FixLeftOperand));
    }

    #[test]
    fn input_compared_with_eof() {
        let src = "int main() {\n    while (cin >> x != EOF) {}\n}";
        let input = c2678("!=", "std::basic_istream<char,std::char_traits<char>>", src, 2);
        assert_eq!(c2678_fix_left_operand(&input), Some(FixCategory::FixLeftOperand));
    }

    #[test]
    fn string_used_as_condition() {
        let src = "int main() {\n    if (s && ok) {}\n}";
        let input = c2678("&&", "std::string", src, 2);
        assert_eq!(c2678_fix_left_operand(&input), Some(FixCategory::FixLeftOperand));
    }

    #[test]
    fn string_checked_with_empty_abstains() {
        let src = "int main() {\n    if (s && s.empty()) {}\n}";
        let input = c2678("&&", "std::string", src, 2);
        assert_eq!(c2678_fix_left_operand(&input), None);
    }

    fn c2679(op: &str, rhs: &str, source: &str) -> LabelInput {
        LabelInput::new(
            C2679,
            format!(
                "C2679: бинарный \"{op}\": не найден оператор, принимающий правый операнд типа \"{rhs}\" (или приемлемое преобразование отсутствует)"
            ),
            source,
            Some(2),
        )
    }

    #[rstest]
    #[case("<<", "void")]
    #[case(">>", "const char [6]")]
    #[case(">>", "std::vector<int,std::allocator<int>>")]
    #[case("<<", "std::pair<int,int>")]
    #[case("+", "int *")]
    fn wrong_right_operand(#[case] op: &str, #[case] rhs: &str) {
        let input = c2679(op, rhs, "int main() {\n    f();\n}");
        assert_eq!(c2679_fix_right_operand(&input), Some(FixCategory::FixRightOperand));
    }

    #[test]
    fn multichar_subscript() {
        let input = c2679("[", "int", "int main() {\n    m['ab'] = 1;\n}");
        assert_eq!(c2679_fix_right_operand(&input), Some(FixCategory::FixRightOperand));
    }

    #[test]
    fn reading_into_char_pointer_abstains() {
        let input = c2679(">>", "char *", "int main() {\n    cin >> p;\n}");
        assert_eq!(c2679_fix_right_operand(&input), None);
    }
}
