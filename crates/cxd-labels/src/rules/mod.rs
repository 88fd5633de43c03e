//! Label functions, one module per family of diagnostics.
//!
//! Every rule re-checks the diagnostic code it belongs to, so calling one
//! directly with a foreign diagnostic abstains instead of misfiring.

pub mod casts;
pub mod construction;
pub mod names;
pub mod operators;

use cxd_core::enums::FixCategory;

use crate::input::LabelInput;

/// A label function: a category, or `None` to abstain.
pub type RuleFn = fn(&LabelInput) -> Option<FixCategory>;

#[derive(Debug, Clone, Copy)]
pub struct LabelRule {
    /// Stable name, `<code>_<category>` in lowercase.
    pub name: &'static str,
    /// Diagnostic code of the family this rule belongs to.
    pub code: &'static str,
    pub apply: RuleFn,
}

impl LabelRule {
    #[must_use]
    pub fn apply(&self, input: &LabelInput) -> Option<FixCategory> {
        (self.apply)(input)
    }
}

/// The full battery in evaluation order. Within a code, earlier rules win.
pub const STANDARD_RULES: &[LabelRule] = &[
    LabelRule {
        name: "c2065_header_or_std_namespace",
        code: names::C2065,
        apply: names::c2065_header_or_std_namespace,
    },
    LabelRule {
        name: "c2065_fix_name_spelling",
        code: names::C2065,
        apply: names::c2065_fix_name_spelling,
    },
    LabelRule {
        name: "c3861_header_or_std_namespace",
        code: names::C3861,
        apply: names::c3861_header_or_std_namespace,
    },
    LabelRule {
        name: "c3861_fix_name_spelling",
        code: names::C3861,
        apply: names::c3861_fix_name_spelling,
    },
    LabelRule {
        name: "c2146_incorrect_construction_or_symbols",
        code: construction::C2146,
        apply: construction::c2146_incorrect_construction_or_symbols,
    },
    LabelRule {
        name: "c2440_fix_cast",
        code: casts::C2440,
        apply: casts::c2440_fix_cast,
    },
    LabelRule {
        name: "c2446_fix_pointers_for_cast",
        code: casts::C2446,
        apply: casts::c2446_fix_pointers_for_cast,
    },
    LabelRule {
        name: "c2676_fix_expr_for_operator",
        code: operators::C2676,
        apply: operators::c2676_fix_expr_for_operator,
    },
    LabelRule {
        name: "c2678_fix_left_operand",
        code: operators::C2678,
        apply: operators::c2678_fix_left_operand,
    },
    LabelRule {
        name: "c2679_fix_right_operand",
        code: operators::C2679,
        apply: operators::c2679_fix_right_operand,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn rule_names_are_unique_and_prefixed_by_code() {
        let mut seen = HashSet::new();
        for rule in STANDARD_RULES {
            assert!(seen.insert(rule.name), "duplicate rule {}", rule.name);
            assert!(
                rule.name.starts_with(&rule.code.to_lowercase()),
                "{} does not start with {}",
                rule.name,
                rule.code
            );
        }
    }

    #[test]
    fn every_rule_abstains_on_foreign_code() {
        let input = LabelInput::new("C9999", "C9999: cout: something", "cout << 1;", Some(1));
        for rule in STANDARD_RULES {
            assert_eq!(rule.apply(&input), None, "{} fired", rule.name);
        }
    }
}
