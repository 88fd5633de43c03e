//! Dispatch from a diagnostic code to its label functions.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use cxd_core::enums::FixCategory;
use cxd_core::responses::LabelResult;
use tracing::{debug, trace, warn};

use crate::input::LabelInput;
use crate::rules::{LabelRule, STANDARD_RULES};

static STANDARD: LazyLock<RuleTable> = LazyLock::new(RuleTable::standard);

/// Label functions grouped by diagnostic code, in evaluation order.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    families: BTreeMap<&'static str, Vec<LabelRule>>,
    disabled: BTreeSet<String>,
}

impl RuleTable {
    /// The built-in battery.
    #[must_use]
    pub fn standard() -> Self {
        let mut table = Self::default();
        for rule in STANDARD_RULES {
            table.register(*rule);
        }
        table
    }

    /// Append `rule` to its code's family. Later rules only run when earlier ones abstain.
    pub fn register(&mut self, rule: LabelRule) {
        self.families.entry(rule.code).or_default().push(rule);
    }

    /// Skip the named rules. Unknown names are logged and ignored.
    #[must_use]
    pub fn with_disabled<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if !self.rule_names().any(|known| known == name) {
                warn!(rule = %name, "ignoring unknown label rule in disabled list");
                continue;
            }
            self.disabled.insert(name);
        }
        self
    }

    /// Codes with at least one registered rule.
    pub fn codes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.families.keys().copied()
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.families.values().flatten().map(|rule| rule.name)
    }

    #[must_use]
    pub fn rules_for(&self, code: &str) -> &[LabelRule] {
        self.families.get(code).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn is_disabled(&self, name: &str) -> bool {
        self.disabled.contains(name)
    }

    /// First non-abstaining rule of the input's family, with its name.
    #[must_use]
    pub fn classify_detailed(&self, input: &LabelInput) -> LabelResult {
        let rules = self.rules_for(&input.code);
        if rules.is_empty() {
            trace!(code = %input.code, "no label rules for code");
            return LabelResult::abstain();
        }
        for rule in rules.iter().filter(|rule| !self.is_disabled(rule.name)) {
            if let Some(category) = rule.apply(input) {
                debug!(code = %input.code, rule = rule.name, category = %category, "label rule fired");
                return LabelResult {
                    category: Some(category),
                    rule: Some(rule.name.to_string()),
                };
            }
        }
        debug!(code = %input.code, "all label rules abstained");
        LabelResult::abstain()
    }

    #[must_use]
    pub fn classify(&self, input: &LabelInput) -> Option<FixCategory> {
        self.classify_detailed(input).category
    }
}

/// Label one diagnostic with the built-in rules.
///
/// `source` may carry literal `\n` escapes; `line` is 1-based. Returns `None`
/// when the code is unknown or every rule for it abstains.
#[must_use]
pub fn classify(code: &str, text: &str, source: &str, line: Option<u32>) -> Option<FixCategory> {
    STANDARD.classify(&LabelInput::new(code, text, source, line))
}

/// [`classify`] for a prepared input, reporting which rule fired.
#[must_use]
pub fn classify_detailed(input: &LabelInput) -> LabelResult {
    STANDARD.classify_detailed(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn standard_table_covers_every_family() {
        let codes: Vec<_> = RuleTable::standard().codes().collect();
        assert_eq!(
            codes,
            vec!["C2065", "C2146", "C2440", "C2446", "C2676", "C2678", "C2679", "C3861"]
        );
    }

    #[test]
    fn header_rule_runs_before_spelling() {
        let names: Vec<_> = RuleTable::standard()
            .rules_for("C2065")
            .iter()
            .map(|rule| rule.name)
            .collect();
        assert_eq!(names, vec!["c2065_header_or_std_namespace", "c2065_fix_name_spelling"]);
    }

    #[test]
    fn unknown_code_abstains() {
        let input = LabelInput::new("C4996", "C4996: 'scanf': unsafe", "", Some(1));
        assert!(RuleTable::standard().classify_detailed(&input).is_abstain());
    }

    #[test]
    fn detailed_result_names_the_rule() {
        let input = LabelInput::new("C2065", "C2065: cout: необъявленный идентификатор", "", None);
        let result = classify_detailed(&input);
        assert_eq!(result.category, Some(FixCategory::HeaderOrStdNamespace));
        assert_eq!(result.rule.as_deref(), Some("c2065_header_or_std_namespace"));
    }

    #[test]
    fn disabled_rule_is_skipped() {
        let table = RuleTable::standard().with_disabled(["c2065_header_or_std_namespace", "nope"]);
        assert!(table.is_disabled("c2065_header_or_std_namespace"));
        assert!(!table.is_disabled("nope"));

        let input = LabelInput::new("C2065", "C2065: cout: необъявленный идентификатор", "", None);
        assert_eq!(table.classify(&input), None);
    }
}
