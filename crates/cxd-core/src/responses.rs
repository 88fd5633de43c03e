//! Response types returned as JSON by `cxd` commands.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::context::ContextRecord;
use crate::diagnostic::Diagnostic;
use crate::enums::FixCategory;

/// Outcome of running the rule engine for one diagnostic.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LabelResult {
    /// `None` when every applicable rule abstained.
    pub category: Option<FixCategory>,
    /// Name of the winning rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
}

impl LabelResult {
    #[must_use]
    pub const fn abstain() -> Self {
        Self {
            category: None,
            rule: None,
        }
    }

    #[must_use]
    pub const fn is_abstain(&self) -> bool {
        self.category.is_none()
    }
}

/// Response from `cxd label`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LabelResponse {
    pub diagnostic: Option<Diagnostic>,
    pub context: ContextRecord,
    pub label: LabelResult,
}

/// One input line of `cxd batch`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct BatchSample {
    pub source: String,
    /// Diagnostic message, `C2065: cout: ...`.
    pub error_text: String,
    #[serde(default)]
    pub error_line: Option<u32>,
}

/// One output line of `cxd batch`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct BatchRow {
    /// Content hash of the source, the deduplication key.
    pub hash: String,
    pub diagnostic: Option<Diagnostic>,
    pub context: ContextRecord,
    pub label: LabelResult,
}
