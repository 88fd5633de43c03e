//! Closed vocabularies shared by the extractor and the rule engine.
//!
//! `FixCategory` serializes in `SCREAMING_SNAKE_CASE` because downstream
//! training rows store the tag verbatim. Everything else uses `snake_case`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// FixCategory
// ---------------------------------------------------------------------------

/// Root-cause category a label function can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FixCategory {
    /// A standard name is used without its header or the `std::` namespace.
    HeaderOrStdNamespace,
    /// An identifier is a near-miss of a keyword, type or known name.
    FixNameSpelling,
    /// Missing operator, separator or semicolon.
    IncorrectConstructionOrSymbols,
    /// A value needs an explicit cast to the destination type.
    FixCast,
    /// Pointer compared or converted against a non-pointer.
    FixPointersForCast,
    /// Operand type does not support the operator.
    FixExprForOperator,
    /// The left operand is the wrong kind for the operator.
    FixLeftOperand,
    /// The right operand is the wrong kind for the operator.
    FixRightOperand,
}

impl FixCategory {
    pub const ALL: [Self; 8] = [
        Self::HeaderOrStdNamespace,
        Self::FixNameSpelling,
        Self::IncorrectConstructionOrSymbols,
        Self::FixCast,
        Self::FixPointersForCast,
        Self::FixExprForOperator,
        Self::FixLeftOperand,
        Self::FixRightOperand,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HeaderOrStdNamespace => "HEADER_OR_STD_NAMESPACE",
            Self::FixNameSpelling => "FIX_NAME_SPELLING",
            Self::IncorrectConstructionOrSymbols => "INCORRECT_CONSTRUCTION_OR_SYMBOLS",
            Self::FixCast => "FIX_CAST",
            Self::FixPointersForCast => "FIX_POINTERS_FOR_CAST",
            Self::FixExprForOperator => "FIX_EXPR_FOR_OPERATOR",
            Self::FixLeftOperand => "FIX_LEFT_OPERAND",
            Self::FixRightOperand => "FIX_RIGHT_OPERAND",
        }
    }

    /// Human-readable fix recommendation shown next to a prediction.
    #[must_use]
    pub const fn hint(self) -> &'static str {
        match self {
            Self::HeaderOrStdNamespace => "include the missing header or qualify the name with std::",
            Self::FixNameSpelling => "fix the spelling of the name",
            Self::IncorrectConstructionOrSymbols => "add the missing operator, separator or semicolon",
            Self::FixCast => "add an explicit cast to the destination type",
            Self::FixPointersForCast => "dereference the pointer or compare against a pointer",
            Self::FixExprForOperator => "use an operand type that supports this operator",
            Self::FixLeftOperand => "change the left operand of the operator",
            Self::FixRightOperand => "change the right operand of the operator",
        }
    }
}

impl fmt::Display for FixCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FixCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("unknown fix category '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// MacroEventKind
// ---------------------------------------------------------------------------

/// Kind of a preprocessor event recorded while indexing with macro tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MacroEventKind {
    MacroDef,
    MacroUse,
    PpDirective,
}

impl MacroEventKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MacroDef => "macro_def",
            Self::MacroUse => "macro_use",
            Self::PpDirective => "pp_directive",
        }
    }
}

impl fmt::Display for MacroEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
