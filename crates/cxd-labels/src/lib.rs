//! # cxd-labels
//!
//! Weak-supervision label functions for C++ compiler diagnostics.
//!
//! Every rule is a pure function over a [`LabelInput`] (diagnostic code,
//! message, source text and line) that either emits a
//! [`FixCategory`](cxd_core::enums::FixCategory) or abstains. Rules are
//! grouped by diagnostic code into a [`RuleTable`]; the first rule of a
//! family that does not abstain wins.
//!
//! - [`details`]: vocabularies, similarity, line windows and the text
//!   predicates the rules are built from
//! - [`rules`]: one module per family of diagnostics
//! - [`engine`]: the rule table and the `classify` entry points
//!
//! ```
//! use cxd_core::enums::FixCategory;
//!
//! let category = cxd_labels::classify(
//!     "C2065",
//!     "C2065: cout: undeclared identifier",
//!     "int main() {\n    cout << 1;\n}\n",
//!     Some(2),
//! );
//! assert_eq!(category, Some(FixCategory::HeaderOrStdNamespace));
//! ```

pub mod details;
pub mod engine;
pub mod input;
pub mod rules;

pub use engine::{RuleTable, classify, classify_detailed};
pub use input::{DEFAULT_CANDIDATE_WINDOW, LabelInput};
pub use rules::{LabelRule, RuleFn};
