//! The context record: a plain snapshot of what surrounds a diagnostic line.
//!
//! Every field is optional or may be empty. Empty fields are skipped when
//! serializing so stored rows stay compact.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::enums::MacroEventKind;

/// Output of context extraction for one diagnostic line.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ContextRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core_info: Option<CoreInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor_meta: Option<CursorMeta>,
    /// Ancestor kind names, nearest first, translation unit excluded.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parent_chain: Vec<String>,
    /// Normalized tags for the tokens around the line.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub local_tokens: Vec<String>,
    /// Basenames of headers included directly by the file.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub includes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub macros: Vec<MacroEvent>,
    #[serde(default, skip_serializing_if = "AliasesAndNamespaces::is_empty")]
    pub aliases_and_namespaces: AliasesAndNamespaces,
    #[serde(default, skip_serializing_if = "DeclCounts::is_empty")]
    pub decl_counts: DeclCounts,
}

impl ContextRecord {
    /// The record returned when no context is available at all.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Facts about the focus cursor itself.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CoreInfo {
    pub kind: String,
    pub spelling: String,
    pub display_name: String,
    pub line: u32,
    pub is_decl: bool,
    pub is_expr: bool,
    pub is_stmt: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_spelling: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_type: Option<String>,
}

/// Kind-specific metadata of the focus cursor.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum CursorMeta {
    BinaryOperator {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        op_spelling: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lhs_kind: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lhs_type: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rhs_kind: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rhs_type: Option<String>,
    },
    Call {
        num_args: u32,
        /// Type spellings of the first four arguments.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        arg_types: Vec<String>,
        more_than_four_args: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result_type: Option<String>,
    },
    Reference {
        is_type_ref: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ref_kind: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ref_type: Option<String>,
    },
}

/// A macro definition, macro use or preprocessor directive seen while indexing.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MacroEvent {
    pub kind: MacroEventKind,
    /// Macro name, or the directive spelling for `pp_directive`.
    pub name: String,
    pub line: u32,
}

/// A `typedef` or `using X = Y;` declaration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TypedefRecord {
    pub name: String,
    pub underlying: String,
    pub kind: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AliasesAndNamespaces {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub using_directives: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub using_decls: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub typedefs: Vec<TypedefRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub namespaces: Vec<String>,
}

impl AliasesAndNamespaces {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.using_directives.is_empty()
            && self.using_decls.is_empty()
            && self.typedefs.is_empty()
            && self.namespaces.is_empty()
    }
}

/// Declaration histograms over the file under diagnosis.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DeclCounts {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub type_kinds: BTreeMap<String, u32>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub var_kinds: BTreeMap<String, u32>,
    /// Keyed by raw type spelling.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub var_types: BTreeMap<String, u32>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub func_kinds: BTreeMap<String, u32>,
}

impl DeclCounts {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.type_kinds.is_empty()
            && self.var_kinds.is_empty()
            && self.var_types.is_empty()
            && self.func_kinds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_record_serializes_to_empty_object() {
        let json = serde_json::to_string(&ContextRecord::empty()).unwrap();
        assert_eq!(json, "{}");
        assert!(ContextRecord::empty().is_empty());
    }

    #[test]
    fn line_alone_is_not_empty() {
        let record = ContextRecord {
            line: Some(4),
            ..ContextRecord::default()
        };
        assert!(!record.is_empty());
        assert_eq!(serde_json::to_string(&record).unwrap(), r#"{"line":4}"#);
    }

    #[test]
    fn cursor_meta_is_tagged_by_shape() {
        let meta = CursorMeta::Reference {
            is_type_ref: true,
            ref_kind: Some("TYPEDEF_DECL".into()),
            ref_type: None,
        };
        let value = serde_json::to_value(&meta).unwrap();
        assert_eq!(value["shape"], "reference");
        assert_eq!(value["ref_kind"], "TYPEDEF_DECL");
        assert!(value.get("ref_type").is_none());
    }
}
