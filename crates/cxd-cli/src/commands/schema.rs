use cxd_core::context::ContextRecord;
use cxd_core::responses::{BatchRow, LabelResponse, LabelResult};
use schemars::{Schema, schema_for};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{SchemaArgs, SchemaRecord};
use crate::output::output;

/// Handle `cxd schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&schema(args.record), flags.format)
}

fn schema(record: SchemaRecord) -> Schema {
    match record {
        SchemaRecord::ContextRecord => schema_for!(ContextRecord),
        SchemaRecord::LabelResult => schema_for!(LabelResult),
        SchemaRecord::LabelResponse => schema_for!(LabelResponse),
        SchemaRecord::BatchRow => schema_for!(BatchRow),
    }
}

#[cfg(test)]
mod tests {
    use cxd_core::context::ContextRecord;
    use cxd_core::enums::FixCategory;
    use cxd_core::responses::LabelResult;

    use super::schema;
    use crate::cli::root_commands::SchemaRecord;

    fn assert_valid(record: SchemaRecord, instance: &serde_json::Value) {
        let schema = serde_json::to_value(schema(record)).expect("schema serializes");
        let validator = jsonschema::validator_for(&schema).expect("schema should be valid");
        let errors: Vec<String> = validator.iter_errors(instance).map(|e| e.to_string()).collect();
        assert!(errors.is_empty(), "{record:?} rejected {instance}: {errors:?}");
    }

    #[test]
    fn empty_context_record_matches_its_schema() {
        let instance = serde_json::to_value(ContextRecord::empty()).expect("record serializes");
        assert_valid(SchemaRecord::ContextRecord, &instance);
    }

    #[test]
    fn label_results_match_their_schema() {
        let fired = LabelResult {
            category: Some(FixCategory::FixLeftOperand),
            rule: Some("c2678_fix_left_operand".to_string()),
        };
        for result in [fired, LabelResult::abstain()] {
            let instance = serde_json::to_value(&result).expect("result serializes");
            assert_valid(SchemaRecord::LabelResult, &instance);
        }
    }

    #[test]
    fn unknown_category_is_rejected() {
        let schema = serde_json::to_value(schema(SchemaRecord::LabelResult)).expect("schema serializes");
        let validator = jsonschema::validator_for(&schema).expect("schema should be valid");
        assert!(!validator.is_valid(&serde_json::json!({ "category": "FIX_EVERYTHING" })));
    }
}
