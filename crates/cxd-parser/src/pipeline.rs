//! Parse -> index -> extract, with every stage fault-isolated.

use cxd_core::context::ContextRecord;
use tracing::{debug, warn};

use crate::context::extract_context;
use crate::index::build_index;
use crate::provider::{AstProvider, ParseOptions};

/// Run the full extraction pipeline for one diagnostic line.
///
/// Never fails: a parse, index or extraction error is logged with the stage
/// and line and an empty record is returned instead.
pub fn safe_extract_context(
    provider: &dyn AstProvider,
    source: &str,
    line: u32,
    options: &ParseOptions,
    radius: u32,
) -> ContextRecord {
    let tu = match provider.parse(source, options) {
        Ok(tu) => tu,
        Err(error) => {
            warn!(stage = "parse_failed", line, %error, "context extraction stage failed");
            return ContextRecord::empty();
        }
    };
    let index = match build_index(&tu, options.track_macros) {
        Ok(index) => index,
        Err(error) => {
            warn!(stage = "index_failed", line, %error, "context extraction stage failed");
            return ContextRecord::empty();
        }
    };
    match extract_context(&tu, &index, line, options.track_macros, radius) {
        Ok(record) => {
            debug!(line, tokens = record.local_tokens.len(), "extracted context");
            record
        }
        Err(error) => {
            warn!(stage = "extract_failed", line, %error, "context extraction stage failed");
            ContextRecord::empty()
        }
    }
}
