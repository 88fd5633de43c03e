//! Per-sample pipeline: prepare source -> extract context -> label.
//!
//! Every stage is total. Extraction failures come back as empty records and
//! unusable diagnostics as abstentions, so one bad sample never stops a batch.

use cxd_config::{ContextConfig, CxdConfig};
use cxd_core::context::ContextRecord;
use cxd_core::diagnostic::Diagnostic;
use cxd_core::responses::{BatchRow, BatchSample, LabelResult};
use cxd_core::source::SourceUnit;
use cxd_labels::{LabelInput, RuleTable};
use cxd_parser::{ParseOptions, TreeSitterCppProvider, expand_bits_header, safe_extract_context, strip_comments};
use tracing::debug;

/// Shared, read-only state for analyzing many samples, possibly in parallel.
pub struct Analyzer {
    provider: TreeSitterCppProvider,
    rules: RuleTable,
    options: ParseOptions,
    radius: u32,
    expand_bits_header: bool,
    strip_comments: bool,
    candidate_window: usize,
}

impl Analyzer {
    #[must_use]
    pub fn from_config(config: &CxdConfig) -> Self {
        let ContextConfig {
            radius,
            track_macros,
            file_name,
            expand_bits_header,
            strip_comments,
        } = config.context.clone();

        Self {
            provider: TreeSitterCppProvider,
            rules: RuleTable::standard().with_disabled(config.labels.disabled_rules.iter().cloned()),
            options: ParseOptions {
                file_name,
                track_macros,
            },
            radius,
            expand_bits_header,
            strip_comments,
            candidate_window: config.labels.candidate_window as usize,
        }
    }

    #[must_use]
    pub const fn with_radius(mut self, radius: u32) -> Self {
        self.radius = radius;
        self
    }

    #[must_use]
    pub fn with_track_macros(mut self, track_macros: bool) -> Self {
        self.options.track_macros = track_macros;
        self
    }

    /// The text line numbers refer to: the bits header expanded and comments
    /// stripped, as configured.
    #[must_use]
    pub fn prepare(&self, source: &str) -> String {
        let text = if self.expand_bits_header {
            expand_bits_header(source)
        } else {
            source.to_string()
        };
        if self.strip_comments {
            strip_comments(&text)
        } else {
            text
        }
    }

    /// Context around `line` of a prepared source. Empty without a line.
    #[must_use]
    pub fn context(&self, source: &str, line: Option<u32>) -> ContextRecord {
        line.map_or_else(ContextRecord::empty, |line| {
            safe_extract_context(&self.provider, source, line, &self.options, self.radius)
        })
    }

    #[must_use]
    pub fn label(&self, diagnostic: &Diagnostic, source: &str) -> LabelResult {
        let input = LabelInput::from_diagnostic(diagnostic, source)
            .with_candidate_window(self.candidate_window);
        self.rules.classify_detailed(&input)
    }

    /// Context and label for a prepared source and an optional diagnostic.
    #[must_use]
    pub fn analyze(&self, source: &str, diagnostic: Option<&Diagnostic>) -> (ContextRecord, LabelResult) {
        let Some(diagnostic) = diagnostic else {
            return (ContextRecord::empty(), LabelResult::abstain());
        };
        (
            self.context(source, diagnostic.line),
            self.label(diagnostic, source),
        )
    }

    /// One `batch` output row. The hash is taken over the source as given.
    #[must_use]
    pub fn analyze_sample(&self, sample: &BatchSample) -> BatchRow {
        let hash = SourceUnit::new(sample.source.as_str()).content_hash();
        let source = self.prepare(&sample.source);
        let diagnostic = Diagnostic::from_message(sample.error_text.as_str(), sample.error_line)
            .inspect_err(|error| debug!(%error, hash = %hash, "sample has no usable diagnostic"))
            .ok();
        let (context, label) = self.analyze(&source, diagnostic.as_ref());
        BatchRow {
            hash,
            diagnostic,
            context,
            label,
        }
    }
}
