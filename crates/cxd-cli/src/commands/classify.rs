use cxd_config::CxdConfig;
use cxd_core::diagnostic::Diagnostic;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ClassifyArgs;
use crate::commands::shared::read_text;
use crate::output::output;
use crate::pipeline::Analyzer;

/// Handle `cxd classify`.
pub fn handle(args: &ClassifyArgs, config: &CxdConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let analyzer = Analyzer::from_config(config);
    let source = analyzer.prepare(&read_text(&args.file)?);
    let diagnostic = Diagnostic {
        code: args.code.trim().to_uppercase(),
        message: args.message.clone(),
        line: args.line,
    };
    let result = analyzer.label(&diagnostic, &source);
    output(&result, flags.format)
}
