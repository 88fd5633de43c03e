use anyhow::bail;
use cxd_config::CxdConfig;
use cxd_core::diagnostic::Diagnostic;
use cxd_core::responses::LabelResponse;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::LabelArgs;
use crate::commands::shared::{is_stdin, read_text};
use crate::output::output;
use crate::pipeline::Analyzer;

/// Handle `cxd label`.
pub fn handle(args: &LabelArgs, config: &CxdConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    if is_stdin(&args.file) && is_stdin(&args.compiler_output) {
        bail!("the source and --compiler-output cannot both be read from stdin");
    }

    let analyzer = Analyzer::from_config(config);
    let source = analyzer.prepare(&read_text(&args.file)?);
    let compiler_output = read_text(&args.compiler_output)?;

    let diagnostic = Diagnostic::from_compiler_output(&compiler_output);
    match &diagnostic {
        None => tracing::info!("compiler output carries no error"),
        Some(found) if found.mentions_missing_bits_header() => tracing::warn!(
            "the compiler lacks <bits/stdc++.h>; recompile the expanded source for a useful label"
        ),
        Some(found) => tracing::debug!(code = %found.code, line = ?found.line, "parsed compiler output"),
    }

    let (context, label) = analyzer.analyze(&source, diagnostic.as_ref());
    output(
        &LabelResponse {
            diagnostic,
            context,
            label,
        },
        flags.format,
    )
}
