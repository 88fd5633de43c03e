use anyhow::bail;
use cxd_config::{CxdConfig, MAX_RADIUS};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ContextArgs;
use crate::commands::shared::read_text;
use crate::output::output;
use crate::pipeline::Analyzer;

/// Handle `cxd context`.
pub fn handle(args: &ContextArgs, config: &CxdConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut analyzer = Analyzer::from_config(config);
    if let Some(radius) = args.radius {
        if radius > MAX_RADIUS {
            bail!("invalid --radius {radius}: the maximum is {MAX_RADIUS}");
        }
        analyzer = analyzer.with_radius(radius);
    }
    if args.macros {
        analyzer = analyzer.with_track_macros(true);
    }

    let source = analyzer.prepare(&read_text(&args.file)?);
    let record = analyzer.context(&source, Some(args.line));
    if record.is_empty() {
        tracing::warn!(line = args.line, "no context extracted");
    }
    output(&record, flags.format)
}
