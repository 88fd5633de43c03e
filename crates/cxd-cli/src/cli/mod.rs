use std::path::PathBuf;

use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `cxd` binary.
#[derive(Debug, Parser)]
#[command(
    name = "cxd",
    version,
    about = "Context extraction and heuristic labeling for C++ compiler diagnostics"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only, no progress bar)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Extra config file layered above the user and project files
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            config: self.config.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands, OutputFormat};
    use crate::cli::root_commands::SchemaRecord;

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["cxd", "--format", "raw", "--verbose", "strip", "a.cpp"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Strip(_)));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["cxd", "batch", "samples.jsonl", "--quiet", "-c", "cxd.toml"])
            .expect("cli should parse");

        assert!(cli.quiet);
        assert_eq!(cli.global_flags().config.as_deref(), Some(Path::new("cxd.toml")));
        assert!(matches!(cli.command, Commands::Batch(_)));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["cxd", "--format", "table", "strip", "a.cpp"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn context_requires_positive_line() {
        assert!(Cli::try_parse_from(["cxd", "context", "a.cpp", "--line", "0"]).is_err());

        let cli = Cli::try_parse_from(["cxd", "context", "a.cpp", "--line", "3", "--radius", "1", "--macros"])
            .expect("cli should parse");
        let Commands::Context(args) = cli.command else {
            panic!("expected context command");
        };
        assert_eq!(args.line, 3);
        assert_eq!(args.radius, Some(1));
        assert!(args.macros);
    }

    #[test]
    fn classify_takes_code_message_and_optional_line() {
        let cli = Cli::try_parse_from([
            "cxd",
            "classify",
            "--code",
            "C2065",
            "--message",
            "C2065: cout: undeclared identifier",
            "a.cpp",
        ])
        .expect("cli should parse");
        let Commands::Classify(args) = cli.command else {
            panic!("expected classify command");
        };
        assert_eq!(args.code, "C2065");
        assert_eq!(args.line, None);
    }

    #[test]
    fn schema_records_use_kebab_case() {
        let cli = Cli::try_parse_from(["cxd", "schema", "label-result"]).expect("cli should parse");
        let Commands::Schema(args) = cli.command else {
            panic!("expected schema command");
        };
        assert_eq!(args.record, SchemaRecord::LabelResult);
        assert!(Cli::try_parse_from(["cxd", "schema", "label_result"]).is_err());
    }
}
