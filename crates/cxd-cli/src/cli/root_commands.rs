use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Print the source with comments removed.
    Strip(StripArgs),
    /// Extract the context record around one line.
    Context(ContextArgs),
    /// Run the label rules for one diagnostic.
    Classify(ClassifyArgs),
    /// Label the first error of a compiler run.
    Label(LabelArgs),
    /// Process a JSONL file of samples in parallel.
    Batch(BatchArgs),
    /// Print the JSON schema of an output record.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct StripArgs {
    /// Source file, or `-` for stdin
    pub file: PathBuf,
}

#[derive(Clone, Debug, Args)]
pub struct ContextArgs {
    /// Source file, or `-` for stdin
    pub file: PathBuf,

    /// 1-based diagnostic line
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub line: u32,

    /// Token window radius (overrides `context.radius`)
    #[arg(long)]
    pub radius: Option<u32>,

    /// Track macros and preprocessing directives
    #[arg(long)]
    pub macros: bool,
}

#[derive(Clone, Debug, Args)]
pub struct ClassifyArgs {
    /// Source file, or `-` for stdin
    pub file: PathBuf,

    /// Diagnostic code, e.g. C2065
    #[arg(long)]
    pub code: String,

    /// Diagnostic message, e.g. "C2065: cout: undeclared identifier"
    #[arg(long)]
    pub message: String,

    /// 1-based diagnostic line
    #[arg(long)]
    pub line: Option<u32>,
}

#[derive(Clone, Debug, Args)]
pub struct LabelArgs {
    /// Source file that was compiled, or `-` for stdin
    pub file: PathBuf,

    /// File holding the compiler output, or `-` for stdin
    #[arg(long)]
    pub compiler_output: PathBuf,
}

#[derive(Clone, Debug, Args)]
pub struct BatchArgs {
    /// JSONL file of `{source, error_text, error_line}` samples, or `-` for stdin
    pub input: PathBuf,

    /// Write result rows here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Record to describe
    #[arg(value_enum)]
    pub record: SchemaRecord,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SchemaRecord {
    ContextRecord,
    LabelResult,
    LabelResponse,
    BatchRow,
}
