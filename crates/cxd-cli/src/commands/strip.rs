use cxd_parser::strip_comments;

use crate::cli::root_commands::StripArgs;
use crate::commands::shared::read_text;

/// Handle `cxd strip`. Prints plain text; `--format` does not apply.
pub fn handle(args: &StripArgs) -> anyhow::Result<()> {
    let source = read_text(&args.file)?;
    println!("{}", strip_comments(&source));
    Ok(())
}
