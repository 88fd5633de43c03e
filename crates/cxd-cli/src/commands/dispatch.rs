use cxd_config::CxdConfig;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub fn dispatch(command: &Commands, config: &CxdConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Strip(args) => commands::strip::handle(args),
        Commands::Context(args) => commands::context::handle(args, config, flags),
        Commands::Classify(args) => commands::classify::handle(args, config, flags),
        Commands::Label(args) => commands::label::handle(args, config, flags),
        Commands::Batch(args) => commands::batch::handle(args, config, flags),
        Commands::Schema(args) => commands::schema::handle(args, flags),
    }
}
