use clap::Parser;

mod bootstrap;
mod cli;
mod commands;
mod output;
mod pipeline;
mod progress;
mod ui;

fn main() {
    if let Err(error) = run() {
        eprintln!("cxd error: {error:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let flags = cli.global_flags();

    if let cli::Commands::Schema(args) = &cli.command {
        init_tracing(&flags, None)?;
        return commands::schema::handle(args, &flags);
    }

    let config = bootstrap::load_config(&flags)?;
    init_tracing(&flags, config.general.log_filter.as_deref())?;
    ui::init(&flags);
    tracing::debug!(?config, "loaded configuration");

    commands::dispatch::dispatch(&cli.command, &config, &flags)
}

/// Install the stderr subscriber. `CXD_LOG` wins over the flags, which win
/// over the configured filter.
fn init_tracing(flags: &cli::GlobalFlags, configured: Option<&str>) -> anyhow::Result<()> {
    let level = if flags.quiet {
        "error"
    } else if flags.verbose {
        "debug"
    } else {
        configured.unwrap_or("warn")
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("CXD_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
