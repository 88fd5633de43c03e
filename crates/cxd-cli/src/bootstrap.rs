use anyhow::Context;
use cxd_config::CxdConfig;

use crate::cli::GlobalFlags;

pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<CxdConfig> {
    load_dotenv()?;

    match &flags.config {
        Some(path) => CxdConfig::load_from(path).context("invalid --config"),
        None => CxdConfig::load().context("failed to load cxd configuration"),
    }
}

fn load_dotenv() -> anyhow::Result<()> {
    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        Err(error) if error.not_found() => Ok(()),
        Err(error) => Err(error).context("failed to load .env file"),
    }
}
