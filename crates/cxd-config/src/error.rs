//! Errors from loading and validating `cxd` configuration.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A `config.toml` layer or a `CXD_*` variable did not fit [`crate::CxdConfig`].
    #[error("cannot merge cxd configuration layers: {0}")]
    Figment(#[from] figment::Error),

    /// The file given with `--config` is not there.
    #[error("cxd config file {} does not exist", path.display())]
    MissingFile { path: PathBuf },

    /// A section value outside what extraction or labeling accepts.
    #[error("{field} = {value} is rejected: {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}
