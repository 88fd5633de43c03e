//! # cxd-config
//!
//! Layered configuration loading for `cxd` using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`CXD_*` prefix, `__` as separator)
//! 2. An explicit file passed with `--config`
//! 3. Project-level `.cxd/config.toml`
//! 4. User-level `~/.config/cxd/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `CXD_CONTEXT__RADIUS` -> `context.radius`,
//! `CXD_LABELS__CANDIDATE_WINDOW` -> `labels.candidate_window`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use cxd_config::CxdConfig;
//!
//! let config = CxdConfig::load().expect("config");
//! println!("radius: {}", config.context.radius);
//! ```

mod context;
mod error;
mod general;
mod labels;

pub use context::{ContextConfig, MAX_RADIUS};
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use labels::LabelConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct CxdConfig {
    #[serde(default)]
    pub context: ContextConfig,
    #[serde(default)]
    pub labels: LabelConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl CxdConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// `.env` files are the binary's concern and are not read here.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a source fails to parse or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    /// Load configuration, layering an explicit file above the discovered ones.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingFile`] when `path` is not a file, otherwise
    /// as [`Self::load`].
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::MissingFile {
                path: path.to_path_buf(),
            });
        }
        Self::from_figment(Self::figment_with_file(Some(path)))
    }

    /// Build the figment provider chain.
    #[must_use]
    pub fn figment() -> Figment {
        Self::figment_with_file(None)
    }

    /// Build the provider chain with an optional explicit file below the env layer.
    #[must_use]
    pub fn figment_with_file(explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".cxd/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Explicit --config file
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        // Layer 4: Environment variables (highest priority)
        figment.merge(Env::prefixed("CXD_").split("__"))
    }

    /// Check every section's value ranges.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError::InvalidValue`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.context.validate()?;
        self.labels.validate()
    }

    fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cxd").join("config.toml"))
    }
}
