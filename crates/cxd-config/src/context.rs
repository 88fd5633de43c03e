//! Context extraction settings.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Largest token window radius accepted.
pub const MAX_RADIUS: u32 = 50;

const fn default_radius() -> u32 {
    2
}

fn default_file_name() -> String {
    "code.cpp".to_string()
}

const fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ContextConfig {
    /// Lines on each side of the diagnostic line fed to the token normalizer.
    #[serde(default = "default_radius")]
    pub radius: u32,

    /// Record macro/preprocessor events and tag their tokens.
    #[serde(default)]
    pub track_macros: bool,

    /// Name of the file under diagnosis as seen by the AST provider.
    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// Replace `#include <bits/stdc++.h>` with the standard headers it stands for.
    #[serde(default = "default_true")]
    pub expand_bits_header: bool,

    /// Strip comments before parsing.
    #[serde(default)]
    pub strip_comments: bool,
}

impl ContextConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an oversized radius or an
    /// empty file name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.radius > MAX_RADIUS {
            return Err(ConfigError::InvalidValue {
                field: "context.radius".into(),
                value: self.radius.to_string(),
                reason: format!("the maximum is {MAX_RADIUS}"),
            });
        }
        if self.file_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "context.file_name".into(),
                value: format!("{:?}", self.file_name),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            radius: default_radius(),
            track_macros: false,
            file_name: default_file_name(),
            expand_bits_header: true,
            strip_comments: false,
        }
    }
}
