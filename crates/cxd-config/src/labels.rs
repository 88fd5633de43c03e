//! Rule engine settings.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const fn default_candidate_window() -> u32 {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct LabelConfig {
    /// Lines on each side of the error line searched for spelling candidates.
    #[serde(default = "default_candidate_window")]
    pub candidate_window: u32,

    /// Rule names the engine skips, e.g. `c2065_fix_name_spelling`.
    #[serde(default)]
    pub disabled_rules: Vec<String>,
}

impl LabelConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when the candidate window is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.candidate_window == 0 {
            return Err(ConfigError::InvalidValue {
                field: "labels.candidate_window".into(),
                value: self.candidate_window.to_string(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn is_disabled(&self, rule: &str) -> bool {
        self.disabled_rules.iter().any(|r| r == rule)
    }
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            candidate_window: default_candidate_window(),
            disabled_rules: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = LabelConfig::default();
        assert_eq!(config.candidate_window, 10);
        assert!(config.disabled_rules.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn disabled_lookup() {
        let config = LabelConfig {
            disabled_rules: vec!["c2440_fix_cast".into()],
            ..LabelConfig::default()
        };
        assert!(config.is_disabled("c2440_fix_cast"));
        assert!(!config.is_disabled("c2065_fix_name_spelling"));
    }

    #[test]
    fn zero_window_is_invalid() {
        let config = LabelConfig {
            candidate_window: 0,
            ..LabelConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
