//! General application configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct GeneralConfig {
    /// Log filter used when `CXD_LOG` is unset (e.g. `cxd_parser=debug`).
    #[serde(default)]
    pub log_filter: Option<String>,

    /// Worker threads for `cxd batch`. `0` lets rayon decide.
    #[serde(default)]
    pub batch_threads: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = GeneralConfig::default();
        assert!(config.log_filter.is_none());
        assert_eq!(config.batch_threads, 0);
    }
}
