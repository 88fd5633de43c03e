//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for sandboxed files and env vars.

use cxd_config::{ConfigError, CxdConfig};
use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;
use std::path::Path;

#[test]
fn loads_context_section_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[context]
radius = 3
track_macros = true
file_name = "main.cpp"
"#,
        )?;

        let config: CxdConfig = Figment::from(Serialized::defaults(CxdConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.context.radius, 3);
        assert!(config.context.track_macros);
        assert_eq!(config.context.file_name, "main.cpp");
        assert!(config.context.expand_bits_header);
        Ok(())
    });
}

#[test]
fn project_local_file_is_discovered() {
    Jail::expect_with(|jail| {
        jail.create_dir(".cxd")?;
        jail.create_file(
            ".cxd/config.toml",
            r#"
[labels]
candidate_window = 4
disabled_rules = ["c2440_fix_cast"]
"#,
        )?;

        let config = CxdConfig::load().expect("config loads");
        assert_eq!(config.labels.candidate_window, 4);
        assert_eq!(config.labels.disabled_rules, vec!["c2440_fix_cast".to_string()]);
        Ok(())
    });
}

#[test]
fn explicit_file_beats_project_file() {
    Jail::expect_with(|jail| {
        jail.create_dir(".cxd")?;
        jail.create_file(".cxd/config.toml", "[context]\nradius = 4\n")?;
        jail.create_file("override.toml", "[context]\nradius = 1\n")?;

        let config = CxdConfig::load_from(Path::new("override.toml")).expect("config loads");
        assert_eq!(config.context.radius, 1);
        Ok(())
    });
}

#[test]
fn out_of_range_value_is_rejected() {
    Jail::expect_with(|jail| {
        jail.create_dir(".cxd")?;
        jail.create_file(".cxd/config.toml", "[labels]\ncandidate_window = 0\n")?;

        let err = CxdConfig::load().expect_err("zero window rejected");
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        assert_eq!(
            err.to_string(),
            "labels.candidate_window = 0 is rejected: must be at least 1"
        );
        Ok(())
    });
}

#[test]
fn missing_explicit_file_is_named() {
    Jail::expect_with(|_jail| {
        let err = CxdConfig::load_from(Path::new("absent.toml")).expect_err("no such file");
        assert!(matches!(&err, ConfigError::MissingFile { path } if path == Path::new("absent.toml")));
        assert_eq!(err.to_string(), "cxd config file absent.toml does not exist");
        Ok(())
    });
}

#[test]
fn malformed_toml_is_a_merge_error() {
    Jail::expect_with(|jail| {
        jail.create_file("broken.toml", "[context\nradius = 3\n")?;

        let err = CxdConfig::load_from(Path::new("broken.toml")).expect_err("unclosed table header");
        assert!(matches!(err, ConfigError::Figment(_)));
        assert!(err.to_string().starts_with("cannot merge cxd configuration layers"));
        Ok(())
    });
}
