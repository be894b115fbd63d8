//! Integration tests for the configuration stack: defaults, TOML file,
//! `DUPFINDER_*` environment variables and CLI flag overrides.

use clap::Parser;
use dupfinder::cli::Cli;
use dupfinder::config::{Config, ConfigError};
use dupfinder::duplicates::ComparisonStrategy;
use figment::providers::{Format, Serialized, Toml};
use figment::Figment;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

/// Clear all DUPFINDER_* environment variables to avoid interference.
fn clear_env() {
    for (key, _) in std::env::vars() {
        if key.starts_with("DUPFINDER_") {
            std::env::remove_var(key);
        }
    }
}

#[test]
fn test_config_defaults_through_figment() {
    let figment = Figment::from(Serialized::defaults(Config::default()));
    let config: Config = figment.extract().unwrap();

    assert_eq!(config, Config::default());
    assert_eq!(config.listing_threshold, 15);
}

#[test]
fn test_config_load_from_toml() {
    let _lock = crate::env_lock();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
listing_threshold = 40
strategy = "bucketed"
follow_symlinks = true
log_dir = "/var/tmp/logs"
"#,
    )
    .unwrap();

    let figment =
        Figment::from(Serialized::defaults(Config::default())).merge(Toml::file(&config_path));
    let direct: Config = figment.extract().unwrap();
    let loaded = Config::load(Some(&config_path)).unwrap();

    assert_eq!(direct, loaded);
    assert_eq!(loaded.listing_threshold, 40);
    assert_eq!(loaded.strategy, ComparisonStrategy::Bucketed);
    assert!(loaded.follow_symlinks);
    assert_eq!(loaded.log_dir, Some(PathBuf::from("/var/tmp/logs")));
    assert!(!loaded.permanent);
}

#[test]
fn test_config_missing_default_file_uses_defaults() {
    let _lock = crate::env_lock();
    clear_env();
    let temp_dir = tempdir().unwrap();

    let config = Config::load_from_path(&temp_dir.path().join("nonexistent.toml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_missing_explicit_file_is_an_error() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("nonexistent.toml");

    let result = Config::load(Some(&path));
    assert!(matches!(result, Err(ConfigError::NotFound(p)) if p == path));
}

#[test]
fn test_config_hierarchy_file_env_cli() {
    let _lock = crate::env_lock();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "listing_threshold = 30\nstrategy = \"bucketed\"\n").unwrap();

    // Environment overrides the file
    std::env::set_var("DUPFINDER_LISTING_THRESHOLD", "50");
    let mut config = Config::load(Some(&config_path)).unwrap();
    std::env::remove_var("DUPFINDER_LISTING_THRESHOLD");
    assert_eq!(config.listing_threshold, 50);
    assert_eq!(config.strategy, ComparisonStrategy::Bucketed);

    // CLI overrides the environment
    let cli = Cli::try_parse_from([
        "dupfinder",
        ".",
        "--listing-threshold",
        "5",
        "--strategy",
        "pairwise",
    ])
    .unwrap();
    config.merge_cli(&cli);
    assert_eq!(config.listing_threshold, 5);
    assert_eq!(config.strategy, ComparisonStrategy::Pairwise);
}

#[test]
fn test_config_cli_without_flags_keeps_file_values() {
    let _lock = crate::env_lock();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "follow_symlinks = true\npermanent = true\n").unwrap();

    let mut config = Config::load(Some(&config_path)).unwrap();
    let cli = Cli::try_parse_from(["dupfinder", "."]).unwrap();
    config.merge_cli(&cli);

    assert!(config.follow_symlinks);
    assert!(config.permanent);
}

#[test]
fn test_config_unknown_key_with_suggestion() {
    let _lock = crate::env_lock();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "folow_symlinks = true\n").unwrap();

    let err = Config::load(Some(&config_path)).unwrap_err();

    match &err {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "folow_symlinks");
            assert_eq!(*suggestion, Some("follow_symlinks"));
        }
        other => panic!("Expected UnknownKey, got {:?}", other),
    }
    assert!(err.to_string().contains("did you mean 'follow_symlinks'?"));
}

#[test]
fn test_config_invalid_type_is_an_error() {
    let _lock = crate::env_lock();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "listing_threshold = \"fifteen\"\n").unwrap();

    let result = Config::load(Some(&config_path));
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn test_config_invalid_toml_is_an_error() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "listing_threshold = = 3\n").unwrap();

    let result = Config::load(Some(&config_path));
    assert!(matches!(result, Err(ConfigError::Parse { .. })));
}

#[test]
fn test_config_unknown_env_vars_are_ignored() {
    let _lock = crate::env_lock();
    clear_env();
    let temp_dir = tempdir().unwrap();

    std::env::set_var("DUPFINDER_SOMETHING_ELSE", "1");
    let result = Config::load_from_path(&temp_dir.path().join("none.toml"));
    std::env::remove_var("DUPFINDER_SOMETHING_ELSE");

    assert_eq!(result.unwrap(), Config::default());
}
