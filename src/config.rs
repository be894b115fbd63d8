//! Layered application configuration.
//!
//! Settings are merged from (lowest to highest priority):
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. A TOML file: `--config FILE`, or `config.toml` in the platform
//!    config directory (e.g. `~/.config/dupfinder/config.toml`)
//! 3. `DUPFINDER_*` environment variables (`DUPFINDER_LISTING_THRESHOLD=30`)
//! 4. Command-line flags ([`Config::merge_cli`])
//!
//! # Example
//!
//! ```toml
//! listing_threshold = 30
//! strategy = "bucketed"
//! follow_symlinks = false
//! log_dir = "/var/tmp/dupfinder"
//! permanent = false
//! plain_progress = false
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::Cli;
use crate::duplicates::ComparisonStrategy;
use crate::output::DEFAULT_LISTING_THRESHOLD;

/// Prefix of the environment variables read into the configuration.
pub const ENV_PREFIX: &str = "DUPFINDER_";

/// Keys accepted in the config file and as environment variables.
pub const KNOWN_KEYS: &[&str] = &[
    "listing_threshold",
    "strategy",
    "follow_symlinks",
    "log_dir",
    "permanent",
    "plain_progress",
];

/// Errors raised while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config file given with `--config` does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// The config file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Read {
        /// Path of the config file
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML.
    #[error("Invalid TOML in {path}: {source}")]
    Parse {
        /// Path of the config file
        path: PathBuf,
        /// The TOML parser error
        #[source]
        source: toml::de::Error,
    },

    /// The config file contains a key dupfinder does not know.
    #[error("Unknown key '{key}' in {path}{}", suggestion_text(.suggestion))]
    UnknownKey {
        /// The offending key
        key: String,
        /// Path of the config file
        path: PathBuf,
        /// Closest known key, if any is similar enough
        suggestion: Option<&'static str>,
    },

    /// A value has the wrong type or an unknown variant.
    #[error("Invalid configuration: {0}")]
    Invalid(Box<figment::Error>),
}

fn suggestion_text(suggestion: &Option<&'static str>) -> String {
    suggestion.map_or_else(String::new, |s| format!(" (did you mean '{}'?)", s))
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of groups listed in the text report.
    pub listing_threshold: usize,
    /// How files are compared.
    pub strategy: ComparisonStrategy,
    /// Follow symbolic links while walking.
    pub follow_symlinks: bool,
    /// Directory for log files; the current directory when unset.
    pub log_dir: Option<PathBuf>,
    /// Delete permanently instead of moving to the trash.
    pub permanent: bool,
    /// Plain percentage lines instead of a progress bar.
    pub plain_progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listing_threshold: DEFAULT_LISTING_THRESHOLD,
            strategy: ComparisonStrategy::default(),
            follow_symlinks: false,
            log_dir: None,
            permanent: false,
            plain_progress: false,
        }
    }
}

impl Config {
    /// Default platform-specific config file location.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "dupfinder", "dupfinder")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load the configuration.
    ///
    /// An explicit file must exist. The default file is optional.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a file is missing, malformed, or holds
    /// unknown keys or invalid values.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Self::load_from_path(path)
            }
            None => match Self::default_path() {
                Some(path) => Self::load_from_path(&path),
                None => {
                    log::debug!("No config directory available, using defaults and env");
                    Self::extract(Self::base_figment())
                }
            },
        }
    }

    /// Load defaults, the given file (if it exists) and the environment.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if path.is_file() {
            let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            let table: toml::Table =
                toml::from_str(&content).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?;
            check_keys(&table, path)?;

            log::debug!("Loading config from {}", path.display());
            figment = figment.merge(Toml::file(path));
        } else {
            log::debug!("No config file at {}", path.display());
        }

        Self::extract(figment.merge(env_provider()))
    }

    /// Apply command-line flags on top of the loaded values.
    pub fn merge_cli(&mut self, cli: &Cli) {
        if let Some(threshold) = cli.listing_threshold {
            self.listing_threshold = threshold;
        }
        if let Some(strategy) = cli.strategy {
            self.strategy = strategy.into();
        }
        if cli.follow_symlinks {
            self.follow_symlinks = true;
        }
        if let Some(dir) = &cli.log_dir {
            self.log_dir = Some(dir.clone());
        }
        if cli.permanent {
            self.permanent = true;
        }
        if cli.plain_progress {
            self.plain_progress = true;
        }
    }

    /// Directory log files are written to.
    #[must_use]
    pub fn log_dir_or_current(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    fn base_figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default())).merge(env_provider())
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        figment
            .extract()
            .map_err(|e| ConfigError::Invalid(Box::new(e)))
    }
}

fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX).only(KNOWN_KEYS)
}

fn check_keys(table: &toml::Table, path: &Path) -> Result<(), ConfigError> {
    for key in table.keys() {
        if !KNOWN_KEYS.contains(&key.as_str()) {
            let suggestion = suggest_key(key);
            log::warn!(
                "Unknown config key '{}' in {}{}",
                key,
                path.display(),
                suggestion_text(&suggestion)
            );
            return Err(ConfigError::UnknownKey {
                key: key.clone(),
                path: path.to_path_buf(),
                suggestion,
            });
        }
    }
    Ok(())
}

/// Closest known key by Jaro-Winkler similarity.
fn suggest_key(key: &str) -> Option<&'static str> {
    KNOWN_KEYS
        .iter()
        .map(|known| (*known, strsim::jaro_winkler(key, known)))
        .filter(|(_, score)| *score > 0.8)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(known, _)| known)
}
