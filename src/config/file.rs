//! Configuration file support for persistent settings.
//!
//! This module provides support for loading configuration from a TOML file
//! located at `~/.config/scaffold-dirs/config.toml` (or the platform-specific
//! equivalent). Configuration file values serve as defaults that can be
//! overridden by CLI arguments.
//!
//! # Layering
//!
//! The precedence order is: **CLI argument > config file > hardcoded default**.
//!
//! # Example config
//!
//! ```toml
//! templates_dir = "~/scaffold/templates"
//! output_dir = "~/Projects"
//! template = "defaults/ace_basic.json"
//!
//! [watch]
//! dir = "~/Dropbox/automation/incoming"
//! seen_log = "~/Dropbox/automation/logs/seen_files.txt"
//! output_dir = "~/Projects/clients"
//! template = "defaults/ace_basic.json"
//! interval_secs = 10
//! wait_interval_ms = 500
//! wait_timeout_secs = 20
//! generator = "/usr/local/bin/scaffold-dirs"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level configuration file structure.
///
/// All fields are `Option<T>` so we can detect which values are present in the
/// config file and apply layered configuration (CLI > config file > defaults).
#[derive(Deserialize, Default, Debug)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Root of the template store
    pub templates_dir: Option<PathBuf>,

    /// Default output root for generation
    pub output_dir: Option<PathBuf>,

    /// Default template identifier for `--generate`
    pub template: Option<String>,

    /// Watcher options
    #[serde(default)]
    pub watch: FileWatchConfig,
}

/// Watcher options from the configuration file.
#[derive(Deserialize, Default, Debug)]
#[serde(deny_unknown_fields)]
pub struct FileWatchConfig {
    /// Directory polled for descriptors
    pub dir: Option<PathBuf>,

    /// Log of descriptor names already processed
    pub seen_log: Option<PathBuf>,

    /// Output root for watcher-triggered generation
    pub output_dir: Option<PathBuf>,

    /// Template used for watcher-triggered generation
    pub template: Option<String>,

    /// Seconds between polls
    pub interval_secs: Option<u64>,

    /// Milliseconds between checks for the generated directory
    pub wait_interval_ms: Option<u64>,

    /// Seconds to wait for the generated directory
    pub wait_timeout_secs: Option<u64>,

    /// Generator executable; defaults to the running binary
    pub generator: Option<PathBuf>,
}

/// Expand a leading `~` in a path to the user's home directory.
///
/// Paths that don't start with `~` are returned unchanged.
#[must_use]
pub fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}

impl FileConfig {
    /// Returns the path where the configuration file is expected.
    ///
    /// The configuration file is located at `<config_dir>/scaffold-dirs/config.toml`,
    /// where `<config_dir>` is the platform-specific configuration directory
    /// (e.g., `~/.config` on Linux, `%APPDATA%` on Windows).
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("scaffold-dirs").join("config.toml"))
    }

    /// Load configuration from the default config file location.
    ///
    /// If the config file doesn't exist, returns a default (empty) configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// contains invalid TOML or unexpected fields.
    pub fn load() -> anyhow::Result<Self> {
        let Some(path) = Self::config_path() else {
            return Ok(Self::default());
        };

        Self::load_from(&path)
    }

    /// Load configuration from an explicit path; a missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load).
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file at {}: {e}", path.display())
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file at {}: {e}", path.display())
        })?;

        Ok(config)
    }
}
