//! Configuration loading and management
//!
//! Handles parsing of `config.toml` in the taskbox data directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::storage;

/// File name of the configuration inside the data directory
pub const CONFIG_FILE: &str = "config.toml";

const MAX_REMOVE_TRANSITION_MS: u64 = 5000;
const MIN_POLL_MS: u64 = 10;
const MAX_POLL_MS: u64 = 1000;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Where the task list is stored
    #[serde(default)]
    pub storage: StorageConfig,

    /// Terminal UI behaviour
    #[serde(default)]
    pub ui: UiConfig,
}

/// Storage-related configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageConfig {
    /// Key the task list blob is stored under
    #[serde(default = "default_key")]
    pub key: String,
}

fn default_key() -> String {
    storage::DEFAULT_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { key: default_key() }
    }
}

/// UI-related configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UiConfig {
    /// How long a deleted row fades before it is removed
    #[serde(default = "default_remove_transition_ms")]
    pub remove_transition_ms: u64,

    /// Event poll interval, which is also the animation tick
    #[serde(default = "default_poll_ms")]
    pub poll_ms: u64,
}

fn default_remove_transition_ms() -> u64 {
    300
}

fn default_poll_ms() -> u64 {
    50
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            remove_transition_ms: default_remove_transition_ms(),
            poll_ms: default_poll_ms(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `config.toml` from the data directory, or return defaults
    pub fn load_from_dir(dir: &Path) -> Self {
        let path = Self::path_in(dir);
        if !path.exists() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring invalid config");
                Self::default()
            }
        }
    }

    /// Path of the config file inside `dir`
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILE)
    }

    fn validate(&self) -> Result<()> {
        storage::validate_key(&self.storage.key)?;
        self.ui.validate()?;
        Ok(())
    }
}

impl UiConfig {
    fn validate(&self) -> Result<()> {
        if self.remove_transition_ms > MAX_REMOVE_TRANSITION_MS {
            return Err(Error::InvalidConfig(format!(
                "ui.remove_transition_ms must be at most {MAX_REMOVE_TRANSITION_MS}"
            )));
        }
        if !(MIN_POLL_MS..=MAX_POLL_MS).contains(&self.poll_ms) {
            return Err(Error::InvalidConfig(format!(
                "ui.poll_ms must be between {MIN_POLL_MS} and {MAX_POLL_MS}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_are_expected() {
        let cfg = Config::default();
        assert_eq!(cfg.storage.key, "tasks");
        assert_eq!(cfg.ui.remove_transition_ms, 300);
        assert_eq!(cfg.ui.poll_ms, 50);
    }

    #[test]
    fn load_parses_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        let content = r#"
[storage]
key = "work-tasks"

[ui]
remove_transition_ms = 0
poll_ms = 100
"#;
        fs::write(&path, content.trim()).expect("write config");

        let cfg = Config::load(&path).expect("load config");
        assert_eq!(cfg.storage.key, "work-tasks");
        assert_eq!(cfg.ui.remove_transition_ms, 0);
        assert_eq!(cfg.ui.poll_ms, 100);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[ui]\nremove_transition_ms = 150\n").expect("write config");

        let cfg = Config::load(&path).expect("load config");
        assert_eq!(cfg.storage.key, "tasks");
        assert_eq!(cfg.ui.remove_transition_ms, 150);
        assert_eq!(cfg.ui.poll_ms, 50);
    }

    #[test]
    fn invalid_key_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[storage]\nkey = \"../etc\"\n").expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        match err {
            Error::InvalidConfig(_) => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn out_of_range_poll_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[ui]\npoll_ms = 0\n").expect("write config");

        assert!(matches!(Config::load(&path), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn load_from_dir_defaults_when_missing_or_invalid() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(Config::load_from_dir(dir.path()), Config::default());

        fs::write(Config::path_in(dir.path()), "storage = 12").expect("write config");
        assert_eq!(Config::load_from_dir(dir.path()), Config::default());
    }
}
