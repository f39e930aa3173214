use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// User-facing configuration, persisted as config.toml in the data directory.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub daemon: DaemonConfig,
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default config if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, AppConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves config to a TOML file.
    pub fn save(&self, path: &Path) -> Result<(), AppConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validates config values and returns list of validation errors.
    /// Returns empty vec if config is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.storage.lock_retry_ms == 0 {
            errors.push("storage.lock_retry_ms must be at least 1".to_string());
        }

        if self.daemon.poll_interval_ms == 0 {
            errors.push("daemon.poll_interval_ms must be at least 1".to_string());
        }

        if self.daemon.auto_tag.trim().is_empty() {
            errors.push("daemon.auto_tag must not be empty".to_string());
        }

        errors
    }

    /// Returns a validated config, replacing invalid values with defaults.
    pub fn with_defaults_for_invalid(&self) -> Self {
        let defaults = Self::default();
        Self {
            storage: StorageConfig {
                lock_timeout_ms: self.storage.lock_timeout_ms,
                lock_retry_ms: if self.storage.lock_retry_ms == 0 {
                    defaults.storage.lock_retry_ms
                } else {
                    self.storage.lock_retry_ms
                },
            },
            daemon: DaemonConfig {
                poll_interval_ms: if self.daemon.poll_interval_ms == 0 {
                    defaults.daemon.poll_interval_ms
                } else {
                    self.daemon.poll_interval_ms
                },
                auto_tag: if self.daemon.auto_tag.trim().is_empty() {
                    defaults.daemon.auto_tag
                } else {
                    self.daemon.auto_tag.clone()
                },
            },
        }
    }
}

/// Store file locking settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// How long an operation waits for another process holding the store.
    /// Zero fails immediately when the store is busy.
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
    #[serde(default = "default_lock_retry_ms")]
    pub lock_retry_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            lock_timeout_ms: default_lock_timeout_ms(),
            lock_retry_ms: default_lock_retry_ms(),
        }
    }
}

/// Clipboard watcher settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaemonConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Tag given to auto-captured snippets.
    #[serde(default = "default_auto_tag")]
    pub auto_tag: String,
}

impl DaemonConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            auto_tag: default_auto_tag(),
        }
    }
}

fn default_lock_timeout_ms() -> u64 {
    10_000
}

fn default_lock_retry_ms() -> u64 {
    25
}

fn default_poll_interval_ms() -> u64 {
    1_000
}

fn default_auto_tag() -> String {
    "auto".to_string()
}

/// Errors that can occur when loading or saving config.
#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
