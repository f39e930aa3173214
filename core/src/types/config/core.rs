use super::LockPolicy;
use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "GRB_DATA_DIR";

/// Core configuration for GrbCore initialization.
#[derive(Clone, Debug)]
pub struct Config {
    pub base_path: PathBuf,
    pub lock: LockPolicy,
}

impl Config {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            lock: LockPolicy::default(),
        }
    }

    /// Configuration rooted at the default data directory.
    pub fn from_env() -> Self {
        Self::new(default_data_dir())
    }

    pub fn db_path(&self) -> PathBuf {
        self.base_path.join("grb.redb")
    }

    pub fn config_path(&self) -> PathBuf {
        self.base_path.join("config.toml")
    }
}

/// Returns the grb data directory.
///
/// Uses `GRB_DATA_DIR` if set, `%APPDATA%\grb` on Windows and `~/.grb` elsewhere.
pub fn default_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    let platform_dir = if cfg!(windows) {
        dirs::config_dir().map(|dir| dir.join("grb"))
    } else {
        dirs::home_dir().map(|home| home.join(".grb"))
    };

    // Fallback to current directory
    platform_dir.unwrap_or_else(|| PathBuf::from(".grb"))
}
