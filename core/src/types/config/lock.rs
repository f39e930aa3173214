use super::StorageConfig;
use std::time::Duration;

/// How long to wait for another process to release the store file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LockPolicy {
    pub timeout: Duration,
    pub retry_interval: Duration,
}

impl Default for LockPolicy {
    fn default() -> Self {
        Self::from(&StorageConfig::default())
    }
}

impl From<&StorageConfig> for LockPolicy {
    fn from(config: &StorageConfig) -> Self {
        Self {
            timeout: Duration::from_millis(config.lock_timeout_ms),
            retry_interval: Duration::from_millis(config.lock_retry_ms),
        }
    }
}
