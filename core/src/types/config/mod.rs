mod app;
mod core;
mod lock;

pub use app::{AppConfig, AppConfigError, DaemonConfig, StorageConfig};
pub use core::Config;
pub use lock::LockPolicy;
