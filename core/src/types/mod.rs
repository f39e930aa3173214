pub(crate) mod config;
pub use config::{AppConfig, AppConfigError, Config, DaemonConfig, LockPolicy, StorageConfig};

pub(crate) mod snippet_id;
pub use snippet_id::SnippetId;

pub(crate) mod record;
pub use record::VersionedRecord;

pub(crate) mod snippet;
pub use snippet::Snippet;
