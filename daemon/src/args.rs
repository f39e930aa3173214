use crate::watcher::WatchSettings;
use anyhow::Context;
use clap::Parser;
use grb_core::types::{AppConfig, Config, LockPolicy};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Default)]
#[command(name = "grbd")]
#[command(about = "Watches the clipboard and saves new text as grb snippets", long_about = None)]
pub struct Args {
    /// Data directory (defaults to $GRB_DATA_DIR, then the platform location)
    #[arg(long, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Milliseconds between clipboard polls
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_ms: Option<u64>,

    /// Tag for captured snippets
    #[arg(long)]
    pub tag: Option<String>,
}

/// Everything the daemon needs to start, after merging flags over config.toml.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub config: Config,
    pub settings: WatchSettings,
    /// Problems found in config.toml; the affected values fell back to defaults.
    pub warnings: Vec<String>,
}

impl Args {
    pub fn resolve(&self) -> anyhow::Result<Resolved> {
        let mut config = match &self.data_dir {
            Some(dir) => Config::new(dir),
            None => Config::from_env(),
        };

        let config_path = config.config_path();
        let app = AppConfig::load(&config_path)
            .with_context(|| format!("failed to load {}", config_path.display()))?;
        let warnings = app.validate();
        let app = app.with_defaults_for_invalid();

        config.lock = LockPolicy::from(&app.storage);

        let mut settings = WatchSettings::from(&app.daemon);
        if let Some(ms) = self.interval_ms {
            settings.interval = Duration::from_millis(ms);
        }
        if let Some(tag) = &self.tag {
            settings.tag = tag.clone();
        }

        Ok(Resolved {
            config,
            settings,
            warnings,
        })
    }
}
