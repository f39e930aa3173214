//! `grbd`: background clipboard capture for the grb snippet store.

pub mod args;
pub mod watcher;

use anyhow::Context;
use args::Resolved;
use grb_core::clipboard::SystemClipboard;
use grb_core::core::GrbCore;
use watcher::{StopSignal, Watcher};

/// Opens the store and watches the system clipboard until `stop` is set.
pub fn run(resolved: Resolved, stop: &StopSignal) -> anyhow::Result<()> {
    for warning in &resolved.warnings {
        tracing::warn!("config: {warning}");
    }

    let db_path = resolved.config.db_path();
    let core = GrbCore::open(resolved.config)
        .with_context(|| format!("cannot open snippet store at {}", db_path.display()))?;

    let mut watcher = Watcher::new(core, SystemClipboard, resolved.settings);
    watcher.run(stop);
    Ok(())
}
