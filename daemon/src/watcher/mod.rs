//! Clipboard polling loop.
//!
//! Every tick reads the clipboard and captures the text as a new snippet when
//! it is non-empty and differs from the last captured text. The store is only
//! held for the duration of a capture, so commands run freely between ticks.

use grb_core::clipboard::Clipboard;
use grb_core::core::GrbCore;
use grb_core::core::error::GrbError;
use grb_core::types::{DaemonConfig, Snippet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant, SystemTime};

/// How often a waiting loop checks whether it was asked to stop.
const STOP_CHECK_INTERVAL: Duration = Duration::from_millis(50);

/// Characters of captured text shown in the capture log line.
const PREVIEW_CHARS: usize = 60;

/// Shared flag asking the loop to exit.
///
/// Clones observe the same flag. The binary hands [`StopSignal::flag`] to
/// `signal_hook::flag::register` so SIGINT and SIGTERM set it.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    flag: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    pub fn stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Sleeps for up to `timeout`. Returns `true` if stopped before or during the wait.
    pub fn wait(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;

        loop {
            if self.is_stopped() {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            std::thread::sleep(STOP_CHECK_INTERVAL.min(deadline - now));
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchSettings {
    /// Tag given to captured snippets.
    pub tag: String,
    pub interval: Duration,
}

impl From<&DaemonConfig> for WatchSettings {
    fn from(config: &DaemonConfig) -> Self {
        Self {
            tag: config.auto_tag.clone(),
            interval: config.poll_interval(),
        }
    }
}

pub struct Watcher {
    core: GrbCore,
    clipboard: Box<dyn Clipboard>,
    settings: WatchSettings,
    last: Option<String>,
}

impl Watcher {
    pub fn new(core: GrbCore, clipboard: impl Clipboard + 'static, settings: WatchSettings) -> Self {
        Self {
            core,
            clipboard: Box::new(clipboard),
            settings,
            last: None,
        }
    }

    pub fn settings(&self) -> &WatchSettings {
        &self.settings
    }

    /// Polls the clipboard once, returning the captured snippet if there was one.
    ///
    /// `last` only moves after a successful capture, so a failed capture is
    /// retried on the next tick.
    pub fn tick(&mut self, now: SystemTime) -> Result<Option<Snippet>, GrbError> {
        let text = self.clipboard.read_text()?;
        if text.is_empty() || self.last.as_deref() == Some(text.as_str()) {
            return Ok(None);
        }

        let snippet = self.core.capture(&text, &self.settings.tag, "", now)?;
        tracing::info!(
            id = %snippet.id,
            tag = %snippet.tag,
            preview = %preview(&text),
            "captured clipboard text"
        );

        self.last = Some(text);
        Ok(Some(snippet))
    }

    /// Ticks until `stop` is set. Per-tick failures are logged and skipped.
    pub fn run(&mut self, stop: &StopSignal) {
        tracing::info!(
            store = %self.core.db_path().display(),
            interval = ?self.settings.interval,
            tag = %self.settings.tag,
            "watching clipboard"
        );

        while !stop.is_stopped() {
            if let Err(err) = self.tick(SystemTime::now()) {
                tracing::warn!(error = %err, "clipboard poll failed");
            }
            if stop.wait(self.settings.interval) {
                break;
            }
        }

        tracing::info!("clipboard watcher stopped");
    }
}

fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars
        .by_ref()
        .take(PREVIEW_CHARS)
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();

    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}
