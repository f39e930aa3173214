//! Clipboard access for reading/writing plain text.
//!
//! [`SystemClipboard`] talks to the OS clipboard; [`MemoryClipboard`] keeps the
//! contents in process and is what tests and headless callers plug in.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("Failed to access clipboard: {0}")]
    AccessFailed(String),

    #[error("Failed to read clipboard: {0}")]
    ReadFailed(String),

    #[error("Failed to write to clipboard: {0}")]
    WriteFailed(String),
}

/// Plain-text clipboard.
pub trait Clipboard: Send {
    /// Returns the current text, or an empty string when the clipboard holds no text.
    fn read_text(&self) -> Result<String, ClipboardError>;

    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// The operating system clipboard.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

use clipboard_rs::{Clipboard as _, ClipboardContext, ContentFormat};

impl Clipboard for SystemClipboard {
    fn read_text(&self) -> Result<String, ClipboardError> {
        let ctx =
            ClipboardContext::new().map_err(|e| ClipboardError::AccessFailed(e.to_string()))?;

        if !ctx.has(ContentFormat::Text) {
            return Ok(String::new());
        }

        ctx.get_text()
            .map_err(|e| ClipboardError::ReadFailed(e.to_string()))
    }

    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let ctx =
            ClipboardContext::new().map_err(|e| ClipboardError::AccessFailed(e.to_string()))?;

        ctx.set_text(text.to_string())
            .map_err(|e| ClipboardError::WriteFailed(e.to_string()))
    }
}

/// In-process clipboard. Clones share the same contents.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    inner: Arc<Mutex<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    text: String,
    unavailable: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: &str) -> Self {
        let clipboard = Self::default();
        clipboard.set_text(text);
        clipboard
    }

    /// Replaces the contents, as another application copying would.
    pub fn set_text(&self, text: &str) {
        self.state().text = text.to_string();
    }

    pub fn text(&self) -> String {
        self.state().text.clone()
    }

    /// Makes every read and write fail until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state().unavailable = unavailable;
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clipboard for MemoryClipboard {
    fn read_text(&self) -> Result<String, ClipboardError> {
        let state = self.state();
        if state.unavailable {
            return Err(ClipboardError::AccessFailed("clipboard unavailable".to_string()));
        }
        Ok(state.text.clone())
    }

    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut state = self.state();
        if state.unavailable {
            return Err(ClipboardError::AccessFailed("clipboard unavailable".to_string()));
        }
        state.text = text.to_string();
        Ok(())
    }
}
