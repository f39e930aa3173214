//! Snippet store operations: the API the CLI, TUI and daemon call into.

use crate::clipboard::{Clipboard, ClipboardError, SystemClipboard};
use crate::core::db::Database;
use crate::core::db::error::DatabaseError;
use crate::types::{Config, Snippet, SnippetId};
use error::GrbError;
use std::path::Path;
use std::time::SystemTime;

pub(crate) mod db;
pub(crate) mod query;
pub(crate) mod stats;

pub use db::error as db_error;
pub use query::Listing;
pub use stats::Stats;

pub mod error {
    use super::*;
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum GrbError {
        #[error("Database error: {0}")]
        Database(#[from] DatabaseError),

        #[error("Clipboard error: {0}")]
        Clipboard(#[from] ClipboardError),

        #[error("Snippet not found: {0}")]
        NotFound(String),
    }

    impl GrbError {
        pub fn is_not_found(&self) -> bool {
            matches!(self, Self::NotFound(_))
        }

        /// True when the store file cannot be opened or created at all.
        pub fn is_storage_unavailable(&self) -> bool {
            matches!(self, Self::Database(err) if err.is_unavailable())
        }
    }
}

/// Which snippets [`GrbCore::clear`] removes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClearFilter {
    All,
    /// Snippets whose tag equals this one. An empty tag matches nothing.
    ByTag(String),
    UnpinnedOnly,
}

impl ClearFilter {
    pub fn matches(&self, snippet: &Snippet) -> bool {
        match self {
            ClearFilter::All => true,
            ClearFilter::ByTag(tag) => !tag.is_empty() && snippet.tag == *tag,
            ClearFilter::UnpinnedOnly => !snippet.pinned,
        }
    }
}

/// Text handed to an external editor by [`GrbCore::begin_edit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub id: SnippetId,
    pub text: String,
}

pub struct GrbCore {
    db: Database,
    clipboard: Box<dyn Clipboard>,
}

impl GrbCore {
    /// Opens the store using the system clipboard.
    pub fn open(config: Config) -> Result<Self, GrbError> {
        Self::with_clipboard(config, SystemClipboard)
    }

    pub fn with_clipboard(
        config: Config,
        clipboard: impl Clipboard + 'static,
    ) -> Result<Self, GrbError> {
        let db = Database::open(&config)?;
        tracing::debug!(path = %db.path().display(), "snippet store opened");

        Ok(Self {
            db,
            clipboard: Box::new(clipboard),
        })
    }

    /// Returns the store file path.
    pub fn db_path(&self) -> &Path {
        self.db.path()
    }
}

/// Read operations.
impl GrbCore {
    /// Finds a snippet by exact id, falling back to the first exact alias match.
    pub fn lookup(&self, id_or_alias: &str) -> Result<Snippet, GrbError> {
        self.db
            .read(|view| view.find(id_or_alias))?
            .ok_or_else(|| GrbError::NotFound(id_or_alias.to_string()))
    }

    pub fn list(&self) -> Result<Listing, GrbError> {
        Ok(self.db.read(|view| view.list())?)
    }

    pub fn search(&self, query: &str) -> Result<Listing, GrbError> {
        Ok(self.db.read(|view| view.search(query))?)
    }

    pub fn stats(&self) -> Result<Stats, GrbError> {
        Ok(self.db.read(|view| view.stats())?)
    }

    pub fn count(&self) -> Result<u64, GrbError> {
        Ok(self.db.read(|view| view.count())?)
    }

    /// The id the next saved snippet will receive.
    pub fn next_id(&self) -> Result<SnippetId, GrbError> {
        Ok(self.db.read(|view| view.next_id())?)
    }
}

/// Create operations.
impl GrbCore {
    /// Saves a new snippet and puts its text on the clipboard.
    ///
    /// The clipboard write happens inside the transaction; if it fails nothing is
    /// saved and no id is consumed.
    pub fn save(
        &mut self,
        text: &str,
        tag: &str,
        alias: &str,
        now: SystemTime,
    ) -> Result<Snippet, GrbError> {
        let clipboard = &self.clipboard;
        self.db.write(|view| {
            let snippet = Snippet::new(view.next_id()?, text, tag, alias, now);
            view.put(&snippet)?;
            clipboard.write_text(text)?;
            Ok(snippet)
        })
    }

    /// Saves a new snippet without touching the clipboard.
    ///
    /// Used for text that was just read from the clipboard.
    pub fn capture(
        &mut self,
        text: &str,
        tag: &str,
        alias: &str,
        now: SystemTime,
    ) -> Result<Snippet, GrbError> {
        self.db.write(|view| {
            let snippet = Snippet::new(view.next_id()?, text, tag, alias, now);
            view.put(&snippet)?;
            Ok(snippet)
        })
    }
}

/// Update operations.
///
/// Each one reads the target and writes it back in the same transaction.
impl GrbCore {
    /// Puts a snippet's text on the clipboard and bumps its use count.
    ///
    /// Returns the snippet after the increment.
    pub fn copy(&mut self, id_or_alias: &str, now: SystemTime) -> Result<Snippet, GrbError> {
        let clipboard = &self.clipboard;
        self.update(id_or_alias, |snippet| {
            clipboard.write_text(&snippet.text)?;
            snippet.use_count = snippet.use_count.saturating_add(1);
            snippet.updated_at = now;
            Ok(())
        })
    }

    /// Toggles the pinned flag.
    pub fn pin(&mut self, id_or_alias: &str, now: SystemTime) -> Result<Snippet, GrbError> {
        self.update(id_or_alias, |snippet| {
            snippet.pinned = !snippet.pinned;
            snippet.updated_at = now;
            Ok(())
        })
    }

    /// Replaces the alias. Does not check whether another snippet uses it.
    pub fn rename(&mut self, id_or_alias: &str, new_alias: &str) -> Result<Snippet, GrbError> {
        self.update(id_or_alias, |snippet| {
            snippet.alias = new_alias.to_string();
            Ok(())
        })
    }

    /// First half of an edit: the current text for the editor.
    pub fn begin_edit(&self, id_or_alias: &str) -> Result<EditDraft, GrbError> {
        let snippet = self.lookup(id_or_alias)?;
        Ok(EditDraft {
            id: snippet.id,
            text: snippet.text,
        })
    }

    /// Second half of an edit: stores the edited text.
    ///
    /// Fails with `NotFound` if the snippet was deleted while the editor was open.
    pub fn commit_edit(
        &mut self,
        draft: &EditDraft,
        new_text: &str,
        now: SystemTime,
    ) -> Result<Snippet, GrbError> {
        self.db.write(|view| {
            let mut snippet = view
                .get(draft.id)?
                .ok_or_else(|| GrbError::NotFound(draft.id.to_string()))?;

            snippet.text = new_text.to_string();
            snippet.updated_at = now;
            view.put(&snippet)?;
            Ok(snippet)
        })
    }

    fn update(
        &self,
        id_or_alias: &str,
        mutate: impl FnOnce(&mut Snippet) -> Result<(), GrbError>,
    ) -> Result<Snippet, GrbError> {
        self.db.write(|view| {
            let mut snippet = view
                .find(id_or_alias)?
                .ok_or_else(|| GrbError::NotFound(id_or_alias.to_string()))?;

            mutate(&mut snippet)?;
            view.put(&snippet)?;
            Ok(snippet)
        })
    }
}

/// Delete operations.
impl GrbCore {
    /// Removes the snippet `id_or_alias` resolves to and returns it.
    pub fn delete(&mut self, id_or_alias: &str) -> Result<Snippet, GrbError> {
        self.db.write(|view| {
            let snippet = view
                .find(id_or_alias)?
                .ok_or_else(|| GrbError::NotFound(id_or_alias.to_string()))?;

            view.remove(snippet.id)?;
            Ok(snippet)
        })
    }

    /// Removes every snippet matching `filter`, returning how many were removed.
    pub fn clear(&mut self, filter: &ClearFilter) -> Result<usize, GrbError> {
        let removed = self
            .db
            .write(|view| view.remove_where(|snippet| filter.matches(snippet)))?;

        tracing::debug!(?filter, removed, "cleared snippets");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests;
