use crate::types::SnippetId;
use crate::types::record::VersionedRecord;
use crate::types::record::latest_record::Record;
use std::time::{Duration, SystemTime};

/// A stored snippet as handed to callers.
///
/// This is an owned copy; changing it does nothing to the store until it goes
/// back through a [`GrbCore`](crate::core::GrbCore) operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub id: SnippetId,
    pub text: String,
    /// Empty when untagged.
    pub tag: String,
    /// Empty when the snippet has no alias. Not unique.
    pub alias: String,
    pub pinned: bool,
    pub use_count: u64,
    pub updated_at: SystemTime,
}

impl Snippet {
    pub(crate) fn new(id: SnippetId, text: &str, tag: &str, alias: &str, now: SystemTime) -> Self {
        Self {
            id,
            text: text.to_string(),
            tag: tag.to_string(),
            alias: alias.to_string(),
            pinned: false,
            use_count: 0,
            updated_at: now,
        }
    }

    pub(crate) fn from_versioned(id: SnippetId, versioned: VersionedRecord) -> Self {
        let record = versioned.into_latest();
        Self {
            id,
            text: record.text,
            tag: record.tag,
            alias: record.alias,
            pinned: record.pinned,
            use_count: record.use_count,
            updated_at: SystemTime::UNIX_EPOCH + record.updated_at,
        }
    }

    pub(crate) fn to_versioned(&self) -> VersionedRecord {
        let updated_at = self
            .updated_at
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or(Duration::ZERO);

        VersionedRecord::from(Record {
            text: self.text.clone(),
            tag: self.tag.clone(),
            alias: self.alias.clone(),
            pinned: self.pinned,
            use_count: self.use_count,
            updated_at,
        })
    }

    pub fn is_tagged(&self) -> bool {
        !self.tag.is_empty()
    }

    /// An empty alias means "no alias" and never matches.
    pub fn has_alias(&self, alias: &str) -> bool {
        !alias.is_empty() && self.alias == alias
    }

    /// Case-insensitive substring match on text, tag or alias.
    ///
    /// `needle` must already be lowercased.
    pub(crate) fn contains_lowercase(&self, needle: &str) -> bool {
        [&self.text, &self.tag, &self.alias]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}
