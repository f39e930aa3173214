//! Usage statistics over the whole store.

use crate::core::db::error::DatabaseError;
use crate::core::query;
use crate::types::{Snippet, SnippetId, VersionedRecord};
use redb::ReadableTable;
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    /// Snippet count per non-empty tag.
    pub tag_counts: BTreeMap<String, usize>,
    /// The first tag, in key order, to reach the highest count.
    pub top_tag: Option<(String, usize)>,
    /// The first snippet, in key order, to reach the highest use count.
    /// Snippets that were never copied do not qualify.
    pub most_used: Option<Snippet>,
}

impl Stats {
    pub(crate) fn collect<T>(table: &T) -> Result<Self, DatabaseError>
    where
        T: ReadableTable<SnippetId, VersionedRecord>,
    {
        let mut stats = Stats::default();
        for snippet in query::scan(table)? {
            stats.observe(snippet);
        }
        Ok(stats)
    }

    /// Folds one snippet in. Only a strictly greater count displaces a leader.
    fn observe(&mut self, snippet: Snippet) {
        self.total += 1;

        if snippet.is_tagged() {
            let count = self.tag_counts.entry(snippet.tag.clone()).or_insert(0);
            *count += 1;
            let count = *count;

            if count > self.top_tag.as_ref().map_or(0, |(_, top)| *top) {
                self.top_tag = Some((snippet.tag.clone(), count));
            }
        }

        if snippet.use_count > self.most_used.as_ref().map_or(0, |top| top.use_count) {
            self.most_used = Some(snippet);
        }
    }

    pub fn tag_count(&self, tag: &str) -> usize {
        self.tag_counts.get(tag).copied().unwrap_or(0)
    }
}
