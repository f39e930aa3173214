//! Read-side operations over the snippet table.
//!
//! Everything here is a linear scan in key order, generic over redb's
//! `ReadableTable` so the same code serves read snapshots and the inside of
//! write transactions.

use crate::core::db::error::DatabaseError;
use crate::types::{Snippet, SnippetId, VersionedRecord};
use redb::ReadableTable;

/// Snippets split into the pinned ones and the rest, each in id order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Listing {
    pub pinned: Vec<Snippet>,
    pub others: Vec<Snippet>,
}

impl Listing {
    fn push(&mut self, snippet: Snippet) {
        if snippet.pinned {
            self.pinned.push(snippet);
        } else {
            self.others.push(snippet);
        }
    }

    pub fn len(&self) -> usize {
        self.pinned.len() + self.others.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pinned.is_empty() && self.others.is_empty()
    }

    /// Pinned snippets first, then the others.
    pub fn iter(&self) -> impl Iterator<Item = &Snippet> {
        self.pinned.iter().chain(self.others.iter())
    }

    pub fn ids(&self) -> Vec<SnippetId> {
        self.iter().map(|snippet| snippet.id).collect()
    }
}

impl IntoIterator for Listing {
    type Item = Snippet;
    type IntoIter = std::iter::Chain<std::vec::IntoIter<Snippet>, std::vec::IntoIter<Snippet>>;

    fn into_iter(self) -> Self::IntoIter {
        self.pinned.into_iter().chain(self.others)
    }
}

/// Returns every snippet in key order.
pub(crate) fn scan<T>(table: &T) -> Result<Vec<Snippet>, DatabaseError>
where
    T: ReadableTable<SnippetId, VersionedRecord>,
{
    let mut snippets = Vec::new();

    for entry in table.iter()? {
        let (id, record) = entry?;
        snippets.push(Snippet::from_versioned(id.value(), record.value()));
    }

    Ok(snippets)
}

pub(crate) fn get<T>(table: &T, id: SnippetId) -> Result<Option<Snippet>, DatabaseError>
where
    T: ReadableTable<SnippetId, VersionedRecord>,
{
    Ok(table
        .get(id)?
        .map(|guard| Snippet::from_versioned(id, guard.value())))
}

/// Resolves an id-or-alias argument.
///
/// An exact id match wins; otherwise the first snippet in key order whose alias
/// equals `target`. Aliases are not unique, so later holders of the same alias
/// are unreachable through this lookup.
pub(crate) fn find<T>(table: &T, target: &str) -> Result<Option<Snippet>, DatabaseError>
where
    T: ReadableTable<SnippetId, VersionedRecord>,
{
    if let Some(id) = SnippetId::parse_exact(target)
        && let Some(snippet) = get(table, id)?
    {
        return Ok(Some(snippet));
    }

    for entry in table.iter()? {
        let (id, record) = entry?;
        let snippet = Snippet::from_versioned(id.value(), record.value());
        if snippet.has_alias(target) {
            return Ok(Some(snippet));
        }
    }

    Ok(None)
}

pub(crate) fn list<T>(table: &T) -> Result<Listing, DatabaseError>
where
    T: ReadableTable<SnippetId, VersionedRecord>,
{
    filter(table, |_| true)
}

/// Case-insensitive substring search over text, tag and alias.
///
/// An empty query matches everything.
pub(crate) fn search<T>(table: &T, query: &str) -> Result<Listing, DatabaseError>
where
    T: ReadableTable<SnippetId, VersionedRecord>,
{
    let needle = query.to_lowercase();
    filter(table, |snippet| snippet.contains_lowercase(&needle))
}

fn filter<T>(table: &T, predicate: impl Fn(&Snippet) -> bool) -> Result<Listing, DatabaseError>
where
    T: ReadableTable<SnippetId, VersionedRecord>,
{
    let mut listing = Listing::default();

    for snippet in scan(table)? {
        if predicate(&snippet) {
            listing.push(snippet);
        }
    }

    Ok(listing)
}
