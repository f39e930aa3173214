//! Database layer for grb storage.
//!
//! This module handles all redb operations:
//! - Snippet storage (SnippetId → VersionedRecord)
//! - The id sequence counter (metadata table)
//! - Acquiring the store file for the duration of one transaction
//!
//! The file is opened per transaction and released when the transaction ends.
//! redb holds an exclusive OS lock on an open file, so that lock is what
//! serializes writers across processes; a command that finds the file held by
//! the daemon (or another command) retries until it frees up.

use crate::core::db::error::DatabaseError;
use crate::core::db::sequence::Sequence;
use crate::core::query::{self, Listing};
use crate::core::stats::Stats;
use crate::types::{Config, LockPolicy, Snippet, SnippetId, VersionedRecord};
use redb::{ReadOnlyTable, ReadTransaction, ReadableDatabase, Table, TableDefinition, WriteTransaction};
use std::path::{Path, PathBuf};
use std::time::Instant;

pub mod error {
    use std::path::PathBuf;
    use std::time::Duration;
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum DatabaseError {
        #[error("Store unavailable at {path}: {source}")]
        Unavailable {
            path: PathBuf,
            #[source]
            source: redb::DatabaseError,
        },

        #[error("Cannot reopen store at {path}: {source}")]
        Reopen {
            path: PathBuf,
            #[source]
            source: redb::DatabaseError,
        },

        #[error("Cannot create store directory {path}: {source}")]
        CreateDir {
            path: PathBuf,
            #[source]
            source: std::io::Error,
        },

        #[error("Store is held by another process (waited {waited:?})")]
        StoreBusy { waited: Duration },

        #[error("Table error: {0}")]
        TableError(#[from] redb::TableError),

        #[error("Storage error: {0}")]
        StorageError(#[from] redb::StorageError),

        #[error("Transaction error: {0}")]
        TransactionError(#[from] redb::TransactionError),

        #[error("Commit error: {0}")]
        CommitError(#[from] redb::CommitError),

        #[error("Snippet id sequence exhausted")]
        SequenceExhausted,
    }

    impl DatabaseError {
        /// True when the store file itself cannot be opened or created.
        pub fn is_unavailable(&self) -> bool {
            matches!(self, Self::Unavailable { .. } | Self::CreateDir { .. })
        }
    }
}

pub(crate) mod sequence;

/// Snippet table: SnippetId → VersionedRecord
pub(crate) const SNIPPETS_TABLE: TableDefinition<SnippetId, VersionedRecord> =
    TableDefinition::new("snippets");

/// Metadata table: &str → u64
const METADATA_TABLE: TableDefinition<&str, u64> = TableDefinition::new("metadata");

/// Next snippet id to hand out.
const SNIPPET_IDS: Sequence = Sequence::new(METADATA_TABLE, "next_id");

/// Handle to the store file.
///
/// Holds no open file between transactions.
pub struct Database {
    path: PathBuf,
    lock: LockPolicy,
}

impl Database {
    /// Creates the store if needed and checks that it can be opened.
    ///
    /// Fails with an unavailable error when the directory or file cannot be
    /// created or the file is not a readable store.
    pub fn open(config: &Config) -> Result<Self, DatabaseError> {
        std::fs::create_dir_all(&config.base_path).map_err(|source| DatabaseError::CreateDir {
            path: config.base_path.clone(),
            source,
        })?;

        let db = Self {
            path: config.db_path(),
            lock: config.lock,
        };

        // Initialize tables
        db.write(|view| {
            SNIPPET_IDS.init(view.txn)?;
            Ok::<_, DatabaseError>(())
        })
        .map_err(|err| match err {
            DatabaseError::Reopen { path, source } => DatabaseError::Unavailable { path, source },
            err => err,
        })?;

        Ok(db)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Runs `f` against a snapshot of the store.
    ///
    /// The snapshot is unaffected by writers committing while `f` runs.
    pub fn read<T, E>(&self, f: impl FnOnce(&ReadView) -> Result<T, E>) -> Result<T, E>
    where
        E: From<DatabaseError>,
    {
        let db = self.acquire()?;
        let txn = db.begin_read().map_err(DatabaseError::from)?;
        let snippets = txn.open_table(SNIPPETS_TABLE).map_err(DatabaseError::from)?;

        f(&ReadView { txn, snippets })
    }

    /// Runs `f` inside one write transaction.
    ///
    /// Everything `f` writes commits together when it returns `Ok`; an `Err`
    /// aborts the transaction and leaves the store as it was.
    pub fn write<T, E>(&self, f: impl FnOnce(&mut WriteView) -> Result<T, E>) -> Result<T, E>
    where
        E: From<DatabaseError>,
    {
        let db = self.acquire()?;
        let txn = db.begin_write().map_err(DatabaseError::from)?;

        let outcome = {
            let snippets = txn.open_table(SNIPPETS_TABLE).map_err(DatabaseError::from)?;
            let mut view = WriteView {
                txn: &txn,
                snippets,
            };
            f(&mut view)
        };

        match outcome {
            Ok(value) => {
                txn.commit().map_err(DatabaseError::from)?;
                tracing::debug!(path = %self.path.display(), "write transaction committed");
                Ok(value)
            }
            Err(err) => {
                if let Err(abort_err) = txn.abort() {
                    tracing::warn!(error = %abort_err, "failed to abort write transaction");
                }
                Err(err)
            }
        }
    }

    /// Opens the store file, waiting while another process holds it.
    ///
    /// Any other failure is `Reopen`; [`open`](Self::open) reports it as
    /// `Unavailable` instead since the store was never usable.
    fn acquire(&self) -> Result<redb::Database, DatabaseError> {
        let started = Instant::now();
        let mut attempts = 0u32;

        loop {
            match redb::Database::create(&self.path) {
                Ok(db) => {
                    if attempts > 0 {
                        tracing::debug!(attempts, waited = ?started.elapsed(), "store acquired");
                    }
                    return Ok(db);
                }
                Err(redb::DatabaseError::DatabaseAlreadyOpen) => {
                    let waited = started.elapsed();
                    if waited >= self.lock.timeout {
                        tracing::warn!(?waited, path = %self.path.display(), "store busy, giving up");
                        return Err(DatabaseError::StoreBusy { waited });
                    }
                    attempts += 1;
                    std::thread::sleep(self.lock.retry_interval);
                }
                Err(source) => {
                    return Err(DatabaseError::Reopen {
                        path: self.path.clone(),
                        source,
                    });
                }
            }
        }
    }
}

/// Read-only access to one snapshot of the snippet table.
pub struct ReadView {
    txn: ReadTransaction,
    snippets: ReadOnlyTable<SnippetId, VersionedRecord>,
}

impl ReadView {
    /// The id the next save will receive.
    pub fn next_id(&self) -> Result<SnippetId, DatabaseError> {
        SNIPPET_IDS.peek(&self.txn)
    }

    pub fn find(&self, target: &str) -> Result<Option<Snippet>, DatabaseError> {
        query::find(&self.snippets, target)
    }

    pub fn list(&self) -> Result<Listing, DatabaseError> {
        query::list(&self.snippets)
    }

    pub fn search(&self, needle: &str) -> Result<Listing, DatabaseError> {
        query::search(&self.snippets, needle)
    }

    pub fn stats(&self) -> Result<Stats, DatabaseError> {
        Stats::collect(&self.snippets)
    }

    pub fn count(&self) -> Result<u64, DatabaseError> {
        use redb::ReadableTableMetadata;
        Ok(self.snippets.len()?)
    }
}

/// Read-write access inside one write transaction.
pub struct WriteView<'txn> {
    txn: &'txn WriteTransaction,
    snippets: Table<'txn, SnippetId, VersionedRecord>,
}

impl WriteView<'_> {
    /// Allocates the next snippet id. Rolled back if the transaction aborts.
    pub fn next_id(&mut self) -> Result<SnippetId, DatabaseError> {
        SNIPPET_IDS.next(self.txn)
    }

    pub fn get(&self, id: SnippetId) -> Result<Option<Snippet>, DatabaseError> {
        query::get(&self.snippets, id)
    }

    pub fn find(&self, target: &str) -> Result<Option<Snippet>, DatabaseError> {
        query::find(&self.snippets, target)
    }

    /// Inserts or overwrites the record stored under `snippet.id`.
    pub fn put(&mut self, snippet: &Snippet) -> Result<(), DatabaseError> {
        self.snippets.insert(snippet.id, snippet.to_versioned())?;
        Ok(())
    }

    /// Returns `true` if the key was present.
    pub fn remove(&mut self, id: SnippetId) -> Result<bool, DatabaseError> {
        Ok(self.snippets.remove(id)?.is_some())
    }

    /// Removes every snippet matching `predicate`, returning how many went.
    pub fn remove_where(
        &mut self,
        predicate: impl Fn(&Snippet) -> bool,
    ) -> Result<usize, DatabaseError> {
        let doomed: Vec<SnippetId> = query::scan(&self.snippets)?
            .into_iter()
            .filter(|snippet| predicate(snippet))
            .map(|snippet| snippet.id)
            .collect();

        for id in &doomed {
            self.snippets.remove(id)?;
        }

        Ok(doomed.len())
    }
}
