//! Persisted id sequence.
//!
//! The counter lives in the metadata table and is advanced inside the caller's
//! write transaction, so an id is only consumed if that transaction commits.
//! Ids are never derived from the keys currently stored: deleting the newest
//! snippet must not let its id be handed out again.

use crate::core::db::error::DatabaseError;
use crate::types::SnippetId;
use redb::{ReadTransaction, ReadableTable, TableDefinition, WriteTransaction};

pub struct Sequence {
    definition: TableDefinition<'static, &'static str, u64>,
    name: &'static str,
}

impl Sequence {
    /// Creates a sequence stored under `name` in the given table.
    pub const fn new(definition: TableDefinition<'static, &'static str, u64>, name: &'static str) -> Self {
        Self { definition, name }
    }

    /// Initializes the table and seeds the counter at the first id if absent.
    pub fn init(&self, txn: &WriteTransaction) -> Result<(), DatabaseError> {
        let mut table = txn.open_table(self.definition)?;
        if table.get(self.name)?.is_none() {
            table.insert(self.name, SnippetId::FIRST.get())?;
        }
        Ok(())
    }

    /// Returns the next id and advances the counter.
    pub fn next(&self, txn: &WriteTransaction) -> Result<SnippetId, DatabaseError> {
        let mut table = txn.open_table(self.definition)?;

        let current = table
            .get(self.name)?
            .map(|guard| SnippetId::new(guard.value()))
            .unwrap_or(SnippetId::FIRST);
        let following = current
            .successor()
            .ok_or(DatabaseError::SequenceExhausted)?;

        table.insert(self.name, following.get())?;
        Ok(current)
    }

    /// Returns the id the next call to [`next`](Self::next) would hand out.
    pub fn peek(&self, txn: &ReadTransaction) -> Result<SnippetId, DatabaseError> {
        let table = txn.open_table(self.definition)?;
        Ok(table
            .get(self.name)?
            .map(|guard| SnippetId::new(guard.value()))
            .unwrap_or(SnippetId::FIRST))
    }
}
