use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::RecordVariant;

/// Stored fields of a snippet, in on-disk order.
///
/// postcard writes the fields back to back with strings length-prefixed, so the
/// layout stays lossless for any text and still decodes when trailing fields are
/// missing (see [`Record::decode_lenient`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub text: String,
    pub tag: String,
    pub alias: String,
    pub pinned: bool,
    pub use_count: u64,
    /// Time since the UNIX epoch of the last field-mutating operation.
    pub updated_at: Duration,
}

impl RecordVariant for Record {
    const VERSION: u8 = 1;
}

impl Record {
    /// Decodes as many leading fields as `data` holds.
    ///
    /// Fields after the first one that fails to decode keep their defaults.
    /// Returns the record and whether every field was present.
    pub(crate) fn decode_lenient(data: &[u8]) -> (Self, bool) {
        if let Ok(record) = postcard::from_bytes::<Record>(data) {
            return (record, true);
        }

        let mut record = Record::default();
        let mut rest = data;
        let complete = fill(&mut record, &mut rest).is_some();
        (record, complete)
    }
}

fn fill(record: &mut Record, rest: &mut &[u8]) -> Option<()> {
    record.text = take(rest)?;
    record.tag = take(rest)?;
    record.alias = take(rest)?;
    record.pinned = take(rest)?;
    record.use_count = take(rest)?;
    record.updated_at = take(rest)?;
    Some(())
}

fn take<T: for<'de> Deserialize<'de>>(rest: &mut &[u8]) -> Option<T> {
    let (value, tail) = postcard::take_from_bytes::<T>(*rest).ok()?;
    *rest = tail;
    Some(value)
}
