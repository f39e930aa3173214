//! On-disk record codec.
//!
//! Each stored value is one version byte followed by the postcard encoding of
//! that version's [`Record`](v1::Record). Decoding never fails: missing trailing
//! fields fall back to their defaults, and unreadable payloads decode to an empty
//! record.

use redb::TypeName;
pub use v1 as latest_record;

pub mod v1;

pub trait RecordVariant {
    const VERSION: u8;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionedRecord {
    V1(v1::Record),
}

impl VersionedRecord {
    pub fn into_latest(self) -> latest_record::Record {
        match self {
            VersionedRecord::V1(record) => record,
        }
    }
}

impl From<latest_record::Record> for VersionedRecord {
    fn from(record: latest_record::Record) -> Self {
        VersionedRecord::V1(record)
    }
}

/// Serializes a record into its stored byte form.
pub fn encode(record: &VersionedRecord) -> Vec<u8> {
    match record {
        VersionedRecord::V1(v1) => postcard::to_extend(v1, vec![v1::Record::VERSION])
            .expect("postcard serialization into a Vec cannot fail"),
    }
}

/// Deserializes a stored byte string, defaulting whatever cannot be read.
pub fn decode(data: &[u8]) -> VersionedRecord {
    let Some((version, payload)) = data.split_first() else {
        tracing::warn!("empty snippet record, decoding as blank");
        return VersionedRecord::V1(v1::Record::default());
    };

    match *version {
        v1::Record::VERSION => {
            let (record, complete) = v1::Record::decode_lenient(payload);
            if !complete {
                tracing::debug!(
                    len = payload.len(),
                    "snippet record is missing trailing fields, using defaults"
                );
            }
            VersionedRecord::V1(record)
        }
        version => {
            tracing::warn!(version, "unsupported snippet record version, decoding as blank");
            VersionedRecord::V1(v1::Record::default())
        }
    }
}

impl redb::Value for VersionedRecord {
    type SelfType<'a> = VersionedRecord;
    type AsBytes<'a> = Vec<u8>;

    fn fixed_width() -> Option<usize> {
        None
    }

    fn from_bytes<'a>(data: &'a [u8]) -> Self::SelfType<'a>
    where
        Self: 'a,
    {
        decode(data)
    }

    fn as_bytes<'a, 'b: 'a>(value: &'a Self::SelfType<'b>) -> Self::AsBytes<'a>
    where
        Self: 'b,
    {
        encode(value)
    }

    fn type_name() -> TypeName {
        TypeName::new("grb::Record")
    }
}
