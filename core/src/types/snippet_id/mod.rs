use redb::TypeName;
use std::cmp::Ordering;
use std::fmt;

/// Identifier of a stored snippet.
///
/// Ids are allocated from the store's persisted sequence and are never reused.
/// They are keyed as `u64`, so the snippet table iterates in numeric order
/// (`2` before `10`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnippetId(u64);

impl SnippetId {
    pub const FIRST: SnippetId = SnippetId(1);

    pub(crate) const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// Parses a lookup argument that is exactly the decimal rendering of an id.
    ///
    /// `"7"` parses, `"07"`, `"+7"` and `" 7"` do not, since lookups compare the
    /// rendered id string verbatim.
    pub fn parse_exact(s: &str) -> Option<Self> {
        let value: u64 = s.parse().ok()?;
        let id = Self(value);
        (id.to_string() == s).then_some(id)
    }

    /// The id that follows this one in allocation order.
    pub(crate) fn successor(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for SnippetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl redb::Key for SnippetId {
    fn compare(data1: &[u8], data2: &[u8]) -> Ordering {
        <u64 as redb::Key>::compare(data1, data2)
    }
}

impl redb::Value for SnippetId {
    type SelfType<'a> = SnippetId;
    type AsBytes<'a> = [u8; 8];

    fn fixed_width() -> Option<usize> {
        Some(8)
    }

    fn from_bytes<'a>(data: &'a [u8]) -> Self::SelfType<'a>
    where
        Self: 'a,
    {
        SnippetId(<u64 as redb::Value>::from_bytes(data))
    }

    fn as_bytes<'a, 'b: 'a>(value: &'a Self::SelfType<'b>) -> Self::AsBytes<'a>
    where
        Self: 'b,
    {
        value.0.to_le_bytes()
    }

    fn type_name() -> TypeName {
        TypeName::new("grb::SnippetId")
    }
}
