//! Document identity and the stored-document envelope

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Store-assigned document identifier
///
/// Ids are handed out in increasing order by every collection, so ordering by
/// id is insertion order. On the wire the id is always a string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(u64);

impl DocumentId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Big-endian key bytes, so sled iterates in id order
    pub fn to_key(&self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    pub fn from_key(key: &[u8]) -> Option<Self> {
        let arr: [u8; 8] = key.try_into().ok()?;
        Some(Self(u64::from_be_bytes(arr)))
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl FromStr for DocumentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        u64::from_str_radix(s, 16).map(Self)
    }
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A document together with its id
///
/// Serializes as the document's own fields plus `_id`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Stored<D> {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    #[serde(flatten)]
    pub doc: D,
}

impl<D> Stored<D> {
    pub fn new(id: DocumentId, doc: D) -> Self {
        Self { id, doc }
    }
}
