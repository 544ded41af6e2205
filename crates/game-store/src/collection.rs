//! Collection trait shared by the in-memory and sled adapters

use crate::document::{DocumentId, Stored};
use std::cmp::Ordering;
use std::fmt;

/// Which kind of write was in flight when a store operation failed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteOp {
    Insert,
    Update,
}

impl fmt::Display for WriteOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteOp::Insert => f.write_str("insert"),
            WriteOp::Update => f.write_str("update"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{op} failed on collection {collection}: {reason}")]
    Write {
        op: WriteOp,
        collection: String,
        reason: String,
    },
    #[error("read failed on collection {collection}: {reason}")]
    Read { collection: String, reason: String },
    #[error("document {id} not found in collection {collection}")]
    DocumentNotFound { collection: String, id: DocumentId },
}

impl StoreError {
    /// The write that failed, if this is a write failure
    pub fn write_op(&self) -> Option<WriteOp> {
        match self {
            StoreError::Write { op, .. } => Some(*op),
            StoreError::DocumentNotFound { .. } => Some(WriteOp::Update),
            StoreError::Read { .. } => None,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Result of a conditional upsert
#[derive(Clone, Debug, PartialEq)]
pub enum Upsert<D> {
    /// No document matched; the candidate was inserted
    Inserted(DocumentId),
    /// A document matched and was replaced; holds the previous version
    Updated { previous: Stored<D> },
    /// A document matched and was left as is
    Unchanged { existing: Stored<D> },
}

/// A collection of documents of type `D`
///
/// Reads return documents in store-native order, which for every adapter in
/// this crate is insertion order.
pub trait Collection<D>: Send + Sync {
    /// Collection name (for logging and errors)
    fn name(&self) -> &str;

    /// Insert a document, returning its new id
    fn insert(&self, doc: D) -> StoreResult<DocumentId>;

    /// All documents matching `filter`
    fn find(&self, filter: &dyn Fn(&D) -> bool) -> StoreResult<Vec<Stored<D>>>;

    /// First document matching `filter`
    fn find_one(&self, filter: &dyn Fn(&D) -> bool) -> StoreResult<Option<Stored<D>>> {
        Ok(self.find(filter)?.into_iter().next())
    }

    /// Matching documents ordered by `compare`
    ///
    /// The sort is stable, so documents that compare equal keep store order.
    fn find_sorted(
        &self,
        filter: &dyn Fn(&D) -> bool,
        compare: &dyn Fn(&D, &D) -> Ordering,
    ) -> StoreResult<Vec<Stored<D>>> {
        let mut docs = self.find(filter)?;
        docs.sort_by(|a, b| compare(&a.doc, &b.doc));
        Ok(docs)
    }

    /// Replace the document stored under `id`
    fn update_by_id(&self, id: DocumentId, doc: D) -> StoreResult<()>;

    /// Atomically look up the first document matching `filter` and either
    /// insert `candidate` (no match), replace the match with what `replace`
    /// returns, or leave it when `replace` returns `None`.
    ///
    /// Conditional upserts on one collection never interleave.
    fn upsert_where(
        &self,
        filter: &dyn Fn(&D) -> bool,
        candidate: D,
        replace: &dyn Fn(&D) -> Option<D>,
    ) -> StoreResult<Upsert<D>>;

    /// Number of stored documents
    fn len(&self) -> StoreResult<usize>;

    fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}
