//! In-memory document collection using DashMap for concurrent access

use crate::collection::{Collection, StoreError, StoreResult, Upsert};
use crate::document::{DocumentId, Stored};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Thread-safe in-memory collection
///
/// Reads go straight to the DashMap; conditional upserts are serialized by a
/// write gate. Nothing survives a restart.
#[derive(Clone)]
pub struct MemoryCollection<D> {
    name: String,
    /// Documents by id
    documents: Arc<DashMap<DocumentId, D>>,
    /// Next id to hand out
    next_id: Arc<AtomicU64>,
    /// Held for the whole lookup-then-write of `upsert_where`
    write_gate: Arc<Mutex<()>>,
}

impl<D> MemoryCollection<D>
where
    D: Clone + Send + Sync + 'static,
{
    /// Create a new empty collection
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicU64::new(1)),
            write_gate: Arc::new(Mutex::new(())),
        }
    }

    fn allocate_id(&self) -> DocumentId {
        DocumentId::new(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn insert_unguarded(&self, doc: D) -> DocumentId {
        let id = self.allocate_id();
        self.documents.insert(id, doc);
        id
    }

    /// Remove every document (for testing)
    pub fn clear(&self) {
        self.documents.clear();
    }
}

impl<D> Collection<D> for MemoryCollection<D>
where
    D: Clone + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn insert(&self, doc: D) -> StoreResult<DocumentId> {
        Ok(self.insert_unguarded(doc))
    }

    fn find(&self, filter: &dyn Fn(&D) -> bool) -> StoreResult<Vec<Stored<D>>> {
        let mut docs: Vec<Stored<D>> = self
            .documents
            .iter()
            .filter(|r| filter(r.value()))
            .map(|r| Stored::new(*r.key(), r.value().clone()))
            .collect();
        // DashMap iteration order is arbitrary; ids are insertion order
        docs.sort_by_key(|d| d.id);
        Ok(docs)
    }

    fn update_by_id(&self, id: DocumentId, doc: D) -> StoreResult<()> {
        match self.documents.get_mut(&id) {
            Some(mut slot) => {
                *slot = doc;
                Ok(())
            }
            None => Err(StoreError::DocumentNotFound {
                collection: self.name.clone(),
                id,
            }),
        }
    }

    fn upsert_where(
        &self,
        filter: &dyn Fn(&D) -> bool,
        candidate: D,
        replace: &dyn Fn(&D) -> Option<D>,
    ) -> StoreResult<Upsert<D>> {
        let _gate = self.write_gate.lock();

        match self.find_one(filter)? {
            None => Ok(Upsert::Inserted(self.insert_unguarded(candidate))),
            Some(existing) => match replace(&existing.doc) {
                Some(updated) => {
                    self.update_by_id(existing.id, updated)?;
                    Ok(Upsert::Updated { previous: existing })
                }
                None => Ok(Upsert::Unchanged { existing }),
            },
        }
    }

    fn len(&self) -> StoreResult<usize> {
        Ok(self.documents.len())
    }
}
