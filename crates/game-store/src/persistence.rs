//! Persistence Layer for game collections
//!
//! Uses sled embedded database so leaderboard entries and destroyed-ship
//! events survive restarts. Each collection is a sled tree named
//! `<database>.<collection>`, keyed by big-endian document id and holding
//! bincode-encoded documents.

use crate::collection::{Collection, StoreError, StoreResult, Upsert, WriteOp};
use crate::document::{DocumentId, Stored};
use dashmap::DashMap;
use parking_lot::Mutex;
use serde::{de::DeserializeOwned, Serialize};
use sled::Db;
use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;

/// Handle to an opened sled database
#[derive(Clone)]
pub struct SledStore {
    /// Sled database instance
    db: Db,
    /// Logical database name, used as tree prefix
    database: String,
    /// One write gate per tree, shared by every handle to it
    write_gates: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl SledStore {
    /// Open or create a persistent store at the given path
    pub fn open<P: AsRef<Path>>(path: P, database: &str) -> anyhow::Result<Self> {
        let db = sled::open(&path)?;

        tracing::info!("Opened persistent store at {:?} (database {})", path.as_ref(), database);

        Ok(Self {
            db,
            database: database.to_string(),
            write_gates: Arc::new(DashMap::new()),
        })
    }

    /// A second logical database over an already opened sled instance
    #[cfg(test)]
    fn with_db(db: Db, database: &str) -> Self {
        Self {
            db,
            database: database.to_string(),
            write_gates: Arc::new(DashMap::new()),
        }
    }

    /// Open (or create) a typed collection
    pub fn collection<D>(&self, name: &str) -> anyhow::Result<SledCollection<D>> {
        let tree_name = format!("{}.{}", self.database, name);
        let tree = self.db.open_tree(&tree_name)?;
        tracing::debug!("Opened collection {} ({} documents)", tree_name, tree.len());
        let write_gate = self.write_gates.entry(tree_name).or_default().clone();

        Ok(SledCollection {
            db: self.db.clone(),
            tree,
            name: name.to_string(),
            write_gate,
            _marker: PhantomData,
        })
    }

    /// Flush all pending writes to disk
    pub fn flush(&self) -> anyhow::Result<()> {
        self.db.flush()?;
        Ok(())
    }

    pub fn database(&self) -> &str {
        &self.database
    }
}

/// A sled tree holding documents of type `D`
pub struct SledCollection<D> {
    db: Db,
    tree: sled::Tree,
    name: String,
    /// Held for the whole lookup-then-write of `upsert_where`
    write_gate: Arc<Mutex<()>>,
    _marker: PhantomData<fn() -> D>,
}

impl<D> Clone for SledCollection<D> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            tree: self.tree.clone(),
            name: self.name.clone(),
            write_gate: self.write_gate.clone(),
            _marker: PhantomData,
        }
    }
}

impl<D> SledCollection<D>
where
    D: Serialize + DeserializeOwned,
{
    fn read_error(&self, reason: impl ToString) -> StoreError {
        StoreError::Read {
            collection: self.name.clone(),
            reason: reason.to_string(),
        }
    }

    fn write_error(&self, op: WriteOp, reason: impl ToString) -> StoreError {
        StoreError::Write {
            op,
            collection: self.name.clone(),
            reason: reason.to_string(),
        }
    }

    fn write(&self, op: WriteOp, id: DocumentId, doc: &D) -> StoreResult<()> {
        let bytes = bincode::serialize(doc).map_err(|e| self.write_error(op, e))?;
        self.tree
            .insert(id.to_key(), bytes)
            .map_err(|e| self.write_error(op, e))?;
        Ok(())
    }

    fn insert_unguarded(&self, doc: &D) -> StoreResult<DocumentId> {
        let id = self
            .db
            .generate_id()
            .map_err(|e| self.write_error(WriteOp::Insert, e))?;
        // generate_id starts at 0; shift so ids match the in-memory adapter
        let id = DocumentId::new(id + 1);
        self.write(WriteOp::Insert, id, doc)?;
        Ok(id)
    }

    /// Remove every document (for testing)
    pub fn clear(&self) -> anyhow::Result<()> {
        self.tree.clear()?;
        Ok(())
    }
}

impl<D> Collection<D> for SledCollection<D>
where
    D: Serialize + DeserializeOwned,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn insert(&self, doc: D) -> StoreResult<DocumentId> {
        self.insert_unguarded(&doc)
    }

    fn find(&self, filter: &dyn Fn(&D) -> bool) -> StoreResult<Vec<Stored<D>>> {
        let mut docs = Vec::new();

        for result in self.tree.iter() {
            let (key, value) = result.map_err(|e| self.read_error(e))?;

            let id = DocumentId::from_key(&key)
                .ok_or_else(|| self.read_error("Invalid document key length"))?;
            let doc: D = bincode::deserialize(&value).map_err(|e| self.read_error(e))?;

            if filter(&doc) {
                docs.push(Stored::new(id, doc));
            }
        }

        Ok(docs)
    }

    fn update_by_id(&self, id: DocumentId, doc: D) -> StoreResult<()> {
        let exists = self
            .tree
            .contains_key(id.to_key())
            .map_err(|e| self.write_error(WriteOp::Update, e))?;
        if !exists {
            return Err(StoreError::DocumentNotFound {
                collection: self.name.clone(),
                id,
            });
        }
        self.write(WriteOp::Update, id, &doc)
    }

    fn upsert_where(
        &self,
        filter: &dyn Fn(&D) -> bool,
        candidate: D,
        replace: &dyn Fn(&D) -> Option<D>,
    ) -> StoreResult<Upsert<D>> {
        // sled locks the database to one process and handles share a gate per tree
        let _gate = self.write_gate.lock();

        match self.find_one(filter)? {
            None => Ok(Upsert::Inserted(self.insert_unguarded(&candidate)?)),
            Some(existing) => match replace(&existing.doc) {
                Some(updated) => {
                    self.write(WriteOp::Update, existing.id, &updated)?;
                    Ok(Upsert::Updated { previous: existing })
                }
                None => Ok(Upsert::Unchanged { existing }),
            },
        }
    }

    fn len(&self) -> StoreResult<usize> {
        Ok(self.tree.len())
    }
}
