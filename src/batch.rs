//! Write batches
//!
//! [`WriteBatch`] is the engine-neutral list of mutations handed to
//! [`Engine::write`]; [`Batch`] is the same list bound to an open [`Db`].

use crate::db::Db;
use crate::engine::Engine;
use crate::error::Result;
use crate::options::WriteOptions;
use tracing::debug;

/// One buffered mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOp {
    /// Insert or overwrite `key`
    Put {
        /// Key to write
        key: Vec<u8>,
        /// Value to store
        value: Vec<u8>,
    },
    /// Remove `key` if present
    Delete {
        /// Key to remove
        key: Vec<u8>,
    },
}

/// An ordered list of mutations applied atomically by an engine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<BatchOp>,
}

impl WriteBatch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a put
    pub fn put(&mut self, key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) {
        self.ops.push(BatchOp::Put {
            key: key.as_ref().to_vec(),
            value: value.as_ref().to_vec(),
        });
    }

    /// Queue a delete
    pub fn delete(&mut self, key: impl AsRef<[u8]>) {
        self.ops.push(BatchOp::Delete {
            key: key.as_ref().to_vec(),
        });
    }

    /// Drop every queued mutation
    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Queued mutations in insertion order
    pub fn ops(&self) -> &[BatchOp] {
        &self.ops
    }

    /// Number of queued mutations
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Pending mutations against a [`Db`], applied together on commit
#[must_use = "a batch does nothing until committed"]
pub struct Batch<'db, E: Engine> {
    db: &'db Db<E>,
    batch: WriteBatch,
}

impl<'db, E: Engine> Batch<'db, E> {
    pub(crate) fn new(db: &'db Db<E>) -> Self {
        Self {
            db,
            batch: WriteBatch::new(),
        }
    }

    /// Queue a put
    pub fn put(&mut self, key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) {
        self.batch.put(key, value);
    }

    /// Queue a delete
    pub fn delete(&mut self, key: impl AsRef<[u8]>) {
        self.batch.delete(key);
    }

    /// Apply the queued mutations atomically
    ///
    /// On success the batch is emptied and can be reused. On failure nothing
    /// is applied and the mutations stay queued.
    pub fn commit(&mut self) -> Result<()> {
        self.commit_with(&WriteOptions::default())
    }

    /// Like [`commit`](Self::commit), flushing to stable storage first
    pub fn sync_commit(&mut self) -> Result<()> {
        self.commit_with(&WriteOptions::synced())
    }

    fn commit_with(&mut self, options: &WriteOptions) -> Result<()> {
        self.db.write(options, &self.batch)?;
        debug!(ops = self.batch.len(), sync = options.sync, "batch committed");
        self.batch.clear();
        Ok(())
    }

    /// Discard the queued mutations
    pub fn rollback(&mut self) {
        self.batch.clear();
    }

    /// Number of queued mutations
    pub fn len(&self) -> usize {
        self.batch.len()
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }
}
