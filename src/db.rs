//! Database facade
//!
//! [`Db`] wraps an [`Engine`] with the caller-facing API: point reads and
//! writes, batches, snapshots and bounded iterators. Everything except the
//! iterators is direct delegation to the engine.

use crate::batch::{Batch, WriteBatch};
use crate::cursor::Direction;
use crate::cursor_iter::BoundedIter;
use crate::engine::Engine;
use crate::error::Result;
use crate::mem::MemEngine;
use crate::options::{Config, Options, ReadOptions, WriteOptions};
use crate::range::{Range, RangeType};
use crate::snapshot::Snapshot;
use std::fmt;
use tracing::debug;

/// An open key-value store
///
/// `Db` is `Sync` whenever its engine is: any number of threads may read,
/// write and iterate through a shared reference.
pub struct Db<E: Engine = MemEngine> {
    engine: E,
    options: Options,
}

impl<E: Engine + fmt::Debug> fmt::Debug for Db<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Db")
            .field("engine", &self.engine)
            .field("options", &self.options)
            .finish()
    }
}

impl<E: Engine> Db<E> {
    /// Open a store described by `config`
    pub fn open(config: Config) -> Result<Self> {
        Self::open_with_options(Options::from_config(&config))
    }

    /// Open a store from a JSON configuration document
    pub fn open_json(json: &[u8]) -> Result<Self> {
        Self::open(Config::from_json(json)?)
    }

    /// Open a store with explicit engine tuning
    pub fn open_with_options(options: Options) -> Result<Self> {
        let engine = E::open(&options)?;
        debug!(path = ?options.path(), "database opened");
        Ok(Self { engine, options })
    }

    /// Engine tuning the store was opened with
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The underlying engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Store `value` under `key`
    pub fn put(&self, key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) -> Result<()> {
        self.put_with(&WriteOptions::default(), key, value)
    }

    /// Store `value` under `key` and flush to stable storage
    pub fn sync_put(&self, key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) -> Result<()> {
        self.put_with(&WriteOptions::synced(), key, value)
    }

    fn put_with(
        &self,
        options: &WriteOptions,
        key: impl AsRef<[u8]>,
        value: impl AsRef<[u8]>,
    ) -> Result<()> {
        let mut batch = WriteBatch::new();
        batch.put(key, value);
        self.engine.write(options, &batch)
    }

    /// Read the value stored under `key`
    pub fn get(&self, key: impl AsRef<[u8]>) -> Result<Option<Vec<u8>>> {
        self.engine.get(&ReadOptions::default(), None, key.as_ref())
    }

    /// Remove `key`; removing a missing key is not an error
    pub fn delete(&self, key: impl AsRef<[u8]>) -> Result<()> {
        self.delete_with(&WriteOptions::default(), key)
    }

    /// Remove `key` and flush to stable storage
    pub fn sync_delete(&self, key: impl AsRef<[u8]>) -> Result<()> {
        self.delete_with(&WriteOptions::synced(), key)
    }

    fn delete_with(&self, options: &WriteOptions, key: impl AsRef<[u8]>) -> Result<()> {
        let mut batch = WriteBatch::new();
        batch.delete(key);
        self.engine.write(options, &batch)
    }

    /// Apply a prepared batch atomically
    pub fn write(&self, options: &WriteOptions, batch: &WriteBatch) -> Result<()> {
        self.engine.write(options, batch)
    }

    /// Start a batch bound to this store
    pub fn write_batch(&self) -> Batch<'_, E> {
        Batch::new(self)
    }

    /// Pin the current state of the store
    pub fn snapshot(&self) -> Result<Snapshot<'_, E>> {
        Ok(Snapshot::new(self, self.engine.snapshot()?))
    }

    /// Forward iterator over `[min, max]` with the given openness
    ///
    /// `offset < 0` yields nothing and `limit < 0` means no limit.
    pub fn iter(
        &self,
        min: Option<&[u8]>,
        max: Option<&[u8]>,
        range_type: RangeType,
        offset: i64,
        limit: i64,
    ) -> Result<BoundedIter<E::Cursor>> {
        self.range_iter(Range::new(min, max, range_type), offset, limit, Direction::Forward)
    }

    /// Backward iterator over `[min, max]`, starting at the upper bound
    pub fn rev_iter(
        &self,
        min: Option<&[u8]>,
        max: Option<&[u8]>,
        range_type: RangeType,
        offset: i64,
        limit: i64,
    ) -> Result<BoundedIter<E::Cursor>> {
        self.range_iter(Range::new(min, max, range_type), offset, limit, Direction::Backward)
    }

    /// Iterator over `range` in either direction
    pub fn range_iter(
        &self,
        range: Range,
        offset: i64,
        limit: i64,
        direction: Direction,
    ) -> Result<BoundedIter<E::Cursor>> {
        self.bounded(None, range, offset, limit, direction)
    }

    pub(crate) fn bounded(
        &self,
        snapshot: Option<&E::Snapshot>,
        range: Range,
        offset: i64,
        limit: i64,
        direction: Direction,
    ) -> Result<BoundedIter<E::Cursor>> {
        let cursor = self.engine.cursor(&ReadOptions::for_iteration(), snapshot)?;
        BoundedIter::new(cursor, range, offset, limit, direction)
    }

    pub(crate) fn get_at(&self, snapshot: &E::Snapshot, key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.engine.get(&ReadOptions::default(), Some(snapshot), key)
    }

    /// Delete every key in one atomic batch
    pub fn clear(&self) -> Result<()> {
        let mut it = self.range_iter(Range::all(), 0, -1, Direction::Forward)?;
        let mut batch = WriteBatch::new();
        while it.valid() {
            batch.delete(it.key());
            it.next()?;
        }
        it.close();

        debug!(keys = batch.len(), "clearing database");
        self.engine.write(&WriteOptions::default(), &batch)
    }

    /// Close the store
    pub fn close(self) {
        debug!(path = ?self.options.path(), "database closed");
    }

    /// Close the store and delete its data
    pub fn destroy(self) -> Result<()> {
        debug!(path = ?self.options.path(), "destroying database");
        self.engine.destroy(&self.options)
    }
}
