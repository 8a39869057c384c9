//! Point-in-time reads

use crate::cursor::Direction;
use crate::cursor_iter::BoundedIter;
use crate::db::Db;
use crate::engine::Engine;
use crate::error::Result;
use crate::range::{Range, RangeType};
use std::fmt;
use tracing::debug;

/// A frozen view of a [`Db`]
///
/// Reads and iterators see the store exactly as it was when the snapshot was
/// taken. The engine snapshot is released when this value is dropped.
pub struct Snapshot<'db, E: Engine> {
    db: &'db Db<E>,
    snapshot: E::Snapshot,
}

impl<E: Engine> fmt::Debug for Snapshot<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot").finish_non_exhaustive()
    }
}

impl<'db, E: Engine> Snapshot<'db, E> {
    pub(crate) fn new(db: &'db Db<E>, snapshot: E::Snapshot) -> Self {
        debug!("snapshot acquired");
        Self { db, snapshot }
    }

    /// Read the value stored under `key` at snapshot time
    pub fn get(&self, key: impl AsRef<[u8]>) -> Result<Option<Vec<u8>>> {
        self.db.get_at(&self.snapshot, key.as_ref())
    }

    /// Forward iterator over `[min, max]` at snapshot time
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

    /// Backward iterator over `[min, max]` at snapshot time
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

    /// Iterator over `range` in either direction at snapshot time
    ///
    /// The iterator keeps reading the snapshot's view even after this
    /// `Snapshot` is closed; see [`Engine::Cursor`].
    pub fn range_iter(
        &self,
        range: Range,
        offset: i64,
        limit: i64,
        direction: Direction,
    ) -> Result<BoundedIter<E::Cursor>> {
        self.db.bounded(Some(&self.snapshot), range, offset, limit, direction)
    }

    /// Release the snapshot
    pub fn close(self) {}
}

impl<E: Engine> Drop for Snapshot<'_, E> {
    fn drop(&mut self) {
        debug!("snapshot released");
    }
}
