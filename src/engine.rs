//! The storage collaborator behind a [`Db`](crate::Db)
//!
//! An engine supplies point reads, atomic batch writes, snapshots and
//! [`RawCursor`]s. All range semantics live above it, in
//! [`BoundedIter`](crate::BoundedIter), so an engine adapter only has to
//! translate these calls to its native API.

use crate::batch::WriteBatch;
use crate::cursor::RawCursor;
use crate::error::Result;
use crate::options::{Options, ReadOptions, WriteOptions};

/// A sorted key-value store
///
/// Implementations must allow concurrent cursor creation and independent
/// stepping of distinct cursors from different threads.
pub trait Engine: Send + Sync + Sized {
    /// Cursor type; owns whatever engine resources it pins
    ///
    /// A cursor created from a snapshot must keep that view readable on its
    /// own. Iterators are not borrowed from their [`Snapshot`](crate::Snapshot)
    /// and may be used after it is closed, so an engine whose snapshots are
    /// released handles (rather than shared state such as an `Arc`) has to
    /// take its own reference to the view when the cursor is created.
    type Cursor: RawCursor;

    /// Point-in-time view; released when dropped
    type Snapshot: Send + Sync;

    /// Open or create a store
    fn open(options: &Options) -> Result<Self>;

    /// Read one key, from `snapshot` when given
    fn get(
        &self,
        options: &ReadOptions,
        snapshot: Option<&Self::Snapshot>,
        key: &[u8],
    ) -> Result<Option<Vec<u8>>>;

    /// Apply every operation in `batch` atomically
    fn write(&self, options: &WriteOptions, batch: &WriteBatch) -> Result<()>;

    /// Create an unpositioned cursor, bound to `snapshot` when given
    fn cursor(&self, options: &ReadOptions, snapshot: Option<&Self::Snapshot>)
        -> Result<Self::Cursor>;

    /// Pin the current state
    fn snapshot(&self) -> Result<Self::Snapshot>;

    /// Close the store and delete its data
    fn destroy(self, options: &Options) -> Result<()>;
}
