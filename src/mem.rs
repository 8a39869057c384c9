//! In-memory storage engine
//!
//! Keys live in a [`BTreeMap`] behind an [`Arc`]. Writers copy the map on
//! write when a cursor or snapshot still holds the previous version, so every
//! cursor sees the data as of the moment it was created.

use crate::batch::{BatchOp, WriteBatch};
use crate::cursor::RawCursor;
use crate::engine::Engine;
use crate::error::Result;
use crate::options::{Options, ReadOptions, WriteOptions};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Bound::{Excluded, Included, Unbounded};
use std::sync::Arc;
use tracing::debug;

type Tree = BTreeMap<Vec<u8>, Vec<u8>>;

/// A [`BTreeMap`]-backed [`Engine`]
///
/// Readers never block each other. Batch writes take the write lock for the
/// duration of the batch, which makes them atomic with respect to cursors and
/// snapshots.
#[derive(Default)]
pub struct MemEngine {
    tree: RwLock<Arc<Tree>>,
}

impl fmt::Debug for MemEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemEngine").field("len", &self.len()).finish()
    }
}

impl MemEngine {
    /// Create an empty engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored
    pub fn len(&self) -> usize {
        self.tree.read().len()
    }

    /// Whether no keys are stored
    pub fn is_empty(&self) -> bool {
        self.tree.read().is_empty()
    }

    fn current(&self) -> Arc<Tree> {
        Arc::clone(&self.tree.read())
    }

    fn view(&self, snapshot: Option<&MemSnapshot>) -> Arc<Tree> {
        match snapshot {
            Some(snap) => Arc::clone(&snap.tree),
            None => self.current(),
        }
    }
}

impl Engine for MemEngine {
    type Cursor = MemCursor;
    type Snapshot = MemSnapshot;

    fn open(options: &Options) -> Result<Self> {
        // Nothing persists between opens, so error_if_exists never trips.
        debug!(?options, "opening in-memory engine; tuning options are ignored");
        Ok(Self::new())
    }

    fn get(
        &self,
        _options: &ReadOptions,
        snapshot: Option<&MemSnapshot>,
        key: &[u8],
    ) -> Result<Option<Vec<u8>>> {
        Ok(self.view(snapshot).get(key).cloned())
    }

    fn write(&self, _options: &WriteOptions, batch: &WriteBatch) -> Result<()> {
        let mut guard = self.tree.write();
        let tree = Arc::make_mut(&mut guard);
        for op in batch.ops() {
            match op {
                BatchOp::Put { key, value } => {
                    tree.insert(key.clone(), value.clone());
                }
                BatchOp::Delete { key } => {
                    tree.remove(key);
                }
            }
        }
        Ok(())
    }

    fn cursor(&self, _options: &ReadOptions, snapshot: Option<&MemSnapshot>) -> Result<MemCursor> {
        Ok(MemCursor::new(self.view(snapshot)))
    }

    fn snapshot(&self) -> Result<MemSnapshot> {
        Ok(MemSnapshot {
            tree: self.current(),
        })
    }

    fn destroy(self, _options: &Options) -> Result<()> {
        debug!(len = self.len(), "discarding in-memory engine");
        Ok(())
    }
}

/// A pinned version of a [`MemEngine`]
#[derive(Clone)]
pub struct MemSnapshot {
    tree: Arc<Tree>,
}

impl fmt::Debug for MemSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemSnapshot").field("len", &self.tree.len()).finish()
    }
}

/// [`RawCursor`] over one version of a [`MemEngine`]
pub struct MemCursor {
    tree: Arc<Tree>,
    current: Option<Vec<u8>>,
}

impl fmt::Debug for MemCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemCursor").field("current", &self.current).finish()
    }
}

impl MemCursor {
    fn new(tree: Arc<Tree>) -> Self {
        Self {
            tree,
            current: None,
        }
    }

    /// Cursor over a detached set of entries
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Vec<u8>, Vec<u8>)>,
    {
        Self::new(Arc::new(entries.into_iter().collect()))
    }

    fn first_key(&self) -> Option<Vec<u8>> {
        self.tree.keys().next().cloned()
    }

    fn last_key(&self) -> Option<Vec<u8>> {
        self.tree.keys().next_back().cloned()
    }
}

impl RawCursor for MemCursor {
    fn seek_to_first(&mut self) -> Result<()> {
        self.current = self.first_key();
        Ok(())
    }

    fn seek_to_last(&mut self) -> Result<()> {
        self.current = self.last_key();
        Ok(())
    }

    fn seek(&mut self, key: &[u8]) -> Result<()> {
        self.current = self
            .tree
            .range::<[u8], _>((Included(key), Unbounded))
            .next()
            .map(|(k, _)| k.clone());
        Ok(())
    }

    fn next(&mut self) -> Result<()> {
        let Some(cur) = self.current.as_deref() else {
            return Ok(());
        };
        let next = self
            .tree
            .range::<[u8], _>((Excluded(cur), Unbounded))
            .next()
            .map(|(k, _)| k.clone());
        self.current = next;
        Ok(())
    }

    fn prev(&mut self) -> Result<()> {
        let Some(cur) = self.current.as_deref() else {
            return Ok(());
        };
        let prev = self
            .tree
            .range::<[u8], _>((Unbounded, Excluded(cur)))
            .next_back()
            .map(|(k, _)| k.clone());
        self.current = prev;
        Ok(())
    }

    fn valid(&self) -> bool {
        self.current.is_some()
    }

    fn key(&self) -> &[u8] {
        self.current.as_deref().unwrap_or_default()
    }

    fn value(&self) -> &[u8] {
        self.current
            .as_deref()
            .and_then(|k| self.tree.get(k))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
