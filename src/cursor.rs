//! Raw positional cursor capability
//!
//! A [`RawCursor`] is the only thing the bounded iteration layer needs from a
//! storage engine. Each engine provides an adapter implementing it; nothing
//! above this trait knows which engine it is talking to.

use crate::error::Result;

/// Iteration direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Ascending key order
    #[default]
    Forward,
    /// Descending key order
    Backward,
}

/// A stateful pointer into a sorted key space
///
/// Positioning methods report engine failures through their `Result`; running
/// off either end of the key space is not a failure and only makes the cursor
/// invalid. Dropping the cursor releases whatever the engine holds for it.
pub trait RawCursor {
    /// Position at the smallest key. Valid afterwards iff the source is not empty.
    fn seek_to_first(&mut self) -> Result<()>;

    /// Position at the largest key. Valid afterwards iff the source is not empty.
    fn seek_to_last(&mut self) -> Result<()>;

    /// Position at the first key that is at or past `key`.
    fn seek(&mut self, key: &[u8]) -> Result<()>;

    /// Move to the next key. Stepping past the last key invalidates the cursor.
    fn next(&mut self) -> Result<()>;

    /// Move to the previous key. Stepping before the first key invalidates the cursor.
    fn prev(&mut self) -> Result<()>;

    /// Whether the cursor is positioned at an entry
    fn valid(&self) -> bool;

    /// Key at the current position, empty when not valid
    ///
    /// The slice is only good until the cursor moves.
    fn key(&self) -> &[u8];

    /// Value at the current position, empty when not valid
    fn value(&self) -> &[u8];
}

impl<C: RawCursor + ?Sized> RawCursor for Box<C> {
    fn seek_to_first(&mut self) -> Result<()> {
        (**self).seek_to_first()
    }

    fn seek_to_last(&mut self) -> Result<()> {
        (**self).seek_to_last()
    }

    fn seek(&mut self, key: &[u8]) -> Result<()> {
        (**self).seek(key)
    }

    fn next(&mut self) -> Result<()> {
        (**self).next()
    }

    fn prev(&mut self) -> Result<()> {
        (**self).prev()
    }

    fn valid(&self) -> bool {
        (**self).valid()
    }

    fn key(&self) -> &[u8] {
        (**self).key()
    }

    fn value(&self) -> &[u8] {
        (**self).value()
    }
}

impl<C: RawCursor + ?Sized> RawCursor for &mut C {
    fn seek_to_first(&mut self) -> Result<()> {
        (**self).seek_to_first()
    }

    fn seek_to_last(&mut self) -> Result<()> {
        (**self).seek_to_last()
    }

    fn seek(&mut self, key: &[u8]) -> Result<()> {
        (**self).seek(key)
    }

    fn next(&mut self) -> Result<()> {
        (**self).next()
    }

    fn prev(&mut self) -> Result<()> {
        (**self).prev()
    }

    fn valid(&self) -> bool {
        (**self).valid()
    }

    fn key(&self) -> &[u8] {
        (**self).key()
    }

    fn value(&self) -> &[u8] {
        (**self).value()
    }
}

/// Step `cursor` once in `direction`
pub(crate) fn step<C: RawCursor + ?Sized>(cursor: &mut C, direction: Direction) -> Result<()> {
    match direction {
        Direction::Forward => cursor.next(),
        Direction::Backward => cursor.prev(),
    }
}
