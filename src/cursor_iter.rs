//! Bounded iteration over a raw cursor
//!
//! [`BoundedIter`] clips a [`RawCursor`] to a [`Range`], skips `offset`
//! in-range entries, stops after `limit` entries and walks either forward or
//! backward. Inputs that can never produce data (negative offset, zero limit,
//! inverted or exhausted range) are not errors: the iterator is simply not
//! valid. Only engine failures come back as [`Error`](crate::Error).
//!
//! A `BoundedIter` is used from one place at a time. Every operation takes
//! `&self` or `&mut self` and nothing is synchronized internally; separate
//! iterators own separate cursors and can live on separate threads.

use crate::cursor::{step, Direction, RawCursor};
use crate::error::{Error, Result};
use crate::range::{Range, RangeType};
use std::fmt;
use tracing::trace;

/// A clipped, counted, directional walk over a cursor
pub struct BoundedIter<C: RawCursor> {
    /// Released on `close` or drop
    cursor: Option<C>,
    range: Range,
    direction: Direction,
    offset: i64,
    /// Negative means unbounded
    limit: i64,
    emitted: i64,
    /// Cached `cursor.valid()` after the last positioning call
    cursor_valid: bool,
    /// Sticky engine failure seen while stepping
    error: Option<Error>,
}

impl<C: RawCursor> BoundedIter<C> {
    /// Bind `cursor` to a range and position it at the first entry to yield
    ///
    /// With a negative `offset` the cursor is never touched and the iterator
    /// is empty. A failure while positioning drops the cursor before the
    /// error is returned.
    pub fn new(
        mut cursor: C,
        range: Range,
        offset: i64,
        limit: i64,
        direction: Direction,
    ) -> Result<Self> {
        let cursor_valid = if offset < 0 {
            false
        } else {
            position(&mut cursor, &range, direction)?;
            skip(&mut cursor, direction, offset)?;
            cursor.valid()
        };

        trace!(?direction, offset, limit, cursor_valid, "bounded iterator positioned");

        Ok(Self {
            cursor: Some(cursor),
            range,
            direction,
            offset,
            limit,
            emitted: 0,
            cursor_valid,
            error: None,
        })
    }

    /// Whether the iterator currently points at an entry it may yield
    pub fn valid(&self) -> bool {
        if self.offset < 0 || !self.cursor_valid {
            return false;
        }
        if self.limit >= 0 && self.emitted >= self.limit {
            return false;
        }
        let Some(cursor) = self.cursor.as_ref() else {
            return false;
        };

        // Only the bound we are walking toward needs checking; the other one
        // was enforced when the cursor was positioned.
        match self.direction {
            Direction::Forward => self.range.below_max(cursor.key()),
            Direction::Backward => self.range.above_min(cursor.key()),
        }
    }

    /// Key of the current entry
    ///
    /// Only meaningful while [`valid`](Self::valid) is true. The slice
    /// borrows the iterator, so it cannot outlive the next `next` or `close`.
    pub fn key(&self) -> &[u8] {
        self.cursor.as_ref().map(|c| c.key()).unwrap_or_default()
    }

    /// Value of the current entry
    ///
    /// Same contract as [`key`](Self::key).
    pub fn value(&self) -> &[u8] {
        self.cursor.as_ref().map(|c| c.value()).unwrap_or_default()
    }

    /// Count the current entry as yielded and step in the iteration direction
    ///
    /// Boundaries are not checked here; the following `valid` call does that.
    /// An engine failure is returned and also kept for [`status`](Self::status).
    pub fn next(&mut self) -> Result<()> {
        self.emitted = self.emitted.saturating_add(1);

        if !self.cursor_valid {
            return Ok(());
        }
        let Some(cursor) = self.cursor.as_mut() else {
            return Ok(());
        };

        match step(cursor, self.direction) {
            Ok(()) => {
                self.cursor_valid = cursor.valid();
                Ok(())
            }
            Err(err) => {
                self.cursor_valid = false;
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Engine failure seen while stepping, if any
    ///
    /// Lets callers tell "no more data" apart from "the engine broke" once
    /// `valid` has turned false.
    pub fn status(&self) -> Result<()> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Release the cursor. Calling it again does nothing.
    pub fn close(&mut self) {
        if self.cursor.take().is_some() {
            trace!(emitted = self.emitted, "bounded iterator closed");
        }
        self.cursor_valid = false;
    }

    /// Whether `close` has released the cursor
    pub fn is_closed(&self) -> bool {
        self.cursor.is_none()
    }

    /// Entries yielded so far
    pub fn emitted(&self) -> i64 {
        self.emitted
    }

    /// Iteration direction
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Range the iterator is clipped to
    pub fn range(&self) -> &Range {
        &self.range
    }

    /// Standard iterator over owned copies of the remaining entries
    ///
    /// Each yielded entry is counted and stepped past before it is handed
    /// out, so a fresh adapter resumes exactly where the last one stopped.
    pub fn entries(&mut self) -> Entries<'_, C> {
        let pending = self.error.clone();
        Entries {
            iter: self,
            pending,
            done: false,
        }
    }
}

impl<C: RawCursor> fmt::Debug for BoundedIter<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedIter")
            .field("range", &self.range)
            .field("direction", &self.direction)
            .field("offset", &self.offset)
            .field("limit", &self.limit)
            .field("emitted", &self.emitted)
            .field("closed", &self.cursor.is_none())
            .finish()
    }
}

/// Move to the first in-range entry for `direction`
fn position<C: RawCursor>(cursor: &mut C, range: &Range, direction: Direction) -> Result<()> {
    match direction {
        Direction::Forward => match range.min() {
            None => cursor.seek_to_first(),
            Some(min) => {
                cursor.seek(min)?;
                if range.is_left_open() && cursor.valid() && cursor.key() == min {
                    cursor.next()?;
                }
                Ok(())
            }
        },
        Direction::Backward => match range.max() {
            None => cursor.seek_to_last(),
            Some(max) => {
                // `seek` lands on the first key >= max, which overshoots
                // whenever max itself is absent.
                cursor.seek(max)?;
                if !cursor.valid() {
                    cursor.seek_to_last()?;
                } else if cursor.key() != max {
                    cursor.prev()?;
                }
                if range.is_right_open() && cursor.valid() && cursor.key() == max {
                    cursor.prev()?;
                }
                Ok(())
            }
        },
    }
}

fn skip<C: RawCursor>(cursor: &mut C, direction: Direction, offset: i64) -> Result<()> {
    for _ in 0..offset {
        if !cursor.valid() {
            break;
        }
        step(cursor, direction)?;
    }
    Ok(())
}

/// Create a [`BoundedIter`] from loose bounds
///
/// `offset < 0` yields nothing; `limit < 0` means no limit.
pub fn make_iterator<C: RawCursor>(
    cursor: C,
    min: Option<&[u8]>,
    max: Option<&[u8]>,
    range_type: RangeType,
    offset: i64,
    limit: i64,
    direction: Direction,
) -> Result<BoundedIter<C>> {
    BoundedIter::new(cursor, Range::new(min, max, range_type), offset, limit, direction)
}

/// [`Iterator`] adapter returned by [`BoundedIter::entries`]
///
/// A cursor failure is yielded once, after the entry that preceded it, and
/// then the adapter ends. The failure stays available from
/// [`BoundedIter::status`].
pub struct Entries<'a, C: RawCursor> {
    iter: &'a mut BoundedIter<C>,
    /// Step failure not yet handed out
    pending: Option<Error>,
    done: bool,
}

impl<C: RawCursor> Iterator for Entries<'_, C> {
    type Item = Result<(Vec<u8>, Vec<u8>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if let Some(err) = self.pending.take() {
            self.done = true;
            return Some(Err(err));
        }
        if !self.iter.valid() {
            self.done = true;
            return None;
        }

        let entry = (self.iter.key().to_vec(), self.iter.value().to_vec());
        if let Err(err) = self.iter.next() {
            self.pending = Some(err);
        }
        Some(Ok(entry))
    }
}
