//! Key intervals with independently open or closed endpoints

use bitflags::bitflags;
use std::cmp::Ordering;

bitflags! {
    /// Openness of a [`Range`]
    ///
    /// The numeric values are stable and may be stored or sent over the wire.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RangeType: u8 {
        /// Exclude `min`: `(min, max]`
        const LOPEN = 0x01;
        /// Exclude `max`: `[min, max)`
        const ROPEN = 0x10;
        /// Exclude both: `(min, max)`
        const OPEN = Self::LOPEN.bits() | Self::ROPEN.bits();
    }
}

impl RangeType {
    /// Both ends included: `[min, max]`
    pub const CLOSE: RangeType = RangeType::empty();
}

impl Default for RangeType {
    fn default() -> Self {
        Self::CLOSE
    }
}

/// An immutable key interval `[min, max]` under lexicographic byte order
///
/// A missing `min` is unbounded below, a missing `max` unbounded above.
/// Callers keep `min <= max`; an inverted range is not an error, it simply
/// yields nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Range {
    min: Option<Vec<u8>>,
    max: Option<Vec<u8>>,
    range_type: RangeType,
}

impl Range {
    /// Create a range from optional bounds and an openness flag set
    pub fn new<K: AsRef<[u8]>>(min: Option<K>, max: Option<K>, range_type: RangeType) -> Self {
        Self {
            min: min.map(|k| k.as_ref().to_vec()),
            max: max.map(|k| k.as_ref().to_vec()),
            range_type,
        }
    }

    /// The whole key space
    pub fn all() -> Self {
        Self::default()
    }

    /// `[min, max]`
    pub fn closed(min: impl AsRef<[u8]>, max: impl AsRef<[u8]>) -> Self {
        Self::bounded(min, max, RangeType::CLOSE)
    }

    /// `(min, max)`
    pub fn open(min: impl AsRef<[u8]>, max: impl AsRef<[u8]>) -> Self {
        Self::bounded(min, max, RangeType::OPEN)
    }

    /// `(min, max]`
    pub fn left_open(min: impl AsRef<[u8]>, max: impl AsRef<[u8]>) -> Self {
        Self::bounded(min, max, RangeType::LOPEN)
    }

    /// `[min, max)`
    pub fn right_open(min: impl AsRef<[u8]>, max: impl AsRef<[u8]>) -> Self {
        Self::bounded(min, max, RangeType::ROPEN)
    }

    fn bounded(min: impl AsRef<[u8]>, max: impl AsRef<[u8]>, range_type: RangeType) -> Self {
        Self {
            min: Some(min.as_ref().to_vec()),
            max: Some(max.as_ref().to_vec()),
            range_type,
        }
    }

    /// Replace the lower bound
    pub fn with_min(mut self, min: Option<impl AsRef<[u8]>>) -> Self {
        self.min = min.map(|k| k.as_ref().to_vec());
        self
    }

    /// Replace the upper bound
    pub fn with_max(mut self, max: Option<impl AsRef<[u8]>>) -> Self {
        self.max = max.map(|k| k.as_ref().to_vec());
        self
    }

    /// Lower bound, if any
    pub fn min(&self) -> Option<&[u8]> {
        self.min.as_deref()
    }

    /// Upper bound, if any
    pub fn max(&self) -> Option<&[u8]> {
        self.max.as_deref()
    }

    /// Openness flags
    pub fn range_type(&self) -> RangeType {
        self.range_type
    }

    /// Whether `min` itself is excluded
    pub fn is_left_open(&self) -> bool {
        self.range_type.contains(RangeType::LOPEN)
    }

    /// Whether `max` itself is excluded
    pub fn is_right_open(&self) -> bool {
        self.range_type.contains(RangeType::ROPEN)
    }

    /// Whether `key` lies at or above the lower bound
    pub fn above_min(&self, key: &[u8]) -> bool {
        match self.min() {
            None => true,
            Some(min) => match key.cmp(min) {
                Ordering::Greater => true,
                Ordering::Equal => !self.is_left_open(),
                Ordering::Less => false,
            },
        }
    }

    /// Whether `key` lies at or below the upper bound
    pub fn below_max(&self, key: &[u8]) -> bool {
        match self.max() {
            None => true,
            Some(max) => match key.cmp(max) {
                Ordering::Less => true,
                Ordering::Equal => !self.is_right_open(),
                Ordering::Greater => false,
            },
        }
    }

    /// Whether `key` falls inside the range
    pub fn contains(&self, key: &[u8]) -> bool {
        self.above_min(key) && self.below_max(key)
    }
}
