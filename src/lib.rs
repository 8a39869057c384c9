//! Bounded range iteration over sorted key-value stores
//!
//! This crate turns a storage engine's raw positional cursor into an iterator
//! that honors inclusive or exclusive range bounds, a starting offset, a
//! result limit and a walking direction. The engine is reached only through
//! the narrow [`RawCursor`] and [`Engine`] traits; [`MemEngine`] is the
//! bundled in-memory implementation.
//!
//! ```
//! use boundkv::{Config, Db, RangeType};
//!
//! let db: Db = Db::open(Config::default())?;
//! for k in ["a", "b", "c", "d", "e"] {
//!     db.put(k, k)?;
//! }
//!
//! let (min, max) = (b"b".as_slice(), b"d".as_slice());
//! let mut it = db.rev_iter(Some(min), Some(max), RangeType::CLOSE, 0, -1)?;
//! let mut keys = Vec::new();
//! while it.valid() {
//!     keys.push(it.key().to_vec());
//!     it.next()?;
//! }
//! it.close();
//! assert_eq!(keys, [b"d".to_vec(), b"c".to_vec(), b"b".to_vec()]);
//! # Ok::<(), boundkv::Error>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod batch;
pub mod cursor;
pub mod cursor_iter;
pub mod db;
pub mod engine;
pub mod error;
pub mod mem;
pub mod options;
pub mod range;
pub mod snapshot;

// Re-exports
pub use batch::{Batch, BatchOp, WriteBatch};
pub use cursor::{Direction, RawCursor};
pub use cursor_iter::{make_iterator, BoundedIter, Entries};
pub use db::Db;
pub use engine::Engine;
pub use error::{Error, Result};
pub use mem::{MemCursor, MemEngine, MemSnapshot};
pub use options::{Compression, Config, Options, ReadOptions, WriteOptions, DEFAULT_FILTER_BITS};
pub use range::{Range, RangeType};
pub use snapshot::Snapshot;

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
