//! Engine failures and resource release
//!
//! Failures injected into the cursor must surface as errors, never as a
//! quietly empty range, and every cursor must be released exactly once.

use boundkv::{
    make_iterator, BoundedIter, Config, Db, Direction, Engine, Error, MemCursor, MemEngine,
    MemSnapshot, Options, Range, RangeType, RawCursor, ReadOptions, Result, WriteBatch,
    WriteOptions,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// Cursor that fails every positioning call after the first `budget` ones
struct FaultyCursor {
    inner: MemCursor,
    budget: usize,
    failure: Error,
    released: Arc<AtomicUsize>,
}

impl FaultyCursor {
    fn new(keys: &[&str], budget: usize) -> Self {
        let inner = MemCursor::from_entries(
            keys.iter().map(|k| (k.as_bytes().to_vec(), k.as_bytes().to_vec())),
        );
        Self {
            inner,
            budget,
            failure: Error::Io("injected read failure".to_string()),
            released: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn failing_with(mut self, failure: Error) -> Self {
        self.failure = failure;
        self
    }

    fn spend(&mut self) -> Result<()> {
        if self.budget == 0 {
            return Err(self.failure.clone());
        }
        self.budget -= 1;
        Ok(())
    }
}

impl Drop for FaultyCursor {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

impl RawCursor for FaultyCursor {
    fn seek_to_first(&mut self) -> Result<()> {
        self.spend()?;
        self.inner.seek_to_first()
    }

    fn seek_to_last(&mut self) -> Result<()> {
        self.spend()?;
        self.inner.seek_to_last()
    }

    fn seek(&mut self, key: &[u8]) -> Result<()> {
        self.spend()?;
        self.inner.seek(key)
    }

    fn next(&mut self) -> Result<()> {
        self.spend()?;
        self.inner.next()
    }

    fn prev(&mut self) -> Result<()> {
        self.spend()?;
        self.inner.prev()
    }

    fn valid(&self) -> bool {
        self.inner.valid()
    }

    fn key(&self) -> &[u8] {
        self.inner.key()
    }

    fn value(&self) -> &[u8] {
        self.inner.value()
    }
}

const ABCDE: &[&str] = &["a", "b", "c", "d", "e"];

#[test]
fn test_positioning_failure_is_returned_and_cursor_released() {
    let cursor = FaultyCursor::new(ABCDE, 0);
    let released = Arc::clone(&cursor.released);

    let err = BoundedIter::new(cursor, Range::closed("b", "d"), 0, -1, Direction::Forward)
        .unwrap_err();
    assert_eq!(err, Error::Io("injected read failure".to_string()));
    assert_eq!(released.load(Ordering::SeqCst), 1);
}

#[test]
fn test_failure_while_skipping_offset() {
    // seek succeeds, the first skip step fails
    let cursor = FaultyCursor::new(ABCDE, 1);
    let range = Range::all().with_min(Some("b"));
    let result = BoundedIter::new(cursor, range, 2, -1, Direction::Forward);
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_step_failure_is_distinct_from_exhaustion() {
    let cursor = FaultyCursor::new(ABCDE, 2);
    let mut it = BoundedIter::new(cursor, Range::all(), 0, -1, Direction::Forward).unwrap();
    assert!(it.valid());
    assert_eq!(it.key(), b"a");

    it.next().unwrap();
    assert_eq!(it.key(), b"b");

    let err = it.next().unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert!(!it.valid());
    assert_eq!(it.status(), Err(err));

    // a clean exhaustion reports no error
    let cursor = FaultyCursor::new(&["a"], 10);
    let mut it = BoundedIter::new(cursor, Range::all(), 0, -1, Direction::Backward).unwrap();
    it.next().unwrap();
    assert!(!it.valid());
    assert!(it.status().is_ok());
}

#[test]
fn test_entries_yield_error_once() {
    let cursor = FaultyCursor::new(ABCDE, 2);
    let mut it = BoundedIter::new(cursor, Range::all(), 0, -1, Direction::Forward).unwrap();
    let results: Vec<_> = it.entries().collect();
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_ok());
    assert!(results[2].is_err());
}

#[test]
fn test_engine_error_kind_is_preserved() {
    let corrupt = Error::Corruption {
        details: "bad block checksum".to_string(),
    };
    let cursor = FaultyCursor::new(ABCDE, 1).failing_with(corrupt.clone());
    let mut it = BoundedIter::new(cursor, Range::all(), 0, -1, Direction::Backward).unwrap();
    assert_eq!(it.key(), b"e");

    assert_eq!(it.next(), Err(corrupt.clone()));
    assert_eq!(it.status(), Err(corrupt.clone()));
    assert_eq!(
        it.status().unwrap_err().to_string(),
        "Corruption detected: bad block checksum"
    );

    // a fresh adapter still reports the failure instead of ending quietly
    let results: Vec<_> = it.entries().collect();
    assert_eq!(results, vec![Err(corrupt)]);
}

#[test]
fn test_negative_offset_never_touches_cursor() {
    let cursor = FaultyCursor::new(ABCDE, 0);
    let mut it = BoundedIter::new(cursor, Range::all(), -1, -1, Direction::Backward).unwrap();
    assert!(!it.valid());
    it.next().unwrap();
    assert!(it.status().is_ok());
}

#[test]
fn test_close_releases_exactly_once() {
    let cursor = FaultyCursor::new(ABCDE, 10);
    let released = Arc::clone(&cursor.released);
    let min: &[u8] = b"a";
    let mut it = make_iterator(
        cursor,
        Some(min),
        None,
        RangeType::CLOSE,
        0,
        -1,
        Direction::Forward,
    )
    .unwrap();
    assert_eq!(released.load(Ordering::SeqCst), 0);

    it.close();
    assert_eq!(released.load(Ordering::SeqCst), 1);
    it.close();
    drop(it);
    assert_eq!(released.load(Ordering::SeqCst), 1);
}

#[test]
fn test_drop_releases_unclosed_iterator() {
    let cursor = FaultyCursor::new(ABCDE, 10);
    let released = Arc::clone(&cursor.released);
    {
        let it = BoundedIter::new(cursor, Range::all(), 0, 2, Direction::Forward).unwrap();
        assert!(it.valid());
    }
    assert_eq!(released.load(Ordering::SeqCst), 1);
}

/// Engine whose cursors stop working after a fixed number of calls
struct FlakyEngine {
    inner: MemEngine,
    budget: usize,
}

impl Engine for FlakyEngine {
    type Cursor = FaultyCursor;
    type Snapshot = MemSnapshot;

    fn open(options: &Options) -> Result<Self> {
        Ok(Self {
            inner: MemEngine::open(options)?,
            budget: 3,
        })
    }

    fn get(
        &self,
        options: &ReadOptions,
        snapshot: Option<&MemSnapshot>,
        key: &[u8],
    ) -> Result<Option<Vec<u8>>> {
        self.inner.get(options, snapshot, key)
    }

    fn write(&self, options: &WriteOptions, batch: &WriteBatch) -> Result<()> {
        self.inner.write(options, batch)
    }

    fn cursor(
        &self,
        options: &ReadOptions,
        snapshot: Option<&MemSnapshot>,
    ) -> Result<FaultyCursor> {
        Ok(FaultyCursor {
            inner: self.inner.cursor(options, snapshot)?,
            budget: self.budget,
            failure: Error::Io("injected read failure".to_string()),
            released: Arc::new(AtomicUsize::new(0)),
        })
    }

    fn snapshot(&self) -> Result<MemSnapshot> {
        self.inner.snapshot()
    }

    fn destroy(self, options: &Options) -> Result<()> {
        self.inner.destroy(options)
    }
}

#[test]
fn test_db_surfaces_engine_failures() -> Result<()> {
    let db: Db<FlakyEngine> = Db::open(Config::default())?;
    for k in ABCDE {
        db.put(k, k)?;
    }

    // seek + two steps succeed, the third step fails
    let mut it = db.iter(None, None, RangeType::CLOSE, 0, -1)?;
    let results: Vec<_> = it.entries().collect();
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 3);
    assert!(matches!(results.last(), Some(Err(Error::Io(_)))));

    // clear needs a full scan, so it fails and deletes nothing
    assert!(db.clear().is_err());
    assert_eq!(db.get("a")?, Some(b"a".to_vec()));
    Ok(())
}

#[test]
fn test_config_from_file() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("db.json");
    std::fs::write(
        &path,
        br#"{"path": "/var/lib/kv", "compression": false, "write_buffer_size": 65536}"#,
    )?;

    let config = Config::from_file(&path)?;
    assert_eq!(config.write_buffer_size, 65536);
    let db: Db = Db::open(config)?;
    assert_eq!(db.options().write_buffer_size_bytes(), Some(65536));
    db.close();

    let missing = Config::from_file(dir.path().join("missing.json"));
    assert!(matches!(missing, Err(Error::Io(_))));

    std::fs::write(&path, b"{not json")?;
    assert!(matches!(Config::from_file(&path), Err(Error::InvalidConfig(_))));
    Ok(())
}
