//! Independent iterators on separate threads

use boundkv::{Db, RangeType, Result};
use std::sync::Arc;
use std::thread;

#[test]
fn test_concurrent_iterators_with_writer() -> Result<()> {
    let db: Arc<Db> = Arc::new(Db::open(Default::default())?);
    for i in 0..1000u32 {
        db.put(i.to_be_bytes(), i.to_le_bytes())?;
    }

    let writer = {
        let db = Arc::clone(&db);
        thread::spawn(move || -> Result<()> {
            for i in 1000..2000u32 {
                db.put(i.to_be_bytes(), i.to_le_bytes())?;
            }
            Ok(())
        })
    };

    let readers: Vec<_> = (0..4u32)
        .map(|t| {
            let db = Arc::clone(&db);
            thread::spawn(move || -> Result<()> {
                let min = (t * 100).to_be_bytes();
                let max = (t * 100 + 99).to_be_bytes();
                for _ in 0..20 {
                    let (lo, hi) = (min.as_slice(), max.as_slice());
                    let mut it = db.iter(Some(lo), Some(hi), RangeType::CLOSE, 0, -1)?;
                    let mut expected = t * 100;
                    while it.valid() {
                        assert_eq!(it.key(), expected.to_be_bytes());
                        assert_eq!(it.value(), expected.to_le_bytes());
                        expected += 1;
                        it.next()?;
                    }
                    assert_eq!(expected, t * 100 + 100);

                    // every scan sees a consistent prefix of the writer's keys
                    let mut tail = db.rev_iter(None, None, RangeType::CLOSE, 0, 1)?;
                    assert!(tail.valid());
                    let last = tail.key().try_into().unwrap_or([0; 4]);
                    let last = u32::from_be_bytes(last);
                    assert!((999..2000).contains(&last));
                    tail.close();
                }
                Ok(())
            })
        })
        .collect();

    writer.join().expect("writer panicked")?;
    for reader in readers {
        reader.join().expect("reader panicked")?;
    }

    let mut it = db.iter(None, None, RangeType::CLOSE, 0, -1)?;
    assert_eq!(it.entries().count(), 2000);
    Ok(())
}

#[test]
fn test_iterator_moves_across_threads() -> Result<()> {
    let db: Db = Db::open(Default::default())?;
    for k in ["a", "b", "c"] {
        db.put(k, k)?;
    }
    let mut it = db.rev_iter(None, None, RangeType::CLOSE, 0, -1)?;

    let keys = thread::spawn(move || {
        let mut keys = Vec::new();
        while it.valid() {
            keys.push(it.key().to_vec());
            if it.next().is_err() {
                break;
            }
        }
        keys
    })
    .join()
    .expect("iterator thread panicked");

    assert_eq!(keys, vec![b"c".to_vec(), b"b".to_vec(), b"a".to_vec()]);
    Ok(())
}
