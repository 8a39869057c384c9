//! Range scan benchmarks
//!
//! Measures positioning cost (offset skipping, backward seek correction) and
//! per-entry stepping cost of bounded iterators over the in-memory engine.

use boundkv::{Db, Direction, Range};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn populated(n: u32) -> Db {
    let db: Db = Db::open(Default::default()).unwrap();
    let mut batch = db.write_batch();
    for i in 0..n {
        batch.put(format!("key_{:08}", i), vec![42u8; 100]);
    }
    batch.commit().unwrap();
    db
}

fn bench_full_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_full_scan");
    let db = populated(10_000);

    for direction in [Direction::Forward, Direction::Backward] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{direction:?}")),
            &direction,
            |b, &direction| {
                b.iter(|| {
                    let mut it = db.range_iter(Range::all(), 0, -1, direction).unwrap();
                    let mut n = 0usize;
                    while it.valid() {
                        n += black_box(it.key()).len();
                        it.next().unwrap();
                    }
                    n
                });
            },
        );
    }

    group.finish();
}

fn bench_offset_page(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_offset_page");
    let db = populated(10_000);
    let range = Range::closed("key_00001000", "key_00009000");

    for offset in [0i64, 100, 1000, 5000] {
        group.bench_with_input(BenchmarkId::from_parameter(offset), &offset, |b, &offset| {
            b.iter(|| {
                let mut it = db.range_iter(range.clone(), offset, 50, Direction::Backward).unwrap();
                it.entries().count()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_full_scan, bench_offset_page);
criterion_main!(benches);
