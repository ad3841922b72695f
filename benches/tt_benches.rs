use criterion::{black_box, Criterion};

use plinth::prng::PRNG;
use plinth::tt::{Bound, TranspositionTable};
use plinth::BitMove;

fn single_thread_insert_empty(c: &mut Criterion) {
    let tt = TranspositionTable::new(8).unwrap();
    let mut prng = PRNG::new(1_120_246_457);
    c.bench_function("tt_single_thread_insert_empty", |b| {
        b.iter(|| {
            let key = prng.rand();
            tt.store(key, BitMove::new(0x555), Bound::Exact, 3, 4, 3);
        })
    });
}

fn single_thread_insert_full(c: &mut Criterion) {
    let tt = TranspositionTable::new(8).unwrap();
    let mut prng = PRNG::new(2_500_123_475);

    for _ in 0..1_600_000u64 {
        let key = prng.rand();
        tt.store(key, BitMove::new(0x555), Bound::Exact, 3, 4, 3);
    }

    c.bench_function("tt_single_thread_insert_full", |b| {
        b.iter(|| {
            let key = prng.rand();
            tt.store(key, BitMove::new(0x555), Bound::Exact, 3, 4, key as i16);
        })
    });
}

fn single_thread_lookup_sparse(c: &mut Criterion) {
    tt_single_thread_lookup(c, "tt_single_thread_lookup_sparse", 8, 20_000, 7_736_583_456);
}

fn single_thread_lookup_dense(c: &mut Criterion) {
    tt_single_thread_lookup(c, "tt_single_thread_lookup_dense", 8, 500_000, 80_474_222);
}

fn tt_single_thread_lookup(c: &mut Criterion, name: &str, size_mb: usize, placements: u64, seed: u64) {
    let tt = TranspositionTable::new(size_mb).unwrap();
    let mut prng = PRNG::new(seed);

    for _ in 0..placements {
        let key = prng.rand();
        tt.store(key, BitMove::new(0x555), Bound::Exact, 3, 4, 3);
    }

    c.bench_function(name, |b| {
        b.iter(|| {
            let key = prng.rand();
            black_box(tt.probe(key));
        })
    });
}

criterion_group!(
    tt_benches,
    single_thread_insert_empty,
    single_thread_insert_full,
    single_thread_lookup_sparse,
    single_thread_lookup_dense
);
