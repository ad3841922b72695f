use criterion::{black_box, Criterion};

use plinth::core::bitboard::{BitBoard, RandBitBoard};

lazy_static! {
    pub static ref BIT_SETS_DENSE_1000: Vec<BitBoard> =
        RandBitBoard::default().pseudo_random(2_661_634).avg(6).max(11).many(1000);
}

fn popcount_1000(c: &mut Criterion) {
    lazy_static::initialize(&BIT_SETS_DENSE_1000);

    c.bench_function("popcount_1000", |b| {
        b.iter(|| {
            for bits in BIT_SETS_DENSE_1000.iter() {
                black_box(black_box(*bits).count_bits());
            }
        })
    });
}

criterion_group!(bit_benches, popcount_1000);
