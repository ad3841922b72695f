use std::time::Duration;

use criterion::{black_box, Criterion};

use plinth::core::bitboard::BitBoard;
use plinth::core::sq::SQ;
use plinth::magic;

fn king_lookup(c: &mut Criterion) {
    magic::init();
    c.bench_function("king_lookup", |b| {
        b.iter(|| {
            (0..64u8).fold(0u64, |a, s| a ^ magic::king_moves(SQ(s)).0)
        })
    });
}

fn knight_lookup(c: &mut Criterion) {
    c.bench_function("knight_lookup", |b| {
        b.iter(|| {
            (0..64u8).fold(0u64, |a, s| a ^ magic::knight_moves(SQ(s)).0)
        })
    });
}

fn rook_lookup(c: &mut Criterion) {
    c.bench_function("rook_lookup", |b| {
        b.iter(|| {
            (0..64u8).fold(0u64, |a, s| a ^ magic::rook_attacks(BitBoard(a), SQ(s)).0)
        })
    });
}

fn bishop_lookup(c: &mut Criterion) {
    c.bench_function("bishop_lookup", |b| {
        b.iter(|| {
            (0..64u8).fold(0u64, |a, s| a ^ magic::bishop_attacks(BitBoard(a), SQ(s)).0)
        })
    });
}

fn queen_lookup(c: &mut Criterion) {
    c.bench_function("queen_lookup", |b| {
        b.iter(|| {
            (0..64u8).fold(0u64, |a, s| a ^ magic::queen_attacks(BitBoard(a), SQ(s)).0)
        })
    });
}

// Benefits from locality: each piece's attack set feeds the next lookup.
fn multi_lookup_sequential(c: &mut Criterion) {
    c.bench_function("multi_lookup_sequential", |b| {
        b.iter(|| {
            (0..64u8).fold(0u64, |a, s| {
                let mut x = magic::knight_moves(SQ(s)).0;
                x ^= magic::king_moves(SQ(s)).0;
                x ^= magic::bishop_attacks(BitBoard(x), SQ(s)).0;
                x ^= magic::rook_attacks(BitBoard(x), SQ(s)).0;
                x ^= black_box(magic::queen_attacks(BitBoard(x), SQ(s)).0);
                a ^ x
            })
        })
    });
}

// Stutters: each square reuses the previous square's occupancy, so the
// sliding-attack cache must be refreshed far more often.
fn multi_lookup_stutter(c: &mut Criterion) {
    c.bench_function("multi_lookup_stutter", |b| {
        b.iter(|| {
            (0..64u8).fold(0u64, |a, s| {
                let mut x = magic::queen_attacks(BitBoard(a), SQ(s)).0;
                x ^= magic::king_moves(SQ(s)).0;
                x ^= magic::bishop_attacks(BitBoard(a), SQ(s)).0;
                x ^= magic::knight_moves(SQ(s)).0;
                x ^= black_box(magic::rook_attacks(BitBoard(a), SQ(s)).0);
                a ^ x
            })
        })
    });
}

criterion_group!(name = lookup_benches;
    config = Criterion::default()
        .sample_size(250)
        .warm_up_time(Duration::from_millis(3));
    targets = king_lookup, knight_lookup, rook_lookup, bishop_lookup, queen_lookup,
        multi_lookup_sequential, multi_lookup_stutter
);
