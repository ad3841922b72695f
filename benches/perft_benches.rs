use criterion::{black_box, Criterion};

use plinth::Position;

fn positions() -> Vec<Position> {
    RAND_POSITIONS_ALL.iter().map(|fen| Position::from_fen(fen, false).unwrap()).collect()
}

fn perft_3(c: &mut Criterion) {
    let mut positions = positions();
    c.bench_function("perft_3", |b| {
        b.iter(|| {
            for pos in positions.iter_mut() {
                black_box(pos.perft(3));
            }
        })
    });
}

fn perft_4(c: &mut Criterion) {
    let mut positions = positions();
    c.bench_function("perft_4", |b| {
        b.iter(|| {
            for pos in positions.iter_mut() {
                black_box(pos.perft(4));
            }
        })
    });
}

criterion_group!(perft_benches, perft_3, perft_4);

static RAND_POSITIONS_ALL: [&str; 6] = [
    "rn2k3/pp1qPppr/5n2/1b2B3/8/4NP2/3NP1PP/R2K1B1R b q - 0 23",
    "r1bqkbnr/ppp2ppp/2np4/4p3/4PQ2/2NP4/PPP1NPPP/R1B1KB1R w KQkq e6 0 8",
    "r1bqkb1r/pp2pp2/2p2n2/6Q1/7p/2N4P/PP1B1PP1/R3KBNR w KQkq - 0 14",
    "3k4/6b1/1p5p/4p3/5rP1/6K1/8/8 w - - 0 40",
    "1k6/1p1n4/p6p/4P3/2P5/1R6/5K1P/4R3 b - - 2 33",
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
];
