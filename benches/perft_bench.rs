//! Move generator throughput: perft node counts per second across a handful
//! of representative positions (quiet middlegame, tactical middlegame,
//! sparse endgame).

use accipiter::position::Position;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const POSITIONS: &[(&str, &str)] = &[
    (
        "startpos",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    ),
    (
        "kiwipete",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    ),
    ("rook_endgame", "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1"),
];

fn perft_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft_depth_4");
    for (name, fen) in POSITIONS {
        group.bench_function(*name, |b| {
            b.iter(|| {
                let mut pos = Position::new(fen).unwrap();
                black_box(pos.perft(4))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, perft_bench);
criterion_main!(benches);
