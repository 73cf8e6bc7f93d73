use criterion::{black_box, criterion_group, criterion_main, Criterion};

use chess_rules::board::GameState;
use chess_rules::perft::perft;

const KIWIPETE_FEN: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

pub fn bench_legal_moves_from_start(c: &mut Criterion) {
    let state = GameState::new();
    c.bench_function("legal moves from start", |b| {
        b.iter(|| black_box(state.clone()).legal_moves())
    });
}

pub fn bench_legal_moves_from_kiwipete(c: &mut Criterion) {
    let state = GameState::from_fen(KIWIPETE_FEN);
    c.bench_function("legal moves from kiwipete", |b| {
        b.iter(|| black_box(state.clone()).legal_moves())
    });
}

pub fn bench_perft_2(c: &mut Criterion) {
    let state = GameState::new();
    c.bench_function("perft 2 from start", |b| {
        b.iter(|| perft(black_box(&state), 2))
    });
}

pub fn bench_perft_3(c: &mut Criterion) {
    let mut group = c.benchmark_group("flat-sampling");
    group.sample_size(10);
    let state = GameState::new();
    group.bench_function("perft 3 from start", |b| {
        b.iter(|| perft(black_box(&state), 3))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_legal_moves_from_start,
    bench_legal_moves_from_kiwipete,
    bench_perft_2,
    bench_perft_3
);
criterion_main!(benches);
