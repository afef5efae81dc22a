//! 合法走法生成性能基准

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use xiangqi_engine::{test_positions, Board, Color};

fn bench_legal_moves(c: &mut Criterion) {
    let opening = Board::opening();
    c.bench_function("legal_moves_opening", |b| {
        b.iter(|| black_box(&opening).legal_moves(Color::Red))
    });

    let midgame = Board::from_fen(test_positions::MID_1).unwrap();
    c.bench_function("legal_moves_midgame", |b| {
        b.iter(|| black_box(&midgame).legal_moves(Color::Black))
    });
}

fn bench_check_detection(c: &mut Criterion) {
    let midgame = Board::from_fen(test_positions::MID_1).unwrap();
    c.bench_function("is_in_check_midgame", |b| {
        b.iter(|| black_box(&midgame).is_in_check(Color::Black))
    });
}

criterion_group!(benches, bench_legal_moves, bench_check_detection);
criterion_main!(benches);
