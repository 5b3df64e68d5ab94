use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use play_2048::engine::{process_line, transpose, Board, Move};
use play_2048::game::Game;
use rand::{rngs::StdRng, SeedableRng};
use std::hint::black_box;

fn corpus() -> Vec<Board> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut boards = Vec::new();
    // Empty and two-tile starts
    boards.push(Board::EMPTY);
    let mut b = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
    boards.push(b);
    // Derive a variety of densities deterministically
    let seq = [Move::Left, Move::Up, Move::Right, Move::Down];
    for i in 0..20 {
        let dir = seq[i % seq.len()];
        let nb = b.shift(dir).board;
        if nb != b { b = nb.with_random_tile(&mut rng); }
        boards.push(b);
    }
    boards
}

fn bench_shift(c: &mut Criterion) {
    for dir in Move::ALL {
        c.bench_function(&format!("shift/{dir}"), |bch| {
            let boards = corpus();
            bch.iter(|| {
                let mut acc = 0u64;
                for &bd in &boards { acc = acc.wrapping_add(bd.shift(dir).score); }
                black_box(acc)
            })
        });
    }
    c.bench_function("line/process_line", |bch| {
        let lines = [[2, 2, 2, 2], [2, 0, 2, 2], [0, 0, 0, 0], [4, 8, 8, 16], [0, 2, 0, 2]];
        bch.iter(|| {
            for &line in &lines { black_box(process_line(black_box(line))); }
        })
    });
    c.bench_function("board/transpose", |bch| {
        let boards = corpus();
        bch.iter(|| {
            for &bd in &boards { black_box(transpose(bd)); }
        })
    });
}

fn bench_game(c: &mut Criterion) {
    c.bench_function("board/with_random_tile", |bch| {
        bch.iter_batched(
            || (Board::EMPTY, StdRng::seed_from_u64(7)),
            |(mut bd, mut rng)| {
                for _ in 0..16 { bd = bd.with_random_tile(&mut rng); }
                black_box(bd)
            },
            BatchSize::SmallInput,
        )
    });
    c.bench_function("game/cycle_moves", |bch| {
        bch.iter_batched(
            || {
                let mut game = Game::from_seed(9);
                game.start();
                game
            },
            |mut game| {
                for dir in Move::ALL.iter().cycle().take(64) { game.make_move(*dir); }
                black_box(game.score())
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_queries(c: &mut Criterion) {
    c.bench_function("query/has_available_moves", |bch| {
        let boards = corpus();
        bch.iter(|| {
            let mut acc = 0usize;
            for bd in &boards { acc += bd.has_available_moves() as usize; }
            black_box(acc)
        })
    });
    c.bench_function("query/count_empty", |bch| {
        let boards = corpus();
        bch.iter(|| {
            let mut acc = 0usize;
            for bd in &boards { acc ^= bd.count_empty(); }
            black_box(acc)
        })
    });
}

criterion_group!(engine_ops, bench_shift, bench_game, bench_queries);
criterion_main!(engine_ops);
