use criterion::*;

use endgame_board::Board;
use endgame_solver::{solve, solve_fast, solve_win_loss_draw};
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::SeedableRng;

/// A reproducible position with `empties` empty squares, reached by random play.
fn endgame(seed: u64, empties: u8) -> Board {
    let mut rng = StdRng::seed_from_u64(seed);
    loop {
        let mut board = Board::new();
        while board.count_empties() > empties && !board.is_finished() {
            board = match board.get_moves().choose(&mut rng) {
                Some(loc) => board.make_move(loc),
                None => board.pass(),
            };
        }
        if board.count_empties() == empties {
            return board;
        }
    }
}

fn criterion_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve");
    group.sample_size(20);

    for empties in [8u8, 10, 12, 14].iter() {
        let board = endgame(u64::from(*empties), *empties);
        group.bench_with_input(BenchmarkId::new("exact", empties), &board, |b, &board| {
            b.iter(|| solve(black_box(board)))
        });
        group.bench_with_input(BenchmarkId::new("wld", empties), &board, |b, &board| {
            b.iter(|| solve_win_loss_draw(black_box(board)))
        });
        group.bench_with_input(BenchmarkId::new("fast", empties), &board, |b, &board| {
            b.iter(|| solve_fast(black_box(board)))
        });
    }

    group.finish();
}

criterion_group!(solver, criterion_solve);
criterion_main!(solver);
