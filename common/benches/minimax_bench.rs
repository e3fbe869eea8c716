use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use reaper_common::games::tictactoe::{
    Board, BotInput, Mark, calculate_best_move, calculate_move, evaluate,
};

fn bench_best_move_empty_board() {
    black_box(calculate_best_move(&Board::empty(), Mark::X, Mark::O));
}

fn bench_reply_to_corner_opening() {
    let mut board = Board::empty();
    board.apply_move(0, Mark::X);
    black_box(calculate_best_move(&board, Mark::O, Mark::X));
}

fn bench_full_self_play() {
    let mut board = Board::empty();
    let mut mark = Mark::X;
    while let Some(index) = calculate_move(BotInput { board, bot_mark: mark }) {
        board.apply_move(index, mark);
        if evaluate(&board).is_over() {
            break;
        }
        mark = match mark.opponent() {
            Some(next) => next,
            None => break,
        };
    }
    black_box(board);
}

fn minimax_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("minimax");

    group.sample_size(20);

    group.bench_function("best_move_empty", |b| {
        b.iter(bench_best_move_empty_board)
    });

    group.bench_function("reply_to_corner", |b| {
        b.iter(bench_reply_to_corner_opening)
    });

    group.bench_function("self_play", |b| {
        b.iter(bench_full_self_play)
    });

    group.finish();
}

criterion_group!(benches, minimax_bench);
criterion_main!(benches);
