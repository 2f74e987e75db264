use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use tui_match3::core::{find_matches, has_valid_moves, Board, GameState};
use tui_match3::engine::best_swap;
use tui_match3::types::GameMode;

fn started(seed: u32) -> GameState {
    let mut state = GameState::new(GameMode::Hard, seed);
    state.start();
    state.drain_events();
    state
}

fn bench_find_matches(c: &mut Criterion) {
    let state = started(12345);
    let board = state.board().clone();

    c.bench_function("find_matches_10x10", |b| {
        b.iter(|| find_matches(black_box(&board)))
    });
}

fn bench_valid_moves(c: &mut Criterion) {
    let state = started(12345);
    let board = state.board().clone();

    c.bench_function("has_valid_moves_10x10", |b| {
        b.iter(|| has_valid_moves(black_box(&board)))
    });
}

fn bench_cascade(c: &mut Criterion) {
    // Diagonal stripes with one open run in the bottom row.
    let rows = [
        "0120120120",
        "1201201201",
        "2012012012",
        "0120120120",
        "1201201201",
        "2012012012",
        "0120120120",
        "1201201201",
        "2012012012",
        "3303120120",
    ];
    let board = Board::parse(&rows).expect("bench board");

    c.bench_function("swap_and_resolve", |b| {
        b.iter_batched(
            || {
                let mut state = started(7);
                state.load_board(board.clone());
                state
            },
            |mut state| {
                let (a, b) = state.hint().unwrap_or((92, 93));
                state.submit_swap(a, b);
                state.drain_events()
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_planner(c: &mut Criterion) {
    let state = started(99);

    c.bench_function("best_swap_10x10", |b| b.iter(|| best_swap(black_box(&state))));
}

criterion_group!(
    benches,
    bench_find_matches,
    bench_valid_moves,
    bench_cascade,
    bench_planner
);
criterion_main!(benches);
