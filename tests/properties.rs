//! Property tests for the rules engine.
//!
//! Invariants covered:
//! - A freshly set up level has no runs and at least one productive swap.
//! - A cell never holds both an obstacle and a tile, and health only lives
//!   on health-bearing obstacles.
//! - Every action settles: no runs remain once it returns.
//! - Score never decreases and untimed moves never increase.
//! - Chained specials each fire at most once and every cascade stays under
//!   the step cap.

use proptest::prelude::*;
use tui_match3::core::matcher::has_match;
use tui_match3::core::{has_valid_moves, Board, EngineEvent, GameState, Objective};
use tui_match3::engine::apply_best_move;
use tui_match3::types::{GameMode, PowerKind, SpecialKind, Symbol, MAX_CASCADE_STEPS};

const CELLS: [char; 12] = ['0', '1', '2', '3', '0', '1', '2', '3', 'i', 'c', 't', 's'];

fn health_only_on_health_bearing(board: &Board) -> bool {
    (0..board.len()).all(|i| board.health(i).is_some() == board.is_health_bearing(i))
}

fn board_strategy() -> impl Strategy<Value = Board> {
    (3usize..8, 3usize..8).prop_flat_map(|(w, h)| {
        prop::collection::vec(prop::sample::select(CELLS.to_vec()), w * h).prop_map(move |cells| {
            let rows: Vec<String> = cells.chunks(w).map(|row| row.iter().collect()).collect();
            let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
            Board::parse(&refs).unwrap()
        })
    })
}

/// Boards where most tiles carry a special marker
fn special_board_strategy() -> impl Strategy<Value = Board> {
    board_strategy().prop_flat_map(|board| {
        let len = board.len();
        prop::collection::vec(
            prop::option::weighted(0.8, prop::sample::select(SpecialKind::ALL.to_vec())),
            len,
        )
        .prop_map(move |specials| {
            let mut board = board.clone();
            for (i, special) in specials.into_iter().enumerate() {
                board.set_special(i, special);
            }
            board
        })
    })
}

fn count_events(events: &[EngineEvent], pred: impl Fn(&EngineEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn fresh_level_is_settled_and_playable(
        seed in any::<u32>(),
        hard in any::<bool>(),
        level in 1u32..25,
    ) {
        let mode = if hard { GameMode::Hard } else { GameMode::Easy };
        let mut game = GameState::new(mode, seed);
        game.start_at_level(level);

        prop_assert!(game.phase().is_active());
        prop_assert!(!has_match(game.board()));
        prop_assert!(has_valid_moves(game.board()));
        prop_assert!(game.board().is_consistent());
        prop_assert!(health_only_on_health_bearing(game.board()));
        prop_assert_eq!(game.score(), 0);
    }

    #[test]
    fn planned_moves_keep_the_board_settled(
        seed in any::<u32>(),
        level in prop::sample::select(vec![1u32, 6, 11, 16]),
        steps in 1usize..12,
    ) {
        let mut game = GameState::new(GameMode::Easy, seed);
        game.start_at_level(level);
        game.set_objectives(vec![Objective::new(Symbol(0), 100_000)]);

        for _ in 0..steps {
            if !game.phase().is_active() {
                break;
            }
            let score = game.score();
            let moves = game.moves();
            if apply_best_move(&mut game).is_err() {
                break;
            }
            prop_assert!(game.score() > score);
            if !game.is_timed() {
                prop_assert_eq!(game.moves(), moves - 1);
            }
            prop_assert!(!has_match(game.board()));
            prop_assert!(game.board().is_consistent());
            prop_assert!(health_only_on_health_bearing(game.board()));
            prop_assert!(!game.is_busy());
        }
    }

    #[test]
    fn powers_on_generated_boards_terminate(
        board in board_strategy(),
        target in any::<prop::sample::Index>(),
        bomb in any::<bool>(),
        seed in any::<u32>(),
    ) {
        let mut game = GameState::new(GameMode::Easy, seed);
        game.start();
        let target = target.index(board.len());
        game.load_board(board);
        game.set_objectives(vec![Objective::new(Symbol(0), 100_000)]);

        let kind = if bomb { PowerKind::Bomb } else { PowerKind::Hammer };
        prop_assert!(game.use_superpower(kind, Some(target)));
        prop_assert!(!has_match(game.board()));
        prop_assert!(game.board().is_consistent());
        prop_assert!(health_only_on_health_bearing(game.board()));
        prop_assert!(!game.is_busy());
    }

    #[test]
    fn chained_specials_settle_within_the_step_cap(
        board in special_board_strategy(),
        target in any::<prop::sample::Index>(),
        action in 0u8..3,
        seed in any::<u32>(),
    ) {
        let specials = board.specials().iter().filter(|s| s.is_some()).count();
        let mut game = GameState::new(GameMode::Easy, seed);
        game.start();
        let target = target.index(board.len());
        let neighbour = board.grid().offset(target, 0, 1).or_else(|| board.grid().offset(target, 1, 0));
        game.load_board(board);
        game.set_objectives(vec![Objective::new(Symbol(0), 100_000)]);
        game.drain_events();

        match action {
            0 => {
                prop_assert!(game.use_superpower(PowerKind::Hammer, Some(target)));
            }
            1 => {
                prop_assert!(game.use_superpower(PowerKind::Bomb, Some(target)));
            }
            _ => {
                if let Some(n) = neighbour {
                    game.submit_swap(target, n);
                }
            }
        }

        let events = game.drain_events();
        let activated = count_events(&events, |e| matches!(e, EngineEvent::SpecialActivated { .. }));
        let created = count_events(&events, |e| matches!(e, EngineEvent::SpecialCreated { .. }));
        prop_assert!(activated <= specials + created);

        // A power step, the cascade and a post-shuffle cascade at most.
        let steps = count_events(&events, |e| matches!(e, EngineEvent::CascadeStep { .. }));
        prop_assert!(steps <= 2 * MAX_CASCADE_STEPS as usize + 1);
        for event in &events {
            if let EngineEvent::CascadeStep { combo, .. } = event {
                prop_assert!(*combo < MAX_CASCADE_STEPS);
            }
        }

        prop_assert!(!has_match(game.board()));
        prop_assert!(game.board().is_consistent());
        prop_assert!(!game.is_busy());
    }
}
