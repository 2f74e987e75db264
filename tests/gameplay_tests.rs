//! Player actions end to end: swaps, specials, powers and obstacles

use tui_match3::core::{clear_points, Board, EngineEvent, GameState, Objective};
use tui_match3::types::{
    Cue, GameMode, LevelPhase, ObstacleKind, PowerKind, SpecialKind, Symbol,
};

/// Active level-1 game on a hand-made board with an objective that cannot finish
fn game_on(rows: &[&str]) -> GameState {
    let mut game = GameState::new(GameMode::Easy, 2024);
    game.start();
    game.load_board(Board::parse(rows).unwrap());
    game.set_objectives(vec![Objective::new(Symbol(0), 10_000)]);
    game.drain_events();
    game
}

fn first_step(events: &[EngineEvent]) -> (u32, u32, u64) {
    events
        .iter()
        .find_map(|e| match *e {
            EngineEvent::CascadeStep {
                combo,
                removed,
                points,
            } => Some((combo, removed, points)),
            _ => None,
        })
        .expect("no cascade step")
}

/// No runs and no productive swap
const DEAD: [&str; 4] = ["0123", "1230", "2301", "3012"];

#[test]
fn test_four_run_swap_leaves_row_clear_on_swapped_cell() {
    let mut game = game_on(&["00102", "12031", "31213", "23120"]);
    let moves = game.moves();

    assert!(game.submit_swap(2, 7));
    assert_eq!(game.moves(), moves - 1);

    let events = game.drain_events();
    assert!(events.contains(&EngineEvent::SpecialCreated {
        index: 2,
        kind: SpecialKind::RowClear,
    }));
    // The special cell survives the step that created it.
    assert_eq!(first_step(&events), (0, 3, clear_points(3, 1, 0)));
    assert!(events.contains(&EngineEvent::Cue(Cue::Swap)));
}

#[test]
fn test_unproductive_swap_reverts_and_costs_nothing() {
    let mut game = game_on(&DEAD);
    let before = game.board().clone();
    let moves = game.moves();

    assert!(!game.submit_swap(0, 1));
    assert_eq!(game.board(), &before);
    assert_eq!(game.moves(), moves);
    assert_eq!(game.score(), 0);

    let events = game.drain_events();
    assert!(events.contains(&EngineEvent::SwapReverted { a: 0, b: 1 }));
    assert!(events.contains(&EngineEvent::Cue(Cue::InvalidMove)));
}

#[test]
fn test_special_pair_swap_fires_both() {
    let mut game = game_on(&DEAD);
    game.board_mut().set_special(5, Some(SpecialKind::RowClear));
    game.board_mut().set_special(6, Some(SpecialKind::ColClear));
    let moves = game.moves();

    // Neither swap creates a run, but a special pair never reverts.
    assert!(game.submit_swap(5, 6));
    assert_eq!(game.moves(), moves - 1);

    let events = game.drain_events();
    assert!(events.contains(&EngineEvent::SpecialActivated {
        index: 5,
        kind: SpecialKind::RowClear,
    }));
    assert!(events.contains(&EngineEvent::SpecialActivated {
        index: 6,
        kind: SpecialKind::ColClear,
    }));
    // Row 1 plus column 2 share cell 6.
    assert_eq!(first_step(&events), (0, 7, 77));
}

#[test]
fn test_color_clear_swap_removes_partner_symbol() {
    let mut game = game_on(&["0123", "2230", "2301", "3012"]);
    game.board_mut().set_special(5, Some(SpecialKind::ColorClear));

    assert!(game.submit_swap(5, 4));

    let events = game.drain_events();
    let cleared: Vec<usize> = events
        .iter()
        .take_while(|e| !matches!(e, EngineEvent::CascadeStep { .. }))
        .filter_map(|e| match e {
            EngineEvent::CellCleared { index, .. } => Some(*index),
            _ => None,
        })
        .collect();
    assert_eq!(cleared, vec![2, 4, 5, 8, 15]);
    assert_eq!(first_step(&events), (0, 5, 55));
    assert!(game.score() >= 55);
}

#[test]
fn test_hammer_removes_one_cell() {
    let mut game = game_on(&DEAD);
    assert!(game.use_superpower(PowerKind::Hammer, Some(5)));
    assert_eq!(game.superpowers().hammer, 0);

    let events = game.drain_events();
    assert!(events.contains(&EngineEvent::PowerUsed {
        kind: PowerKind::Hammer,
        target: Some(5),
    }));
    assert_eq!(first_step(&events), (0, 1, 11));

    // Empty inventory is a no-op.
    assert!(!game.use_superpower(PowerKind::Hammer, Some(5)));
    assert!(game.drain_events().is_empty());
}

#[test]
fn test_bomb_power_clears_the_area() {
    let mut game = game_on(&DEAD);
    let moves = game.moves();
    assert!(game.use_superpower(PowerKind::Bomb, Some(5)));
    assert_eq!(first_step(&game.drain_events()), (0, 9, 99));
    assert_eq!(game.moves(), moves - 1);
}

/// Trash at 6; swapping 2 and 3 is the only productive move
const TRASH: [&str; 4] = ["0010", "12t3", "2301", "3012"];

#[test]
fn test_trash_takes_two_power_hits() {
    let mut game = game_on(&TRASH);
    game.superpowers_mut().hammer = 2;

    assert!(game.use_superpower(PowerKind::Hammer, Some(6)));
    let events = game.drain_events();
    assert!(events.contains(&EngineEvent::ObstacleDamaged { index: 6, health: 1 }));
    assert!(!events.iter().any(|e| matches!(e, EngineEvent::ObstacleDestroyed { .. })));
    assert_eq!(game.board().obstacle(6), Some(ObstacleKind::Trash));
    assert_eq!(game.board().health(6), Some(1));

    assert!(game.use_superpower(PowerKind::Hammer, Some(6)));
    let events = game.drain_events();
    assert!(events.contains(&EngineEvent::ObstacleDestroyed {
        index: 6,
        kind: ObstacleKind::Trash,
    }));
    assert!(events.contains(&EngineEvent::CellCleared {
        index: 6,
        symbol: None,
    }));
    assert_eq!(first_step(&events).1, 1);
    assert_eq!(game.board().obstacle(6), None);
    assert!(game.board().symbol(6).is_some());
}

#[test]
fn test_bomb_on_trash_only_damages_it() {
    let mut game = game_on(&TRASH);
    let before = game.board().clone();

    assert!(game.use_superpower(PowerKind::Bomb, Some(6)));
    assert_eq!(game.superpowers().bomb, 0);
    assert_eq!(game.board().health(6), Some(1));
    assert_eq!(game.board().symbols(), before.symbols());
    assert!(!game
        .drain_events()
        .iter()
        .any(|e| matches!(e, EngineEvent::CellCleared { .. })));
}

#[test]
fn test_symbol_falling_onto_trash_is_crushed() {
    let mut game = game_on(&["012", "130", "2t1"]);
    assert!(game.use_superpower(PowerKind::Hammer, Some(4)));

    let events = game.drain_events();
    assert!(events.contains(&EngineEvent::CellCleared {
        index: 4,
        symbol: Some(Symbol(3)),
    }));
    assert!(events.contains(&EngineEvent::TileCrushed { index: 1 }));
    assert_eq!(game.board().obstacle(7), Some(ObstacleKind::Trash));
    assert!(game.board().is_consistent());
}

#[test]
fn test_adjacent_ice_breaks_on_removal() {
    let mut game = game_on(&["0123", "1i30", "2301", "3012"]);
    assert!(game.use_superpower(PowerKind::Hammer, Some(6)));

    assert!(game.drain_events().contains(&EngineEvent::IceBroken { index: 5 }));
    assert_eq!(game.board().obstacle(5), None);
}

#[test]
fn test_swaps_touching_obstacles_are_refused() {
    let mut game = game_on(&["0123", "1i30", "2301", "3012"]);
    assert!(!game.submit_swap(4, 5));
    assert_eq!(game.drain_events(), vec![EngineEvent::Cue(Cue::InvalidMove)]);
}

#[test]
fn test_timed_level_move_grants_a_second() {
    let mut game = GameState::new(GameMode::Easy, 9);
    game.start_at_level(15);
    assert!(game.is_timed());
    game.load_board(Board::parse(&["00102", "12031", "31213", "23120"]).unwrap());
    game.set_objectives(vec![Objective::new(Symbol(0), 10_000)]);
    let time = game.time_left();
    let moves = game.moves();

    assert!(game.submit_swap(2, 7));
    assert_eq!(game.time_left(), time + 1);
    assert_eq!(game.moves(), moves);
}

#[test]
fn test_last_move_fails_the_level() {
    let mut game = game_on(&["00102", "12031", "31213", "23120"]);
    game.set_moves(1);

    assert!(game.submit_swap(2, 7));
    assert_eq!(game.moves(), 0);
    assert_eq!(game.phase(), LevelPhase::Failed);
    assert!(game.drain_events().contains(&EngineEvent::Cue(Cue::GameOver)));

    // Nothing is accepted until the session is reset.
    assert!(!game.submit_swap(0, 1));
    assert!(!game.use_superpower(PowerKind::Bomb, Some(0)));

    game.reset_session();
    assert!(game.phase().is_active());
    assert_eq!(game.level(), 1);
    assert_eq!(game.score(), 0);
}
