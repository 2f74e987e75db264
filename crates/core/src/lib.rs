//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains all the rules of the match-3 engine: board layers,
//! run detection, special tiles, obstacles, the cascade pipeline, move
//! validation and level progression. It has **no dependencies** on UI,
//! timers, or I/O:
//!
//! - **Deterministic**: all randomness comes from an injected [`RandomSource`];
//!   the same seed produces the same game
//! - **Event driven**: side effects are appended to an event queue
//!   ([`EngineEvent`]) that a front-end drains after each action
//! - **Terminating**: special activation is a worklist with an activated set,
//!   and the cascade loop has a hard step cap
//!
//! # Module Structure
//!
//! - [`grid`]: row/column and flat index helpers
//! - [`board`]: symbol, special, obstacle and health layers
//! - [`matcher`]: run detection and special creation rules
//! - [`obstacles`]: spawn, spread and damage
//! - [`cascade`]: the resolution pipeline (clear, collapse, refill, repeat)
//! - [`moves`]: valid-move search, forced moves, shuffling
//! - [`level`] / [`scoring`]: per-level formulas and points
//! - [`game_state`]: session and level controller
//! - [`snapshot`] / [`events`]: what front-ends observe
//!
//! # Example
//!
//! ```
//! use tui_match3_core::GameState;
//! use tui_match3_types::GameMode;
//!
//! let mut game = GameState::new(GameMode::Easy, 12345);
//! game.start();
//!
//! let (a, b) = game.hint().expect("a fresh board always has a move");
//! assert!(game.submit_swap(a, b));
//! assert!(game.score() > 0);
//! ```

pub mod board;
pub mod cascade;
pub mod events;
pub mod game_state;
pub mod grid;
pub mod level;
pub mod matcher;
pub mod moves;
pub mod obstacles;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use tui_match3_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use events::EngineEvent;
pub use game_state::GameState;
pub use grid::Grid;
pub use level::{LevelParams, Objective, Superpowers};
pub use matcher::{find_matches, plan_specials, MatchOutcome, Orientation, Run, SpecialPlan};
pub use moves::{find_valid_move, has_valid_moves, valid_moves};
pub use rng::{RandomSource, ScriptedRng, SimpleRng};
pub use scoring::{clear_points, completion_bonus, target_score};
pub use snapshot::GameSnapshot;
