//! Move planning on top of the rules engine
//!
//! The planner never mutates the state it is asked about: every candidate
//! swap is played on a clone, which also carries the random source, so a
//! plan's predicted score is exactly what the real move will yield.

pub mod planner;

pub use tui_match3_core as core;
pub use tui_match3_types as types;

pub use planner::{apply_best_move, best_swap, evaluate_swap, PlanError, SwapPlan};
