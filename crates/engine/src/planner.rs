use log::debug;

use crate::core::moves::valid_moves;
use crate::core::{GameState, RandomSource};
use crate::types::LevelPhase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanError {
    NotPlayable,
    NoValidMove,
    Rejected,
}

impl PlanError {
    pub fn code(self) -> &'static str {
        match self {
            PlanError::NotPlayable => "not_playable",
            PlanError::NoValidMove | PlanError::Rejected => "invalid_swap",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            PlanError::NotPlayable => "level is not active or an action is in flight",
            PlanError::NoValidMove => "board has no productive swap",
            PlanError::Rejected => "swap was not committed",
        }
    }
}

/// Simulated outcome of one swap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapPlan {
    pub a: usize,
    pub b: usize,
    pub score_gain: u64,
    /// Objective tiles collected (capped at each target).
    pub objective_gain: u32,
    pub completes_level: bool,
}

impl SwapPlan {
    fn rank(&self) -> (bool, u32, u64) {
        (self.completes_level, self.objective_gain, self.score_gain)
    }
}

fn objective_total<R: RandomSource>(state: &GameState<R>) -> u32 {
    state
        .objectives()
        .iter()
        .map(|o| o.current.min(o.target))
        .sum()
}

/// Play `a <-> b` on a copy of the state and measure the result
pub fn evaluate_swap<R>(state: &GameState<R>, a: usize, b: usize) -> Option<SwapPlan>
where
    R: RandomSource + Clone,
{
    let mut sim = state.clone();
    sim.set_frame_capture(false);
    if !sim.submit_swap(a, b) {
        return None;
    }
    Some(SwapPlan {
        a,
        b,
        score_gain: sim.score().saturating_sub(state.score()),
        objective_gain: objective_total(&sim).saturating_sub(objective_total(state)),
        completes_level: matches!(sim.phase(), LevelPhase::Complete { .. }),
    })
}

/// Highest-ranked productive swap; the first in scan order wins ties
pub fn best_swap<R>(state: &GameState<R>) -> Result<SwapPlan, PlanError>
where
    R: RandomSource + Clone,
{
    if !state.phase().is_active() || state.is_busy() {
        return Err(PlanError::NotPlayable);
    }
    let mut best: Option<SwapPlan> = None;
    for (a, b) in valid_moves(state.board()) {
        let Some(plan) = evaluate_swap(state, a, b) else {
            continue;
        };
        if best.map_or(true, |cur| plan.rank() > cur.rank()) {
            best = Some(plan);
        }
    }
    best.ok_or(PlanError::NoValidMove)
}

/// Find and play the best swap on the real state
pub fn apply_best_move<R>(state: &mut GameState<R>) -> Result<SwapPlan, PlanError>
where
    R: RandomSource + Clone,
{
    let plan = best_swap(state)?;
    debug!("planned swap {}<->{} (+{} points)", plan.a, plan.b, plan.score_gain);
    if !state.submit_swap(plan.a, plan.b) {
        return Err(PlanError::Rejected);
    }
    Ok(plan)
}
