//! Level module - per-level parameters, objectives and the superpower inventory

use crate::scoring::target_score;
use crate::types::{
    ModeConfig, PowerKind, Symbol, CHOCOLATE_START_LEVEL, ICE_START_LEVEL, MAX_CHOCOLATE,
    MAX_CHOCOLATE_SPREAD_RATE, MAX_ICE, MIN_MOVES, MIN_TIME_SECS, TIMER_START_LEVEL,
    TIME_STEP_PER_LEVEL,
};

/// Collect `target` tiles of `symbol` during the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Objective {
    pub symbol: Symbol,
    pub current: u32,
    pub target: u32,
}

impl Objective {
    pub fn new(symbol: Symbol, target: u32) -> Self {
        Self {
            symbol,
            current: 0,
            target,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.current >= self.target
    }
}

/// True when there are no objectives or every one is met
pub fn objectives_complete(objectives: &[Objective]) -> bool {
    objectives.iter().all(Objective::is_complete)
}

/// Superpower inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Superpowers {
    pub bomb: u32,
    pub hammer: u32,
    pub time: u32,
}

impl Default for Superpowers {
    fn default() -> Self {
        Self {
            bomb: 1,
            hammer: 1,
            time: 1,
        }
    }
}

impl Superpowers {
    pub fn count(&self, kind: PowerKind) -> u32 {
        match kind {
            PowerKind::Bomb => self.bomb,
            PowerKind::Hammer => self.hammer,
            PowerKind::Time => self.time,
        }
    }

    fn slot(&mut self, kind: PowerKind) -> &mut u32 {
        match kind {
            PowerKind::Bomb => &mut self.bomb,
            PowerKind::Hammer => &mut self.hammer,
            PowerKind::Time => &mut self.time,
        }
    }

    pub fn add(&mut self, kind: PowerKind) {
        *self.slot(kind) += 1;
    }

    /// Consume one charge. Returns false when the inventory is empty.
    pub fn take(&mut self, kind: PowerKind) -> bool {
        let slot = self.slot(kind);
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }
}

/// Everything derived from (mode, level) when a level is set up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelParams {
    pub level: u32,
    /// Number of symbols in the active set.
    pub symbol_count: usize,
    pub target_score: u64,
    pub moves: u32,
    /// Time budget in seconds; `None` below the timer threshold.
    pub time_secs: Option<u32>,
    /// Spread chance of plain chocolate in percent.
    pub chocolate_spread_rate: u32,
    pub chocolates_to_spawn: u32,
    pub ices_to_spawn: u32,
    pub objective_count: usize,
    pub objective_target: u32,
}

impl LevelParams {
    pub fn derive(mode: &ModeConfig, level: u32) -> Self {
        let symbol_count = mode.symbol_count(level);
        let objective_count = (mode.max_objectives.min(1 + level / 2) as usize).min(symbol_count);
        Self {
            level,
            symbol_count,
            target_score: target_score(mode.width, level),
            moves: move_budget(mode, level),
            time_secs: time_budget(mode, level),
            chocolate_spread_rate: chocolate_spread_rate(level),
            chocolates_to_spawn: chocolates_to_spawn(level),
            ices_to_spawn: ices_to_spawn(level),
            objective_count,
            objective_target: mode.objective_base_count + level * 3 / 2,
        }
    }

    pub fn is_timed(&self) -> bool {
        self.time_secs.is_some()
    }
}

pub fn move_budget(mode: &ModeConfig, level: u32) -> u32 {
    mode.moves_base.saturating_sub(level).max(MIN_MOVES)
}

pub fn time_budget(mode: &ModeConfig, level: u32) -> Option<u32> {
    if level < TIMER_START_LEVEL {
        return None;
    }
    let step = (level - TIMER_START_LEVEL) * TIME_STEP_PER_LEVEL;
    Some(mode.timer_base.saturating_sub(step).max(MIN_TIME_SECS))
}

pub fn chocolate_spread_rate(level: u32) -> u32 {
    if level < CHOCOLATE_START_LEVEL {
        return 0;
    }
    (5 + 2 * (level - CHOCOLATE_START_LEVEL)).min(MAX_CHOCOLATE_SPREAD_RATE)
}

pub fn chocolates_to_spawn(level: u32) -> u32 {
    if level < CHOCOLATE_START_LEVEL {
        return 0;
    }
    (1 + (level - CHOCOLATE_START_LEVEL) / 2).min(MAX_CHOCOLATE)
}

pub fn ices_to_spawn(level: u32) -> u32 {
    if level < ICE_START_LEVEL {
        return 0;
    }
    (1 + (level - ICE_START_LEVEL) / 2).min(MAX_ICE)
}
