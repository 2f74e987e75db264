use crate::board::Board;
use crate::level::{Objective, Superpowers};
use crate::types::{GameMode, LevelPhase, ObstacleKind, PowerKind, SpecialKind, Symbol};

/// Read-only copy of everything a presentation layer needs to draw a frame
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameSnapshot {
    pub mode: GameMode,
    pub width: usize,
    pub height: usize,
    pub symbols: Vec<Option<Symbol>>,
    pub specials: Vec<Option<SpecialKind>>,
    pub obstacles: Vec<Option<ObstacleKind>>,
    pub health: Vec<Option<u8>>,
    pub level: u32,
    pub score: u64,
    pub target_score: u64,
    /// Score gained towards the next progress reward.
    pub progress: u64,
    pub moves: u32,
    pub time_left: u32,
    pub timed: bool,
    pub combo: u32,
    pub objectives: Vec<Objective>,
    pub superpowers: Superpowers,
    pub selected_power: Option<PowerKind>,
    pub phase: LevelPhase,
    pub countdown_running: bool,
    pub busy: bool,
    pub session_id: u32,
    pub seed: u32,
}

impl GameSnapshot {
    /// Copy the board layers, reusing existing allocations
    pub(crate) fn copy_board(&mut self, board: &Board) {
        self.width = board.width();
        self.height = board.height();
        copy_layer(&mut self.symbols, board.symbols());
        copy_layer(&mut self.specials, board.specials());
        copy_layer(&mut self.obstacles, board.obstacles());
        copy_layer(&mut self.health, board.healths());
    }

    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    /// Progress towards the score target in `0..=100`
    pub fn progress_percent(&self) -> u32 {
        if self.target_score == 0 {
            return 100;
        }
        ((self.progress.saturating_mul(100) / self.target_score).min(100)) as u32
    }

    /// Symbol of a cell if it counts towards an unfinished objective
    pub fn is_objective_cell(&self, i: usize) -> bool {
        let Some(sym) = self.symbols.get(i).copied().flatten() else {
            return false;
        };
        self.objectives
            .iter()
            .any(|o| o.symbol == sym && !o.is_complete())
    }

    pub fn playable(&self) -> bool {
        self.phase.is_active() && !self.busy
    }
}

fn copy_layer<T: Copy>(dst: &mut Vec<T>, src: &[T]) {
    dst.clear();
    dst.extend_from_slice(src);
}
