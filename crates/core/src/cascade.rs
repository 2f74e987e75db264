//! Cascade module - the resolution pipeline
//!
//! One resolution step: detect runs, create specials, activate specials
//! (worklist with an activated set), apply adjacency effects and obstacle
//! damage, commit removals and score, collapse, refill. Steps repeat until a
//! step removes nothing.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use log::{debug, warn};

use crate::events::EngineEvent;
use crate::game_state::GameState;
use crate::level::objectives_complete;
use crate::matcher::{find_matches, plan_specials};
use crate::moves::{force_valid_move, has_valid_moves, shuffle_tiles};
use crate::obstacles::{damage_obstacle, expand_chocolate, expand_ice};
use crate::rng::RandomSource;
use crate::scoring::clear_points;
use crate::types::{
    combo_message, Cue, ObstacleKind, Phase, SpecialKind, MAX_CASCADE_STEPS, SHUFFLE_ATTEMPTS,
    SHUFFLE_MESSAGE,
};

impl<R: RandomSource> GameState<R> {
    /// Match the board and create specials.
    ///
    /// Returns the removal set (empty when nothing matched). Cells that
    /// received a new special are not part of it.
    pub(crate) fn handle_move(&mut self, swapped: &[usize]) -> BTreeSet<usize> {
        let runs = find_matches(&self.board);
        if runs.is_empty() {
            return BTreeSet::new();
        }
        let outcome = plan_specials(&runs, swapped);
        for plan in &outcome.specials {
            self.board.set_special(plan.index, Some(plan.kind));
            self.events.push(EngineEvent::SpecialCreated {
                index: plan.index,
                kind: plan.kind,
            });
            self.events.push(EngineEvent::Cue(Cue::SpecialCreated(plan.kind)));
        }
        outcome.to_remove
    }

    /// Blast zone of a special at `i`; the bool says whether the zone deals damage
    fn blast_zone(&self, i: usize, kind: SpecialKind) -> (Vec<usize>, bool) {
        let grid = self.board.grid();
        let (row, col) = grid.rowcol(i);
        match kind {
            SpecialKind::RowClear => (grid.row_cells(row).collect(), true),
            SpecialKind::ColClear => (grid.col_cells(col).collect(), true),
            SpecialKind::AreaBomb => (grid.area3x3(i).to_vec(), true),
            SpecialKind::ColorClear => {
                let zone = match self.board.symbol(i) {
                    Some(sym) => (0..grid.len())
                        .filter(|&j| self.board.symbol(j) == Some(sym))
                        .collect(),
                    None => Vec::new(),
                };
                (zone, false)
            }
        }
    }

    /// Resolve one removal set completely. Returns the number of cells removed.
    pub(crate) fn remove_and_refill(&mut self, mut to_remove: BTreeSet<usize>) -> u32 {
        if to_remove.is_empty() {
            return 0;
        }

        // Special activation, each cell at most once.
        let mut activated = BTreeSet::new();
        let mut damage: BTreeMap<usize, u32> = BTreeMap::new();
        let mut queue: VecDeque<usize> = to_remove
            .iter()
            .copied()
            .filter(|&i| self.board.special(i).is_some())
            .collect();
        while let Some(i) = queue.pop_front() {
            let Some(kind) = self.board.special(i) else {
                continue;
            };
            if !activated.insert(i) {
                continue;
            }
            self.events.push(EngineEvent::SpecialActivated { index: i, kind });
            match kind {
                SpecialKind::AreaBomb => {
                    self.events.push(EngineEvent::Cue(Cue::Bomb));
                    self.events.push(EngineEvent::Cue(Cue::Shake { strong: false }));
                }
                SpecialKind::ColorClear => self
                    .events
                    .push(EngineEvent::Cue(Cue::SpecialCreated(SpecialKind::ColorClear))),
                _ => {}
            }
            let (zone, damaging) = self.blast_zone(i, kind);
            for j in zone {
                to_remove.insert(j);
                if damaging && self.board.is_health_bearing(j) {
                    *damage.entry(j).or_insert(0) += 1;
                }
                if self.board.special(j).is_some() && !activated.contains(&j) {
                    queue.push_back(j);
                }
            }
            self.board.set_special(i, None);
        }

        // Adjacency effects on plain ice and chocolate.
        let grid = self.board.grid();
        let mut break_ice = BTreeSet::new();
        let mut remove_chocolate = BTreeSet::new();
        for &i in &to_remove {
            for n in grid.neighbors4(i) {
                match self.board.obstacle(n) {
                    Some(ObstacleKind::Ice) => {
                        break_ice.insert(n);
                    }
                    Some(ObstacleKind::Chocolate) => {
                        remove_chocolate.insert(n);
                    }
                    _ => {}
                }
            }
        }

        if !damage.is_empty() {
            self.events.push(EngineEvent::Cue(Cue::Hammer));
            for (&i, &amount) in &damage {
                if damage_obstacle(&mut self.board, i, amount, &mut self.events) {
                    to_remove.insert(i);
                }
            }
        }

        if !break_ice.is_empty() {
            self.events.push(EngineEvent::Cue(Cue::IceBreak));
            for &i in &break_ice {
                self.board.clear_obstacle(i);
                self.events.push(EngineEvent::IceBroken { index: i });
            }
        }
        for &i in &remove_chocolate {
            self.board.clear_obstacle(i);
            to_remove.insert(i);
        }

        // Commit.
        for &i in &to_remove {
            let symbol = self.board.symbol(i);
            if let Some(sym) = symbol {
                if let Some(objective) = self.objectives.iter_mut().find(|o| o.symbol == sym) {
                    objective.current += 1;
                }
            }
            self.board.clear_tile(i);
            self.events.push(EngineEvent::CellCleared { index: i, symbol });
        }

        let removed = to_remove.len() as u32;
        let points = clear_points(removed, self.level, self.combo);
        self.score += points;
        self.events.push(EngineEvent::Cue(Cue::Combo { size: removed }));
        self.events.push(EngineEvent::CascadeStep {
            combo: self.combo,
            removed,
            points,
        });
        self.check_progress_reward();

        if self.phase.is_active() && !self.objectives_announced && objectives_complete(&self.objectives) {
            self.objectives_announced = true;
            self.stop_countdown();
            self.events.push(EngineEvent::ObjectivesComplete);
        }
        debug!(
            "step: removed {} (+{} pts, combo {}), activated {}",
            removed,
            points,
            self.combo,
            activated.len()
        );

        self.frame(Phase::Cleared);
        self.collapse();
        self.frame(Phase::Collapsed);
        self.refill();
        self.frame(Phase::Refilled);
        removed
    }

    /// Gravity per column. Every obstacle holds its place and splits the column;
    /// a symbol that would come to rest on trash is crushed instead.
    pub(crate) fn collapse(&mut self) {
        let grid = self.board.grid();
        let height = grid.height() as isize;
        for c in 0..grid.width() {
            let mut write: isize = height - 1;
            for r in (0..height).rev() {
                let i = grid.index(r as usize, c);
                if self.board.is_blocked(i) {
                    write = r - 1;
                    continue;
                }
                if self.board.symbol(i).is_none() {
                    continue;
                }
                if write < height - 1 {
                    let below = grid.index((write + 1) as usize, c);
                    if self.board.obstacle(below) == Some(ObstacleKind::Trash) {
                        self.board.clear_tile(i);
                        self.events.push(EngineEvent::TileCrushed { index: i });
                        continue;
                    }
                }
                let target = grid.index(write as usize, c);
                if target != i {
                    self.board.move_cell(i, target);
                }
                write -= 1;
            }
        }
    }

    /// Fill every empty obstacle-free cell with a random symbol
    pub(crate) fn refill(&mut self) {
        for i in 0..self.board.len() {
            if !self.board.is_blocked(i) && self.board.symbol(i).is_none() {
                let symbol = self.random_symbol();
                self.board.set_symbol(i, Some(symbol));
            }
        }
    }

    /// Repeat resolution steps until one removes nothing.
    ///
    /// Only the first step uses the swapped cells for special placement.
    /// Returns the number of non-empty steps.
    pub(crate) fn run_cascade(&mut self, swapped: &[usize]) -> u32 {
        self.combo = 0;
        let mut hint = swapped;
        for _ in 0..MAX_CASCADE_STEPS {
            let to_remove = self.handle_move(hint);
            let removed = self.remove_and_refill(to_remove);
            if removed == 0 {
                return self.combo;
            }
            self.combo += 1;
            if let Some(message) = combo_message(self.combo) {
                self.events.push(EngineEvent::Message(message));
            }
            hint = &[];
        }
        warn!(
            "cascade stopped after {} steps without settling",
            MAX_CASCADE_STEPS
        );
        self.combo
    }

    /// Per-action driver: cascade, then end-of-turn spread and reshuffle
    pub(crate) fn process_matches(&mut self, swapped: &[usize]) -> u32 {
        let steps = self.run_cascade(swapped);
        if self.phase.is_active() {
            let level = self.level;
            let rate = self.params.chocolate_spread_rate;
            let chocolate = expand_chocolate(&mut self.board, &mut self.rng, level, rate, &mut self.events);
            let ice = expand_ice(&mut self.board, &mut self.rng, level, &mut self.events);
            if chocolate + ice > 0 {
                debug!("spread: chocolate {} ice {}", chocolate, ice);
            }
            self.frame(Phase::Spread);
            if !has_valid_moves(&self.board) {
                self.auto_shuffle();
            }
        }
        steps
    }

    /// Permute tiles until a valid move exists, forcing one as a last resort,
    /// then settle any runs the shuffle created.
    pub(crate) fn auto_shuffle(&mut self) {
        self.events.push(EngineEvent::Message(SHUFFLE_MESSAGE));
        self.events.push(EngineEvent::Cue(Cue::Shuffle));
        self.events.push(EngineEvent::Shuffled);

        let mut attempts = 0;
        loop {
            shuffle_tiles(&mut self.board, &mut self.rng);
            attempts += 1;
            if has_valid_moves(&self.board) || attempts >= SHUFFLE_ATTEMPTS {
                break;
            }
        }
        if !has_valid_moves(&self.board) {
            force_valid_move(&mut self.board, &mut self.rng);
        }
        debug!("shuffled board in {} attempts", attempts);
        self.frame(Phase::Shuffled);
        self.run_cascade(&[]);
    }
}

#[cfg(test)]
mod tests {
    use crate::board::Board;
    use crate::events::EngineEvent;
    use crate::game_state::GameState;
    use crate::level::Objective;
    use crate::types::{Cue, GameMode, ObstacleKind, SpecialKind, Symbol};

    /// Active level-1 game over a hand-made board
    fn game_with(rows: &[&str]) -> GameState {
        let mut game = GameState::new(GameMode::Easy, 7);
        game.start();
        game.load_board(Board::parse(rows).unwrap());
        game.set_objectives(vec![Objective::new(Symbol(3), 99)]);
        game.drain_events();
        game
    }

    #[test]
    fn test_empty_removal_is_noop() {
        let mut game = game_with(&["0120", "1201"]);
        let before = game.board().clone();
        assert_eq!(game.remove_and_refill(Default::default()), 0);
        assert_eq!(game.board(), &before);
        assert_eq!(game.score(), 0);
        assert!(game.events().is_empty());
    }

    #[test]
    fn test_five_cells_score_55_at_combo_zero() {
        let mut game = game_with(&["01210", "12021"]);
        let removed = game.remove_and_refill([0, 1, 2, 3, 4].into_iter().collect());
        assert_eq!(removed, 5);
        assert_eq!(game.score(), 55);
    }

    #[test]
    fn test_collapse_compacts_and_carries_specials() {
        let mut game = game_with(&["1", ".", "2", "."]);
        game.board_mut().set_special(0, Some(SpecialKind::RowClear));
        game.collapse();
        assert_eq!(game.board().to_rows(), vec![".", ".", "1", "2"]);
        assert_eq!(game.board().special(2), Some(SpecialKind::RowClear));
    }

    #[test]
    fn test_collapse_crushes_symbol_above_trash() {
        let mut game = game_with(&["1", ".", "t"]);
        game.collapse();
        assert_eq!(game.board().symbol(0), None);
        assert_eq!(game.board().symbol(1), None);
        assert_eq!(game.board().obstacle(2), Some(ObstacleKind::Trash));
        assert!(game
            .events()
            .contains(&EngineEvent::TileCrushed { index: 0 }));
    }

    #[test]
    fn test_collapse_obstacles_are_barriers() {
        let mut game = game_with(&["1", "c", ".", "i", "."]);
        game.collapse();
        assert_eq!(game.board().to_rows(), vec!["1", "c", ".", "i", "."]);
    }

    #[test]
    fn test_row_clear_damages_trash_and_breaks_ice() {
        let mut game = game_with(&["0"]);
        let mut board = Board::parse(&["3013", "2t1i", "2121"]).unwrap();
        board.set_special(4, Some(SpecialKind::RowClear));
        game.load_board(board);
        // Removal of the special fires the whole row.
        game.remove_and_refill([4].into_iter().collect());
        let events = game.drain_events();
        assert!(events.contains(&EngineEvent::SpecialActivated {
            index: 4,
            kind: SpecialKind::RowClear
        }));
        assert!(events.contains(&EngineEvent::ObstacleDamaged { index: 5, health: 1 }));
        assert!(events.contains(&EngineEvent::IceBroken { index: 7 }));
        assert_eq!(game.board().health(5), Some(1));
        assert_eq!(game.board().obstacle(7), None);
    }

    #[test]
    fn test_chained_specials_activate_once_each() {
        let mut board = Board::parse(&["0123", "1230", "2301", "3012"]).unwrap();
        board.set_special(0, Some(SpecialKind::RowClear));
        board.set_special(3, Some(SpecialKind::ColClear));
        board.set_special(15, Some(SpecialKind::RowClear));
        let mut game = game_with(&["0"]);
        game.load_board(board);
        let removed = game.remove_and_refill([0].into_iter().collect());
        // Row 0, column 3 and row 3 together.
        assert_eq!(removed, 4 + 3 + 3);
        let activations = game
            .events()
            .iter()
            .filter(|e| matches!(e, EngineEvent::SpecialActivated { .. }))
            .count();
        assert_eq!(activations, 3);
    }

    #[test]
    fn test_area_bomb_shakes_the_screen() {
        let mut game = game_with(&["012", "120", "201"]);
        game.board_mut().set_special(4, Some(SpecialKind::AreaBomb));
        game.remove_and_refill([4].into_iter().collect());
        let events = game.events();
        assert!(events.contains(&EngineEvent::Cue(Cue::Bomb)));
        assert!(events.contains(&EngineEvent::Cue(Cue::Shake { strong: false })));
        assert!(!events.contains(&EngineEvent::Cue(Cue::Shake { strong: true })));
    }

    #[test]
    fn test_objectives_count_cleared_symbols() {
        let mut game = game_with(&["3330", "0121"]);
        game.remove_and_refill([0, 1, 2].into_iter().collect());
        assert_eq!(game.objectives()[0].current, 3);
    }

    #[test]
    fn test_adjacent_chocolate_is_removed_with_the_match() {
        let mut game = game_with(&["000", "c12"]);
        let removed = game.remove_and_refill([0, 1, 2].into_iter().collect());
        assert_eq!(removed, 4);
        assert_eq!(game.board().obstacle(3), None);
    }
}
