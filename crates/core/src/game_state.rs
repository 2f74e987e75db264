//! Game state module - the session and level controller
//!
//! `GameState` owns the board, the random source and every piece of session
//! data. All operations take `&mut self`; there is no ambient state.
//!
//! Per level the state machine runs `Setup -> Active -> (Complete | Failed)`.
//! `level_up` leaves `Complete`, `reset_session` leaves `Failed` (or any
//! other phase).

use log::{debug, info, warn};

use crate::board::Board;
use crate::events::EngineEvent;
use crate::level::{objectives_complete, LevelParams, Objective, Superpowers};
use crate::matcher::has_match;
use crate::moves::{find_valid_move, force_valid_move, has_valid_moves, reroll_matches, shuffle_tiles};
use crate::obstacles::{damage_obstacle, spawn_obstacles};
use crate::rng::{RandomSource, SimpleRng};
use crate::scoring::completion_bonus;
use crate::snapshot::GameSnapshot;
use crate::types::*;

/// Complete game session
#[derive(Debug, Clone)]
pub struct GameState<R = SimpleRng> {
    pub(crate) mode: GameMode,
    pub(crate) seed: u32,
    pub(crate) rng: R,
    pub(crate) board: Board,
    pub(crate) params: LevelParams,
    pub(crate) level: u32,
    pub(crate) score: u64,
    pub(crate) score_at_level_start: u64,
    pub(crate) moves: u32,
    pub(crate) time_left: u32,
    /// Consecutive non-empty cascade steps of the current action.
    pub(crate) combo: u32,
    pub(crate) objectives: Vec<Objective>,
    /// Set once the objectives are met so the stall is only announced once.
    pub(crate) objectives_announced: bool,
    pub(crate) superpowers: Superpowers,
    pub(crate) selected_power: Option<PowerKind>,
    pub(crate) phase: LevelPhase,
    /// Single-flight gate: no new action while one is being resolved.
    pub(crate) busy: bool,
    pub(crate) countdown_running: bool,
    /// Increments every time a countdown is started.
    pub(crate) countdown_epoch: u32,
    pub(crate) frame_capture: bool,
    pub(crate) events: Vec<EngineEvent>,
    /// Increments on every session reset.
    pub(crate) session_id: u32,
    pub(crate) started: bool,
}

impl GameState<SimpleRng> {
    /// Create a new game with the given RNG seed
    pub fn new(mode: GameMode, seed: u32) -> Self {
        let mut state = Self::with_rng(mode, SimpleRng::new(seed));
        state.seed = seed;
        state
    }
}

impl<R: RandomSource> GameState<R> {
    /// Create a new game drawing randomness from `rng`
    pub fn with_rng(mode: GameMode, rng: R) -> Self {
        let config = mode.config();
        Self {
            mode,
            seed: 0,
            rng,
            board: Board::new(config.width, config.height),
            params: LevelParams::derive(config, 1),
            level: 1,
            score: 0,
            score_at_level_start: 0,
            moves: 0,
            time_left: 0,
            combo: 0,
            objectives: Vec::new(),
            objectives_announced: false,
            superpowers: Superpowers::default(),
            selected_power: None,
            phase: LevelPhase::Setup,
            busy: false,
            countdown_running: false,
            countdown_epoch: 0,
            frame_capture: false,
            events: Vec::new(),
            session_id: 0,
            started: false,
        }
    }

    /// Set up level 1 and enter the active phase
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.reset_session();
    }

    pub fn started(&self) -> bool {
        self.started
    }

    // ---------------------------------------------------------------------
    // Session lifecycle
    // ---------------------------------------------------------------------

    /// Back to level 1 with score 0 and the default superpower inventory
    pub fn reset_session(&mut self) {
        self.stop_countdown();
        self.started = true;
        self.session_id = self.session_id.wrapping_add(1);
        self.level = 1;
        self.score = 0;
        self.score_at_level_start = 0;
        self.superpowers = Superpowers::default();
        self.selected_power = None;
        self.busy = false;
        info!("session {} reset ({} mode)", self.session_id, self.mode.as_str());
        self.enter_level();
    }

    /// Switch game mode and restart the session
    pub fn configure_mode(&mut self, mode: GameMode) {
        self.stop_countdown();
        self.mode = mode;
        let config = mode.config();
        self.board = Board::new(config.width, config.height);
        self.reset_session();
    }

    /// Advance to the next level. Only valid once the level is complete.
    pub fn level_up(&mut self) -> bool {
        if !matches!(self.phase, LevelPhase::Complete { .. }) {
            return false;
        }
        self.level += 1;
        info!("level up -> {}", self.level);
        self.enter_level();
        true
    }

    fn enter_level(&mut self) {
        self.set_phase(LevelPhase::Setup);
        self.setup_level();
        self.init_board();
        self.set_phase(LevelPhase::Active);
    }

    fn set_phase(&mut self, phase: LevelPhase) {
        if self.phase != phase {
            self.phase = phase;
            self.events.push(EngineEvent::LevelPhaseChanged(phase));
        }
    }

    /// Derive the level parameters, budgets and objectives
    pub(crate) fn setup_level(&mut self) {
        let params = LevelParams::derive(self.mode.config(), self.level);
        self.params = params;
        self.moves = params.moves;
        self.combo = 0;
        match params.time_secs {
            Some(secs) => {
                self.time_left = secs;
                self.start_countdown();
            }
            None => {
                self.time_left = 0;
                self.stop_countdown();
            }
        }

        let mut available: Vec<Symbol> = (0..params.symbol_count).map(|s| Symbol(s as u8)).collect();
        self.objectives.clear();
        self.objectives_announced = false;
        for _ in 0..params.objective_count {
            if available.is_empty() {
                break;
            }
            let pick = self.rng.next_index(available.len());
            let symbol = available.remove(pick);
            self.objectives.push(Objective::new(symbol, params.objective_target));
        }
        debug!(
            "level {} setup: target {} moves {} time {:?} objectives {}",
            self.level,
            params.target_score,
            params.moves,
            params.time_secs,
            self.objectives.len()
        );
    }

    /// Fresh random board with obstacles, free of runs and with a valid move.
    ///
    /// Nothing is scored during setup.
    pub(crate) fn init_board(&mut self) {
        let config = self.mode.config();
        self.board = Board::new(config.width, config.height);
        for i in 0..self.board.len() {
            let symbol = self.random_symbol();
            self.board.set_symbol(i, Some(symbol));
        }
        spawn_obstacles(&mut self.board, &mut self.rng, &self.params, &config.caps);

        let symbols = self.params.symbol_count;
        for round in 0..SETUP_ROUNDS {
            let clean = reroll_matches(&mut self.board, &mut self.rng, symbols, INITIAL_REROLL_ATTEMPTS);
            if clean && has_valid_moves(&self.board) {
                return;
            }
            debug!("setup round {}: clean={} reshuffling", round, clean);
            if clean {
                for _ in 0..SHUFFLE_ATTEMPTS {
                    shuffle_tiles(&mut self.board, &mut self.rng);
                    if has_valid_moves(&self.board) {
                        break;
                    }
                }
                if !has_valid_moves(&self.board) {
                    force_valid_move(&mut self.board, &mut self.rng);
                }
            }
        }
        if has_match(&self.board) || !has_valid_moves(&self.board) {
            warn!("level {} board setup left an unsettled board", self.level);
        }
    }

    pub(crate) fn random_symbol(&mut self) -> Symbol {
        Symbol(self.rng.next_index(self.params.symbol_count.max(1)) as u8)
    }

    // ---------------------------------------------------------------------
    // Player actions
    // ---------------------------------------------------------------------

    fn accepting_actions(&self) -> bool {
        self.phase.is_active() && !self.busy
    }

    /// Try to swap two cells. Returns whether the swap counted as a move.
    ///
    /// Rejected without any state change when the level is not active, an
    /// action is already in flight, the cells are not adjacent, or either cell
    /// holds an obstacle (the latter also emits an invalid-move cue).
    pub fn submit_swap(&mut self, a: usize, b: usize) -> bool {
        if !self.accepting_actions() || a == b {
            return false;
        }
        let grid = self.board.grid();
        if !grid.contains(a) || !grid.contains(b) {
            return false;
        }
        if self.board.is_blocked(a) || self.board.is_blocked(b) {
            self.events.push(EngineEvent::Cue(Cue::InvalidMove));
            return false;
        }
        if !grid.are_adjacent(a, b) {
            return false;
        }

        self.busy = true;
        let committed = self.resolve_swap(a, b);
        self.busy = false;
        if committed {
            self.check_game_state();
        }
        committed
    }

    fn resolve_swap(&mut self, a: usize, b: usize) -> bool {
        let special_a = self.board.special(a);
        let special_b = self.board.special(b);

        if special_a.is_some() && special_b.is_some() {
            self.consume_move();
            self.events.push(EngineEvent::Cue(Cue::Swap));
            self.combo = 0;
            self.remove_and_refill([a, b].into_iter().collect());
            self.process_matches(&[]);
            return true;
        }

        if special_a == Some(SpecialKind::ColorClear) || special_b == Some(SpecialKind::ColorClear) {
            self.consume_move();
            let (rainbow, other) = if special_a == Some(SpecialKind::ColorClear) {
                (a, b)
            } else {
                (b, a)
            };
            let colour = self.board.symbol(other);
            let mut to_remove: std::collections::BTreeSet<usize> = (0..self.board.len())
                .filter(|&i| colour.is_some() && self.board.symbol(i) == colour)
                .collect();
            to_remove.insert(rainbow);
            self.events
                .push(EngineEvent::Cue(Cue::SpecialCreated(SpecialKind::ColorClear)));
            self.combo = 0;
            self.remove_and_refill(to_remove);
            self.process_matches(&[]);
            return true;
        }

        self.board.swap_tiles(a, b);
        if !has_match(&self.board) {
            self.frame(Phase::Swapped);
            self.board.swap_tiles(a, b);
            self.events.push(EngineEvent::Cue(Cue::InvalidMove));
            self.events.push(EngineEvent::SwapReverted { a, b });
            return false;
        }
        self.consume_move();
        self.events.push(EngineEvent::Cue(Cue::Swap));
        self.process_matches(&[a, b]);
        true
    }

    /// A committed action costs one move, or grants one second in timed levels
    fn consume_move(&mut self) {
        if self.params.is_timed() {
            self.time_left += 1;
        } else {
            self.moves = self.moves.saturating_sub(1);
        }
    }

    /// Use a superpower. Targeted powers need a cell and cost a move like a
    /// swap; the time power ignores the target.
    ///
    /// Returns false (no-op) with an empty inventory or when actions are not
    /// accepted.
    pub fn use_superpower(&mut self, kind: PowerKind, target: Option<usize>) -> bool {
        if !self.accepting_actions() || self.superpowers.count(kind) == 0 {
            return false;
        }
        match kind {
            PowerKind::Time => {
                if self.level < TIME_POWER_MIN_LEVEL || !self.superpowers.take(kind) {
                    return false;
                }
                self.time_left += TIME_POWER_SECONDS;
                self.events.push(EngineEvent::PowerUsed { kind, target: None });
                self.events.push(EngineEvent::Cue(Cue::Powerup));
                true
            }
            PowerKind::Bomb | PowerKind::Hammer => {
                let Some(index) = target.filter(|&i| self.board.grid().contains(i)) else {
                    return false;
                };
                if !self.superpowers.take(kind) {
                    return false;
                }
                self.selected_power = None;
                self.consume_move();
                self.events.push(EngineEvent::PowerUsed {
                    kind,
                    target: Some(index),
                });

                self.busy = true;
                let mut to_remove = std::collections::BTreeSet::new();
                if self.board.is_health_bearing(index) {
                    if damage_obstacle(&mut self.board, index, 1, &mut self.events) {
                        to_remove.insert(index);
                    }
                } else if kind == PowerKind::Hammer {
                    to_remove.insert(index);
                    self.events.push(EngineEvent::Cue(Cue::Hammer));
                } else {
                    to_remove.extend(self.board.grid().area3x3(index));
                    self.events.push(EngineEvent::Cue(Cue::Bomb));
                    self.events.push(EngineEvent::Cue(Cue::Shake { strong: false }));
                }
                self.combo = 0;
                self.remove_and_refill(to_remove);
                self.process_matches(&[]);
                self.busy = false;
                self.check_game_state();
                true
            }
        }
    }

    /// Toggle the selected targeted power (only with inventory).
    ///
    /// The time power has no target and is applied immediately.
    pub fn select_power(&mut self, kind: PowerKind) -> Option<PowerKind> {
        if !kind.is_targeted() {
            self.use_superpower(kind, None);
            return self.selected_power;
        }
        if self.superpowers.count(kind) > 0 {
            self.selected_power = if self.selected_power == Some(kind) {
                None
            } else {
                Some(kind)
            };
        }
        self.selected_power
    }

    /// Apply the selected power to a cell
    pub fn use_selected_power(&mut self, target: usize) -> bool {
        match self.selected_power {
            Some(kind) => self.use_superpower(kind, Some(target)),
            None => false,
        }
    }

    // ---------------------------------------------------------------------
    // Countdown
    // ---------------------------------------------------------------------

    fn start_countdown(&mut self) {
        self.countdown_running = true;
        self.countdown_epoch = self.countdown_epoch.wrapping_add(1);
        self.events.push(EngineEvent::CountdownStarted {
            seconds: self.time_left,
        });
    }

    /// Idempotent stop
    pub(crate) fn stop_countdown(&mut self) {
        if self.countdown_running {
            self.countdown_running = false;
            self.events.push(EngineEvent::CountdownStopped);
        }
    }

    /// One countdown second. No-op unless a countdown runs in an active level
    /// whose objectives are still open.
    pub fn tick_second(&mut self) -> bool {
        if !self.countdown_running || !self.phase.is_active() {
            return false;
        }
        if objectives_complete(&self.objectives) {
            self.stop_countdown();
            return false;
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            self.stop_countdown();
            if !self.busy {
                self.check_game_state();
            }
        }
        true
    }

    // ---------------------------------------------------------------------
    // Level termination
    // ---------------------------------------------------------------------

    /// Re-check termination after an action settled
    pub fn check_game_state(&mut self) {
        if !self.phase.is_active() {
            return;
        }
        if objectives_complete(&self.objectives) {
            self.complete_level();
            return;
        }
        let exhausted = if self.params.is_timed() {
            self.time_left == 0
        } else {
            self.moves == 0
        };
        if exhausted {
            self.fail_level();
        }
    }

    fn complete_level(&mut self) {
        self.stop_countdown();
        let bonus = completion_bonus(self.params.is_timed(), self.moves, self.time_left, self.level);
        self.score += bonus;
        info!("level {} complete, bonus {} score {}", self.level, bonus, self.score);
        self.set_phase(LevelPhase::Complete { bonus });
        if self.level % BONUS_POWER_EVERY == 0 {
            self.award_superpower();
            self.events.push(EngineEvent::Message(BONUS_POWER_MESSAGE));
        }
        self.check_progress_reward();
        self.events.push(EngineEvent::Cue(Cue::LevelComplete));
    }

    fn fail_level(&mut self) {
        self.stop_countdown();
        info!("level {} failed with score {}", self.level, self.score);
        self.set_phase(LevelPhase::Failed);
        self.events.push(EngineEvent::Cue(Cue::GameOver));
    }

    /// Add one random superpower
    pub(crate) fn award_superpower(&mut self) -> PowerKind {
        let kind = PowerKind::ALL[self.rng.next_index(PowerKind::ALL.len())];
        self.superpowers.add(kind);
        self.events.push(EngineEvent::PowerAwarded(kind));
        self.events.push(EngineEvent::Cue(Cue::Powerup));
        kind
    }

    /// Award a power each time the per-level score progress crosses the target
    pub(crate) fn check_progress_reward(&mut self) {
        let target = self.params.target_score;
        if target > 0 && self.score.saturating_sub(self.score_at_level_start) >= target {
            self.score_at_level_start += target;
            self.award_superpower();
            self.events.push(EngineEvent::Message(POWER_EARNED_MESSAGE));
        }
    }

    // ---------------------------------------------------------------------
    // Observation
    // ---------------------------------------------------------------------

    /// Emit phase-boundary snapshots into the event stream
    pub fn set_frame_capture(&mut self, enabled: bool) {
        self.frame_capture = enabled;
    }

    pub(crate) fn frame(&mut self, phase: Phase) {
        if self.frame_capture {
            let snapshot = Box::new(self.snapshot());
            self.events.push(EngineEvent::Frame { phase, snapshot });
        }
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[EngineEvent] {
        &self.events
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut snap = GameSnapshot::default();
        self.snapshot_into(&mut snap);
        snap
    }

    /// Fill an existing snapshot, reusing its buffers
    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.copy_board(&self.board);
        out.mode = self.mode;
        out.level = self.level;
        out.score = self.score;
        out.target_score = self.params.target_score;
        out.progress = self.score.saturating_sub(self.score_at_level_start);
        out.moves = self.moves;
        out.time_left = self.time_left;
        out.timed = self.params.is_timed();
        out.combo = self.combo;
        out.objectives.clear();
        out.objectives.extend_from_slice(&self.objectives);
        out.superpowers = self.superpowers;
        out.selected_power = self.selected_power;
        out.phase = self.phase;
        out.countdown_running = self.countdown_running;
        out.busy = self.busy;
        out.session_id = self.session_id;
        out.seed = self.seed;
    }

    /// First productive swap on the board
    pub fn hint(&self) -> Option<(usize, usize)> {
        find_valid_move(&self.board)
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn params(&self) -> &LevelParams {
        &self.params
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn score_at_level_start(&self) -> u64 {
        self.score_at_level_start
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn is_timed(&self) -> bool {
        self.params.is_timed()
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    pub fn objectives_complete(&self) -> bool {
        objectives_complete(&self.objectives)
    }

    pub fn superpowers(&self) -> &Superpowers {
        &self.superpowers
    }

    pub fn selected_power(&self) -> Option<PowerKind> {
        self.selected_power
    }

    pub fn phase(&self) -> LevelPhase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Hold the single-flight gate while a front-end paces an action
    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    pub fn countdown_running(&self) -> bool {
        self.countdown_running
    }

    pub fn countdown_epoch(&self) -> u32 {
        self.countdown_epoch
    }

    pub fn session_id(&self) -> u32 {
        self.session_id
    }

    // ---------------------------------------------------------------------
    // Scenario hooks (tests, benches, tools)
    // ---------------------------------------------------------------------

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Replace the board wholesale
    pub fn load_board(&mut self, board: Board) {
        self.board = board;
    }

    /// Jump straight to an active `level` with a fresh board
    pub fn start_at_level(&mut self, level: u32) {
        self.started = true;
        self.stop_countdown();
        self.level = level.max(1);
        self.busy = false;
        self.enter_level();
    }

    pub fn set_objectives(&mut self, objectives: Vec<Objective>) {
        self.objectives = objectives;
        self.objectives_announced = false;
    }

    pub fn objectives_mut(&mut self) -> &mut Vec<Objective> {
        &mut self.objectives
    }

    pub fn set_moves(&mut self, moves: u32) {
        self.moves = moves;
    }

    pub fn set_time_left(&mut self, seconds: u32) {
        self.time_left = seconds;
    }

    pub fn superpowers_mut(&mut self) -> &mut Superpowers {
        &mut self.superpowers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(seed: u32) -> GameState {
        let mut game = GameState::new(GameMode::Easy, seed);
        game.start();
        game.drain_events();
        game
    }

    #[test]
    fn test_start_enters_level_one() {
        let game = started(12345);
        assert_eq!(game.level(), 1);
        assert_eq!(game.score(), 0);
        assert_eq!(game.moves(), 29);
        assert!(game.phase().is_active());
        assert!(!game.countdown_running());
        assert_eq!(game.objectives().len(), 1);
        assert_eq!(*game.superpowers(), Superpowers::default());
        assert!(!has_match(game.board()));
        assert!(has_valid_moves(game.board()));
    }

    #[test]
    fn test_same_seed_same_board() {
        let a = started(77);
        let b = started(77);
        assert_eq!(a.board(), b.board());
        assert_eq!(a.objectives(), b.objectives());
    }

    #[test]
    fn test_non_adjacent_swap_is_ignored() {
        let mut game = started(1);
        let before = game.board().clone();
        assert!(!game.submit_swap(0, 2));
        assert!(!game.submit_swap(0, 0));
        assert!(!game.submit_swap(0, 1000));
        assert_eq!(game.board(), &before);
        assert_eq!(game.moves(), 29);
    }

    #[test]
    fn test_swap_into_obstacle_emits_invalid_cue() {
        let mut game = started(1);
        game.board_mut().place_obstacle(1, ObstacleKind::Ice);
        assert!(!game.submit_swap(0, 1));
        assert!(game
            .drain_events()
            .contains(&EngineEvent::Cue(Cue::InvalidMove)));
    }

    #[test]
    fn test_busy_rejects_actions() {
        let mut game = started(3);
        game.set_busy(true);
        let (a, b) = game.hint().unwrap();
        assert!(!game.submit_swap(a, b));
        assert!(!game.use_superpower(PowerKind::Hammer, Some(0)));
        game.set_busy(false);
        assert!(game.submit_swap(a, b));
    }

    #[test]
    fn test_time_power_needs_level_four() {
        let mut game = started(9);
        assert!(!game.use_superpower(PowerKind::Time, None));
        game.start_at_level(4);
        let before = game.time_left();
        assert!(game.use_superpower(PowerKind::Time, None));
        assert_eq!(game.time_left(), before + TIME_POWER_SECONDS);
        assert_eq!(game.superpowers().time, 0);
        assert!(!game.use_superpower(PowerKind::Time, None));
    }

    #[test]
    fn test_select_power_toggles_only_with_inventory() {
        let mut game = started(5);
        assert_eq!(game.select_power(PowerKind::Bomb), Some(PowerKind::Bomb));
        assert_eq!(game.select_power(PowerKind::Bomb), None);
        game.superpowers_mut().hammer = 0;
        assert_eq!(game.select_power(PowerKind::Hammer), None);
    }

    #[test]
    fn test_timed_level_starts_countdown() {
        let mut game = started(2);
        game.start_at_level(TIMER_START_LEVEL);
        assert!(game.is_timed());
        assert!(game.countdown_running());
        assert_eq!(game.time_left(), 75);
        assert!(game.tick_second());
        assert_eq!(game.time_left(), 74);
    }

    #[test]
    fn test_reset_stops_countdown_and_restores_defaults() {
        let mut game = started(2);
        game.start_at_level(TIMER_START_LEVEL);
        game.superpowers_mut().bomb = 7;
        game.drain_events();
        game.reset_session();
        assert!(!game.countdown_running());
        assert_eq!(game.level(), 1);
        assert_eq!(game.superpowers().bomb, 1);
        assert!(game.drain_events().contains(&EngineEvent::CountdownStopped));
        // A stale tick after reset is a no-op.
        assert!(!game.tick_second());
    }

    #[test]
    fn test_configure_mode_resizes_board() {
        let mut game = started(4);
        game.configure_mode(GameMode::Hard);
        assert_eq!(game.board().width(), 10);
        assert_eq!(game.mode(), GameMode::Hard);
        assert_eq!(game.level(), 1);
        assert!(game.phase().is_active());
    }

    #[test]
    fn test_moves_exhausted_fails_level() {
        let mut game = started(6);
        game.set_moves(1);
        let (a, b) = game.hint().unwrap();
        assert!(game.submit_swap(a, b));
        // Either the single move finished the objectives or the level failed.
        assert!(matches!(
            game.phase(),
            LevelPhase::Failed | LevelPhase::Complete { .. }
        ));
        assert!(!game.level_up() || game.level() == 2);
    }
}
