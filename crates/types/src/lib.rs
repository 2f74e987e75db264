//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, terminal rendering, async adapter).
//!
//! # Game Modes
//!
//! | Mode | Board | Base symbols | Extra symbols | Objectives (max) | Moves base | Timer base |
//! |------|-------|--------------|---------------|------------------|------------|------------|
//! | easy | 8x8   | 4            | 2             | 7                | 30         | 75 s       |
//! | hard | 10x10 | 5            | 3             | 9                | 40         | 90 s       |
//!
//! # Level Thresholds
//!
//! | Constant | Level | Effect |
//! |----------|-------|--------|
//! | `ICE_START_LEVEL` | 5 | Plain ice spawns at level start |
//! | `TRASH` start | 8 | Trash cans are topped up to the mode cap |
//! | `CHOCOLATE_START_LEVEL` | 10 | Plain chocolate spawns and spreads |
//! | `ICE_SPAWNER` start | 12 | Ice spawners appear and spread ice |
//! | `TIMER_START_LEVEL` | 15 | Move budget is replaced by a countdown |
//! | `CHOCOLATE_SPAWNER` start | 16 | Chocolate spawners appear |
//! | `EXTRA_SYMBOL_START_LEVEL` | 20 | Extra symbols join the symbol set |
//!
//! # Examples
//!
//! ```
//! use tui_match3_types::{GameMode, ObstacleKind, SpecialKind};
//!
//! let mode = GameMode::from_str("hard").unwrap();
//! assert_eq!(mode.config().width, 10);
//!
//! assert!(ObstacleKind::Trash.is_health_bearing());
//! assert!(!ObstacleKind::Ice.is_health_bearing());
//!
//! assert_eq!(SpecialKind::from_str("bomb"), Some(SpecialKind::AreaBomb));
//! ```

/// Level from which plain ice is spawned at level start.
pub const ICE_START_LEVEL: u32 = 5;

/// Level from which plain chocolate is spawned and spreads.
pub const CHOCOLATE_START_LEVEL: u32 = 10;

/// Level from which the move budget is replaced by a real-time countdown.
pub const TIMER_START_LEVEL: u32 = 15;

/// Level from which the extra symbols of a mode join the symbol set.
pub const EXTRA_SYMBOL_START_LEVEL: u32 = 20;

/// Upper bound on plain ice spawned per level.
pub const MAX_ICE: u32 = 12;

/// Upper bound on plain chocolate spawned per level.
pub const MAX_CHOCOLATE: u32 = 12;

/// Upper bound for the level-scaled plain chocolate spread rate (percent).
pub const MAX_CHOCOLATE_SPREAD_RATE: u32 = 25;

/// Random draws per plain obstacle kind when spawning at level start.
pub const PLAIN_SPAWN_ATTEMPTS: u32 = 20;

/// Random draws per missing special obstacle when topping up to the mode cap.
pub const SPECIAL_SPAWN_ATTEMPTS: u32 = 50;

/// Passes used to re-roll accidental matches on a fresh board.
pub const INITIAL_REROLL_ATTEMPTS: u32 = 20;

/// Rounds of (re-roll, shuffle) performed while setting up a board.
pub const SETUP_ROUNDS: u32 = 5;

/// Permutations tried by the automatic shuffle before forcing a move.
pub const SHUFFLE_ATTEMPTS: u32 = 10;

/// Random anchors tried when forcing a valid move into the board.
pub const FORCE_MOVE_ATTEMPTS: u32 = 50;

/// Cascade steps after which the resolution loop stops unconditionally.
pub const MAX_CASCADE_STEPS: u32 = 256;

/// Base points per cleared cell.
pub const BASE_CLEAR_POINTS: u32 = 10;

/// Extra points per cleared cell for every combo step.
pub const COMBO_STEP_POINTS: u32 = 5;

/// Level-complete bonus per remaining move.
pub const MOVE_BONUS_POINTS: u32 = 25;

/// Level-complete bonus per remaining second.
pub const TIME_BONUS_POINTS: u32 = 15;

/// A bonus superpower is granted when completing every Nth level.
pub const BONUS_POWER_EVERY: u32 = 3;

/// Seconds added by the time superpower.
pub const TIME_POWER_SECONDS: u32 = 10;

/// First level at which the time superpower can be used.
pub const TIME_POWER_MIN_LEVEL: u32 = 4;

/// Minimum move budget regardless of level.
pub const MIN_MOVES: u32 = 15;

/// Minimum time budget (seconds) regardless of level.
pub const MIN_TIME_SECS: u32 = 30;

/// Seconds removed from the time budget per level past `TIMER_START_LEVEL`.
pub const TIME_STEP_PER_LEVEL: u32 = 5;

/// Countdown tick interval in milliseconds.
pub const COUNTDOWN_TICK_MS: u64 = 1000;

/// Presentation pause after cells are cleared.
pub const CLEAR_PAUSE_MS: u64 = 300;

/// Presentation pause after gravity collapse.
pub const COLLAPSE_PAUSE_MS: u64 = 200;

/// Presentation pause after refill.
pub const REFILL_PAUSE_MS: u64 = 200;

/// Presentation pause before a rejected swap is reverted.
pub const SWAP_REVERT_PAUSE_MS: u64 = 200;

/// Messages shown from the second cascade step onward.
pub const COMBO_MESSAGES: [&str; 5] = ["Great!", "Super!", "Amazing!", "Wow!", "Unstoppable!"];

/// Message shown when the board is reshuffled.
pub const SHUFFLE_MESSAGE: &str = "Shuffling!";

/// Message shown when a superpower is earned through score progress.
pub const POWER_EARNED_MESSAGE: &str = "Power earned!";

/// Message shown when a bonus superpower is granted on level completion.
pub const BONUS_POWER_MESSAGE: &str = "Bonus power!";

/// Combo message for a given combo counter (shown from the second step on).
pub fn combo_message(combo: u32) -> Option<&'static str> {
    if combo < 2 {
        return None;
    }
    let idx = ((combo - 2) as usize).min(COMBO_MESSAGES.len() - 1);
    Some(COMBO_MESSAGES[idx])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combo_messages_escalate_and_clamp() {
        assert_eq!(combo_message(0), None);
        assert_eq!(combo_message(1), None);
        assert_eq!(combo_message(2), Some("Great!"));
        assert_eq!(combo_message(6), Some("Unstoppable!"));
        assert_eq!(combo_message(40), Some("Unstoppable!"));
    }

    #[test]
    fn mode_tables_match_documented_values() {
        let easy = GameMode::Easy.config();
        assert_eq!((easy.width, easy.height), (8, 8));
        assert_eq!(easy.symbols.len(), 4);
        assert_eq!(easy.extra_symbols.len(), 2);
        assert_eq!(easy.caps.trash, 1);

        let hard = GameMode::Hard.config();
        assert_eq!((hard.width, hard.height), (10, 10));
        assert_eq!(hard.symbols.len(), 5);
        assert_eq!(hard.extra_symbols.len(), 3);
        assert_eq!(hard.caps.chocolate_spawner, 2);
    }

    #[test]
    fn obstacle_table_only_covers_health_bearing_kinds() {
        for kind in ObstacleKind::ALL {
            assert_eq!(kind.config().is_some(), kind.is_health_bearing());
        }
        assert_eq!(ObstacleKind::IceSpawner.config().unwrap().spread_rate, 30);
        assert_eq!(ObstacleKind::ChocolateSpawner.config().unwrap().spread_rate, 35);
    }
}

/// A matchable tile value: an index into the mode's glyph table
/// (base symbols first, then extra symbols).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(pub u8);

impl Symbol {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Special tile markers created from match shapes.
///
/// - **RowClear**: clears its whole row when activated (4 in a row)
/// - **ColClear**: clears its whole column when activated (4 in a column)
/// - **AreaBomb**: clears its 3x3 neighbourhood (cross-shaped match)
/// - **ColorClear**: clears every tile of one symbol (5+ in a line)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialKind {
    RowClear,
    ColClear,
    AreaBomb,
    ColorClear,
}

impl SpecialKind {
    pub const ALL: [Self; 4] = [
        SpecialKind::RowClear,
        SpecialKind::ColClear,
        SpecialKind::AreaBomb,
        SpecialKind::ColorClear,
    ];

    /// Parse a special kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_match3_types::SpecialKind;
    ///
    /// assert_eq!(SpecialKind::from_str("row"), Some(SpecialKind::RowClear));
    /// assert_eq!(SpecialKind::from_str("RAINBOW"), Some(SpecialKind::ColorClear));
    /// assert_eq!(SpecialKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "row" | "h" => Some(SpecialKind::RowClear),
            "col" | "column" | "v" => Some(SpecialKind::ColClear),
            "bomb" => Some(SpecialKind::AreaBomb),
            "color" | "rainbow" => Some(SpecialKind::ColorClear),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpecialKind::RowClear => "row",
            SpecialKind::ColClear => "col",
            SpecialKind::AreaBomb => "bomb",
            SpecialKind::ColorClear => "color",
        }
    }
}

/// Obstacles occupying board cells.
///
/// Plain **Ice** and **Chocolate** are cleared by matches next to them.
/// **Trash**, **IceSpawner** and **ChocolateSpawner** carry hit points and
/// are destroyed through damage (special blasts and superpowers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObstacleKind {
    Ice,
    Chocolate,
    Trash,
    IceSpawner,
    ChocolateSpawner,
}

impl ObstacleKind {
    pub const ALL: [Self; 5] = [
        ObstacleKind::Ice,
        ObstacleKind::Chocolate,
        ObstacleKind::Trash,
        ObstacleKind::IceSpawner,
        ObstacleKind::ChocolateSpawner,
    ];

    /// Health-bearing kinds, in the order they are topped up at level start.
    pub const SPECIAL: [Self; 3] = [
        ObstacleKind::Trash,
        ObstacleKind::IceSpawner,
        ObstacleKind::ChocolateSpawner,
    ];

    pub fn is_health_bearing(&self) -> bool {
        matches!(
            self,
            ObstacleKind::Trash | ObstacleKind::IceSpawner | ObstacleKind::ChocolateSpawner
        )
    }

    /// Static configuration for health-bearing kinds.
    pub fn config(&self) -> Option<&'static ObstacleConfig> {
        match self {
            ObstacleKind::Trash => Some(&TRASH_CONFIG),
            ObstacleKind::IceSpawner => Some(&ICE_SPAWNER_CONFIG),
            ObstacleKind::ChocolateSpawner => Some(&CHOCOLATE_SPAWNER_CONFIG),
            ObstacleKind::Ice | ObstacleKind::Chocolate => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ObstacleKind::Ice => "ice",
            ObstacleKind::Chocolate => "chocolate",
            ObstacleKind::Trash => "trash",
            ObstacleKind::IceSpawner => "iceSpawner",
            ObstacleKind::ChocolateSpawner => "chocolateSpawner",
        }
    }
}

/// Per-kind configuration of health-bearing obstacles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObstacleConfig {
    /// No spawns or spreads before this level.
    pub start_level: u32,
    /// Hit points when spawned.
    pub health: u8,
    /// Spread chance per turn in percent (0 when the kind does not spread).
    pub spread_rate: u32,
}

pub const TRASH_CONFIG: ObstacleConfig = ObstacleConfig {
    start_level: 8,
    health: 2,
    spread_rate: 0,
};

pub const ICE_SPAWNER_CONFIG: ObstacleConfig = ObstacleConfig {
    start_level: 12,
    health: 2,
    spread_rate: 30,
};

pub const CHOCOLATE_SPAWNER_CONFIG: ObstacleConfig = ObstacleConfig {
    start_level: 16,
    health: 2,
    spread_rate: 35,
};

/// Maximum number of each health-bearing obstacle on the board at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObstacleCaps {
    pub trash: u32,
    pub ice_spawner: u32,
    pub chocolate_spawner: u32,
}

impl ObstacleCaps {
    pub fn cap_for(&self, kind: ObstacleKind) -> u32 {
        match kind {
            ObstacleKind::Trash => self.trash,
            ObstacleKind::IceSpawner => self.ice_spawner,
            ObstacleKind::ChocolateSpawner => self.chocolate_spawner,
            ObstacleKind::Ice | ObstacleKind::Chocolate => 0,
        }
    }
}

/// Named game-mode record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeConfig {
    pub width: usize,
    pub height: usize,
    pub symbols: &'static [&'static str],
    pub extra_symbols: &'static [&'static str],
    pub max_objectives: u32,
    pub objective_base_count: u32,
    pub moves_base: u32,
    pub timer_base: u32,
    pub caps: ObstacleCaps,
}

impl ModeConfig {
    /// Glyph for a symbol index (base glyphs first, then extras).
    pub fn glyph(&self, symbol: Symbol) -> &'static str {
        let i = symbol.index();
        if i < self.symbols.len() {
            self.symbols[i]
        } else {
            self.extra_symbols
                .get(i - self.symbols.len())
                .copied()
                .unwrap_or("?")
        }
    }

    /// Number of symbols available at a given level.
    pub fn symbol_count(&self, level: u32) -> usize {
        if level >= EXTRA_SYMBOL_START_LEVEL {
            self.symbols.len() + self.extra_symbols.len()
        } else {
            self.symbols.len()
        }
    }
}

pub const EASY_MODE: ModeConfig = ModeConfig {
    width: 8,
    height: 8,
    symbols: &["peach", "grape", "lemon", "strawberry"],
    extra_symbols: &["orange", "apple"],
    max_objectives: 7,
    objective_base_count: 14,
    moves_base: 30,
    timer_base: 75,
    caps: ObstacleCaps {
        trash: 1,
        ice_spawner: 1,
        chocolate_spawner: 1,
    },
};

pub const HARD_MODE: ModeConfig = ModeConfig {
    width: 10,
    height: 10,
    symbols: &["melon", "kiwi", "coconut", "mango", "avocado"],
    extra_symbols: &["cherry", "pineapple", "peach"],
    max_objectives: 9,
    objective_base_count: 20,
    moves_base: 40,
    timer_base: 90,
    caps: ObstacleCaps {
        trash: 2,
        ice_spawner: 2,
        chocolate_spawner: 2,
    },
};

/// Selectable game modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameMode {
    #[default]
    Easy,
    Hard,
}

impl GameMode {
    /// Parse a game mode from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_match3_types::GameMode;
    ///
    /// assert_eq!(GameMode::from_str("Easy"), Some(GameMode::Easy));
    /// assert_eq!(GameMode::from_str("hard"), Some(GameMode::Hard));
    /// assert_eq!(GameMode::from_str("nightmare"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(GameMode::Easy),
            "hard" => Some(GameMode::Hard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Easy => "easy",
            GameMode::Hard => "hard",
        }
    }

    pub fn config(&self) -> &'static ModeConfig {
        match self {
            GameMode::Easy => &EASY_MODE,
            GameMode::Hard => &HARD_MODE,
        }
    }

    /// The other mode (used by the difficulty toggle).
    pub fn toggled(&self) -> Self {
        match self {
            GameMode::Easy => GameMode::Hard,
            GameMode::Hard => GameMode::Easy,
        }
    }
}

/// Superpowers held in the player's inventory.
///
/// - **Bomb**: clears the 3x3 area around the target cell
/// - **Hammer**: clears the target cell only
/// - **Time**: adds `TIME_POWER_SECONDS` to the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerKind {
    Bomb,
    Hammer,
    Time,
}

impl PowerKind {
    pub const ALL: [Self; 3] = [PowerKind::Bomb, PowerKind::Hammer, PowerKind::Time];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bomb" => Some(PowerKind::Bomb),
            "hammer" => Some(PowerKind::Hammer),
            "time" => Some(PowerKind::Time),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerKind::Bomb => "bomb",
            PowerKind::Hammer => "hammer",
            PowerKind::Time => "time",
        }
    }

    /// Whether the power is aimed at a board cell.
    pub fn is_targeted(&self) -> bool {
        !matches!(self, PowerKind::Time)
    }
}

/// Named audio cues delivered to the audio collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Swap,
    InvalidMove,
    SpecialCreated(SpecialKind),
    /// Removal of `size` cells in one pipeline step.
    Combo { size: u32 },
    IceBreak,
    /// Screen shake; `strong` for an ice spawner burst.
    Shake { strong: bool },
    Bomb,
    Hammer,
    Shuffle,
    Powerup,
    LevelComplete,
    GameOver,
}

impl Cue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::Swap => "swap",
            Cue::InvalidMove => "invalidMove",
            Cue::SpecialCreated(_) => "special",
            Cue::Combo { .. } => "combo",
            Cue::IceBreak => "iceBreak",
            Cue::Shake { strong: false } => "shake",
            Cue::Shake { strong: true } => "shakeHard",
            Cue::Bomb => "bomb",
            Cue::Hammer => "hammer",
            Cue::Shuffle => "shuffle",
            Cue::Powerup => "powerup",
            Cue::LevelComplete => "levelComplete",
            Cue::GameOver => "gameOver",
        }
    }

    /// Intensity in 0..=3, derived from the removal size for combo cues.
    pub fn intensity(&self) -> u8 {
        match self {
            Cue::Combo { size } if *size >= 10 => 3,
            Cue::Combo { size } if *size >= 5 => 2,
            Cue::Combo { size } if *size >= 4 => 1,
            Cue::Combo { .. } => 0,
            Cue::Shake { strong: true } => 3,
            Cue::Shake { strong: false } => 2,
            Cue::Bomb | Cue::Hammer | Cue::LevelComplete => 2,
            _ => 1,
        }
    }
}

/// Phase boundaries inside one resolution step.
///
/// A presentation layer may pause between phases; the engine never depends
/// on the duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Swapped,
    Cleared,
    Collapsed,
    Refilled,
    Spread,
    Shuffled,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Swapped => "swapped",
            Phase::Cleared => "cleared",
            Phase::Collapsed => "collapsed",
            Phase::Refilled => "refilled",
            Phase::Spread => "spread",
            Phase::Shuffled => "shuffled",
        }
    }

    /// Presentation pause suggested after this phase.
    pub fn pause_ms(&self) -> u64 {
        match self {
            Phase::Cleared => CLEAR_PAUSE_MS,
            Phase::Collapsed => COLLAPSE_PAUSE_MS,
            Phase::Refilled => REFILL_PAUSE_MS,
            Phase::Swapped => SWAP_REVERT_PAUSE_MS,
            Phase::Spread | Phase::Shuffled => 0,
        }
    }
}

/// Per-level state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelPhase {
    #[default]
    Setup,
    Active,
    /// Objectives met; `bonus` points were awarded.
    Complete { bonus: u64 },
    /// Budget exhausted before the objectives were met.
    Failed,
}

impl LevelPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            LevelPhase::Setup => "setup",
            LevelPhase::Active => "active",
            LevelPhase::Complete { .. } => "complete",
            LevelPhase::Failed => "failed",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, LevelPhase::Active)
    }
}
