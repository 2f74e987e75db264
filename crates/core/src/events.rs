//! Engine events - what happened during one player action
//!
//! The core performs no rendering or audio itself. Every observable side
//! effect is appended to the game's event queue and drained by the front-end.

use crate::snapshot::GameSnapshot;
use crate::types::{Cue, LevelPhase, ObstacleKind, Phase, PowerKind, SpecialKind, Symbol};

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// An audio cue for the audio collaborator.
    Cue(Cue),
    /// A cell was cleared; `symbol` is the value it held (for particle colour).
    CellCleared {
        index: usize,
        symbol: Option<Symbol>,
    },
    /// A new special tile was created from a match shape.
    SpecialCreated { index: usize, kind: SpecialKind },
    /// A special tile fired.
    SpecialActivated { index: usize, kind: SpecialKind },
    /// A health-bearing obstacle lost hit points without being destroyed.
    ObstacleDamaged { index: usize, health: u8 },
    /// A health-bearing obstacle reached zero health.
    ObstacleDestroyed { index: usize, kind: ObstacleKind },
    /// Plain ice next to a removal was broken.
    IceBroken { index: usize },
    /// A falling symbol landed on trash and was destroyed.
    TileCrushed { index: usize },
    /// An obstacle spread onto a neighbouring cell.
    ObstacleSpread { index: usize, kind: ObstacleKind },
    /// A plain swap produced no match and was undone.
    SwapReverted { a: usize, b: usize },
    /// One non-empty cascade step finished.
    CascadeStep {
        combo: u32,
        removed: u32,
        points: u64,
    },
    /// Escalating combo text or a status message.
    Message(&'static str),
    /// The board was reshuffled because no valid move was left.
    Shuffled,
    /// A superpower was added to the inventory.
    PowerAwarded(PowerKind),
    /// A superpower was consumed.
    PowerUsed { kind: PowerKind, target: Option<usize> },
    /// Every objective reached its target; any countdown must stall now.
    ObjectivesComplete,
    /// The level state machine moved.
    LevelPhaseChanged(LevelPhase),
    /// A countdown should (re)start with this many seconds.
    CountdownStarted { seconds: u32 },
    /// Any running countdown must stop.
    CountdownStopped,
    /// Phase boundary snapshot (only when frame capture is enabled).
    Frame { phase: Phase, snapshot: Box<GameSnapshot> },
}

impl EngineEvent {
    /// Short tag for logs and wire frames.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineEvent::Cue(_) => "cue",
            EngineEvent::CellCleared { .. } => "cellCleared",
            EngineEvent::SpecialCreated { .. } => "specialCreated",
            EngineEvent::SpecialActivated { .. } => "specialActivated",
            EngineEvent::ObstacleDamaged { .. } => "obstacleDamaged",
            EngineEvent::ObstacleDestroyed { .. } => "obstacleDestroyed",
            EngineEvent::IceBroken { .. } => "iceBroken",
            EngineEvent::TileCrushed { .. } => "tileCrushed",
            EngineEvent::ObstacleSpread { .. } => "obstacleSpread",
            EngineEvent::SwapReverted { .. } => "swapReverted",
            EngineEvent::CascadeStep { .. } => "cascadeStep",
            EngineEvent::Message(_) => "message",
            EngineEvent::Shuffled => "shuffled",
            EngineEvent::PowerAwarded(_) => "powerAwarded",
            EngineEvent::PowerUsed { .. } => "powerUsed",
            EngineEvent::ObjectivesComplete => "objectivesComplete",
            EngineEvent::LevelPhaseChanged(_) => "levelPhase",
            EngineEvent::CountdownStarted { .. } => "countdownStarted",
            EngineEvent::CountdownStopped => "countdownStopped",
            EngineEvent::Frame { .. } => "frame",
        }
    }
}
