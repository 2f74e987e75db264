//! Protocol module - line-delimited JSON for presentation consumers
//!
//! Inbound lines carry a `type` tag and map onto [`Command`]s. Outbound
//! messages are encoded from [`Outbound`] values; every outbound line has a
//! `type` tag and a monotonically increasing `seq`.

use serde::{Deserialize, Serialize};

use crate::core::{EngineEvent, GameSnapshot};
use crate::error::{AdapterError, Result};
use crate::runtime::{Command, Outbound};
use crate::types::{GameMode, LevelPhase, PowerKind};

// ============== Inbound ==============

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum InboundMessage {
    Swap { a: usize, b: usize },
    Power {
        power: String,
        #[serde(default)]
        target: Option<usize>,
    },
    SelectPower { power: String },
    Reset,
    Mode { mode: String },
    LevelUp,
    AutoMove,
    Hint,
    Snapshot,
    Shutdown,
}

fn power_kind(value: String) -> Result<PowerKind> {
    PowerKind::from_str(&value).ok_or(AdapterError::Unknown {
        what: "power",
        value,
    })
}

/// Parse one inbound JSON line into a runtime command
pub fn parse_command(line: &str) -> Result<Command> {
    let msg: InboundMessage = serde_json::from_str(line).map_err(AdapterError::Decode)?;
    Ok(match msg {
        InboundMessage::Swap { a, b } => Command::Swap { a, b },
        InboundMessage::Power { power, target } => Command::Power {
            kind: power_kind(power)?,
            target,
        },
        InboundMessage::SelectPower { power } => Command::SelectPower(power_kind(power)?),
        InboundMessage::Reset => Command::Reset,
        InboundMessage::Mode { mode } => Command::SetMode(
            GameMode::from_str(&mode).ok_or(AdapterError::Unknown {
                what: "mode",
                value: mode,
            })?,
        ),
        InboundMessage::LevelUp => Command::LevelUp,
        InboundMessage::AutoMove => Command::AutoMove,
        InboundMessage::Hint => Command::Hint,
        InboundMessage::Snapshot => Command::Snapshot,
        InboundMessage::Shutdown => Command::Shutdown,
    })
}

// ============== Outbound ==============

#[derive(Debug, Clone, Serialize)]
pub struct CellView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glyph: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub obstacle: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ObjectiveView {
    pub symbol: u8,
    pub glyph: &'static str,
    pub current: u32,
    pub target: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PowersView {
    pub bomb: u32,
    pub hammer: u32,
    pub time: u32,
}

/// Wire form of a [`GameSnapshot`]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotView {
    pub mode: &'static str,
    pub width: usize,
    pub height: usize,
    pub cells: Vec<CellView>,
    pub level: u32,
    pub score: u64,
    pub target_score: u64,
    pub progress_percent: u32,
    pub moves: u32,
    pub time_left: u32,
    pub timed: bool,
    pub combo: u32,
    pub objectives: Vec<ObjectiveView>,
    pub superpowers: PowersView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_power: Option<&'static str>,
    pub phase: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bonus: Option<u64>,
    pub countdown_running: bool,
    pub busy: bool,
    pub session_id: u32,
    pub seed: u32,
}

impl From<&GameSnapshot> for SnapshotView {
    fn from(snap: &GameSnapshot) -> Self {
        let config = snap.mode.config();
        let cells = (0..snap.width * snap.height)
            .map(|i| {
                let symbol = snap.symbols.get(i).copied().flatten();
                CellView {
                    symbol: symbol.map(|s| s.0),
                    glyph: symbol.map(|s| config.glyph(s)),
                    special: snap.specials.get(i).copied().flatten().map(|k| k.as_str()),
                    obstacle: snap.obstacles.get(i).copied().flatten().map(|k| k.as_str()),
                    health: snap.health.get(i).copied().flatten(),
                }
            })
            .collect();
        let bonus = match snap.phase {
            LevelPhase::Complete { bonus } => Some(bonus),
            _ => None,
        };
        Self {
            mode: snap.mode.as_str(),
            width: snap.width,
            height: snap.height,
            cells,
            level: snap.level,
            score: snap.score,
            target_score: snap.target_score,
            progress_percent: snap.progress_percent(),
            moves: snap.moves,
            time_left: snap.time_left,
            timed: snap.timed,
            combo: snap.combo,
            objectives: snap
                .objectives
                .iter()
                .map(|o| ObjectiveView {
                    symbol: o.symbol.0,
                    glyph: config.glyph(o.symbol),
                    current: o.current,
                    target: o.target,
                })
                .collect(),
            superpowers: PowersView {
                bomb: snap.superpowers.bomb,
                hammer: snap.superpowers.hammer,
                time: snap.superpowers.time,
            },
            selected_power: snap.selected_power.map(|p| p.as_str()),
            phase: snap.phase.as_str(),
            bonus,
            countdown_running: snap.countdown_running,
            busy: snap.busy,
            session_id: snap.session_id,
            seed: snap.seed,
        }
    }
}

/// Flat wire form of an [`EngineEvent`]; only the fields the event carries are set
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    pub event: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub a: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combo: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seconds: Option<u32>,
}

impl From<&EngineEvent> for EventView {
    fn from(ev: &EngineEvent) -> Self {
        let base = EventView {
            event: ev.kind(),
            ..Default::default()
        };
        match *ev {
            EngineEvent::Cue(cue) => EventView {
                kind: Some(cue.as_str()),
                intensity: Some(cue.intensity()),
                ..base
            },
            EngineEvent::CellCleared { index, symbol } => EventView {
                index: Some(index),
                symbol: symbol.map(|s| s.0),
                ..base
            },
            EngineEvent::SpecialCreated { index, kind }
            | EngineEvent::SpecialActivated { index, kind } => EventView {
                index: Some(index),
                kind: Some(kind.as_str()),
                ..base
            },
            EngineEvent::ObstacleDamaged { index, health } => EventView {
                index: Some(index),
                health: Some(health),
                ..base
            },
            EngineEvent::ObstacleDestroyed { index, kind }
            | EngineEvent::ObstacleSpread { index, kind } => EventView {
                index: Some(index),
                kind: Some(kind.as_str()),
                ..base
            },
            EngineEvent::IceBroken { index } | EngineEvent::TileCrushed { index } => EventView {
                index: Some(index),
                ..base
            },
            EngineEvent::SwapReverted { a, b } => EventView {
                a: Some(a),
                b: Some(b),
                ..base
            },
            EngineEvent::CascadeStep {
                combo,
                removed,
                points,
            } => EventView {
                combo: Some(combo),
                removed: Some(removed),
                points: Some(points),
                ..base
            },
            EngineEvent::Message(text) => EventView {
                message: Some(text),
                ..base
            },
            EngineEvent::PowerAwarded(kind) => EventView {
                kind: Some(kind.as_str()),
                ..base
            },
            EngineEvent::PowerUsed { kind, target } => EventView {
                kind: Some(kind.as_str()),
                index: target,
                ..base
            },
            EngineEvent::LevelPhaseChanged(phase) => EventView {
                kind: Some(phase.as_str()),
                points: match phase {
                    LevelPhase::Complete { bonus } => Some(bonus),
                    _ => None,
                },
                ..base
            },
            EngineEvent::CountdownStarted { seconds } => EventView {
                seconds: Some(seconds),
                ..base
            },
            EngineEvent::Frame { phase, .. } => EventView {
                kind: Some(phase.as_str()),
                ..base
            },
            EngineEvent::Shuffled
            | EngineEvent::ObjectivesComplete
            | EngineEvent::CountdownStopped => base,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OutboundMessage {
    State {
        seq: u64,
        snapshot: SnapshotView,
    },
    Frame {
        seq: u64,
        phase: &'static str,
        snapshot: SnapshotView,
    },
    Event {
        seq: u64,
        #[serde(flatten)]
        event: EventView,
    },
    #[serde(rename_all = "camelCase")]
    Clock { seq: u64, time_left: u32 },
    Hint {
        seq: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        swap: Option<[usize; 2]>,
    },
    Ack {
        seq: u64,
        command: &'static str,
        committed: bool,
    },
    Error {
        seq: u64,
        command: &'static str,
        code: &'static str,
        message: &'static str,
    },
}

impl OutboundMessage {
    pub fn new(seq: u64, outbound: &Outbound) -> Self {
        match outbound {
            Outbound::State(snapshot) => Self::State {
                seq,
                snapshot: SnapshotView::from(snapshot.as_ref()),
            },
            Outbound::Frame { phase, snapshot } => Self::Frame {
                seq,
                phase: phase.as_str(),
                snapshot: SnapshotView::from(snapshot.as_ref()),
            },
            Outbound::Event(ev) => Self::Event {
                seq,
                event: EventView::from(ev),
            },
            Outbound::Clock { time_left } => Self::Clock {
                seq,
                time_left: *time_left,
            },
            Outbound::Hint(swap) => Self::Hint {
                seq,
                swap: swap.map(|(a, b)| [a, b]),
            },
            Outbound::Ack { command, committed } => Self::Ack {
                seq,
                command,
                committed: *committed,
            },
            Outbound::Rejected { command, reason } => Self::Error {
                seq,
                command,
                code: reason.code(),
                message: reason.message(),
            },
        }
    }
}

/// Encode one outbound message as a single JSON line (no trailing newline)
pub fn encode_line(seq: u64, outbound: &Outbound) -> Result<String> {
    serde_json::to_string(&OutboundMessage::new(seq, outbound)).map_err(AdapterError::Encode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameState;
    use crate::runtime::Rejection;
    use crate::types::{Cue, ObstacleKind};
    use serde_json::Value;

    #[test]
    fn test_parse_swap_and_power() {
        match parse_command(r#"{"type":"swap","a":3,"b":4}"#).unwrap() {
            Command::Swap { a, b } => assert_eq!((a, b), (3, 4)),
            other => panic!("unexpected {other:?}"),
        }
        match parse_command(r#"{"type":"power","power":"hammer","target":9}"#).unwrap() {
            Command::Power { kind, target } => {
                assert_eq!(kind, PowerKind::Hammer);
                assert_eq!(target, Some(9));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            parse_command(r#"{"type":"power","power":"time"}"#).unwrap(),
            Command::Power { target: None, .. }
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_values() {
        let err = parse_command(r#"{"type":"power","power":"laser"}"#).unwrap_err();
        assert!(matches!(err, AdapterError::Unknown { what: "power", .. }));
        let err = parse_command(r#"{"type":"mode","mode":"medium"}"#).unwrap_err();
        assert!(matches!(err, AdapterError::Unknown { what: "mode", .. }));
        assert!(matches!(
            parse_command(r#"{"type":"teleport"}"#).unwrap_err(),
            AdapterError::Decode(_)
        ));
    }

    #[test]
    fn test_state_line_carries_board_and_counters() {
        let mut gs = GameState::new(GameMode::Easy, 7);
        gs.start();
        gs.board_mut().place_obstacle(0, ObstacleKind::Trash);
        let line = encode_line(1, &Outbound::State(Box::new(gs.snapshot()))).unwrap();
        let v: Value = serde_json::from_str(&line).unwrap();

        assert_eq!(v["type"], "state");
        assert_eq!(v["seq"], 1);
        assert_eq!(v["snapshot"]["width"], 8);
        assert_eq!(v["snapshot"]["cells"].as_array().unwrap().len(), 64);
        assert_eq!(v["snapshot"]["cells"][0]["obstacle"], "trash");
        assert_eq!(v["snapshot"]["cells"][0]["health"], 2);
        assert!(v["snapshot"]["cells"][0].get("symbol").is_none());
        assert_eq!(v["snapshot"]["phase"], "active");
        assert_eq!(v["snapshot"]["superpowers"]["bomb"], 1);
    }

    #[test]
    fn test_event_line_is_flat() {
        let line = encode_line(
            4,
            &Outbound::Event(EngineEvent::CascadeStep {
                combo: 1,
                removed: 5,
                points: 55,
            }),
        )
        .unwrap();
        let v: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(v["type"], "event");
        assert_eq!(v["event"], "cascadeStep");
        assert_eq!(v["points"], 55);
        assert!(v.get("index").is_none());

        let line = encode_line(5, &Outbound::Event(EngineEvent::Cue(Cue::Combo { size: 9 }))).unwrap();
        let v: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(v["event"], "cue");
        assert_eq!(v["kind"], "combo");
    }

    #[test]
    fn test_rejection_line() {
        let line = encode_line(
            2,
            &Outbound::Rejected {
                command: "swap",
                reason: Rejection::Busy,
            },
        )
        .unwrap();
        let v: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(v["type"], "error");
        assert_eq!(v["code"], "busy");
        assert_eq!(v["command"], "swap");
    }
}
