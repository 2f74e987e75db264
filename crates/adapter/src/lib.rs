//! Adapter crate - async runtime around one game session
//!
//! Front-ends that want real pacing and a real countdown talk to the game
//! through this crate instead of driving `GameState` directly:
//!
//! - [`runtime`]: the actor task, its command channel and outbound stream
//! - [`countdown`]: the cancelable per-second timer
//! - [`protocol`]: line-delimited JSON for commands and frames
//! - [`config`]: environment configuration
//!
//! # Environment Variables
//!
//! - `MATCH3_MODE`: `easy` (default) or `hard`
//! - `MATCH3_SEED`: RNG seed (default 12345)
//! - `MATCH3_PACING_MS`: fixed pause between pipeline phases; unset uses
//!   each phase's own pause, `0` disables pacing
//! - `MATCH3_COUNTDOWN_MS`: countdown period (default 1000)
//! - `MATCH3_MAX_PENDING`: command channel capacity (default 16)
//!
//! # Example Protocol Flow
//!
//! ```text
//! -> {"type":"swap","a":10,"b":11}
//! <- {"type":"ack","seq":7,"command":"swap","committed":true}
//! <- {"type":"frame","seq":8,"phase":"cleared","snapshot":{...}}
//! <- {"type":"event","seq":9,"event":"cascadeStep","combo":0,"removed":3,"points":33}
//! <- {"type":"state","seq":14,"snapshot":{...}}
//! ```

pub mod config;
pub mod countdown;
pub mod error;
pub mod protocol;
pub mod runtime;

pub use tui_match3_core as core;
pub use tui_match3_engine as engine;
pub use tui_match3_types as types;

pub use config::AdapterConfig;
pub use countdown::Countdown;
pub use error::AdapterError;
pub use protocol::{encode_line, parse_command, OutboundMessage};
pub use runtime::{Actor, Command, Outbound, Rejection, RuntimeHandle};
