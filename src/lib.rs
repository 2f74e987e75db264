//! TUI Match-3 (workspace facade crate).
//!
//! Re-exports the member crates under one roof as
//! `tui_match3::{core, engine, adapter, term, input, types}`; the
//! implementation lives in the dedicated crates under `crates/`.

pub use tui_match3_adapter as adapter;
pub use tui_match3_core as core;
pub use tui_match3_engine as engine;
pub use tui_match3_input as input;
pub use tui_match3_term as term;
pub use tui_match3_types as types;
