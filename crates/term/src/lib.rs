//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer: it avoids widget/layout crates and
//! renders into a plain framebuffer that is diffed and flushed to the
//! terminal.
//!
//! - `core` stays deterministic and testable
//! - [`GameView`] is pure: snapshot in, framebuffer out
//! - Board cells are 2 columns wide (glyph plus special marker)

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use tui_match3_core as core;
pub use tui_match3_types as types;

pub use fb::{Attrs, Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, Overlay, Viewport};
pub use renderer::{changed_spans, encode_diff_into, encode_full_into, Span, TerminalRenderer};
