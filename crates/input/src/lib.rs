//! Terminal input module.
//!
//! Independent of any rendering. Maps `crossterm` key events into
//! [`UiCommand`]s and keeps the board cursor with its two-click swap
//! selection.

pub mod cursor;
pub mod map;

pub use tui_match3_types as types;

pub use cursor::{Cursor, Selection};
pub use map::{handle_key_event, should_quit, UiCommand};
