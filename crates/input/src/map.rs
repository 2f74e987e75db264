//! Key mapping from terminal events to UI commands.

use crate::types::PowerKind;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press asks the front-end to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    CursorUp,
    CursorDown,
    CursorLeft,
    CursorRight,
    /// Select the cursor cell, swap with the selection, or fire the selected power.
    Select,
    /// Drop the selection and any selected power.
    Cancel,
    Power(PowerKind),
    Hint,
    /// Let the planner play one move.
    AutoMove,
    NextLevel,
    Reset,
    ToggleMode,
}

/// Map keyboard input to UI commands.
pub fn handle_key_event(key: KeyEvent) -> Option<UiCommand> {
    match key.code {
        // Cursor
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') | KeyCode::Char('w') | KeyCode::Char('W') => {
            Some(UiCommand::CursorUp)
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') | KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(UiCommand::CursorDown)
        }
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(UiCommand::CursorLeft)
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(UiCommand::CursorRight)
        }

        KeyCode::Char(' ') | KeyCode::Enter => Some(UiCommand::Select),
        KeyCode::Esc => Some(UiCommand::Cancel),

        // Superpowers
        KeyCode::Char('1') | KeyCode::Char('b') | KeyCode::Char('B') => Some(UiCommand::Power(PowerKind::Bomb)),
        KeyCode::Char('2') | KeyCode::Char('x') | KeyCode::Char('X') => Some(UiCommand::Power(PowerKind::Hammer)),
        KeyCode::Char('3') | KeyCode::Char('t') | KeyCode::Char('T') => Some(UiCommand::Power(PowerKind::Time)),

        KeyCode::Char('?') | KeyCode::Char('i') | KeyCode::Char('I') => Some(UiCommand::Hint),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(UiCommand::AutoMove),
        KeyCode::Char('n') | KeyCode::Char('N') => Some(UiCommand::NextLevel),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(UiCommand::Reset),
        KeyCode::Char('m') | KeyCode::Char('M') => Some(UiCommand::ToggleMode),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn test_cursor_keys() {
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Left)), Some(UiCommand::CursorLeft));
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Right)), Some(UiCommand::CursorRight));
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Up)), Some(UiCommand::CursorUp));
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Char('J'))), Some(UiCommand::CursorDown));
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Char('a'))), Some(UiCommand::CursorLeft));
    }

    #[test]
    fn test_power_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('1'))),
            Some(UiCommand::Power(PowerKind::Bomb))
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('x'))),
            Some(UiCommand::Power(PowerKind::Hammer))
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('T'))),
            Some(UiCommand::Power(PowerKind::Time))
        );
    }

    #[test]
    fn test_session_keys() {
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Char(' '))), Some(UiCommand::Select));
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Esc)), Some(UiCommand::Cancel));
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Char('n'))), Some(UiCommand::NextLevel));
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Char('R'))), Some(UiCommand::Reset));
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Char('m'))), Some(UiCommand::ToggleMode));
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Char('z'))), None);
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('x'))));
    }
}
