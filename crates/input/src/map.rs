//! Key mapping from terminal events to session actions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::types::InputAction;

/// Map a key to the action it is bound to.
pub fn map_key(key: KeyEvent) -> Option<InputAction> {
    if is_quit(key) {
        return Some(InputAction::Quit);
    }
    match key.code {
        // Movement
        KeyCode::Left | KeyCode::Char('h' | 'H' | 'a' | 'A') => Some(InputAction::Left),
        KeyCode::Right | KeyCode::Char('l' | 'L' | 'd' | 'D') => Some(InputAction::Right),
        KeyCode::Down | KeyCode::Char('j' | 'J' | 's' | 'S') => Some(InputAction::SoftDrop),

        // Rotation
        KeyCode::Up | KeyCode::Char('k' | 'K' | 'w' | 'W' | 'x' | 'X') => {
            Some(InputAction::RotateCw)
        }
        KeyCode::Char('z' | 'Z' | 'y' | 'Y') => Some(InputAction::RotateCcw),

        // Actions
        KeyCode::Char(' ') => Some(InputAction::HardDrop),
        KeyCode::Char('c' | 'C') => Some(InputAction::Hold),
        KeyCode::Char('p' | 'P') | KeyCode::Esc => Some(InputAction::Pause),
        KeyCode::Char('?') | KeyCode::F(1) => Some(InputAction::Help),

        _ => None,
    }
}

/// `q` or Ctrl-C.
pub fn is_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q' | 'Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(c: KeyCode) -> Option<InputAction> {
        map_key(KeyEvent::from(c))
    }

    #[test]
    fn test_movement_keys() {
        assert_eq!(code(KeyCode::Left), Some(InputAction::Left));
        assert_eq!(code(KeyCode::Right), Some(InputAction::Right));
        assert_eq!(code(KeyCode::Down), Some(InputAction::SoftDrop));
        assert_eq!(code(KeyCode::Char('H')), Some(InputAction::Left));
        assert_eq!(code(KeyCode::Char('d')), Some(InputAction::Right));
        assert_eq!(code(KeyCode::Char('J')), Some(InputAction::SoftDrop));
    }

    #[test]
    fn test_rotation_keys() {
        assert_eq!(code(KeyCode::Up), Some(InputAction::RotateCw));
        assert_eq!(code(KeyCode::Char('x')), Some(InputAction::RotateCw));
        assert_eq!(code(KeyCode::Char('z')), Some(InputAction::RotateCcw));
        assert_eq!(code(KeyCode::Char('Y')), Some(InputAction::RotateCcw));
    }

    #[test]
    fn test_action_keys() {
        assert_eq!(code(KeyCode::Char(' ')), Some(InputAction::HardDrop));
        assert_eq!(code(KeyCode::Char('c')), Some(InputAction::Hold));
        assert_eq!(code(KeyCode::Char('p')), Some(InputAction::Pause));
        assert_eq!(code(KeyCode::Esc), Some(InputAction::Pause));
        assert_eq!(code(KeyCode::Char('?')), Some(InputAction::Help));
        assert_eq!(code(KeyCode::Char('r')), None);
    }

    #[test]
    fn test_quit_keys() {
        assert!(is_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(is_quit(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!is_quit(KeyEvent::from(KeyCode::Char('c'))));
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(InputAction::Quit)
        );
    }
}
