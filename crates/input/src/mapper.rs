//! Press/release tracking on top of [`map_key`](crate::map::map_key).
//!
//! With the kitty keyboard protocol the terminal reports releases, and they are
//! passed through. Terminals without it only send presses (plus auto-repeat
//! presses while a key is held), so a held soft drop is released synthetically
//! once no repeat has arrived for [`DEFAULT_RELEASE_TIMEOUT`].

use std::time::{Duration, Instant};

use crossterm::event::{KeyEvent, KeyEventKind};

use crate::map::map_key;
use crate::types::{InputAction, KeyInput};

// Long enough to bridge the initial auto-repeat delay of common terminals.
pub const DEFAULT_RELEASE_TIMEOUT: Duration = Duration::from_millis(550);

#[derive(Debug, Clone)]
pub struct KeyMapper {
    reports_release: bool,
    release_timeout: Duration,
    /// Last press of a held soft drop, when releases are synthesized.
    soft_drop_seen: Option<Instant>,
}

impl KeyMapper {
    pub fn new(reports_release: bool) -> Self {
        Self {
            reports_release,
            release_timeout: DEFAULT_RELEASE_TIMEOUT,
            soft_drop_seen: None,
        }
    }

    pub fn with_release_timeout(mut self, timeout: Duration) -> Self {
        self.release_timeout = timeout;
        self
    }

    pub fn reports_release(&self) -> bool {
        self.reports_release
    }

    /// Translate one terminal key event.
    pub fn map(&mut self, key: KeyEvent, now: Instant) -> Option<KeyInput> {
        let action = map_key(key)?;
        match key.kind {
            KeyEventKind::Release => {
                if action == InputAction::SoftDrop {
                    self.soft_drop_seen = None;
                }
                Some(KeyInput::release(action))
            }
            KeyEventKind::Press | KeyEventKind::Repeat => {
                if action == InputAction::SoftDrop && !self.reports_release {
                    self.soft_drop_seen = Some(now);
                }
                // Auto-repeat only matters for keys that are held.
                if key.kind == KeyEventKind::Repeat && action != InputAction::SoftDrop {
                    return None;
                }
                Some(KeyInput::press(action))
            }
        }
    }

    /// When a synthetic release is due, if one is pending.
    pub fn release_deadline(&self) -> Option<Instant> {
        self.soft_drop_seen.map(|t| t + self.release_timeout)
    }

    /// Emit the synthetic soft-drop release once its deadline has passed.
    pub fn poll_release(&mut self, now: Instant) -> Option<KeyInput> {
        let deadline = self.release_deadline()?;
        if now < deadline {
            return None;
        }
        self.soft_drop_seen = None;
        Some(KeyInput::release(InputAction::SoftDrop))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    fn event(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn releases_pass_through_when_reported() {
        let t0 = Instant::now();
        let mut m = KeyMapper::new(true);
        assert_eq!(
            m.map(event(KeyCode::Down, KeyEventKind::Press), t0),
            Some(KeyInput::press(InputAction::SoftDrop))
        );
        assert_eq!(m.release_deadline(), None);
        assert_eq!(
            m.map(event(KeyCode::Down, KeyEventKind::Release), t0),
            Some(KeyInput::release(InputAction::SoftDrop))
        );
    }

    #[test]
    fn soft_drop_auto_releases_without_release_events() {
        let t0 = Instant::now();
        let mut m = KeyMapper::new(false).with_release_timeout(Duration::from_millis(100));
        m.map(event(KeyCode::Down, KeyEventKind::Press), t0);
        assert_eq!(m.poll_release(t0 + Duration::from_millis(99)), None);

        // A repeat keeps it held.
        m.map(
            event(KeyCode::Down, KeyEventKind::Press),
            t0 + Duration::from_millis(90),
        );
        assert_eq!(m.poll_release(t0 + Duration::from_millis(150)), None);
        assert_eq!(
            m.poll_release(t0 + Duration::from_millis(190)),
            Some(KeyInput::release(InputAction::SoftDrop))
        );
        assert_eq!(m.poll_release(t0 + Duration::from_millis(500)), None);
    }

    #[test]
    fn repeats_of_tap_keys_are_dropped() {
        let t0 = Instant::now();
        let mut m = KeyMapper::new(true);
        assert_eq!(m.map(event(KeyCode::Char(' '), KeyEventKind::Repeat), t0), None);
        assert_eq!(
            m.map(event(KeyCode::Down, KeyEventKind::Repeat), t0),
            Some(KeyInput::press(InputAction::SoftDrop))
        );
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        let mut m = KeyMapper::new(false);
        assert_eq!(m.map(event(KeyCode::Char('r'), KeyEventKind::Press), Instant::now()), None);
        assert_eq!(m.release_deadline(), None);
    }
}
