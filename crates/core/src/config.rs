//! Session configuration.
//!
//! Defaults come from the timing constants in `tui-marathon-types`; each value
//! can be overridden through the environment:
//!
//! - `MARATHON_SESSION_TICK_MS`: elapsed-clock resolution (default 10)
//! - `MARATHON_END_DELAY_MS`: wait between game over and hand-off (default 5000)
//! - `MARATHON_HANDOFF`: `results`, `menu` or `exit` (default `results`)

use std::time::Duration;

use crate::types::{GameMode, END_DELAY_MS, SESSION_TICK_MS};

/// Where a finished session goes once the end delay has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Handoff {
    /// Switch to the results / leaderboard screen.
    #[default]
    Results,
    /// Switch back to the menu.
    Menu,
    /// Exit without a hand-off screen.
    Exit,
}

impl Handoff {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "results" | "leaderboard" => Some(Handoff::Results),
            "menu" => Some(Handoff::Menu),
            "exit" | "quit" => Some(Handoff::Exit),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Handoff::Results => "results",
            Handoff::Menu => "menu",
            Handoff::Exit => "exit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Interval of the elapsed-time clock.
    pub session_tick: Duration,
    /// Delay between game over and hand-off.
    pub end_delay: Duration,
    pub handoff: Handoff,
    pub mode: GameMode,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_tick: Duration::from_millis(u64::from(SESSION_TICK_MS)),
            end_delay: Duration::from_millis(u64::from(END_DELAY_MS)),
            handoff: Handoff::default(),
            mode: GameMode::default(),
        }
    }
}

impl SessionConfig {
    /// Defaults overridden by `MARATHON_*` environment variables. Unparseable
    /// values fall back to the default.
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();

        let session_tick = env::var("MARATHON_SESSION_TICK_MS")
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(|ms| Duration::from_millis(ms.max(1)))
            .unwrap_or(defaults.session_tick);

        let end_delay = env::var("MARATHON_END_DELAY_MS")
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.end_delay);

        let handoff = env::var("MARATHON_HANDOFF")
            .ok()
            .and_then(|s| Handoff::from_str(&s))
            .unwrap_or(defaults.handoff);

        Self {
            session_tick,
            end_delay,
            handoff,
            mode: defaults.mode,
        }
    }

    pub fn with_end_delay(mut self, end_delay: Duration) -> Self {
        self.end_delay = end_delay;
        self
    }

    pub fn with_handoff(mut self, handoff: Handoff) -> Self {
        self.handoff = handoff;
        self
    }
}
