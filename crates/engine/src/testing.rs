//! Scripted engine for driving the session controller in tests and benches.
//!
//! Every command is counted, and the outcome of the next gravity tick, hard
//! drop or hold can be forced so that lock and game-over paths are reachable
//! without playing a real game.

use std::time::Duration;

use crate::types::{drop_interval_ms, CellKind, PieceKind, RunStats, SOFT_DROP_MULTIPLIER};
use crate::{Engine, EngineError, Playfield};

/// How many times each engine command was issued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineCalls {
    pub move_left: u32,
    pub move_right: u32,
    pub rotate_cw: u32,
    pub rotate_ccw: u32,
    pub hard_drop: u32,
    pub hold: u32,
    pub tick_lower: u32,
    pub toggle_soft_drop: u32,
}

impl EngineCalls {
    /// Commands that came from gameplay keys.
    pub fn gameplay_total(&self) -> u32 {
        self.move_left
            + self.move_right
            + self.rotate_cw
            + self.rotate_ccw
            + self.hard_drop
            + self.hold
            + self.toggle_soft_drop
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedEngine {
    pub calls: EngineCalls,
    pub stats: RunStats,
    /// Next `tick_lower` reports a lock.
    pub lock_on_next_tick: bool,
    /// Every `tick_lower` reports a lock.
    pub always_lock: bool,
    /// The next lock (tick, hard drop or hold) tops out.
    pub game_over_on_lock: bool,
    /// Returned, once, by the next fallible command.
    pub fail_next: Option<EngineError>,
    /// Level applied on the next lock.
    pub level_on_lock: Option<u32>,
    soft_drop: bool,
    game_over: bool,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self {
            stats: RunStats {
                level: 1,
                ..RunStats::default()
            },
            ..Self::default()
        }
    }

    pub fn is_soft_dropping(&self) -> bool {
        self.soft_drop
    }

    pub fn set_level(&mut self, level: u32) {
        self.stats.level = level;
    }

    fn check(&mut self, op: &'static str) -> Result<(), EngineError> {
        if let Some(err) = self.fail_next.take() {
            return Err(err);
        }
        if self.game_over {
            return Err(EngineError::GameOver { op });
        }
        Ok(())
    }

    fn locked(&mut self) {
        if let Some(level) = self.level_on_lock.take() {
            self.stats.level = level;
        }
        if self.game_over_on_lock {
            self.game_over = true;
        }
    }
}

impl Engine for ScriptedEngine {
    fn move_left(&mut self) -> Result<(), EngineError> {
        self.calls.move_left += 1;
        self.check("move left")
    }

    fn move_right(&mut self) -> Result<(), EngineError> {
        self.calls.move_right += 1;
        self.check("move right")
    }

    fn rotate(&mut self, clockwise: bool) -> Result<(), EngineError> {
        if clockwise {
            self.calls.rotate_cw += 1;
        } else {
            self.calls.rotate_ccw += 1;
        }
        self.check("rotate")
    }

    fn hard_drop(&mut self) -> Result<u32, EngineError> {
        self.calls.hard_drop += 1;
        self.check("hard drop")?;
        self.locked();
        Ok(0)
    }

    fn toggle_soft_drop(&mut self) -> Duration {
        self.calls.toggle_soft_drop += 1;
        self.soft_drop = !self.soft_drop;
        if self.soft_drop {
            self.soft_drop_interval()
        } else {
            self.gravity_interval()
        }
    }

    fn hold(&mut self) -> Result<(), EngineError> {
        self.calls.hold += 1;
        self.check("hold")?;
        self.locked();
        Ok(())
    }

    fn tick_lower(&mut self) -> Result<bool, EngineError> {
        self.calls.tick_lower += 1;
        self.check("lower")?;
        if std::mem::take(&mut self.lock_on_next_tick) || self.always_lock {
            self.locked();
            return Ok(true);
        }
        Ok(false)
    }

    fn is_game_over(&self) -> bool {
        self.game_over
    }

    fn gravity_interval(&self) -> Duration {
        Duration::from_millis(u64::from(drop_interval_ms(self.stats.level)))
    }

    fn soft_drop_interval(&self) -> Duration {
        self.gravity_interval() / SOFT_DROP_MULTIPLIER
    }

    fn stats(&self) -> RunStats {
        self.stats
    }
}

impl Playfield for ScriptedEngine {
    fn cell(&self, _x: u8, _y: u8) -> CellKind {
        CellKind::Empty
    }

    fn hold_piece(&self) -> Option<PieceKind> {
        None
    }

    fn next_pieces(&self) -> &[PieceKind] {
        &[]
    }
}
