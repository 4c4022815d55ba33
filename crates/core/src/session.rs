//! Session controller - the lifecycle state machine of one marathon run.
//!
//! The controller owns the engine and the timer set. Each call to
//! [`Session::handle`] consumes exactly one event, settles the state fully, and
//! returns the ordered effects the caller must apply to its timer driver. It
//! never waits on anything itself.
//!
//! # Transitions
//!
//! | State | Event | Guard | Next |
//! |-------|-------|-------|------|
//! | any | Quit | - | Terminated (exit) |
//! | Running / Paused | Pause | engine not over | Paused / Running |
//! | Running | gameplay key | - | Running, or Finished on top-out |
//! | Running | fall tick | live fall tag | Running, or Finished on top-out |
//! | Running | session tick | live session tag | Running (elapsed advances) |
//! | Finished | end-delay tick | live end-delay tag | Terminated (hand-off) |
//! | any | switch to menu | - | Terminated (exit) |
//! | any | resize | - | unchanged |
//!
//! Every other combination is a no-op, and `Terminated` ignores everything.
//!
//! # Example
//!
//! ```
//! use tui_marathon_core::{Session, SessionConfig, SessionEvent, SessionState};
//! use tui_marathon_core::engine::testing::ScriptedEngine;
//! use tui_marathon_core::types::{InputAction, KeyInput};
//!
//! let (mut session, _effects) = Session::start(ScriptedEngine::new(), SessionConfig::default());
//! session.handle(SessionEvent::Key(KeyInput::press(InputAction::Pause))).unwrap();
//! assert_eq!(session.state(), SessionState::Paused);
//! ```

use std::time::Duration;

use tracing::{debug, info, trace, warn};

use crate::config::{Handoff, SessionConfig};
use crate::effect::{Effect, Effects, SessionEvent, TimerTick};
use crate::engine::{Engine, EngineError};
use crate::error::SessionError;
use crate::timer::{TimerKind, TimerSet, TimerTag};
use crate::types::{GameMode, InputAction, KeyInput, KeyPhase, RunStats, Screen};

/// Lifecycle state of a session. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Paused,
    /// Game over; the end-delay timer is counting down.
    Finished,
    /// Terminal. No further events are processed.
    Terminated,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Running => "running",
            SessionState::Paused => "paused",
            SessionState::Finished => "finished",
            SessionState::Terminated => "terminated",
        }
    }
}

/// What a session hands off when it ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    pub elapsed: Duration,
    pub stats: RunStats,
    pub mode: GameMode,
    /// The run reached game over (rather than being quit).
    pub game_over: bool,
}

pub struct Session<E> {
    engine: E,
    timers: TimerSet,
    state: SessionState,
    config: SessionConfig,
    elapsed: Duration,
    soft_drop: bool,
    show_help: bool,
    bounds: Option<(u16, u16)>,
}

impl<E: Engine> Session<E> {
    /// Begin a run. The returned effects create and start the session and fall
    /// clocks.
    pub fn start(engine: E, config: SessionConfig) -> (Self, Effects) {
        let mut timers = TimerSet::new(config.session_tick, engine.gravity_interval());

        let mut fx = Effects::new();
        fx.push(timers.session.create());
        fx.push(timers.fall.create());
        fx.extend(timers.session.start());
        fx.extend(timers.fall.start());

        info!(
            mode = config.mode.as_str(),
            level = engine.stats().level,
            handoff = config.handoff.as_str(),
            "session started"
        );

        let session = Self {
            engine,
            timers,
            state: SessionState::Running,
            config,
            elapsed: Duration::ZERO,
            soft_drop: false,
            show_help: false,
            bounds: None,
        };
        (session, fx)
    }

    /// Process one event and return the effects to apply, in order.
    ///
    /// An engine-contract violation terminates the session and is returned as
    /// the error; the controller does not try to continue.
    pub fn handle(&mut self, event: SessionEvent) -> Result<Effects, SessionError> {
        let mut fx = Effects::new();
        if self.state == SessionState::Terminated {
            return Ok(fx);
        }

        match event {
            SessionEvent::Key(key) => self.on_key(key, &mut fx)?,
            SessionEvent::Tick(tick) => self.on_tick(tick, &mut fx)?,
            SessionEvent::Resize { width, height } => {
                self.bounds = Some((width, height));
            }
            SessionEvent::SwitchMode(Screen::Menu) => {
                self.terminate(Effect::RequestExit, &mut fx);
            }
            SessionEvent::SwitchMode(_) => {}
        }

        Ok(fx)
    }

    fn on_key(&mut self, key: KeyInput, fx: &mut Effects) -> Result<(), SessionError> {
        match (key.action, key.phase) {
            (InputAction::Quit, KeyPhase::Press) => self.terminate(Effect::RequestExit, fx),
            (InputAction::Help, KeyPhase::Press) => self.show_help = !self.show_help,
            (InputAction::Pause, KeyPhase::Press) => self.toggle_pause(fx)?,
            (action, phase) if action.is_gameplay() => {
                if self.state != SessionState::Running || self.engine.is_game_over() {
                    trace!(action = action.as_str(), state = self.state.as_str(), "input filtered");
                    return Ok(());
                }
                self.forward(action, phase, fx)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn toggle_pause(&mut self, fx: &mut Effects) -> Result<(), SessionError> {
        if self.engine.is_game_over() {
            return Ok(());
        }
        match self.state {
            SessionState::Running => {
                // A release delivered while paused would be filtered, so a held
                // soft drop is let go here.
                if self.soft_drop {
                    self.set_soft_drop(false, fx);
                }
                fx.extend(self.timers.session.stop());
                fx.extend(self.timers.fall.stop());
                self.state = SessionState::Paused;
                debug!("paused");
            }
            SessionState::Paused => {
                fx.extend(self.timers.session.start());
                fx.extend(self.timers.fall.start());
                self.state = SessionState::Running;
                debug!("resumed");
            }
            SessionState::Finished | SessionState::Terminated => {}
        }
        Ok(())
    }

    fn forward(
        &mut self,
        action: InputAction,
        phase: KeyPhase,
        fx: &mut Effects,
    ) -> Result<(), SessionError> {
        if action == InputAction::SoftDrop {
            match phase {
                KeyPhase::Press if !self.soft_drop => self.set_soft_drop(true, fx),
                KeyPhase::Release if self.soft_drop => self.set_soft_drop(false, fx),
                _ => {}
            }
            return Ok(());
        }
        if phase != KeyPhase::Press {
            return Ok(());
        }

        match action {
            InputAction::Left => {
                self.engine
                    .move_left()
                    .map_err(|e| self.fatal("move left", e))?;
            }
            InputAction::Right => {
                self.engine
                    .move_right()
                    .map_err(|e| self.fatal("move right", e))?;
            }
            InputAction::RotateCw => {
                self.engine
                    .rotate(true)
                    .map_err(|e| self.fatal("rotate clockwise", e))?;
            }
            InputAction::RotateCcw => {
                self.engine
                    .rotate(false)
                    .map_err(|e| self.fatal("rotate counter-clockwise", e))?;
            }
            InputAction::Hold => {
                self.engine.hold().map_err(|e| self.fatal("hold", e))?;
                if self.engine.is_game_over() {
                    self.finish(fx);
                }
            }
            InputAction::HardDrop => {
                self.engine
                    .hard_drop()
                    .map_err(|e| self.fatal("hard drop", e))?;
                if self.engine.is_game_over() {
                    self.finish(fx);
                } else {
                    // The next piece falls on a fresh cadence.
                    fx.push(self.timers.fall.reset());
                    self.sync_fall_interval(fx);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn on_tick(&mut self, tick: TimerTick, fx: &mut Effects) -> Result<(), SessionError> {
        let Some(kind) = self.timers.classify(tick.tag) else {
            debug!(timer = tick.tag.id.get(), epoch = tick.tag.epoch, "stale tick dropped");
            return Ok(());
        };

        match (self.state, kind) {
            (SessionState::Running, TimerKind::Session) => {
                self.elapsed += self.timers.session.interval();
            }
            (SessionState::Running, TimerKind::Fall) => {
                let locked = self
                    .engine
                    .tick_lower()
                    .map_err(|e| self.fatal("gravity tick", e))?;
                if locked {
                    if self.engine.is_game_over() {
                        self.finish(fx);
                    } else {
                        self.sync_fall_interval(fx);
                    }
                }
            }
            (SessionState::Finished, TimerKind::EndDelay) => {
                let effect = match self.config.handoff {
                    Handoff::Results => Effect::RequestModeSwitch(Screen::Results),
                    Handoff::Menu => Effect::RequestModeSwitch(Screen::Menu),
                    Handoff::Exit => Effect::RequestExit,
                };
                self.terminate(effect, fx);
            }
            _ => {}
        }
        Ok(())
    }

    fn set_soft_drop(&mut self, on: bool, fx: &mut Effects) {
        let interval = self.engine.toggle_soft_drop();
        self.soft_drop = on;
        fx.extend(self.timers.fall.set_interval(interval));
    }

    /// Point the fall clock at whichever interval source is authoritative now.
    fn sync_fall_interval(&mut self, fx: &mut Effects) {
        let interval = if self.soft_drop {
            self.engine.soft_drop_interval()
        } else {
            self.engine.gravity_interval()
        };
        fx.extend(self.timers.fall.set_interval(interval));
    }

    fn finish(&mut self, fx: &mut Effects) {
        fx.extend(self.timers.session.stop());
        fx.extend(self.timers.fall.stop());
        if let Some(delay) = self.timers.create_end_delay(self.config.end_delay) {
            fx.push(delay.create());
            fx.extend(delay.start());
        }
        self.state = SessionState::Finished;

        let stats = self.engine.stats();
        info!(
            score = stats.score,
            lines = stats.lines,
            level = stats.level,
            elapsed_ms = self.elapsed.as_millis() as u64,
            "game over"
        );
    }

    fn terminate(&mut self, effect: Effect, fx: &mut Effects) {
        fx.push(effect);
        info!(from = self.state.as_str(), effect = ?effect, "session terminated");
        self.state = SessionState::Terminated;
    }

    fn fatal(&mut self, action: &'static str, source: EngineError) -> SessionError {
        warn!(action, error = %source, state = self.state.as_str(), "engine contract violated");
        self.state = SessionState::Terminated;
        SessionError::Engine { action, source }
    }
}

impl<E> Session<E> {
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn timers(&self) -> &TimerSet {
        &self.timers
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Time accumulated by the session clock.
    ///
    /// Advances one session interval per live tick. Ticks the driver skipped
    /// after a late poll are not counted.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn is_soft_dropping(&self) -> bool {
        self.soft_drop
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    /// Layout bounds from the last resize, if any.
    pub fn bounds(&self) -> Option<(u16, u16)> {
        self.bounds
    }

    /// Tag of the end-delay run whose tick will terminate the session.
    pub fn pending_termination(&self) -> Option<TimerTag> {
        match self.state {
            SessionState::Finished => self.timers.end_delay().map(|t| t.tag()),
            _ => None,
        }
    }

    pub fn into_engine(self) -> E {
        self.engine
    }
}

impl<E: Engine> Session<E> {
    pub fn outcome(&self) -> RunOutcome {
        RunOutcome {
            elapsed: self.elapsed,
            stats: self.engine.stats(),
            mode: self.config.mode,
            game_over: self.timers.end_delay().is_some(),
        }
    }
}
