//! Effects and events - what flows into and out of the controller.

use std::time::Duration;

use arrayvec::ArrayVec;

use crate::timer::{TimerId, TimerTag};
use crate::types::{KeyInput, Screen};

/// Upper bound on the effects a single transition can produce.
pub const MAX_EFFECTS: usize = 8;

/// Ordered effects returned by one transition, applied by the caller.
pub type Effects = ArrayVec<Effect, MAX_EFFECTS>;

/// Scheduling or hand-off request produced by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Register a timer with the driver, initially stopped.
    Create {
        id: TimerId,
        interval: Duration,
        one_shot: bool,
    },
    /// Arm the timer; its ticks carry `tag` until the next start/stop/reset.
    Start(TimerTag),
    Stop(TimerId),
    /// Restart the countdown from now; ticks carry the new `tag`.
    Reset(TimerTag),
    /// Change the interval, keeping the countdown origin.
    SetInterval { id: TimerId, interval: Duration },
    RequestExit,
    RequestModeSwitch(Screen),
}

impl Effect {
    /// Whether this effect ends the session's event loop.
    pub fn is_handoff(&self) -> bool {
        matches!(self, Effect::RequestExit | Effect::RequestModeSwitch(_))
    }
}

/// A timer fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTick {
    pub tag: TimerTag,
}

/// One input to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Key(KeyInput),
    Tick(TimerTick),
    Resize { width: u16, height: u16 },
    /// Another screen asked for a switch to `target`.
    SwitchMode(Screen),
}

impl From<KeyInput> for SessionEvent {
    fn from(key: KeyInput) -> Self {
        SessionEvent::Key(key)
    }
}

impl From<TimerTick> for SessionEvent {
    fn from(tick: TimerTick) -> Self {
        SessionEvent::Tick(tick)
    }
}
