//! Deadline-based timer driver.
//!
//! The driver is the runtime half of the timer set: it applies the effects the
//! controller returns and reports which timers are due at a given instant.
//! Time is always passed in, so the driver is deterministic under test and the
//! event loop decides how to wait (`crossterm::event::poll` until
//! [`TimerDriver::next_deadline`]).
//!
//! A repeating timer that falls behind by a whole interval or more skips the
//! missed ticks instead of bursting to catch up.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::trace;

use crate::effect::{Effect, TimerTick};
use crate::timer::{TimerId, TimerTag};

#[derive(Debug, Clone, Copy)]
struct Slot {
    interval: Duration,
    one_shot: bool,
    /// Origin of the current countdown.
    last: Instant,
    /// Tag of the current run; `None` while stopped.
    armed: Option<TimerTag>,
}

impl Slot {
    fn deadline(&self) -> Option<Instant> {
        self.armed.map(|_| self.last + self.interval)
    }
}

#[derive(Debug, Default)]
pub struct TimerDriver {
    slots: HashMap<TimerId, Slot>,
}

impl TimerDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one scheduling effect. Hand-off effects are not the driver's
    /// concern and are ignored.
    pub fn apply(&mut self, effect: &Effect, now: Instant) {
        match *effect {
            Effect::Create {
                id,
                interval,
                one_shot,
            } => {
                self.slots.insert(
                    id,
                    Slot {
                        interval,
                        one_shot,
                        last: now,
                        armed: None,
                    },
                );
            }
            Effect::Start(tag) | Effect::Reset(tag) => {
                if let Some(slot) = self.slots.get_mut(&tag.id) {
                    slot.last = now;
                    slot.armed = Some(tag);
                }
            }
            Effect::Stop(id) => {
                if let Some(slot) = self.slots.get_mut(&id) {
                    slot.armed = None;
                }
            }
            Effect::SetInterval { id, interval } => {
                if let Some(slot) = self.slots.get_mut(&id) {
                    slot.interval = interval;
                }
            }
            Effect::RequestExit | Effect::RequestModeSwitch(_) => {}
        }
    }

    pub fn apply_all<'a>(&mut self, effects: impl IntoIterator<Item = &'a Effect>, now: Instant) {
        for effect in effects {
            self.apply(effect, now);
        }
    }

    /// Earliest deadline among armed timers.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.slots.values().filter_map(Slot::deadline).min()
    }

    pub fn is_armed(&self, id: TimerId) -> bool {
        self.slots.get(&id).is_some_and(|s| s.armed.is_some())
    }

    /// Collect the ticks due at `now`, earliest deadline first, into `out`.
    ///
    /// Each armed timer fires at most once per poll.
    pub fn poll_due(&mut self, now: Instant, out: &mut Vec<TimerTick>) {
        let start = out.len();
        let mut due: Vec<(Instant, TimerTag)> = Vec::new();

        for slot in self.slots.values_mut() {
            let (Some(tag), Some(deadline)) = (slot.armed, slot.deadline()) else {
                continue;
            };
            if deadline > now {
                continue;
            }
            due.push((deadline, tag));

            if slot.one_shot {
                slot.armed = None;
            } else if now.duration_since(deadline) >= slot.interval {
                slot.last = now;
            } else {
                slot.last = deadline;
            }
        }

        due.sort_by_key(|(deadline, tag)| (*deadline, tag.id));
        out.extend(due.into_iter().map(|(_, tag)| TimerTick { tag }));
        if out.len() > start {
            trace!(fired = out.len() - start, "timers due");
        }
    }
}
