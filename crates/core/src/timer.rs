//! Timer set - identities and run state for the session's three clocks.
//!
//! A [`TimerHandle`] does not wait on anything itself. Each state change returns
//! the [`Effect`] the runtime driver must apply, and every tick the driver later
//! emits carries the [`TimerTag`] that was current when the timer was armed.
//!
//! The tag's `epoch` moves on every start, stop and reset. A tick that was
//! already queued when its timer was stopped or reset therefore no longer
//! matches the handle, and [`TimerSet::classify`] rejects it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::effect::Effect;

static NEXT_TIMER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique timer identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    fn next() -> Self {
        Self(NEXT_TIMER_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Identity stamped on every tick: which timer, and which run of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerTag {
    pub id: TimerId,
    pub epoch: u32,
}

/// Role of a live timer within the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Elapsed-time clock.
    Session,
    /// Gravity.
    Fall,
    /// Wait between game over and hand-off.
    EndDelay,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerHandle {
    id: TimerId,
    epoch: u32,
    interval: Duration,
    running: bool,
    one_shot: bool,
}

impl TimerHandle {
    /// A stopped repeating timer with a fresh identity.
    pub fn new(interval: Duration) -> Self {
        Self {
            id: TimerId::next(),
            epoch: 0,
            interval,
            running: false,
            one_shot: false,
        }
    }

    /// A stopped timer that fires once per start.
    pub fn one_shot(interval: Duration) -> Self {
        Self {
            one_shot: true,
            ..Self::new(interval)
        }
    }

    pub fn id(&self) -> TimerId {
        self.id
    }

    pub fn tag(&self) -> TimerTag {
        TimerTag {
            id: self.id,
            epoch: self.epoch,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Register this timer with the driver.
    pub fn create(&self) -> Effect {
        Effect::Create {
            id: self.id,
            interval: self.interval,
            one_shot: self.one_shot,
        }
    }

    pub fn start(&mut self) -> Option<Effect> {
        (!self.running).then(|| self.toggle())
    }

    pub fn stop(&mut self) -> Option<Effect> {
        self.running.then(|| self.toggle())
    }

    /// Start if stopped, stop if running.
    pub fn toggle(&mut self) -> Effect {
        self.epoch = self.epoch.wrapping_add(1);
        self.running = !self.running;
        if self.running {
            Effect::Start(self.tag())
        } else {
            Effect::Stop(self.id)
        }
    }

    /// Restart the countdown from zero. Ticks of the previous run go stale.
    pub fn reset(&mut self) -> Effect {
        self.epoch = self.epoch.wrapping_add(1);
        Effect::Reset(self.tag())
    }

    /// Change the interval without touching the countdown already in progress.
    pub fn set_interval(&mut self, interval: Duration) -> Option<Effect> {
        if interval == self.interval {
            return None;
        }
        self.interval = interval;
        Some(Effect::SetInterval {
            id: self.id,
            interval,
        })
    }

    /// Whether `tag` was produced by the current run of this timer.
    pub fn owns(&self, tag: TimerTag) -> bool {
        self.running && tag == self.tag()
    }
}

/// The session clock, the fall clock, and the lazily created end-delay clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerSet {
    pub session: TimerHandle,
    pub fall: TimerHandle,
    end_delay: Option<TimerHandle>,
}

impl TimerSet {
    pub fn new(session_interval: Duration, fall_interval: Duration) -> Self {
        Self {
            session: TimerHandle::new(session_interval),
            fall: TimerHandle::new(fall_interval),
            end_delay: None,
        }
    }

    pub fn end_delay(&self) -> Option<&TimerHandle> {
        self.end_delay.as_ref()
    }

    /// Create the end-delay timer. Returns `None` if one already exists; a
    /// session only ever gets one.
    pub fn create_end_delay(&mut self, interval: Duration) -> Option<&mut TimerHandle> {
        if self.end_delay.is_some() {
            return None;
        }
        Some(self.end_delay.insert(TimerHandle::one_shot(interval)))
    }

    /// Which live timer produced `tag`, if any.
    pub fn classify(&self, tag: TimerTag) -> Option<TimerKind> {
        if self.session.owns(tag) {
            Some(TimerKind::Session)
        } else if self.fall.owns(tag) {
            Some(TimerKind::Fall)
        } else if self.end_delay.as_ref().is_some_and(|t| t.owns(tag)) {
            Some(TimerKind::EndDelay)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn ids_are_unique() {
        let a = TimerHandle::new(ms(10));
        let b = TimerHandle::new(ms(10));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn start_and_stop_are_idempotent() {
        let mut t = TimerHandle::new(ms(10));
        assert!(t.stop().is_none());
        assert_eq!(t.start(), Some(Effect::Start(t.tag())));
        assert!(t.start().is_none());
        assert_eq!(t.stop(), Some(Effect::Stop(t.id())));
        assert!(!t.is_running());
    }

    #[test]
    fn toggle_flips_running() {
        let mut t = TimerHandle::new(ms(10));
        t.toggle();
        assert!(t.is_running());
        t.toggle();
        assert!(!t.is_running());
    }

    #[test]
    fn old_runs_go_stale() {
        let mut t = TimerHandle::new(ms(10));
        t.start();
        let first = t.tag();
        assert!(t.owns(first));

        t.reset();
        assert!(!t.owns(first));
        let second = t.tag();
        assert!(t.owns(second));

        t.stop();
        assert!(!t.owns(second));
        t.start();
        assert!(!t.owns(second));
        assert!(t.owns(t.tag()));
    }

    #[test]
    fn set_interval_only_reports_changes() {
        let mut t = TimerHandle::new(ms(100));
        assert!(t.set_interval(ms(100)).is_none());
        assert_eq!(
            t.set_interval(ms(50)),
            Some(Effect::SetInterval {
                id: t.id(),
                interval: ms(50)
            })
        );
        assert_eq!(t.interval(), ms(50));
    }

    #[test]
    fn end_delay_is_created_once() {
        let mut set = TimerSet::new(ms(10), ms(1000));
        assert!(set.end_delay().is_none());
        assert!(set.create_end_delay(ms(5000)).is_some());
        assert!(set.create_end_delay(ms(5000)).is_none());
        assert_eq!(set.end_delay().map(TimerHandle::interval), Some(ms(5000)));
    }

    #[test]
    fn classify_matches_only_live_handles() {
        let mut set = TimerSet::new(ms(10), ms(1000));
        set.session.start();
        set.fall.start();
        assert_eq!(set.classify(set.session.tag()), Some(TimerKind::Session));
        assert_eq!(set.classify(set.fall.tag()), Some(TimerKind::Fall));

        let foreign = TimerHandle::new(ms(10));
        assert_eq!(set.classify(foreign.tag()), None);

        if let Some(delay) = set.create_end_delay(ms(5000)) {
            delay.start();
        }
        let delay_tag = set.end_delay().map(TimerHandle::tag);
        assert_eq!(delay_tag.and_then(|t| set.classify(t)), Some(TimerKind::EndDelay));
    }
}
