//! Session and timer driver wired together the way the binary runs them, with
//! a simulated clock.

use std::time::{Duration, Instant};

use tui_marathon::core::{Session, SessionConfig, SessionEvent, SessionState, TimerDriver};
use tui_marathon::engine::testing::ScriptedEngine;
use tui_marathon::types::{InputAction, KeyInput, Screen};

struct Harness {
    session: Session<ScriptedEngine>,
    driver: TimerDriver,
    now: Instant,
    handoffs: Vec<tui_marathon::core::Effect>,
}

impl Harness {
    fn new(engine: ScriptedEngine) -> Self {
        let now = Instant::now();
        let (session, effects) = Session::start(engine, SessionConfig::default());
        let mut driver = TimerDriver::new();
        driver.apply_all(&effects, now);
        Self {
            session,
            driver,
            now,
            handoffs: Vec::new(),
        }
    }

    fn send(&mut self, event: SessionEvent) {
        let effects = self.session.handle(event).unwrap();
        self.driver.apply_all(&effects, self.now);
        self.handoffs
            .extend(effects.iter().copied().filter(|e| e.is_handoff()));
    }

    /// Advance the clock in 1ms steps, delivering due ticks as they come.
    fn advance(&mut self, by: Duration) {
        let end = self.now + by;
        let mut ticks = Vec::new();
        while self.now < end {
            self.now += Duration::from_millis(1);
            self.driver.poll_due(self.now, &mut ticks);
            for tick in ticks.drain(..) {
                self.send(tick.into());
            }
        }
    }
}

#[test]
fn elapsed_tracks_running_time_only() {
    let mut h = Harness::new(ScriptedEngine::new());
    h.advance(Duration::from_millis(1_000));
    assert_eq!(h.session.elapsed(), Duration::from_millis(1_000));
    assert_eq!(h.session.engine().calls.tick_lower, 1);

    h.send(KeyInput::press(InputAction::Pause).into());
    h.advance(Duration::from_millis(3_000));
    assert_eq!(h.session.elapsed(), Duration::from_millis(1_000));
    assert_eq!(h.driver.next_deadline(), None);

    h.send(KeyInput::press(InputAction::Pause).into());
    h.advance(Duration::from_millis(500));
    assert_eq!(h.session.elapsed(), Duration::from_millis(1_500));
}

#[test]
fn soft_drop_speeds_up_gravity_without_resetting_it() {
    let mut h = Harness::new(ScriptedEngine::new());
    h.advance(Duration::from_millis(950));
    h.send(KeyInput::press(InputAction::SoftDrop).into());

    // The countdown origin is kept, so the shorter interval is already overdue.
    h.advance(Duration::from_millis(1));
    assert_eq!(h.session.engine().calls.tick_lower, 1);

    h.advance(Duration::from_millis(300));
    assert_eq!(h.session.engine().calls.tick_lower, 4);
}

#[test]
fn hard_drop_restarts_the_fall_countdown() {
    let mut h = Harness::new(ScriptedEngine::new());
    h.advance(Duration::from_millis(900));
    h.send(KeyInput::press(InputAction::HardDrop).into());

    h.advance(Duration::from_millis(999));
    assert_eq!(h.session.engine().calls.tick_lower, 0);
    h.advance(Duration::from_millis(1));
    assert_eq!(h.session.engine().calls.tick_lower, 1);
}

#[test]
fn tick_queued_before_hard_drop_is_dropped() {
    let mut h = Harness::new(ScriptedEngine::new());

    // The fall tick is due and collected, but a hard drop lands first.
    h.now += Duration::from_millis(1_000);
    let mut ticks = Vec::new();
    h.driver.poll_due(h.now, &mut ticks);
    assert!(!ticks.is_empty());

    h.send(KeyInput::press(InputAction::HardDrop).into());
    for tick in ticks {
        h.send(tick.into());
    }

    assert_eq!(h.session.engine().calls.tick_lower, 0);
    // The session clock tick from the same batch still counted.
    assert_eq!(h.session.elapsed(), Duration::from_millis(10));
}

#[test]
fn tick_queued_before_pause_is_dropped() {
    let mut h = Harness::new(ScriptedEngine::new());
    h.now += Duration::from_millis(1_000);
    let mut ticks = Vec::new();
    h.driver.poll_due(h.now, &mut ticks);

    h.send(KeyInput::press(InputAction::Pause).into());
    h.send(KeyInput::press(InputAction::Pause).into());
    for tick in ticks {
        h.send(tick.into());
    }
    assert_eq!(h.session.engine().calls.tick_lower, 0);
    assert_eq!(h.session.elapsed(), Duration::ZERO);
}

#[test]
fn game_over_hands_off_after_end_delay() {
    let mut engine = ScriptedEngine::new();
    engine.lock_on_next_tick = true;
    engine.game_over_on_lock = true;
    let mut h = Harness::new(engine);

    h.advance(Duration::from_millis(1_000));
    assert_eq!(h.session.state(), SessionState::Finished);
    let elapsed = h.session.elapsed();

    h.advance(Duration::from_millis(4_999));
    assert_eq!(h.session.state(), SessionState::Finished);
    assert!(h.handoffs.is_empty());
    assert_eq!(h.session.elapsed(), elapsed);

    h.advance(Duration::from_millis(1));
    assert_eq!(h.session.state(), SessionState::Terminated);
    assert_eq!(
        h.handoffs,
        vec![tui_marathon::core::Effect::RequestModeSwitch(Screen::Results)]
    );

    // One-shot: nothing else fires.
    h.advance(Duration::from_millis(10_000));
    assert_eq!(h.handoffs.len(), 1);
    assert_eq!(h.driver.next_deadline(), None);
}
