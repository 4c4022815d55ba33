//! Lifecycle scenarios for the session controller, driven through the
//! scripted engine.

use std::time::Duration;

use tui_marathon::core::{
    Effect, Handoff, Session, SessionConfig, SessionEvent, SessionState, TimerTag, TimerTick,
};
use tui_marathon::engine::testing::ScriptedEngine;
use tui_marathon::engine::Engine;
use tui_marathon::types::{InputAction, KeyInput, Screen};

fn press(action: InputAction) -> SessionEvent {
    SessionEvent::Key(KeyInput::press(action))
}

fn release(action: InputAction) -> SessionEvent {
    SessionEvent::Key(KeyInput::release(action))
}

fn tick(tag: TimerTag) -> SessionEvent {
    SessionEvent::Tick(TimerTick { tag })
}

fn start() -> Session<ScriptedEngine> {
    Session::start(ScriptedEngine::new(), SessionConfig::default()).0
}

/// A session whose first fall tick locks and tops out.
fn doomed(config: SessionConfig) -> Session<ScriptedEngine> {
    let mut engine = ScriptedEngine::new();
    engine.lock_on_next_tick = true;
    engine.game_over_on_lock = true;
    Session::start(engine, config).0
}

fn fall_tick(s: &mut Session<ScriptedEngine>) -> Vec<Effect> {
    let tag = s.timers().fall.tag();
    s.handle(tick(tag)).unwrap().into_iter().collect()
}

#[test]
fn scenario_a_pause_stops_and_resume_restarts_both_clocks() {
    let mut s = start();

    let fx = s.handle(press(InputAction::Pause)).unwrap();
    assert_eq!(s.state(), SessionState::Paused);
    assert!(!s.timers().session.is_running());
    assert!(!s.timers().fall.is_running());
    assert_eq!(
        fx.as_slice(),
        &[
            Effect::Stop(s.timers().session.id()),
            Effect::Stop(s.timers().fall.id())
        ]
    );

    let fx = s.handle(press(InputAction::Pause)).unwrap();
    assert_eq!(s.state(), SessionState::Running);
    assert!(s.timers().session.is_running());
    assert!(s.timers().fall.is_running());
    assert_eq!(
        fx.as_slice(),
        &[
            Effect::Start(s.timers().session.tag()),
            Effect::Start(s.timers().fall.tag())
        ]
    );
}

#[test]
fn scenario_b_lock_with_game_over_enters_finished() {
    let mut s = doomed(SessionConfig::default());
    let fx = fall_tick(&mut s);

    assert_eq!(s.state(), SessionState::Finished);
    assert!(!s.timers().session.is_running());
    assert!(!s.timers().fall.is_running());

    let delay = s.timers().end_delay().expect("end delay created");
    assert!(delay.is_running());
    assert_eq!(delay.interval(), Duration::from_secs(5));
    assert_eq!(s.pending_termination(), Some(delay.tag()));

    assert_eq!(
        fx,
        vec![
            Effect::Stop(s.timers().session.id()),
            Effect::Stop(s.timers().fall.id()),
            Effect::Create {
                id: delay.id(),
                interval: Duration::from_secs(5),
                one_shot: true,
            },
            Effect::Start(delay.tag()),
        ]
    );
}

#[test]
fn scenario_c_foreign_ticks_do_not_end_finished() {
    let mut s = doomed(SessionConfig::default());
    let session_tag = s.timers().session.tag();
    let fall_tag = s.timers().fall.tag();
    fall_tick(&mut s);

    let others = [
        session_tag,
        fall_tag,
        s.timers().session.tag(),
        s.timers().fall.tag(),
    ];
    for tag in others {
        assert!(s.handle(tick(tag)).unwrap().is_empty());
        assert_eq!(s.state(), SessionState::Finished);
    }

    // An older run of the end-delay timer is foreign too.
    let live = s.pending_termination().unwrap();
    let stale = TimerTag {
        id: live.id,
        epoch: live.epoch.wrapping_sub(1),
    };
    s.handle(tick(stale)).unwrap();
    assert_eq!(s.state(), SessionState::Finished);
}

#[test]
fn scenario_d_end_delay_tick_terminates_once() {
    let mut s = doomed(SessionConfig::default());
    fall_tick(&mut s);
    let pending = s.pending_termination().unwrap();

    let fx = s.handle(tick(pending)).unwrap();
    assert_eq!(s.state(), SessionState::Terminated);
    assert_eq!(fx.as_slice(), &[Effect::RequestModeSwitch(Screen::Results)]);

    // Redelivery is absorbed.
    assert!(s.handle(tick(pending)).unwrap().is_empty());
    assert_eq!(s.pending_termination(), None);
}

#[test]
fn scenario_e_movement_forwarded_only_while_running() {
    let mut s = start();
    s.handle(press(InputAction::Left)).unwrap();
    assert_eq!(s.engine().calls.move_left, 1);

    s.handle(press(InputAction::Pause)).unwrap();
    s.handle(press(InputAction::Left)).unwrap();
    s.handle(press(InputAction::Right)).unwrap();
    s.handle(press(InputAction::HardDrop)).unwrap();
    assert_eq!(s.engine().calls.move_left, 1);
    assert_eq!(s.engine().calls.gameplay_total(), 1);
}

#[test]
fn gameplay_keys_are_not_forwarded_after_game_over() {
    let mut s = doomed(SessionConfig::default());
    fall_tick(&mut s);
    let before = s.engine().calls;
    for action in [
        InputAction::Left,
        InputAction::Right,
        InputAction::RotateCw,
        InputAction::RotateCcw,
        InputAction::HardDrop,
        InputAction::SoftDrop,
        InputAction::Hold,
    ] {
        s.handle(press(action)).unwrap();
    }
    assert_eq!(s.engine().calls, before);
}

#[test]
fn quit_exits_from_every_live_state() {
    let mut running = start();
    let mut paused = start();
    paused.handle(press(InputAction::Pause)).unwrap();
    let mut finished = doomed(SessionConfig::default());
    fall_tick(&mut finished);

    for s in [&mut running, &mut paused, &mut finished] {
        let fx = s.handle(press(InputAction::Quit)).unwrap();
        assert_eq!(fx.as_slice(), &[Effect::RequestExit]);
        assert_eq!(s.state(), SessionState::Terminated);
    }
}

#[test]
fn quit_release_is_ignored() {
    let mut s = start();
    assert!(s.handle(release(InputAction::Quit)).unwrap().is_empty());
    assert_eq!(s.state(), SessionState::Running);
}

#[test]
fn menu_handoff_switches_to_menu() {
    let mut s = doomed(SessionConfig::default().with_handoff(Handoff::Menu));
    fall_tick(&mut s);
    let fx = s.handle(tick(s.pending_termination().unwrap())).unwrap();
    assert_eq!(fx.as_slice(), &[Effect::RequestModeSwitch(Screen::Menu)]);
}

#[test]
fn stale_ticks_never_change_state() {
    let mut s = start();
    let old_fall = s.timers().fall.tag();
    let old_session = s.timers().session.tag();

    // Pause and resume: both clocks get new runs.
    s.handle(press(InputAction::Pause)).unwrap();
    s.handle(press(InputAction::Pause)).unwrap();

    let elapsed = s.elapsed();
    let calls = s.engine().calls;
    assert!(s.handle(tick(old_fall)).unwrap().is_empty());
    assert!(s.handle(tick(old_session)).unwrap().is_empty());
    assert_eq!(s.elapsed(), elapsed);
    assert_eq!(s.engine().calls, calls);
    assert_eq!(s.state(), SessionState::Running);
}

#[test]
fn ticks_while_paused_are_ignored() {
    let mut s = start();
    let fall = s.timers().fall.tag();
    let session = s.timers().session.tag();
    s.handle(press(InputAction::Pause)).unwrap();

    s.handle(tick(fall)).unwrap();
    s.handle(tick(session)).unwrap();
    assert_eq!(s.engine().calls.tick_lower, 0);
    assert_eq!(s.elapsed(), Duration::ZERO);
    assert_eq!(s.state(), SessionState::Paused);
}

#[test]
fn soft_drop_release_restores_gravity_in_effect_at_release() {
    let mut engine = ScriptedEngine::new();
    engine.lock_on_next_tick = true;
    engine.level_on_lock = Some(4);
    let (mut s, _) = Session::start(engine, SessionConfig::default());

    s.handle(press(InputAction::SoftDrop)).unwrap();
    assert_eq!(s.timers().fall.interval(), Duration::from_millis(100));

    // Level 4 is reached mid-hold; soft drop stays authoritative.
    fall_tick(&mut s);
    assert_eq!(s.engine().stats().level, 4);
    assert_eq!(s.timers().fall.interval(), Duration::from_millis(50));

    s.handle(release(InputAction::SoftDrop)).unwrap();
    assert_eq!(s.timers().fall.interval(), Duration::from_millis(500));
}

#[test]
fn pause_twice_restores_clock_running_state() {
    let mut s = start();
    let before = (
        s.timers().session.is_running(),
        s.timers().fall.is_running(),
    );
    s.handle(press(InputAction::Pause)).unwrap();
    s.handle(press(InputAction::Pause)).unwrap();
    assert_eq!(s.state(), SessionState::Running);
    assert_eq!(
        (
            s.timers().session.is_running(),
            s.timers().fall.is_running()
        ),
        before
    );
}

#[test]
fn random_event_sequences_keep_a_defined_state() {
    let actions = [
        InputAction::Quit,
        InputAction::Pause,
        InputAction::Help,
        InputAction::Left,
        InputAction::Right,
        InputAction::RotateCw,
        InputAction::RotateCcw,
        InputAction::HardDrop,
        InputAction::SoftDrop,
        InputAction::Hold,
    ];

    for seed in 1..64u64 {
        let mut rng = seed;
        let mut next = move || {
            rng = rng
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (rng >> 33) as usize
        };

        let mut engine = ScriptedEngine::new();
        engine.always_lock = true;
        engine.game_over_on_lock = next() % 4 == 0;
        let (mut s, _) = Session::start(engine, SessionConfig::default());
        let mut end_delay_id = None;

        for _ in 0..300 {
            let before = s.state();
            let event = match next() % 7 {
                0 | 1 => {
                    // Quit is rare so that most runs get somewhere.
                    let action = actions[1 + next() % (actions.len() - 1)];
                    if next() % 3 == 0 {
                        release(action)
                    } else {
                        press(action)
                    }
                }
                2 => tick(s.timers().fall.tag()),
                3 => tick(s.timers().session.tag()),
                4 => match s.timers().end_delay() {
                    Some(t) => tick(t.tag()),
                    None => SessionEvent::Resize {
                        width: 80,
                        height: 24,
                    },
                },
                5 if next() % 20 == 0 => press(InputAction::Quit),
                _ => SessionEvent::SwitchMode(Screen::Results),
            };

            let fx = s.handle(event).unwrap();
            if before == SessionState::Terminated {
                assert!(fx.is_empty());
                assert_eq!(s.state(), SessionState::Terminated);
            }
            if let Some(t) = s.timers().end_delay() {
                let id = *end_delay_id.get_or_insert(t.id());
                assert_eq!(id, t.id(), "a session creates one end-delay timer");
            }
            assert!(fx.iter().filter(|e| e.is_handoff()).count() <= 1);
            assert!(fx.len() <= tui_marathon::core::MAX_EFFECTS);
        }
    }
}
