use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tui_marathon::core::{Session, SessionConfig, SessionEvent, TimerTick};
use tui_marathon::engine::board::Board;
use tui_marathon::engine::testing::ScriptedEngine;
use tui_marathon::engine::{Engine, MarathonEngine};
use tui_marathon::types::{InputAction, KeyInput, PieceKind};

fn bench_session_tick(c: &mut Criterion) {
    let (mut session, _) = Session::start(ScriptedEngine::new(), SessionConfig::default());
    let tag = session.timers().session.tag();

    c.bench_function("session_clock_tick", |b| {
        b.iter(|| {
            let _ = session.handle(black_box(SessionEvent::Tick(TimerTick { tag })));
        })
    });
}

fn bench_stale_tick(c: &mut Criterion) {
    let (mut session, _) = Session::start(ScriptedEngine::new(), SessionConfig::default());
    let stale = session.timers().fall.tag();
    let _ = session.handle(KeyInput::press(InputAction::HardDrop).into());

    c.bench_function("stale_tick_dropped", |b| {
        b.iter(|| {
            let _ = session.handle(black_box(SessionEvent::Tick(TimerTick { tag: stale })));
        })
    });
}

fn bench_movement(c: &mut Criterion) {
    let engine = MarathonEngine::new(1, 0, 12345).unwrap();
    let (mut session, _) = Session::start(engine, SessionConfig::default());

    c.bench_function("move_left_right", |b| {
        b.iter(|| {
            let _ = session.handle(KeyInput::press(InputAction::Left).into());
            let _ = session.handle(KeyInput::press(InputAction::Right).into());
        })
    });
}

fn bench_engine_tick(c: &mut Criterion) {
    c.bench_function("engine_fall_to_lock", |b| {
        b.iter(|| {
            let mut engine = MarathonEngine::new(1, 0, 12345).unwrap();
            while !engine.tick_lower().unwrap() {}
            black_box(engine.stats())
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    c.bench_function("clear_4_lines", |b| {
        b.iter(|| {
            let mut board = Board::new();
            for y in 16..20 {
                for x in 0..10 {
                    board.set(x, y, Some(PieceKind::I));
                }
            }
            board.clear_full_rows()
        })
    });
}

criterion_group!(
    benches,
    bench_session_tick,
    bench_stale_tick,
    bench_movement,
    bench_engine_tick,
    bench_line_clear
);
criterion_main!(benches);
