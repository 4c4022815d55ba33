//! Terminal marathon runner.
//!
//! Owns the event loop: crossterm input and resize events plus due timer ticks
//! are fed to the session one at a time, the returned effects are applied to
//! the timer driver, and the session is rendered once the batch has settled.

mod cli;

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use tui_marathon::core::{Effect, RunOutcome, Session, SessionConfig, SessionEvent, TimerDriver};
use tui_marathon::engine::MarathonEngine;
use tui_marathon::input::KeyMapper;
use tui_marathon::leaderboard::{Leaderboard, SqliteLeaderboard};
use tui_marathon::results;
use tui_marathon::term::{FrameBuffer, SessionView, TerminalRenderer, Viewport};
use tui_marathon::types::Screen;

use crate::cli::Cli;

// Upper bound on a poll while no timer is armed (paused).
const IDLE_POLL: Duration = Duration::from_millis(250);

/// How the event loop ended.
enum Ending {
    Results(RunOutcome),
    Menu,
    Exit,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let seed = cli.seed.unwrap_or_else(clock_seed);
    let engine = MarathonEngine::new(cli.level, cli.max_level, seed)
        .context("invalid starting level")?;
    let config = cli.session_config();
    info!(seed, level = cli.level, max_level = cli.max_level, "starting marathon");

    let mut term = TerminalRenderer::new();
    let reports_release = term.enter()?;

    let result = run(&mut term, engine, config, reports_release);

    // Always try to restore terminal state.
    let _ = term.exit();

    match result {
        Ok(Ending::Results(outcome)) => show_results(&cli, &outcome),
        Ok(Ending::Menu) => {
            info!("menu requested; exiting");
            Ok(())
        }
        Ok(Ending::Exit) => Ok(()),
        Err(e) => {
            error!(error = %e, "session failed");
            Err(e)
        }
    }
}

fn run(
    term: &mut TerminalRenderer,
    engine: MarathonEngine,
    config: SessionConfig,
    reports_release: bool,
) -> Result<Ending> {
    let (mut session, effects) = Session::start(engine, config);
    let mut driver = TimerDriver::new();
    driver.apply_all(&effects, Instant::now());

    let mut mapper = KeyMapper::new(reports_release);
    let view = SessionView::default();

    let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
    let fallback = Viewport::new(w, h);
    session.handle(SessionEvent::Resize {
        width: w,
        height: h,
    })?;

    let mut fb = FrameBuffer::new(w, h);
    let mut ticks = Vec::new();
    let mut batch: Vec<SessionEvent> = Vec::new();

    loop {
        view.render_into(&session, Viewport::of(&session, fallback), &mut fb);
        term.draw_swap(&mut fb)?;

        // Wait for input until the next timer (or synthetic release) is due.
        let now = Instant::now();
        let timeout = [driver.next_deadline(), mapper.release_deadline()]
            .into_iter()
            .flatten()
            .min()
            .map(|deadline| deadline.saturating_duration_since(now))
            .unwrap_or(IDLE_POLL);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if let Some(input) = mapper.map(key, Instant::now()) {
                        batch.push(input.into());
                    }
                }
                Event::Resize(width, height) => {
                    term.invalidate();
                    batch.push(SessionEvent::Resize { width, height });
                }
                _ => {}
            }
        }

        let now = Instant::now();
        if let Some(release) = mapper.poll_release(now) {
            batch.push(release.into());
        }
        driver.poll_due(now, &mut ticks);
        batch.extend(ticks.drain(..).map(SessionEvent::from));

        for event in batch.drain(..) {
            let effects = session.handle(event)?;
            driver.apply_all(&effects, now);

            if let Some(handoff) = effects.iter().find(|e| e.is_handoff()) {
                return Ok(match handoff {
                    Effect::RequestModeSwitch(Screen::Results) => {
                        Ending::Results(session.outcome())
                    }
                    Effect::RequestModeSwitch(Screen::Menu) => Ending::Menu,
                    _ => Ending::Exit,
                });
            }
        }
    }
}

fn show_results(cli: &Cli, outcome: &RunOutcome) -> Result<()> {
    let mut board = match cli.db.clone().or_else(SqliteLeaderboard::default_path) {
        Some(path) => SqliteLeaderboard::open(&path)
            .with_context(|| format!("opening leaderboard {}", path.display()))?,
        None => {
            warn!("no leaderboard location; standings will not persist");
            SqliteLeaderboard::open_in_memory()?
        }
    };

    let saved = board.save(&results::entry_for(outcome, &cli.name))?;
    let scores = board.all(outcome.mode)?;
    info!(id = saved.id, rank = saved.rank, "run recorded");

    let mut out = io::stdout().lock();
    if cli.json {
        results::write_json(&mut out, &scores, Some(saved))?;
    } else {
        results::write_table(&mut out, &scores, Some(saved))?;
    }
    Ok(())
}

fn init_logging(path: Option<&Path>) -> Result<()> {
    // The terminal is in raw mode on the alternate screen; logs only go to a
    // file, and only when one is configured.
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("MARATHON_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ (d.as_secs() as u32))
        .unwrap_or(0x5eed)
}
