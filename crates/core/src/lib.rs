//! Session controller for a timed marathon run.
//!
//! This crate decides *when* things happen; the engine decides *what* happens.
//! It owns no threads and never sleeps. Every input is a [`SessionEvent`],
//! every output is an ordered list of [`Effect`]s, and the runtime applies those
//! effects to a [`TimerDriver`] and feeds the resulting ticks back in.
//!
//! # Module Structure
//!
//! - [`session`]: the four-state lifecycle machine
//! - [`timer`]: timer identities, tags and the session's timer set
//! - [`effect`]: events in, effects out
//! - [`driver`]: deadline bookkeeping for the runtime loop
//! - [`config`]: timing and hand-off configuration
//! - [`error`]: session failures
//!
//! # Example
//!
//! ```
//! use std::time::{Duration, Instant};
//!
//! use tui_marathon_core::engine::testing::ScriptedEngine;
//! use tui_marathon_core::{Session, SessionConfig, SessionState, TimerDriver};
//!
//! let t0 = Instant::now();
//! let (mut session, effects) = Session::start(ScriptedEngine::new(), SessionConfig::default());
//! let mut driver = TimerDriver::new();
//! driver.apply_all(&effects, t0);
//!
//! let mut ticks = Vec::new();
//! driver.poll_due(t0 + Duration::from_millis(10), &mut ticks);
//! for tick in ticks {
//!     let effects = session.handle(tick.into()).unwrap();
//!     driver.apply_all(&effects, t0);
//! }
//! assert_eq!(session.elapsed(), Duration::from_millis(10));
//! assert_eq!(session.state(), SessionState::Running);
//! ```

pub mod config;
pub mod driver;
pub mod effect;
pub mod error;
pub mod session;
pub mod timer;

pub use tui_marathon_engine as engine;
pub use tui_marathon_types as types;

pub use config::{Handoff, SessionConfig};
pub use driver::TimerDriver;
pub use effect::{Effect, Effects, SessionEvent, TimerTick, MAX_EFFECTS};
pub use error::SessionError;
pub use session::{RunOutcome, Session, SessionState};
pub use timer::{TimerHandle, TimerId, TimerKind, TimerSet, TimerTag};
