//! Terminal presentation for a marathon session.
//!
//! A small, game-oriented rendering layer: [`SessionView`] projects a session
//! into a [`FrameBuffer`] without any I/O, and [`TerminalRenderer`] flushes
//! framebuffers to the terminal with crossterm, diffing against the previous
//! frame.

pub mod fb;
pub mod renderer;
pub mod view;

pub use tui_marathon_core as core;
pub use tui_marathon_engine as engine;
pub use tui_marathon_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use renderer::{encode_frame, TerminalRenderer};
pub use view::{format_elapsed, SessionView, Viewport};
