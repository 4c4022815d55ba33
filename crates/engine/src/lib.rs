//! Engine adapter - the narrow boundary between the session controller and the
//! puzzle mechanics.
//!
//! The controller never looks inside an engine. It only issues the commands and
//! queries of [`Engine`], and the projector only reads through [`Playfield`].
//! Anything that implements both can drive a session: the bundled
//! [`MarathonEngine`] for real play, or [`testing::ScriptedEngine`] for tests.
//!
//! # Error contract
//!
//! A blocked move or rotation is *not* an error: the piece simply stays put and
//! the call returns `Ok`. Errors are reserved for calls that make no sense in the
//! engine's current state (e.g. moving after game over). The controller treats
//! every [`EngineError`] as fatal, because it means its own input filtering let
//! something through that it should not have.
//!
//! # Example
//!
//! ```
//! use tui_marathon_engine::{Engine, MarathonEngine};
//!
//! let mut engine = MarathonEngine::new(1, 15, 42).unwrap();
//! engine.move_left().unwrap();
//! engine.rotate(true).unwrap();
//! let rows = engine.hard_drop().unwrap();
//! assert!(engine.stats().score >= rows * 2);
//! ```

pub mod bag;
pub mod board;
pub mod marathon;
pub mod pieces;
pub mod testing;

use std::time::Duration;

use derive_more::{Display, Error};

pub use tui_marathon_types as types;

use crate::types::{CellKind, PieceKind, RunStats};

pub use bag::Bag;
pub use board::Board;
pub use marathon::MarathonEngine;
pub use pieces::{kicks, shape, PieceShape};

/// Engine-contract violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum EngineError {
    /// The operation was issued after the game ended.
    #[display("cannot {op}: the game is over")]
    GameOver { op: &'static str },
    /// The operation needs a falling piece and there is none.
    #[display("cannot {op}: no active piece")]
    NoActivePiece { op: &'static str },
    /// The requested start level is not playable.
    #[display("start level {level} is outside 1..={max_level}")]
    InvalidLevel { level: u32, max_level: u32 },
}

/// Commands and queries the session controller issues to the puzzle engine.
pub trait Engine {
    fn move_left(&mut self) -> Result<(), EngineError>;

    fn move_right(&mut self) -> Result<(), EngineError>;

    fn rotate(&mut self, clockwise: bool) -> Result<(), EngineError>;

    /// Drop the active piece to its lowest legal position and lock it.
    ///
    /// Returns the number of rows the piece fell.
    fn hard_drop(&mut self) -> Result<u32, EngineError>;

    /// Flip soft drop on or off and return the fall interval now in effect.
    ///
    /// When turning soft drop off the returned interval is the ambient gravity
    /// for the *current* level, not the one in effect when soft drop started.
    fn toggle_soft_drop(&mut self) -> Duration;

    fn hold(&mut self) -> Result<(), EngineError>;

    /// Advance gravity by one row. Returns `true` when the active piece locked.
    fn tick_lower(&mut self) -> Result<bool, EngineError>;

    fn is_game_over(&self) -> bool;

    /// Fall interval for the current level with soft drop released.
    fn gravity_interval(&self) -> Duration;

    /// Fall interval for the current level with soft drop held.
    fn soft_drop_interval(&self) -> Duration;

    fn stats(&self) -> RunStats;
}

/// Read-only view of the playing field, used for rendering.
pub trait Playfield {
    /// Cell at `(x, y)` in the visible matrix, including the active piece and
    /// its ghost.
    fn cell(&self, x: u8, y: u8) -> CellKind;

    fn hold_piece(&self) -> Option<PieceKind>;

    fn next_pieces(&self) -> &[PieceKind];
}
