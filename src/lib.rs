//! TUI Marathon (workspace facade crate).
//!
//! Re-exports the workspace crates under one roof and hosts the results screen
//! the binary prints after a finished run.

pub mod results;

pub use tui_marathon_core as core;
pub use tui_marathon_engine as engine;
pub use tui_marathon_input as input;
pub use tui_marathon_leaderboard as leaderboard;
pub use tui_marathon_term as term;
pub use tui_marathon_types as types;
