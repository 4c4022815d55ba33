//! Leaderboard collaborator.
//!
//! A finished session hands its result to a [`Leaderboard`], which persists it
//! and returns the ranked standings for the run's game mode. The bundled store
//! is [`SqliteLeaderboard`].
//!
//! Marathon standings rank by score (highest first), then by time (fastest
//! first), then by insertion order.

mod error;
mod sqlite;

use std::time::Duration;

use serde::Serialize;

pub use error::LeaderboardError;
pub use sqlite::SqliteLeaderboard;
pub use tui_marathon_types as types;

use crate::types::GameMode;

/// Name stored for entries submitted without one.
pub const ANONYMOUS: &str = "Anonymous";

/// A result to be recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub name: String,
    pub time: Duration,
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub mode: GameMode,
}

impl NewEntry {
    /// The name to persist: trimmed, or [`ANONYMOUS`] when blank.
    pub fn display_name(&self) -> &str {
        match self.name.trim() {
            "" => ANONYMOUS,
            name => name,
        }
    }
}

/// Where a saved entry landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedEntry {
    pub id: i64,
    /// 1-based position in the mode's standings.
    pub rank: u32,
}

/// One row of the standings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Score {
    pub rank: u32,
    pub id: i64,
    pub name: String,
    pub time_ms: u64,
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub mode: GameMode,
}

impl Score {
    pub fn time(&self) -> Duration {
        Duration::from_millis(self.time_ms)
    }
}

pub trait Leaderboard {
    /// Persist `entry` and report its id and rank.
    fn save(&mut self, entry: &NewEntry) -> Result<SavedEntry, LeaderboardError>;

    /// All entries for `mode`, best first.
    fn all(&self, mode: GameMode) -> Result<Vec<Score>, LeaderboardError>;
}
