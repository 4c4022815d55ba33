//! Leaderboard error types.

use derive_more::{Display, Error, From};

#[derive(Debug, Display, Error, From)]
pub enum LeaderboardError {
    #[display("leaderboard database: {_0}")]
    Sqlite(rusqlite::Error),
    #[display("leaderboard directory: {_0}")]
    Io(std::io::Error),
}
