//! SQLite-backed leaderboard.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use rusqlite::{params, Connection};
use tracing::{debug, info};

use crate::types::GameMode;
use crate::{Leaderboard, LeaderboardError, NewEntry, SavedEntry, Score};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS scores (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    time_ms INTEGER NOT NULL,
    score INTEGER NOT NULL,
    lines INTEGER NOT NULL,
    level INTEGER NOT NULL,
    mode TEXT NOT NULL,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
);
CREATE INDEX IF NOT EXISTS idx_scores_mode ON scores(mode);
"#;

#[derive(Debug)]
pub struct SqliteLeaderboard {
    conn: Connection,
}

impl SqliteLeaderboard {
    /// Open (or create) the database at `path`, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LeaderboardError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        info!(path = %path.display(), "leaderboard opened");
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, LeaderboardError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// `$HOME/.local/state/tui-marathon/leaderboard.db`, or the platform data
    /// directory when `HOME` is unset.
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("tui-marathon");
            Some(state_dir.join("leaderboard.db"))
        } else {
            ProjectDirs::from("", "", "tui-marathon")
                .map(|dirs| dirs.data_local_dir().join("leaderboard.db"))
        }
    }
}

impl Leaderboard for SqliteLeaderboard {
    fn save(&mut self, entry: &NewEntry) -> Result<SavedEntry, LeaderboardError> {
        let time_ms = i64::try_from(entry.time.as_millis()).unwrap_or(i64::MAX);
        let mode = entry.mode.as_str();

        let tx = self.conn.transaction()?;
        tx.execute(
            r#"
            INSERT INTO scores (name, time_ms, score, lines, level, mode)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                entry.display_name(),
                time_ms,
                entry.score,
                entry.lines,
                entry.level,
                mode
            ],
        )?;
        let id = tx.last_insert_rowid();

        let ahead: u32 = tx.query_row(
            r#"
            SELECT COUNT(*) FROM scores
            WHERE mode = ?1
              AND (score > ?2
                   OR (score = ?2 AND time_ms < ?3)
                   OR (score = ?2 AND time_ms = ?3 AND id < ?4))
            "#,
            params![mode, entry.score, time_ms, id],
            |row| row.get(0),
        )?;
        tx.commit()?;

        let saved = SavedEntry {
            id,
            rank: ahead + 1,
        };
        debug!(id, rank = saved.rank, score = entry.score, "score saved");
        Ok(saved)
    }

    fn all(&self, mode: GameMode) -> Result<Vec<Score>, LeaderboardError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, name, time_ms, score, lines, level
            FROM scores
            WHERE mode = ?1
            ORDER BY score DESC, time_ms ASC, id ASC
            "#,
        )?;

        let rows = stmt.query_map(params![mode.as_str()], |row| {
            let time_ms: i64 = row.get(2)?;
            Ok(Score {
                rank: 0,
                id: row.get(0)?,
                name: row.get(1)?,
                time_ms: u64::try_from(time_ms).unwrap_or(0),
                score: row.get(3)?,
                lines: row.get(4)?,
                level: row.get(5)?,
                mode,
            })
        })?;

        let mut scores = Vec::new();
        for (i, row) in rows.enumerate() {
            let mut score = row?;
            score.rank = u32::try_from(i + 1).unwrap_or(u32::MAX);
            scores.push(score);
        }
        Ok(scores)
    }
}
