use std::time::Duration;

use tui_marathon::leaderboard::{Leaderboard, NewEntry, SqliteLeaderboard};
use tui_marathon::types::GameMode;

fn entry(name: &str, score: u32, ms: u64) -> NewEntry {
    NewEntry {
        name: name.to_string(),
        time: Duration::from_millis(ms),
        score,
        lines: 10,
        level: 2,
        mode: GameMode::Marathon,
    }
}

#[test]
fn standings_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("board.db");

    {
        let mut lb = SqliteLeaderboard::open(&path).unwrap();
        lb.save(&entry("ada", 1200, 90_000)).unwrap();
        lb.save(&entry("", 800, 45_000)).unwrap();
    }

    let mut lb = SqliteLeaderboard::open(&path).unwrap();
    let saved = lb.save(&entry("grace", 1000, 60_000)).unwrap();
    assert_eq!(saved.rank, 2);

    let all = lb.all(GameMode::Marathon).unwrap();
    let rows: Vec<_> = all.iter().map(|s| (s.rank, s.name.as_str(), s.score)).collect();
    assert_eq!(
        rows,
        vec![(1, "ada", 1200), (2, "grace", 1000), (3, "Anonymous", 800)]
    );
    assert_eq!(all[1].id, saved.id);
    assert_eq!(all[0].time(), Duration::from_secs(90));
}

#[test]
fn ties_on_score_go_to_the_faster_run() {
    let mut lb = SqliteLeaderboard::open_in_memory().unwrap();
    lb.save(&entry("slow", 500, 80_000)).unwrap();
    let fast = lb.save(&entry("fast", 500, 20_000)).unwrap();
    assert_eq!(fast.rank, 1);
    assert_eq!(lb.all(GameMode::Marathon).unwrap()[0].name, "fast");
}

#[test]
fn names_are_trimmed() {
    let mut lb = SqliteLeaderboard::open_in_memory().unwrap();
    lb.save(&entry("  bo  ", 1, 1)).unwrap();
    assert_eq!(lb.all(GameMode::Marathon).unwrap()[0].name, "bo");
}
