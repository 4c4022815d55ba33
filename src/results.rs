//! Results screen: standings printed after a run hands off to the leaderboard.

use std::io::{self, Write};

use serde_json::json;

use crate::core::RunOutcome;
use crate::leaderboard::{NewEntry, SavedEntry, Score};
use crate::term::format_elapsed;

/// The leaderboard entry for a finished run.
pub fn entry_for(outcome: &RunOutcome, name: &str) -> NewEntry {
    NewEntry {
        name: name.to_string(),
        time: outcome.elapsed,
        score: outcome.stats.score,
        lines: outcome.stats.lines,
        level: outcome.stats.level,
        mode: outcome.mode,
    }
}

/// Plain-text standings with the new entry marked.
pub fn write_table(
    out: &mut impl Write,
    scores: &[Score],
    saved: Option<SavedEntry>,
) -> io::Result<()> {
    writeln!(
        out,
        "{:>4}  {:<16} {:>9} {:>9} {:>6} {:>6}",
        "Rank", "Name", "Time", "Score", "Lines", "Level"
    )?;
    for s in scores {
        let marker = match saved {
            Some(saved) if saved.id == s.id => " <",
            _ => "",
        };
        writeln!(
            out,
            "{:>4}  {:<16} {:>9} {:>9} {:>6} {:>6}{}",
            s.rank,
            truncate(&s.name, 16),
            format_elapsed(s.time()),
            s.score,
            s.lines,
            s.level,
            marker
        )?;
    }
    if let Some(saved) = saved {
        writeln!(out)?;
        writeln!(out, "You placed #{} of {}.", saved.rank, scores.len())?;
    }
    Ok(())
}

/// Standings as a JSON document.
pub fn write_json(
    out: &mut impl Write,
    scores: &[Score],
    saved: Option<SavedEntry>,
) -> io::Result<()> {
    let doc = json!({
        "saved": saved.map(|s| json!({ "id": s.id, "rank": s.rank })),
        "standings": scores,
    });
    serde_json::to_writer_pretty(&mut *out, &doc)?;
    writeln!(out)
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
