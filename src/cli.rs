//! Command-line interface for tui-marathon.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use tui_marathon::core::{Handoff, SessionConfig};

/// Terminal marathon: clear lines, level up, post your score.
#[derive(Parser, Debug)]
#[command(name = "tui-marathon")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Starting level (1-based)
    #[arg(short, long, default_value_t = 1)]
    pub level: u32,

    /// Last level of the marathon; clearing it ends the run. 0 plays forever.
    #[arg(long, default_value_t = 15)]
    pub max_level: u32,

    /// Seed for the piece randomizer (defaults to the clock)
    #[arg(long)]
    pub seed: Option<u32>,

    /// Name recorded on the leaderboard
    #[arg(short, long, default_value = "", env = "MARATHON_NAME")]
    pub name: String,

    /// Leaderboard database file
    #[arg(long, env = "MARATHON_DB")]
    pub db: Option<PathBuf>,

    /// Delay between game over and the results screen, in milliseconds
    #[arg(long)]
    pub end_delay_ms: Option<u64>,

    /// Where to go after the end delay: results, menu or exit
    #[arg(long, value_parser = parse_handoff)]
    pub handoff: Option<Handoff>,

    /// Write logs to this file (filtered by MARATHON_LOG)
    #[arg(long, env = "MARATHON_LOG_PATH")]
    pub log_file: Option<PathBuf>,

    /// Print the standings as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Environment configuration with command-line overrides applied.
    pub fn session_config(&self) -> SessionConfig {
        let mut config = SessionConfig::from_env();
        if let Some(ms) = self.end_delay_ms {
            config = config.with_end_delay(Duration::from_millis(ms));
        }
        if let Some(handoff) = self.handoff {
            config = config.with_handoff(handoff);
        }
        config
    }
}

fn parse_handoff(s: &str) -> Result<Handoff, String> {
    Handoff::from_str(s).ok_or_else(|| format!("unknown hand-off '{s}' (results, menu, exit)"))
}
