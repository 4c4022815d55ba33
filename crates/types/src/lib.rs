//! Shared data types and constants for the marathon session.
//!
//! Everything here is plain data: no I/O, no timing, no engine logic. The
//! controller, the engine, the input mapper and the projector all speak in these
//! types, which keeps each of them free of the others' concerns.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, top to bottom)
//! - **Spawn position**: (3, 0) for every piece
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `SESSION_TICK_MS` | 10 | Session clock resolution |
//! | `BASE_DROP_MS` | 1000 | Gravity at level 1 |
//! | `SOFT_DROP_MULTIPLIER` | 10 | Soft drop falls 10x faster than gravity |
//! | `END_DELAY_MS` | 5000 | Wait between game over and hand-off |
//!
//! # Drop Intervals by Level
//!
//! | Level | Interval |
//! |-------|----------|
//! | 1 | 1000ms |
//! | 2 | 800ms |
//! | 3 | 650ms |
//! | 4 | 500ms |
//! | 5 | 400ms |
//! | 6 | 320ms |
//! | 7 | 250ms |
//! | 8 | 200ms |
//! | 9 | 160ms |
//! | 10+ | shrinks by 10ms per level down to 100ms |
//!
//! # Examples
//!
//! ```
//! use tui_marathon_types::{InputAction, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! assert_eq!(InputAction::from_str("hardDrop"), Some(InputAction::HardDrop));
//! assert!(InputAction::Left.is_gameplay());
//! assert!(!InputAction::Pause.is_gameplay());
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Session clock resolution in milliseconds.
pub const SESSION_TICK_MS: u32 = 10;

/// Gravity interval at level 1 (1000ms = 1 second per row)
pub const BASE_DROP_MS: u32 = 1000;

/// Soft drop speed multiplier.
pub const SOFT_DROP_MULTIPLIER: u32 = 10;

/// Delay between game over and the session hand-off.
pub const END_DELAY_MS: u32 = 5000;

/// Lines needed to advance one level.
pub const LINES_PER_LEVEL: u32 = 10;

/// Number of pieces shown in the next queue.
pub const NEXT_QUEUE_LEN: usize = 5;

/// Drop intervals by level (milliseconds per row).
///
/// Index 0 = Level 1, index 8 = Level 9.
pub const DROP_INTERVALS: [u32; 9] = [1000, 800, 650, 500, 400, 320, 250, 200, 160];

/// Gravity never gets faster than this.
pub const DROP_INTERVAL_MIN_MS: u32 = 100;

/// Line clear scoring table (classic scoring).
///
/// Base points for clearing N lines; multiplied by the current level.
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// Gravity interval for a level (levels start at 1).
///
/// ```
/// use tui_marathon_types::drop_interval_ms;
///
/// assert_eq!(drop_interval_ms(1), 1000);
/// assert_eq!(drop_interval_ms(9), 160);
/// assert_eq!(drop_interval_ms(11), 140);
/// assert_eq!(drop_interval_ms(99), 100);
/// ```
pub fn drop_interval_ms(level: u32) -> u32 {
    let idx = level.saturating_sub(1) as usize;
    if let Some(&ms) = DROP_INTERVALS.get(idx) {
        return ms;
    }
    let beyond = (idx - (DROP_INTERVALS.len() - 1)) as u32;
    DROP_INTERVALS[DROP_INTERVALS.len() - 1]
        .saturating_sub(beyond.saturating_mul(10))
        .max(DROP_INTERVAL_MIN_MS)
}

/// The seven tetromino piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }
}

/// Rotation states following the Super Rotation System (SRS)
///
/// The rotation cycle goes: North → East → South → West → North
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }
}

/// What the projector draws for one matrix cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellKind {
    #[default]
    Empty,
    /// Landing preview of the active piece.
    Ghost,
    Filled(PieceKind),
}

/// Logical input actions a key press can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    Quit,
    Pause,
    Help,
    Left,
    Right,
    RotateCw,
    RotateCcw,
    HardDrop,
    SoftDrop,
    Hold,
}

impl InputAction {
    /// Parse action from its camelCase name (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "quit" => Some(InputAction::Quit),
            "pause" => Some(InputAction::Pause),
            "help" => Some(InputAction::Help),
            "left" | "moveleft" => Some(InputAction::Left),
            "right" | "moveright" => Some(InputAction::Right),
            "rotatecw" => Some(InputAction::RotateCw),
            "rotateccw" => Some(InputAction::RotateCcw),
            "harddrop" => Some(InputAction::HardDrop),
            "softdrop" => Some(InputAction::SoftDrop),
            "hold" => Some(InputAction::Hold),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InputAction::Quit => "quit",
            InputAction::Pause => "pause",
            InputAction::Help => "help",
            InputAction::Left => "moveLeft",
            InputAction::Right => "moveRight",
            InputAction::RotateCw => "rotateCw",
            InputAction::RotateCcw => "rotateCcw",
            InputAction::HardDrop => "hardDrop",
            InputAction::SoftDrop => "softDrop",
            InputAction::Hold => "hold",
        }
    }

    /// Actions that reach the engine and are gated behind "running".
    pub fn is_gameplay(&self) -> bool {
        matches!(
            self,
            InputAction::Left
                | InputAction::Right
                | InputAction::RotateCw
                | InputAction::RotateCcw
                | InputAction::HardDrop
                | InputAction::SoftDrop
                | InputAction::Hold
        )
    }
}

/// Whether a key went down or came back up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPhase {
    Press,
    Release,
}

/// A logical key input delivered to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub action: InputAction,
    pub phase: KeyPhase,
}

impl KeyInput {
    pub fn press(action: InputAction) -> Self {
        Self {
            action,
            phase: KeyPhase::Press,
        }
    }

    pub fn release(action: InputAction) -> Self {
        Self {
            action,
            phase: KeyPhase::Release,
        }
    }
}

/// Screens a session can hand off to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Menu,
    Marathon,
    Results,
}

impl Screen {
    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Menu => "menu",
            Screen::Marathon => "marathon",
            Screen::Results => "results",
        }
    }
}

/// Game mode a run was played in; leaderboards are kept per mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Marathon,
}

impl GameMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "marathon" => Some(GameMode::Marathon),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Marathon => "marathon",
        }
    }
}

/// Score counters reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunStats {
    pub score: u32,
    pub lines: u32,
    pub level: u32,
}
