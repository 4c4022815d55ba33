//! Marathon engine - the bundled puzzle mechanics behind [`Engine`].
//!
//! Levels start at a configurable value and advance every ten cleared lines.
//! With a non-zero max level the run ends once the max level's lines are
//! exhausted; with `max_level == 0` the marathon is endless.
//!
//! Scoring: classic line table times the level at which the lines were
//! cleared, 1 point per soft-dropped row, 2 points per hard-dropped row.

use std::time::Duration;

use tracing::debug;

use crate::bag::Bag;
use crate::board::Board;
use crate::pieces::{kicks, shape};
use crate::types::{
    drop_interval_ms, CellKind, PieceKind, Rotation, RunStats, LINES_PER_LEVEL, LINE_SCORES,
    NEXT_QUEUE_LEN, SOFT_DROP_MULTIPLIER,
};
use crate::{Engine, EngineError, Playfield};

const SPAWN_X: i8 = 3;
const SPAWN_Y: i8 = 0;

/// The falling piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Piece {
    kind: PieceKind,
    rotation: Rotation,
    x: i8,
    y: i8,
}

impl Piece {
    fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: Rotation::North,
            x: SPAWN_X,
            y: SPAWN_Y,
        }
    }

    fn covers(&self, x: i8, y: i8) -> bool {
        shape(self.kind, self.rotation)
            .iter()
            .any(|&(dx, dy)| self.x + dx == x && self.y + dy == y)
    }
}

#[derive(Debug, Clone)]
pub struct MarathonEngine {
    board: Board,
    active: Option<Piece>,
    hold: Option<PieceKind>,
    can_hold: bool,
    bag: Bag,
    next: [PieceKind; NEXT_QUEUE_LEN],
    stats: RunStats,
    start_level: u32,
    max_level: u32,
    soft_drop: bool,
    game_over: bool,
}

impl MarathonEngine {
    /// Start a marathon at `level` (1-based). `max_level == 0` means endless.
    pub fn new(level: u32, max_level: u32, seed: u32) -> Result<Self, EngineError> {
        if level == 0 || (max_level != 0 && level > max_level) {
            return Err(EngineError::InvalidLevel { level, max_level });
        }

        let bag = Bag::new(seed);
        let next = bag.preview();
        let mut engine = Self {
            board: Board::new(),
            active: None,
            hold: None,
            can_hold: true,
            bag,
            next,
            stats: RunStats {
                score: 0,
                lines: 0,
                level,
            },
            start_level: level,
            max_level,
            soft_drop: false,
            game_over: false,
        };
        engine.spawn();
        Ok(engine)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn is_soft_dropping(&self) -> bool {
        self.soft_drop
    }

    /// Draw the next piece into play; tops out when it does not fit.
    fn spawn(&mut self) -> bool {
        let piece = Piece::spawn(self.bag.draw());
        self.next = self.bag.preview();
        self.place_new(piece)
    }

    fn place_new(&mut self, piece: Piece) -> bool {
        self.can_hold = true;
        if !self.board.fits(&shape(piece.kind, piece.rotation), piece.x, piece.y) {
            debug!(kind = piece.kind.as_str(), "spawn blocked, game over");
            self.active = None;
            self.game_over = true;
            return false;
        }
        self.active = Some(piece);
        true
    }

    fn playable(&self, op: &'static str) -> Result<Piece, EngineError> {
        if self.game_over {
            return Err(EngineError::GameOver { op });
        }
        self.active.ok_or(EngineError::NoActivePiece { op })
    }

    fn try_shift(&mut self, piece: Piece, dx: i8, dy: i8) -> bool {
        let moved = Piece {
            x: piece.x + dx,
            y: piece.y + dy,
            ..piece
        };
        if self.board.fits(&shape(moved.kind, moved.rotation), moved.x, moved.y) {
            self.active = Some(moved);
            true
        } else {
            false
        }
    }

    fn drop_distance(&self, piece: &Piece) -> i8 {
        let s = shape(piece.kind, piece.rotation);
        let mut dist = 0;
        while self.board.fits(&s, piece.x, piece.y + dist + 1) {
            dist += 1;
        }
        dist
    }

    fn lock(&mut self, piece: Piece) {
        self.board
            .lock(&shape(piece.kind, piece.rotation), piece.x, piece.y, piece.kind);
        self.active = None;

        let cleared = self.board.clear_full_rows();
        if cleared > 0 {
            let points = LINE_SCORES[cleared as usize].saturating_mul(self.stats.level);
            self.stats.score = self.stats.score.saturating_add(points);
            self.stats.lines += cleared;

            let reached = self
                .start_level
                .saturating_add(self.stats.lines / LINES_PER_LEVEL);
            if self.max_level != 0 && reached > self.max_level {
                debug!(lines = self.stats.lines, "marathon complete");
                self.stats.level = self.max_level;
                self.game_over = true;
                return;
            }
            if reached != self.stats.level {
                debug!(level = reached, "level up");
            }
            self.stats.level = reached;
        }

        self.spawn();
    }
}

impl Engine for MarathonEngine {
    fn move_left(&mut self) -> Result<(), EngineError> {
        let piece = self.playable("move left")?;
        self.try_shift(piece, -1, 0);
        Ok(())
    }

    fn move_right(&mut self) -> Result<(), EngineError> {
        let piece = self.playable("move right")?;
        self.try_shift(piece, 1, 0);
        Ok(())
    }

    fn rotate(&mut self, clockwise: bool) -> Result<(), EngineError> {
        let piece = self.playable("rotate")?;
        let rotation = if clockwise {
            piece.rotation.rotate_cw()
        } else {
            piece.rotation.rotate_ccw()
        };
        let target = shape(piece.kind, rotation);
        for (dx, dy) in kicks(piece.kind, piece.rotation, clockwise) {
            if self.board.fits(&target, piece.x + dx, piece.y + dy) {
                self.active = Some(Piece {
                    rotation,
                    x: piece.x + dx,
                    y: piece.y + dy,
                    ..piece
                });
                break;
            }
        }
        Ok(())
    }

    fn hard_drop(&mut self) -> Result<u32, EngineError> {
        let piece = self.playable("hard drop")?;
        let dist = self.drop_distance(&piece);
        let landed = Piece {
            y: piece.y + dist,
            ..piece
        };
        self.stats.score = self.stats.score.saturating_add(2 * dist as u32);
        self.lock(landed);
        Ok(dist as u32)
    }

    fn toggle_soft_drop(&mut self) -> Duration {
        self.soft_drop = !self.soft_drop;
        if self.soft_drop {
            self.soft_drop_interval()
        } else {
            self.gravity_interval()
        }
    }

    fn hold(&mut self) -> Result<(), EngineError> {
        let piece = self.playable("hold")?;
        if !self.can_hold {
            return Ok(());
        }
        let previous = self.hold.replace(piece.kind);
        match previous {
            Some(kind) => {
                self.place_new(Piece::spawn(kind));
            }
            None => {
                self.spawn();
            }
        }
        self.can_hold = false;
        Ok(())
    }

    fn tick_lower(&mut self) -> Result<bool, EngineError> {
        let piece = self.playable("lower")?;
        if self.try_shift(piece, 0, 1) {
            if self.soft_drop {
                self.stats.score = self.stats.score.saturating_add(1);
            }
            return Ok(false);
        }
        self.lock(piece);
        Ok(true)
    }

    fn is_game_over(&self) -> bool {
        self.game_over
    }

    fn gravity_interval(&self) -> Duration {
        Duration::from_millis(u64::from(drop_interval_ms(self.stats.level)))
    }

    fn soft_drop_interval(&self) -> Duration {
        let ms = (drop_interval_ms(self.stats.level) / SOFT_DROP_MULTIPLIER).max(1);
        Duration::from_millis(u64::from(ms))
    }

    fn stats(&self) -> RunStats {
        self.stats
    }
}

impl Playfield for MarathonEngine {
    fn cell(&self, x: u8, y: u8) -> CellKind {
        let (x, y) = (x as i8, y as i8);
        if let Some(Some(kind)) = self.board.get(x, y) {
            return CellKind::Filled(kind);
        }
        let Some(active) = self.active else {
            return CellKind::Empty;
        };
        if active.covers(x, y) {
            return CellKind::Filled(active.kind);
        }
        let ghost = Piece {
            y: active.y + self.drop_distance(&active),
            ..active
        };
        if ghost.covers(x, y) {
            CellKind::Ghost
        } else {
            CellKind::Empty
        }
    }

    fn hold_piece(&self) -> Option<PieceKind> {
        self.hold
    }

    fn next_pieces(&self) -> &[PieceKind] {
        &self.next
    }
}
