//! The locked-cell matrix.
//!
//! 10 columns by 20 rows stored row-major in a flat array. `(x, y)` with `x`
//! left to right and `y` top to bottom; new pieces spawn at the top.

use crate::pieces::PieceShape;
use crate::types::{PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    cells: [Option<PieceKind>; BOARD_SIZE],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    /// Cell contents, or `None` when `(x, y)` is off the board.
    pub fn get(&self, x: i8, y: i8) -> Option<Option<PieceKind>> {
        Self::index(x, y).map(|i| self.cells[i])
    }

    pub fn set(&mut self, x: i8, y: i8, cell: Option<PieceKind>) -> bool {
        match Self::index(x, y) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    /// In bounds and empty.
    pub fn is_free(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// Whether every mino of `shape` placed at `(x, y)` lands on a free cell.
    pub fn fits(&self, shape: &PieceShape, x: i8, y: i8) -> bool {
        shape.iter().all(|&(dx, dy)| self.is_free(x + dx, y + dy))
    }

    /// Write `shape` at `(x, y)` into the matrix.
    pub fn lock(&mut self, shape: &PieceShape, x: i8, y: i8, kind: PieceKind) {
        for &(dx, dy) in shape {
            self.set(x + dx, y + dy, Some(kind));
        }
    }

    fn row_full(&self, y: usize) -> bool {
        let start = y * BOARD_WIDTH as usize;
        self.cells[start..start + BOARD_WIDTH as usize]
            .iter()
            .all(Option::is_some)
    }

    /// Remove every full row, shifting the rows above down. Returns how many
    /// rows were removed.
    pub fn clear_full_rows(&mut self) -> u32 {
        let width = BOARD_WIDTH as usize;
        let mut write_y = BOARD_HEIGHT as usize;
        let mut cleared = 0;

        for read_y in (0..BOARD_HEIGHT as usize).rev() {
            if self.row_full(read_y) {
                cleared += 1;
                continue;
            }
            write_y -= 1;
            if write_y != read_y {
                self.cells
                    .copy_within(read_y * width..(read_y + 1) * width, write_y * width);
            }
        }

        self.cells[..write_y * width].fill(None);
        cleared
    }
}
