//! 7-bag piece randomizer.
//!
//! Every run of seven pieces contains each kind exactly once. A small LCG keeps
//! the sequence deterministic for a given seed.

use std::collections::VecDeque;

use crate::types::{PieceKind, NEXT_QUEUE_LEN};

#[derive(Debug, Clone)]
pub struct Bag {
    state: u32,
    queue: VecDeque<PieceKind>,
}

impl Bag {
    pub fn new(seed: u32) -> Self {
        let mut bag = Self {
            state: if seed == 0 { 1 } else { seed },
            queue: VecDeque::with_capacity(PieceKind::ALL.len() * 2),
        };
        bag.top_up();
        bag
    }

    fn next_u32(&mut self) -> u32 {
        // Numerical Recipes LCG constants.
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    fn top_up(&mut self) {
        while self.queue.len() <= NEXT_QUEUE_LEN {
            let mut fresh = PieceKind::ALL;
            for i in (1..fresh.len()).rev() {
                let j = (self.next_u32() >> 16) as usize % (i + 1);
                fresh.swap(i, j);
            }
            self.queue.extend(fresh);
        }
    }

    /// Take the next piece.
    pub fn draw(&mut self) -> PieceKind {
        let kind = self.queue.pop_front().unwrap_or(PieceKind::I);
        self.top_up();
        kind
    }

    /// Upcoming pieces in draw order.
    pub fn preview(&self) -> [PieceKind; NEXT_QUEUE_LEN] {
        let mut out = [PieceKind::I; NEXT_QUEUE_LEN];
        for (slot, kind) in out.iter_mut().zip(self.queue.iter()) {
            *slot = *kind;
        }
        out
    }
}
