//! History heuristic: a `(moving piece, destination square)`-indexed score
//! table used to order quiet moves when no capture or hash move is
//! available.

use crate::board::Board;
use crate::moves::Move;

/// 12 packed piece indices * 64 destination squares.
const TABLE_SIZE: usize = 12 * 64;

pub struct History {
    scores: Vec<i32>,
}

impl History {
    pub fn new() -> History {
        History {
            scores: vec![0; TABLE_SIZE],
        }
    }

    #[inline(always)]
    fn index(piece_index: u8, dst: crate::square::Square) -> usize {
        piece_index as usize * 64 + dst.0 as usize
    }

    #[inline(always)]
    pub fn score(&self, piece_index: u8, dst: crate::square::Square) -> i32 {
        self.scores[Self::index(piece_index, dst)]
    }

    /// Records a beta cutoff for `mv`, played from `board` (queried before
    /// the move is made, so `mv.src()` still holds the mover). Only quiet
    /// moves, pawn doubles, castles, and non-capture promotions update the
    /// table.
    pub fn on_beta_cutoff(&mut self, board: &Board, mv: Move, depth: i32) {
        if mv.is_capture() {
            return;
        }
        let Some(piece_index) = board.piece_at(mv.src()).packed_index() else {
            return;
        };
        self.scores[Self::index(piece_index, mv.dst())] += depth * depth;
    }

    pub fn clear(&mut self) {
        for s in &mut self.scores {
            *s = 0;
        }
    }
}

impl Default for History {
    fn default() -> History {
        History::new()
    }
}
