//! Static evaluation: material plus piece-square placement, oriented to the
//! side to move.
//!
//! Weights and placement tables are frozen constants rather than tunables;
//! a search that compares two iterative-deepening depths needs the leaf
//! evaluation to mean the same thing at both.

use crate::board::Board;
use crate::piece::{Color, Piece};
use crate::position::Position;

/// Sentinel for "forced mate" scoring; real evaluations never approach it.
pub const UPPER_BOUND: i32 = 1_000_000_000;
pub const LOWER_BOUND: i32 = -UPPER_BOUND;

/// Per-piece weights, indexed by the packed piece index (`6*color + type`,
/// type order King, Pawn, Rook, Knight, Bishop, Queen).
const PIECE_WEIGHTS: [i32; 12] = [40, 10, 55, 30, 33, 95, -40, -10, -55, -30, -33, -95];

#[rustfmt::skip]
const QUEEN_MATRIX: [i32; 64] = [
    -40, -20, -20, -10, -10, -20, -20, -40,
    -20,   0,   0,   0,   0,   0,   0, -20,
    -20,   0,  10,  10,  10,  10,   0, -20,
    -10,   0,  10,  10,  10,  10,   0, -10,
      0,   0,  10,  10,  10,  10,   0, -10,
    -20,  10,  10,  10,  10,  10,   0, -20,
    -20,   0,  10,   0,   0,   0,   0, -20,
    -40, -20, -20, -10, -10, -20, -20, -40,
];

#[rustfmt::skip]
const BISHOP_MATRIX: [i32; 64] = [
    -20, -10, -10, -10, -10, -10, -10, -20,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,  50,  10,  10,  50,   0, -10,
    -10,  50,  50,  10,  10,  50,  50, -10,
    -10,   0,  10,  10,  10,  10,   0, -10,
    -10,  10,  10,  10,  10,  10,  10, -10,
    -10,  50,   0,   0,   0,   0,  50, -10,
    -20, -10, -50, -10, -10, -50, -10, -20,
];

#[rustfmt::skip]
const KNIGHT_MATRIX: [i32; 64] = [
    -50, -40, -30, -30, -30, -30, -40, -50,
    -40, -20,   0,   0,   0,   0, -20, -40,
    -30,   0,  10,  15,  15,  10,   0, -30,
    -30,  50,  15,  20,  20,  15,  50, -30,
    -30,   0,  15,  20,  20,  15,   0, -30,
    -30,  50,  10,  15,  15,  10,  50, -30,
    -40, -20,   0,  50,  50,   0, -20, -40,
    -50, -50, -20, -30, -30, -20, -50, -50,
];

#[rustfmt::skip]
const ROOK_MATRIX: [i32; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0,
     10,  20,  20,  20,  20,  20,  20,  10,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -30,  30,  40,  10,  10,   0,   0, -30,
];

#[rustfmt::skip]
const PAWN_MATRIX: [i32; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0,
     70,  70,  70,  70,  70,  70,  70,  70,
     10,  10,  20,  30,  30,  20,  10,  10,
     50,  50,  10,  75,  75,  10,  50,  50,
      0,   0,   0,  25,  25,   0,   0,   0,
     50, -50, -10,   0,   0, -10, -50,  50,
     50,  10,  10, -25, -25,  10,  10,  50,
      0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const KING_MATRIX: [i32; 64] = [
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -20, -30, -30, -40, -40, -30, -30, -20,
    -10, -20, -20, -20, -20, -20, -20, -10,
     20,  20,   0,   0,   0,   0,  20,  20,
     20,  30,  10,   0,   0,  10,  30,  20,
];

/// Material balance from White's perspective: positive favors White.
pub fn compute_material(board: &Board) -> i32 {
    let mut total = 0;
    for i in 0u8..12 {
        let count = board.bitboard_at_index(i as usize).count_set() as i32;
        total += count * PIECE_WEIGHTS[i as usize];
    }
    total
}

/// Placement balance from White's perspective. Black pieces are scored
/// against the same table with the square vertically mirrored, so the
/// tables only need to be authored once, from White's point of view.
pub fn compute_placement(board: &Board) -> i32 {
    let mut total = 0;
    for sq in 0u8..64 {
        let sq = crate::square::Square(sq);
        let piece = board.piece_at(sq);
        let (ty, color) = match piece {
            Piece::Occupied(ty, color) => (ty, color),
            Piece::Empty => continue,
        };
        let index = match color {
            Color::White => sq.0 as usize,
            Color::Black => sq.flip_vertical().0 as usize,
        };
        let table = match ty {
            crate::piece::PieceType::Pawn => &PAWN_MATRIX,
            crate::piece::PieceType::Knight => &KNIGHT_MATRIX,
            crate::piece::PieceType::Bishop => &BISHOP_MATRIX,
            crate::piece::PieceType::Rook => &ROOK_MATRIX,
            crate::piece::PieceType::Queen => &QUEEN_MATRIX,
            crate::piece::PieceType::King => &KING_MATRIX,
        };
        let value = table[index];
        total += if color == Color::White { value } else { -value };
    }
    total
}

/// Evaluates `pos` from the side-to-move's viewpoint: positive is good for
/// whoever is about to move.
pub fn evaluate(pos: &Position) -> i32 {
    let sign = pos.turn().sign();

    if pos.is_checkmate() {
        return -sign * UPPER_BOUND;
    }
    if pos.is_draw() {
        return 0;
    }

    let material = compute_material(pos.board());
    let placement = compute_placement(pos.board());
    sign * (material + 2 * placement)
}
