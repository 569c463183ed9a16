//! Precomputed step-piece masks: king, knight, and pawn advance/capture
//! masks, indexed per square (and per color for pawns).

use once_cell::sync::Lazy;

use crate::bitboard::Bitboard;
use crate::piece::Color;
use crate::square::Square;

const KING_DELTAS: [i8; 8] = [8, -8, 1, -1, 9, -9, 7, -7];
const KNIGHT_DELTAS: [i8; 8] = [17, 15, 10, 6, -17, -15, -10, -6];

fn offset(sq: Square, df: i8, dr: i8) -> Option<Square> {
    let file = sq.file() as i8 + df;
    let rank = sq.rank() as i8 + dr;
    if (0..8).contains(&file) && (0..8).contains(&rank) {
        Some(Square::from_coords(rank as u8, file as u8))
    } else {
        None
    }
}

fn knight_delta_to_offset(delta: i8) -> (i8, i8) {
    match delta {
        17 => (1, 2),
        15 => (-1, 2),
        10 => (2, 1),
        6 => (-2, 1),
        -17 => (-1, -2),
        -15 => (1, -2),
        -10 => (-2, -1),
        -6 => (2, -1),
        _ => unreachable!(),
    }
}

fn king_delta_to_offset(delta: i8) -> (i8, i8) {
    match delta {
        8 => (0, 1),
        -8 => (0, -1),
        1 => (1, 0),
        -1 => (-1, 0),
        9 => (1, 1),
        -9 => (-1, -1),
        7 => (-1, 1),
        -7 => (1, -1),
        _ => unreachable!(),
    }
}

fn build_king_masks() -> Vec<Bitboard> {
    (0u8..64)
        .map(|s| {
            let sq = Square(s);
            let mut bb = Bitboard::EMPTY;
            for &d in &KING_DELTAS {
                let (df, dr) = king_delta_to_offset(d);
                if let Some(t) = offset(sq, df, dr) {
                    bb.set(t);
                }
            }
            bb
        })
        .collect()
}

fn build_knight_masks() -> Vec<Bitboard> {
    (0u8..64)
        .map(|s| {
            let sq = Square(s);
            let mut bb = Bitboard::EMPTY;
            for &d in &KNIGHT_DELTAS {
                let (df, dr) = knight_delta_to_offset(d);
                if let Some(t) = offset(sq, df, dr) {
                    bb.set(t);
                }
            }
            bb
        })
        .collect()
}

/// Pawn capture masks, `[color][square]`.
fn build_pawn_capture_masks() -> [Vec<Bitboard>; 2] {
    let mut white = Vec::with_capacity(64);
    let mut black = Vec::with_capacity(64);
    for s in 0u8..64 {
        let sq = Square(s);
        let mut w = Bitboard::EMPTY;
        if let Some(t) = offset(sq, -1, 1) {
            w.set(t);
        }
        if let Some(t) = offset(sq, 1, 1) {
            w.set(t);
        }
        white.push(w);

        let mut b = Bitboard::EMPTY;
        if let Some(t) = offset(sq, -1, -1) {
            b.set(t);
        }
        if let Some(t) = offset(sq, 1, -1) {
            b.set(t);
        }
        black.push(b);
    }
    [white, black]
}

/// Pawn single-advance masks, `[color][square]`.
fn build_pawn_advance_masks() -> [Vec<Bitboard>; 2] {
    let mut white = Vec::with_capacity(64);
    let mut black = Vec::with_capacity(64);
    for s in 0u8..64 {
        let sq = Square(s);
        let mut w = Bitboard::EMPTY;
        if let Some(t) = offset(sq, 0, 1) {
            w.set(t);
        }
        white.push(w);
        let mut b = Bitboard::EMPTY;
        if let Some(t) = offset(sq, 0, -1) {
            b.set(t);
        }
        black.push(b);
    }
    [white, black]
}

pub static KING_MASKS: Lazy<Vec<Bitboard>> = Lazy::new(build_king_masks);
pub static KNIGHT_MASKS: Lazy<Vec<Bitboard>> = Lazy::new(build_knight_masks);
pub static PAWN_CAPTURE_MASKS: Lazy<[Vec<Bitboard>; 2]> = Lazy::new(build_pawn_capture_masks);
pub static PAWN_ADVANCE_MASKS: Lazy<[Vec<Bitboard>; 2]> = Lazy::new(build_pawn_advance_masks);

#[inline(always)]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_MASKS[sq.0 as usize]
}

#[inline(always)]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_MASKS[sq.0 as usize]
}

#[inline(always)]
pub fn pawn_captures(sq: Square, color: Color) -> Bitboard {
    PAWN_CAPTURE_MASKS[color as usize][sq.0 as usize]
}

#[inline(always)]
pub fn pawn_advance(sq: Square, color: Color) -> Bitboard {
    PAWN_ADVANCE_MASKS[color as usize][sq.0 as usize]
}

/// Rank a pawn of `color` must start on to have a double-advance available.
#[inline(always)]
pub fn pawn_start_rank(color: Color) -> u8 {
    match color {
        Color::White => 1,
        Color::Black => 6,
    }
}

/// Rank a pawn of `color` promotes on.
#[inline(always)]
pub fn pawn_promotion_rank(color: Color) -> u8 {
    match color {
        Color::White => 7,
        Color::Black => 0,
    }
}
