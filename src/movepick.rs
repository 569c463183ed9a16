//! Staged move ordering used inside search: the transposition table's hash
//! move first, then captures by static exchange evaluation, then quiet
//! moves by history score.
//!
//! Selection within a phase is incremental max-find (the chosen entry is
//! swapped to the front of its unsearched region) rather than a full sort,
//! since a beta cutoff frequently ends the scan after the first pick or two.

use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::history::History;
use crate::magic::{bishop_attacks, rook_attacks};
use crate::moves::{Move, MoveType};
use crate::piece::{Color, PieceType};
use crate::square::Square;
use crate::steptables::{king_attacks, knight_attacks, pawn_captures};

fn piece_value(ty: PieceType) -> i32 {
    match ty {
        PieceType::Pawn => 10,
        PieceType::Knight => 30,
        PieceType::Bishop => 33,
        PieceType::Rook => 55,
        PieceType::Queen => 95,
        PieceType::King => 1_000,
    }
}

fn attackers_to(board: &Board, occupancy: Bitboard, sq: Square, color: Color) -> Bitboard {
    let mut attackers = Bitboard::EMPTY;
    attackers |= pawn_captures(sq, color.opposite()) & board.bitboard_for(PieceType::Pawn, color) & occupancy;
    attackers |= knight_attacks(sq) & board.bitboard_for(PieceType::Knight, color) & occupancy;
    attackers |= king_attacks(sq) & board.bitboard_for(PieceType::King, color) & occupancy;
    let diagonal_sliders = board.bitboard_for(PieceType::Bishop, color) | board.bitboard_for(PieceType::Queen, color);
    attackers |= bishop_attacks(sq, occupancy) & diagonal_sliders & occupancy;
    let straight_sliders = board.bitboard_for(PieceType::Rook, color) | board.bitboard_for(PieceType::Queen, color);
    attackers |= rook_attacks(sq, occupancy) & straight_sliders & occupancy;
    attackers
}

fn see_recursive(board: &Board, occupancy: Bitboard, sq: Square, victim_value: i32, side: Color) -> i32 {
    let attackers = attackers_to(board, occupancy, sq, side);
    if attackers.is_empty() {
        return 0;
    }
    let mut least_value = i32::MAX;
    let mut least_sq = Square::NULL;
    for attacker_sq in attackers {
        let value = piece_value(board.piece_at(attacker_sq).piece_type().unwrap());
        if value < least_value {
            least_value = value;
            least_sq = attacker_sq;
        }
    }
    let occupancy_after = occupancy & !Bitboard::from_square(least_sq);
    let continuation = see_recursive(board, occupancy_after, sq, least_value, side.opposite());
    (victim_value - continuation).max(0)
}

/// Static exchange evaluation for a capture: resolves "lowest-value
/// attacker recaptures" on the destination square until one side stops,
/// returning the net material gain for the side initiating the capture (0
/// for a losing exchange).
pub fn see(board: &Board, mv: Move) -> i32 {
    if !mv.is_capture() {
        return 0;
    }
    let attacker_color = board
        .piece_at(mv.src())
        .color()
        .expect("see on a move with no mover");
    let attacker_value = piece_value(board.piece_at(mv.src()).piece_type().unwrap());

    let (victim_value, mut occupancy) = if mv.kind() == MoveType::EnPassant {
        let victim_sq = match attacker_color {
            Color::White => Square(mv.dst().0 - 8),
            Color::Black => Square(mv.dst().0 + 8),
        };
        (piece_value(PieceType::Pawn), board.occupancy() & !Bitboard::from_square(victim_sq))
    } else {
        (
            piece_value(board.piece_at(mv.dst()).piece_type().unwrap()),
            board.occupancy(),
        )
    };
    occupancy &= !Bitboard::from_square(mv.src());

    let continuation = see_recursive(board, occupancy, mv.dst(), attacker_value, attacker_color.opposite());
    (victim_value - continuation).max(0)
}

/// Yields the moves of one node in staged order.
pub struct MovePicker {
    hash_move: Option<Move>,
    yielded_hash: bool,
    captures: Vec<(Move, i32)>,
    quiets: Vec<(Move, i32)>,
    cap_idx: usize,
    quiet_idx: usize,
}

impl MovePicker {
    pub fn new(board: &Board, moves: &[Move], hash_move: Option<Move>, history: &History) -> MovePicker {
        let valid_hash = hash_move.filter(|m| moves.contains(m));
        let mut captures = Vec::new();
        let mut quiets = Vec::new();
        for &m in moves {
            if Some(m) == valid_hash {
                continue;
            }
            if m.is_capture() {
                captures.push((m, see(board, m)));
            } else {
                let piece_index = board.piece_at(m.src()).packed_index().unwrap_or(0);
                quiets.push((m, history.score(piece_index, m.dst())));
            }
        }
        MovePicker {
            hash_move: valid_hash,
            yielded_hash: false,
            captures,
            quiets,
            cap_idx: 0,
            quiet_idx: 0,
        }
    }

    fn select_max(entries: &mut [(Move, i32)], from: usize) -> Move {
        let mut best = from;
        for i in (from + 1)..entries.len() {
            if entries[i].1 > entries[best].1 {
                best = i;
            }
        }
        entries.swap(from, best);
        entries[from].0
    }
}

impl Iterator for MovePicker {
    type Item = Move;

    fn next(&mut self) -> Option<Move> {
        if !self.yielded_hash {
            self.yielded_hash = true;
            if let Some(m) = self.hash_move {
                return Some(m);
            }
        }
        if self.cap_idx < self.captures.len() {
            let m = Self::select_max(&mut self.captures, self.cap_idx);
            self.cap_idx += 1;
            return Some(m);
        }
        if self.quiet_idx < self.quiets.len() {
            let m = Self::select_max(&mut self.quiets, self.quiet_idx);
            self.quiet_idx += 1;
            return Some(m);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    #[test]
    fn see_is_positive_for_winning_capture() {
        // White rook captures an undefended black pawn.
        let board = Board::from_placement("8/8/8/3p4/8/8/8/3R4").unwrap();
        let mv = Move::new(Square::from_algebraic("d1").unwrap(), Square::from_algebraic("d5").unwrap(), MoveType::Capture);
        assert_eq!(see(&board, mv), piece_value(PieceType::Pawn));
    }

    #[test]
    fn see_is_zero_for_losing_capture() {
        // White queen captures a pawn defended by a black rook: losing trade.
        let board = Board::from_placement("3r4/8/8/3p4/8/8/8/3Q4").unwrap();
        let mv = Move::new(Square::from_algebraic("d1").unwrap(), Square::from_algebraic("d5").unwrap(), MoveType::Capture);
        assert_eq!(see(&board, mv), 0);
    }

    #[test]
    fn hash_move_is_yielded_first() {
        let board = Board::from_placement("8/8/8/3p4/8/8/4P3/3RK3").unwrap();
        let quiet = Move::new(Square::from_algebraic("e2").unwrap(), Square::from_algebraic("e3").unwrap(), MoveType::Quiet);
        let capture = Move::new(Square::from_algebraic("d1").unwrap(), Square::from_algebraic("d5").unwrap(), MoveType::Capture);
        let moves = [quiet, capture];
        let history = History::new();
        let mut picker = MovePicker::new(&board, &moves, Some(quiet), &history);
        assert_eq!(picker.next(), Some(quiet));
        assert_eq!(picker.next(), Some(capture));
    }
}
