//! The position/state machine: a growable stack of [`State`]s addressed by
//! a cursor, giving O(1) `make`/`undo`/`redo` without the aliasing hazards
//! of a linked parent-pointer history.

use crate::board::Board;
use crate::error::ChessError;
use crate::moves::{Move, MoveList, MoveType};
use crate::movegen::{self, generate_legal_moves};
use crate::piece::{Color, Piece, PieceType};
use crate::square::Square;
use crate::zobrist::{self, HASHER};

pub const CASTLE_WK: u8 = movegen::CASTLE_WK;
pub const CASTLE_WQ: u8 = movegen::CASTLE_WQ;
pub const CASTLE_BK: u8 = movegen::CASTLE_BK;
pub const CASTLE_BQ: u8 = movegen::CASTLE_BQ;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// One ply's complete description. Each `make` pushes a new, independently
/// owned `State`; nothing here is shared between plies.
#[derive(Clone)]
pub struct State {
    pub board: Board,
    pub turn: Color,
    pub castling: u8,
    pub ep_target: Square,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
    pub moves: MoveList,
    pub in_check: bool,
    pub hash: u64,
}

/// An ordered sequence of `State`s with a current-index cursor. `make`
/// truncates any redo-able forward history and pushes a new state; `undo`
/// and `redo` just move the cursor.
pub struct Position {
    states: Vec<State>,
    cursor: usize,
}

fn corner_bit_for_square(sq: Square) -> u8 {
    match sq.0 {
        0 => CASTLE_WQ,
        7 => CASTLE_WK,
        56 => CASTLE_BQ,
        63 => CASTLE_BK,
        _ => 0,
    }
}

fn corner_bits_for_color(color: Color) -> u8 {
    match color {
        Color::White => CASTLE_WK | CASTLE_WQ,
        Color::Black => CASTLE_BK | CASTLE_BQ,
    }
}

fn ep_victim_square(ep_dst: Square, mover: Color) -> Square {
    match mover {
        Color::White => Square(ep_dst.0 - 8),
        Color::Black => Square(ep_dst.0 + 8),
    }
}

fn castle_rook_move(kind: MoveType, mover: Color) -> Option<(Square, Square)> {
    match (kind, mover) {
        (MoveType::KingCastle, Color::White) => Some((Square(7), Square(5))),
        (MoveType::KingCastle, Color::Black) => Some((Square(63), Square(61))),
        (MoveType::QueenCastle, Color::White) => Some((Square(0), Square(3))),
        (MoveType::QueenCastle, Color::Black) => Some((Square(56), Square(59))),
        _ => None,
    }
}

impl Position {
    /// Parses a FEN string and generates the root state's move list.
    pub fn new(fen: &str) -> Result<Position, ChessError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(ChessError::FenFieldCount(fields.len()));
        }
        let board = Board::from_placement(fields[0])?;
        let turn = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(ChessError::FenSideToMove(other.to_string())),
        };
        let castling = parse_castling(fields[2])?;
        let ep_target = parse_ep(fields[3])?;
        let halfmove_clock: u32 = fields[4]
            .parse()
            .map_err(|_| ChessError::FenClock(fields[4].to_string()))?;
        let fullmove_number: u32 = fields[5]
            .parse()
            .map_err(|_| ChessError::FenClock(fields[5].to_string()))?;

        let hash = HASHER.full(&board, turn, castling, ep_target);
        let gen = generate_legal_moves(&board, turn, castling, ep_target);

        let root = State {
            board,
            turn,
            castling,
            ep_target,
            halfmove_clock,
            fullmove_number,
            moves: gen.moves,
            in_check: gen.in_check,
            hash,
        };

        Ok(Position {
            states: vec![root],
            cursor: 0,
        })
    }

    pub fn startpos() -> Position {
        Position::new(START_FEN).expect("start FEN is well-formed")
    }

    #[inline(always)]
    fn current(&self) -> &State {
        &self.states[self.cursor]
    }

    pub fn state(&self) -> &State {
        self.current()
    }

    pub fn fen(&self) -> String {
        let s = self.current();
        format!(
            "{} {} {} {} {} {}",
            s.board.to_placement(),
            if s.turn == Color::White { "w" } else { "b" },
            format_castling(s.castling),
            if s.ep_target.is_null() {
                "-".to_string()
            } else {
                s.ep_target.to_algebraic()
            },
            s.halfmove_clock,
            s.fullmove_number,
        )
    }

    #[inline(always)]
    pub fn hash(&self) -> u64 {
        self.current().hash
    }

    #[inline(always)]
    pub fn board(&self) -> &Board {
        &self.current().board
    }

    #[inline(always)]
    pub fn turn(&self) -> Color {
        self.current().turn
    }

    #[inline(always)]
    pub fn moves(&self) -> &[Move] {
        self.current().moves.as_slice()
    }

    #[inline(always)]
    pub fn castling(&self) -> u8 {
        self.current().castling
    }

    #[inline(always)]
    pub fn halfmoves(&self) -> u32 {
        self.current().halfmove_clock
    }

    #[inline(always)]
    pub fn fullmoves(&self) -> u32 {
        self.current().fullmove_number
    }

    #[inline(always)]
    pub fn is_check(&self) -> bool {
        self.current().in_check
    }

    #[inline(always)]
    pub fn is_checkmate(&self) -> bool {
        let s = self.current();
        s.in_check && s.moves.is_empty()
    }

    #[inline(always)]
    pub fn is_stalemate(&self) -> bool {
        let s = self.current();
        !s.in_check && s.moves.is_empty()
    }

    pub fn is_draw(&self) -> bool {
        let s = self.current();
        self.is_stalemate() || s.halfmove_clock >= 100 || s.board.occupancy().count_set() == 2
    }

    pub fn find_move(&self, src: Square, dst: Square, promo: Option<PieceType>) -> Option<Move> {
        self.current()
            .moves
            .as_slice()
            .iter()
            .copied()
            .find(|m| m.src() == src && m.dst() == dst && m.kind().promotion_piece() == promo)
    }

    pub fn find_move_str(&self, notation: &str) -> Result<Move, ChessError> {
        Move::from_notation(notation, self.current().moves.as_slice())
    }

    /// Applies `m`, which must be a member of [`Position::moves`]. Any
    /// redo-able forward history is discarded.
    pub fn make(&mut self, m: Move) {
        let prev_idx = self.cursor;
        let mut next = self.states[prev_idx].clone();
        debug_assert!(
            self.states[prev_idx].moves.contains(m),
            "make called with a move absent from the current move list"
        );

        let turn = next.turn;
        let enemy = turn.opposite();
        let mover = next.board.piece_at(m.src());
        let mover_type = mover.piece_type().expect("make on a move with no mover");

        let mut hash = next.hash;

        // Castling rights: a king move clears both of its own rights; a
        // rook move or capture on a corner square clears that one right.
        // The BlackKing case must clear only BK/BQ -- no shared fall-through
        // with the rook-corner handling.
        let mut new_castling = next.castling;
        if mover_type == PieceType::King {
            new_castling &= !corner_bits_for_color(turn);
        }
        new_castling &= !corner_bit_for_square(m.src());
        new_castling &= !corner_bit_for_square(m.dst());
        for bit in [CASTLE_WK, CASTLE_WQ, CASTLE_BK, CASTLE_BQ] {
            if (next.castling & bit) != (new_castling & bit) {
                hash ^= HASHER.castling(bit);
            }
        }
        next.castling = new_castling;

        if m.kind() == MoveType::EnPassant {
            let captured_sq = ep_victim_square(m.dst(), turn);
            let captured = next.board.remove(captured_sq);
            hash ^= HASHER.piece_square(captured_sq, captured.packed_index().unwrap());
        }

        if let Some((rook_src, rook_dst)) = castle_rook_move(m.kind(), turn) {
            next.board.relocate(rook_src, rook_dst);
            let idx = Piece::Occupied(PieceType::Rook, turn).packed_index().unwrap();
            hash ^= HASHER.piece_square(rook_src, idx);
            hash ^= HASHER.piece_square(rook_dst, idx);
        }

        let mover_idx = mover.packed_index().unwrap();
        hash ^= HASHER.piece_square(m.src(), mover_idx);
        let captured_on_dst = next.board.relocate(m.src(), m.dst());
        if let Some(idx) = captured_on_dst.packed_index() {
            hash ^= HASHER.piece_square(m.dst(), idx);
        }
        hash ^= HASHER.piece_square(m.dst(), mover_idx);

        if let Some(promo_ty) = m.kind().promotion_piece() {
            hash ^= HASHER.piece_square(m.dst(), mover_idx);
            next.board.promote(m.dst(), promo_ty);
            let promo_idx = Piece::Occupied(promo_ty, turn).packed_index().unwrap();
            hash ^= HASHER.piece_square(m.dst(), promo_idx);
        }

        if !next.ep_target.is_null() {
            hash ^= HASHER.en_passant();
        }
        next.ep_target = if m.kind() == MoveType::PawnDouble {
            Square((m.src().0 + m.dst().0) / 2)
        } else {
            Square::NULL
        };
        if !next.ep_target.is_null() {
            hash ^= HASHER.en_passant();
        }

        let resets_halfmove = mover_type == PieceType::Pawn || m.is_capture();
        next.halfmove_clock = if resets_halfmove { 0 } else { next.halfmove_clock + 1 };
        if turn == Color::Black {
            next.fullmove_number += 1;
        }

        next.turn = enemy;
        hash ^= HASHER.turn();
        next.hash = hash;

        let gen = generate_legal_moves(&next.board, next.turn, next.castling, next.ep_target);
        next.moves = gen.moves;
        next.in_check = gen.in_check;

        debug_assert_eq!(
            next.hash,
            HASHER.full(&next.board, next.turn, next.castling, next.ep_target),
            "incremental hash diverged from full hash after make"
        );

        self.states.truncate(prev_idx + 1);
        self.states.push(next);
        self.cursor += 1;
    }

    /// Moves the cursor back one ply. A no-op at the root.
    pub fn undo(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Moves the cursor forward one ply, if a `make` had previously been
    /// undone without an intervening new `make`.
    pub fn redo(&mut self) {
        if self.cursor + 1 < self.states.len() {
            self.cursor += 1;
        }
    }

    /// Advances the turn without moving a piece; used by null-move search
    /// heuristics. Clears en passant and regenerates the opponent's moves.
    pub fn skip(&mut self) {
        let prev_idx = self.cursor;
        let mut next = self.states[prev_idx].clone();
        let mut hash = next.hash;

        if !next.ep_target.is_null() {
            hash ^= HASHER.en_passant();
            next.ep_target = Square::NULL;
        }
        if next.turn == Color::Black {
            next.fullmove_number += 1;
        }
        next.turn = next.turn.opposite();
        hash ^= HASHER.turn();
        next.halfmove_clock += 1;
        next.hash = hash;

        let gen = generate_legal_moves(&next.board, next.turn, next.castling, next.ep_target);
        next.moves = gen.moves;
        next.in_check = gen.in_check;

        self.states.truncate(prev_idx + 1);
        self.states.push(next);
        self.cursor += 1;
    }

    /// Node count at fixed depth, the strongest correctness check on the
    /// move generator. Not a debugging harness in its own right (there is no
    /// CLI here) but a property the test suite relies on directly.
    pub fn perft(&mut self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves: Vec<Move> = self.current().moves.as_slice().to_vec();
        if depth == 1 {
            return moves.len() as u64;
        }
        let mut nodes = 0u64;
        for m in moves {
            self.make(m);
            nodes += self.perft(depth - 1);
            self.undo();
        }
        nodes
    }

    /// Per-root-move leaf counts at `depth - 1`, useful for isolating which
    /// branch of a perft mismatch is wrong.
    pub fn divided_perft(&mut self, depth: u32) -> Vec<(Move, u64)> {
        let moves: Vec<Move> = self.current().moves.as_slice().to_vec();
        let mut out = Vec::with_capacity(moves.len());
        for m in moves {
            self.make(m);
            let count = if depth <= 1 { 1 } else { self.perft(depth - 1) };
            out.push((m, count));
            self.undo();
        }
        out
    }
}

fn parse_castling(field: &str) -> Result<u8, ChessError> {
    if field == "-" {
        return Ok(0);
    }
    let mut bits = 0u8;
    for c in field.chars() {
        bits |= match c {
            'K' => CASTLE_WK,
            'Q' => CASTLE_WQ,
            'k' => CASTLE_BK,
            'q' => CASTLE_BQ,
            _ => return Err(ChessError::FenCastling(field.to_string())),
        };
    }
    Ok(bits)
}

fn format_castling(bits: u8) -> String {
    if bits == 0 {
        return "-".to_string();
    }
    let mut s = String::new();
    if bits & CASTLE_WK != 0 {
        s.push('K');
    }
    if bits & CASTLE_WQ != 0 {
        s.push('Q');
    }
    if bits & CASTLE_BK != 0 {
        s.push('k');
    }
    if bits & CASTLE_BQ != 0 {
        s.push('q');
    }
    s
}

fn parse_ep(field: &str) -> Result<Square, ChessError> {
    if field == "-" {
        Ok(Square::NULL)
    } else {
        Square::from_algebraic(field).map_err(|_| ChessError::FenEnPassant(field.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_fen_round_trips() {
        let pos = Position::new(START_FEN).unwrap();
        assert_eq!(pos.fen(), START_FEN);
    }

    #[test]
    fn make_then_undo_restores_state_bitwise() {
        let mut pos = Position::startpos();
        let before_fen = pos.fen();
        let before_hash = pos.hash();
        let m = pos.find_move_str("e2e4").unwrap();
        pos.make(m);
        assert_ne!(pos.fen(), before_fen);
        pos.undo();
        assert_eq!(pos.fen(), before_fen);
        assert_eq!(pos.hash(), before_hash);
    }

    #[test]
    fn hash_matches_full_recompute_after_several_plies() {
        let mut pos = Position::startpos();
        for notation in ["e2e4", "e7e5", "g1f3", "b8c6"] {
            let m = pos.find_move_str(notation).unwrap();
            pos.make(m);
        }
        let s = pos.state();
        assert_eq!(
            s.hash,
            zobrist::HASHER.full(&s.board, s.turn, s.castling, s.ep_target)
        );
    }

    #[test]
    fn castling_rights_cleared_on_king_move_without_fallthrough() {
        let mut pos = Position::new("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let m = pos.find_move_str("e1e2").unwrap();
        pos.make(m);
        // White king moved: both white rights clear, both black rights remain.
        assert_eq!(pos.castling(), CASTLE_BK | CASTLE_BQ);
    }

    #[test]
    fn en_passant_capture_clears_victim_and_sets_destination() {
        let mut pos = Position::new("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let m = pos.find_move_str("e5d6").unwrap();
        pos.make(m);
        assert_eq!(
            pos.board().piece_at(Square::from_algebraic("d5").unwrap()),
            Piece::Empty
        );
        assert_eq!(
            pos.board().piece_at(Square::from_algebraic("d6").unwrap()),
            Piece::Occupied(PieceType::Pawn, Color::White)
        );
    }

    #[test]
    fn perft_depth_one_matches_start_move_count() {
        let mut pos = Position::startpos();
        assert_eq!(pos.perft(1), 20);
    }

    #[test]
    fn perft_depth_two_matches_known_value() {
        let mut pos = Position::startpos();
        assert_eq!(pos.perft(2), 400);
    }

    #[test]
    fn skip_flips_turn_and_clears_en_passant() {
        let mut pos = Position::new("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        pos.skip();
        assert_eq!(pos.turn(), Color::Black);
        assert_eq!(pos.state().ep_target, Square::NULL);
    }
}
