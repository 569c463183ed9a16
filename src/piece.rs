//! Piece and color enumerations, and the packed index convention the board
//! representation and Zobrist hasher both key off of.

use std::fmt;

/// The six piece types, ordered to match the packed piece index convention:
/// `index = 6*color + type as usize`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(u8)]
pub enum PieceType {
    King = 0,
    Pawn = 1,
    Rook = 2,
    Knight = 3,
    Bishop = 4,
    Queen = 5,
}

pub const PIECE_TYPES: [PieceType; 6] = [
    PieceType::King,
    PieceType::Pawn,
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
];

impl PieceType {
    #[inline(always)]
    pub fn from_index(i: u8) -> PieceType {
        PIECE_TYPES[i as usize]
    }

    pub fn to_fen_char(self, color: Color) -> char {
        let c = match self {
            PieceType::King => 'k',
            PieceType::Pawn => 'p',
            PieceType::Rook => 'r',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Queen => 'q',
        };
        if color == Color::White {
            c.to_ascii_uppercase()
        } else {
            c
        }
    }

    pub fn from_fen_char(c: char) -> Option<(PieceType, Color)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let ty = match c.to_ascii_lowercase() {
            'k' => PieceType::King,
            'p' => PieceType::Pawn,
            'r' => PieceType::Rook,
            'n' => PieceType::Knight,
            'b' => PieceType::Bishop,
            'q' => PieceType::Queen,
            _ => return None,
        };
        Some((ty, color))
    }
}

/// Side to move / side owning a piece.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    #[inline(always)]
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// +1 for White, -1 for Black; used to orient the evaluation score.
    #[inline(always)]
    pub fn sign(self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
}

/// A piece on the board, or [`Piece::Empty`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Piece {
    Occupied(PieceType, Color),
    Empty,
}

impl Piece {
    /// Packs an occupied piece to its `[0,11]` index: `6*color + type`.
    #[inline(always)]
    pub fn packed_index(self) -> Option<u8> {
        match self {
            Piece::Occupied(ty, color) => Some(6 * color as u8 + ty as u8),
            Piece::Empty => None,
        }
    }

    #[inline(always)]
    pub fn from_packed_index(i: u8) -> Piece {
        debug_assert!(i < 12);
        let color = if i < 6 { Color::White } else { Color::Black };
        let ty = PieceType::from_index(i % 6);
        Piece::Occupied(ty, color)
    }

    #[inline(always)]
    pub fn color(self) -> Option<Color> {
        match self {
            Piece::Occupied(_, color) => Some(color),
            Piece::Empty => None,
        }
    }

    #[inline(always)]
    pub fn piece_type(self) -> Option<PieceType> {
        match self {
            Piece::Occupied(ty, _) => Some(ty),
            Piece::Empty => None,
        }
    }

    pub fn to_fen_char(self) -> char {
        match self {
            Piece::Occupied(ty, color) => ty.to_fen_char(color),
            Piece::Empty => '.',
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen_char())
    }
}
