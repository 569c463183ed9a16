//! Zobrist hashing: a 64-bit position fingerprint built by XOR-ing random
//! bitstrings for every piece-square pair, castling right, en-passant
//! presence, and side to move.

use once_cell::sync::Lazy;
use rand::{RngCore, SeedableRng};
use rand::rngs::StdRng;

use crate::board::Board;
use crate::piece::{Color, Piece};
use crate::square::Square;

const PIECE_SQUARE_COUNT: usize = 64 * 12;
const TURN_INDEX: usize = PIECE_SQUARE_COUNT;
const EP_INDEX: usize = PIECE_SQUARE_COUNT + 1;
const CASTLING_BASE: usize = PIECE_SQUARE_COUNT + 2;
pub const BITSTRING_COUNT: usize = PIECE_SQUARE_COUNT + 1 + 1 + 4;

/// Bit positions within a castling-rights set, matching `Position`'s layout.
pub const CASTLE_WK: u8 = 0b0001;
pub const CASTLE_WQ: u8 = 0b0010;
pub const CASTLE_BK: u8 = 0b0100;
pub const CASTLE_BQ: u8 = 0b1000;

/// Owns the process-wide table of random bitstrings used to fold a `State`
/// into a 64-bit hash, incrementally or from scratch.
pub struct Hasher {
    bitstrings: Vec<u64>,
}

impl Hasher {
    /// Builds a fresh table from a seed. Only used by tests and by anyone
    /// who wants a reproducible-but-distinct table from the process-wide
    /// default; production code should use [`default_hasher`].
    pub fn with_seed(seed: u64) -> Hasher {
        let mut rng = StdRng::seed_from_u64(seed);
        let bitstrings = (0..BITSTRING_COUNT).map(|_| rng.next_u64()).collect();
        Hasher { bitstrings }
    }

    #[inline(always)]
    pub fn piece_square(&self, sq: Square, piece_index: u8) -> u64 {
        self.bitstrings[sq.0 as usize * 12 + piece_index as usize]
    }

    #[inline(always)]
    pub fn turn(&self) -> u64 {
        self.bitstrings[TURN_INDEX]
    }

    #[inline(always)]
    pub fn en_passant(&self) -> u64 {
        self.bitstrings[EP_INDEX]
    }

    /// `bit` is one of the `CASTLE_*` constants.
    #[inline(always)]
    pub fn castling(&self, bit: u8) -> u64 {
        let idx = match bit {
            CASTLE_WK => 0,
            CASTLE_WQ => 1,
            CASTLE_BK => 2,
            CASTLE_BQ => 3,
            _ => unreachable!("not a single castling-rights bit"),
        };
        self.bitstrings[CASTLING_BASE + idx]
    }

    /// Hashes a state from scratch; used as a cross-check against the
    /// incrementally maintained hash.
    pub fn full(
        &self,
        board: &Board,
        turn: Color,
        castling: u8,
        ep_target: Square,
    ) -> u64 {
        let mut hash = 0u64;
        if turn == Color::Black {
            hash ^= self.turn();
        }
        if !ep_target.is_null() {
            hash ^= self.en_passant();
        }
        for bit in [CASTLE_WK, CASTLE_WQ, CASTLE_BK, CASTLE_BQ] {
            if castling & bit != 0 {
                hash ^= self.castling(bit);
            }
        }
        for sq in 0u8..64 {
            let sq = Square(sq);
            if let Piece::Occupied(..) = board.piece_at(sq) {
                let idx = board.piece_at(sq).packed_index().unwrap();
                hash ^= self.piece_square(sq, idx);
            }
        }
        hash
    }
}

/// The process-wide hasher instance, initialized once from a fixed seed so
/// results are reproducible across runs (not security-sensitive: this is a
/// position fingerprint, not a cryptographic hash).
pub static HASHER: Lazy<Hasher> = Lazy::new(|| Hasher::with_seed(23_081));
