//! Error types surfaced at the crate's parsing boundaries.
//!
//! Internal invariant violations (an empty-bitboard `find_lsb`, a `make` on a
//! move absent from the current move list) are programming errors, not
//! recoverable conditions, and are signaled with `debug_assert!`/`panic!`
//! rather than through this type. See the error handling notes in the crate
//! root for the taxonomy.

use thiserror::Error;

/// Failures that can occur while parsing externally supplied chess notation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    #[error("malformed FEN: expected 6 fields, found {0}")]
    FenFieldCount(usize),

    #[error("malformed FEN placement field: {0}")]
    FenPlacement(String),

    #[error("malformed FEN side to move: expected 'w' or 'b', found {0:?}")]
    FenSideToMove(String),

    #[error("malformed FEN castling field: {0:?}")]
    FenCastling(String),

    #[error("malformed FEN en passant field: {0:?}")]
    FenEnPassant(String),

    #[error("malformed FEN clock field: {0:?}")]
    FenClock(String),

    #[error("invalid square notation: {0:?}")]
    InvalidSquare(String),

    #[error("invalid move notation: {0:?}")]
    InvalidMove(String),

    #[error("no legal move matches the requested source/destination/promotion")]
    NoSuchMove,
}
