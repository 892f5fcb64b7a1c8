//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions.
//!
//! # Example
//! ```
//! use chess_perft::board::prelude::*;
//!
//! let mut board = Board::new();
//! assert_eq!(perft(&mut board, 2), 400);
//! ```

pub use super::{
    Board, BoardBuilder, BoardError, CastlingRights, Color, FenError, Move, MoveList,
    MoveParseError, PgnError, PgnGame, Piece, SanError, Square, SquareError,
};
pub use crate::perft::{divide, perft, perft_parallel, DivideReport, PerftError};
