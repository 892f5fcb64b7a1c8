//! Chess board representation and move generation.
//!
//! Uses bitboards for piece placement and attack computation. Supports the
//! full rules needed for exact perft counts: castling, en passant, promotions
//! and pinned-piece legality. Positions come in as FEN or as PGN games,
//! and moves as UCI or SAN.
//!
//! # Example
//! ```
//! use chess_perft::board::Board;
//!
//! let mut board = Board::new();
//! let moves = board.generate_moves();
//! assert_eq!(moves.len(), 20);
//! ```

mod attack_tables;
mod builder;
mod error;
mod fen;
mod make_unmake;
mod movegen;
mod pgn;
pub mod prelude;
mod san;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use builder::BoardBuilder;
pub use error::{BoardError, FenError, MoveParseError, PgnError, SanError, SquareError};
pub use make_unmake::MoveGuard;
pub use pgn::PgnGame;
pub use state::{Board, UndoRecord};
pub use types::{
    Bitboard, BitboardIter, CastlingRights, Color, Move, MoveList, MoveListIntoIter, Piece, Square,
};

pub(crate) use types::{bit_for_square, PROMOTION_PIECES};
