//! Piece-by-piece position construction.
//!
//! The builder edits a draft [`Board`] directly and checks it with
//! [`Board::validate`] on `try_build`, so every position it hands out is one
//! the move generator can walk.
//!
//! # Example
//! ```
//! use chess_perft::board::{BoardBuilder, Color, Piece, Square};
//!
//! let board = BoardBuilder::new()
//!     .piece(Square(0, 4), Color::White, Piece::King)
//!     .piece(Square(7, 4), Color::Black, Piece::King)
//!     .piece(Square(1, 0), Color::White, Piece::Pawn)
//!     .try_build()
//!     .unwrap();
//! assert_eq!(board.to_fen(), "4k3/8/8/8/8/8/P7/4K3 w - - 0 1");
//! ```

use super::error::BoardError;
use super::{Board, CastlingRights, Color, Piece, Square};

/// Fluent construction of a `Board`, validated when finished.
#[derive(Clone, Debug)]
pub struct BoardBuilder {
    draft: Board,
}

impl Default for BoardBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardBuilder {
    /// Empty board, White to move, no castling rights.
    #[must_use]
    pub fn new() -> Self {
        BoardBuilder {
            draft: Board::empty(),
        }
    }

    /// The standard initial position with all castling rights.
    #[must_use]
    pub fn starting_position() -> Self {
        Self::from_board(Board::new())
    }

    /// Start editing a copy of an existing position.
    #[must_use]
    pub fn from_board(board: Board) -> Self {
        BoardBuilder { draft: board }
    }

    /// Put `piece` on `square`, replacing whatever stood there.
    #[must_use]
    pub fn piece(self, square: Square, color: Color, piece: Piece) -> Self {
        let mut builder = self.clear(square);
        builder.draft.set_piece(square, color, piece);
        builder
    }

    /// Empty `square`.
    #[must_use]
    pub fn clear(mut self, square: Square) -> Self {
        if let Some((color, piece)) = self.draft.piece_at(square) {
            self.draft.remove_piece(square, color, piece);
        }
        self
    }

    #[must_use]
    pub fn side_to_move(mut self, color: Color) -> Self {
        self.draft.side_to_move = color;
        self
    }

    /// Replace the castling rights wholesale.
    #[must_use]
    pub fn castling(mut self, rights: CastlingRights) -> Self {
        self.draft.castling_rights = rights;
        self
    }

    /// Grant one castling right on top of the current ones.
    #[must_use]
    pub fn castle(mut self, color: Color, kingside: bool) -> Self {
        self.draft.castling_rights.set(color, kingside);
        self
    }

    /// Set or clear the en-passant target.
    #[must_use]
    pub fn en_passant(mut self, target: Option<Square>) -> Self {
        self.draft.en_passant_target = target;
        self
    }

    #[must_use]
    pub fn halfmove_clock(mut self, clock: u32) -> Self {
        self.draft.halfmove_clock = clock;
        self
    }

    /// Full-move number; 0 is raised to 1.
    #[must_use]
    pub fn fullmove_number(mut self, number: u32) -> Self {
        self.draft.fullmove_number = number.max(1);
        self
    }

    /// Finish the position, rejecting anything `Board::validate` rejects.
    pub fn try_build(self) -> Result<Board, BoardError> {
        let mut board = self.draft;
        board.validate()?;
        board.hash = board.calculate_hash();
        Ok(board)
    }

    /// # Panics
    /// Panics if the position is illegal. Use `try_build` for fallible construction.
    #[must_use]
    pub fn build(self) -> Board {
        match self.try_build() {
            Ok(board) => board,
            Err(err) => panic!("BoardBuilder produced an illegal position: {err}"),
        }
    }
}
