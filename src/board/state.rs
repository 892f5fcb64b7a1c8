use std::fmt;

use crate::zobrist::ZOBRIST;

use super::error::BoardError;
use super::{Bitboard, CastlingRights, Color, Piece, Square};

/// Everything `revert` needs to undo one `apply`.
///
/// Only valid for the exact move and position it was produced from.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use = "dropping an UndoRecord makes the move irreversible"]
pub struct UndoRecord {
    pub(crate) captured: Option<(Piece, Square)>,
    pub(crate) previous_castling_rights: CastlingRights,
    pub(crate) previous_en_passant_target: Option<Square>,
    pub(crate) previous_halfmove_clock: u32,
    pub(crate) previous_hash: u64,
}

impl UndoRecord {
    /// The piece removed by the move and the square it stood on
    #[must_use]
    pub fn captured(&self) -> Option<(Piece, Square)> {
        self.captured
    }
}

/// A chess position.
///
/// Equality compares every field, so two boards are equal only when piece
/// placement, side to move, castling rights, en passant target, both clocks
/// and the hash all agree.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    pub(crate) pieces: [[Bitboard; 6]; 2],
    pub(crate) occupied: [Bitboard; 2],
    pub(crate) all_occupied: Bitboard,
    pub(crate) side_to_move: Color,
    pub(crate) en_passant_target: Option<Square>,
    pub(crate) castling_rights: CastlingRights,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    pub(crate) hash: u64, // Zobrist hash
}

impl Board {
    /// The standard starting position
    pub fn new() -> Self {
        let mut board = Board::empty();
        let back_rank = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        for (i, piece) in back_rank.iter().enumerate() {
            board.set_piece(Square(0, i), Color::White, *piece);
            board.set_piece(Square(7, i), Color::Black, *piece);
            board.set_piece(Square(1, i), Color::White, Piece::Pawn);
            board.set_piece(Square(6, i), Color::Black, Piece::Pawn);
        }

        board.castling_rights = CastlingRights::all();
        board.hash = board.calculate_hash();
        board
    }

    pub(crate) fn empty() -> Self {
        Board {
            pieces: [[Bitboard::EMPTY; 6]; 2],
            occupied: [Bitboard::EMPTY; 2],
            all_occupied: Bitboard::EMPTY,
            side_to_move: Color::White,
            en_passant_target: None,
            castling_rights: CastlingRights::none(),
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
        }
    }

    #[must_use]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[must_use]
    pub fn white_to_move(&self) -> bool {
        self.side_to_move == Color::White
    }

    #[must_use]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    #[must_use]
    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }

    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[must_use]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Bitboard of one color's pieces of one kind
    #[inline]
    #[must_use]
    pub fn pieces_of(&self, color: Color, piece: Piece) -> Bitboard {
        self.pieces[color.index()][piece.index()]
    }

    #[inline]
    #[must_use]
    pub fn occupied_by(&self, color: Color) -> Bitboard {
        self.occupied[color.index()]
    }

    #[inline]
    #[must_use]
    pub fn occupied(&self) -> Bitboard {
        self.all_occupied
    }

    /// Recompute the Zobrist hash from scratch
    pub(crate) fn calculate_hash(&self) -> u64 {
        let mut hash: u64 = 0;

        for color in Color::BOTH {
            for piece in Piece::ALL {
                for sq in self.pieces_of(color, piece) {
                    hash ^= ZOBRIST.piece(color, piece, sq);
                }
            }
        }

        if self.side_to_move == Color::Black {
            hash ^= ZOBRIST.black_to_move_key;
        }
        hash ^= ZOBRIST.castling(self.castling_rights);
        hash ^= ZOBRIST.en_passant(self.en_passant_target);

        hash
    }

    /// Check the position invariants.
    ///
    /// Every position reachable by `apply` from a valid position is valid, so
    /// this only runs where positions enter from outside (FEN, builder).
    pub fn validate(&self) -> Result<(), BoardError> {
        for color in Color::BOTH {
            let kings = self.pieces_of(color, Piece::King).popcount();
            if kings != 1 {
                return Err(BoardError::KingCount { color, found: kings });
            }

            let pawns = self.pieces_of(color, Piece::Pawn);
            if !pawns.and(Bitboard::BACK_RANKS).is_empty() {
                return Err(BoardError::PawnOnBackRank { color });
            }
            if pawns.popcount() > 8 {
                return Err(BoardError::TooManyPieces {
                    color,
                    found: pawns.popcount(),
                });
            }

            let total = self.occupied_by(color).popcount();
            if total > 16 {
                return Err(BoardError::TooManyPieces { color, found: total });
            }

            let promoted = self.promoted_count(color);
            if promoted > 8 - pawns.popcount() {
                return Err(BoardError::ImpossibleMaterial {
                    color,
                    promoted,
                    pawns: pawns.popcount(),
                });
            }
        }

        let waiting = self.side_to_move.opponent();
        if self.is_in_check(waiting) {
            return Err(BoardError::OpponentInCheck { color: waiting });
        }

        if let Some(target) = self.en_passant_target {
            if !self.en_passant_target_is_consistent(target) {
                return Err(BoardError::InvalidEnPassantTarget {
                    square: target.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Pieces beyond the starting set, each of which needs a promoted pawn
    fn promoted_count(&self, color: Color) -> u32 {
        [(Piece::Queen, 1), (Piece::Rook, 2), (Piece::Bishop, 2), (Piece::Knight, 2)]
            .into_iter()
            .map(|(piece, initial)| self.pieces_of(color, piece).popcount().saturating_sub(initial))
            .sum()
    }

    /// The target must sit behind an enemy pawn that could have just double-pushed
    fn en_passant_target_is_consistent(&self, target: Square) -> bool {
        let us = self.side_to_move;
        if target.0 != us.en_passant_rank() {
            return false;
        }
        let dir = us.pawn_direction();
        let pushed_pawn = target.offset(-dir, 0);
        let origin = target.offset(dir, 0);
        match (pushed_pawn, origin) {
            (Some(pawn_sq), Some(origin_sq)) => {
                self.is_empty(target)
                    && self.is_empty(origin_sq)
                    && self.piece_at(pawn_sq) == Some((us.opponent(), Piece::Pawn))
            }
            _ => false,
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

/// ASCII diagram, rank 8 at the top, followed by the FEN
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  +---+---+---+---+---+---+---+---+")?;
        for rank in (0..8).rev() {
            write!(f, "{} |", rank + 1)?;
            for file in 0..8 {
                let ch = self
                    .piece_at(Square(rank, file))
                    .map_or(' ', |(color, piece)| piece.to_fen_char(color));
                write!(f, " {ch} |")?;
            }
            writeln!(f)?;
            writeln!(f, "  +---+---+---+---+---+---+---+---+")?;
        }
        writeln!(f, "    a   b   c   d   e   f   g   h")?;
        write!(f, "{}", self.to_fen())
    }
}
