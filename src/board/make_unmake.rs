use std::ops::{Deref, DerefMut};

use crate::zobrist::ZOBRIST;

use super::{bit_for_square, Board, Color, Move, Piece, Square, UndoRecord};

impl Board {
    pub(crate) fn set_piece(&mut self, sq: Square, color: Color, piece: Piece) {
        let bit = bit_for_square(sq);
        let c_idx = color.index();
        self.pieces[c_idx][piece.index()].0 |= bit;
        self.occupied[c_idx].0 |= bit;
        self.all_occupied.0 |= bit;
    }

    pub(crate) fn remove_piece(&mut self, sq: Square, color: Color, piece: Piece) {
        let bit = bit_for_square(sq);
        let c_idx = color.index();
        self.pieces[c_idx][piece.index()].0 &= !bit;
        self.occupied[c_idx].0 &= !bit;
        self.all_occupied.0 &= !bit;
    }

    /// Color and kind of the piece on `sq`
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        let bit = bit_for_square(sq);
        if self.all_occupied.0 & bit == 0 {
            return None;
        }

        let color = if self.occupied[0].0 & bit != 0 {
            Color::White
        } else {
            Color::Black
        };
        Piece::ALL
            .into_iter()
            .find(|piece| self.pieces[color.index()][piece.index()].0 & bit != 0)
            .map(|piece| (color, piece))
    }

    #[must_use]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.all_occupied.0 & bit_for_square(sq) == 0
    }

    /// Get just the piece type on a square (without color)
    #[must_use]
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.piece_at(sq).map(|(_, piece)| piece)
    }

    /// Get just the color of the piece on a square
    #[must_use]
    pub fn color_on(&self, sq: Square) -> Option<Color> {
        self.piece_at(sq).map(|(color, _)| color)
    }

    #[inline]
    fn move_piece_hashed(&mut self, hash: &mut u64, from: Square, to: Square, color: Color, piece: Piece) {
        self.remove_piece(from, color, piece);
        self.set_piece(to, color, piece);
        *hash ^= ZOBRIST.piece(color, piece, from) ^ ZOBRIST.piece(color, piece, to);
    }

    /// Play `mv` on the board and return what is needed to take it back.
    ///
    /// `mv` must come from move generation for this exact position. A move
    /// whose origin does not hold the encoded piece is a broken invariant
    /// and trips a debug assertion.
    pub fn apply(&mut self, mv: Move) -> UndoRecord {
        let color = self.side_to_move;
        let piece = mv.piece();
        let from = mv.from();
        let to = mv.to();

        debug_assert_eq!(
            self.piece_at(from),
            Some((color, piece)),
            "apply {mv:?}: origin square does not hold the moving piece"
        );

        let undo = UndoRecord {
            captured: mv.captured().map(|victim| (victim, mv.capture_square())),
            previous_castling_rights: self.castling_rights,
            previous_en_passant_target: self.en_passant_target,
            previous_halfmove_clock: self.halfmove_clock,
            previous_hash: self.hash,
        };

        let mut hash = self.hash;
        hash ^= ZOBRIST.en_passant(self.en_passant_target);
        hash ^= ZOBRIST.castling(self.castling_rights);

        if let Some((victim, sq)) = undo.captured {
            let them = color.opponent();
            debug_assert_eq!(self.piece_at(sq), Some((them, victim)), "apply {mv:?}: stale victim");
            self.remove_piece(sq, them, victim);
            hash ^= ZOBRIST.piece(them, victim, sq);
        }

        if let Some(promoted) = mv.promotion_piece() {
            self.remove_piece(from, color, Piece::Pawn);
            self.set_piece(to, color, promoted);
            hash ^= ZOBRIST.piece(color, Piece::Pawn, from) ^ ZOBRIST.piece(color, promoted, to);
        } else {
            self.move_piece_hashed(&mut hash, from, to, color, piece);
        }

        if mv.is_castling() {
            let (rook_from, rook_to) = mv.castling_rook_squares();
            self.move_piece_hashed(&mut hash, rook_from, rook_to, color, Piece::Rook);
        }

        if piece == Piece::King {
            self.castling_rights.remove(color, true);
            self.castling_rights.remove(color, false);
        }
        self.castling_rights.revoke_for_square(from);
        self.castling_rights.revoke_for_square(to);

        self.en_passant_target = if mv.is_double_pawn_push() {
            Square::new((from.0 + to.0) / 2, from.1)
        } else {
            None
        };

        if piece == Piece::Pawn || mv.is_capture() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if color == Color::Black {
            self.fullmove_number += 1;
        }

        self.side_to_move = color.opponent();
        hash ^= ZOBRIST.black_to_move_key;
        hash ^= ZOBRIST.castling(self.castling_rights);
        hash ^= ZOBRIST.en_passant(self.en_passant_target);
        self.hash = hash;

        undo
    }

    /// Take back `mv`, restoring the exact position `apply` saw.
    ///
    /// `undo` must be the record `apply(mv)` returned, and no other move may
    /// be outstanding on top of it.
    pub fn revert(&mut self, mv: Move, undo: UndoRecord) {
        let color = self.side_to_move.opponent();
        let from = mv.from();
        let to = mv.to();

        if mv.is_castling() {
            let (rook_from, rook_to) = mv.castling_rook_squares();
            self.remove_piece(rook_to, color, Piece::Rook);
            self.set_piece(rook_from, color, Piece::Rook);
        }

        if let Some(promoted) = mv.promotion_piece() {
            self.remove_piece(to, color, promoted);
            self.set_piece(from, color, Piece::Pawn);
        } else {
            let piece = mv.piece();
            self.remove_piece(to, color, piece);
            self.set_piece(from, color, piece);
        }

        if let Some((victim, sq)) = undo.captured {
            self.set_piece(sq, color.opponent(), victim);
        }

        if color == Color::Black {
            self.fullmove_number -= 1;
        }
        self.side_to_move = color;
        self.castling_rights = undo.previous_castling_rights;
        self.en_passant_target = undo.previous_en_passant_target;
        self.halfmove_clock = undo.previous_halfmove_clock;
        self.hash = undo.previous_hash;
    }

    /// Apply `mv` and get a guard that reverts it when dropped.
    ///
    /// ```
    /// use chess_perft::board::Board;
    ///
    /// let mut board = Board::new();
    /// let before = board.clone();
    /// let e4 = board.parse_move("e2e4").unwrap();
    /// {
    ///     let mut after = board.play(e4);
    ///     assert_eq!(after.generate_moves().len(), 20);
    /// }
    /// assert_eq!(board, before);
    /// ```
    pub fn play(&mut self, mv: Move) -> MoveGuard<'_> {
        let undo = self.apply(mv);
        MoveGuard {
            board: self,
            mv,
            undo: Some(undo),
        }
    }
}

/// Scoped move: the board is in the post-move state while the guard lives.
pub struct MoveGuard<'a> {
    board: &'a mut Board,
    mv: Move,
    undo: Option<UndoRecord>,
}

impl MoveGuard<'_> {
    #[must_use]
    pub fn played(&self) -> Move {
        self.mv
    }
}

impl Deref for MoveGuard<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl DerefMut for MoveGuard<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        self.board
    }
}

impl Drop for MoveGuard<'_> {
    fn drop(&mut self) {
        if let Some(undo) = self.undo.take() {
            self.board.revert(self.mv, undo);
        }
    }
}
