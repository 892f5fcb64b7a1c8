//! Move generation.
//!
//! Pseudo-legal moves are produced per piece kind (pawns, knights, bishops,
//! rooks, queens, king), each kind in ascending square order. The legality
//! filter then drops moves that would leave the mover's king attacked.

mod kings;
mod knights;
mod pawns;
mod sliders;

use sliders::SliderType;

use super::attack_tables::{between, bishop_attacks, rook_attacks};
use super::{Bitboard, Board, Color, Move, MoveList, Piece, Square};

/// Per-position facts the legality filter needs, computed once per call
struct LegalityContext {
    us: Color,
    king: Option<Square>,
    in_check: bool,
    pinned: Bitboard,
}

impl Board {
    /// All pseudo-legal moves for the side to move, in generation order.
    ///
    /// Moves obey piece movement rules but may leave the mover in check.
    #[must_use]
    pub fn generate_pseudo_moves(&self) -> MoveList {
        let mut moves = MoveList::new();
        let color = self.side_to_move;

        for from in self.pieces_of(color, Piece::Pawn) {
            self.generate_pawn_moves(from, &mut moves);
        }
        for from in self.pieces_of(color, Piece::Knight) {
            self.generate_knight_moves(from, &mut moves);
        }
        for from in self.pieces_of(color, Piece::Bishop) {
            self.generate_slider_moves(from, SliderType::Bishop, &mut moves);
        }
        for from in self.pieces_of(color, Piece::Rook) {
            self.generate_slider_moves(from, SliderType::Rook, &mut moves);
        }
        for from in self.pieces_of(color, Piece::Queen) {
            self.generate_slider_moves(from, SliderType::Queen, &mut moves);
        }
        for from in self.pieces_of(color, Piece::King) {
            self.generate_king_moves(from, &mut moves);
        }

        moves
    }

    /// All legal moves for the side to move.
    ///
    /// The order is deterministic for a given position. The board is borrowed
    /// mutably because some candidates are verified by playing them; it is
    /// left exactly as it was found.
    pub fn generate_moves(&mut self) -> MoveList {
        let mut moves = self.generate_pseudo_moves();
        let ctx = self.legality_context();
        moves.retain(|mv| self.is_legal(mv, &ctx));
        moves
    }

    /// True when the side to move has at least one legal move
    pub fn has_legal_moves(&mut self) -> bool {
        let ctx = self.legality_context();
        self.generate_pseudo_moves()
            .into_iter()
            .any(|mv| self.is_legal(mv, &ctx))
    }

    pub fn is_checkmate(&mut self) -> bool {
        let color = self.side_to_move;
        self.is_in_check(color) && !self.has_legal_moves()
    }

    pub fn is_stalemate(&mut self) -> bool {
        let color = self.side_to_move;
        !self.is_in_check(color) && !self.has_legal_moves()
    }

    /// Quiet moves and captures from `from` to every square in `targets`,
    /// ascending by destination
    fn push_targets(&self, from: Square, piece: Piece, targets: u64, moves: &mut MoveList) {
        let targets = Bitboard(targets & !self.occupied_by(self.side_to_move).0);
        for to in targets {
            match self.piece_on(to) {
                Some(victim) => moves.push(Move::capture(from, to, piece, victim)),
                None => moves.push(Move::quiet(from, to, piece)),
            }
        }
    }

    fn legality_context(&self) -> LegalityContext {
        let us = self.side_to_move;
        let king = self.king_square(us);
        let in_check = king.is_some_and(|sq| self.is_square_attacked(sq, us.opponent()));
        let pinned = king.map_or(Bitboard::EMPTY, |sq| self.pinned_pieces(sq, us));
        LegalityContext {
            us,
            king,
            in_check,
            pinned,
        }
    }

    /// Pieces of `color` that are the only blocker between the king on
    /// `king` and an enemy slider
    pub(crate) fn pinned_pieces(&self, king: Square, color: Color) -> Bitboard {
        let them = color.opponent();
        let k = king.index();
        let queens = self.pieces_of(them, Piece::Queen).0;
        let straight = (self.pieces_of(them, Piece::Rook).0 | queens) & rook_attacks(k, 0);
        let diagonal = (self.pieces_of(them, Piece::Bishop).0 | queens) & bishop_attacks(k, 0);

        let mut pinned = 0u64;
        for sniper in Bitboard(straight | diagonal) {
            let blockers = Bitboard(between(k, sniper.index()) & self.all_occupied.0);
            if blockers.popcount() == 1 {
                pinned |= blockers.0 & self.occupied_by(color).0;
            }
        }
        Bitboard(pinned)
    }

    fn is_legal(&mut self, mv: Move, ctx: &LegalityContext) -> bool {
        let Some(king) = ctx.king else {
            return true;
        };

        if mv.is_castling() {
            let them = ctx.us.opponent();
            let passed = Square(king.0, (mv.from().1 + mv.to().1) / 2);
            if ctx.in_check || self.is_square_attacked(passed, them) {
                return false;
            }
        }

        let needs_check = mv.piece() == Piece::King
            || mv.is_en_passant()
            || ctx.in_check
            || ctx.pinned.contains(mv.from());
        if !needs_check {
            return true;
        }

        let undo = self.apply(mv);
        let legal = !self.is_in_check(ctx.us);
        self.revert(mv, undo);
        legal
    }
}
