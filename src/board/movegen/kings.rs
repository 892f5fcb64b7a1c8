use super::super::attack_tables::{
    bishop_attacks, queen_attacks, rook_attacks, KING_ATTACKS, KNIGHT_ATTACKS, PAWN_ATTACKS,
};
use super::super::{Bitboard, Board, Color, Move, MoveList, Piece, Square};

impl Board {
    /// Steps ascending by destination, then castling king-side before queen-side.
    ///
    /// Castling is emitted when the right is held, the king and rook stand on
    /// their home squares and the squares between them are empty. Attacked
    /// squares are left to the legality filter.
    pub(crate) fn generate_king_moves(&self, from: Square, moves: &mut MoveList) {
        self.push_targets(from, Piece::King, KING_ATTACKS[from.index()], moves);

        let color = self.side_to_move;
        let back_rank = color.back_rank();
        if from != Square(back_rank, 4) {
            return;
        }

        if self.castling_rights.has(color, true)
            && self.is_empty(Square(back_rank, 5))
            && self.is_empty(Square(back_rank, 6))
            && self.piece_at(Square(back_rank, 7)) == Some((color, Piece::Rook))
        {
            moves.push(Move::castle_kingside(from, Square(back_rank, 6)));
        }
        if self.castling_rights.has(color, false)
            && self.is_empty(Square(back_rank, 1))
            && self.is_empty(Square(back_rank, 2))
            && self.is_empty(Square(back_rank, 3))
            && self.piece_at(Square(back_rank, 0)) == Some((color, Piece::Rook))
        {
            moves.push(Move::castle_queenside(from, Square(back_rank, 2)));
        }
    }

    #[must_use]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(color, Piece::King).first()
    }

    /// Pieces of `attacker_color` attacking `square` with the current occupancy
    #[must_use]
    pub fn attackers_to(&self, square: Square, attacker_color: Color) -> Bitboard {
        let target_idx = square.index();
        let occupied = self.all_occupied.0;
        let pieces = |piece| self.pieces_of(attacker_color, piece).0;

        // A pawn of `attacker_color` hits `square` iff a pawn of the other
        // color on `square` would hit the pawn
        let pawn_sources = PAWN_ATTACKS[attacker_color.opponent().index()][target_idx];
        let queens = pieces(Piece::Queen);

        Bitboard(
            (pieces(Piece::Pawn) & pawn_sources)
                | (pieces(Piece::Knight) & KNIGHT_ATTACKS[target_idx])
                | (pieces(Piece::King) & KING_ATTACKS[target_idx])
                | ((pieces(Piece::Rook) | queens) & rook_attacks(target_idx, occupied))
                | ((pieces(Piece::Bishop) | queens) & bishop_attacks(target_idx, occupied)),
        )
    }

    #[must_use]
    pub fn is_square_attacked(&self, square: Square, attacker_color: Color) -> bool {
        !self.attackers_to(square, attacker_color).is_empty()
    }

    /// True when `color`'s king is attacked; a board without that king is never in check
    #[must_use]
    pub fn is_in_check(&self, color: Color) -> bool {
        self.king_square(color)
            .is_some_and(|king_sq| self.is_square_attacked(king_sq, color.opponent()))
    }

    /// Every square attacked by at least one piece of `color`
    #[must_use]
    pub fn attacked_squares(&self, color: Color) -> Bitboard {
        let occupied = self.all_occupied.0;
        let mut attacked = 0u64;
        for piece in Piece::ALL {
            for sq in self.pieces_of(color, piece) {
                let idx = sq.index();
                attacked |= match piece {
                    Piece::Pawn => PAWN_ATTACKS[color.index()][idx],
                    Piece::Knight => KNIGHT_ATTACKS[idx],
                    Piece::Bishop => bishop_attacks(idx, occupied),
                    Piece::Rook => rook_attacks(idx, occupied),
                    Piece::Queen => queen_attacks(idx, occupied),
                    Piece::King => KING_ATTACKS[idx],
                };
            }
        }
        Bitboard(attacked)
    }
}
