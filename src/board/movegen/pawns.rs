use super::super::{Board, Move, MoveList, Piece, Square, PROMOTION_PIECES};

impl Board {
    /// Pushes first (single, then double), then captures towards the a-file
    /// and the h-file, en passant in place of an ordinary capture.
    pub(crate) fn generate_pawn_moves(&self, from: Square, moves: &mut MoveList) {
        let color = self.side_to_move;
        let dir = color.pawn_direction();
        let promotion_rank = color.pawn_promotion_rank();

        let Some(forward_sq) = from.offset(dir, 0) else {
            return;
        };

        if self.is_empty(forward_sq) {
            if forward_sq.0 == promotion_rank {
                for promo in PROMOTION_PIECES {
                    moves.push(Move::promotion(from, forward_sq, promo));
                }
            } else {
                moves.push(Move::quiet(from, forward_sq, Piece::Pawn));
                if from.0 == color.pawn_start_rank() {
                    if let Some(double_sq) = forward_sq.offset(dir, 0) {
                        if self.is_empty(double_sq) {
                            moves.push(Move::double_pawn_push(from, double_sq));
                        }
                    }
                }
            }
        }

        for df in [-1, 1] {
            let Some(target_sq) = from.offset(dir, df) else {
                continue;
            };
            match self.piece_at(target_sq) {
                Some((target_color, victim)) if target_color != color => {
                    if target_sq.0 == promotion_rank {
                        for promo in PROMOTION_PIECES {
                            moves.push(Move::promotion_capture(from, target_sq, promo, victim));
                        }
                    } else {
                        moves.push(Move::capture(from, target_sq, Piece::Pawn, victim));
                    }
                }
                None if Some(target_sq) == self.en_passant_target => {
                    moves.push(Move::en_passant(from, target_sq));
                }
                _ => {}
            }
        }
    }
}
