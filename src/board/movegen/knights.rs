use super::super::attack_tables::KNIGHT_ATTACKS;
use super::super::{Board, MoveList, Piece, Square};

impl Board {
    pub(crate) fn generate_knight_moves(&self, from: Square, moves: &mut MoveList) {
        self.push_targets(from, Piece::Knight, KNIGHT_ATTACKS[from.index()], moves);
    }
}
