use super::super::attack_tables::{bishop_attacks, queen_attacks, rook_attacks};
use super::super::{Board, MoveList, Piece, Square};

/// Type of sliding piece for move generation
#[derive(Clone, Copy)]
pub(crate) enum SliderType {
    Bishop,
    Rook,
    Queen,
}

impl SliderType {
    fn piece(self) -> Piece {
        match self {
            SliderType::Bishop => Piece::Bishop,
            SliderType::Rook => Piece::Rook,
            SliderType::Queen => Piece::Queen,
        }
    }
}

impl Board {
    pub(crate) fn generate_slider_moves(&self, from: Square, slider: SliderType, moves: &mut MoveList) {
        let from_idx = from.index();
        let occupied = self.all_occupied.0;

        let targets = match slider {
            SliderType::Bishop => bishop_attacks(from_idx, occupied),
            SliderType::Rook => rook_attacks(from_idx, occupied),
            SliderType::Queen => queen_attacks(from_idx, occupied),
        };

        self.push_targets(from, slider.piece(), targets, moves);
    }
}
