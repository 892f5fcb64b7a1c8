//! Move types and move list.

use std::fmt;
use std::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::Piece;
use super::square::Square;

// Move flags (4 bits, values 0-15)
const FLAG_QUIET: u32 = 0;
const FLAG_DOUBLE_PAWN: u32 = 1;
const FLAG_CASTLE_KINGSIDE: u32 = 2;
const FLAG_CASTLE_QUEENSIDE: u32 = 3;
const FLAG_CAPTURE: u32 = 4;
const FLAG_EN_PASSANT: u32 = 5;
// 6-7 reserved
const FLAG_PROMO_KNIGHT: u32 = 8;
const FLAG_PROMO_BISHOP: u32 = 9;
const FLAG_PROMO_ROOK: u32 = 10;
const FLAG_PROMO_QUEEN: u32 = 11;
const FLAG_PROMO_CAPTURE_KNIGHT: u32 = 12;
const FLAG_PROMO_CAPTURE_BISHOP: u32 = 13;
const FLAG_PROMO_CAPTURE_ROOK: u32 = 14;
const FLAG_PROMO_CAPTURE_QUEEN: u32 = 15;

const NO_PIECE: u32 = 7;

/// Compact 32-bit move representation.
///
/// Encoding:
/// - bits 0-5:   from square (0-63)
/// - bits 6-11:  to square (0-63)
/// - bits 12-15: flags (move type)
/// - bits 16-18: moving piece
/// - bits 19-21: captured piece (7 = none)
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Move(u32);

impl Move {
    /// Create a null/empty move (used for initialization)
    #[inline]
    #[must_use]
    pub const fn null() -> Self {
        Move(NO_PIECE << 19)
    }

    /// Create a quiet move (no capture, no special flags)
    #[inline]
    #[must_use]
    pub const fn quiet(from: Square, to: Square, piece: Piece) -> Self {
        Move::encode(from, to, FLAG_QUIET, piece, None)
    }

    /// Create a capture move
    #[inline]
    #[must_use]
    pub const fn capture(from: Square, to: Square, piece: Piece, victim: Piece) -> Self {
        Move::encode(from, to, FLAG_CAPTURE, piece, Some(victim))
    }

    /// Create a double pawn push move
    #[inline]
    #[must_use]
    pub const fn double_pawn_push(from: Square, to: Square) -> Self {
        Move::encode(from, to, FLAG_DOUBLE_PAWN, Piece::Pawn, None)
    }

    /// Create an en passant capture; `to` is the en passant target square
    #[inline]
    #[must_use]
    pub const fn en_passant(from: Square, to: Square) -> Self {
        Move::encode(from, to, FLAG_EN_PASSANT, Piece::Pawn, Some(Piece::Pawn))
    }

    /// Create a kingside castle move (king's origin and destination)
    #[inline]
    #[must_use]
    pub const fn castle_kingside(from: Square, to: Square) -> Self {
        Move::encode(from, to, FLAG_CASTLE_KINGSIDE, Piece::King, None)
    }

    /// Create a queenside castle move (king's origin and destination)
    #[inline]
    #[must_use]
    pub const fn castle_queenside(from: Square, to: Square) -> Self {
        Move::encode(from, to, FLAG_CASTLE_QUEENSIDE, Piece::King, None)
    }

    /// Create a promotion move (non-capture)
    #[inline]
    #[must_use]
    pub const fn promotion(from: Square, to: Square, piece: Piece) -> Self {
        let flag = match piece {
            Piece::Knight => FLAG_PROMO_KNIGHT,
            Piece::Bishop => FLAG_PROMO_BISHOP,
            Piece::Rook => FLAG_PROMO_ROOK,
            _ => FLAG_PROMO_QUEEN,
        };
        Move::encode(from, to, flag, Piece::Pawn, None)
    }

    /// Create a promotion capture move
    #[inline]
    #[must_use]
    pub const fn promotion_capture(from: Square, to: Square, piece: Piece, victim: Piece) -> Self {
        let flag = match piece {
            Piece::Knight => FLAG_PROMO_CAPTURE_KNIGHT,
            Piece::Bishop => FLAG_PROMO_CAPTURE_BISHOP,
            Piece::Rook => FLAG_PROMO_CAPTURE_ROOK,
            _ => FLAG_PROMO_CAPTURE_QUEEN,
        };
        Move::encode(from, to, flag, Piece::Pawn, Some(victim))
    }

    #[inline]
    const fn encode(
        from: Square,
        to: Square,
        flag: u32,
        piece: Piece,
        captured: Option<Piece>,
    ) -> Self {
        let captured_bits = match captured {
            Some(p) => p.index() as u32,
            None => NO_PIECE,
        };
        Move(
            from.index() as u32
                | ((to.index() as u32) << 6)
                | (flag << 12)
                | ((piece.index() as u32) << 16)
                | (captured_bits << 19),
        )
    }

    /// Get the source square
    #[inline]
    #[must_use]
    pub const fn from(self) -> Square {
        Square::from_index((self.0 & 0x3F) as usize)
    }

    /// Get the destination square
    #[inline]
    #[must_use]
    pub const fn to(self) -> Square {
        Square::from_index(((self.0 >> 6) & 0x3F) as usize)
    }

    #[inline]
    const fn flag(self) -> u32 {
        (self.0 >> 12) & 0xF
    }

    /// The piece kind standing on the origin square before the move
    #[inline]
    #[must_use]
    pub fn piece(self) -> Piece {
        Piece::from_index(((self.0 >> 16) & 0x7) as usize).unwrap_or(Piece::Pawn)
    }

    /// The piece kind removed from the board by this move, if any
    #[inline]
    #[must_use]
    pub fn captured(self) -> Option<Piece> {
        Piece::from_index(((self.0 >> 19) & 0x7) as usize)
    }

    /// Square of the captured piece; differs from `to()` only for en passant
    #[inline]
    #[must_use]
    pub const fn capture_square(self) -> Square {
        if self.is_en_passant() {
            Square(self.from().0, self.to().1)
        } else {
            self.to()
        }
    }

    /// Returns true if this move captures a piece (including en passant)
    #[inline]
    #[must_use]
    pub const fn is_capture(self) -> bool {
        let f = self.flag();
        f == FLAG_CAPTURE || f == FLAG_EN_PASSANT || f >= FLAG_PROMO_CAPTURE_KNIGHT
    }

    #[inline]
    #[must_use]
    pub const fn is_en_passant(self) -> bool {
        self.flag() == FLAG_EN_PASSANT
    }

    /// Returns true if this move is castling (kingside or queenside)
    #[inline]
    #[must_use]
    pub const fn is_castling(self) -> bool {
        let f = self.flag();
        f == FLAG_CASTLE_KINGSIDE || f == FLAG_CASTLE_QUEENSIDE
    }

    #[inline]
    #[must_use]
    pub const fn is_castle_kingside(self) -> bool {
        self.flag() == FLAG_CASTLE_KINGSIDE
    }

    #[inline]
    #[must_use]
    pub const fn is_castle_queenside(self) -> bool {
        self.flag() == FLAG_CASTLE_QUEENSIDE
    }

    #[inline]
    #[must_use]
    pub const fn is_double_pawn_push(self) -> bool {
        self.flag() == FLAG_DOUBLE_PAWN
    }

    #[inline]
    #[must_use]
    pub const fn is_promotion(self) -> bool {
        self.flag() >= FLAG_PROMO_KNIGHT
    }

    /// Get the promotion piece, if this is a promotion move
    #[inline]
    #[must_use]
    pub const fn promotion_piece(self) -> Option<Piece> {
        match self.flag() {
            FLAG_PROMO_KNIGHT | FLAG_PROMO_CAPTURE_KNIGHT => Some(Piece::Knight),
            FLAG_PROMO_BISHOP | FLAG_PROMO_CAPTURE_BISHOP => Some(Piece::Bishop),
            FLAG_PROMO_ROOK | FLAG_PROMO_CAPTURE_ROOK => Some(Piece::Rook),
            FLAG_PROMO_QUEEN | FLAG_PROMO_CAPTURE_QUEEN => Some(Piece::Queen),
            _ => None,
        }
    }

    /// Rook origin and destination for a castling move
    #[inline]
    #[must_use]
    pub(crate) const fn castling_rook_squares(self) -> (Square, Square) {
        let rank = self.from().0;
        if self.is_castle_kingside() {
            (Square(rank, 7), Square(rank, 5))
        } else {
            (Square(rank, 0), Square(rank, 3))
        }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({}{} {}", self.from(), self.to(), self.piece())?;
        if let Some(promo) = self.promotion_piece() {
            write!(f, "={}", promo.to_char().to_ascii_uppercase())?;
        }
        if let Some(victim) = self.captured() {
            write!(f, " x{victim}")?;
        }
        if self.is_castling() {
            write!(f, " castle")?;
        }
        if self.is_en_passant() {
            write!(f, " ep")?;
        }
        if self.is_double_pawn_push() {
            write!(f, " double")?;
        }
        write!(f, ")")
    }
}

/// UCI long algebraic notation (`e2e4`, `e7e8q`, castling as `e1g1`)
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from(), self.to())?;
        if let Some(promo) = self.promotion_piece() {
            write!(f, "{}", promo.to_char())?;
        }
        Ok(())
    }
}

pub(crate) const MAX_MOVES: usize = 256;
pub(crate) const EMPTY_MOVE: Move = Move::null();

/// List of moves with fixed-size backing array.
#[derive(Clone, Debug)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: usize,
}

impl MoveList {
    pub(crate) fn new() -> Self {
        MoveList {
            moves: [EMPTY_MOVE; MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, mv: Move) {
        debug_assert!(self.len < MAX_MOVES, "move list overflow");
        self.moves[self.len] = mv;
        self.len += 1;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    #[must_use]
    pub fn get(&self, idx: usize) -> Option<Move> {
        self.as_slice().get(idx).copied()
    }

    #[must_use]
    pub fn contains(&self, mv: &Move) -> bool {
        self.as_slice().contains(mv)
    }

    /// Keep only the moves for which `keep` returns true, preserving order
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(Move) -> bool) {
        let mut write = 0;
        for read in 0..self.len {
            let mv = self.moves[read];
            if keep(mv) {
                self.moves[write] = mv;
                write += 1;
            }
        }
        self.len = write;
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl Default for MoveList {
    fn default() -> Self {
        MoveList::new()
    }
}

/// Owning iterator over moves in a `MoveList`
pub struct MoveListIntoIter {
    list: MoveList,
    idx: usize,
}

impl Iterator for MoveListIntoIter {
    type Item = Move;

    fn next(&mut self) -> Option<Self::Item> {
        if self.idx < self.list.len {
            let mv = self.list.moves[self.idx];
            self.idx += 1;
            Some(mv)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.list.len - self.idx;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for MoveListIntoIter {}

impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = MoveListIntoIter;

    fn into_iter(self) -> Self::IntoIter {
        MoveListIntoIter { list: self, idx: 0 }
    }
}

impl Index<usize> for MoveList {
    type Output = Move;

    fn index(&self, idx: usize) -> &Self::Output {
        assert!(
            idx < self.len,
            "MoveList index {} out of bounds (len {})",
            idx,
            self.len
        );
        &self.moves[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_move_fields() {
        let mv = Move::quiet(Square(0, 6), Square(2, 5), Piece::Knight);
        assert_eq!(mv.from(), Square(0, 6));
        assert_eq!(mv.to(), Square(2, 5));
        assert_eq!(mv.piece(), Piece::Knight);
        assert_eq!(mv.captured(), None);
        assert!(!mv.is_capture());
        assert_eq!(mv.to_string(), "g1f3");
    }

    #[test]
    fn test_promotion_capture_fields() {
        let mv = Move::promotion_capture(Square(6, 1), Square(7, 0), Piece::Knight, Piece::Rook);
        assert_eq!(mv.piece(), Piece::Pawn);
        assert_eq!(mv.captured(), Some(Piece::Rook));
        assert_eq!(mv.promotion_piece(), Some(Piece::Knight));
        assert!(mv.is_capture());
        assert!(mv.is_promotion());
        assert_eq!(mv.to_string(), "b7a8n");
    }

    #[test]
    fn test_en_passant_capture_square() {
        let mv = Move::en_passant(Square(4, 4), Square(5, 3));
        assert!(mv.is_en_passant());
        assert!(mv.is_capture());
        assert_eq!(mv.captured(), Some(Piece::Pawn));
        assert_eq!(mv.capture_square(), Square(4, 3));
    }

    #[test]
    fn test_castling_rook_squares() {
        let ks = Move::castle_kingside(Square(7, 4), Square(7, 6));
        assert_eq!(ks.castling_rook_squares(), (Square(7, 7), Square(7, 5)));
        let qs = Move::castle_queenside(Square(0, 4), Square(0, 2));
        assert_eq!(qs.castling_rook_squares(), (Square(0, 0), Square(0, 3)));
        assert_eq!(qs.piece(), Piece::King);
        assert_eq!(qs.to_string(), "e1c1");
    }

    #[test]
    fn test_move_list_retain_preserves_order() {
        let mut list = MoveList::new();
        for file in 0..8 {
            list.push(Move::quiet(Square(1, file), Square(2, file), Piece::Pawn));
        }
        list.retain(|mv| mv.from().1 % 2 == 0);
        let files: Vec<usize> = list.iter().map(|mv| mv.from().1).collect();
        assert_eq!(files, vec![0, 2, 4, 6]);
    }
}
