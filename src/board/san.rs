//! Standard Algebraic Notation (SAN).
//!
//! SAN is the notation of scoresheets and PGN files: "e4", "Nf3", "Bxc6+",
//! "O-O", "exd6", "e8=Q#". Both directions work against the current
//! position, since disambiguation and the check suffix depend on it.
//!
//! # Examples
//! ```
//! use chess_perft::board::Board;
//!
//! let mut board = Board::new();
//! let mv = board.parse_san("Nf3").unwrap();
//! assert_eq!(mv.to_string(), "g1f3");
//! assert_eq!(board.move_to_san(mv), "Nf3");
//! ```

use super::error::SanError;
use super::types::{file_to_index, rank_to_index};
use super::{Board, Move, Piece, Square, UndoRecord};

fn file_char(file: usize) -> char {
    (b'a' + file as u8) as char
}

fn rank_char(rank: usize) -> char {
    (b'1' + rank as u8) as char
}

/// `Some(true)` for a kingside castle token, `Some(false)` for queenside
fn castling_side(body: &str) -> Option<bool> {
    match body {
        "O-O" | "0-0" => Some(true),
        "O-O-O" | "0-0-0" => Some(false),
        _ => None,
    }
}

fn promotion_target(c: char) -> Result<Piece, SanError> {
    match Piece::from_char(c) {
        Some(piece @ (Piece::Knight | Piece::Bishop | Piece::Rook | Piece::Queen)) => Ok(piece),
        _ => Err(SanError::InvalidPromotion { char: c }),
    }
}

/// Split "e8=Q" or "e8Q" into the move body and the promotion piece
fn split_promotion(body: &str) -> Result<(&str, Option<Piece>), SanError> {
    if let Some((head, promo)) = body.split_once('=') {
        let mut chars = promo.chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => Ok((head, Some(promotion_target(c)?))),
            (Some(_), Some(extra)) => Err(SanError::InvalidPromotion { char: extra }),
            (None, _) => Err(SanError::InvalidPromotion { char: '=' }),
        };
    }
    match body.chars().last() {
        Some(c) if c.is_ascii_uppercase() && body.len() > 1 => {
            Ok((&body[..body.len() - 1], Some(promotion_target(c)?)))
        }
        _ => Ok((body, None)),
    }
}

impl Board {
    /// Format a legal move in Standard Algebraic Notation.
    ///
    /// Takes `&mut self` because disambiguation and the `+`/`#` suffix need
    /// the legal moves here and after the move; the board is restored.
    pub fn move_to_san(&mut self, mv: Move) -> String {
        let mut san = String::new();

        if mv.is_castling() {
            san.push_str(if mv.is_castle_kingside() { "O-O" } else { "O-O-O" });
        } else {
            let piece = mv.piece();
            if piece == Piece::Pawn {
                if mv.is_capture() {
                    san.push(file_char(mv.from().file()));
                }
            } else {
                san.push(piece.to_char().to_ascii_uppercase());
                self.push_disambiguation(mv, &mut san);
            }
            if mv.is_capture() {
                san.push('x');
            }
            san.push_str(&mv.to().to_string());
            if let Some(promo) = mv.promotion_piece() {
                san.push('=');
                san.push(promo.to_char().to_ascii_uppercase());
            }
        }

        let mut after = self.play(mv);
        let gives_check = after.is_in_check(after.side_to_move());
        if gives_check {
            san.push(if after.has_legal_moves() { '+' } else { '#' });
        }
        san
    }

    /// File, rank or full origin square, as little as tells `mv` apart from
    /// other moves of the same piece kind to the same square
    fn push_disambiguation(&mut self, mv: Move, san: &mut String) {
        let from = mv.from();
        let rivals: Vec<Square> = self
            .generate_moves()
            .into_iter()
            .filter(|other| {
                other.piece() == mv.piece() && other.to() == mv.to() && other.from() != from
            })
            .map(|other| other.from())
            .collect();

        if rivals.is_empty() {
            return;
        }
        if rivals.iter().all(|sq| sq.file() != from.file()) {
            san.push(file_char(from.file()));
        } else if rivals.iter().all(|sq| sq.rank() != from.rank()) {
            san.push(rank_char(from.rank()));
        } else {
            san.push_str(&from.to_string());
        }
    }

    /// Parse a move in Standard Algebraic Notation.
    ///
    /// Accepts `x` for captures, `0-0` for castling, promotions with or
    /// without `=`, and trailing `+`, `#`, `!` and `?` annotations. Extra
    /// disambiguation is allowed; missing disambiguation is an error.
    pub fn parse_san(&mut self, san: &str) -> Result<Move, SanError> {
        let san = san.trim();
        let body = san.trim_end_matches(['+', '#', '!', '?']);
        if body.is_empty() {
            return Err(SanError::Empty);
        }
        let no_match = || SanError::NoMatchingMove {
            san: san.to_string(),
        };

        if let Some(kingside) = castling_side(body) {
            return self
                .generate_moves()
                .into_iter()
                .find(|mv| mv.is_castling() && mv.is_castle_kingside() == kingside)
                .ok_or_else(no_match);
        }

        let (body, promotion) = split_promotion(body)?;
        let piece = match body.chars().next() {
            Some(c) if c.is_ascii_uppercase() => match Piece::from_char(c) {
                Some(piece) if piece != Piece::Pawn => piece,
                _ => return Err(SanError::InvalidPiece { char: c }),
            },
            _ => Piece::Pawn,
        };
        let rest = if piece == Piece::Pawn { body } else { &body[1..] };

        let invalid_square = || SanError::InvalidSquare {
            notation: san.to_string(),
        };
        let squares: String = rest.chars().filter(|&c| c != 'x').collect();
        if squares.len() < 2 || !squares.is_ascii() {
            return Err(invalid_square());
        }
        let (hint, dest) = squares.split_at(squares.len() - 2);
        let dest: Square = dest.parse().map_err(|_| invalid_square())?;

        let mut file = None;
        let mut rank = None;
        for c in hint.chars() {
            match c {
                'a'..='h' if file.is_none() && rank.is_none() => file = Some(file_to_index(c)),
                '1'..='8' if rank.is_none() => rank = Some(rank_to_index(c)),
                _ => return Err(invalid_square()),
            }
        }

        let mut candidates = self.generate_moves().into_iter().filter(|mv| {
            mv.piece() == piece
                && mv.to() == dest
                && mv.promotion_piece() == promotion
                && file.map_or(true, |f| mv.from().file() == f)
                && rank.map_or(true, |r| mv.from().rank() == r)
        });
        match (candidates.next(), candidates.next()) {
            (Some(mv), None) => Ok(mv),
            (None, _) => Err(no_match()),
            (Some(_), Some(_)) => Err(SanError::AmbiguousMove {
                san: san.to_string(),
            }),
        }
    }

    /// Parse a SAN move and apply it in one call.
    pub fn make_move_san(&mut self, san: &str) -> Result<(Move, UndoRecord), SanError> {
        let mv = self.parse_san(san)?;
        let undo = self.apply(mv);
        Ok((mv, undo))
    }
}
