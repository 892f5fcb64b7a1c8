use std::str::FromStr;

use super::error::{FenError, MoveParseError};
use super::{Board, CastlingRights, Color, Move, Piece, Square, UndoRecord};

impl Board {
    /// Parse a board position from FEN notation.
    ///
    /// The castling and en passant fields are required; the half-move clock
    /// and full-move number default to 0 and 1 when absent. The parsed
    /// position must satisfy [`Board::validate`].
    pub fn try_from_fen(fen: &str) -> Result<Self, FenError> {
        let result = Self::parse_fen(fen);
        if let Err(ref err) = result {
            crate::debug_log!("rejected FEN {fen:?}: {err}");
        }
        result
    }

    fn parse_fen(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(FenError::TooFewParts { found: fields.len() });
        }
        if fields.len() > 6 {
            return Err(FenError::TooManyParts { found: fields.len() });
        }

        let mut board = Board::empty();
        board.place_fen_pieces(fields[0])?;
        board.side_to_move = parse_side(fields[1])?;
        board.castling_rights = parse_castling(fields[2])?;
        board.en_passant_target = match fields[3] {
            "-" => None,
            square => Some(square.parse().map_err(|_| FenError::InvalidEnPassant {
                found: square.to_string(),
            })?),
        };

        if let Some(clock) = fields.get(4) {
            board.halfmove_clock = clock.parse().map_err(|_| FenError::InvalidHalfmoveClock {
                found: (*clock).to_string(),
            })?;
        }
        if let Some(number) = fields.get(5) {
            board.fullmove_number = number
                .parse()
                .ok()
                .filter(|n| *n >= 1)
                .ok_or_else(|| FenError::InvalidFullmoveNumber {
                    found: (*number).to_string(),
                })?;
        }

        board.validate()?;
        board.hash = board.calculate_hash();
        Ok(board)
    }

    /// Fill an empty board from the placement field, rank 8 first
    fn place_fen_pieces(&mut self, placement: &str) -> Result<(), FenError> {
        let rows: Vec<&str> = placement.split('/').collect();
        if rows.len() != 8 {
            return Err(FenError::WrongRankCount { found: rows.len() });
        }

        for (row, rank) in rows.into_iter().zip((0..8).rev()) {
            let mut file = 0;
            let mut after_digit = false;
            for c in row.chars() {
                if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    // Adjacent empty runs must be written as one digit
                    if after_digit {
                        return Err(FenError::InvalidPiece { char: c });
                    }
                    file += skip as usize;
                    after_digit = true;
                    continue;
                }
                after_digit = false;
                let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                if file >= 8 {
                    return Err(FenError::WrongFileCount {
                        rank: rank + 1,
                        files: file + 1,
                    });
                }
                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                self.set_piece(Square(rank, file), color, piece);
                file += 1;
            }
            if file != 8 {
                return Err(FenError::WrongFileCount {
                    rank: rank + 1,
                    files: file,
                });
            }
        }
        Ok(())
    }

    /// Parse a board position from FEN notation.
    ///
    /// # Panics
    /// Panics if the FEN string is invalid. Use `try_from_fen` for fallible parsing.
    #[must_use]
    pub fn from_fen(fen: &str) -> Self {
        match Self::try_from_fen(fen) {
            Ok(board) => board,
            Err(err) => panic!("Invalid FEN string {fen:?}: {err}"),
        }
    }

    /// Convert the board position to FEN notation.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut rows: Vec<String> = Vec::with_capacity(8);
        for rank in (0..8).rev() {
            let mut row = String::new();
            let mut empty = 0;
            for file in 0..8 {
                if let Some((color, piece)) = self.piece_at(Square(rank, file)) {
                    if empty > 0 {
                        row.push_str(&empty.to_string());
                        empty = 0;
                    }
                    row.push(piece.to_fen_char(color));
                } else {
                    empty += 1;
                }
            }
            if empty > 0 {
                row.push_str(&empty.to_string());
            }
            rows.push(row);
        }

        let active = if self.white_to_move() { "w" } else { "b" };
        let ep = self
            .en_passant_target
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{} {} {} {} {} {}",
            rows.join("/"),
            active,
            self.castling_rights,
            ep,
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    /// Parse a move in UCI long algebraic notation (e.g., "e2e4", "e7e8q").
    ///
    /// Returns the matching legal move if found, or an error describing why parsing failed.
    ///
    /// # Example
    /// ```
    /// use chess_perft::board::Board;
    ///
    /// let mut board = Board::new();
    /// let mv = board.parse_move("e2e4").unwrap();
    /// assert_eq!(mv.to_string(), "e2e4");
    /// ```
    pub fn parse_move(&mut self, uci: &str) -> Result<Move, MoveParseError> {
        if !uci.is_ascii() || uci.len() < 4 || uci.len() > 5 {
            return Err(MoveParseError::InvalidLength {
                len: uci.chars().count(),
            });
        }

        let invalid_square = || MoveParseError::InvalidSquare {
            notation: uci.to_string(),
        };
        let from_sq: Square = uci[0..2].parse().map_err(|_| invalid_square())?;
        let to_sq: Square = uci[2..4].parse().map_err(|_| invalid_square())?;

        // Parse promotion piece if present
        let promotion = match uci[4..].chars().next() {
            Some(c) => match Piece::from_char(c) {
                Some(piece) if !matches!(piece, Piece::Pawn | Piece::King) => Some(piece),
                _ => return Err(MoveParseError::InvalidPromotion { char: c }),
            },
            None => None,
        };

        // Find matching legal move
        self.generate_moves()
            .into_iter()
            .find(|mv| mv.from() == from_sq && mv.to() == to_sq && mv.promotion_piece() == promotion)
            .ok_or_else(|| MoveParseError::IllegalMove {
                notation: uci.to_string(),
            })
    }

    /// Parse a UCI move and apply it in one call.
    ///
    /// # Example
    /// ```
    /// use chess_perft::board::Board;
    ///
    /// let mut board = Board::new();
    /// board.make_move_uci("e2e4").unwrap();
    /// board.make_move_uci("e7e5").unwrap();
    /// ```
    pub fn make_move_uci(&mut self, uci: &str) -> Result<(Move, UndoRecord), MoveParseError> {
        let mv = self.parse_move(uci)?;
        let undo = self.apply(mv);
        Ok((mv, undo))
    }
}

fn parse_side(field: &str) -> Result<Color, FenError> {
    match field {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        other => Err(FenError::InvalidSideToMove {
            found: other.to_string(),
        }),
    }
}

fn parse_castling(field: &str) -> Result<CastlingRights, FenError> {
    let mut rights = CastlingRights::none();
    if field == "-" {
        return Ok(rights);
    }
    for c in field.chars() {
        let (color, kingside) = match c {
            'K' => (Color::White, true),
            'Q' => (Color::White, false),
            'k' => (Color::Black, true),
            'q' => (Color::Black, false),
            _ => return Err(FenError::InvalidCastling { char: c }),
        };
        rights.set(color, kingside);
    }
    Ok(rights)
}

impl FromStr for Board {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::try_from_fen(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::error::BoardError;

    #[test]
    fn test_fen_round_trip() {
        let fens = [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 17 42",
        ];
        for fen in fens {
            assert_eq!(Board::from_fen(fen).to_fen(), fen);
        }
    }

    #[test]
    fn test_fen_counters_default() {
        let board = Board::try_from_fen("4k3/8/8/8/8/8/8/4K3 w - -").unwrap();
        assert_eq!(board.halfmove_clock(), 0);
        assert_eq!(board.fullmove_number(), 1);
        assert_eq!(board.to_fen(), "4k3/8/8/8/8/8/8/4K3 w - - 0 1");
    }

    #[test]
    fn test_fen_black_to_move() {
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        let board = Board::try_from_fen(fen).unwrap();
        assert!(!board.white_to_move());
        assert_eq!(board.en_passant_target(), Some(Square(2, 4)));
        assert_eq!(board.hash(), board.calculate_hash());
    }

    #[test]
    fn test_fen_matches_new() {
        let board =
            Board::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_fen_error_too_few_parts() {
        let result = Board::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w");
        assert!(matches!(result, Err(FenError::TooFewParts { found: 2 })));
    }

    #[test]
    fn test_fen_error_too_many_parts() {
        let result =
            Board::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1 x");
        assert!(matches!(result, Err(FenError::TooManyParts { found: 7 })));
    }

    #[test]
    fn test_fen_error_invalid_piece() {
        let result =
            Board::try_from_fen("rnbqkbnr/ppppxppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert!(matches!(result, Err(FenError::InvalidPiece { char: 'x' })));
    }

    #[test]
    fn test_fen_error_rank_and_file_counts() {
        let result = Board::try_from_fen("rnbqkbnr/pppppppp/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert!(matches!(result, Err(FenError::WrongRankCount { found: 7 })));

        let result =
            Board::try_from_fen("rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert!(matches!(result, Err(FenError::InvalidPiece { char: '9' })));

        let result =
            Board::try_from_fen("rnbqkbnr/pppppppp/7/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert!(matches!(
            result,
            Err(FenError::WrongFileCount { rank: 6, files: 7 })
        ));

        let result =
            Board::try_from_fen("rnbqkbnrp/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert!(matches!(
            result,
            Err(FenError::WrongFileCount { rank: 8, files: 9 })
        ));
    }

    #[test]
    fn test_fen_error_consecutive_digits() {
        let result =
            Board::try_from_fen("rnbqkbnr/pppppppp/44/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert!(matches!(result, Err(FenError::InvalidPiece { char: '4' })));

        let result =
            Board::try_from_fen("rnbqkbnr/pppppppp/8/8/3P13/8/PPP1PPPP/RNBQKBNR b KQkq - 0 1");
        assert!(matches!(result, Err(FenError::InvalidPiece { char: '3' })));

        // Digits split by a piece are fine
        assert!(Board::try_from_fen("rnbqkbnr/pppppppp/8/8/3P4/8/PPP1PPPP/RNBQKBNR b KQkq - 0 1").is_ok());
    }

    #[test]
    fn test_fen_error_invalid_side_to_move() {
        let result =
            Board::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1");
        assert!(matches!(result, Err(FenError::InvalidSideToMove { .. })));
    }

    #[test]
    fn test_fen_error_invalid_castling() {
        let result =
            Board::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w XQkq - 0 1");
        assert!(matches!(result, Err(FenError::InvalidCastling { char: 'X' })));
    }

    #[test]
    fn test_fen_error_invalid_en_passant() {
        let result =
            Board::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq z9 0 1");
        assert!(matches!(result, Err(FenError::InvalidEnPassant { .. })));
    }

    #[test]
    fn test_fen_error_inconsistent_en_passant() {
        // No black pawn on e5 behind the claimed target
        let result =
            Board::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e6 0 1");
        assert!(matches!(
            result,
            Err(FenError::IllegalPosition(
                BoardError::InvalidEnPassantTarget { .. }
            ))
        ));
    }

    #[test]
    fn test_fen_error_counters() {
        let result = Board::try_from_fen("4k3/8/8/8/8/8/8/4K3 w - - -3 1");
        assert!(matches!(result, Err(FenError::InvalidHalfmoveClock { .. })));
        let result = Board::try_from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 0");
        assert!(matches!(result, Err(FenError::InvalidFullmoveNumber { .. })));
    }

    #[test]
    fn test_fen_error_illegal_positions() {
        let result = Board::try_from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1");
        assert!(matches!(
            result,
            Err(FenError::IllegalPosition(BoardError::KingCount {
                color: Color::Black,
                found: 0
            }))
        ));

        // White to move while black is already in check
        let result = Board::try_from_fen("4k3/8/8/8/8/8/8/4KR2 w - - 0 1");
        assert!(result.is_ok());
        let result = Board::try_from_fen("4k3/8/8/8/8/8/8/4R1K1 w - - 0 1");
        assert!(matches!(
            result,
            Err(FenError::IllegalPosition(BoardError::OpponentInCheck {
                color: Color::Black
            }))
        ));
    }

    #[test]
    fn test_fen_error_impossible_material() {
        // Three queens next to eight unmoved pawns
        let result = Board::try_from_fen("4k3/8/8/8/8/QQQ5/PPPPPPPP/4K3 w - - 0 1");
        assert_eq!(
            result,
            Err(FenError::IllegalPosition(BoardError::ImpossibleMaterial {
                color: Color::White,
                promoted: 2,
                pawns: 8
            }))
        );

        // Two promotions paid for by two missing pawns
        let board = Board::try_from_fen("4k3/8/8/8/8/QQQ5/PPPPPP2/4K3 w - - 0 1").unwrap();
        assert_eq!(board.pieces_of(Color::White, Piece::Queen).popcount(), 3);

        // Extra pieces of different kinds add up
        assert!(Board::try_from_fen("rrrnnnk1/pppppp2/8/8/8/8/8/4K3 b - - 0 1").is_ok());
        let result = Board::try_from_fen("rrrnnnk1/ppppppp1/8/8/8/8/8/4K3 b - - 0 1");
        assert!(matches!(
            result,
            Err(FenError::IllegalPosition(BoardError::ImpossibleMaterial {
                color: Color::Black,
                promoted: 2,
                pawns: 7
            }))
        ));
    }

    #[test]
    fn test_fen_no_castling() {
        let board =
            Board::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1").unwrap();
        assert!(board.castling_rights().is_empty());
    }

    #[test]
    fn test_fen_partial_castling() {
        let board =
            Board::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w Kq - 0 1").unwrap();
        let rights = board.castling_rights();
        assert!(rights.has(Color::White, true));
        assert!(!rights.has(Color::White, false));
        assert!(!rights.has(Color::Black, true));
        assert!(rights.has(Color::Black, false));
    }

    #[test]
    fn test_parse_move_e2e4() {
        let mut board = Board::new();
        let mv = board.parse_move("e2e4").unwrap();
        assert_eq!(mv.from(), Square(1, 4));
        assert_eq!(mv.to(), Square(3, 4));
        assert!(mv.is_double_pawn_push());
    }

    #[test]
    fn test_parse_move_promotion() {
        let mut board = Board::try_from_fen("8/P7/8/8/8/8/8/K1k5 w - - 0 1").unwrap();
        let mv = board.parse_move("a7a8q").unwrap();
        assert_eq!(mv.promotion_piece(), Some(Piece::Queen));
        let mv = board.parse_move("a7a8n").unwrap();
        assert_eq!(mv.promotion_piece(), Some(Piece::Knight));
    }

    #[test]
    fn test_parse_move_castling() {
        let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        assert!(board.parse_move("e1g1").unwrap().is_castle_kingside());
        assert!(board.parse_move("e1c1").unwrap().is_castle_queenside());
    }

    #[test]
    fn test_parse_move_error_invalid_length() {
        let mut board = Board::new();
        let result = board.parse_move("e2");
        assert!(matches!(result, Err(MoveParseError::InvalidLength { len: 2 })));
    }

    #[test]
    fn test_parse_move_error_invalid_square() {
        let mut board = Board::new();
        let result = board.parse_move("z9z9");
        assert!(matches!(result, Err(MoveParseError::InvalidSquare { .. })));
    }

    #[test]
    fn test_parse_move_error_illegal() {
        let mut board = Board::new();
        let result = board.parse_move("e2e5"); // Pawn can't move 3 squares
        assert!(matches!(result, Err(MoveParseError::IllegalMove { .. })));
        // Promotion suffix on a non-promoting move
        let result = board.parse_move("e2e4q");
        assert!(matches!(result, Err(MoveParseError::IllegalMove { .. })));
    }

    #[test]
    fn test_parse_move_error_invalid_promotion() {
        let mut board = Board::try_from_fen("8/P7/8/8/8/8/8/K1k5 w - - 0 1").unwrap();
        // Promote to pawn is invalid
        let result = board.parse_move("a7a8p");
        assert!(matches!(
            result,
            Err(MoveParseError::InvalidPromotion { char: 'p' })
        ));
    }

    #[test]
    fn test_from_str_trait() {
        let board: Board = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
            .parse()
            .unwrap();
        assert!(board.white_to_move());
    }

    #[test]
    fn test_make_move_uci() {
        let mut board = Board::new();
        let (mv, undo) = board.make_move_uci("e2e4").unwrap();
        assert!(!board.white_to_move()); // Black to move after e4
        board.revert(mv, undo);
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_halfmove_clock_parsing() {
        let board = Board::try_from_fen("8/8/8/8/8/8/8/K1k5 w - - 42 1").unwrap();
        assert_eq!(board.halfmove_clock(), 42);
    }
}
