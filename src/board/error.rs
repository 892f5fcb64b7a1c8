//! Error types for board construction, FEN parsing and move parsing.

use std::fmt;

use super::types::Color;

/// Error type for FEN parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// FEN string has too few parts (needs at least 4)
    TooFewParts { found: usize },
    /// FEN string has more than the six standard fields
    TooManyParts { found: usize },
    /// Invalid piece character in position string
    InvalidPiece { char: char },
    /// Placement field does not have exactly eight ranks
    WrongRankCount { found: usize },
    /// A rank describes fewer or more than eight files
    WrongFileCount { rank: usize, files: usize },
    /// Invalid castling character
    InvalidCastling { char: char },
    /// Invalid side to move (must be 'w' or 'b')
    InvalidSideToMove { found: String },
    /// Invalid en passant square
    InvalidEnPassant { found: String },
    /// Half-move clock is not a non-negative integer
    InvalidHalfmoveClock { found: String },
    /// Full-move number is not a positive integer
    InvalidFullmoveNumber { found: String },
    /// Placement parsed but violates a position invariant
    IllegalPosition(BoardError),
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::TooFewParts { found } => {
                write!(f, "FEN must have at least 4 parts, found {found}")
            }
            FenError::TooManyParts { found } => {
                write!(f, "FEN must have at most 6 parts, found {found}")
            }
            FenError::InvalidPiece { char } => {
                write!(f, "Invalid piece character '{char}' in FEN")
            }
            FenError::WrongRankCount { found } => {
                write!(f, "FEN placement must have 8 ranks, found {found}")
            }
            FenError::WrongFileCount { rank, files } => {
                write!(f, "Rank {rank} of FEN placement covers {files} files, expected 8")
            }
            FenError::InvalidCastling { char } => {
                write!(f, "Invalid castling character '{char}' in FEN")
            }
            FenError::InvalidSideToMove { found } => {
                write!(f, "Invalid side to move '{found}', expected 'w' or 'b'")
            }
            FenError::InvalidEnPassant { found } => {
                write!(f, "Invalid en passant square '{found}'")
            }
            FenError::InvalidHalfmoveClock { found } => {
                write!(f, "Invalid half-move clock '{found}'")
            }
            FenError::InvalidFullmoveNumber { found } => {
                write!(f, "Invalid full-move number '{found}'")
            }
            FenError::IllegalPosition(err) => write!(f, "Illegal position: {err}"),
        }
    }
}

impl std::error::Error for FenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FenError::IllegalPosition(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BoardError> for FenError {
    fn from(err: BoardError) -> Self {
        FenError::IllegalPosition(err)
    }
}

/// Violations of the position invariants, reported by `Board::validate`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// A side does not have exactly one king
    KingCount { color: Color, found: u32 },
    /// A pawn stands on the first or eighth rank
    PawnOnBackRank { color: Color },
    /// More than 16 pieces or more than 8 pawns for one side
    TooManyPieces { color: Color, found: u32 },
    /// More promoted pieces than missing pawns
    ImpossibleMaterial { color: Color, promoted: u32, pawns: u32 },
    /// The side that just moved left its king attacked
    OpponentInCheck { color: Color },
    /// En passant target is not behind a pawn that just double-pushed
    InvalidEnPassantTarget { square: String },
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::KingCount { color, found } => {
                write!(f, "{color} must have exactly one king, found {found}")
            }
            BoardError::PawnOnBackRank { color } => {
                write!(f, "{color} has a pawn on a back rank")
            }
            BoardError::TooManyPieces { color, found } => {
                write!(f, "{color} has too many pieces ({found})")
            }
            BoardError::ImpossibleMaterial {
                color,
                promoted,
                pawns,
            } => write!(
                f,
                "{color} has {promoted} promoted pieces but only {} pawns are missing",
                8u32.saturating_sub(*pawns)
            ),
            BoardError::OpponentInCheck { color } => {
                write!(f, "{color} is in check but it is not their move")
            }
            BoardError::InvalidEnPassantTarget { square } => {
                write!(f, "En passant target {square} does not follow a double pawn push")
            }
        }
    }
}

impl std::error::Error for BoardError {}

/// Error type for move parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    /// Move string has invalid length (must be 4-5 characters)
    InvalidLength { len: usize },
    /// Invalid square notation in move
    InvalidSquare { notation: String },
    /// Invalid promotion piece
    InvalidPromotion { char: char },
    /// Move is not legal in the current position
    IllegalMove { notation: String },
}

impl fmt::Display for MoveParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveParseError::InvalidLength { len } => {
                write!(f, "Move must be 4-5 characters, found {len}")
            }
            MoveParseError::InvalidSquare { notation } => {
                write!(f, "Invalid square notation in '{notation}'")
            }
            MoveParseError::InvalidPromotion { char } => {
                write!(f, "Invalid promotion piece '{char}'")
            }
            MoveParseError::IllegalMove { notation } => {
                write!(f, "Illegal move '{notation}'")
            }
        }
    }
}

impl std::error::Error for MoveParseError {}

/// Error type for Standard Algebraic Notation parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SanError {
    /// Empty SAN string
    Empty,
    /// Invalid piece character
    InvalidPiece { char: char },
    /// Destination or disambiguation is not a square, file or rank
    InvalidSquare { notation: String },
    /// Invalid promotion piece
    InvalidPromotion { char: char },
    /// Ambiguous move (multiple pieces can reach the target)
    AmbiguousMove { san: String },
    /// No matching legal move found
    NoMatchingMove { san: String },
}

impl fmt::Display for SanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SanError::Empty => write!(f, "Empty SAN string"),
            SanError::InvalidPiece { char } => {
                write!(f, "Invalid piece character '{char}' in SAN")
            }
            SanError::InvalidSquare { notation } => {
                write!(f, "Invalid square in SAN '{notation}'")
            }
            SanError::InvalidPromotion { char } => {
                write!(f, "Invalid promotion piece '{char}'")
            }
            SanError::AmbiguousMove { san } => write!(f, "Ambiguous move '{san}'"),
            SanError::NoMatchingMove { san } => write!(f, "No legal move matches '{san}'"),
        }
    }
}

impl std::error::Error for SanError {}

/// Error type for PGN import failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PgnError {
    /// A tag, comment or variation is never closed
    Unterminated { delimiter: char },
    /// A closing delimiter without its opener
    Unexpected { char: char },
    /// Tag pair is not `[Name "value"]`
    InvalidTag { tag: String },
    /// `SetUp "1"` without a `FEN` tag
    MissingFen,
    /// The `FEN` tag does not describe a legal position
    Fen(FenError),
    /// A movetext token is not a legal move at its ply (1-based)
    Move {
        ply: usize,
        san: String,
        error: SanError,
    },
}

impl fmt::Display for PgnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PgnError::Unterminated { delimiter } => {
                write!(f, "Unterminated '{delimiter}' in PGN")
            }
            PgnError::Unexpected { char } => write!(f, "Unexpected '{char}' in PGN"),
            PgnError::InvalidTag { tag } => write!(f, "Invalid PGN tag pair [{tag}]"),
            PgnError::MissingFen => write!(f, "PGN has SetUp \"1\" but no FEN tag"),
            PgnError::Fen(err) => write!(f, "Invalid FEN tag: {err}"),
            PgnError::Move { ply, san, error } => {
                write!(f, "Move '{san}' at ply {ply}: {error}")
            }
        }
    }
}

impl std::error::Error for PgnError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PgnError::Fen(err) => Some(err),
            PgnError::Move { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<FenError> for PgnError {
    fn from(err: FenError) -> Self {
        PgnError::Fen(err)
    }
}

/// Error type for square parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquareError {
    /// Rank out of bounds (must be 0-7)
    RankOutOfBounds { rank: usize },
    /// File out of bounds (must be 0-7)
    FileOutOfBounds { file: usize },
    /// Invalid algebraic notation
    InvalidNotation { notation: String },
}

impl fmt::Display for SquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SquareError::RankOutOfBounds { rank } => {
                write!(f, "Rank {rank} out of bounds (must be 0-7)")
            }
            SquareError::FileOutOfBounds { file } => {
                write!(f, "File {file} out of bounds (must be 0-7)")
            }
            SquareError::InvalidNotation { notation } => {
                write!(f, "Invalid square notation '{notation}'")
            }
        }
    }
}

impl std::error::Error for SquareError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_fen_error_too_few_parts() {
        let err = FenError::TooFewParts { found: 2 };
        assert!(err.to_string().contains('2'));
        assert!(err.to_string().contains('4'));
    }

    #[test]
    fn test_fen_error_invalid_piece() {
        let err = FenError::InvalidPiece { char: 'z' };
        assert!(err.to_string().contains("'z'"));
    }

    #[test]
    fn test_fen_error_wrong_file_count() {
        let err = FenError::WrongFileCount { rank: 3, files: 9 };
        assert!(err.to_string().contains('9'));
    }

    #[test]
    fn test_fen_error_wraps_board_error() {
        let err: FenError = BoardError::KingCount {
            color: Color::Black,
            found: 0,
        }
        .into();
        assert!(err.to_string().contains("Black"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_move_error_illegal_move() {
        let err = MoveParseError::IllegalMove {
            notation: "e2e5".to_string(),
        };
        assert!(err.to_string().contains("e2e5"));
    }

    #[test]
    fn test_san_error_display() {
        let err = SanError::AmbiguousMove {
            san: "Rd4".to_string(),
        };
        assert!(err.to_string().contains("Rd4"));
        assert!(SanError::Empty.to_string().contains("Empty"));
    }

    #[test]
    fn test_pgn_error_wraps_san_error() {
        let err = PgnError::Move {
            ply: 3,
            san: "Ke3".to_string(),
            error: SanError::NoMatchingMove {
                san: "Ke3".to_string(),
            },
        };
        assert!(err.to_string().contains("ply 3"));
        assert!(err.source().is_some());

        let err: PgnError = FenError::TooFewParts { found: 1 }.into();
        assert!(err.source().is_some());
        assert!(PgnError::MissingFen.source().is_none());
    }

    #[test]
    fn test_square_error_invalid_notation() {
        let err = SquareError::InvalidNotation {
            notation: "xyz".to_string(),
        };
        assert!(err.to_string().contains("xyz"));
    }

    #[test]
    fn test_error_clone() {
        let err = FenError::InvalidPiece { char: 'x' };
        let cloned = err.clone();
        assert_eq!(err, cloned);
    }
}
