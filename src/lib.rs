//! Exact perft for standard chess.
//!
//! [`board`] holds the position, legal move generation and make/unmake, plus
//! FEN, UCI, SAN and PGN input; [`perft`] walks the move tree and counts
//! leaves, optionally split per root move (`divide`) or across threads at the
//! root.
//!
//! ```
//! use chess_perft::{divide, perft, Board};
//!
//! let mut board = Board::new();
//! assert_eq!(perft(&mut board, 3), 8902);
//!
//! let report = divide(&mut board, 2);
//! assert_eq!(report.get("e2e4"), Some(20));
//! assert_eq!(report.total(), 400);
//! ```

/// `log::debug!` when the `logging` feature is on, nothing otherwise
#[cfg(feature = "logging")]
macro_rules! debug_log {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "logging"))]
macro_rules! debug_log {
    ($($arg:tt)*) => {{
        if false {
            let _ = format_args!($($arg)*);
        }
    }};
}

/// `log::trace!` when the `logging` feature is on, nothing otherwise
#[cfg(feature = "logging")]
macro_rules! trace_log {
    ($($arg:tt)*) => { log::trace!($($arg)*) };
}

#[cfg(not(feature = "logging"))]
macro_rules! trace_log {
    ($($arg:tt)*) => {{
        if false {
            let _ = format_args!($($arg)*);
        }
    }};
}

pub(crate) use {debug_log, trace_log};

pub mod board;
pub mod perft;
mod zobrist;

pub use board::{Board, Color, Move, MoveList, Piece, Square};
pub use perft::{
    divide, divide_fen, divide_parallel, perft, perft_fen, perft_parallel, DivideReport,
    Mismatch, PerftError, ReportParseError,
};
