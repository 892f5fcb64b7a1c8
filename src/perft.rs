//! Perft: exhaustive leaf counting over the legal move tree.
//!
//! Every count is exact. Nothing is cached between positions, so
//! transpositions are counted once per path that reaches them.

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::{Board, FenError, Move};

/// Number of leaf positions reachable from `board` in exactly `depth` plies.
///
/// The board is mutated during the walk and restored before returning.
pub fn perft(board: &mut Board, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = board.generate_moves();
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for mv in moves {
        nodes += subtree(board, mv, depth - 1);
    }
    nodes
}

/// Count below `mv`, reverting it afterwards
fn subtree(board: &mut Board, mv: Move, depth: usize) -> u64 {
    #[cfg(feature = "verify")]
    let snapshot = board.clone();

    let undo = board.apply(mv);
    #[cfg(feature = "verify")]
    assert_eq!(
        board.hash(),
        board.calculate_hash(),
        "incremental hash diverged after {mv:?}"
    );

    let nodes = perft(board, depth);
    board.revert(mv, undo);

    #[cfg(feature = "verify")]
    assert_eq!(*board, snapshot, "revert of {mv:?} did not restore the position");

    nodes
}

/// Perft split by root move, in move generation order.
///
/// At depth 0 there are no root moves and the report is empty.
pub fn divide(board: &mut Board, depth: usize) -> DivideReport {
    let mut report = DivideReport::default();
    if depth == 0 {
        return report;
    }

    for mv in board.generate_moves() {
        let nodes = subtree(board, mv, depth - 1);
        crate::trace_log!("divide depth {depth}: {mv} -> {nodes}");
        report.push(mv.to_string(), nodes);
    }

    crate::debug_log!(
        "divide depth {depth}: {} root moves, {} nodes",
        report.len(),
        report.total()
    );
    report
}

/// `perft` with the root moves spread over the rayon thread pool.
///
/// Each root move is counted on a private clone of `board`; the result is
/// identical to the sequential walk.
#[must_use]
pub fn perft_parallel(board: &Board, depth: usize) -> u64 {
    if depth <= 1 {
        return perft(&mut board.clone(), depth);
    }
    root_counts(board, depth).into_iter().map(|(_, nodes)| nodes).sum()
}

/// `divide` with the root moves spread over the rayon thread pool.
///
/// Entries keep move generation order.
#[must_use]
pub fn divide_parallel(board: &Board, depth: usize) -> DivideReport {
    if depth == 0 {
        return DivideReport::default();
    }

    let mut report = DivideReport::default();
    for (mv, nodes) in root_counts(board, depth) {
        report.push(mv.to_string(), nodes);
    }

    crate::debug_log!(
        "parallel divide depth {depth} on {} threads: {} root moves, {} nodes",
        rayon::current_num_threads(),
        report.len(),
        report.total()
    );
    report
}

fn root_counts(board: &Board, depth: usize) -> Vec<(Move, u64)> {
    let root_moves = board.clone().generate_moves();
    root_moves
        .as_slice()
        .par_iter()
        .map(|&mv| {
            let mut child = board.clone();
            let _undo = child.apply(mv);
            (mv, perft(&mut child, depth - 1))
        })
        .collect()
}

/// Parse `fen` and run `perft`, rejecting bad input before any traversal
pub fn perft_fen(fen: &str, depth: i64) -> Result<u64, PerftError> {
    let depth = checked_depth(depth)?;
    let mut board = Board::try_from_fen(fen)?;
    Ok(perft(&mut board, depth))
}

/// Parse `fen` and run `divide`, rejecting bad input before any traversal
pub fn divide_fen(fen: &str, depth: i64) -> Result<DivideReport, PerftError> {
    let depth = checked_depth(depth)?;
    let mut board = Board::try_from_fen(fen)?;
    Ok(divide(&mut board, depth))
}

fn checked_depth(depth: i64) -> Result<usize, PerftError> {
    usize::try_from(depth).map_err(|_| PerftError::NegativeDepth { depth })
}

/// Rejected perft input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PerftError {
    /// Depth below zero
    NegativeDepth { depth: i64 },
    /// The position could not be parsed
    Fen(FenError),
}

impl fmt::Display for PerftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PerftError::NegativeDepth { depth } => {
                write!(f, "Perft depth must be non-negative, got {depth}")
            }
            PerftError::Fen(err) => write!(f, "Invalid position: {err}"),
        }
    }
}

impl std::error::Error for PerftError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PerftError::Fen(err) => Some(err),
            PerftError::NegativeDepth { .. } => None,
        }
    }
}

impl From<FenError> for PerftError {
    fn from(err: FenError) -> Self {
        PerftError::Fen(err)
    }
}

/// Per-root-move node counts.
///
/// Displays in the common `<move>: <count>` format followed by a blank line
/// and `Nodes searched: <total>`, and parses the same format back so a
/// reference tool's output can be compared with [`DivideReport::diff`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DivideReport {
    entries: Vec<(String, u64)>,
}

impl DivideReport {
    fn push(&mut self, mv: String, nodes: u64) {
        self.entries.push((mv, nodes));
    }

    /// Sum over all root moves
    #[must_use]
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, nodes)| nodes).sum()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Moves and counts in report order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.entries.iter().map(|(mv, nodes)| (mv.as_str(), *nodes))
    }

    /// Count for a move given in UCI notation
    #[must_use]
    pub fn get(&self, mv: &str) -> Option<u64> {
        self.iter().find(|(m, _)| *m == mv).map(|(_, nodes)| nodes)
    }

    /// Differences against a reference report.
    ///
    /// Moves of this report come first, in this report's order, then moves
    /// only the reference has, in the reference's order. An empty result
    /// means the two reports agree move for move.
    #[must_use]
    pub fn diff(&self, reference: &DivideReport) -> Vec<Mismatch> {
        let mut mismatches = Vec::new();

        for (mv, ours) in self.iter() {
            match reference.get(mv) {
                Some(theirs) if theirs == ours => {}
                Some(theirs) => mismatches.push(Mismatch::Count {
                    mv: mv.to_string(),
                    ours,
                    reference: theirs,
                }),
                None => mismatches.push(Mismatch::Unexpected {
                    mv: mv.to_string(),
                    ours,
                }),
            }
        }
        for (mv, theirs) in reference.iter() {
            if self.get(mv).is_none() {
                mismatches.push(Mismatch::Missing {
                    mv: mv.to_string(),
                    reference: theirs,
                });
            }
        }

        if !mismatches.is_empty() {
            crate::debug_log!(
                "divide differs from reference in {} moves ({} vs {} nodes)",
                mismatches.len(),
                self.total(),
                reference.total()
            );
        }
        mismatches
    }
}

impl fmt::Display for DivideReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (mv, nodes) in self.iter() {
            writeln!(f, "{mv}: {nodes}")?;
        }
        writeln!(f)?;
        write!(f, "Nodes searched: {}", self.total())
    }
}

const TOTAL_PREFIX: &str = "Nodes searched:";

impl FromStr for DivideReport {
    type Err = ReportParseError;

    /// Blank lines and `info` lines are skipped; the total line is optional
    /// but must agree with the entries when present.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut report = DivideReport::default();
        let mut stated_total = None;

        for (idx, raw) in s.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with("info") {
                continue;
            }

            if let Some(rest) = line.strip_prefix(TOTAL_PREFIX) {
                let total = rest.trim().parse().map_err(|_| ReportParseError::InvalidCount {
                    line: line_no,
                    text: raw.to_string(),
                })?;
                stated_total = Some(total);
                continue;
            }

            let Some((mv, count)) = line.split_once(':') else {
                return Err(ReportParseError::MalformedLine {
                    line: line_no,
                    text: raw.to_string(),
                });
            };
            let mv = mv.trim();
            if mv.is_empty() || mv.contains(char::is_whitespace) {
                return Err(ReportParseError::MalformedLine {
                    line: line_no,
                    text: raw.to_string(),
                });
            }
            let nodes = count.trim().parse().map_err(|_| ReportParseError::InvalidCount {
                line: line_no,
                text: raw.to_string(),
            })?;
            if report.get(mv).is_some() {
                return Err(ReportParseError::DuplicateMove {
                    line: line_no,
                    mv: mv.to_string(),
                });
            }
            report.push(mv.to_string(), nodes);
        }

        if let Some(stated) = stated_total {
            let summed = report.total();
            if stated != summed {
                return Err(ReportParseError::TotalMismatch { stated, summed });
            }
        }
        Ok(report)
    }
}

/// One disagreement between two divide reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    /// Both reports have the move with different counts
    Count { mv: String, ours: u64, reference: u64 },
    /// Only the reference has the move
    Missing { mv: String, reference: u64 },
    /// Only this report has the move
    Unexpected { mv: String, ours: u64 },
}

impl Mismatch {
    /// The move the mismatch is about
    #[must_use]
    pub fn mv(&self) -> &str {
        match self {
            Mismatch::Count { mv, .. }
            | Mismatch::Missing { mv, .. }
            | Mismatch::Unexpected { mv, .. } => mv,
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Count {
                mv,
                ours,
                reference,
            } => write!(f, "{mv}: {ours} here, {reference} in reference"),
            Mismatch::Missing { mv, reference } => {
                write!(f, "{mv}: not generated here, {reference} in reference")
            }
            Mismatch::Unexpected { mv, ours } => {
                write!(f, "{mv}: {ours} here, not in reference")
            }
        }
    }
}

/// Error type for divide report parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportParseError {
    /// Line is not `<move>: <count>`
    MalformedLine { line: usize, text: String },
    /// Count is not a non-negative integer
    InvalidCount { line: usize, text: String },
    /// The same move appears twice
    DuplicateMove { line: usize, mv: String },
    /// `Nodes searched` disagrees with the sum of the entries
    TotalMismatch { stated: u64, summed: u64 },
}

impl fmt::Display for ReportParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportParseError::MalformedLine { line, text } => {
                write!(f, "Line {line}: expected '<move>: <count>', found '{text}'")
            }
            ReportParseError::InvalidCount { line, text } => {
                write!(f, "Line {line}: invalid node count in '{text}'")
            }
            ReportParseError::DuplicateMove { line, mv } => {
                write!(f, "Line {line}: move {mv} listed twice")
            }
            ReportParseError::TotalMismatch { stated, summed } => {
                write!(f, "Report states {stated} nodes but its entries sum to {summed}")
            }
        }
    }
}

impl std::error::Error for ReportParseError {}
