//! PGN import and export on top of SAN.
//!
//! Tag pairs are collected, and a `FEN` tag sets the starting position.
//! The movetext is replayed as SAN. Move numbers, comments (`{}` and `;`),
//! NAGs (`$n`) and variations (`(...)`) are skipped. A result token ends
//! the game.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::error::PgnError;
use super::{Board, Move};

const RESULTS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

/// A game read from PGN: its tags, the replayed moves and both end positions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PgnGame {
    pub tags: BTreeMap<String, String>,
    pub start: Board,
    pub moves: Vec<Move>,
    pub end: Board,
    /// Result token from the movetext, or the `Result` tag when the movetext has none
    pub result: Option<String>,
}

impl PgnGame {
    /// Parse one PGN game and replay its main line.
    pub fn parse(pgn: &str) -> Result<Self, PgnError> {
        let (tags, tokens) = split_pgn(pgn)?;

        let start = match tags.get("FEN") {
            Some(fen) => Board::try_from_fen(fen)?,
            None if tags.get("SetUp").is_some_and(|v| v == "1") => {
                return Err(PgnError::MissingFen)
            }
            None => Board::new(),
        };

        let mut end = start.clone();
        let mut moves = Vec::with_capacity(tokens.len());
        let mut result = None;
        for token in tokens {
            if RESULTS.contains(&token) {
                result = Some(token.to_string());
                break;
            }
            let mv = end.parse_san(token).map_err(|error| PgnError::Move {
                ply: moves.len() + 1,
                san: token.to_string(),
                error,
            })?;
            let _undo = end.apply(mv);
            moves.push(mv);
        }

        Ok(PgnGame {
            result: result.or_else(|| tags.get("Result").cloned()),
            tags,
            start,
            moves,
            end,
        })
    }
}

impl FromStr for PgnGame {
    type Err = PgnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PgnGame::parse(s)
    }
}

/// Tag pairs, a blank line, then numbered SAN movetext on one line
impl fmt::Display for PgnGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.tags {
            let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
            writeln!(f, "[{name} \"{escaped}\"]")?;
        }
        if !self.tags.is_empty() {
            writeln!(f)?;
        }

        let mut board = self.start.clone();
        let mut movetext = Vec::with_capacity(self.moves.len() + 1);
        for (ply, &mv) in self.moves.iter().enumerate() {
            if board.white_to_move() {
                movetext.push(format!("{}.", board.fullmove_number()));
            } else if ply == 0 {
                movetext.push(format!("{}...", board.fullmove_number()));
            }
            movetext.push(board.move_to_san(mv));
            let _undo = board.apply(mv);
        }
        movetext.push(self.result.clone().unwrap_or_else(|| "*".to_string()));
        writeln!(f, "{}", movetext.join(" "))
    }
}

impl Board {
    /// The position at the end of a PGN game's main line.
    pub fn from_pgn(pgn: &str) -> Result<Board, PgnError> {
        match PgnGame::parse(pgn) {
            Ok(game) => Ok(game.end),
            Err(err) => {
                crate::debug_log!("rejected PGN: {err}");
                Err(err)
            }
        }
    }
}

/// Separate tag pairs from movetext tokens, dropping everything that is not a move
fn split_pgn(pgn: &str) -> Result<(BTreeMap<String, String>, Vec<&str>), PgnError> {
    let mut tags = BTreeMap::new();
    let mut tokens = Vec::new();
    let mut rest = pgn;

    loop {
        rest = rest.trim_start();
        let Some(c) = rest.chars().next() else {
            break;
        };
        match c {
            '[' => {
                let end = rest.find(']').ok_or(PgnError::Unterminated { delimiter: '[' })?;
                let (name, value) = parse_tag(&rest[1..end])?;
                tags.insert(name, value);
                rest = &rest[end + 1..];
            }
            '{' => {
                let end = rest.find('}').ok_or(PgnError::Unterminated { delimiter: '{' })?;
                rest = &rest[end + 1..];
            }
            ';' => rest = rest.find('\n').map_or("", |end| &rest[end..]),
            '(' => rest = skip_variation(rest)?,
            '$' => rest = rest[1..].trim_start_matches(|c: char| c.is_ascii_digit()),
            ']' | '}' | ')' => return Err(PgnError::Unexpected { char: c }),
            _ => {
                let end = rest
                    .find(|c: char| c.is_whitespace() || "[]{}();$".contains(c))
                    .unwrap_or(rest.len());
                let token = strip_move_number(&rest[..end]);
                rest = &rest[end..];
                if !token.is_empty() {
                    tokens.push(token);
                }
                if RESULTS.contains(&token) {
                    break;
                }
            }
        }
    }

    Ok((tags, tokens))
}

/// `Name "value"` with `\"` and `\\` escapes in the value
fn parse_tag(inner: &str) -> Result<(String, String), PgnError> {
    let invalid = || PgnError::InvalidTag {
        tag: inner.to_string(),
    };
    let (name, value) = inner.trim().split_once(char::is_whitespace).ok_or_else(invalid)?;
    let value = value
        .trim()
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or_else(invalid)?;
    Ok((
        name.to_string(),
        value.replace("\\\"", "\"").replace("\\\\", "\\"),
    ))
}

/// Skip a parenthesised variation, including nested ones and their comments
fn skip_variation(text: &str) -> Result<&str, PgnError> {
    let mut depth = 0usize;
    let mut in_comment = false;
    for (i, c) in text.char_indices() {
        match c {
            '{' => in_comment = true,
            '}' => in_comment = false,
            '(' if !in_comment => depth += 1,
            ')' if !in_comment => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&text[i + 1..]);
                }
            }
            _ => {}
        }
    }
    Err(PgnError::Unterminated { delimiter: '(' })
}

/// "12." and "12..." vanish, "12.e4" becomes "e4"; "0-0" and "1-0" are kept
fn strip_move_number(token: &str) -> &str {
    let rest = token.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.starts_with('.') {
        rest.trim_start_matches('.')
    } else {
        token
    }
}
