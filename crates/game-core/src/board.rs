//! Board state wrapper over shakmaty: applies coordinate-notation move
//! payloads, tracks the SAN line, and renders numbered movetext.

use std::collections::HashMap;

use regex::Regex;
use shakmaty::fen::Fen;
use shakmaty::san::San;
use shakmaty::uci::UciMove;
use shakmaty::{Chess, Color, EnPassantMode, Position};

use crate::error::BoardError;

/// A replayable chess position plus the SAN line that produced it.
#[derive(Debug, Clone)]
pub struct GameBoard {
    pos: Chess,
    san_line: Vec<String>,
    /// Occurrence counts of positions seen along the line, keyed by the
    /// board/turn/castling/en-passant FEN fields. Used for repetition
    /// detection, which shakmaty's stateless positions do not track.
    seen: HashMap<String, u32>,
}

impl Default for GameBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl GameBoard {
    /// The initial position with no moves played.
    pub fn new() -> Self {
        let pos = Chess::default();
        let mut seen = HashMap::new();
        seen.insert(position_key(&pos), 1);
        Self {
            pos,
            san_line: Vec::new(),
            seen,
        }
    }

    /// Replay a numbered-movetext PGN into a board.
    pub fn from_pgn(pgn: &str) -> Result<Self, BoardError> {
        let mut board = Self::new();
        for san_str in extract_san_moves(pgn) {
            board.apply_san(&san_str)?;
        }
        Ok(board)
    }

    /// Validate and play a coordinate-notation payload ("e2e4", "e7e8q").
    pub fn apply_uci(&mut self, uci: &str) -> Result<(), BoardError> {
        let parsed: UciMove = uci
            .parse()
            .map_err(|_| BoardError::MalformedPayload(uci.to_string()))?;
        let legal = parsed.to_move(&self.pos).map_err(|_| BoardError::IllegalMove {
            uci: uci.to_string(),
            fen: self.fen(),
        })?;
        let san = San::from_move(&self.pos, legal).to_string();
        self.pos.play_unchecked(legal);
        self.san_line.push(san);
        *self.seen.entry(position_key(&self.pos)).or_insert(0) += 1;
        Ok(())
    }

    fn apply_san(&mut self, san_str: &str) -> Result<(), BoardError> {
        let san: San = san_str
            .parse()
            .map_err(|_| BoardError::MalformedPgn(san_str.to_string()))?;
        let legal = san
            .to_move(&self.pos)
            .map_err(|_| BoardError::MalformedPgn(san_str.to_string()))?;
        let rendered = San::from_move(&self.pos, legal).to_string();
        self.pos.play_unchecked(legal);
        self.san_line.push(rendered);
        *self.seen.entry(position_key(&self.pos)).or_insert(0) += 1;
        Ok(())
    }

    /// Numbered movetext for the line played so far, e.g. "1. e4 e5 2. Nf3".
    pub fn pgn(&self) -> String {
        let mut out = String::new();
        for (i, san) in self.san_line.iter().enumerate() {
            if i % 2 == 0 {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(&format!("{}. {}", i / 2 + 1, san));
            } else {
                out.push_str(&format!(" {}", san));
            }
        }
        out
    }

    pub fn turn(&self) -> Color {
        self.pos.turn()
    }

    /// Half-moves played.
    pub fn ply(&self) -> usize {
        self.san_line.len()
    }

    pub fn san_line(&self) -> &[String] {
        &self.san_line
    }

    pub fn fen(&self) -> String {
        Fen::from_position(&self.pos, EnPassantMode::Legal).to_string()
    }

    pub fn is_checkmate(&self) -> bool {
        self.pos.is_checkmate()
    }

    pub fn is_stalemate(&self) -> bool {
        self.pos.is_stalemate()
    }

    pub fn is_insufficient_material(&self) -> bool {
        self.pos.is_insufficient_material()
    }

    /// The current position has occurred three or more times along the line.
    pub fn is_threefold_repetition(&self) -> bool {
        self.seen
            .get(&position_key(&self.pos))
            .is_some_and(|&n| n >= 3)
    }

    pub fn is_game_over(&self) -> bool {
        self.pos.is_game_over() || self.is_threefold_repetition()
    }
}

/// Board/turn/castling/en-passant fields of the FEN; the move counters are
/// irrelevant for repetition.
fn position_key(pos: &Chess) -> String {
    let fen = Fen::from_position(pos, EnPassantMode::Legal).to_string();
    fen.split_whitespace()
        .take(4)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract SAN tokens from a PGN, skipping headers, move numbers, results,
/// comments and variations.
fn extract_san_moves(pgn: &str) -> Vec<String> {
    let header_re = Regex::new(r"\[[^\]]*\]").unwrap();
    let no_headers = header_re.replace_all(pgn, "");

    let comment_re = Regex::new(r"\{[^}]*\}").unwrap();
    let no_comments = comment_re.replace_all(&no_headers, "");

    let variation_re = Regex::new(r"\([^)]*\)").unwrap();
    let no_variations = variation_re.replace_all(&no_comments, "");

    let move_re =
        Regex::new(r"[KQRBN]?[a-h]?[1-8]?x?[a-h][1-8](?:=[QRBN])?[+#]?|O-O-O|O-O").unwrap();

    move_re
        .find_iter(&no_variations)
        .map(|m| m.as_str().to_string())
        .collect()
}
