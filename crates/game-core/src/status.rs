//! Human-facing game state derivation: what the title line should say for a
//! given viewer.

use std::fmt;

use shakmaty::Color;

use crate::board::GameBoard;
use crate::color::MovableColor;

/// Why a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    WhiteWon,
    BlackWon,
    Stalemate,
    ThreefoldRepetition,
    InsufficientMaterial,
    Draw,
}

impl fmt::Display for GameOverReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GameOverReason::WhiteWon => "White won",
            GameOverReason::BlackWon => "Black won",
            GameOverReason::Stalemate => "Stalemate",
            GameOverReason::ThreefoldRepetition => "Threefold repetition",
            GameOverReason::InsufficientMaterial => "Insufficient material",
            GameOverReason::Draw => "Draw",
        };
        f.write_str(text)
    }
}

/// Title state for a board as seen by a viewer with the given movable color.
/// Spectators (and hot-seat players) see which side is to move; players see
/// whether it is their turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    WhiteToMove,
    BlackToMove,
    YourTurn,
    WaitingForOpponent,
    Over(GameOverReason),
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::WhiteToMove => f.write_str("White to move"),
            GameStatus::BlackToMove => f.write_str("Black to move"),
            GameStatus::YourTurn => f.write_str("Your turn"),
            GameStatus::WaitingForOpponent => f.write_str("Waiting for opponent"),
            GameStatus::Over(reason) => write!(f, "Game over: {reason}"),
        }
    }
}

pub fn game_over_reason(board: &GameBoard) -> Option<GameOverReason> {
    if !board.is_game_over() {
        return None;
    }
    if board.is_stalemate() {
        return Some(GameOverReason::Stalemate);
    }
    if board.is_checkmate() {
        // The side to move is the side that got mated.
        return Some(match board.turn() {
            Color::Black => GameOverReason::WhiteWon,
            Color::White => GameOverReason::BlackWon,
        });
    }
    if board.is_threefold_repetition() {
        return Some(GameOverReason::ThreefoldRepetition);
    }
    if board.is_insufficient_material() {
        return Some(GameOverReason::InsufficientMaterial);
    }
    Some(GameOverReason::Draw)
}

pub fn game_status(board: &GameBoard, color: MovableColor) -> GameStatus {
    if let Some(reason) = game_over_reason(board) {
        return GameStatus::Over(reason);
    }
    match color {
        MovableColor::White | MovableColor::Black => {
            if color.allows(board.turn()) {
                GameStatus::YourTurn
            } else {
                GameStatus::WaitingForOpponent
            }
        }
        MovableColor::None | MovableColor::Both => match board.turn() {
            Color::White => GameStatus::WhiteToMove,
            Color::Black => GameStatus::BlackToMove,
        },
    }
}

/// Short label for a game id in logs and titles.
pub fn display_name(game_id: &str) -> String {
    if game_id.chars().count() <= 8 {
        game_id.to_string()
    } else {
        let short: String = game_id.chars().take(8).collect();
        format!("{short}…")
    }
}
