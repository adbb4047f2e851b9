//! Core error types.

use thiserror::Error;

use crate::event::EventId;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("malformed move payload: {0:?}")]
    MalformedPayload(String),

    #[error("illegal move {uci} at {fen}")]
    IllegalMove { uci: String, fen: String },

    #[error("malformed pgn near {0:?}")]
    MalformedPgn(String),
}

#[derive(Error, Debug)]
pub enum ChainError {
    #[error("cyclic parent reference at event {0}")]
    CyclicReference(EventId),

    #[error(transparent)]
    Board(#[from] BoardError),
}
