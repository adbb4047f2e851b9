//! Session error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("publisher rejected event: {0}")]
    Rejected(String),
}

#[derive(Error, Debug)]
pub enum EventLogError {
    #[error("event log unreadable: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a locally submitted move was refused. These are the only errors the
/// session surfaces to a caller; resolution problems never escape as faults.
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("no local identity; cannot author a move event")]
    IdentityUnavailable,

    #[error("game has no resolved head yet")]
    NoResolvedHead,

    #[error("head is still being resolved; wait for the next snapshot")]
    HeadSearching,

    #[error("game is over")]
    GameOver,

    #[error("it is not your turn")]
    NotYourTurn,

    #[error(transparent)]
    IllegalMove(#[from] game_core::BoardError),

    #[error(transparent)]
    Publish(#[from] PublishError),
}
