use thiserror::Error;

use crate::Turn;

/// Errors raised by the engine, its players and the match controller.
#[derive(Error, Debug)]
pub enum Error {
    #[error("'game' and 'side' are both required to seat a player")]
    InvalidConstruction,

    #[error("incorrect player turn: it is the {0} player's turn")]
    WrongTurn(Turn),

    #[error("invalid move: square ({row}, {col}) is already played")]
    OccupiedCell { row: usize, col: usize },

    #[error("invalid move: square ({row}, {col}) is off the board")]
    OutOfBounds { row: usize, col: usize },

    #[error("invalid move: an empty mark cannot be played")]
    InvalidMark,

    #[error("unable to move: no empty square left")]
    NoMoveAvailable,

    #[error("the game this player was seated at no longer exists")]
    GameUnavailable,

    #[error("the game is being read elsewhere; release it before moving")]
    GameBusy,

    #[error("invalid match configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
