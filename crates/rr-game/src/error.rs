//! Error types for the game layer.

use thiserror::Error;

use crate::player::PlayerId;

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;

/// Errors that can occur while running a game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The revolver rejected a configuration or reload.
    #[error(transparent)]
    Revolver(#[from] rr_core::RevolverError),

    /// A game needs at least two players.
    #[error("a game needs at least two players, got {0}")]
    NotEnoughPlayers(usize),

    /// Two players share an id.
    #[error("{0} appears more than once in the roster")]
    DuplicatePlayer(PlayerId),

    /// No player with this id is in the roster.
    #[error("unknown player: {0}")]
    UnknownPlayer(PlayerId),

    /// A player must start with some health.
    #[error("starting health and damage per round must be at least 1")]
    InvalidHealth,

    /// The action needs a turn in progress.
    #[error("no turn is in progress")]
    TurnNotInProgress,

    /// A turn was started while another was still running.
    #[error("turn {0} is already in progress")]
    TurnAlreadyInProgress(u32),

    /// The current player has already fired this turn.
    #[error("{0} has already fired this turn")]
    ShotAlreadyTaken(PlayerId),

    /// The game has ended; no more turns are issued.
    #[error("the game is over")]
    GameOver,

    /// There is nobody left to aim at.
    #[error("{0} has no opponent left")]
    NoOpponent(PlayerId),

    /// The current player is human and must act through input.
    #[error("waiting for input from {0}")]
    AwaitingInput(PlayerId),

    /// An automated game ran past its turn limit without a winner.
    #[error("no winner after {0} turns")]
    TurnLimitReached(u32),
}
