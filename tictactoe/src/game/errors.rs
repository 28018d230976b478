//! Game error types.

use thiserror::Error;

use super::entities::ResetAction;

/// Reasons a requested transition is illegal in the session's current state.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum InvalidStateKind {
    #[error("Game is already full")]
    GameFull,
    #[error("You cannot join your own game")]
    OwnGame,
    #[error("Game is not active")]
    GameNotActive,
    #[error("Not your turn")]
    NotYourTurn,
    #[error("Cell is already occupied")]
    CellOccupied,
    #[error("Cell index {0} is out of range")]
    CellOutOfRange(usize),
    #[error("Unknown reset action: {0}")]
    UnknownResetAction(String),
    #[error("No reset request to {0}")]
    NoPendingReset(ResetAction),
    #[error("You cannot {0} your own request")]
    OwnResetRequest(ResetAction),
}

/// Errors returned by session operations.
///
/// Every error leaves the session exactly as it was before the call.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GameError {
    /// Unknown or expired game id
    #[error("Game not found")]
    NotFound,

    /// Caller is not one of the session's players
    #[error("You are not a player in this game")]
    Forbidden,

    /// Transition not allowed in the current state
    #[error(transparent)]
    InvalidState(#[from] InvalidStateKind),
}

/// Coarse error taxonomy, for mapping onto transport status codes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    NotFound,
    Forbidden,
    InvalidState,
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::NotFound => ErrorKind::NotFound,
            GameError::Forbidden => ErrorKind::Forbidden,
            GameError::InvalidState(_) => ErrorKind::InvalidState,
        }
    }
}

/// Result type for game operations
pub type GameResult<T> = Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(GameError::NotFound.to_string(), "Game not found");
        assert_eq!(
            GameError::from(InvalidStateKind::NoPendingReset(ResetAction::Accept)).to_string(),
            "No reset request to accept"
        );
        assert_eq!(
            InvalidStateKind::OwnResetRequest(ResetAction::Reject).to_string(),
            "You cannot reject your own request"
        );
    }

    #[test]
    fn test_kind() {
        assert_eq!(GameError::Forbidden.kind(), ErrorKind::Forbidden);
        assert_eq!(
            GameError::InvalidState(InvalidStateKind::NotYourTurn).kind(),
            ErrorKind::InvalidState
        );
    }
}
