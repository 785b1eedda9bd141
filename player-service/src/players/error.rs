//! Player service errors

use thiserror::Error;

use crate::ids::{PlayerId, PlayerIdError};
use crate::repository::RepositoryError;

/// Failure of a player service operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayerError {
    /// Malformed input, a missing required attribute or a range violation
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// No player with this identifier exists
    #[error("Player {0} not found")]
    NotFound(PlayerId),

    /// The storage collaborator failed
    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

impl PlayerError {
    /// Shorthand for [`PlayerError::InvalidRequest`]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }
}

impl From<PlayerIdError> for PlayerError {
    fn from(err: PlayerIdError) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}

/// Result type for player service operations
pub type PlayerResult<T> = Result<T, PlayerError>;
