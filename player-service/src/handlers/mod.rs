//! HTTP handlers for the player resource

mod error;
mod players;

pub use error::{ApiError, ApiErrorKind, ApiErrorResponse, ApiOperation};
pub use players::{routes, PLAYERS_PATH};
