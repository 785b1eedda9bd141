//! Identifiers used by the service
//!
//! Two kinds of identifier live here:
//!
//! - [`RequestId`]: a TypeID (`req_<base32 uuidv7>`) generated for every
//!   incoming HTTP request and echoed back in `x-request-id`.
//! - [`PlayerId`]: the storage-assigned, strictly positive key of a player.
//!
//! ```rust
//! use player_service::ids::PlayerId;
//!
//! let id: PlayerId = "42".parse().unwrap();
//! assert_eq!(id.get(), 42);
//! assert!("0".parse::<PlayerId>().is_err());
//! ```

use http::Request;
use mti::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tower_http::request_id::{MakeRequestId, RequestId as TowerRequestId};

/// A type-safe request identifier for distributed tracing.
///
/// Format: `req_01h455vb4pex5vsknk084sn02q`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(MagicTypeId);

impl RequestId {
    /// The prefix used for request IDs
    pub const PREFIX: &'static str = "req";

    /// Creates a new request ID with a UUIDv7 (time-sortable).
    #[must_use]
    pub fn new() -> Self {
        Self(Self::PREFIX.create_type_id::<V7>())
    }

    /// Returns the request ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RequestId {
    type Err = RequestIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mti = MagicTypeId::from_str(s).map_err(RequestIdError::Parse)?;

        if mti.prefix().as_str() != Self::PREFIX {
            return Err(RequestIdError::InvalidPrefix {
                expected: Self::PREFIX.to_string(),
                actual: mti.prefix().as_str().to_string(),
            });
        }

        Ok(Self(mti))
    }
}

/// Error type for request ID parsing.
#[derive(Debug, thiserror::Error)]
pub enum RequestIdError {
    /// The ID could not be parsed as a valid TypeID.
    #[error("failed to parse request ID: {0}")]
    Parse(#[from] MagicTypeIdError),

    /// The prefix was not the expected value.
    #[error("invalid prefix: expected '{expected}', got '{actual}'")]
    InvalidPrefix {
        /// The expected prefix.
        expected: String,
        /// The actual prefix found.
        actual: String,
    },
}

/// `MakeRequestId` implementation generating [`RequestId`]s for tower-http.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeTypedRequestId;

impl MakeRequestId for MakeTypedRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<TowerRequestId> {
        let id = RequestId::new();
        let header_value = http::HeaderValue::from_str(id.as_str()).ok()?;
        Some(TowerRequestId::new(header_value))
    }
}

/// Storage-assigned player identifier
///
/// Always strictly positive. Parsing from text is the identifier validation
/// applied to path segments: empty input, `0`, negative numbers, non-numeric
/// text and values beyond `i64::MAX` are all rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct PlayerId(i64);

impl PlayerId {
    /// Wrap a raw key, rejecting non-positive values
    pub fn new(value: i64) -> Result<Self, PlayerIdError> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(PlayerIdError::NotPositive(value))
        }
    }

    /// The raw key
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PlayerId {
    type Err = PlayerIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(PlayerIdError::Missing);
        }
        let value = s
            .parse::<i64>()
            .map_err(|_| PlayerIdError::Malformed(s.to_string()))?;
        Self::new(value)
    }
}

impl TryFrom<i64> for PlayerId {
    type Error = PlayerIdError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PlayerId> for i64 {
    fn from(id: PlayerId) -> Self {
        id.0
    }
}

/// Error type for player ID validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlayerIdError {
    /// No identifier was supplied.
    #[error("player id is required")]
    Missing,

    /// The identifier is not a 64-bit integer.
    #[error("player id '{0}' is not a valid integer")]
    Malformed(String),

    /// The identifier is zero or negative.
    #[error("player id must be positive, got {0}")]
    NotPositive(i64),
}
