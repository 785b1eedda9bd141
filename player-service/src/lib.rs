//! # player-service
//!
//! REST service managing game players: CRUD over a single `player` table with
//! filtering, paging, sorting and derived level progression.
//!
//! ## Features
//!
//! - **Filtering**: eight optional predicates (name, title, race, profession,
//!   birthday range, banned, experience range, level range) combined with AND
//! - **Progression**: `level` and `untilNextLevel` recomputed from experience on every write
//! - **Storage**: PostgreSQL via sqlx (feature `database`), or an in-memory store
//! - **Middleware stack**: request IDs, panic recovery, body limits, timeouts, CORS, compression
//! - **Health checks**: liveness and readiness probes
//! - **Graceful shutdown**: SIGTERM and SIGINT
//!
//! ## Example
//!
//! ```rust,no_run
//! use player_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let state = AppState::new(config.clone(), InMemoryPlayerRepository::new());
//!     Server::new(config).serve(app(state)).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
#[cfg(feature = "database")]
pub mod database;
pub mod error;
pub mod handlers;
pub mod health;
pub mod ids;
pub mod middleware;
pub mod observability;
pub mod players;
pub mod repository;
pub mod server;
pub mod state;

use axum::Router;

use crate::{repository::PlayerRepository, state::AppState};

/// Player and health routes bound to `state`
pub fn app<R: PlayerRepository>(state: AppState<R>) -> Router {
    handlers::routes::<R>()
        .merge(health::routes::<R>())
        .with_state(state)
}

/// Commonly used types
pub mod prelude {
    pub use crate::app;
    pub use crate::config::{Config, DatabaseConfig};
    pub use crate::error::{Error, Result};
    pub use crate::handlers::{ApiError, ApiErrorKind, ApiOperation};
    pub use crate::ids::{MakeTypedRequestId, PlayerId, RequestId};
    pub use crate::observability::init_tracing;
    pub use crate::players::{
        PageRequest, Player, PlayerError, PlayerFilter, PlayerOrder, PlayerPatch, PlayerService,
        Profession, Race,
    };
    pub use crate::repository::{
        InMemoryPlayerRepository, Pagination, PlayerRepository, RepositoryError, Specification,
    };
    #[cfg(feature = "database")]
    pub use crate::repository::PgPlayerRepository;
    pub use crate::server::Server;
    pub use crate::state::AppState;
}
