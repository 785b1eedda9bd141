//! Application state shared across handlers

use std::sync::Arc;

use crate::{config::Config, players::PlayerService, repository::PlayerRepository};

/// Shared state handed to every request
///
/// Cloning copies two `Arc`s.
pub struct AppState<R> {
    config: Arc<Config>,
    players: Arc<PlayerService<R>>,
}

impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            players: Arc::clone(&self.players),
        }
    }
}

impl<R: PlayerRepository> AppState<R> {
    /// Build state around a repository
    pub fn new(config: Config, repository: R) -> Self {
        Self {
            config: Arc::new(config),
            players: Arc::new(PlayerService::new(repository)),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the player service
    pub fn players(&self) -> &PlayerService<R> {
        &self.players
    }
}
