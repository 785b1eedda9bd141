//! Storage collaborator trait
//!
//! Uses RPITIT (Return Position Impl Trait In Traits) for async methods
//! without `async_trait`.

use std::future::Future;

use super::error::RepositoryError;
use super::filter::Specification;
use super::pagination::Pagination;
use crate::ids::PlayerId;
use crate::players::{Player, PlayerOrder};

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Persistent store of players
///
/// Implementations own all shared mutable state; the service holds no locks.
pub trait PlayerRepository: Send + Sync + 'static {
    /// Short backend label used in logs and readiness output
    const BACKEND: &'static str;

    /// Find a player by its identifier
    ///
    /// Returns `Ok(None)` when no such player exists.
    fn find_by_id(&self, id: PlayerId)
        -> impl Future<Output = RepositoryResult<Option<Player>>> + Send;

    /// Check whether a player with this identifier exists
    fn exists(&self, id: PlayerId) -> impl Future<Output = RepositoryResult<bool>> + Send;

    /// Persist a player
    ///
    /// A player without an id is inserted and receives a fresh id from the
    /// store. A player with an id overwrites the stored record; if that
    /// record is gone the call fails with a not-found error.
    fn save(&self, player: Player) -> impl Future<Output = RepositoryResult<Player>> + Send;

    /// Delete a player
    ///
    /// Returns `Ok(true)` if a record was removed.
    fn delete(&self, id: PlayerId) -> impl Future<Output = RepositoryResult<bool>> + Send;

    /// One ordered page of players matching `spec`
    ///
    /// Ties on the sort key are broken by ascending id.
    fn find_page(
        &self,
        spec: &Specification,
        order: PlayerOrder,
        pagination: Pagination,
    ) -> impl Future<Output = RepositoryResult<Vec<Player>>> + Send;

    /// Every player matching `spec`, ordered by id
    ///
    /// Use [`count`](Self::count) when only the number of matches is needed.
    fn find_all(
        &self,
        spec: &Specification,
    ) -> impl Future<Output = RepositoryResult<Vec<Player>>> + Send;

    /// Number of players matching `spec`
    fn count(&self, spec: &Specification) -> impl Future<Output = RepositoryResult<u64>> + Send;
}
