//! In-process player store
//!
//! Used when no database is configured, and by the test suite.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::error::{RepositoryError, RepositoryOperation};
use super::filter::Specification;
use super::pagination::Pagination;
use super::traits::{PlayerRepository, RepositoryResult};
use crate::ids::PlayerId;
use crate::players::{Player, PlayerOrder};

#[derive(Debug)]
struct Store {
    next_id: i64,
    players: BTreeMap<PlayerId, Player>,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            next_id: 1,
            players: BTreeMap::new(),
        }
    }
}

/// Player store backed by a `BTreeMap` behind an async `RwLock`
///
/// Cloning is cheap and every clone shares the same records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPlayerRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryPlayerRepository {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

fn compare_by(order: PlayerOrder, a: &Player, b: &Player) -> Ordering {
    let field = order.field();
    field
        .value_of(a)
        .compare(&field.value_of(b))
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.id.cmp(&b.id))
}

impl PlayerRepository for InMemoryPlayerRepository {
    const BACKEND: &'static str = "memory";

    async fn find_by_id(&self, id: PlayerId) -> RepositoryResult<Option<Player>> {
        Ok(self.store.read().await.players.get(&id).cloned())
    }

    async fn exists(&self, id: PlayerId) -> RepositoryResult<bool> {
        Ok(self.store.read().await.players.contains_key(&id))
    }

    async fn save(&self, mut player: Player) -> RepositoryResult<Player> {
        let mut store = self.store.write().await;

        match player.id {
            Some(id) => {
                let slot = store.players.get_mut(&id).ok_or_else(|| {
                    RepositoryError::not_found(RepositoryOperation::Update, "Player", id.to_string())
                })?;
                *slot = player.clone();
            }
            None => {
                let id = PlayerId::new(store.next_id).map_err(|e| {
                    RepositoryError::database_error(RepositoryOperation::Create, e.to_string())
                })?;
                store.next_id += 1;
                player.id = Some(id);
                store.players.insert(id, player.clone());
            }
        }

        Ok(player)
    }

    async fn delete(&self, id: PlayerId) -> RepositoryResult<bool> {
        Ok(self.store.write().await.players.remove(&id).is_some())
    }

    async fn find_page(
        &self,
        spec: &Specification,
        order: PlayerOrder,
        pagination: Pagination,
    ) -> RepositoryResult<Vec<Player>> {
        let store = self.store.read().await;
        let mut matching: Vec<&Player> = store.players.values().filter(|p| spec.matches(p)).collect();
        matching.sort_by(|a, b| compare_by(order, a, b));

        let offset = usize::try_from(pagination.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(pagination.limit).unwrap_or(usize::MAX);

        Ok(matching.into_iter().skip(offset).take(limit).cloned().collect())
    }

    async fn find_all(&self, spec: &Specification) -> RepositoryResult<Vec<Player>> {
        let store = self.store.read().await;
        Ok(store.players.values().filter(|p| spec.matches(p)).cloned().collect())
    }

    async fn count(&self, spec: &Specification) -> RepositoryResult<u64> {
        let store = self.store.read().await;
        let count = store.players.values().filter(|p| spec.matches(p)).count();
        Ok(count as u64)
    }
}
