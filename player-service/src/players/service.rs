//! Player service: validation, progression and storage orchestration

use super::error::{PlayerError, PlayerResult};
use super::filter::{PageRequest, PlayerFilter};
use super::model::{Player, PlayerOrder, PlayerPatch};
use super::validation;
use crate::ids::PlayerId;
use crate::repository::PlayerRepository;

/// Use-case layer over a [`PlayerRepository`]
///
/// Holds no state of its own; all shared state lives in the repository.
#[derive(Debug)]
pub struct PlayerService<R> {
    repository: R,
}

impl<R: PlayerRepository> PlayerService<R> {
    /// Create a service over `repository`
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Access the underlying repository
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// One page of players matching `filter`, sorted by `order`
    pub async fn list(
        &self,
        filter: &PlayerFilter,
        order: PlayerOrder,
        page: PageRequest,
    ) -> PlayerResult<Vec<Player>> {
        let pagination = page.to_pagination()?;
        let players = self
            .repository
            .find_page(&filter.specification(), order, pagination)
            .await?;

        tracing::debug!(
            ?order,
            offset = pagination.offset,
            limit = pagination.limit,
            returned = players.len(),
            "Listed players"
        );
        Ok(players)
    }

    /// Number of players matching `filter`, ignoring paging
    pub async fn count(&self, filter: &PlayerFilter) -> PlayerResult<u64> {
        let count = self.repository.count(&filter.specification()).await?;
        tracing::debug!(count, "Counted players");
        Ok(count)
    }

    /// Validate and store a new player
    pub async fn create(&self, patch: PlayerPatch) -> PlayerResult<Player> {
        validation::require_complete(&patch)?;
        validation::check_ranges(&patch)?;

        let mut player = patch
            .into_player()
            .ok_or_else(|| PlayerError::invalid("incomplete player"))?;
        player.recalculate_progression();

        let saved = self.repository.save(player).await?;
        tracing::info!(
            player_id = ?saved.id,
            level = saved.level,
            "Player created"
        );
        Ok(saved)
    }

    /// Fetch one player
    pub async fn get(&self, id: PlayerId) -> PlayerResult<Player> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(PlayerError::NotFound(id))
    }

    /// Apply a partial update
    ///
    /// Only present attributes are validated and overwritten, except `banned`
    /// which is always written (absent means `false`). Level and remaining
    /// experience are recomputed.
    pub async fn update(&self, id: PlayerId, patch: PlayerPatch) -> PlayerResult<Player> {
        let mut player = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(PlayerError::NotFound(id))?;

        validation::check_ranges(&patch)?;

        player.apply_patch(patch);
        player.recalculate_progression();

        let saved = self.repository.save(player).await?;
        tracing::info!(player_id = %id, level = saved.level, "Player updated");
        Ok(saved)
    }

    /// Remove a player
    pub async fn delete(&self, id: PlayerId) -> PlayerResult<()> {
        if !self.repository.exists(id).await? {
            return Err(PlayerError::NotFound(id));
        }
        self.repository.delete(id).await?;
        tracing::info!(player_id = %id, "Player deleted");
        Ok(())
    }
}
