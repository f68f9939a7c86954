use std::sync::Arc;

use dashmap::DashMap;
use dugout_domain::{
    ServiceError, ServiceResult,
    player::{Player, PlayerId, PlayerRepository},
    team::TeamId,
};

#[derive(Clone, Default)]
pub struct MemoryPlayerRepository {
    players: Arc<DashMap<PlayerId, Player>>,
}

impl MemoryPlayerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl PlayerRepository for MemoryPlayerRepository {
    async fn get_player(&self, id: PlayerId) -> ServiceResult<Option<Player>> {
        Ok(self.players.get(&id).map(|entry| entry.value().clone()))
    }

    async fn get_players_by_team(&self, team_id: TeamId) -> ServiceResult<Vec<Player>> {
        Ok(self
            .players
            .iter()
            .filter(|entry| entry.value().team_id == Some(team_id))
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn insert_player(&self, player: &Player) -> ServiceResult<()> {
        if self.players.contains_key(&player.id) {
            return ServiceError::store("Duplicate player id");
        }
        self.players.insert(player.id, player.clone());
        Ok(())
    }

    async fn update_player(&self, player: &Player) -> ServiceResult<()> {
        if !self.players.contains_key(&player.id) {
            return ServiceError::not_found("Player not found");
        }
        self.players.insert(player.id, player.clone());
        Ok(())
    }

    async fn delete_player(&self, id: PlayerId) -> ServiceResult<()> {
        self.players.remove(&id);
        Ok(())
    }
}
