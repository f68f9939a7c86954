use std::sync::Arc;

use dashmap::DashMap;
use dugout_domain::{
    ServiceError, ServiceResult,
    game::{Game, GameId, GameRepository},
    team::TeamId,
};

#[derive(Clone, Default)]
pub struct MemoryGameRepository {
    games: Arc<DashMap<GameId, Game>>,
}

impl MemoryGameRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl GameRepository for MemoryGameRepository {
    async fn get_game(&self, id: GameId) -> ServiceResult<Option<Game>> {
        Ok(self.games.get(&id).map(|entry| entry.value().clone()))
    }

    async fn get_games_by_team(&self, team_id: TeamId) -> ServiceResult<Vec<Game>> {
        Ok(self
            .games
            .iter()
            .filter(|entry| entry.value().team_id == team_id)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn insert_game(&self, game: &Game) -> ServiceResult<()> {
        if self.games.contains_key(&game.id) {
            return ServiceError::store("Duplicate game id");
        }
        self.games.insert(game.id, game.clone());
        Ok(())
    }

    async fn update_game(&self, game: &Game) -> ServiceResult<()> {
        if !self.games.contains_key(&game.id) {
            return ServiceError::not_found("Game not found");
        }
        self.games.insert(game.id, game.clone());
        Ok(())
    }

    async fn delete_game(&self, id: GameId) -> ServiceResult<()> {
        self.games.remove(&id);
        Ok(())
    }
}
