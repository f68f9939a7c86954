use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ServiceError, ServiceResult, team::TeamId, util::validate_email};

pub type PlayerId = Uuid;

pub const MAX_JERSEY_NUMBER: u8 = 99;
pub const MAX_POSITIONS_PER_PLAYER: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    Pitcher,
    Catcher,
    FirstBase,
    SecondBase,
    ThirdBase,
    Shortstop,
    LeftField,
    CenterField,
    RightField,
    DesignatedHitter,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub number: u8,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub team_id: Option<TeamId>,
    pub positions: Vec<Position>,
}

impl Player {
    pub fn new(
        name: &str,
        number: u8,
        phone: Option<String>,
        email: Option<String>,
        team_id: Option<TeamId>,
        positions: Vec<Position>,
    ) -> ServiceResult<Self> {
        let player = Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            number,
            phone,
            email,
            team_id,
            positions,
        };
        player.validate()?;
        Ok(player)
    }

    pub fn validate(&self) -> ServiceResult<()> {
        if self.name.trim().is_empty() {
            return ServiceError::validation("Player name must not be empty");
        }
        if self.number > MAX_JERSEY_NUMBER {
            return ServiceError::validation(format!(
                "Jersey number must be between 0 and {}",
                MAX_JERSEY_NUMBER
            ));
        }
        if self.positions.len() > MAX_POSITIONS_PER_PLAYER {
            return ServiceError::validation(format!(
                "A player may hold at most {} positions",
                MAX_POSITIONS_PER_PLAYER
            ));
        }
        for (i, position) in self.positions.iter().enumerate() {
            if self.positions[..i].contains(position) {
                return ServiceError::validation("Positions must not repeat");
            }
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }
}

pub type ArcPlayerRepository = Arc<Box<dyn PlayerRepository + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait PlayerRepository {
    async fn get_player(&self, id: PlayerId) -> ServiceResult<Option<Player>>;
    async fn get_players_by_team(&self, team_id: TeamId) -> ServiceResult<Vec<Player>>;
    async fn insert_player(&self, player: &Player) -> ServiceResult<()>;
    async fn update_player(&self, player: &Player) -> ServiceResult<()>;
    async fn delete_player(&self, id: PlayerId) -> ServiceResult<()>;
}

pub type ArcRosterService = Arc<Box<dyn RosterService + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait RosterService {
    async fn add_player(
        &self,
        team_id: Option<TeamId>,
        name: &str,
        number: u8,
        phone: Option<String>,
        email: Option<String>,
        positions: Vec<Position>,
    ) -> ServiceResult<Player>;
    async fn update_player(&self, player: Player) -> ServiceResult<Player>;
    async fn remove_player(&self, id: PlayerId) -> ServiceResult<()>;
    async fn get_player(&self, id: PlayerId) -> ServiceResult<Player>;
    async fn get_roster(&self, team_id: TeamId) -> ServiceResult<Vec<Player>>;
}

#[derive(Clone)]
pub struct RosterServiceImpl {
    player_repository: ArcPlayerRepository,
}

impl RosterServiceImpl {
    pub fn new(player_repository: ArcPlayerRepository) -> Self {
        Self { player_repository }
    }
}

#[async_trait::async_trait]
impl RosterService for RosterServiceImpl {
    async fn add_player(
        &self,
        team_id: Option<TeamId>,
        name: &str,
        number: u8,
        phone: Option<String>,
        email: Option<String>,
        positions: Vec<Position>,
    ) -> ServiceResult<Player> {
        let player = Player::new(name, number, phone, email, team_id, positions)?;
        self.player_repository.insert_player(&player).await?;
        log::info!("Added player {} ({})", player.name, player.id);
        Ok(player)
    }

    async fn update_player(&self, player: Player) -> ServiceResult<Player> {
        player.validate()?;
        if self
            .player_repository
            .get_player(player.id)
            .await?
            .is_none()
        {
            return ServiceError::not_found("Player not found");
        }
        self.player_repository.update_player(&player).await?;
        Ok(player)
    }

    async fn remove_player(&self, id: PlayerId) -> ServiceResult<()> {
        if self.player_repository.get_player(id).await?.is_none() {
            return ServiceError::not_found("Player not found");
        }
        // Attendance and payment history stays behind, keyed by the old id.
        self.player_repository.delete_player(id).await?;
        log::info!("Removed player {}", id);
        Ok(())
    }

    async fn get_player(&self, id: PlayerId) -> ServiceResult<Player> {
        match self.player_repository.get_player(id).await? {
            Some(player) => Ok(player),
            None => ServiceError::not_found("Player not found"),
        }
    }

    async fn get_roster(&self, team_id: TeamId) -> ServiceResult<Vec<Player>> {
        self.player_repository.get_players_by_team(team_id).await
    }
}

#[derive(Clone, Default)]
pub struct MockPlayerRepository {
    pub players: Arc<DashMap<PlayerId, Player>>,
}

#[async_trait::async_trait]
impl PlayerRepository for MockPlayerRepository {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn roster_service() -> (MockPlayerRepository, RosterServiceImpl) {
        let repository = MockPlayerRepository::default();
        let service = RosterServiceImpl::new(Arc::new(Box::new(repository.clone())));
        (repository, service)
    }

    #[tokio::test]
    async fn test_add_player() {
        let (repository, service) = roster_service();
        let player = service
            .add_player(
                None,
                "Ana",
                7,
                None,
                Some("ana@example.com".to_string()),
                vec![Position::Shortstop, Position::SecondBase],
            )
            .await
            .expect("Failed to add player");
        assert_eq!(player.name, "Ana");
        assert!(repository.players.contains_key(&player.id));
    }

    #[tokio::test]
    async fn test_add_player_rejects_bad_input() {
        let (_, service) = roster_service();
        assert!(
            service
                .add_player(None, "", 7, None, None, vec![])
                .await
                .is_err()
        );
        assert!(
            service
                .add_player(
                    None,
                    "Ana",
                    7,
                    None,
                    None,
                    vec![
                        Position::Pitcher,
                        Position::Catcher,
                        Position::FirstBase,
                        Position::SecondBase,
                    ],
                )
                .await
                .is_err()
        );
        assert!(
            service
                .add_player(
                    None,
                    "Ana",
                    7,
                    None,
                    None,
                    vec![Position::Pitcher, Position::Pitcher],
                )
                .await
                .is_err()
        );
        assert!(
            service
                .add_player(None, "Ana", 7, None, Some("nope".to_string()), vec![])
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_remove_missing_player() {
        let (_, service) = roster_service();
        assert!(matches!(
            service.remove_player(Uuid::new_v4()).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn test_jersey_number_range() {
        assert!(Player::new("Ana", 99, None, None, None, vec![]).is_ok());
        assert!(Player::new("Ana", 100, None, None, None, vec![]).is_err());
    }
}
