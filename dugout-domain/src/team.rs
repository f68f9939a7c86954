use std::sync::Arc;

use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    ServiceError, ServiceResult,
    auth::{ArcAuthProvider, AuthUser},
};

pub type TeamId = Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    /// Total amount the team must collect for registration across all
    /// players. `None` means no fee is configured.
    pub registration_fee_total: Option<Decimal>,
    pub owner_id: Uuid,
}

pub type ArcTeamRepository = Arc<Box<dyn TeamRepository + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait TeamRepository {
    async fn get_team(&self, id: TeamId) -> ServiceResult<Option<Team>>;
    async fn get_teams_by_owner(&self, owner_id: Uuid) -> ServiceResult<Vec<Team>>;
    async fn insert_team(&self, team: &Team) -> ServiceResult<()>;
    async fn update_team(&self, team: &Team) -> ServiceResult<()>;
    async fn delete_team(&self, id: TeamId) -> ServiceResult<()>;
}

pub type ArcTeamService = Arc<Box<dyn TeamService + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait TeamService {
    async fn create_team(&self, name: &str) -> ServiceResult<Team>;
    async fn rename_team(&self, id: TeamId, name: &str) -> ServiceResult<Team>;
    async fn set_registration_fee(&self, id: TeamId, fee: Option<Decimal>) -> ServiceResult<Team>;
    async fn get_team(&self, id: TeamId) -> ServiceResult<Team>;
    async fn get_my_teams(&self) -> ServiceResult<Vec<Team>>;
}

#[derive(Clone)]
pub struct TeamServiceImpl {
    team_repository: ArcTeamRepository,
    auth_provider: ArcAuthProvider,
}

impl TeamServiceImpl {
    pub fn new(team_repository: ArcTeamRepository, auth_provider: ArcAuthProvider) -> Self {
        Self {
            team_repository,
            auth_provider,
        }
    }

    fn current_user(&self) -> ServiceResult<AuthUser> {
        match self.auth_provider.current_user() {
            Some(user) => Ok(user),
            None => ServiceError::unauthorized("No signed-in user"),
        }
    }

    async fn fetch_owned_team(&self, id: TeamId) -> ServiceResult<Team> {
        let user = self.current_user()?;
        let Some(team) = self.team_repository.get_team(id).await? else {
            return ServiceError::not_found("Team not found");
        };
        if team.owner_id != user.id {
            return ServiceError::unauthorized("You do not own this team");
        }
        Ok(team)
    }
}

#[async_trait::async_trait]
impl TeamService for TeamServiceImpl {
    async fn create_team(&self, name: &str) -> ServiceResult<Team> {
        let user = self.current_user()?;
        if name.trim().is_empty() {
            return ServiceError::validation("Team name must not be empty");
        }
        let team = Team {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            registration_fee_total: None,
            owner_id: user.id,
        };
        self.team_repository.insert_team(&team).await?;
        log::info!("Created team {} ({})", team.name, team.id);
        Ok(team)
    }

    async fn rename_team(&self, id: TeamId, name: &str) -> ServiceResult<Team> {
        let mut team = self.fetch_owned_team(id).await?;
        if name.trim().is_empty() {
            return ServiceError::validation("Team name must not be empty");
        }
        team.name = name.trim().to_string();
        self.team_repository.update_team(&team).await?;
        Ok(team)
    }

    async fn set_registration_fee(&self, id: TeamId, fee: Option<Decimal>) -> ServiceResult<Team> {
        let mut team = self.fetch_owned_team(id).await?;
        if let Some(fee) = fee {
            if fee.is_sign_negative() {
                return ServiceError::validation("Registration fee must not be negative");
            }
        }
        team.registration_fee_total = fee;
        self.team_repository.update_team(&team).await?;
        log::info!("Set registration fee of team {} to {:?}", team.id, fee);
        Ok(team)
    }

    async fn get_team(&self, id: TeamId) -> ServiceResult<Team> {
        match self.team_repository.get_team(id).await? {
            Some(team) => Ok(team),
            None => ServiceError::not_found("Team not found"),
        }
    }

    async fn get_my_teams(&self) -> ServiceResult<Vec<Team>> {
        let user = self.current_user()?;
        self.team_repository.get_teams_by_owner(user.id).await
    }
}

#[derive(Clone, Default)]
pub struct MockTeamRepository {
    pub teams: Arc<DashMap<TeamId, Team>>,
}

#[async_trait::async_trait]
impl TeamRepository for MockTeamRepository {
    async fn get_team(&self, id: TeamId) -> ServiceResult<Option<Team>> {
        Ok(self.teams.get(&id).map(|entry| entry.value().clone()))
    }

    async fn get_teams_by_owner(&self, owner_id: Uuid) -> ServiceResult<Vec<Team>> {
        Ok(self
            .teams
            .iter()
            .filter(|entry| entry.value().owner_id == owner_id)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn insert_team(&self, team: &Team) -> ServiceResult<()> {
        self.teams.insert(team.id, team.clone());
        Ok(())
    }

    async fn update_team(&self, team: &Team) -> ServiceResult<()> {
        if !self.teams.contains_key(&team.id) {
            return ServiceError::not_found("Team not found");
        }
        self.teams.insert(team.id, team.clone());
        Ok(())
    }

    async fn delete_team(&self, id: TeamId) -> ServiceResult<()> {
        self.teams.remove(&id);
        Ok(())
    }
}
