use std::sync::Arc;

use dashmap::DashMap;
use dugout_domain::{
    ServiceError, ServiceResult,
    team::{Team, TeamId, TeamRepository},
};
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct MemoryTeamRepository {
    teams: Arc<DashMap<TeamId, Team>>,
}

impl MemoryTeamRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl TeamRepository for MemoryTeamRepository {
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
        if self.teams.contains_key(&team.id) {
            return ServiceError::store("Duplicate team id");
        }
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
