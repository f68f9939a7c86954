use std::collections::HashMap;
use std::sync::Arc;

use dugout_core::{
    RankedAttendee, RankedContributor, TeamRecord, attendance_rate, average_attendance_per_game,
    registration_target, top_attendance, top_contributors,
};
use rust_decimal::Decimal;

use crate::{
    ServiceError, ServiceResult,
    attendance::{ArcAttendanceRepository, Attendance},
    game::{ArcGameRepository, Game},
    payment::ArcPaymentRepository,
    player::{ArcPlayerRepository, PlayerId},
    team::{ArcTeamRepository, TeamId},
};

pub type ArcStatsService = Arc<Box<dyn StatsService + Send + Sync + 'static>>;

/// Read-only dashboard aggregates. Everything is recomputed from the current
/// rows on each call; nothing is cached.
#[async_trait::async_trait]
pub trait StatsService {
    async fn top_contributors(&self, team_id: TeamId)
    -> ServiceResult<Vec<RankedContributor<PlayerId>>>;
    async fn top_attendance(&self, team_id: TeamId) -> ServiceResult<Vec<RankedAttendee<PlayerId>>>;
    async fn player_attendance_rate(
        &self,
        team_id: TeamId,
        player_id: PlayerId,
    ) -> ServiceResult<f64>;
    async fn average_attendance_per_game(&self, team_id: TeamId) -> ServiceResult<u32>;
    async fn registration_target(&self, team_id: TeamId) -> ServiceResult<Decimal>;
    async fn team_record(&self, team_id: TeamId) -> ServiceResult<TeamRecord>;
    async fn win_percentage(&self, team_id: TeamId) -> ServiceResult<u32>;
}

#[derive(Clone)]
pub struct StatsServiceImpl {
    team_repository: ArcTeamRepository,
    player_repository: ArcPlayerRepository,
    game_repository: ArcGameRepository,
    attendance_repository: ArcAttendanceRepository,
    payment_repository: ArcPaymentRepository,
}

impl StatsServiceImpl {
    pub fn new(
        team_repository: ArcTeamRepository,
        player_repository: ArcPlayerRepository,
        game_repository: ArcGameRepository,
        attendance_repository: ArcAttendanceRepository,
        payment_repository: ArcPaymentRepository,
    ) -> Self {
        Self {
            team_repository,
            player_repository,
            game_repository,
            attendance_repository,
            payment_repository,
        }
    }

    async fn roster_names(&self, team_id: TeamId) -> ServiceResult<HashMap<PlayerId, String>> {
        let players = self.player_repository.get_players_by_team(team_id).await?;
        Ok(players
            .into_iter()
            .map(|player| (player.id, player.name))
            .collect())
    }

    async fn team_attendance(&self, team_id: TeamId) -> ServiceResult<(Vec<Game>, Vec<Attendance>)> {
        let games = self.game_repository.get_games_by_team(team_id).await?;
        let mut rows = Vec::new();
        for game in &games {
            rows.extend(
                self.attendance_repository
                    .get_attendance_for_game(game.id)
                    .await?,
            );
        }
        Ok((games, rows))
    }
}

#[async_trait::async_trait]
impl StatsService for StatsServiceImpl {
    async fn top_contributors(
        &self,
        team_id: TeamId,
    ) -> ServiceResult<Vec<RankedContributor<PlayerId>>> {
        let names = self.roster_names(team_id).await?;
        let payments = self.payment_repository.get_payments_for_team(team_id).await?;
        // Payments of players no longer on the roster stay in the store but
        // drop out of the board.
        let rows: Vec<(PlayerId, String, Decimal)> = payments
            .iter()
            .filter_map(|payment| {
                names.get(&payment.player_id).map(|name| {
                    (
                        payment.player_id,
                        name.clone(),
                        payment.registration_amount,
                    )
                })
            })
            .collect();
        Ok(top_contributors(&rows))
    }

    async fn top_attendance(
        &self,
        team_id: TeamId,
    ) -> ServiceResult<Vec<RankedAttendee<PlayerId>>> {
        let names = self.roster_names(team_id).await?;
        let (_, attendance) = self.team_attendance(team_id).await?;
        let rows: Vec<(PlayerId, String)> = attendance
            .iter()
            .filter_map(|row| {
                names
                    .get(&row.player_id)
                    .map(|name| (row.player_id, name.clone()))
            })
            .collect();
        Ok(top_attendance(&rows))
    }

    async fn player_attendance_rate(
        &self,
        team_id: TeamId,
        player_id: PlayerId,
    ) -> ServiceResult<f64> {
        let games = self.game_repository.get_games_by_team(team_id).await?;
        let attendance = self
            .attendance_repository
            .get_attendance_for_player(player_id)
            .await?;
        let attended = attendance
            .iter()
            .filter(|row| games.iter().any(|game| game.id == row.game_id))
            .count() as u32;
        Ok(attendance_rate(attended, games.len() as u32))
    }

    async fn average_attendance_per_game(&self, team_id: TeamId) -> ServiceResult<u32> {
        let (games, attendance) = self.team_attendance(team_id).await?;
        Ok(average_attendance_per_game(
            attendance.len() as u32,
            games.len() as u32,
        ))
    }

    async fn registration_target(&self, team_id: TeamId) -> ServiceResult<Decimal> {
        let Some(team) = self.team_repository.get_team(team_id).await? else {
            return ServiceError::not_found("Team not found");
        };
        let (games, attendance) = self.team_attendance(team_id).await?;
        Ok(registration_target(
            team.registration_fee_total,
            games.len() as u32,
            attendance.len() as u32,
        ))
    }

    async fn team_record(&self, team_id: TeamId) -> ServiceResult<TeamRecord> {
        let games = self.game_repository.get_games_by_team(team_id).await?;
        Ok(TeamRecord::from_results(
            games
                .iter()
                .filter(|game| game.finalized)
                .filter_map(|game| game.result),
        ))
    }

    async fn win_percentage(&self, team_id: TeamId) -> ServiceResult<u32> {
        Ok(self.team_record(team_id).await?.win_percentage())
    }
}
