use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dugout_core::{GameResult, classify_result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ServiceError, ServiceResult, team::TeamId};

pub type GameId = Uuid;

pub const DEFAULT_UMPIRE_FEE_TARGET: Decimal = dec!(550);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub team_id: TeamId,
    pub opponent_name: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub umpire_fee_target: Decimal,
    /// Once set, the score is locked in and attendance/payment rows for this
    /// game become immutable.
    pub finalized: bool,
    pub local_score: Option<u32>,
    pub opponent_score: Option<u32>,
    pub result: Option<GameResult>,
}

pub type ArcGameRepository = Arc<Box<dyn GameRepository + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait GameRepository {
    async fn get_game(&self, id: GameId) -> ServiceResult<Option<Game>>;
    async fn get_games_by_team(&self, team_id: TeamId) -> ServiceResult<Vec<Game>>;
    async fn insert_game(&self, game: &Game) -> ServiceResult<()>;
    async fn update_game(&self, game: &Game) -> ServiceResult<()>;
    async fn delete_game(&self, id: GameId) -> ServiceResult<()>;
}

pub type ArcScheduleService = Arc<Box<dyn ScheduleService + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait ScheduleService {
    async fn schedule_game(
        &self,
        team_id: TeamId,
        opponent_name: &str,
        date: DateTime<Utc>,
        location: &str,
        umpire_fee_target: Option<Decimal>,
    ) -> ServiceResult<Game>;
    async fn update_game_details(
        &self,
        game_id: GameId,
        opponent_name: &str,
        date: DateTime<Utc>,
        location: &str,
        umpire_fee_target: Decimal,
    ) -> ServiceResult<Game>;
    /// Records the score, classifies the result and locks the game, as one
    /// combined update. Finalizing is terminal.
    async fn finalize_game(
        &self,
        game_id: GameId,
        local_score: u32,
        opponent_score: u32,
    ) -> ServiceResult<Game>;
    async fn remove_game(&self, game_id: GameId) -> ServiceResult<()>;
    async fn get_game(&self, game_id: GameId) -> ServiceResult<Game>;
    async fn get_schedule(&self, team_id: TeamId) -> ServiceResult<Vec<Game>>;
}

#[derive(Clone)]
pub struct ScheduleServiceImpl {
    game_repository: ArcGameRepository,
    attendance_repository: crate::attendance::ArcAttendanceRepository,
    payment_repository: crate::payment::ArcPaymentRepository,
}

impl ScheduleServiceImpl {
    pub fn new(
        game_repository: ArcGameRepository,
        attendance_repository: crate::attendance::ArcAttendanceRepository,
        payment_repository: crate::payment::ArcPaymentRepository,
    ) -> Self {
        Self {
            game_repository,
            attendance_repository,
            payment_repository,
        }
    }

    fn validate_details(opponent_name: &str, umpire_fee_target: Decimal) -> ServiceResult<()> {
        if opponent_name.trim().is_empty() {
            return ServiceError::validation("Opponent name must not be empty");
        }
        if umpire_fee_target <= Decimal::ZERO {
            return ServiceError::validation("Umpire fee target must be positive");
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ScheduleService for ScheduleServiceImpl {
    async fn schedule_game(
        &self,
        team_id: TeamId,
        opponent_name: &str,
        date: DateTime<Utc>,
        location: &str,
        umpire_fee_target: Option<Decimal>,
    ) -> ServiceResult<Game> {
        let umpire_fee_target = umpire_fee_target.unwrap_or(DEFAULT_UMPIRE_FEE_TARGET);
        Self::validate_details(opponent_name, umpire_fee_target)?;
        let game = Game {
            id: Uuid::new_v4(),
            team_id,
            opponent_name: opponent_name.trim().to_string(),
            date,
            location: location.trim().to_string(),
            umpire_fee_target,
            finalized: false,
            local_score: None,
            opponent_score: None,
            result: None,
        };
        self.game_repository.insert_game(&game).await?;
        log::info!(
            "Scheduled game {} vs {} on {}",
            game.id,
            game.opponent_name,
            game.date
        );
        Ok(game)
    }

    async fn update_game_details(
        &self,
        game_id: GameId,
        opponent_name: &str,
        date: DateTime<Utc>,
        location: &str,
        umpire_fee_target: Decimal,
    ) -> ServiceResult<Game> {
        let Some(mut game) = self.game_repository.get_game(game_id).await? else {
            return ServiceError::not_found("Game not found");
        };
        if game.finalized {
            return ServiceError::game_finalized("Cannot edit a finalized game");
        }
        Self::validate_details(opponent_name, umpire_fee_target)?;
        game.opponent_name = opponent_name.trim().to_string();
        game.date = date;
        game.location = location.trim().to_string();
        game.umpire_fee_target = umpire_fee_target;
        self.game_repository.update_game(&game).await?;
        Ok(game)
    }

    async fn finalize_game(
        &self,
        game_id: GameId,
        local_score: u32,
        opponent_score: u32,
    ) -> ServiceResult<Game> {
        let Some(mut game) = self.game_repository.get_game(game_id).await? else {
            return ServiceError::not_found("Game not found");
        };
        if game.finalized {
            return ServiceError::game_finalized("Game is already finalized");
        }
        game.local_score = Some(local_score);
        game.opponent_score = Some(opponent_score);
        game.result = Some(classify_result(local_score, opponent_score));
        game.finalized = true;
        self.game_repository.update_game(&game).await?;
        log::info!(
            "Finalized game {} ({}-{}, {:?})",
            game.id,
            local_score,
            opponent_score,
            game.result
        );
        Ok(game)
    }

    async fn remove_game(&self, game_id: GameId) -> ServiceResult<()> {
        if self.game_repository.get_game(game_id).await?.is_none() {
            return ServiceError::not_found("Game not found");
        }
        self.attendance_repository
            .delete_attendance_for_game(game_id)
            .await?;
        self.payment_repository
            .delete_payments_for_game(game_id)
            .await?;
        self.game_repository.delete_game(game_id).await?;
        log::info!("Removed game {}", game_id);
        Ok(())
    }

    async fn get_game(&self, game_id: GameId) -> ServiceResult<Game> {
        match self.game_repository.get_game(game_id).await? {
            Some(game) => Ok(game),
            None => ServiceError::not_found("Game not found"),
        }
    }

    async fn get_schedule(&self, team_id: TeamId) -> ServiceResult<Vec<Game>> {
        let mut games = self.game_repository.get_games_by_team(team_id).await?;
        games.sort_by_key(|game| game.date);
        Ok(games)
    }
}

#[derive(Clone, Default)]
pub struct MockGameRepository {
    pub games: Arc<DashMap<GameId, Game>>,
}

#[async_trait::async_trait]
impl GameRepository for MockGameRepository {
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
