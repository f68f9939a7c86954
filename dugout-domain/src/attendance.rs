use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::{
    ServiceError, ServiceResult,
    game::{ArcGameRepository, Game, GameId},
    player::{ArcPlayerRepository, PlayerId},
};

/// Existence-only record: the player was present at the game. Gates payment
/// eligibility.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendance {
    pub game_id: GameId,
    pub player_id: PlayerId,
}

pub type ArcAttendanceRepository = Arc<Box<dyn AttendanceRepository + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait AttendanceRepository {
    async fn get_attendance_for_game(&self, game_id: GameId) -> ServiceResult<Vec<Attendance>>;
    async fn get_attendance_for_player(&self, player_id: PlayerId)
    -> ServiceResult<Vec<Attendance>>;
    /// Set semantics: inserting an existing (game, player) pair is a no-op.
    async fn insert_attendance(&self, row: &Attendance) -> ServiceResult<()>;
    async fn delete_attendance(&self, game_id: GameId, player_id: PlayerId) -> ServiceResult<()>;
    async fn delete_attendance_for_game(&self, game_id: GameId) -> ServiceResult<()>;
}

pub type ArcAttendanceService = Arc<Box<dyn AttendanceService + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait AttendanceService {
    async fn mark_attendance(&self, game_id: GameId, player_id: PlayerId) -> ServiceResult<()>;
    async fn unmark_attendance(&self, game_id: GameId, player_id: PlayerId) -> ServiceResult<()>;
    /// Replaces the full attendance list of a game. New rows are inserted
    /// before superseded rows are removed, so a failure midway never leaves
    /// the game with an emptied list.
    async fn set_game_attendance(
        &self,
        game_id: GameId,
        player_ids: Vec<PlayerId>,
    ) -> ServiceResult<()>;
    async fn get_game_attendance(&self, game_id: GameId) -> ServiceResult<Vec<Attendance>>;
    async fn is_attending(&self, game_id: GameId, player_id: PlayerId) -> ServiceResult<bool>;
}

#[derive(Clone)]
pub struct AttendanceServiceImpl {
    game_repository: ArcGameRepository,
    player_repository: ArcPlayerRepository,
    attendance_repository: ArcAttendanceRepository,
}

impl AttendanceServiceImpl {
    pub fn new(
        game_repository: ArcGameRepository,
        player_repository: ArcPlayerRepository,
        attendance_repository: ArcAttendanceRepository,
    ) -> Self {
        Self {
            game_repository,
            player_repository,
            attendance_repository,
        }
    }

    async fn fetch_unlocked_game(&self, game_id: GameId) -> ServiceResult<Game> {
        let Some(game) = self.game_repository.get_game(game_id).await? else {
            return ServiceError::not_found("Game not found");
        };
        if game.finalized {
            return ServiceError::game_finalized("Cannot change attendance of a finalized game");
        }
        Ok(game)
    }
}

#[async_trait::async_trait]
impl AttendanceService for AttendanceServiceImpl {
    async fn mark_attendance(&self, game_id: GameId, player_id: PlayerId) -> ServiceResult<()> {
        self.fetch_unlocked_game(game_id).await?;
        if self.player_repository.get_player(player_id).await?.is_none() {
            return ServiceError::not_found("Player not found");
        }
        self.attendance_repository
            .insert_attendance(&Attendance { game_id, player_id })
            .await?;
        log::debug!("Marked player {} attending game {}", player_id, game_id);
        Ok(())
    }

    async fn unmark_attendance(&self, game_id: GameId, player_id: PlayerId) -> ServiceResult<()> {
        self.fetch_unlocked_game(game_id).await?;
        self.attendance_repository
            .delete_attendance(game_id, player_id)
            .await?;
        Ok(())
    }

    async fn set_game_attendance(
        &self,
        game_id: GameId,
        player_ids: Vec<PlayerId>,
    ) -> ServiceResult<()> {
        self.fetch_unlocked_game(game_id).await?;
        let current = self
            .attendance_repository
            .get_attendance_for_game(game_id)
            .await?;
        for player_id in &player_ids {
            if self
                .player_repository
                .get_player(*player_id)
                .await?
                .is_none()
            {
                return ServiceError::not_found("Player not found");
            }
        }
        for player_id in &player_ids {
            if !current.iter().any(|row| row.player_id == *player_id) {
                self.attendance_repository
                    .insert_attendance(&Attendance {
                        game_id,
                        player_id: *player_id,
                    })
                    .await?;
            }
        }
        for row in current {
            if !player_ids.contains(&row.player_id) {
                self.attendance_repository
                    .delete_attendance(row.game_id, row.player_id)
                    .await?;
            }
        }
        Ok(())
    }

    async fn get_game_attendance(&self, game_id: GameId) -> ServiceResult<Vec<Attendance>> {
        self.attendance_repository
            .get_attendance_for_game(game_id)
            .await
    }

    async fn is_attending(&self, game_id: GameId, player_id: PlayerId) -> ServiceResult<bool> {
        let rows = self
            .attendance_repository
            .get_attendance_for_game(game_id)
            .await?;
        Ok(rows.iter().any(|row| row.player_id == player_id))
    }
}

#[derive(Clone, Default)]
pub struct MockAttendanceRepository {
    pub rows: Arc<DashMap<(GameId, PlayerId), ()>>,
}

#[async_trait::async_trait]
impl AttendanceRepository for MockAttendanceRepository {
    async fn get_attendance_for_game(&self, game_id: GameId) -> ServiceResult<Vec<Attendance>> {
        Ok(self
            .rows
            .iter()
            .filter(|entry| entry.key().0 == game_id)
            .map(|entry| Attendance {
                game_id: entry.key().0,
                player_id: entry.key().1,
            })
            .collect())
    }

    async fn get_attendance_for_player(
        &self,
        player_id: PlayerId,
    ) -> ServiceResult<Vec<Attendance>> {
        Ok(self
            .rows
            .iter()
            .filter(|entry| entry.key().1 == player_id)
            .map(|entry| Attendance {
                game_id: entry.key().0,
                player_id: entry.key().1,
            })
            .collect())
    }

    async fn insert_attendance(&self, row: &Attendance) -> ServiceResult<()> {
        self.rows.insert((row.game_id, row.player_id), ());
        Ok(())
    }

    async fn delete_attendance(&self, game_id: GameId, player_id: PlayerId) -> ServiceResult<()> {
        self.rows.remove(&(game_id, player_id));
        Ok(())
    }

    async fn delete_attendance_for_game(&self, game_id: GameId) -> ServiceResult<()> {
        self.rows.retain(|key, _| key.0 != game_id);
        Ok(())
    }
}
