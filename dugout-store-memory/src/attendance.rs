use std::sync::Arc;

use dashmap::DashMap;
use dugout_domain::{
    ServiceResult,
    attendance::{Attendance, AttendanceRepository},
    game::GameId,
    player::PlayerId,
};

#[derive(Clone, Default)]
pub struct MemoryAttendanceRepository {
    rows: Arc<DashMap<(GameId, PlayerId), ()>>,
}

impl MemoryAttendanceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl AttendanceRepository for MemoryAttendanceRepository {
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
