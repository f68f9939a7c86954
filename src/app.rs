use std::sync::Arc;

use dugout_domain::{
    attendance::{ArcAttendanceRepository, ArcAttendanceService, AttendanceServiceImpl},
    auth::ArcAuthProvider,
    game::{ArcGameRepository, ArcScheduleService, ScheduleServiceImpl},
    payment::{ArcPaymentRepository, ArcPaymentService, PaymentServiceImpl},
    player::{ArcPlayerRepository, ArcRosterService, RosterServiceImpl},
    stats::{ArcStatsService, StatsServiceImpl},
    team::{ArcTeamRepository, ArcTeamService, TeamServiceImpl},
};
use dugout_store_memory::{
    MemoryAttendanceRepository, MemoryGameRepository, MemoryPaymentRepository,
    MemoryPlayerRepository, MemoryTeamRepository,
};

#[derive(Clone)]
pub struct AppState {
    pub team_service: ArcTeamService,
    pub roster_service: ArcRosterService,
    pub schedule_service: ArcScheduleService,
    pub attendance_service: ArcAttendanceService,
    pub payment_service: ArcPaymentService,
    pub stats_service: ArcStatsService,
}

/// Wires the services against a concrete set of repositories. The caller
/// decides where the rows live; nothing here is a global.
pub fn construct_app(
    auth_provider: ArcAuthProvider,
    team_repository: ArcTeamRepository,
    player_repository: ArcPlayerRepository,
    game_repository: ArcGameRepository,
    attendance_repository: ArcAttendanceRepository,
    payment_repository: ArcPaymentRepository,
) -> AppState {
    let team_service: ArcTeamService = Arc::new(Box::new(TeamServiceImpl::new(
        team_repository.clone(),
        auth_provider,
    )));

    let roster_service: ArcRosterService = Arc::new(Box::new(RosterServiceImpl::new(
        player_repository.clone(),
    )));

    let schedule_service: ArcScheduleService = Arc::new(Box::new(ScheduleServiceImpl::new(
        game_repository.clone(),
        attendance_repository.clone(),
        payment_repository.clone(),
    )));

    let attendance_service: ArcAttendanceService = Arc::new(Box::new(AttendanceServiceImpl::new(
        game_repository.clone(),
        player_repository.clone(),
        attendance_repository.clone(),
    )));

    let payment_service: ArcPaymentService = Arc::new(Box::new(PaymentServiceImpl::new(
        game_repository.clone(),
        attendance_repository.clone(),
        payment_repository.clone(),
    )));

    let stats_service: ArcStatsService = Arc::new(Box::new(StatsServiceImpl::new(
        team_repository,
        player_repository,
        game_repository,
        attendance_repository,
        payment_repository,
    )));

    AppState {
        team_service,
        roster_service,
        schedule_service,
        attendance_service,
        payment_service,
        stats_service,
    }
}

/// App backed by the in-memory store, as used by the integration tests.
pub fn construct_memory_app(auth_provider: ArcAuthProvider) -> AppState {
    construct_app(
        auth_provider,
        Arc::new(Box::new(MemoryTeamRepository::new())),
        Arc::new(Box::new(MemoryPlayerRepository::new())),
        Arc::new(Box::new(MemoryGameRepository::new())),
        Arc::new(Box::new(MemoryAttendanceRepository::new())),
        Arc::new(Box::new(MemoryPaymentRepository::new())),
    )
}
