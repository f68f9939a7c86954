use chrono::Utc;
use dugout::app::{AppState, construct_memory_app};
use dugout_core::GameResult;
use dugout_domain::{
    ServiceError,
    auth::MockAuthProvider,
    game::GameId,
    payment::{PaymentMethod, PaymentOutcome},
    player::Player,
    team::Team,
};
use rust_decimal_macros::dec;
use std::sync::Arc;
use uuid::Uuid;

async fn app_with_team() -> (AppState, Team) {
    let auth = MockAuthProvider::signed_in(Uuid::new_v4(), "coach@example.com");
    let app = construct_memory_app(Arc::new(Box::new(auth)));
    let team = app.team_service.create_team("Los Tigres").await.unwrap();
    (app, team)
}

async fn add_player(app: &AppState, team: &Team, name: &str, number: u8) -> Player {
    app.roster_service
        .add_player(Some(team.id), name, number, None, None, vec![])
        .await
        .unwrap()
}

async fn schedule_game(app: &AppState, team: &Team) -> GameId {
    app.schedule_service
        .schedule_game(team.id, "Las Panteras", Utc::now(), "Campo 2", None)
        .await
        .unwrap()
        .id
}

// Scenario A: fee 4500, 10 games, 15 attendance rows. The naive target of
// 3000 is clamped to 800.
#[tokio::test]
async fn registration_target_is_clamped() {
    let (app, team) = app_with_team().await;
    app.team_service
        .set_registration_fee(team.id, Some(dec!(4500)))
        .await
        .unwrap();

    let mut players = Vec::new();
    for number in 1..=15u8 {
        players.push(add_player(&app, &team, &format!("Player {}", number), number).await);
    }
    let mut games = Vec::new();
    for _ in 0..10 {
        games.push(schedule_game(&app, &team).await);
    }
    for (i, player) in players.iter().enumerate() {
        app.attendance_service
            .mark_attendance(games[i % games.len()], player.id)
            .await
            .unwrap();
    }

    let target = app.stats_service.registration_target(team.id).await.unwrap();
    assert_eq!(target, dec!(800));
}

// Scenario B: 550 target; two players paying 300 each end at 300 + 250.
#[tokio::test]
async fn umpire_fee_is_never_overcollected() {
    let (app, team) = app_with_team().await;
    let first = add_player(&app, &team, "Ana", 7).await;
    let second = add_player(&app, &team, "Bruno", 12).await;
    let game = schedule_game(&app, &team).await;
    for player in [&first, &second] {
        app.attendance_service
            .mark_attendance(game, player.id)
            .await
            .unwrap();
    }

    app.payment_service
        .record_payment(game, first.id, dec!(300), dec!(0), PaymentMethod::Cash)
        .await
        .unwrap();
    let receipt = app
        .payment_service
        .record_payment(game, second.id, dec!(300), dec!(0), PaymentMethod::Transfer)
        .await
        .unwrap();

    assert_eq!(receipt.collections.umpire_collected, dec!(550));
    let rows = app.payment_service.payments_for_game(game).await.unwrap();
    let second_row = rows.iter().find(|row| row.player_id == second.id).unwrap();
    assert_eq!(second_row.umpire_amount, dec!(250));
}

// Scenario C: updating an existing payment to a zero total deletes the row.
#[tokio::test]
async fn zero_update_cancels_the_payment() {
    let (app, team) = app_with_team().await;
    let player = add_player(&app, &team, "Ana", 7).await;
    let game = schedule_game(&app, &team).await;
    app.attendance_service
        .mark_attendance(game, player.id)
        .await
        .unwrap();

    app.payment_service
        .record_payment(game, player.id, dec!(100), dec!(50), PaymentMethod::Cash)
        .await
        .unwrap();
    let receipt = app
        .payment_service
        .record_payment(game, player.id, dec!(0), dec!(0), PaymentMethod::Cash)
        .await
        .unwrap();

    assert_eq!(receipt.outcome, PaymentOutcome::Deleted);
    assert_eq!(receipt.collections.umpire_collected, dec!(0));
    assert_eq!(receipt.collections.registration_collected, dec!(0));
    assert!(
        app.payment_service
            .payments_for_game(game)
            .await
            .unwrap()
            .is_empty()
    );

    // A fresh zero-value candidate has nothing to cancel.
    assert!(matches!(
        app.payment_service
            .record_payment(game, player.id, dec!(0), dec!(0), PaymentMethod::Cash)
            .await,
        Err(ServiceError::Validation(_))
    ));
}

// Scenario D: finalizing 5-3 yields a victory and bumps the record.
#[tokio::test]
async fn finalizing_records_the_result() {
    let (app, team) = app_with_team().await;
    let game = schedule_game(&app, &team).await;

    let finalized = app
        .schedule_service
        .finalize_game(game, 5, 3)
        .await
        .unwrap();
    assert_eq!(finalized.result, Some(GameResult::Victory));

    let record = app.stats_service.team_record(team.id).await.unwrap();
    assert_eq!(record.wins, 1);
    assert_eq!(record.losses, 0);
    assert_eq!(record.ties, 0);
    assert_eq!(app.stats_service.win_percentage(team.id).await.unwrap(), 100);
}

// Scenario E: a team without games produces zeros, not division errors.
#[tokio::test]
async fn zero_game_team_has_zero_rates() {
    let (app, team) = app_with_team().await;
    let player = add_player(&app, &team, "Ana", 7).await;

    assert_eq!(
        app.stats_service
            .player_attendance_rate(team.id, player.id)
            .await
            .unwrap(),
        0.0
    );
    assert_eq!(
        app.stats_service
            .average_attendance_per_game(team.id)
            .await
            .unwrap(),
        0
    );
    assert_eq!(app.stats_service.win_percentage(team.id).await.unwrap(), 0);
}

// Property P3: once finalized, attendance and payment writes bounce and the
// rows stay as they were.
#[tokio::test]
async fn finalized_game_is_locked() {
    let (app, team) = app_with_team().await;
    let player = add_player(&app, &team, "Ana", 7).await;
    let absent = add_player(&app, &team, "Bruno", 12).await;
    let game = schedule_game(&app, &team).await;
    app.attendance_service
        .mark_attendance(game, player.id)
        .await
        .unwrap();
    app.payment_service
        .record_payment(game, player.id, dec!(100), dec!(0), PaymentMethod::Cash)
        .await
        .unwrap();

    app.schedule_service.finalize_game(game, 2, 2).await.unwrap();

    assert!(matches!(
        app.attendance_service.mark_attendance(game, absent.id).await,
        Err(ServiceError::GameFinalized(_))
    ));
    assert!(matches!(
        app.attendance_service
            .unmark_attendance(game, player.id)
            .await,
        Err(ServiceError::GameFinalized(_))
    ));
    assert!(matches!(
        app.payment_service
            .record_payment(game, player.id, dec!(0), dec!(0), PaymentMethod::Cash)
            .await,
        Err(ServiceError::GameFinalized(_))
    ));

    let attendance = app
        .attendance_service
        .get_game_attendance(game)
        .await
        .unwrap();
    assert_eq!(attendance.len(), 1);
    let payments = app.payment_service.payments_for_game(game).await.unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].umpire_amount, dec!(100));
}

// Top-3 boards stay deterministic and ignore cancelled rows.
#[tokio::test]
async fn contribution_board_tracks_registration_payments() {
    let (app, team) = app_with_team().await;
    let ana = add_player(&app, &team, "Ana", 7).await;
    let bruno = add_player(&app, &team, "Bruno", 12).await;
    let carla = add_player(&app, &team, "Carla", 3).await;
    let diego = add_player(&app, &team, "Diego", 5).await;
    let game = schedule_game(&app, &team).await;
    for player in [&ana, &bruno, &carla, &diego] {
        app.attendance_service
            .mark_attendance(game, player.id)
            .await
            .unwrap();
    }

    for (player, amount) in [
        (&ana, dec!(200)),
        (&bruno, dec!(450)),
        (&carla, dec!(100)),
        (&diego, dec!(50)),
    ] {
        app.payment_service
            .record_payment(game, player.id, dec!(0), amount, PaymentMethod::Transfer)
            .await
            .unwrap();
    }

    let board = app.stats_service.top_contributors(team.id).await.unwrap();
    assert_eq!(board.len(), 3);
    assert_eq!(board[0].player_id, bruno.id);
    assert_eq!(board[1].player_id, ana.id);
    assert_eq!(board[2].player_id, carla.id);

    // Cancelling Bruno's payment drops him from the board.
    app.payment_service
        .record_payment(game, bruno.id, dec!(0), dec!(0), PaymentMethod::Transfer)
        .await
        .unwrap();
    let board = app.stats_service.top_contributors(team.id).await.unwrap();
    assert_eq!(board[0].player_id, ana.id);
}
