use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dugout_core::{GameCollections, PaymentAmounts, PaymentTransition, reconcile_payment};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    ServiceError, ServiceResult,
    attendance::ArcAttendanceRepository,
    game::{ArcGameRepository, GameId},
    player::PlayerId,
    team::TeamId,
};

pub type PaymentId = Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    Transfer,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub game_id: GameId,
    pub team_id: TeamId,
    pub player_id: PlayerId,
    pub umpire_amount: Decimal,
    pub registration_amount: Decimal,
    pub method: PaymentMethod,
    pub paid_at: DateTime<Utc>,
}

impl Payment {
    pub fn amounts(&self) -> PaymentAmounts {
        PaymentAmounts::new(self.umpire_amount, self.registration_amount)
    }
}

/// What a successful reconciliation did to the player's payment row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaymentOutcome {
    Created,
    Updated,
    /// The row was driven to a zero total and removed; the player counts as
    /// unpaid again.
    Deleted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaymentReceipt {
    pub outcome: PaymentOutcome,
    pub collections: GameCollections,
}

pub type ArcPaymentRepository = Arc<Box<dyn PaymentRepository + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait PaymentRepository {
    async fn get_payments_for_game(&self, game_id: GameId) -> ServiceResult<Vec<Payment>>;
    async fn get_payments_for_team(&self, team_id: TeamId) -> ServiceResult<Vec<Payment>>;
    async fn insert_payment(&self, payment: &Payment) -> ServiceResult<()>;
    async fn update_payment(&self, payment: &Payment) -> ServiceResult<()>;
    async fn delete_payment(&self, id: PaymentId) -> ServiceResult<()>;
    async fn delete_payments_for_game(&self, game_id: GameId) -> ServiceResult<()>;
}

pub type ArcPaymentService = Arc<Box<dyn PaymentService + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait PaymentService {
    /// Records, replaces or cancels a player's payment for a game.
    ///
    /// Guards, in order: the game must exist and not be finalized, the player
    /// must have an attendance row for the game, and amounts must reconcile
    /// to a storable row (a zero-total candidate is only valid against an
    /// existing row, where it cancels it).
    async fn record_payment(
        &self,
        game_id: GameId,
        player_id: PlayerId,
        umpire_amount: Decimal,
        registration_amount: Decimal,
        method: PaymentMethod,
    ) -> ServiceResult<PaymentReceipt>;
    async fn game_collections(&self, game_id: GameId) -> ServiceResult<GameCollections>;
    async fn payments_for_game(&self, game_id: GameId) -> ServiceResult<Vec<Payment>>;
}

#[derive(Clone)]
pub struct PaymentServiceImpl {
    game_repository: ArcGameRepository,
    attendance_repository: ArcAttendanceRepository,
    payment_repository: ArcPaymentRepository,
}

impl PaymentServiceImpl {
    pub fn new(
        game_repository: ArcGameRepository,
        attendance_repository: ArcAttendanceRepository,
        payment_repository: ArcPaymentRepository,
    ) -> Self {
        Self {
            game_repository,
            attendance_repository,
            payment_repository,
        }
    }

    /// Deletes any zero-total rows still present and sums the rest. Rows can
    /// only reach zero through outside edits, but the invariant is enforced
    /// on every pass.
    async fn sweep_and_sum(&self, game_id: GameId) -> ServiceResult<GameCollections> {
        let rows = self.payment_repository.get_payments_for_game(game_id).await?;
        let mut kept = Vec::with_capacity(rows.len());
        for row in rows {
            if row.amounts().total() <= Decimal::ZERO {
                log::warn!("Deleting zero-total payment row {}", row.id);
                self.payment_repository.delete_payment(row.id).await?;
            } else {
                kept.push(row.amounts());
            }
        }
        Ok(GameCollections::from_amounts(kept))
    }
}

#[async_trait::async_trait]
impl PaymentService for PaymentServiceImpl {
    async fn record_payment(
        &self,
        game_id: GameId,
        player_id: PlayerId,
        umpire_amount: Decimal,
        registration_amount: Decimal,
        method: PaymentMethod,
    ) -> ServiceResult<PaymentReceipt> {
        let Some(game) = self.game_repository.get_game(game_id).await? else {
            return ServiceError::not_found("Game not found");
        };
        if game.finalized {
            return ServiceError::game_finalized("Cannot record payments for a finalized game");
        }
        let attendance = self
            .attendance_repository
            .get_attendance_for_game(game_id)
            .await?;
        if !attendance.iter().any(|row| row.player_id == player_id) {
            return ServiceError::validation(
                "Player must be marked attending before recording a payment",
            );
        }

        let payments = self.payment_repository.get_payments_for_game(game_id).await?;
        let existing = payments.iter().find(|row| row.player_id == player_id);
        let umpire_collected_by_others: Decimal = payments
            .iter()
            .filter(|row| row.player_id != player_id)
            .map(|row| row.umpire_amount)
            .sum();

        let transition = reconcile_payment(
            existing.map(Payment::amounts),
            PaymentAmounts::new(umpire_amount, registration_amount),
            umpire_collected_by_others,
            game.umpire_fee_target,
        )
        .map_err(ServiceError::Validation)?;

        let outcome = match (transition, existing) {
            (PaymentTransition::Create(amounts), None) => {
                let payment = Payment {
                    id: Uuid::new_v4(),
                    game_id,
                    team_id: game.team_id,
                    player_id,
                    umpire_amount: amounts.umpire,
                    registration_amount: amounts.registration,
                    method,
                    paid_at: Utc::now(),
                };
                self.payment_repository.insert_payment(&payment).await?;
                log::info!(
                    "Created payment for player {} in game {} ({} umpire, {} registration)",
                    player_id,
                    game_id,
                    amounts.umpire,
                    amounts.registration
                );
                PaymentOutcome::Created
            }
            (PaymentTransition::Update(amounts), Some(existing)) => {
                let payment = Payment {
                    umpire_amount: amounts.umpire,
                    registration_amount: amounts.registration,
                    method,
                    ..existing.clone()
                };
                self.payment_repository.update_payment(&payment).await?;
                log::info!(
                    "Updated payment for player {} in game {} ({} umpire, {} registration)",
                    player_id,
                    game_id,
                    amounts.umpire,
                    amounts.registration
                );
                PaymentOutcome::Updated
            }
            (PaymentTransition::Delete, Some(existing)) => {
                self.payment_repository.delete_payment(existing.id).await?;
                log::info!(
                    "Cancelled payment for player {} in game {}",
                    player_id,
                    game_id
                );
                PaymentOutcome::Deleted
            }
            // reconcile_payment only pairs Create with no existing row and
            // Update/Delete with one.
            _ => return ServiceError::store("Reconciliation produced an impossible transition"),
        };

        let collections = self.sweep_and_sum(game_id).await?;
        Ok(PaymentReceipt {
            outcome,
            collections,
        })
    }

    async fn game_collections(&self, game_id: GameId) -> ServiceResult<GameCollections> {
        let Some(game) = self.game_repository.get_game(game_id).await? else {
            return ServiceError::not_found("Game not found");
        };
        if game.finalized {
            // Rows of a locked game are never touched, not even stray
            // zero-total ones; sum what is there.
            let rows = self.payment_repository.get_payments_for_game(game_id).await?;
            return Ok(GameCollections::from_amounts(
                rows.iter().map(Payment::amounts),
            ));
        }
        self.sweep_and_sum(game_id).await
    }

    async fn payments_for_game(&self, game_id: GameId) -> ServiceResult<Vec<Payment>> {
        self.payment_repository.get_payments_for_game(game_id).await
    }
}

#[derive(Clone, Default)]
pub struct MockPaymentRepository {
    pub payments: Arc<DashMap<PaymentId, Payment>>,
}

#[async_trait::async_trait]
impl PaymentRepository for MockPaymentRepository {
    async fn get_payments_for_game(&self, game_id: GameId) -> ServiceResult<Vec<Payment>> {
        Ok(self
            .payments
            .iter()
            .filter(|entry| entry.value().game_id == game_id)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn get_payments_for_team(&self, team_id: TeamId) -> ServiceResult<Vec<Payment>> {
        Ok(self
            .payments
            .iter()
            .filter(|entry| entry.value().team_id == team_id)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn insert_payment(&self, payment: &Payment) -> ServiceResult<()> {
        self.payments.insert(payment.id, payment.clone());
        Ok(())
    }

    async fn update_payment(&self, payment: &Payment) -> ServiceResult<()> {
        if !self.payments.contains_key(&payment.id) {
            return ServiceError::not_found("Payment not found");
        }
        self.payments.insert(payment.id, payment.clone());
        Ok(())
    }

    async fn delete_payment(&self, id: PaymentId) -> ServiceResult<()> {
        self.payments.remove(&id);
        Ok(())
    }

    async fn delete_payments_for_game(&self, game_id: GameId) -> ServiceResult<()> {
        self.payments.retain(|_, payment| payment.game_id != game_id);
        Ok(())
    }
}
