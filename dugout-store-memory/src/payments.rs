use std::sync::Arc;

use dashmap::DashMap;
use dugout_domain::{
    ServiceError, ServiceResult,
    game::GameId,
    payment::{Payment, PaymentId, PaymentRepository},
    team::TeamId,
};

#[derive(Clone, Default)]
pub struct MemoryPaymentRepository {
    payments: Arc<DashMap<PaymentId, Payment>>,
}

impl MemoryPaymentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl PaymentRepository for MemoryPaymentRepository {
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
        if self.payments.contains_key(&payment.id) {
            return ServiceError::store("Duplicate payment id");
        }
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
