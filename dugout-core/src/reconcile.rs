use rust_decimal::Decimal;

/// Amounts carried by a single payment row, split into the per-game umpire
/// share and the team registration share.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PaymentAmounts {
    pub umpire: Decimal,
    pub registration: Decimal,
}

impl PaymentAmounts {
    pub fn new(umpire: Decimal, registration: Decimal) -> Self {
        Self {
            umpire,
            registration,
        }
    }

    pub fn total(&self) -> Decimal {
        self.umpire + self.registration
    }
}

/// The single storage mutation a reconciled candidate resolves to.
///
/// `Delete` is the cancellation path: an existing row driven to a zero total
/// is removed rather than persisted at zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaymentTransition {
    Create(PaymentAmounts),
    Update(PaymentAmounts),
    Delete,
}

/// Decides what to do with a payment candidate for one player in one game.
///
/// The umpire share is clamped to the headroom left under the game's fee
/// target, counting only what *other* players have already paid in. Once the
/// target is fully funded the candidate's umpire share is forced to zero; it
/// is never partially rejected as an error.
pub fn reconcile_payment(
    existing: Option<PaymentAmounts>,
    candidate: PaymentAmounts,
    umpire_collected_by_others: Decimal,
    umpire_fee_target: Decimal,
) -> Result<PaymentTransition, String> {
    if candidate.umpire.is_sign_negative() || candidate.registration.is_sign_negative() {
        return Err("payment amounts must not be negative".to_string());
    }
    let headroom = (umpire_fee_target - umpire_collected_by_others).max(Decimal::ZERO);
    let capped = PaymentAmounts {
        umpire: candidate.umpire.min(headroom),
        registration: candidate.registration,
    };
    match (existing, capped.total() > Decimal::ZERO) {
        (None, true) => Ok(PaymentTransition::Create(capped)),
        (Some(_), true) => Ok(PaymentTransition::Update(capped)),
        (Some(_), false) => Ok(PaymentTransition::Delete),
        (None, false) => Err("cannot record a payment with a zero total".to_string()),
    }
}

/// Per-game money totals, always recomputed as a full sum over the current
/// rows. Never patched incrementally, so a recompute from the same rows is
/// idempotent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GameCollections {
    pub umpire_collected: Decimal,
    pub registration_collected: Decimal,
}

impl GameCollections {
    pub fn from_amounts<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = PaymentAmounts>,
    {
        let mut collections = GameCollections::default();
        for row in rows {
            if row.total() <= Decimal::ZERO {
                continue;
            }
            collections.umpire_collected += row.umpire;
            collections.registration_collected += row.registration;
        }
        collections
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_create_payment() {
        let transition = reconcile_payment(
            None,
            PaymentAmounts::new(dec!(100), dec!(50)),
            Decimal::ZERO,
            dec!(550),
        )
        .expect("Failed to reconcile");
        assert_eq!(
            transition,
            PaymentTransition::Create(PaymentAmounts::new(dec!(100), dec!(50)))
        );
    }

    #[test]
    fn test_zero_create_is_rejected() {
        let result = reconcile_payment(
            None,
            PaymentAmounts::new(Decimal::ZERO, Decimal::ZERO),
            Decimal::ZERO,
            dec!(550),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_amount_is_rejected() {
        let result = reconcile_payment(
            None,
            PaymentAmounts::new(dec!(-10), dec!(50)),
            Decimal::ZERO,
            dec!(550),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_update_replaces_amounts() {
        let transition = reconcile_payment(
            Some(PaymentAmounts::new(dec!(100), dec!(50))),
            PaymentAmounts::new(dec!(200), dec!(0)),
            Decimal::ZERO,
            dec!(550),
        )
        .expect("Failed to reconcile");
        assert_eq!(
            transition,
            PaymentTransition::Update(PaymentAmounts::new(dec!(200), dec!(0)))
        );
    }

    #[test]
    fn test_zero_update_deletes_the_row() {
        let transition = reconcile_payment(
            Some(PaymentAmounts::new(dec!(100), dec!(50))),
            PaymentAmounts::new(Decimal::ZERO, Decimal::ZERO),
            Decimal::ZERO,
            dec!(550),
        )
        .expect("Failed to reconcile");
        assert_eq!(transition, PaymentTransition::Delete);
    }

    #[test]
    fn test_umpire_share_is_clamped_to_headroom() {
        let transition = reconcile_payment(
            None,
            PaymentAmounts::new(dec!(300), Decimal::ZERO),
            dec!(300),
            dec!(550),
        )
        .expect("Failed to reconcile");
        assert_eq!(
            transition,
            PaymentTransition::Create(PaymentAmounts::new(dec!(250), Decimal::ZERO))
        );
    }

    #[test]
    fn test_umpire_share_is_zeroed_once_target_is_funded() {
        let transition = reconcile_payment(
            None,
            PaymentAmounts::new(dec!(300), dec!(50)),
            dec!(600),
            dec!(550),
        )
        .expect("Failed to reconcile");
        assert_eq!(
            transition,
            PaymentTransition::Create(PaymentAmounts::new(Decimal::ZERO, dec!(50)))
        );
    }

    #[test]
    fn test_capped_zero_create_is_rejected() {
        // Umpire intent exists but the target is already funded, and no
        // registration share is offered. Nothing would be stored.
        let result = reconcile_payment(
            None,
            PaymentAmounts::new(dec!(300), Decimal::ZERO),
            dec!(550),
            dec!(550),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_capped_zero_update_deletes() {
        let transition = reconcile_payment(
            Some(PaymentAmounts::new(dec!(100), Decimal::ZERO)),
            PaymentAmounts::new(dec!(300), Decimal::ZERO),
            dec!(550),
            dec!(550),
        )
        .expect("Failed to reconcile");
        assert_eq!(transition, PaymentTransition::Delete);
    }

    #[test]
    fn test_collections_sum_all_rows() {
        let collections = GameCollections::from_amounts(vec![
            PaymentAmounts::new(dec!(300), dec!(100)),
            PaymentAmounts::new(dec!(250), Decimal::ZERO),
            PaymentAmounts::new(Decimal::ZERO, dec!(450)),
        ]);
        assert_eq!(collections.umpire_collected, dec!(550));
        assert_eq!(collections.registration_collected, dec!(550));
    }

    #[test]
    fn test_collections_recompute_is_idempotent() {
        let rows = vec![
            PaymentAmounts::new(dec!(300), dec!(100)),
            PaymentAmounts::new(dec!(250), dec!(50)),
        ];
        let first = GameCollections::from_amounts(rows.clone());
        let second = GameCollections::from_amounts(rows);
        assert_eq!(first, second);
    }

    #[test]
    fn test_collections_skip_zero_rows() {
        let collections = GameCollections::from_amounts(vec![
            PaymentAmounts::new(Decimal::ZERO, Decimal::ZERO),
            PaymentAmounts::new(dec!(100), Decimal::ZERO),
        ]);
        assert_eq!(collections.umpire_collected, dec!(100));
        assert_eq!(collections.registration_collected, Decimal::ZERO);
    }
}
