use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Target used when the team has no registration fee configured.
pub const DEFAULT_REGISTRATION_TARGET: Decimal = dec!(450);

pub const REGISTRATION_TARGET_MIN: Decimal = dec!(200);
pub const REGISTRATION_TARGET_MAX: Decimal = dec!(800);

/// Assumed lineup size when a team has no attendance history yet.
const FALLBACK_AVERAGE_ATTENDANCE: Decimal = dec!(12);

/// Computes the per-player registration ask for a team.
///
/// The total team fee is divided by the average attendance per game and the
/// result is clamped to [200, 800] so that outlier inputs never produce an
/// absurd ask. A missing or zero average never reaches the division.
pub fn registration_target(
    registration_fee_total: Option<Decimal>,
    total_games: u32,
    total_attendance_rows: u32,
) -> Decimal {
    let Some(fee) = registration_fee_total.filter(|fee| !fee.is_zero()) else {
        return DEFAULT_REGISTRATION_TARGET;
    };
    let average = if total_games == 0 {
        FALLBACK_AVERAGE_ATTENDANCE
    } else {
        let average = Decimal::from(total_attendance_rows) / Decimal::from(total_games);
        if average.is_zero() {
            FALLBACK_AVERAGE_ATTENDANCE
        } else {
            average
        }
    };
    let target = (fee / average).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    target.clamp(REGISTRATION_TARGET_MIN, REGISTRATION_TARGET_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_fee_uses_default_target() {
        assert_eq!(registration_target(None, 10, 120), dec!(450));
        assert_eq!(registration_target(Some(Decimal::ZERO), 10, 120), dec!(450));
    }

    #[test]
    fn test_target_divides_fee_by_average_attendance() {
        // 4500 over an average of 12 attendees per game.
        assert_eq!(registration_target(Some(dec!(4500)), 12, 144), dec!(375));
    }

    #[test]
    fn test_low_average_attendance_clamps_to_max() {
        // 4500 / 1.5 = 3000, clamped.
        assert_eq!(registration_target(Some(dec!(4500)), 10, 15), dec!(800));
    }

    #[test]
    fn test_high_average_attendance_clamps_to_min() {
        // 1000 / 20 = 50, clamped.
        assert_eq!(registration_target(Some(dec!(1000)), 5, 100), dec!(200));
    }

    #[test]
    fn test_no_games_uses_fallback_lineup() {
        // 4800 / 12 = 400.
        assert_eq!(registration_target(Some(dec!(4800)), 0, 0), dec!(400));
    }

    #[test]
    fn test_zero_attendance_uses_fallback_lineup() {
        assert_eq!(registration_target(Some(dec!(4800)), 8, 0), dec!(400));
    }

    #[test]
    fn test_target_is_rounded_half_away_from_zero() {
        // 4000 / 16 = 250 exactly.
        assert_eq!(registration_target(Some(dec!(4000)), 2, 32), dec!(250));
        // 2450 / 12 (fallback) = 204.1666... -> 204.
        assert_eq!(registration_target(Some(dec!(2450)), 0, 0), dec!(204));
        // 2454 / 12 = 204.5 -> 205, not 204.
        assert_eq!(registration_target(Some(dec!(2454)), 0, 0), dec!(205));
    }

    #[test]
    fn test_bounds_hold_across_inputs() {
        for fee in [1u32, 10, 450, 4500, 1_000_000] {
            for games in [0u32, 1, 10, 50] {
                for rows in [0u32, 1, 15, 600] {
                    let target = registration_target(Some(Decimal::from(fee)), games, rows);
                    assert!(target >= REGISTRATION_TARGET_MIN);
                    assert!(target <= REGISTRATION_TARGET_MAX);
                }
            }
        }
    }
}
