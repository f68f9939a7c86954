mod rank;
mod reconcile;
mod record;
mod registration;

pub use rank::{
    RankedAttendee, RankedContributor, attendance_rate, average_attendance_per_game,
    top_attendance, top_contributors,
};
pub use reconcile::{GameCollections, PaymentAmounts, PaymentTransition, reconcile_payment};
pub use record::{GameResult, TeamRecord, classify_result};
pub use registration::{
    DEFAULT_REGISTRATION_TARGET, REGISTRATION_TARGET_MAX, REGISTRATION_TARGET_MIN,
    registration_target,
};

/// Number of entries returned by the contribution and attendance rankings.
pub const RANKING_SIZE: usize = 3;
