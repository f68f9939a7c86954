//! In-memory row store, standing in for the hosted backend tables. Each
//! repository owns one table keyed like the backend keys it.

mod attendance;
mod games;
mod payments;
mod players;
mod teams;

pub use attendance::MemoryAttendanceRepository;
pub use games::MemoryGameRepository;
pub use payments::MemoryPaymentRepository;
pub use players::MemoryPlayerRepository;
pub use teams::MemoryTeamRepository;
