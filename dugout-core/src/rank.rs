use std::collections::HashMap;
use std::hash::Hash;

use rust_decimal::Decimal;

use crate::RANKING_SIZE;

/// A player's summed registration contributions, for the top-contributor
/// board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankedContributor<K> {
    pub player_id: K,
    pub player_name: String,
    pub total: Decimal,
}

/// A player's attendance count, for the top-attendance board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankedAttendee<K> {
    pub player_id: K,
    pub player_name: String,
    pub games_attended: u32,
}

/// Groups registration amounts by player and returns the top contributors.
///
/// Rows without a positive registration share are ignored. Ties are broken
/// alphabetically by name, then by id, so the ranking is deterministic.
pub fn top_contributors<K>(rows: &[(K, String, Decimal)]) -> Vec<RankedContributor<K>>
where
    K: Eq + Hash + Ord + Clone,
{
    let mut totals: HashMap<K, (String, Decimal)> = HashMap::new();
    for (player_id, player_name, amount) in rows {
        if *amount <= Decimal::ZERO {
            continue;
        }
        let entry = totals
            .entry(player_id.clone())
            .or_insert_with(|| (player_name.clone(), Decimal::ZERO));
        entry.1 += *amount;
    }
    let mut ranking: Vec<RankedContributor<K>> = totals
        .into_iter()
        .map(|(player_id, (player_name, total))| RankedContributor {
            player_id,
            player_name,
            total,
        })
        .collect();
    ranking.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.player_name.cmp(&b.player_name))
            .then_with(|| a.player_id.cmp(&b.player_id))
    });
    ranking.truncate(RANKING_SIZE);
    ranking
}

/// Counts attendance rows by player and returns the top attendees, with the
/// same deterministic tie-breaking as the contribution ranking.
pub fn top_attendance<K>(rows: &[(K, String)]) -> Vec<RankedAttendee<K>>
where
    K: Eq + Hash + Ord + Clone,
{
    let mut counts: HashMap<K, (String, u32)> = HashMap::new();
    for (player_id, player_name) in rows {
        let entry = counts
            .entry(player_id.clone())
            .or_insert_with(|| (player_name.clone(), 0));
        entry.1 += 1;
    }
    let mut ranking: Vec<RankedAttendee<K>> = counts
        .into_iter()
        .map(|(player_id, (player_name, games_attended))| RankedAttendee {
            player_id,
            player_name,
            games_attended,
        })
        .collect();
    ranking.sort_by(|a, b| {
        b.games_attended
            .cmp(&a.games_attended)
            .then_with(|| a.player_name.cmp(&b.player_name))
            .then_with(|| a.player_id.cmp(&b.player_id))
    });
    ranking.truncate(RANKING_SIZE);
    ranking
}

/// Percentage of team games a player attended, rounded to one decimal.
/// A team without games yields 0 rather than a division error.
pub fn attendance_rate(player_attendance: u32, total_team_games: u32) -> f64 {
    if total_team_games == 0 {
        return 0.0;
    }
    let rate = player_attendance as f64 / total_team_games as f64 * 100.0;
    (rate * 10.0).round() / 10.0
}

/// Average attendance rows per game, rounded to the nearest whole player.
pub fn average_attendance_per_game(total_attendance_rows: u32, total_games: u32) -> u32 {
    if total_games == 0 {
        return 0;
    }
    (total_attendance_rows as f64 / total_games as f64).round() as u32
}
