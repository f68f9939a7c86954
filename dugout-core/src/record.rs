use serde::{Deserialize, Serialize};

/// Outcome of a finalized game, from the local team's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Victory,
    Loss,
    Tie,
}

pub fn classify_result(local_score: u32, opponent_score: u32) -> GameResult {
    if local_score > opponent_score {
        GameResult::Victory
    } else if local_score < opponent_score {
        GameResult::Loss
    } else {
        GameResult::Tie
    }
}

/// Win/loss/tie roll-up over a team's finalized games.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TeamRecord {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

impl TeamRecord {
    pub fn from_results<I>(results: I) -> Self
    where
        I: IntoIterator<Item = GameResult>,
    {
        let mut record = TeamRecord::default();
        for result in results {
            record.add(result);
        }
        record
    }

    pub fn add(&mut self, result: GameResult) {
        match result {
            GameResult::Victory => self.wins += 1,
            GameResult::Loss => self.losses += 1,
            GameResult::Tie => self.ties += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.wins + self.losses + self.ties
    }

    /// Whole-number win percentage, 0 for a team without finalized games.
    pub fn win_percentage(&self) -> u32 {
        if self.total() == 0 {
            return 0;
        }
        (self.wins as f64 / self.total() as f64 * 100.0).round() as u32
    }
}
