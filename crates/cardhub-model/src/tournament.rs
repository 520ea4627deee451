use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{Game, ModelError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub active: bool,
}

impl Season {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TournamentStatus {
    #[default]
    Registration,
    Running,
    Finished,
}

impl TournamentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Registration => "REGISTRATION",
            Self::Running => "RUNNING",
            Self::Finished => "FINISHED",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Registration => "Registration open",
            Self::Running => "In progress",
            Self::Finished => "Finished",
        }
    }
}

impl fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TournamentStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "REGISTRATION" => Ok(Self::Registration),
            "RUNNING" => Ok(Self::Running),
            "FINISHED" => Ok(Self::Finished),
            _ => Err(ModelError::InvalidTournamentStatus(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: i64,
    pub name: String,
    pub game: Game,
    pub date: NaiveDate,
    pub location: String,
    pub description: String,
    pub season_id: Option<i64>,
    pub status: TournamentStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTournament {
    pub name: String,
    pub game: Game,
    pub date: NaiveDate,
    pub location: String,
    pub description: String,
    pub season_id: Option<i64>,
}

/// A player's result line in one tournament.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentPlayer {
    pub id: i64,
    pub tournament_id: i64,
    pub user_id: Option<i64>,
    pub player_name: String,
    pub deck_id: Option<i64>,
    pub archetype: String,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub points: i64,
    /// Opponents' match-win percentage.
    pub omw: f64,
    /// Opponents' opponents' match-win percentage.
    pub oomw: f64,
}

impl TournamentPlayer {
    /// Standings order: points, OMW, OOMW descending, then name.
    pub fn standings_cmp(&self, other: &Self) -> Ordering {
        other
            .points
            .cmp(&self.points)
            .then_with(|| other.omw.total_cmp(&self.omw))
            .then_with(|| other.oomw.total_cmp(&self.oomw))
            .then_with(|| self.player_name.cmp(&other.player_name))
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlayerResult {
    pub player_name: String,
    pub user_id: Option<i64>,
    pub deck_id: Option<i64>,
    pub archetype: String,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    /// Defaults to three points per win and one per draw.
    pub points: Option<i64>,
    pub omw: f64,
    pub oomw: f64,
}

impl PlayerResult {
    pub fn match_points(&self) -> i64 {
        self.points
            .unwrap_or_else(|| i64::from(self.wins) * 3 + i64::from(self.draws))
    }
}

/// Aggregated results of one player across tournaments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRanking {
    pub player_name: String,
    pub tournaments_played: u32,
    pub total_points: i64,
    pub total_wins: u32,
    pub total_draws: u32,
    pub total_losses: u32,
    pub avg_omw: f64,
    pub avg_oomw: f64,
}

/// Aggregated results of one deck archetype across tournaments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchetypeRanking {
    pub archetype: String,
    pub total_uses: u32,
    pub sum_points: i64,
    pub sum_wins: u32,
    pub sum_draws: u32,
    pub sum_losses: u32,
}
