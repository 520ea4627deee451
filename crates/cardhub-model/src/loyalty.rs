use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LoyaltyKind {
    Purchase,
    Tournament,
    Bonus,
    Checkin,
}

impl LoyaltyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Purchase => "PURCHASE",
            Self::Tournament => "TOURNAMENT",
            Self::Bonus => "BONUS",
            Self::Checkin => "CHECKIN",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Purchase => "Purchase",
            Self::Tournament => "Tournament",
            Self::Bonus => "Bonus",
            Self::Checkin => "Check-in",
        }
    }
}

impl fmt::Display for LoyaltyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoyaltyKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PURCHASE" => Ok(Self::Purchase),
            "TOURNAMENT" => Ok(Self::Tournament),
            "BONUS" => Ok(Self::Bonus),
            "CHECKIN" | "CHECK-IN" => Ok(Self::Checkin),
            _ => Err(ModelError::InvalidLoyaltyKind(s.to_string())),
        }
    }
}

/// A signed points movement on a user's loyalty account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoyaltyEvent {
    pub id: i64,
    pub user_id: i64,
    pub kind: LoyaltyKind,
    pub points: i64,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for LoyaltyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.points >= 0 { "+" } else { "" };
        write!(f, "{sign}{} ({})", self.points, self.kind.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub cost_points: u32,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardRedemption {
    pub id: i64,
    pub user_id: i64,
    pub reward_id: i64,
    pub points_used: u32,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}
