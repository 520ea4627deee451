use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CardNumber, Game, ModelError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub game: Game,
    /// Used for grouping in archetype rankings.
    pub archetype: String,
    pub description: String,
    pub public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating a deck.
#[derive(Debug, Clone, Default)]
pub struct NewDeck {
    pub name: String,
    pub game: Game,
    pub archetype: String,
    pub description: String,
    pub public: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeckSection {
    #[default]
    Main,
    Egg,
}

impl DeckSection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Main => "MAIN",
            Self::Egg => "EGG",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Main => "Main Deck",
            Self::Egg => "Digi-Egg Deck",
        }
    }
}

impl fmt::Display for DeckSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeckSection {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "MAIN" => Ok(Self::Main),
            "EGG" => Ok(Self::Egg),
            _ => Err(ModelError::InvalidSection(s.to_string())),
        }
    }
}

/// One line of a deck: a quantity of a single card in one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckCard {
    pub id: i64,
    pub deck_id: i64,
    pub section: DeckSection,
    pub quantity: u32,
    pub cardnumber: CardNumber,
    pub card_name: String,
}

impl fmt::Display for DeckCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x {} {}", self.quantity, self.cardnumber, self.card_name)
    }
}
