use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Trading card games the hub tracks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Game {
    #[default]
    Digimon,
    Lorcana,
    Union,
    Other,
}

impl Game {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Digimon => "DIGIMON",
            Self::Lorcana => "LORCANA",
            Self::Union => "UNION",
            Self::Other => "OTHER",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Digimon => "Digimon",
            Self::Lorcana => "Lorcana",
            Self::Union => "Union Arena",
            Self::Other => "Other TCG",
        }
    }

    /// Whether decks for this game can be built and checked by the hub.
    pub fn supports_decks(self) -> bool {
        matches!(self, Self::Digimon)
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Game {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DIGIMON" => Ok(Self::Digimon),
            "LORCANA" => Ok(Self::Lorcana),
            "UNION" | "UNION ARENA" => Ok(Self::Union),
            "OTHER" | "OUTRO" => Ok(Self::Other),
            _ => Err(ModelError::InvalidGame(s.to_string())),
        }
    }
}
