use serde::{Deserialize, Serialize};

use cardhub_model::DeckSection;

pub const MAIN_LIMIT: u32 = 50;
pub const EGG_LIMIT: u32 = 5;
pub const DEFAULT_MAX_COPIES: u32 = 4;

/// Deck-building limits of the format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatLimits {
    /// Cards allowed in the main deck.
    pub main_limit: u32,
    /// Cards allowed in the Digi-Egg deck.
    pub egg_limit: u32,
    /// Copies of one card allowed when no copy rule exists.
    pub default_max_copies: u32,
}

impl Default for FormatLimits {
    fn default() -> Self {
        Self {
            main_limit: MAIN_LIMIT,
            egg_limit: EGG_LIMIT,
            default_max_copies: DEFAULT_MAX_COPIES,
        }
    }
}

impl FormatLimits {
    pub fn section_limit(&self, section: DeckSection) -> u32 {
        match section {
            DeckSection::Main => self.main_limit,
            DeckSection::Egg => self.egg_limit,
        }
    }
}
