use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CardNumber;

const CARD_IMAGE_CDN: &str = "https://images.digimoncard.io/images/cards";

/// Card type labels that identify a Digi-Egg card.
const EGG_CARD_TYPES: &[&str] = &["digi-egg", "digiegg", "digi egg", "digi-egg deck", "egg"];

/// Evolution requirement slot (cards can carry up to two).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evolution {
    pub cost: Option<u32>,
    pub color: String,
    pub level: Option<u32>,
}

/// A card cached locally from the public card database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub cardnumber: CardNumber,
    pub name: String,
    /// Digimon, Tamer, Option, Digi-Egg.
    pub card_type: String,
    pub color: String,
    pub color2: String,
    pub level: Option<u32>,
    pub dp: Option<u32>,
    pub play_cost: Option<u32>,
    pub evolution: [Evolution; 2],
    pub attribute: String,
    pub digitype: String,
    pub digitype2: String,
    pub form: String,
    pub rarity: String,
    pub pack: String,
    pub effect: String,
    pub inherit_effect: String,
    pub security_effect: String,
    pub image_url: String,
    pub last_synced_at: DateTime<Utc>,
}

impl Card {
    /// A card with only the identifying fields set.
    pub fn new(cardnumber: CardNumber, name: impl Into<String>) -> Self {
        Self {
            cardnumber,
            name: name.into(),
            card_type: String::new(),
            color: String::new(),
            color2: String::new(),
            level: None,
            dp: None,
            play_cost: None,
            evolution: Default::default(),
            attribute: String::new(),
            digitype: String::new(),
            digitype2: String::new(),
            form: String::new(),
            rarity: String::new(),
            pack: String::new(),
            effect: String::new(),
            inherit_effect: String::new(),
            security_effect: String::new(),
            image_url: String::new(),
            last_synced_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_type(mut self, card_type: impl Into<String>) -> Self {
        self.card_type = card_type.into();
        self
    }

    pub fn is_egg(&self) -> bool {
        is_egg_card_type(&self.card_type)
    }

    pub fn cdn_image_url(&self) -> String {
        format!("{CARD_IMAGE_CDN}/{}.webp", self.cardnumber)
    }

    /// Whole days since the card was last refreshed from the source.
    pub fn age_days(&self, now: DateTime<Utc>) -> i64 {
        (now - self.last_synced_at).num_days()
    }
}

pub fn is_egg_card_type(card_type: &str) -> bool {
    let normalized = card_type.trim().to_lowercase();
    EGG_CARD_TYPES.contains(&normalized.as_str())
}

/// Shop price for a card, maintained by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPrice {
    pub cardnumber: CardNumber,
    pub name: String,
    pub price_cents: i64,
    pub product_url: String,
    pub in_stock: bool,
    pub updated_at: DateTime<Utc>,
}

/// Render an amount in cents as `12.34`.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn egg_detection_tolerates_spelling() {
        for label in ["Digi-Egg", " DIGIEGG ", "digi egg", "Digi-Egg Deck", "Egg"] {
            assert!(is_egg_card_type(label), "{label}");
        }
        assert!(!is_egg_card_type("Digimon"));
        assert!(!is_egg_card_type(""));
    }

    #[test]
    fn cdn_url_uses_cardnumber() {
        let card = Card::new(CardNumber::new("bt1-001").unwrap(), "Yokomon");
        assert_eq!(
            card.cdn_image_url(),
            "https://images.digimoncard.io/images/cards/BT1-001.webp"
        );
    }

    #[test]
    fn cents_formatting() {
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(1234), "12.34");
        assert_eq!(format_cents(5), "0.05");
        assert_eq!(format_cents(-250), "-2.50");
    }
}
