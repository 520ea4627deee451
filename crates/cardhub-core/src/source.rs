//! Card data sources.
//!
//! Payloads follow the public card database's JSON layout. Field names vary
//! between endpoints (`type`/`cardtype`, `play_cost`/`playcost`, ...) and
//! numbers may arrive as strings or blanks, so every field is read leniently.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use cardhub_model::{Card, CardNumber, Evolution, ModelError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::debug;

use crate::SourceError;

/// Where uncached cards come from.
pub trait CardSource {
    /// `Ok(None)` when the source does not know the card.
    fn fetch(&self, cardnumber: &CardNumber) -> Result<Option<CardPayload>, SourceError>;

    /// Every cardnumber the source can provide.
    fn cardnumbers(&self) -> Result<Vec<CardNumber>, SourceError>;
}

/// One card as delivered by the card database.
#[derive(Debug, Clone, Default)]
pub struct CardPayload {
    pub cardnumber: String,
    pub name: String,
    pub card_type: String,
    pub color: String,
    pub color2: String,
    pub level: Option<u32>,
    pub dp: Option<u32>,
    pub play_cost: Option<u32>,
    pub evo_cost: Option<u32>,
    pub evo_color: String,
    pub evo_level: Option<u32>,
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
}

impl<'de> Deserialize<'de> for CardPayload {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let fields = Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self::from_fields(&fields))
    }
}

impl CardPayload {
    /// Read a payload object. Each field may appear under several names;
    /// the first non-empty one wins.
    pub fn from_fields(fields: &Map<String, Value>) -> Self {
        let text = |names: &[&str]| lenient::text(fields, names);
        let number = |names: &[&str]| lenient::number(fields, names);
        Self {
            cardnumber: text(&["cardnumber", "id"]),
            name: text(&["name"]),
            card_type: text(&["type", "cardtype", "card_type"]),
            color: text(&["color"]),
            color2: text(&["color2"]),
            level: number(&["level"]),
            dp: number(&["dp"]),
            play_cost: number(&["play_cost", "playcost", "cost"]),
            evo_cost: number(&["evolution_cost", "evo_cost", "evocost"]),
            evo_color: text(&["evolution_color", "evo_color", "evocolor"]),
            evo_level: number(&["evolution_level", "evo_level"]),
            attribute: text(&["attribute"]),
            digitype: text(&["digitype", "digi_type"]),
            digitype2: text(&["digitype2", "digi_type2"]),
            form: text(&["form"]),
            rarity: text(&["rarity"]),
            pack: text(&["pack"]),
            effect: text(&["effect", "main_effect"]),
            inherit_effect: text(&[
                "inherit_effect",
                "inheriteffect",
                "inheritable_effect",
                "source_effect",
            ]),
            security_effect: text(&["security_effect", "securityeffect"]),
            image_url: text(&["image_url", "image"]),
        }
    }

    /// Build the cached record. `requested` is used when the payload does
    /// not carry its own cardnumber.
    pub fn into_card(
        self,
        requested: &CardNumber,
        synced_at: DateTime<Utc>,
    ) -> Result<Card, ModelError> {
        let cardnumber = if self.cardnumber.is_empty() {
            requested.clone()
        } else {
            CardNumber::new(&self.cardnumber)?
        };
        Ok(Card {
            cardnumber,
            name: self.name,
            card_type: self.card_type,
            color: self.color,
            color2: self.color2,
            level: self.level,
            dp: self.dp,
            play_cost: self.play_cost,
            evolution: [
                Evolution {
                    cost: self.evo_cost,
                    color: self.evo_color,
                    level: self.evo_level,
                },
                Evolution::default(),
            ],
            attribute: self.attribute,
            digitype: self.digitype,
            digitype2: self.digitype2,
            form: self.form,
            rarity: self.rarity,
            pack: self.pack,
            effect: self.effect,
            inherit_effect: self.inherit_effect,
            security_effect: self.security_effect,
            image_url: self.image_url,
            last_synced_at: synced_at,
        })
    }
}

mod lenient {
    use serde_json::{Map, Value};

    pub(super) fn text(fields: &Map<String, Value>, names: &[&str]) -> String {
        names
            .iter()
            .filter_map(|name| fields.get(*name))
            .find_map(|value| match value {
                Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
                Value::Number(number) => Some(number.to_string()),
                _ => None,
            })
            .unwrap_or_default()
    }

    pub(super) fn number(fields: &Map<String, Value>, names: &[&str]) -> Option<u32> {
        names
            .iter()
            .filter_map(|name| fields.get(*name))
            .find_map(|value| match value {
                Value::Number(number) => number.as_u64().and_then(|n| u32::try_from(n).ok()),
                Value::String(text) => text.trim().parse().ok(),
                _ => None,
            })
    }
}

/// Card payloads read from a local JSON array, as exported from the card
/// database's search endpoint.
#[derive(Debug, Clone, Default)]
pub struct JsonFileSource {
    path: Option<PathBuf>,
    cards: BTreeMap<CardNumber, CardPayload>,
}

impl JsonFileSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let payloads: Vec<CardPayload> =
            serde_json::from_str(&raw).map_err(|source| SourceError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        let mut this = Self::from_payloads(payloads);
        this.path = Some(path.to_path_buf());
        debug!(path = %path.display(), cards = this.len(), "loaded card source");
        Ok(this)
    }

    /// Payloads without a valid cardnumber are skipped. Later duplicates win.
    pub fn from_payloads(payloads: impl IntoIterator<Item = CardPayload>) -> Self {
        let cards = payloads
            .into_iter()
            .filter_map(|payload| {
                CardNumber::new(&payload.cardnumber)
                    .ok()
                    .map(|cardnumber| (cardnumber, payload))
            })
            .collect();
        Self { path: None, cards }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl CardSource for JsonFileSource {
    fn fetch(&self, cardnumber: &CardNumber) -> Result<Option<CardPayload>, SourceError> {
        Ok(self.cards.get(cardnumber).cloned())
    }

    fn cardnumbers(&self) -> Result<Vec<CardNumber>, SourceError> {
        Ok(self.cards.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_accepts_aliases_and_string_numbers() {
        let payload: CardPayload = serde_json::from_str(
            r#"{
                "id": "bt1-010",
                "name": " Agumon ",
                "cardtype": "Digimon",
                "playcost": "3",
                "level": 3,
                "dp": "",
                "evocost": "0",
                "evocolor": "Red",
                "digi_type": "Reptile",
                "inheriteffect": "[Your Turn] +1000 DP",
                "image": null
            }"#,
        )
        .unwrap();
        assert_eq!(payload.cardnumber, "bt1-010");
        assert_eq!(payload.name, "Agumon");
        assert_eq!(payload.card_type, "Digimon");
        assert_eq!(payload.play_cost, Some(3));
        assert_eq!(payload.level, Some(3));
        assert_eq!(payload.dp, None);
        assert_eq!(payload.evo_cost, Some(0));
        assert_eq!(payload.digitype, "Reptile");
        assert!(payload.image_url.is_empty());

        let requested = CardNumber::new("BT1-010").unwrap();
        let card = payload.into_card(&requested, Utc::now()).unwrap();
        assert_eq!(card.cardnumber, requested);
        assert_eq!(card.evolution[0].color, "Red");
    }

    #[test]
    fn payload_tolerates_repeated_field_names() {
        let payloads: Vec<CardPayload> = serde_json::from_str(
            r#"[{
                "cardnumber": "BT1-010",
                "id": "BT1-010",
                "name": "Agumon",
                "type": "",
                "cardtype": "Digimon",
                "play_cost": null,
                "playcost": 3,
                "evolution_cost": "0",
                "evocost": "2"
            }]"#,
        )
        .unwrap();
        let payload = &payloads[0];
        assert_eq!(payload.cardnumber, "BT1-010");
        assert_eq!(payload.card_type, "Digimon");
        assert_eq!(payload.play_cost, Some(3));
        assert_eq!(payload.evo_cost, Some(0));
    }

    #[test]
    fn payload_without_number_uses_requested() {
        let payload = CardPayload {
            name: "Koromon".to_string(),
            ..CardPayload::default()
        };
        let requested = CardNumber::new("BT1-001").unwrap();
        let card = payload.into_card(&requested, Utc::now()).unwrap();
        assert_eq!(card.cardnumber.as_str(), "BT1-001");
    }

    #[test]
    fn file_source_skips_entries_without_number() {
        let source = JsonFileSource::from_payloads([
            CardPayload {
                cardnumber: "BT1-010".to_string(),
                ..CardPayload::default()
            },
            CardPayload::default(),
        ]);
        assert_eq!(source.len(), 1);
        let number = CardNumber::new("bt1-010").unwrap();
        assert!(source.fetch(&number).unwrap().is_some());
    }
}
