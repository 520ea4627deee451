//! Format rule records: copy-limit exceptions, banlist entries and pair bans.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CardNumber, ModelError};

/// Per-card override of the default copy limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyRule {
    pub cardnumber: CardNumber,
    pub max_copies: u32,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BanStatus {
    Banned,
    #[serde(rename = "LIMITED_1")]
    Limited1,
    #[serde(rename = "LIMITED_2")]
    Limited2,
    #[serde(rename = "LIMITED_3")]
    Limited3,
}

impl BanStatus {
    pub fn max_allowed(self) -> u32 {
        match self {
            Self::Banned => 0,
            Self::Limited1 => 1,
            Self::Limited2 => 2,
            Self::Limited3 => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Banned => "BANNED",
            Self::Limited1 => "LIMITED_1",
            Self::Limited2 => "LIMITED_2",
            Self::Limited3 => "LIMITED_3",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Banned => "Banned (0)",
            Self::Limited1 => "Limited to 1",
            Self::Limited2 => "Limited to 2",
            Self::Limited3 => "Limited to 3",
        }
    }
}

impl fmt::Display for BanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BanStatus {
    type Err = ModelError;

    /// Accepts `BANNED`, `LIMITED_n` and the bare counts `0`..`3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BANNED" | "0" => Ok(Self::Banned),
            "LIMITED_1" | "1" => Ok(Self::Limited1),
            "LIMITED_2" | "2" => Ok(Self::Limited2),
            "LIMITED_3" | "3" => Ok(Self::Limited3),
            _ => Err(ModelError::InvalidBanStatus(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanlistRule {
    pub cardnumber: CardNumber,
    pub status: BanStatus,
    #[serde(default)]
    pub notes: String,
}

impl BanlistRule {
    pub fn max_allowed(&self) -> u32 {
        self.status.max_allowed()
    }
}

/// Two cards that may not be played in the same deck.
///
/// The pair is kept ordered (`card_a <= card_b`) so `(X, Y)` and `(Y, X)`
/// are the same rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PairBanRule {
    card_a: CardNumber,
    card_b: CardNumber,
    pub notes: String,
}

impl PairBanRule {
    pub fn new(a: CardNumber, b: CardNumber, notes: impl Into<String>) -> Result<Self, ModelError> {
        if a == b {
            return Err(ModelError::SelfPairBan(a.to_string()));
        }
        let (card_a, card_b) = if a <= b { (a, b) } else { (b, a) };
        Ok(Self {
            card_a,
            card_b,
            notes: notes.into(),
        })
    }

    pub fn card_a(&self) -> &CardNumber {
        &self.card_a
    }

    pub fn card_b(&self) -> &CardNumber {
        &self.card_b
    }

    pub fn involves(&self, card: &CardNumber) -> bool {
        &self.card_a == card || &self.card_b == card
    }

    /// The card paired with `card`, if `card` is part of this rule.
    pub fn partner_of(&self, card: &CardNumber) -> Option<&CardNumber> {
        if &self.card_a == card {
            Some(&self.card_b)
        } else if &self.card_b == card {
            Some(&self.card_a)
        } else {
            None
        }
    }
}

impl fmt::Display for PairBanRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {} (pair ban)", self.card_a, self.card_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cn(value: &str) -> CardNumber {
        CardNumber::new(value).unwrap()
    }

    #[test]
    fn ban_status_limits() {
        assert_eq!(BanStatus::Banned.max_allowed(), 0);
        assert_eq!(BanStatus::Limited1.max_allowed(), 1);
        assert_eq!(BanStatus::Limited3.max_allowed(), 3);
    }

    #[test]
    fn ban_status_parses_labels_and_counts() {
        assert_eq!("banned".parse::<BanStatus>().unwrap(), BanStatus::Banned);
        assert_eq!(" limited_2 ".parse::<BanStatus>().unwrap(), BanStatus::Limited2);
        assert_eq!("1".parse::<BanStatus>().unwrap(), BanStatus::Limited1);
        assert!("LIMITED_4".parse::<BanStatus>().is_err());
    }

    #[test]
    fn pair_ban_is_order_independent() {
        let forward = PairBanRule::new(cn("BT2-020"), cn("bt1-010"), "").unwrap();
        let reverse = PairBanRule::new(cn("BT1-010"), cn("BT2-020"), "").unwrap();
        assert_eq!(forward, reverse);
        assert_eq!(forward.card_a().as_str(), "BT1-010");
        assert_eq!(forward.partner_of(&cn("BT2-020")), Some(&cn("BT1-010")));
        assert_eq!(forward.partner_of(&cn("BT3-001")), None);
    }

    #[test]
    fn pair_ban_rejects_same_card() {
        assert!(matches!(
            PairBanRule::new(cn("BT1-010"), cn("bt1-010"), ""),
            Err(ModelError::SelfPairBan(_))
        ));
    }
}
