#![deny(unsafe_code)]

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::ModelError;

static CANONICAL_CARDNUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z]{1,5}\d{1,3}-\d{1,3}[A-Z]?$").expect("cardnumber pattern compiles")
});

/// Card identifier used as the join key across cache, pricing and rule tables.
///
/// Stored trimmed and upper-cased so lookups are case-insensitive.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct CardNumber(String);

impl CardNumber {
    pub fn new(value: impl AsRef<str>) -> Result<Self, ModelError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ModelError::EmptyCardNumber);
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the value looks like an official set code (e.g. `BT24-012`, `ST1-01`).
    pub fn is_canonical(&self) -> bool {
        CANONICAL_CARDNUMBER.is_match(&self.0)
    }
}

impl fmt::Display for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CardNumber {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CardNumber {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CardNumber> for String {
    fn from(value: CardNumber) -> Self {
        value.0
    }
}

impl AsRef<str> for CardNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        let cn = CardNumber::new("  bt24-012 ").unwrap();
        assert_eq!(cn.as_str(), "BT24-012");
    }

    #[test]
    fn rejects_blank() {
        assert!(matches!(
            CardNumber::new("   "),
            Err(ModelError::EmptyCardNumber)
        ));
    }

    #[test]
    fn canonical_shapes() {
        for code in ["BT24-089", "ST1-01", "EX2-001", "P-001"] {
            let cn = CardNumber::new(code).unwrap();
            assert_eq!(cn.is_canonical(), code != "P-001", "{code}");
        }
        assert!(CardNumber::new("BT1-001A").unwrap().is_canonical());
        assert!(!CardNumber::new("MetalGreymon").unwrap().is_canonical());
    }
}
