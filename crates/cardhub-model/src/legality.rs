use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{CardNumber, DeckSection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Warning,
    Error,
}

/// Stable identifier of a legality check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    InvalidQuantity,
    SectionFull,
    Banned,
    CopyLimitExceeded,
    PairBanned,
    /// Deck line refers to a card missing from the local cache.
    UncachedCard,
}

impl IssueCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidQuantity => "invalid_quantity",
            Self::SectionFull => "section_full",
            Self::Banned => "banned",
            Self::CopyLimitExceeded => "copy_limit_exceeded",
            Self::PairBanned => "pair_banned",
            Self::UncachedCard => "uncached_card",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rule violation found while building or checking a deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalityIssue {
    pub code: IssueCode,
    pub severity: IssueSeverity,
    /// Human-readable message describing the issue.
    pub message: String,
    pub cardnumber: Option<CardNumber>,
    pub section: Option<DeckSection>,
    /// Copies (or cards) involved, when meaningful.
    pub count: Option<u32>,
}

impl fmt::Display for LegalityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for LegalityIssue {}

/// Legality report for a whole deck.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalityReport {
    pub deck: String,
    pub main_total: u32,
    pub egg_total: u32,
    pub issues: Vec<LegalityIssue>,
}

impl LegalityReport {
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == IssueSeverity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == IssueSeverity::Warning)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn is_legal(&self) -> bool {
        !self.has_errors()
    }
}
