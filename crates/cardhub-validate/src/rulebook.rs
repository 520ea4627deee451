//! Lookup tables of the format's card rules.
//!
//! A card's effective limit is the copy-rule limit (default 4) capped by its
//! banlist entry, if one exists:
//!
//! | copy rule | banlist    | effective |
//! |-----------|------------|-----------|
//! | none      | none       | 4         |
//! | none      | LIMITED_1  | 1         |
//! | 50        | BANNED     | 0         |
//! | 50        | none       | 50        |

use std::collections::{BTreeMap, BTreeSet};

use cardhub_model::{BanlistRule, CardNumber, CopyRule, PairBanRule};

use crate::FormatLimits;

#[derive(Debug, Clone, Default)]
pub struct RuleBook {
    limits: FormatLimits,
    copy_rules: BTreeMap<CardNumber, CopyRule>,
    ban_rules: BTreeMap<CardNumber, BanlistRule>,
    pair_bans: Vec<PairBanRule>,
}

impl RuleBook {
    pub fn new(limits: FormatLimits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    pub fn from_rules(
        limits: FormatLimits,
        copy_rules: impl IntoIterator<Item = CopyRule>,
        ban_rules: impl IntoIterator<Item = BanlistRule>,
        pair_bans: impl IntoIterator<Item = PairBanRule>,
    ) -> Self {
        let mut book = Self::new(limits);
        for rule in copy_rules {
            book.add_copy_rule(rule);
        }
        for rule in ban_rules {
            book.add_ban_rule(rule);
        }
        for rule in pair_bans {
            book.add_pair_ban(rule);
        }
        book
    }

    pub fn limits(&self) -> &FormatLimits {
        &self.limits
    }

    /// Replaces any existing copy rule for the same card.
    pub fn add_copy_rule(&mut self, rule: CopyRule) {
        self.copy_rules.insert(rule.cardnumber.clone(), rule);
    }

    /// Replaces any existing banlist entry for the same card.
    pub fn add_ban_rule(&mut self, rule: BanlistRule) {
        self.ban_rules.insert(rule.cardnumber.clone(), rule);
    }

    /// Ignored when the same pair is already registered.
    pub fn add_pair_ban(&mut self, rule: PairBanRule) {
        let exists = self
            .pair_bans
            .iter()
            .any(|known| known.card_a() == rule.card_a() && known.card_b() == rule.card_b());
        if !exists {
            self.pair_bans.push(rule);
        }
    }

    pub fn copy_rules(&self) -> impl Iterator<Item = &CopyRule> {
        self.copy_rules.values()
    }

    pub fn ban_rules(&self) -> impl Iterator<Item = &BanlistRule> {
        self.ban_rules.values()
    }

    pub fn pair_bans(&self) -> &[PairBanRule] {
        &self.pair_bans
    }

    /// Copies allowed by the copy rules alone.
    pub fn copy_limit(&self, cardnumber: &CardNumber) -> u32 {
        self.copy_rules
            .get(cardnumber)
            .map_or(self.limits.default_max_copies, |rule| rule.max_copies)
    }

    /// Copies allowed by the banlist, `None` when the card is not listed.
    pub fn ban_limit(&self, cardnumber: &CardNumber) -> Option<u32> {
        self.ban_rules.get(cardnumber).map(BanlistRule::max_allowed)
    }

    pub fn effective_limit(&self, cardnumber: &CardNumber) -> u32 {
        let by_copy = self.copy_limit(cardnumber);
        match self.ban_limit(cardnumber) {
            Some(by_ban) => by_copy.min(by_ban),
            None => by_copy,
        }
    }

    /// First pair ban that `candidate` would complete with a card already present.
    pub fn pair_ban_conflict(
        &self,
        present: &BTreeSet<CardNumber>,
        candidate: &CardNumber,
    ) -> Option<&PairBanRule> {
        self.pair_bans.iter().find(|rule| {
            rule.partner_of(candidate)
                .is_some_and(|partner| present.contains(partner))
        })
    }

    /// First pair ban with both cards present, if any.
    pub fn check_pair_bans<'a>(
        &'a self,
        present: &'a BTreeSet<CardNumber>,
    ) -> Option<&'a PairBanRule> {
        self.pair_ban_violations(present).next()
    }

    /// Every pair ban with both cards present.
    pub fn pair_ban_violations<'a>(
        &'a self,
        present: &'a BTreeSet<CardNumber>,
    ) -> impl Iterator<Item = &'a PairBanRule> + 'a {
        self.pair_bans
            .iter()
            .filter(|rule| present.contains(rule.card_a()) && present.contains(rule.card_b()))
    }
}

#[cfg(test)]
mod tests {
    use cardhub_model::BanStatus;

    use super::*;

    fn cn(value: &str) -> CardNumber {
        CardNumber::new(value).unwrap()
    }

    fn book() -> RuleBook {
        RuleBook::from_rules(
            FormatLimits::default(),
            [
                CopyRule {
                    cardnumber: cn("BT6-085"),
                    max_copies: 50,
                    notes: String::new(),
                },
                CopyRule {
                    cardnumber: cn("EX1-001"),
                    max_copies: 50,
                    notes: String::new(),
                },
            ],
            [
                BanlistRule {
                    cardnumber: cn("BT2-047"),
                    status: BanStatus::Limited1,
                    notes: String::new(),
                },
                BanlistRule {
                    cardnumber: cn("EX1-001"),
                    status: BanStatus::Banned,
                    notes: String::new(),
                },
            ],
            [],
        )
    }

    #[test]
    fn effective_limit_table() {
        let rules = book();
        assert_eq!(rules.effective_limit(&cn("BT1-001")), 4);
        assert_eq!(rules.effective_limit(&cn("bt2-047")), 1);
        assert_eq!(rules.effective_limit(&cn("EX1-001")), 0);
        assert_eq!(rules.effective_limit(&cn("BT6-085")), 50);
    }

    #[test]
    fn ban_limit_absent_for_unlisted_cards() {
        let rules = book();
        assert_eq!(rules.ban_limit(&cn("BT1-001")), None);
        assert_eq!(rules.ban_limit(&cn("BT2-047")), Some(1));
    }

    #[test]
    fn duplicate_pair_bans_are_collapsed() {
        let mut rules = RuleBook::default();
        rules.add_pair_ban(PairBanRule::new(cn("A1-001"), cn("B1-001"), "").unwrap());
        rules.add_pair_ban(PairBanRule::new(cn("B1-001"), cn("A1-001"), "again").unwrap());
        assert_eq!(rules.pair_bans().len(), 1);
    }
}
