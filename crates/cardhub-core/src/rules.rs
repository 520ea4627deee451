//! Maintenance of the format rules.

use cardhub_model::{BanStatus, BanlistRule, CardNumber, CopyRule, PairBanRule};
use cardhub_store::rules;
use serde::Serialize;

use crate::{Hub, Result};

/// How many copies of a card a deck may hold, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardLimit {
    pub cardnumber: CardNumber,
    pub copy_limit: u32,
    pub ban_status: Option<BanStatus>,
    pub effective: u32,
    pub pair_banned_with: Vec<CardNumber>,
}

impl Hub {
    pub fn set_copy_rule(
        &self,
        cardnumber: CardNumber,
        max_copies: u32,
        notes: &str,
    ) -> Result<CopyRule> {
        let rule = CopyRule {
            cardnumber,
            max_copies,
            notes: notes.trim().to_string(),
        };
        rules::upsert_copy_rule(self.store.conn(), &rule)?;
        Ok(rule)
    }

    pub fn set_ban_rule(
        &self,
        cardnumber: CardNumber,
        status: BanStatus,
        notes: &str,
    ) -> Result<BanlistRule> {
        let rule = BanlistRule {
            cardnumber,
            status,
            notes: notes.trim().to_string(),
        };
        rules::upsert_ban_rule(self.store.conn(), &rule)?;
        Ok(rule)
    }

    pub fn add_pair_ban(&self, a: CardNumber, b: CardNumber, notes: &str) -> Result<PairBanRule> {
        let rule = PairBanRule::new(a, b, notes.trim())?;
        rules::add_pair_ban(self.store.conn(), &rule)?;
        Ok(rule)
    }

    pub fn remove_copy_rule(&self, cardnumber: &CardNumber) -> Result<()> {
        Ok(rules::delete_copy_rule(self.store.conn(), cardnumber)?)
    }

    pub fn remove_ban_rule(&self, cardnumber: &CardNumber) -> Result<()> {
        Ok(rules::delete_ban_rule(self.store.conn(), cardnumber)?)
    }

    pub fn remove_pair_ban(&self, a: CardNumber, b: CardNumber) -> Result<()> {
        let rule = PairBanRule::new(a, b, "")?;
        Ok(rules::delete_pair_ban(self.store.conn(), &rule)?)
    }

    pub fn card_limit(&self, cardnumber: &CardNumber) -> Result<CardLimit> {
        let book = self.rulebook()?;
        let pair_banned_with = book
            .pair_bans()
            .iter()
            .filter_map(|rule| rule.partner_of(cardnumber).cloned())
            .collect();
        Ok(CardLimit {
            cardnumber: cardnumber.clone(),
            copy_limit: book.copy_limit(cardnumber),
            ban_status: book
                .ban_rules()
                .find(|rule| &rule.cardnumber == cardnumber)
                .map(|rule| rule.status),
            effective: book.effective_limit(cardnumber),
            pair_banned_with,
        })
    }
}
