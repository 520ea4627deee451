//! Deck builder: deck CRUD, legality-checked card additions and pricing.

use std::collections::BTreeMap;

use cardhub_model::{
    CardNumber, CardPrice, Deck, DeckCard, DeckSection, LegalityReport, NewDeck, User,
};
use cardhub_store::{cards, decks, prices, rules};
use cardhub_validate::{DeckCounts, uncached_card_issue, validate_addition, validate_deck};
use serde::Serialize;
use tracing::{info, warn};

use crate::{Hub, HubError, Result};

/// Largest quantity accepted by a single add.
pub const MAX_ADD_QUANTITY: u32 = 20;

/// Clamp a requested quantity into `1..=MAX_ADD_QUANTITY`.
pub fn clamp_quantity(requested: i64) -> u32 {
    let clamped = requested.clamp(1, i64::from(MAX_ADD_QUANTITY));
    u32::try_from(clamped).unwrap_or(1)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceRow {
    pub quantity: u32,
    pub cardnumber: CardNumber,
    pub name: String,
    pub unit_cents: Option<i64>,
    pub subtotal_cents: Option<i64>,
    pub product_url: String,
    pub in_stock: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeckPricing {
    pub rows: Vec<PriceRow>,
    /// Sum of the known subtotals.
    pub total_cents: i64,
    /// Lines without a price.
    pub missing: usize,
}

/// Price each deck line. Lines without a known price are listed with no
/// amount and counted in `missing`.
pub fn price_lines(lines: &[DeckCard], prices: &BTreeMap<CardNumber, CardPrice>) -> DeckPricing {
    let mut pricing = DeckPricing::default();
    for line in lines {
        let row = match prices.get(&line.cardnumber) {
            Some(price) => {
                let subtotal = price.price_cents * i64::from(line.quantity);
                pricing.total_cents += subtotal;
                PriceRow {
                    quantity: line.quantity,
                    cardnumber: line.cardnumber.clone(),
                    name: line.card_name.clone(),
                    unit_cents: Some(price.price_cents),
                    subtotal_cents: Some(subtotal),
                    product_url: price.product_url.clone(),
                    in_stock: price.in_stock,
                }
            }
            None => {
                pricing.missing += 1;
                PriceRow {
                    quantity: line.quantity,
                    cardnumber: line.cardnumber.clone(),
                    name: line.card_name.clone(),
                    unit_cents: None,
                    subtotal_cents: None,
                    product_url: String::new(),
                    in_stock: true,
                }
            }
        };
        pricing.rows.push(row);
    }
    pricing
}

/// A deck with its lines and prices.
#[derive(Debug, Clone, Serialize)]
pub struct DeckView {
    pub deck: Deck,
    pub lines: Vec<DeckCard>,
    pub main_total: u32,
    pub egg_total: u32,
    pub pricing: DeckPricing,
}

impl Hub {
    pub fn create_deck(&self, owner: &User, deck: NewDeck) -> Result<Deck> {
        let name = deck.name.trim();
        if name.is_empty() {
            return Err(HubError::invalid("deck name is required"));
        }
        let deck = NewDeck {
            name: name.to_string(),
            archetype: deck.archetype.trim().to_string(),
            description: deck.description.trim().to_string(),
            ..deck
        };
        Ok(decks::create(self.store.conn(), owner.id, &deck)?)
    }

    /// The owner's decks, newest first.
    pub fn list_decks(&self, owner: &User) -> Result<Vec<Deck>> {
        Ok(decks::list_for_owner(self.store.conn(), owner.id)?)
    }

    pub fn show_deck(&self, owner: &User, deck_id: i64) -> Result<DeckView> {
        let conn = self.store.conn();
        let deck = decks::get_owned(conn, deck_id, owner.id)?;
        let lines = decks::lines(conn, deck.id)?;
        let counts = DeckCounts::tally(&lines);
        let pricing = price_lines(&lines, &prices::for_deck(conn, deck.id)?);
        Ok(DeckView {
            deck,
            lines,
            main_total: counts.main_total,
            egg_total: counts.egg_total,
            pricing,
        })
    }

    pub fn delete_deck(&mut self, owner: &User, deck_id: i64) -> Result<()> {
        self.store.write(|conn| {
            let deck = decks::get_owned(conn, deck_id, owner.id)?;
            decks::delete(conn, deck.id)?;
            Ok(())
        })
    }

    /// Add `quantity` copies of a cached card. The section follows the card
    /// type, and the addition is checked against the format rules before
    /// it is merged into the deck.
    pub fn add_card(
        &mut self,
        owner: &User,
        deck_id: i64,
        cardnumber: &CardNumber,
        quantity: i64,
    ) -> Result<DeckCard> {
        let qty = clamp_quantity(quantity);
        let limits = self.settings.limits;
        self.store.write(|conn| {
            let deck = decks::get_owned(conn, deck_id, owner.id)?;
            if !deck.game.supports_decks() {
                return Err(HubError::UnsupportedGame(deck.game));
            }
            let card = cards::get(conn, cardnumber)?
                .ok_or_else(|| HubError::CardUnavailable(cardnumber.clone()))?;
            let section = if card.is_egg() {
                DeckSection::Egg
            } else {
                DeckSection::Main
            };

            let rulebook = rules::load_rulebook(conn, limits)?;
            let counts = DeckCounts::tally(&decks::lines(conn, deck.id)?);
            if let Err(issue) = validate_addition(&rulebook, &counts, section, &card.cardnumber, qty)
            {
                warn!(deck_id, cardnumber = %card.cardnumber, code = %issue.code, "addition rejected");
                return Err(HubError::Legality(issue));
            }

            let line = match decks::find_line(conn, deck.id, section, &card.cardnumber)? {
                Some(mut line) => {
                    line.quantity += qty;
                    if line.card_name.is_empty() {
                        line.card_name.clone_from(&card.name);
                    }
                    decks::update_line(conn, &line)?;
                    line
                }
                None => decks::insert_line(conn, deck.id, section, &card.cardnumber, &card.name, qty)?,
            };
            decks::touch(conn, deck.id)?;
            info!(deck_id, cardnumber = %card.cardnumber, qty, %section, "card added to deck");
            Ok(line)
        })
    }

    pub fn remove_card(&mut self, owner: &User, deck_id: i64, line_id: i64) -> Result<()> {
        self.store.write(|conn| {
            let deck = decks::get_owned(conn, deck_id, owner.id)?;
            decks::delete_line(conn, deck.id, line_id)?;
            decks::touch(conn, deck.id)?;
            info!(deck_id, line_id, "card removed from deck");
            Ok(())
        })
    }

    /// Every legality problem of the deck. Lines whose card is not cached
    /// are reported as warnings.
    pub fn validate_deck(&self, owner: &User, deck_id: i64) -> Result<LegalityReport> {
        let conn = self.store.conn();
        let deck = decks::get_owned(conn, deck_id, owner.id)?;
        let lines = decks::lines(conn, deck.id)?;
        let rulebook = self.rulebook()?;
        let mut report = validate_deck(&rulebook, &deck.name, &lines);
        for line in &lines {
            if cards::get(conn, &line.cardnumber)?.is_none() {
                report.issues.push(uncached_card_issue(line));
            }
        }
        Ok(report)
    }
}
